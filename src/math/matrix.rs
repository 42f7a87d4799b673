use super::{Vec3, Vec4};

/// A row-major 4x4 matrix: `m[r][c]` is row `r`, column `c`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat4 {
    pub m: [[f32; 4]; 4],
}

impl Mat4 {
    /// The identity matrix.
    #[inline]
    pub fn identity() -> Self {
        let mut m = [[0.0f32; 4]; 4];
        m[0][0] = 1.0;
        m[1][1] = 1.0;
        m[2][2] = 1.0;
        m[3][3] = 1.0;
        Mat4 { m }
    }

    /// Dense row-by-column matrix product, `self * rhs`.
    pub fn mul(&self, rhs: &Mat4) -> Mat4 {
        let mut res = [[0.0f32; 4]; 4];

        for r in 0..4 {
            for c in 0..4 {
                let mut sum = 0.0;
                for k in 0..4 {
                    sum += self.m[r][k] * rhs.m[k][c];
                }
                res[r][c] = sum;
            }
        }

        Mat4 { m: res }
    }

    /// Row-by-column matrix/vector product.
    pub fn mul_vec4(&self, v: Vec4) -> Vec4 {
        Vec4::new(
            self.m[0][0] * v.x + self.m[0][1] * v.y + self.m[0][2] * v.z + self.m[0][3] * v.w,
            self.m[1][0] * v.x + self.m[1][1] * v.y + self.m[1][2] * v.z + self.m[1][3] * v.w,
            self.m[2][0] * v.x + self.m[2][1] * v.y + self.m[2][2] * v.z + self.m[2][3] * v.w,
            self.m[3][0] * v.x + self.m[3][1] * v.y + self.m[3][2] * v.z + self.m[3][3] * v.w,
        )
    }

    /// Builds a translation matrix and post-multiplies it onto `self`,
    /// so the translation applies closest to the vertex: `self * T`.
    pub fn translate(&self, x: f32, y: f32, z: f32) -> Mat4 {
        let mut t = Mat4::identity();
        t.m[0][3] = x;
        t.m[1][3] = y;
        t.m[2][3] = z;
        self.mul(&t)
    }

    /// Builds a scale matrix and post-multiplies it onto `self`.
    pub fn scale(&self, x: f32, y: f32, z: f32) -> Mat4 {
        let mut s = Mat4::identity();
        s.m[0][0] = x;
        s.m[1][1] = y;
        s.m[2][2] = z;
        self.mul(&s)
    }

    /// Builds a rotation matrix around the (not-necessarily-normalized)
    /// axis `(x, y, z)` by `angle_deg` degrees, and post-multiplies it onto
    /// `self`.
    pub fn rotate(&self, angle_deg: f32, x: f32, y: f32, z: f32) -> Mat4 {
        let rad = angle_deg.to_radians();
        let c = rad.cos();
        let s = rad.sin();
        let axis = Vec3::new(x, y, z).normalize();

        let mut r = Mat4::identity();

        r.m[0][0] = axis.x * axis.x * (1.0 - c) + c;
        r.m[0][1] = axis.x * axis.y * (1.0 - c) - axis.z * s;
        r.m[0][2] = axis.x * axis.z * (1.0 - c) + axis.y * s;

        r.m[1][0] = axis.y * axis.x * (1.0 - c) + axis.z * s;
        r.m[1][1] = axis.y * axis.y * (1.0 - c) + c;
        r.m[1][2] = axis.y * axis.z * (1.0 - c) - axis.x * s;

        r.m[2][0] = axis.z * axis.x * (1.0 - c) - axis.y * s;
        r.m[2][1] = axis.z * axis.y * (1.0 - c) + axis.x * s;
        r.m[2][2] = axis.z * axis.z * (1.0 - c) + c;

        self.mul(&r)
    }

    /// Builds a right-handed look-at view matrix and post-multiplies it
    /// onto `self`.
    pub fn look_at(&self, eye: Vec3, center: Vec3, up: Vec3) -> Mat4 {
        let fwd = (center - eye).normalize();
        let right = fwd.cross(up).normalize();
        let new_up = right.cross(fwd);

        let mut m = Mat4::identity();

        m.m[0][0] = right.x;
        m.m[0][1] = right.y;
        m.m[0][2] = right.z;

        m.m[1][0] = new_up.x;
        m.m[1][1] = new_up.y;
        m.m[1][2] = new_up.z;

        m.m[2][0] = -fwd.x;
        m.m[2][1] = -fwd.y;
        m.m[2][2] = -fwd.z;

        m.m[0][3] = -right.dot(eye);
        m.m[1][3] = -new_up.dot(eye);
        m.m[2][3] = fwd.dot(eye);

        self.mul(&m)
    }

    /// Builds a standard right-handed OpenGL-style perspective projection
    /// (NDC-z in `[-1, 1]`, `m[3][2] = -1`) and post-multiplies it onto
    /// `self`.
    pub fn perspective(&self, fov_deg: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
        let f = 1.0 / (fov_deg * 0.5).to_radians().tan();

        let mut m = Mat4::identity();

        m.m[0][0] = f / aspect;
        m.m[1][1] = f;
        m.m[2][2] = (far + near) / (near - far);
        m.m[2][3] = (2.0 * far * near) / (near - far);
        m.m[3][2] = -1.0;
        m.m[3][3] = 0.0;

        self.mul(&m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f32, b: f32) {
        assert!((a - b).abs() < 1e-5, "{} != {}", a, b);
    }

    fn approx_eq_mat(a: &Mat4, b: &Mat4) {
        for r in 0..4 {
            for c in 0..4 {
                approx_eq(a.m[r][c], b.m[r][c]);
            }
        }
    }

    /// L1: identity is a multiplicative identity on both sides.
    #[test]
    fn identity_is_identity() {
        let m = Mat4::identity().translate(1.0, 2.0, 3.0).scale(2.0, 2.0, 2.0);
        let id = Mat4::identity();

        approx_eq_mat(&id.mul(&m), &m);
        approx_eq_mat(&m.mul(&id), &m);
    }

    /// L2: `look_at(e, e+f, u)` applied to the point `e` yields the origin.
    #[test]
    fn look_at_moves_eye_to_origin() {
        let eye = Vec3::new(1.0, 2.0, 3.0);
        let fwd = Vec3::new(0.0, 0.0, -1.0);
        let up = Vec3::new(0.0, 1.0, 0.0);

        let view = Mat4::identity().look_at(eye, eye + fwd, up);
        let p = view.mul_vec4(Vec4::new(eye.x, eye.y, eye.z, 1.0));

        approx_eq(p.x, 0.0);
        approx_eq(p.y, 0.0);
        approx_eq(p.z, 0.0);
    }

    /// L3: perspective maps near/far planes to NDC-z = -1/+1 after divide.
    #[test]
    fn perspective_maps_near_far_to_clip_z_bounds() {
        let near = 0.1;
        let far = 100.0;
        let proj = Mat4::identity().perspective(60.0, 1.0, near, far);

        let p_near = proj.mul_vec4(Vec4::new(0.0, 0.0, -near, 1.0));
        approx_eq(p_near.z / p_near.w, -1.0);

        let p_far = proj.mul_vec4(Vec4::new(0.0, 0.0, -far, 1.0));
        approx_eq(p_far.z / p_far.w, 1.0);
    }

    #[test]
    fn translate_then_transform_point() {
        let m = Mat4::identity().translate(1.0, 2.0, 3.0);
        let p = m.mul_vec4(Vec4::new(0.0, 0.0, 0.0, 1.0));
        approx_eq(p.x, 1.0);
        approx_eq(p.y, 2.0);
        approx_eq(p.z, 3.0);
    }
}
