//! Barycentric and linear interpolation of shader attributes.
//!
//! See [this document](https://classes.soe.ucsc.edu/cmps160/Fall10/resources/barycentricInterpolation.pdf)
//! for background on barycentric interpolation.

use crate::math::{Vec2, Vec3, Vec4};

/// A type that can be interpolated across a triangle with barycentric
/// weights, or linearly between two values.
pub trait Interpolate {
    /// Interpolates three values with their corresponding barycentric
    /// coordinate weight. Weights are expected to sum to 1.
    fn barycentric_interpolate(u: f32, x1: &Self, v: f32, x2: &Self, w: f32, x3: &Self) -> Self;

    /// Linearly interpolates between two values at parameter `t`.
    fn linear_interpolate(t: f32, x1: &Self, x2: &Self) -> Self;
}

impl Interpolate for f32 {
    #[inline]
    fn barycentric_interpolate(u: f32, x1: &Self, v: f32, x2: &Self, w: f32, x3: &Self) -> Self {
        x1 * u + x2 * v + x3 * w
    }

    #[inline]
    fn linear_interpolate(t: f32, x1: &Self, x2: &Self) -> Self {
        x1 * (1.0 - t) + x2 * t
    }
}

impl Interpolate for Vec2 {
    #[inline]
    fn barycentric_interpolate(u: f32, x1: &Self, v: f32, x2: &Self, w: f32, x3: &Self) -> Self {
        Vec2::new(
            f32::barycentric_interpolate(u, &x1.x, v, &x2.x, w, &x3.x),
            f32::barycentric_interpolate(u, &x1.y, v, &x2.y, w, &x3.y),
        )
    }

    #[inline]
    fn linear_interpolate(t: f32, x1: &Self, x2: &Self) -> Self {
        Vec2::new(
            f32::linear_interpolate(t, &x1.x, &x2.x),
            f32::linear_interpolate(t, &x1.y, &x2.y),
        )
    }
}

impl Interpolate for Vec3 {
    #[inline]
    fn barycentric_interpolate(u: f32, x1: &Self, v: f32, x2: &Self, w: f32, x3: &Self) -> Self {
        Vec3::new(
            f32::barycentric_interpolate(u, &x1.x, v, &x2.x, w, &x3.x),
            f32::barycentric_interpolate(u, &x1.y, v, &x2.y, w, &x3.y),
            f32::barycentric_interpolate(u, &x1.z, v, &x2.z, w, &x3.z),
        )
    }

    #[inline]
    fn linear_interpolate(t: f32, x1: &Self, x2: &Self) -> Self {
        Vec3::new(
            f32::linear_interpolate(t, &x1.x, &x2.x),
            f32::linear_interpolate(t, &x1.y, &x2.y),
            f32::linear_interpolate(t, &x1.z, &x2.z),
        )
    }
}

impl Interpolate for Vec4 {
    #[inline]
    fn barycentric_interpolate(u: f32, x1: &Self, v: f32, x2: &Self, w: f32, x3: &Self) -> Self {
        Vec4::new(
            f32::barycentric_interpolate(u, &x1.x, v, &x2.x, w, &x3.x),
            f32::barycentric_interpolate(u, &x1.y, v, &x2.y, w, &x3.y),
            f32::barycentric_interpolate(u, &x1.z, v, &x2.z, w, &x3.z),
            f32::barycentric_interpolate(u, &x1.w, v, &x2.w, w, &x3.w),
        )
    }

    #[inline]
    fn linear_interpolate(t: f32, x1: &Self, x2: &Self) -> Self {
        Vec4::new(
            f32::linear_interpolate(t, &x1.x, &x2.x),
            f32::linear_interpolate(t, &x1.y, &x2.y),
            f32::linear_interpolate(t, &x1.z, &x2.z),
            f32::linear_interpolate(t, &x1.w, &x2.w),
        )
    }
}
