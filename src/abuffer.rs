//! The per-pixel A-buffer: sorted fragment lists with front-to-back
//! opacity-based culling, backed by the chunked [`FragmentArena`].

use log::trace;

use crate::arena::{ArenaStats, Fragment, FragmentArena, FragmentIndex};
use crate::math::Vec3;

/// Once accumulated opacity exceeds this in every channel, nothing behind
/// it can ever be seen again. Matches `SPR_OPACITY_THRESHOLD`.
const OPACITY_THRESHOLD: f32 = 0.999;

#[inline]
fn min3(v: Vec3) -> f32 {
    v.x.min(v.y).min(v.z)
}

/// Front-to-back "over" accumulation: `acc <- acc + (1 - acc) * opacity`,
/// componentwise.
#[inline]
fn accumulate(acc: Vec3, opacity: Vec3) -> Vec3 {
    Vec3::new(
        acc.x + (1.0 - acc.x) * opacity.x,
        acc.y + (1.0 - acc.y) * opacity.y,
        acc.z + (1.0 - acc.z) * opacity.z,
    )
}

/// One pixel's head-pointer array plus the arena backing every pixel's
/// sorted fragment list.
#[derive(Debug)]
pub struct ABuffer {
    heads: Vec<Option<FragmentIndex>>,
    arena: FragmentArena,
}

impl ABuffer {
    pub fn new(pixel_count: usize) -> Self {
        ABuffer {
            heads: vec![None; pixel_count],
            arena: FragmentArena::new(),
        }
    }

    /// Inserts a shaded fragment at `pixel` with depth `z`, maintaining the
    /// ascending-z sort order and culling any fragment (new or existing)
    /// that ends up behind full accumulated opacity.
    pub fn insert(&mut self, pixel: usize, z: f32, color: Vec3, opacity: Vec3) {
        let mut acc = Vec3::default();
        let mut prev: Option<FragmentIndex> = None;
        let mut curr = self.heads[pixel];

        // 1. Walk forward accumulating opacity until we find the insertion point.
        while let Some(idx) = curr {
            let node = *self.arena.get(idx);

            if node.z >= z {
                break;
            }

            acc = accumulate(acc, node.opacity);

            if min3(acc) > OPACITY_THRESHOLD {
                trace!("pixel {}: fragment at z={} fully occluded, discarding", pixel, z);
                return;
            }

            prev = Some(idx);
            curr = node.next;
        }

        // 2. Allocate and splice in the new fragment.
        let new_idx = match self.arena.alloc() {
            Some(idx) => idx,
            None => {
                trace!("pixel {}: arena exhausted, dropping fragment at z={}", pixel, z);
                return;
            }
        };

        *self.arena.get_mut(new_idx) = Fragment { z, color, opacity, next: curr };

        match prev {
            Some(p) => self.arena.get_mut(p).next = Some(new_idx),
            None => self.heads[pixel] = Some(new_idx),
        }

        // 3. Extend the accumulator with the fragment we just inserted.
        acc = accumulate(acc, opacity);

        if min3(acc) > OPACITY_THRESHOLD {
            let tail = curr;
            self.arena.get_mut(new_idx).next = None;
            self.free_chain(tail);
            return;
        }

        // 4. Keep walking the tail, culling as soon as it becomes fully occluded.
        let mut walk = curr;

        while let Some(idx) = walk {
            let node = *self.arena.get(idx);
            acc = accumulate(acc, node.opacity);

            if min3(acc) > OPACITY_THRESHOLD {
                let tail = node.next;
                self.arena.get_mut(idx).next = None;
                self.free_chain(tail);
                return;
            }

            walk = node.next;
        }
    }

    fn free_chain(&mut self, mut head: Option<FragmentIndex>) {
        while let Some(idx) = head {
            let next = self.arena.get(idx).next;
            self.arena.free(idx);
            head = next;
        }
    }

    /// Front-to-back accumulation over one pixel's sorted list. Returns
    /// `None` if the pixel has no fragments (the caller should keep the
    /// clear color). Otherwise returns the
    /// accumulated premultiplied color and opacity, having stopped early
    /// once opacity saturates (idempotent: re-running over the same list
    /// yields the same result, since resolve never mutates the buffer).
    pub fn accumulate_pixel(&self, pixel: usize) -> Option<(Vec3, Vec3)> {
        if self.heads[pixel].is_none() {
            return None;
        }

        let mut acc_color = Vec3::default();
        let mut acc_opacity = Vec3::default();

        for node in self.iter_pixel(pixel) {
            let inv = Vec3::new(1.0 - acc_opacity.x, 1.0 - acc_opacity.y, 1.0 - acc_opacity.z);

            acc_color = Vec3::new(
                acc_color.x + inv.x * node.color.x,
                acc_color.y + inv.y * node.color.y,
                acc_color.z + inv.z * node.color.z,
            );
            acc_opacity = accumulate(acc_opacity, node.opacity);

            if min3(acc_opacity) > OPACITY_THRESHOLD {
                break;
            }
        }

        Some((acc_color, acc_opacity))
    }

    /// Resets every pixel head to empty and resets the arena, per the
    /// "reset world" strategy: fragments are never individually freed
    /// since the head-zero wipe already drops every reference to them.
    pub fn clear(&mut self) {
        for head in &mut self.heads {
            *head = None;
        }
        self.arena.clear();
    }

    pub fn stats(&self) -> ArenaStats {
        self.arena.stats()
    }

    /// Iterates a pixel's fragment list front-to-back (ascending z).
    pub fn iter_pixel(&self, pixel: usize) -> FragmentIter<'_> {
        FragmentIter { arena: &self.arena, curr: self.heads[pixel] }
    }
}

/// Iterator over one pixel's fragment list, front-to-back (ascending z).
pub struct FragmentIter<'a> {
    arena: &'a FragmentArena,
    curr: Option<FragmentIndex>,
}

impl<'a> Iterator for FragmentIter<'a> {
    type Item = &'a Fragment;

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.curr?;
        let node = self.arena.get(idx);
        self.curr = node.next;
        Some(node)
    }
}
