//! The fragment arena: a chunked, index-addressed free-list allocator.
//!
//! Per the "natural mapping" design note, records are addressed by index
//! into a growable list of fixed-size chunks rather than by raw pointer.
//! Splicing a fragment into a pixel's sorted list, returning it to the
//! free list, and truncating a culled tail are all index swaps; there is
//! no per-fragment heap allocation.

use std::num::NonZeroU32;

use log::debug;

use crate::math::Vec3;

/// Number of fragment records per chunk. Matches the reference
/// implementation's `SPR_CHUNK_SIZE`.
pub const CHUNK_SIZE: usize = 4096;

/// An index into the arena, niche-optimized so `Option<FragmentIndex>` is
/// pointer-sized. Internally stores `slot + 1` so that slot `0` is
/// representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FragmentIndex(NonZeroU32);

impl FragmentIndex {
    #[inline]
    fn from_slot(slot: u32) -> Self {
        FragmentIndex(NonZeroU32::new(slot + 1).expect("slot + 1 is never zero"))
    }

    #[inline]
    fn slot(self) -> u32 {
        self.0.get() - 1
    }
}

/// One shaded sample stored in the A-buffer: depth, premultiplied color,
/// per-channel opacity, and the next link of the pixel's sorted list.
#[derive(Debug, Clone, Copy)]
pub struct Fragment {
    pub z: f32,
    pub color: Vec3,
    pub opacity: Vec3,
    pub next: Option<FragmentIndex>,
}

impl Default for Fragment {
    fn default() -> Self {
        Fragment {
            z: 0.0,
            color: Vec3::default(),
            opacity: Vec3::default(),
            next: None,
        }
    }
}

type Chunk = Box<[Fragment; CHUNK_SIZE]>;

fn new_chunk() -> Chunk {
    Box::new([Fragment::default(); CHUNK_SIZE])
}

/// Snapshot of the arena's allocation state, mirroring the reference
/// implementation's `spr_stats_t`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArenaStats {
    /// Records currently reachable from some pixel head.
    pub active_fragments: usize,
    /// High-water mark of `active_fragments` since the last `clear`.
    pub peak_fragments: usize,
    /// Number of chunks currently allocated.
    pub total_chunks: usize,
}

/// The fragment arena: free list + chunked bump allocator.
#[derive(Debug)]
pub struct FragmentArena {
    chunks: Vec<Chunk>,
    /// Next unused slot within `chunks.last()`. Starts at `CHUNK_SIZE` to
    /// force allocation of the first chunk on first use.
    cursor: usize,
    free_list: Option<FragmentIndex>,
    active: usize,
    peak: usize,
}

impl Default for FragmentArena {
    fn default() -> Self {
        FragmentArena {
            chunks: Vec::new(),
            cursor: CHUNK_SIZE,
            free_list: None,
            active: 0,
            peak: 0,
        }
    }
}

impl FragmentArena {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn get(&self, index: FragmentIndex) -> &Fragment {
        let slot = index.slot() as usize;
        &self.chunks[slot / CHUNK_SIZE][slot % CHUNK_SIZE]
    }

    #[inline]
    pub fn get_mut(&mut self, index: FragmentIndex) -> &mut Fragment {
        let slot = index.slot() as usize;
        &mut self.chunks[slot / CHUNK_SIZE][slot % CHUNK_SIZE]
    }

    /// Pops a node from the free list, else bumps the chunk cursor, else
    /// grows the arena by one chunk. Never fails in this implementation
    /// (growth is bounded only by available memory), but the insertion
    /// path still treats it as fallible so a future bounded-arena mode can
    /// drop fragments cleanly.
    pub fn alloc(&mut self) -> Option<FragmentIndex> {
        let index = if let Some(free) = self.free_list.take() {
            self.free_list = self.get(free).next;
            free
        } else {
            if self.cursor >= CHUNK_SIZE {
                self.chunks.push(new_chunk());
                self.cursor = 0;
                debug!("arena grew to {} chunks", self.chunks.len());
            }

            let global_slot = (self.chunks.len() - 1) * CHUNK_SIZE + self.cursor;
            self.cursor += 1;
            FragmentIndex::from_slot(global_slot as u32)
        };

        self.active += 1;
        self.peak = self.peak.max(self.active);

        Some(index)
    }

    /// Pushes `index` onto the free list in O(1).
    pub fn free(&mut self, index: FragmentIndex) {
        let next = self.free_list;
        self.get_mut(index).next = next;
        self.free_list = Some(index);
        self.active = self.active.saturating_sub(1);
    }

    /// Resets the allocator to its post-`clear` state: every chunk but the
    /// first is dropped, the cursor restarts at the first chunk, and the
    /// free list is emptied. One chunk is kept allocated as a hot cache so
    /// the very next frame doesn't immediately re-allocate.
    ///
    /// This is `clear`'s "reset world" strategy: individual fragments are
    /// never walked and freed one at a time, because the head-pointer wipe
    /// in [`crate::abuffer::ABuffer::clear`] already drops every reference
    /// to them; reclaiming is O(chunks) instead of O(fragments).
    pub fn clear(&mut self) {
        if !self.chunks.is_empty() {
            self.chunks.truncate(1);
            self.cursor = 0;
        }

        self.free_list = None;
        self.active = 0;
        self.peak = 0;
    }

    pub fn stats(&self) -> ArenaStats {
        ArenaStats {
            active_fragments: self.active,
            peak_fragments: self.peak,
            total_chunks: self.chunks.len(),
        }
    }
}
