//! Per-worker record of the last grid walk that tested each primitive.
//!
//! A primitive spanning several grid cells would otherwise be intersected
//! once per cell. The stamp lives outside the primitive so that workers never
//! share it: each worker owns one mailbox, and every walk takes a fresh stamp
//! from it. Ray ids are never used as stamps, so tracing the same ray twice
//! tests its primitives both times.

use crate::PrimitiveId;

/// Stamp that no walk carries.
const NO_WALK: u64 = 0;

#[derive(Debug, Clone)]
pub struct Mailbox {
    stamps: Vec<u64>,
    current: u64,
}

impl Mailbox {
    /// One empty slot per primitive.
    pub fn new(primitive_count: usize) -> Self {
        Self {
            stamps: vec![NO_WALK; primitive_count],
            current: NO_WALK,
        }
    }

    /// Start a new walk over a scene of `primitive_count` primitives.
    ///
    /// Grows the mailbox if the scene has more primitives than it was sized
    /// for.
    #[inline]
    pub fn begin_walk(&mut self, primitive_count: usize) {
        if self.stamps.len() < primitive_count {
            self.stamps.resize(primitive_count, NO_WALK);
        }
        self.current += 1;
    }

    /// Record that the current walk is testing `id`.
    ///
    /// Returns false if this walk has already tested the primitive.
    #[inline]
    pub fn first_visit(&mut self, id: PrimitiveId) -> bool {
        let stamp = &mut self.stamps[id.index()];
        if *stamp == self.current {
            return false;
        }
        *stamp = self.current;
        true
    }
}
