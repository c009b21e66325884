//! Aggregate shapes and the merge fold.
//!
//! A [`PartialAggregate`] is one worker's summary of its slice: path ids in
//! discovery order, a slice-local day table, and a sparse per-path day-count
//! matrix. The [`Merger`] folds partials into a [`GlobalAggregate`] in pool
//! order, remapping slice-local day ids onto the shared day table while
//! preserving first-seen ordering for paths; that ordering is what makes
//! the emitted output deterministic for a fixed worker count.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// The 10-byte `YYYY-MM-DD` prefix of a record's timestamp. Lexicographic
/// order coincides with chronological order, which the emitter's ascending
/// sort relies on.
pub type DayKey = [u8; 10];

/// One worker's slice summary. This is the value encoded to the per-worker
/// temp file when the pool fans out.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct PartialAggregate {
    /// Path ids in first-seen order; no duplicates.
    pub order: Vec<u32>,
    /// Day table indexed by slice-local day id, in first-seen order.
    pub days: Vec<DayKey>,
    /// Sparse rows indexed by path id: local day id → count.
    pub matrix: Vec<AHashMap<u32, u64>>,
}

impl PartialAggregate {
    /// An empty aggregate with `paths` (possibly zero-filled) matrix rows.
    pub fn empty(paths: usize) -> Self {
        Self {
            order: Vec::new(),
            days: Vec::new(),
            matrix: vec![AHashMap::new(); paths],
        }
    }
}

/// The merged result across all slices: same shape as a partial, with
/// global day ids and summed counts.
#[derive(Debug)]
pub struct GlobalAggregate {
    order: Vec<u32>,
    days: Vec<DayKey>,
    matrix: Vec<AHashMap<u32, u64>>,
}

impl GlobalAggregate {
    /// Path ids in global first-seen order (merge order across slices).
    pub fn paths_in_order(&self) -> &[u32] {
        &self.order
    }

    /// The global day table, indexed by global day id in first-seen order.
    pub fn days(&self) -> &[DayKey] {
        &self.days
    }

    /// The sparse row for a path id, if the id is in range.
    pub fn row(&self, pid: u32) -> Option<&AHashMap<u32, u64>> {
        self.matrix.get(pid as usize)
    }

    /// Count for a `(path, day)` pair; zero when absent.
    pub fn count(&self, pid: u32, did: u32) -> u64 {
        self.row(pid)
            .and_then(|row| row.get(&did))
            .copied()
            .unwrap_or(0)
    }

    /// Total visits recorded for a path across all days.
    pub fn total(&self, pid: u32) -> u64 {
        self.row(pid).map_or(0, |row| row.values().sum())
    }
}

/// Folds partial aggregates into a global one.
///
/// Absorption order is significant: it defines the global first-seen order
/// of paths and the assignment of global day ids. The pool absorbs spawned
/// workers in spawn order and the controller's own aggregate last.
#[derive(Debug)]
pub struct Merger {
    order: Vec<u32>,
    seen: Vec<bool>,
    days: Vec<DayKey>,
    day_ids: AHashMap<DayKey, u32>,
    matrix: Vec<AHashMap<u32, u64>>,
}

impl Merger {
    /// A merger for a catalog of `paths` entries.
    pub fn new(paths: usize) -> Self {
        Self {
            order: Vec::new(),
            seen: vec![false; paths],
            days: Vec::new(),
            day_ids: AHashMap::new(),
            matrix: vec![AHashMap::new(); paths],
        }
    }

    /// Folds one partial aggregate in.
    ///
    /// Rows or path ids beyond the catalog size are ignored; they can only
    /// come from a foreign or corrupted worker file, and dropping them
    /// matches the skip-on-decode-failure policy.
    pub fn absorb(&mut self, part: PartialAggregate) {
        for pid in part.order {
            if let Some(seen) = self.seen.get_mut(pid as usize) {
                if !*seen {
                    *seen = true;
                    self.order.push(pid);
                }
            }
        }

        // Slice-local day id -> global day id.
        let mut remap = Vec::with_capacity(part.days.len());
        for day in part.days {
            let gid = match self.day_ids.get(&day) {
                Some(&gid) => gid,
                None => {
                    let gid = self.days.len() as u32;
                    self.days.push(day);
                    self.day_ids.insert(day, gid);
                    gid
                }
            };
            remap.push(gid);
        }

        for (pid, row) in part.matrix.into_iter().enumerate() {
            if row.is_empty() {
                continue;
            }
            let Some(target) = self.matrix.get_mut(pid) else {
                continue;
            };
            for (local, count) in row {
                let Some(&gid) = remap.get(local as usize) else {
                    continue;
                };
                *target.entry(gid).or_insert(0) += count;
            }
        }
    }

    /// Finishes the fold.
    pub fn finish(self) -> GlobalAggregate {
        GlobalAggregate {
            order: self.order,
            days: self.days,
            matrix: self.matrix,
        }
    }
}
