//! The worker pool: fan-out, temp-file collection, fan-in order.
//!
//! For W ≥ 2 a dedicated rayon pool of W threads is built; failing to build
//! it is the pipeline's one fatal error. Inside a pool scope, workers
//! 0..W−2 each parse their slice and encode the resulting aggregate to a
//! per-worker temp file, while the controlling task parses the final slice
//! and keeps its aggregate in memory. After the scope joins, worker files are read back in spawn
//! order, decoded, and deleted; a file that cannot be read or decoded is
//! skipped and its contribution lost. The controller's aggregate comes
//! last. That collection order is what fixes the global first-seen order of
//! paths and days.
//!
//! Spill names carry the process id, a per-run sequence number, and the
//! worker index. Workers are threads, not forked children, so the process
//! id alone cannot distinguish concurrent runs; the sequence number keeps
//! overlapping `run_slices` calls in one process off each other's files.
//!
//! Workers share nothing mutable: the catalog is borrowed immutably and
//! each worker opens its own read-only handle on the input.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::aggregate::PartialAggregate;
use crate::config::{Options, PARALLEL_MIN_BYTES};
use crate::error::{ParlogError, Result};
use crate::parser::SliceParser;

/// Distinguishes the spill files of concurrent runs within one process.
static RUN_SEQ: AtomicU64 = AtomicU64::new(0);

/// Resolves the worker count actually used for a file of `size` bytes.
///
/// A zero-byte (or unopenable, sized-as-zero) input always runs single
/// worker, as does anything below the 128 MiB parallel threshold unless the
/// force flag is set.
pub fn effective_workers(options: &Options, size: u64) -> usize {
    if options.workers <= 1 || size == 0 {
        return 1;
    }
    if size < PARALLEL_MIN_BYTES && !options.force_multicore {
        return 1;
    }
    options.workers
}

/// Runs one slice per cut pair and returns the partial aggregates in merge
/// order (spawned workers in spawn order, controller last).
pub fn run_slices(
    parser: &SliceParser<'_>,
    input: &Path,
    cuts: &[u64],
) -> Result<Vec<PartialAggregate>> {
    let workers = cuts.len().saturating_sub(1);
    if workers <= 1 {
        let end = cuts.last().copied().unwrap_or(0);
        return Ok(vec![parser.parse(input, 0, end)]);
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("parlog-worker-{i}"))
        .build()
        .map_err(|e| ParlogError::WorkerSpawn(e.to_string()))?;

    let spawned = workers - 1;
    let run = RUN_SEQ.fetch_add(1, Ordering::Relaxed);
    let spill_paths: Vec<PathBuf> = (0..spawned).map(|i| spill_path(run, i)).collect();

    let own = pool.scope(|scope| {
        for (i, spill) in spill_paths.iter().enumerate() {
            scope.spawn(move |_| {
                let agg = parser.parse(input, cuts[i], cuts[i + 1]);
                spill_aggregate(spill, &agg);
            });
        }
        parser.parse(input, cuts[spawned], cuts[workers])
    });

    let mut parts = Vec::with_capacity(workers);
    for spill in &spill_paths {
        if let Some(agg) = recover_aggregate(spill) {
            parts.push(agg);
        }
        let _ = fs::remove_file(spill);
    }
    parts.push(own);
    Ok(parts)
}

/// Stable per-worker temp location, unique per process, run, and index.
fn spill_path(run: u64, index: usize) -> PathBuf {
    env::temp_dir().join(format!("parlog-{}-{run}-{index}.part", process::id()))
}

/// Encodes a worker's aggregate to its temp file. Failures are absorbed:
/// the missing or short file is skipped at collection time.
fn spill_aggregate(path: &Path, agg: &PartialAggregate) {
    let Ok(bytes) = bincode::serde::encode_to_vec(agg, bincode::config::standard()) else {
        return;
    };
    let _ = fs::write(path, bytes);
}

/// Reads a worker file back; `None` when the file is unreadable or does not
/// decode.
fn recover_aggregate(path: &Path) -> Option<PartialAggregate> {
    let bytes = fs::read(path).ok()?;
    bincode::serde::decode_from_slice(&bytes, bincode::config::standard())
        .ok()
        .map(|(agg, _)| agg)
}
