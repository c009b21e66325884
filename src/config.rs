//! Runtime options and their environment bindings.
//!
//! Every knob has a builder-style setter on [`Parlog`](crate::Parlog) and an
//! optional environment variable read by [`Options::from_env`]. Numeric
//! variables accept `_` and `,` as digit separators (`"4_194_304"`,
//! `"4,194,304"`); values that fail to parse leave the default in place.

use std::env;

/// Fixed 19-byte literal every valid record begins with.
pub const PREFIX: &[u8; 19] = b"https://stitcher.io";

/// Default worker count when `PARSER_WORKERS` is unset or out of range.
pub const DEFAULT_WORKERS: usize = 8;

/// Hard ceiling on the worker count.
pub const MAX_WORKERS: usize = 16;

/// Lower clamp for chunk and buffer sizes (64 KiB).
pub const MIN_BUFFER_BYTES: usize = 64 * 1024;

/// Upper clamp for chunk and buffer sizes (64 MiB).
pub const MAX_BUFFER_BYTES: usize = 64 * 1024 * 1024;

/// Inputs smaller than this run on a single worker unless the multicore
/// force flag is set (128 MiB).
pub const PARALLEL_MIN_BYTES: u64 = 128 * 1024 * 1024;

/// Default read-chunk size for the slice parser.
pub const DEFAULT_READ_CHUNK: usize = 4 * 1024 * 1024;

/// Default capacity of the buffered output writer.
pub const DEFAULT_WRITE_BUFFER: usize = 1024 * 1024;

/// Per-path emission strategy for the JSON writer.
///
/// `Sort` orders a row by sorting its own day entries; `Scan` walks the
/// global ascending day list and emits the days present in the row. Both
/// produce identical bytes (ascending day order); they differ only in cost:
/// sorting is `O(R log R)` in the row size, scanning is `O(D)` in the total
/// day count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputStrategy {
    /// Sort each row's days.
    Sort,
    /// Walk the global ascending day list per row.
    Scan,
    /// Pick per row: `2R < D` sorts, otherwise scans.
    Hybrid,
}

impl OutputStrategy {
    /// Maps a `PARSER_OUTPUT_STRATEGY` value. Unset or empty means
    /// [`Hybrid`](Self::Hybrid); any unrecognized non-empty value falls
    /// through to [`Scan`](Self::Scan).
    pub fn from_env_value(value: &str) -> Self {
        match value {
            "" | "hybrid" => Self::Hybrid,
            "sort" => Self::Sort,
            _ => Self::Scan,
        }
    }
}

impl Default for OutputStrategy {
    fn default() -> Self {
        Self::Hybrid
    }
}

/// Resolved pipeline options.
#[derive(Debug, Clone)]
pub struct Options {
    /// Worker count, already normalized to `1..=16`.
    pub workers: usize,
    /// Disables the small-file single-worker fallback.
    pub force_multicore: bool,
    /// Read-chunk size in bytes, clamped to `[64 KiB, 64 MiB]`.
    pub read_chunk: usize,
    /// Output buffer capacity in bytes, clamped to `[64 KiB, 64 MiB]`.
    pub write_buffer: usize,
    /// Advisory read-buffer size; `0` means unset, positive values clamp
    /// into `[64 KiB, 64 MiB]`.
    pub read_buffer: usize,
    /// Per-path emission strategy.
    pub strategy: OutputStrategy,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            force_multicore: false,
            read_chunk: DEFAULT_READ_CHUNK,
            write_buffer: DEFAULT_WRITE_BUFFER,
            read_buffer: 0,
            strategy: OutputStrategy::default(),
        }
    }
}

impl Options {
    /// Builds options from the recognized `PARSER_*` environment variables,
    /// falling back to defaults for anything unset or unparseable.
    pub fn from_env() -> Self {
        let mut opts = Self::default();

        if let Ok(v) = env::var("PARSER_WORKERS") {
            opts.workers = normalize_workers(v.trim().parse::<i64>().unwrap_or(0));
        }
        opts.force_multicore = env::var("PARSER_FORCE_MULTICORE").as_deref() == Ok("1");
        if let Some(v) = env_size("PARSER_READ_CHUNK_SIZE") {
            opts.read_chunk = clamp_buffer(v);
        }
        if let Some(v) = env_size("PARSER_WRITE_BUFFER_SIZE") {
            opts.write_buffer = clamp_buffer(v);
        }
        if let Some(v) = env_size("PARSER_READ_BUFFER") {
            // 0 stays 0: "unset", the parser reads the file handle directly.
            opts.read_buffer = if v == 0 { 0 } else { clamp_buffer(v) };
        }
        if let Ok(v) = env::var("PARSER_OUTPUT_STRATEGY") {
            opts.strategy = OutputStrategy::from_env_value(v.trim());
        }

        opts
    }
}

/// Clamps a worker count into `1..=MAX_WORKERS`; non-positive requests mean
/// "use the default".
pub(crate) fn normalize_workers(requested: i64) -> usize {
    if requested <= 0 {
        DEFAULT_WORKERS
    } else {
        (requested as usize).min(MAX_WORKERS)
    }
}

/// Clamps a byte size into the accepted buffer range.
pub(crate) fn clamp_buffer(bytes: usize) -> usize {
    bytes.clamp(MIN_BUFFER_BYTES, MAX_BUFFER_BYTES)
}

fn env_size(name: &str) -> Option<usize> {
    let raw = env::var(name).ok()?;
    parse_size(&raw)
}

/// Parses a byte count, tolerating `_` and `,` separators.
pub(crate) fn parse_size(raw: &str) -> Option<usize> {
    let cleaned: String = raw.chars().filter(|c| *c != '_' && *c != ',').collect();
    cleaned.trim().parse::<usize>().ok()
}
