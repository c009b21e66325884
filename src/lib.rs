//! # Parlog
//!
//! High-throughput aggregation of append-only HTTP visit logs into a
//! deterministic per-day histogram JSON document.
//!
//! Input is a line-oriented file of fixed-shape records:
//!
//! ```text
//! https://stitcher.io/blog/some-post,2026-01-24T01:16:58+00:00
//! ```
//!
//! Output maps every known path to its per-day visit counts:
//!
//! ```text
//! {
//!     "\/blog\/some-post": {
//!         "2026-01-24": 1
//!     }
//! }
//! ```
//!
//! ## Pipeline
//!
//! ```text
//! PathCatalog ──▶ OffsetSplitter ──▶ SliceParser × W ──▶ SliceMerger ──▶ JsonEmitter
//!  (id ↔ path)     (line-aligned      (chunked reads,     (day-id         (buffered,
//!                   byte ranges)       fixed offsets)      remap)          byte-exact)
//! ```
//!
//! The input file is split into W line-aligned byte ranges, one per worker.
//! Each worker reads its range in bounded chunks and parses records with a
//! fixed-offset fast path: the record tail (comma + 25-byte timestamp) has a
//! known length, so path and day fall out of the line length with no field
//! scanning. Workers produce independent partial aggregates; a deterministic
//! merge remaps slice-local day ids onto a shared table while preserving
//! first-seen path order, and the emitter writes the JSON with a fixed
//! layout, choosing per path between sorting its row and scanning the global
//! day order.
//!
//! ## Determinism
//!
//! For a fixed input, catalog, and worker count the output is reproducible
//! byte for byte: slices are merged in file order, path order is global
//! first-seen order, and days within a path ascend by calendar day.
//!
//! ## Tolerance
//!
//! The pipeline prefers best-effort output over failure: unreadable inputs
//! parse as empty, a worker's mid-stream read error keeps what was already
//! accumulated, and an undecodable worker handoff is dropped. Only a failed
//! worker-pool construction and output-side I/O errors surface as
//! [`ParlogError`].
//!
//! ## Usage
//!
//! ```no_run
//! use parlog::{Parlog, PathCatalog};
//!
//! let catalog = PathCatalog::from_pairs([
//!     (0, "https://stitcher.io/blog/some-post".to_string()),
//!     (1, "https://stitcher.io/blog/other-post".to_string()),
//! ]);
//!
//! Parlog::new(catalog)
//!     .workers(8)
//!     .parse("visits.log", "histogram.json")?;
//! # Ok::<(), parlog::ParlogError>(())
//! ```

#![deny(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]
#![warn(missing_docs)]

// --- PUBLIC API MODULES ---
pub mod aggregate;
pub mod api;
pub mod catalog;
pub mod config;
pub mod emitter;
pub mod error;

// --- INTERNAL ENGINE MODULES (public for embedders and tests) ---
#[doc(hidden)]
pub mod parser;
#[doc(hidden)]
pub mod pool;
#[doc(hidden)]
pub mod splitter;

// --- RE-EXPORTS ---

pub use aggregate::{DayKey, GlobalAggregate, Merger, PartialAggregate};
pub use api::{parse, Parlog};
pub use catalog::PathCatalog;
pub use config::{Options, OutputStrategy};
pub use error::{ParlogError, Result};
