//! Centralized error handling.
//!
//! The pipeline is deliberately tolerant: a worker that cannot open or finish
//! reading its slice contributes an empty or partial aggregate, and a worker
//! file that fails to decode is dropped from the merge. Only two conditions
//! surface to the caller: failure to stand up the worker pool, and failure to
//! open or write the output file. Everything else degrades to best-effort
//! output.
//!
//! [`ParlogError`] is `Clone` so it can be captured once and handed to
//! multiple observers; the wrapped `io::Error` sits behind an `Arc` for that
//! reason.

use std::fmt;
use std::io;
use std::sync::Arc;

/// A specialized `Result` type for parlog operations.
pub type Result<T> = std::result::Result<T, ParlogError>;

/// The error type covering all surfaced failure domains.
#[derive(Debug, Clone)]
pub enum ParlogError {
    /// Output-side I/O failure (the output file cannot be created or
    /// written). Input-side failures are absorbed and yield empty or
    /// partial aggregates instead.
    Io(Arc<io::Error>),

    /// The worker pool could not be constructed. This is the only fatal
    /// condition in the parsing stage; the run aborts.
    WorkerSpawn(String),

    /// A worker aggregate could not be encoded or decoded. Within the
    /// pipeline this is absorbed (the aggregate is skipped); the variant
    /// exists so embedders driving the lower-level pieces can match on it.
    Serialization(String),
}

impl fmt::Display for ParlogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::WorkerSpawn(s) => write!(f, "worker spawn failed: {s}"),
            Self::Serialization(s) => write!(f, "serialization error: {s}"),
        }
    }
}

impl std::error::Error for ParlogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for ParlogError {
    fn from(err: io::Error) -> Self {
        Self::Io(Arc::new(err))
    }
}
