//! The public entry point.

use std::fs;
use std::path::Path;

use crate::aggregate::{GlobalAggregate, Merger};
use crate::catalog::PathCatalog;
use crate::config::{self, Options, OutputStrategy};
use crate::emitter::JsonEmitter;
use crate::error::Result;
use crate::parser::SliceParser;
use crate::pool;
use crate::splitter;

/// The configured pipeline: a catalog plus resolved options.
///
/// Construct with [`Parlog::new`] (defaults) or [`Parlog::from_env`]
/// (environment options), adjust with the builder-style setters, then call
/// [`parse`](Parlog::parse), or [`aggregate`](Parlog::aggregate) to get
/// the merged counts without emitting JSON.
#[derive(Debug)]
pub struct Parlog {
    catalog: PathCatalog,
    options: Options,
}

impl Parlog {
    /// A pipeline over `catalog` with default options.
    pub fn new(catalog: PathCatalog) -> Self {
        Self {
            catalog,
            options: Options::default(),
        }
    }

    /// A pipeline over `catalog` with options read from the `PARSER_*`
    /// environment variables.
    pub fn from_env(catalog: PathCatalog) -> Self {
        Self {
            catalog,
            options: Options::from_env(),
        }
    }

    /// Sets the worker count. Zero means the default; values above 16
    /// clamp down.
    pub fn workers(mut self, count: usize) -> Self {
        self.options.workers = config::normalize_workers(count as i64);
        self
    }

    /// Disables the small-file single-worker fallback.
    pub fn force_multicore(mut self, force: bool) -> Self {
        self.options.force_multicore = force;
        self
    }

    /// Sets the read-chunk size; clamped to `[64 KiB, 64 MiB]`.
    pub fn read_chunk_size(mut self, bytes: usize) -> Self {
        self.options.read_chunk = config::clamp_buffer(bytes);
        self
    }

    /// Sets the output buffer capacity; clamped to `[64 KiB, 64 MiB]`.
    pub fn write_buffer_size(mut self, bytes: usize) -> Self {
        self.options.write_buffer = config::clamp_buffer(bytes);
        self
    }

    /// Sets the advisory read-buffer size. Zero disables extra buffering;
    /// positive values clamp to `[64 KiB, 64 MiB]`.
    pub fn read_buffer(mut self, bytes: usize) -> Self {
        self.options.read_buffer = if bytes == 0 {
            0
        } else {
            config::clamp_buffer(bytes)
        };
        self
    }

    /// Sets the per-path emission strategy.
    pub fn output_strategy(mut self, strategy: OutputStrategy) -> Self {
        self.options.strategy = strategy;
        self
    }

    /// The catalog this pipeline was built over.
    pub fn catalog(&self) -> &PathCatalog {
        &self.catalog
    }

    /// Runs the slicing-parsing-merging pipeline and returns the merged
    /// aggregate without emitting anything.
    ///
    /// An input that cannot be opened or sized is treated as empty and
    /// yields an empty aggregate. The only error is a failed worker-pool
    /// construction.
    pub fn aggregate<P: AsRef<Path>>(&self, input: P) -> Result<GlobalAggregate> {
        let input = input.as_ref();
        let size = fs::metadata(input).map(|m| m.len()).unwrap_or(0);
        let workers = pool::effective_workers(&self.options, size);
        let cuts = splitter::split_offsets(input, size, workers);

        let parser = SliceParser::new(&self.catalog, self.options.read_chunk, self.options.read_buffer);
        let parts = pool::run_slices(&parser, input, &cuts)?;

        let mut merger = Merger::new(self.catalog.len());
        for part in parts {
            merger.absorb(part);
        }
        Ok(merger.finish())
    }

    /// Parses `input` and writes the per-day visit histogram JSON to
    /// `output`.
    ///
    /// With an empty catalog the input is never touched and the output is
    /// the literal `{}`.
    pub fn parse<P: AsRef<Path>, Q: AsRef<Path>>(&self, input: P, output: Q) -> Result<()> {
        let output = output.as_ref();
        if self.catalog.is_empty() {
            fs::write(output, b"{}")?;
            return Ok(());
        }

        let agg = self.aggregate(input)?;
        JsonEmitter::new(&self.catalog, self.options.strategy, self.options.write_buffer)
            .write_to(output, &agg)
    }
}

/// One-shot convenience: environment options, full pipeline, JSON output.
pub fn parse<P: AsRef<Path>, Q: AsRef<Path>>(
    catalog: PathCatalog,
    input: P,
    output: Q,
) -> Result<()> {
    Parlog::from_env(catalog).parse(input, output)
}
