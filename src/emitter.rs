//! The deterministic JSON emitter.
//!
//! Output is a single object mapping each escaped path to its per-day
//! histogram, byte-for-byte reproducible for a given input, catalog, and
//! worker count:
//!
//! ```text
//! {
//!     "\/a": {
//!         "2026-01-24": 1,
//!         "2026-01-25": 3
//!     },
//!     "\/b": {
//!         "2026-01-24": 2
//!     }
//! }
//! ```
//!
//! Paths appear in global first-seen order; days within a path ascend by
//! day key; paths with an empty row are skipped. Indentation is fixed at 4
//! spaces for paths and 8 for days, with no trailing newline after the
//! closing brace. An empty catalog short-circuits to the two bytes `{}`;
//! an empty aggregate over a non-empty catalog produces `{` newline `}`.
//!
//! Per row the emitter either sorts the row's own entries or scans the
//! globally sorted day list, per the configured [`OutputStrategy`]; both
//! orders are ascending, so the choice affects cost, never bytes. The
//! hybrid default sorts when `2R < D` and scans otherwise.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use ahash::AHashMap;

use crate::aggregate::{DayKey, GlobalAggregate};
use crate::catalog::PathCatalog;
use crate::config::OutputStrategy;
use crate::error::Result;

/// Writes a [`GlobalAggregate`] as the final JSON document.
#[derive(Debug)]
pub struct JsonEmitter<'a> {
    catalog: &'a PathCatalog,
    strategy: OutputStrategy,
    write_buffer: usize,
}

impl<'a> JsonEmitter<'a> {
    /// An emitter over `catalog` with the given strategy and output buffer
    /// capacity.
    pub fn new(catalog: &'a PathCatalog, strategy: OutputStrategy, write_buffer: usize) -> Self {
        Self {
            catalog,
            strategy,
            write_buffer,
        }
    }

    /// Writes the document to `output`. Failure to create or write the
    /// file is surfaced as [`ParlogError::Io`](crate::ParlogError::Io).
    pub fn write_to(&self, output: &Path, agg: &GlobalAggregate) -> Result<()> {
        let file = File::create(output)?;
        let mut out = BufWriter::with_capacity(self.write_buffer, file);

        if self.catalog.is_empty() {
            out.write_all(b"{}")?;
            out.flush()?;
            return Ok(());
        }

        // One global ascending sort of the day table; the scan strategy
        // walks this order and the sort strategy reproduces it per row.
        let days = agg.days();
        let mut day_order: Vec<u32> = (0..days.len() as u32).collect();
        day_order.sort_unstable_by_key(|&did| days[did as usize]);

        out.write_all(b"{")?;
        let mut first_path = true;
        for &pid in agg.paths_in_order() {
            let Some(row) = agg.row(pid) else { continue };
            if row.is_empty() {
                continue;
            }
            let Some(escaped) = self.catalog.escaped(pid) else {
                continue;
            };

            if first_path {
                first_path = false;
            } else {
                out.write_all(b",")?;
            }
            write!(out, "\n    \"{escaped}\": {{")?;
            self.write_row(&mut out, row, days, &day_order)?;
            out.write_all(b"}")?;
        }
        out.write_all(b"\n}")?;
        out.flush()?;
        Ok(())
    }

    fn write_row(
        &self,
        out: &mut impl Write,
        row: &AHashMap<u32, u64>,
        days: &[DayKey],
        day_order: &[u32],
    ) -> Result<()> {
        let sort_row = match self.strategy {
            OutputStrategy::Sort => true,
            OutputStrategy::Scan => false,
            OutputStrategy::Hybrid => 2 * row.len() < days.len(),
        };

        let mut first_day = true;
        if sort_row {
            let mut entries: Vec<(DayKey, u64)> = row
                .iter()
                .map(|(&did, &count)| (days[did as usize], count))
                .collect();
            entries.sort_unstable_by_key(|&(day, _)| day);
            for (day, count) in entries {
                write_day(out, &mut first_day, &day, count)?;
            }
        } else {
            for &did in day_order {
                if let Some(&count) = row.get(&did) {
                    write_day(out, &mut first_day, &days[did as usize], count)?;
                }
            }
        }

        if !first_day {
            out.write_all(b"\n    ")?;
        }
        Ok(())
    }
}

fn write_day(out: &mut impl Write, first: &mut bool, day: &DayKey, count: u64) -> Result<()> {
    if *first {
        *first = false;
    } else {
        out.write_all(b",")?;
    }
    out.write_all(b"\n        \"")?;
    out.write_all(day)?;
    write!(out, "\": {count}")?;
    Ok(())
}
