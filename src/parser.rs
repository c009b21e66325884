//! The slice parser: bounded chunked reads and the per-line fast path.
//!
//! A slice is a byte range `[start, end)` whose boundaries coincide with
//! record boundaries (see the splitter). The parser reads the range in
//! chunks of at most the configured read-chunk size, carrying the incomplete
//! tail of each chunk into the next, and splits complete lines on `\n` only
//! up to the last newline found per chunk: one `memrchr` per chunk instead
//! of a scan per record.
//!
//! The per-line fast path exploits the record's fixed shape: a 19-byte
//! prefix, a variable path, a comma, and a 25-byte timestamp. The path is
//! `line[19 .. len-26]` and the day is the first 10 bytes of the timestamp
//! at `line[len-25 ..]`, with no per-character field scanning. Neither the
//! prefix bytes nor the comma are verified; the catalog lookup on the
//! extracted path bytes is the sole validity filter beyond the length check,
//! and lines that fail it are skipped without a trace.
//!
//! I/O failures are absorbed: an open or seek error yields an empty
//! aggregate, a mid-stream read error terminates the loop and returns
//! whatever was accumulated.

use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use ahash::AHashMap;
use memchr::memrchr;

use crate::aggregate::{DayKey, PartialAggregate};
use crate::catalog::PathCatalog;
use crate::config::PREFIX;

const TIMESTAMP_LEN: usize = 25;
const DAY_LEN: usize = 10;
/// Shortest line that can carry a record: prefix + comma + timestamp, with
/// a zero-length path. Such a line is itself skipped (the path must be
/// non-empty), so valid lines are strictly longer.
const MIN_RECORD_LEN: usize = PREFIX.len() + 1 + TIMESTAMP_LEN;

/// Parses one byte range of the input file into a [`PartialAggregate`].
#[derive(Debug, Clone, Copy)]
pub struct SliceParser<'a> {
    catalog: &'a PathCatalog,
    read_chunk: usize,
    read_buffer: usize,
}

impl<'a> SliceParser<'a> {
    /// A parser over `catalog` with a read-chunk size and an advisory
    /// read-buffer size (`0` = no extra buffering; both already clamped by
    /// the options layer).
    pub fn new(catalog: &'a PathCatalog, read_chunk: usize, read_buffer: usize) -> Self {
        Self {
            catalog,
            read_chunk,
            read_buffer,
        }
    }

    /// Reads `[start, end)` of `input` and returns the slice summary.
    pub fn parse(&self, input: &Path, start: u64, end: u64) -> PartialAggregate {
        let mut slice = SliceState::new(self.catalog);
        if start >= end {
            return slice.finish();
        }

        let mut file = match File::open(input) {
            Ok(f) => f,
            Err(_) => return slice.finish(),
        };
        let file_len = file.metadata().map(|m| m.len()).unwrap_or(end);
        if file.seek(SeekFrom::Start(start)).is_err() {
            return slice.finish();
        }
        let mut reader: Box<dyn Read> = if self.read_buffer > 0 {
            Box::new(BufReader::with_capacity(self.read_buffer, file))
        } else {
            Box::new(file)
        };

        let chunk_size = self.read_chunk.max(1);
        let mut chunk = vec![0u8; chunk_size];
        let mut carry: Vec<u8> = Vec::new();
        let mut remaining = end - start;

        while remaining > 0 {
            let want = (remaining.min(chunk_size as u64)) as usize;
            let n = match reader.read(&mut chunk[..want]) {
                Ok(0) => break,
                Ok(n) => n,
                Err(_) => break,
            };
            remaining -= n as u64;

            carry.extend_from_slice(&chunk[..n]);
            if let Some(last_nl) = memrchr(b'\n', &carry) {
                for line in carry[..last_nl].split(|&b| b == b'\n') {
                    slice.record(line);
                }
                carry.drain(..=last_nl);
            }
        }

        if !carry.is_empty() {
            // Line-aligned cuts mean a dangling tail can only be the final
            // unterminated line of the file.
            debug_assert!(end >= file_len, "carry left over before end of file");
            slice.record(&carry);
        }

        slice.finish()
    }
}

/// Per-slice parse state: the aggregate under construction plus the
/// bookkeeping that is not part of the serialized value.
struct SliceState<'a> {
    catalog: &'a PathCatalog,
    seen: Vec<bool>,
    day_ids: AHashMap<DayKey, u32>,
    agg: PartialAggregate,
}

impl<'a> SliceState<'a> {
    fn new(catalog: &'a PathCatalog) -> Self {
        Self {
            catalog,
            seen: vec![false; catalog.len()],
            day_ids: AHashMap::new(),
            agg: PartialAggregate::empty(catalog.len()),
        }
    }

    /// Processes one line (newline excluded).
    #[inline]
    fn record(&mut self, line: &[u8]) {
        let len = line.len();
        if len <= MIN_RECORD_LEN {
            return;
        }
        let path_len = len - MIN_RECORD_LEN;

        let path = &line[PREFIX.len()..PREFIX.len() + path_len];
        let Some(pid) = self.catalog.id_of(path) else {
            return;
        };

        let mut day: DayKey = [0; DAY_LEN];
        day.copy_from_slice(&line[len - TIMESTAMP_LEN..len - TIMESTAMP_LEN + DAY_LEN]);

        let slot = pid as usize;
        if let Some(seen) = self.seen.get_mut(slot) {
            if !*seen {
                *seen = true;
                self.agg.order.push(pid);
            }
        } else {
            return;
        }

        let did = match self.day_ids.get(&day) {
            Some(&did) => did,
            None => {
                let did = self.agg.days.len() as u32;
                self.agg.days.push(day);
                self.day_ids.insert(day, did);
                did
            }
        };

        if let Some(row) = self.agg.matrix.get_mut(slot) {
            *row.entry(did).or_insert(0) += 1;
        }
    }

    fn finish(self) -> PartialAggregate {
        self.agg
    }
}
