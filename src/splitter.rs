//! Byte-range partitioning aligned to record boundaries.
//!
//! For W workers the splitter produces W+1 offsets: `cuts[0] = 0`,
//! `cuts[W] = S`, and each interior cut is the first byte after the first
//! newline at or past `i * (S / W)`. Two probes landing inside the same line
//! resolve to the same newline, so cuts are naturally non-decreasing and
//! every complete record lands in exactly one slice.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use memchr::memchr;

const PROBE_CHUNK: usize = 64 * 1024;

/// Computes the slice boundaries for `workers` workers over a file of
/// `size` bytes.
///
/// If the file cannot be opened, the interior cuts collapse to `size`,
/// leaving a single effective slice `[0, size)` and empty trailers. Probe
/// errors mid-file degrade the same way; monotonicity is preserved
/// regardless.
pub fn split_offsets(path: &Path, size: u64, workers: usize) -> Vec<u64> {
    let mut cuts = Vec::with_capacity(workers + 1);
    cuts.push(0u64);

    if workers > 1 {
        match File::open(path) {
            Ok(mut file) => {
                let stride = size / workers as u64;
                let mut probe = vec![0u8; PROBE_CHUNK];
                for i in 1..workers {
                    let target = i as u64 * stride;
                    let found = next_boundary(&mut file, target, size, &mut probe);
                    let prev = *cuts.last().unwrap_or(&0);
                    cuts.push(found.max(prev));
                }
            }
            Err(_) => {
                // Single effective slice; later workers see empty ranges.
                for _ in 1..workers {
                    cuts.push(size);
                }
            }
        }
    }

    cuts.push(size);
    cuts
}

/// Position of the byte following the first newline at or after `target`.
///
/// A probe landing exactly on a newline consumes that newline. No newline
/// before EOF (or any probe error) yields `size`.
fn next_boundary(file: &mut File, target: u64, size: u64, probe: &mut [u8]) -> u64 {
    if target >= size {
        return size;
    }
    if file.seek(SeekFrom::Start(target)).is_err() {
        return size;
    }

    let mut pos = target;
    loop {
        let n = match file.read(probe) {
            Ok(0) => return size,
            Ok(n) => n,
            Err(_) => return size,
        };
        if let Some(nl) = memchr(b'\n', &probe[..n]) {
            return (pos + nl as u64 + 1).min(size);
        }
        pos += n as u64;
    }
}
