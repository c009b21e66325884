#![allow(missing_docs)]

use std::fs;

use parlog::emitter::JsonEmitter;
use parlog::{Merger, OutputStrategy, PartialAggregate, PathCatalog, Result};

fn day(s: &str) -> [u8; 10] {
    s.as_bytes().try_into().expect("day keys are 10 bytes")
}

fn catalog() -> PathCatalog {
    PathCatalog::from_pairs([
        (0, "https://stitcher.io/a".to_string()),
        (1, "https://stitcher.io/blog/post".to_string()),
    ])
}

/// A sparse row next to a dense one, so the hybrid strategy takes both
/// branches in one document.
fn sample_aggregate() -> parlog::GlobalAggregate {
    let mut part = PartialAggregate::empty(2);
    part.order.push(1);
    part.order.push(0);
    for (i, d) in ["2026-01-27", "2026-01-24", "2026-01-26", "2026-01-25"]
        .iter()
        .enumerate()
    {
        part.days.push(day(d));
        // Path 1 is dense: one count on every day.
        part.matrix[1].insert(i as u32, (i + 1) as u64);
    }
    // Path 0 is sparse: a single day.
    part.matrix[0].insert(1, 9);

    let mut merger = Merger::new(2);
    merger.absorb(part);
    merger.finish()
}

const EXPECTED: &str = concat!(
    "{\n",
    "    \"\\/blog\\/post\": {\n",
    "        \"2026-01-24\": 2,\n",
    "        \"2026-01-25\": 4,\n",
    "        \"2026-01-26\": 3,\n",
    "        \"2026-01-27\": 1\n",
    "    },\n",
    "    \"\\/a\": {\n",
    "        \"2026-01-24\": 9\n",
    "    }\n",
    "}"
);

/// All three strategies produce identical bytes; they only differ in how
/// the ascending day order is obtained.
#[test]
fn strategies_agree_byte_for_byte() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let agg = sample_aggregate();
    let cat = catalog();

    for strategy in [
        OutputStrategy::Sort,
        OutputStrategy::Scan,
        OutputStrategy::Hybrid,
    ] {
        let output = dir.path().join("out.json");
        JsonEmitter::new(&cat, strategy, 64 * 1024).write_to(&output, &agg)?;
        assert_eq!(
            fs::read_to_string(&output)?,
            EXPECTED,
            "strategy {strategy:?} diverged"
        );
    }
    Ok(())
}

#[test]
fn empty_catalog_writes_bare_braces() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let output = dir.path().join("out.json");
    let cat = PathCatalog::from_pairs(std::iter::empty());
    let agg = Merger::new(0).finish();

    JsonEmitter::new(&cat, OutputStrategy::Hybrid, 64 * 1024).write_to(&output, &agg)?;

    assert_eq!(fs::read_to_string(&output)?, "{}");
    Ok(())
}

#[test]
fn empty_aggregate_writes_open_close() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let output = dir.path().join("out.json");
    let cat = catalog();
    let agg = Merger::new(cat.len()).finish();

    JsonEmitter::new(&cat, OutputStrategy::Hybrid, 64 * 1024).write_to(&output, &agg)?;

    assert_eq!(fs::read_to_string(&output)?, "{\n}");
    Ok(())
}

/// An unwritable output path surfaces as an I/O error.
#[test]
fn unwritable_output_is_an_error() {
    let cat = catalog();
    let agg = Merger::new(cat.len()).finish();
    let result = JsonEmitter::new(&cat, OutputStrategy::Hybrid, 64 * 1024)
        .write_to(std::path::Path::new("/nonexistent/dir/out.json"), &agg);
    assert!(matches!(result, Err(parlog::ParlogError::Io(_))));
}
