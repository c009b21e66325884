#![allow(missing_docs)]

use parlog::{Merger, PartialAggregate};

fn day(s: &str) -> [u8; 10] {
    s.as_bytes().try_into().expect("day keys are 10 bytes")
}

/// Two slices discovering the same days in different local orders: the
/// global day table keeps first-absorbed order and counts sum under the
/// remap.
#[test]
fn day_ids_are_remapped_per_slice() {
    let mut a = PartialAggregate::empty(2);
    a.order.push(0);
    a.days.push(day("2026-01-25")); // local 0
    a.days.push(day("2026-01-24")); // local 1
    a.matrix[0].insert(0, 3);
    a.matrix[0].insert(1, 1);

    let mut b = PartialAggregate::empty(2);
    b.order.push(1);
    b.order.push(0);
    b.days.push(day("2026-01-24")); // local 0 -> global 1
    b.days.push(day("2026-01-25")); // local 1 -> global 0
    b.matrix[0].insert(0, 2);
    b.matrix[1].insert(1, 5);

    let mut merger = Merger::new(2);
    merger.absorb(a);
    merger.absorb(b);
    let global = merger.finish();

    // Global day ids follow slice-a discovery order.
    assert_eq!(global.days(), &[day("2026-01-25"), day("2026-01-24")]);
    // Path order is first-seen across slices in absorb order.
    assert_eq!(global.paths_in_order(), &[0, 1]);

    assert_eq!(global.count(0, 0), 3); // path 0, 2026-01-25, slice a only
    assert_eq!(global.count(0, 1), 3); // path 0, 2026-01-24, 1 + 2
    assert_eq!(global.count(1, 0), 5); // path 1, 2026-01-25, slice b
    assert_eq!(global.total(0), 6);
    assert_eq!(global.total(1), 5);
}

/// Absorb order defines path order, not path id.
#[test]
fn path_order_is_first_seen() {
    let mut a = PartialAggregate::empty(3);
    a.order.push(2);
    a.days.push(day("2026-01-24"));
    a.matrix[2].insert(0, 1);

    let mut b = PartialAggregate::empty(3);
    b.order.push(0);
    b.order.push(2);
    b.days.push(day("2026-01-24"));
    b.matrix[0].insert(0, 1);
    b.matrix[2].insert(0, 1);

    let mut merger = Merger::new(3);
    merger.absorb(a);
    merger.absorb(b);
    let global = merger.finish();

    assert_eq!(global.paths_in_order(), &[2, 0]);
    assert_eq!(global.count(2, 0), 2);
}

/// Entries pointing outside the catalog (a corrupt or foreign worker file)
/// are dropped instead of corrupting the merge.
#[test]
fn out_of_range_entries_are_ignored() {
    let mut bogus = PartialAggregate::empty(1);
    bogus.order.push(7); // beyond the catalog
    bogus.days.push(day("2026-01-24"));
    bogus.matrix[0].insert(0, 2);
    bogus.matrix[0].insert(9, 4); // local day id with no table entry

    let mut merger = Merger::new(1);
    merger.absorb(bogus);
    let global = merger.finish();

    assert_eq!(global.paths_in_order(), &[] as &[u32]);
    assert_eq!(global.count(0, 0), 2);
    assert_eq!(global.total(0), 2);
}

#[test]
fn empty_partials_merge_to_empty() {
    let mut merger = Merger::new(4);
    for _ in 0..3 {
        merger.absorb(PartialAggregate::empty(4));
    }
    let global = merger.finish();
    assert!(global.paths_in_order().is_empty());
    assert!(global.days().is_empty());
}
