//! Dynamic section fold and the address correction heuristic.

use dynsym::abi::{DT_GNU_HASH, DT_HASH, DT_NULL, DT_STRTAB, DT_SYMTAB};
use dynsym::dynamic::{ElfRawDynamic, correct_address};
use dynsym::{Dyn, Error};
use rstest::rstest;

fn entry(tag: i64, value: u64) -> Dyn {
    Dyn {
        d_tag: tag as _,
        d_un: value as _,
    }
}

#[rstest]
fn first_occurrence_of_a_tag_wins() {
    let entries = [
        entry(DT_SYMTAB, 0x100),
        entry(DT_SYMTAB, 0x200),
        entry(DT_STRTAB, 0x300),
        entry(DT_HASH, 0x400),
        entry(DT_NULL, 0),
    ];
    let raw = ElfRawDynamic::new(entries.as_ptr(), entries.len()).unwrap();
    let dynamic = raw.finish(0x10000);
    assert_eq!(dynamic.symtab, 0x10100);
    assert_eq!(dynamic.strtab, 0x10300);
    assert_eq!(dynamic.hash, Some(0x10400));
    assert_eq!(dynamic.gnu_hash, None);
}

#[rstest]
fn null_tag_terminates_the_scan() {
    let entries = [
        entry(DT_SYMTAB, 0x100),
        entry(DT_STRTAB, 0x300),
        entry(DT_HASH, 0x400),
        entry(DT_NULL, 0),
        entry(DT_GNU_HASH, 0x500),
    ];
    let raw = ElfRawDynamic::new(entries.as_ptr(), entries.len()).unwrap();
    let dynamic = raw.finish(0x10000);
    assert_eq!(dynamic.gnu_hash, None);
}

#[rstest]
fn declared_size_bounds_the_scan_without_terminator() {
    let entries = [
        entry(DT_SYMTAB, 0x100),
        entry(DT_STRTAB, 0x300),
        entry(DT_HASH, 0x400),
        entry(DT_GNU_HASH, 0x500),
    ];
    // Only the first three entries fall inside the declared segment size.
    let raw = ElfRawDynamic::new(entries.as_ptr(), 3).unwrap();
    let dynamic = raw.finish(0x10000);
    assert_eq!(dynamic.hash, Some(0x10400));
    assert_eq!(dynamic.gnu_hash, None);
}

#[rstest]
fn raw_record_is_debug_printable() {
    let entries = [
        entry(DT_SYMTAB, 0x100),
        entry(DT_STRTAB, 0x300),
        entry(DT_HASH, 0x400),
        entry(DT_NULL, 0),
    ];
    let raw = ElfRawDynamic::new(entries.as_ptr(), entries.len()).unwrap();
    assert!(format!("{raw:?}").contains("symtab_off"));
}

#[rstest]
fn missing_string_table_is_an_error() {
    let entries = [
        entry(DT_SYMTAB, 0x100),
        entry(DT_HASH, 0x400),
        entry(DT_NULL, 0),
    ];
    let err = ElfRawDynamic::new(entries.as_ptr(), entries.len()).unwrap_err();
    assert!(matches!(err, Error::MissingRequiredTable { .. }));
}

#[rstest]
fn missing_both_hash_sections_is_an_error() {
    let entries = [
        entry(DT_SYMTAB, 0x100),
        entry(DT_STRTAB, 0x300),
        entry(DT_NULL, 0),
    ];
    let err = ElfRawDynamic::new(entries.as_ptr(), entries.len()).unwrap_err();
    assert!(matches!(err, Error::MissingRequiredTable { .. }));
}

#[rstest]
fn finish_applies_the_correction_heuristic() {
    // One value below the base (relative) and one above it (absolute).
    let entries = [
        entry(DT_SYMTAB, 0x9000),
        entry(DT_STRTAB, 0x500),
        entry(DT_HASH, 0x400),
        entry(DT_NULL, 0),
    ];
    let raw = ElfRawDynamic::new(entries.as_ptr(), entries.len()).unwrap();
    let dynamic = raw.finish(0x1000);
    assert_eq!(dynamic.symtab, 0x9000);
    assert_eq!(dynamic.strtab, 0x1500);
}

#[rstest]
#[case(0x1000, 0x0500, 0x1500)]
#[case(0x1000, 0x9000, 0x9000)]
fn correction_rule_is_exact(#[case] base: usize, #[case] raw: usize, #[case] expected: usize) {
    assert_eq!(correct_address(base, raw), expected);
}
