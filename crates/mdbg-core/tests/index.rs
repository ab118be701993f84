//! Tests for the symbol-file block index.

mod common;

use common::{fixture_file, write_temp, BAD_LABEL, INIT_LABEL, JS_LABEL, MAIN_LABEL};
use mdbg_core::{MdbgError, SymbolIndex};

#[test]
fn test_index_completeness()
{
    let file = fixture_file();
    let index = SymbolIndex::build(file.path()).unwrap();

    assert_eq!(index.len(), 4);
    for label in [MAIN_LABEL, BAD_LABEL, INIT_LABEL, JS_LABEL] {
        let entry = index.entry(label).unwrap_or_else(|| panic!("missing {label}"));
        assert_eq!(entry.label, label);
        assert!(entry.start_offset < entry.end_offset);
    }
}

#[test]
fn test_entry_positions()
{
    let file = fixture_file();
    let index = SymbolIndex::build(file.path()).unwrap();

    // The fixture opens with one comment line, so the first label sits on
    // line 2 at the byte offset right after it.
    let main = index.entry(MAIN_LABEL).unwrap();
    assert_eq!(main.start_line, 2);
    assert_eq!(main.start_offset, "// Maple debug listing\n".len() as u64);

    let bad = index.entry(BAD_LABEL).unwrap();
    assert_eq!(bad.start_line, 23);
    assert!(bad.start_offset > main.end_offset);
}

#[test]
fn test_lookup_without_suffix()
{
    let file = fixture_file();
    let index = SymbolIndex::build(file.path()).unwrap();

    let bare = MAIN_LABEL.strip_suffix("_mirbin_info").unwrap();
    let entry = index.entry(bare).unwrap();
    assert_eq!(entry.label, MAIN_LABEL);
}

#[test]
fn test_unknown_label_is_none()
{
    let file = fixture_file();
    let index = SymbolIndex::build(file.path()).unwrap();
    assert!(index.entry("Lno_2Fsuch_3B_7Cfn_7C_28_29V_mirbin_info").is_none());
}

#[test]
fn test_empty_file_builds_empty_index()
{
    let file = write_temp("// nothing here\n");
    let index = SymbolIndex::build(file.path()).unwrap();
    assert!(index.is_empty());
}

#[test]
fn test_unbalanced_markers_are_corrupt()
{
    let file = write_temp(
        "Lone_7Cf_7C_28_29V_mirbin_info:\n\
         \x20   .long 8\n\
         \x20   .byte OP_return, 0x0, 0x00, 0x00    // 0000: return\n\
         \x20   .cfi_endproc\n\
         Ltwo_7Cg_7C_28_29V_mirbin_info:\n\
         \x20   .long 8\n",
    );

    match SymbolIndex::build(file.path()) {
        Err(MdbgError::CorruptIndex { detail, .. }) => {
            assert!(detail.contains("2 labels"), "unexpected detail: {detail}");
        }
        other => panic!("expected CorruptIndex, got {other:?}"),
    }
}

#[test]
fn test_missing_file_is_io_error()
{
    let result = SymbolIndex::build(std::path::Path::new("/nonexistent/libcore.s"));
    assert!(matches!(result, Err(MdbgError::Io(_))));
}
