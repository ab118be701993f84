//! Tests for pc-offset to source-line resolution.

mod common;

use common::{fixture_file, write_temp, INIT_LABEL, JS_LABEL, MAIN_LABEL};
use mdbg_core::asm::correlate;
use mdbg_core::{PcOffset, SourceAnnotation, SymbolIndex};

#[test]
fn test_direct_hit_uses_nearest_preceding_annotation()
{
    let file = fixture_file();
    let index = SymbolIndex::build(file.path()).unwrap();
    let block = index.entry(MAIN_LABEL).unwrap();

    // Two annotations precede pc 0008; the nearest one wins.
    let hit = correlate::resolve(file.path(), block, PcOffset::new(0x8)).unwrap().unwrap();
    assert_eq!(hit.file.as_deref(), Some("Hello.java"));
    assert_eq!(hit.line, 12);
    assert_eq!(hit.inst_index.as_deref(), Some("2"));
    assert_eq!(hit.found_at_line, 19);

    // And the first annotation still covers the earlier instructions.
    let hit = correlate::resolve(file.path(), block, PcOffset::new(0x4)).unwrap().unwrap();
    assert_eq!(hit.file.as_deref(), Some("Hello.java"));
    assert_eq!(hit.line, 10);
    assert_eq!(hit.found_at_line, 17);
}

#[test]
fn test_clinit_sentinel_maps_to_minus_one()
{
    let file = fixture_file();
    let index = SymbolIndex::build(file.path()).unwrap();
    let block = index.entry(JS_LABEL).unwrap();

    let hit = correlate::resolve(file.path(), block, PcOffset::ENTRY).unwrap().unwrap();
    assert_eq!(hit.file, None);
    assert_eq!(hit.line, -1);
}

#[test]
fn test_unannotated_hit_maps_to_zero()
{
    let file = fixture_file();
    let index = SymbolIndex::build(file.path()).unwrap();
    let block = index.entry(INIT_LABEL).unwrap();

    let hit = correlate::resolve(file.path(), block, PcOffset::ENTRY).unwrap().unwrap();
    assert_eq!(hit.file, None);
    assert_eq!(hit.line, 0);
}

#[test]
fn test_deferred_stop_lands_on_following_opcode()
{
    let file = fixture_file();
    let index = SymbolIndex::build(file.path()).unwrap();
    let block = index.entry(MAIN_LABEL).unwrap();

    // Pc 000c falls on the `.long 84` immediate; the stop is deferred to
    // the `.byte OP_return` line after it.
    let hit = correlate::resolve(file.path(), block, PcOffset::new(0xc)).unwrap().unwrap();
    assert_eq!(hit.found_at_line, 21);
    assert_eq!(hit.file.as_deref(), Some("Hello.java"));
    assert_eq!(hit.line, 12);
}

#[test]
fn test_absent_pc_returns_none()
{
    let file = fixture_file();
    let index = SymbolIndex::build(file.path()).unwrap();
    let block = index.entry(MAIN_LABEL).unwrap();

    let hit = correlate::resolve(file.path(), block, PcOffset::new(0xabc)).unwrap();
    assert!(hit.is_none());
}

#[test]
fn test_continuation_opcode_inherits_previous_pc()
{
    // The OP_wide line carries no operands, so the `.quad` immediately
    // after it must still be predicted from OP_iconst's pc (0004 + 4).
    let file = write_temp(
        "Lcont_7Cf_7C_28_29V_mirbin_info:\n\
         \x20   .long 24\n\
         \x20   .byte 0, 0, 4, 0    // func storage info\n\
         \x20   // LINE Cont.java : 7, INSTIDX : 0\n\
         \x20   .byte OP_iconst, 0x1, 0x04, 0x00    // 0004: iconst\n\
         \x20   .byte OP_wide\n\
         \x20   .quad 1099511627776\n\
         \x20   .byte OP_return, 0x9, 0x10, 0x00    // 0010: return\n\
         \x20   .cfi_endproc\n",
    );
    let index = SymbolIndex::build(file.path()).unwrap();
    let block = index.entry("Lcont_7Cf_7C_28_29V_mirbin_info").unwrap();

    let hit = correlate::resolve(file.path(), block, PcOffset::new(0x8)).unwrap().unwrap();
    assert_eq!(hit.line, 7);
    // Deferred stop: reported on the OP_return line, not the immediate.
    assert_eq!(hit.found_at_line, 8);
}

#[test]
fn test_next_annotation_after_entry()
{
    let file = fixture_file();
    let index = SymbolIndex::build(file.path()).unwrap();
    let block = index.entry(INIT_LABEL).unwrap();

    let hit = correlate::resolve(file.path(), block, PcOffset::ENTRY).unwrap().unwrap();
    let (file_name, line) = correlate::next_annotation(file.path(), hit.found_at_line, hit.found_at_offset).unwrap();
    assert_eq!(file_name.as_deref(), Some("Hello.java"));
    assert_eq!(line, Some(3));
}

#[test]
fn test_next_annotation_window_is_bounded()
{
    let mut content = String::from("Lfar_7Cf_7C_28_29V_mirbin_info:\n    .long 64\n");
    content.push_str("    .byte OP_call, 0x0, 0x00, 0x00    // 0000: call\n");
    for pc in 1..10u32 {
        content.push_str(&format!(
            "    .byte OP_nop, 0x0, 0x{:02x}, 0x00    // {:04x}: nop\n",
            pc * 4,
            pc * 4
        ));
    }
    content.push_str("    // LINE Far.java : 99, INSTIDX : 10\n");
    content.push_str("    .byte OP_return, 0x0, 0x28, 0x00    // 0028: return\n");
    content.push_str("    .cfi_endproc\n");
    let file = write_temp(&content);

    let index = SymbolIndex::build(file.path()).unwrap();
    let block = index.entry("Lfar_7Cf_7C_28_29V_mirbin_info").unwrap();
    let hit = correlate::resolve(file.path(), block, PcOffset::ENTRY).unwrap().unwrap();

    // Ten opcode lines separate the hit from the annotation; the bounded
    // window must give up rather than walk the whole block.
    let (file_name, line) = correlate::next_annotation(file.path(), hit.found_at_line, hit.found_at_offset).unwrap();
    assert_eq!(file_name, None);
    assert_eq!(line, None);
}

#[test]
fn test_annotation_change_pauses_before_next_opcode()
{
    let file = fixture_file();
    let index = SymbolIndex::build(file.path()).unwrap();
    let block = index.entry(MAIN_LABEL).unwrap();

    let current = SourceAnnotation {
        file: "Hello.java".to_string(),
        line: 10,
        inst_index: "0".to_string(),
    };

    // After the pc 0004 hit the next line is the `: 12` annotation.
    let hit = correlate::resolve(file.path(), block, PcOffset::new(0x4)).unwrap().unwrap();
    let changed =
        correlate::annotation_changes_before_next_opcode(file.path(), hit.found_at_line, hit.found_at_offset, Some(&current))
            .unwrap();
    assert!(changed);

    // After the pc 0000 hit the next line is another opcode on the same
    // source line: no pause.
    let hit = correlate::resolve(file.path(), block, PcOffset::ENTRY).unwrap().unwrap();
    let changed =
        correlate::annotation_changes_before_next_opcode(file.path(), hit.found_at_line, hit.found_at_offset, Some(&current))
            .unwrap();
    assert!(!changed);
}

#[test]
fn test_no_pause_at_block_end()
{
    let file = fixture_file();
    let index = SymbolIndex::build(file.path()).unwrap();
    let block = index.entry(MAIN_LABEL).unwrap();

    // The pc 0010 hit is the last instruction; only the end marker follows.
    let hit = correlate::resolve(file.path(), block, PcOffset::new(0x10)).unwrap().unwrap();
    let changed =
        correlate::annotation_changes_before_next_opcode(file.path(), hit.found_at_line, hit.found_at_offset, None).unwrap();
    assert!(!changed);
}
