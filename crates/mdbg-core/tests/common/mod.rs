//! Shared synthetic symbol-file fixtures.
#![allow(dead_code)]

use std::io::Write;

use tempfile::NamedTempFile;

/// Statically typed Java method with formals, locals, and annotations.
pub const MAIN_LABEL: &str = "Lexample_2FHello_3B_7Cmain_7C_28ALjava_2Flang_2FString_3B_29V_mirbin_info";

/// Function whose header declares a formal but omits the type section.
pub const BAD_LABEL: &str = "Lexample_2FBad_3B_7Cf_7C_28I_29I_mirbin_info";

/// Constructor whose entry instructions precede the first annotation.
pub const INIT_LABEL: &str = "Lexample_2FHello_3B_7C_3Cinit_3E_7C_28_29V_mirbin_info";

/// Dynamically typed script entry with the degenerate storage header.
pub const JS_LABEL: &str = "__jsmain_mirbin_info";

/// A small but complete symbol file covering all four block shapes.
pub const FIXTURE: &str = r#"// Maple debug listing
Lexample_2FHello_3B_7Cmain_7C_28ALjava_2Flang_2FString_3B_29V_mirbin_info:
    .long 104
    .byte 2, 1, 8, 0    // func storage info
    // PrimType of formal arguments
    .byte 0x4    // i32
    .byte 0xb    // ptr
    // PrimType of automatic variables
    .byte 0x16    // dynany
    // Name of formal arguments
    .ascii "argc\0"
    .ascii "argv\0"
    // Name of automatic variables
    .ascii "tmp\0"
    // LINE Hello.java : 10, INSTIDX : 0
    .byte OP_iload, 0x1, 0x00, 0x00    // 0000: iload
    .byte OP_iconst, 0x2, 0x04, 0x00    // 0004: iconst
    // LINE Hello.java : 12, INSTIDX : 2
    .byte OP_iadd, 0x0, 0x08, 0x00    // 0008: iadd
    .long 84
    .byte OP_return, 0x0, 0x10, 0x00    // 0010: return
    .cfi_endproc
Lexample_2FBad_3B_7Cf_7C_28I_29I_mirbin_info:
    .long 20
    .byte 1, 0, 4, 0    // func storage info
    .byte OP_return, 0x0, 0x00, 0x00    // 0000: return
    .cfi_endproc
Lexample_2FHello_3B_7C_3Cinit_3E_7C_28_29V_mirbin_info:
    .long 40
    .byte 0, 0, 4, 0    // func storage info
    .byte OP_call, 0x0, 0x00, 0x00    // 0000: call
    // LINE Hello.java : 3, INSTIDX : 1
    .byte OP_return, 0x0, 0x04, 0x00    // 0004: return
    .cfi_endproc
__jsmain_mirbin_info:
    .long 48
    .byte 24, 16, 8, 1    // upFormalSize, frameSize, evalStackDepth, funcAttrs
    .byte OP_intrinsiccall, 0x0, 0x00, 0x00    // 0000: MPL_CLINIT_CHECK
    .byte OP_return, 0x0, 0x04, 0x00    // 0004: return
    .cfi_endproc
"#;

/// Write arbitrary content to a fresh temp file.
pub fn write_temp(content: &str) -> NamedTempFile
{
    let mut file = NamedTempFile::new().expect("create temp file");
    file.write_all(content.as_bytes()).expect("write fixture");
    file.flush().expect("flush fixture");
    file
}

/// Write the standard fixture to a fresh temp file.
pub fn fixture_file() -> NamedTempFile
{
    write_temp(FIXTURE)
}
