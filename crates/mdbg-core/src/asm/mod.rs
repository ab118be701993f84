//! # Annotated assembly access
//!
//! The Maple compiler ships its debug information as a pseudo-assembly text
//! listing: one file per compiled library, partitioned into per-function
//! blocks, each annotated with structured comments carrying source lines,
//! signature data, and instruction offsets. This module treats that listing
//! as a serialized debug-info format and provides the decoders over it:
//!
//! - [`index`]: one-pass positional index over the per-function blocks
//! - [`correlate`]: pc-offset to source file/line resolution inside a block
//! - [`signature`]: formal/local name and type recovery from a block header
//! - [`demangle`]: Maple label demangling
//!
//! Everything here is read-only against an immutable file; the scanners keep
//! no state between calls beyond what the caller passes back in.

use std::fs::File;
use std::io::{BufRead, BufReader, Seek, SeekFrom};
use std::path::Path;

use crate::error::Result;

pub mod correlate;
pub mod demangle;
pub mod index;
pub mod signature;

/// Suffix of a function-block label line (without the trailing colon).
pub const SYMBOL_LABEL_SUFFIX: &str = "_mirbin_info";

/// Line terminating a function block.
pub const BLOCK_END_MARKER: &str = ".cfi_endproc";

/// Prefix of a source annotation comment.
pub const SOURCE_LINE_MARKER: &str = "// LINE";

/// Prefix of a byte-encoded instruction line.
pub const OPCODE_PREFIX: &str = ".byte OP_";

/// 4-byte immediate data directive.
pub const WORD_DIRECTIVE: &str = ".long";

/// 8-byte immediate data directive.
pub const DWORD_DIRECTIVE: &str = ".quad";

/// Marker on the implicit class-initializer check the compiler inserts at
/// function entry; such instructions have no source mapping of their own.
pub const CLINIT_MARKER: &str = "MPL_CLINIT_CHECK";

/// Byte distance between consecutive instruction slots.
pub const INSTRUCTION_STRIDE: u32 = 4;

/// Marker on the statically-typed storage-info counts line.
pub const STORAGE_INFO_MARKER: &str = "// func storage info";

/// Marker on the dynamic-language storage-info counts line.
pub const DYN_STORAGE_INFO_MARKER: &str = "// upFormalSize, frameSize, evalStackDepth, funcAttrs";

/// Marker opening the formal-argument type section.
pub const FORMAL_TYPES_MARKER: &str = "// PrimType of formal arguments";

/// Marker opening the local-variable type section.
pub const LOCAL_TYPES_MARKER: &str = "// PrimType of automatic variables";

/// Marker opening the formal-argument name section.
pub const FORMAL_NAMES_MARKER: &str = "// Name of formal arguments";

/// Marker opening the local-variable name section.
pub const LOCAL_NAMES_MARKER: &str = "// Name of automatic variables";

/// One physical line of a symbol file, with its position.
#[derive(Debug, Clone)]
pub(crate) struct LineRecord
{
    /// 1-based line number in the file.
    pub line_no: u32,
    /// Byte offset of the start of the line.
    pub offset: u64,
    /// Line text without the trailing newline.
    pub text: String,
}

/// Buffered line reader that tracks byte offsets and line numbers.
///
/// Every scanner in this module works on `(line_no, offset, text)` triplets
/// so that results can name the exact position a match was found at, and so
/// later queries can resume from that position without rescanning the block.
pub(crate) struct LineCursor
{
    reader: BufReader<File>,
    offset: u64,
    line_no: u32,
}

impl LineCursor
{
    /// Open a file positioned at its first line.
    pub fn open(path: &Path) -> Result<Self>
    {
        Self::open_at(path, 0, 1)
    }

    /// Open a file positioned at a known line start.
    ///
    /// `offset` must be the byte offset of the start of line `line_no`;
    /// the cursor trusts the caller, which always passes back positions a
    /// previous scan produced.
    pub fn open_at(path: &Path, offset: u64, line_no: u32) -> Result<Self>
    {
        let mut file = File::open(path)?;
        if offset > 0 {
            file.seek(SeekFrom::Start(offset))?;
        }
        Ok(Self {
            reader: BufReader::new(file),
            offset,
            line_no,
        })
    }

    /// Read the next line, or `None` at end of file.
    pub fn next_line(&mut self) -> Result<Option<LineRecord>>
    {
        let mut raw = Vec::new();
        let read = self.reader.read_until(b'\n', &mut raw)?;
        if read == 0 {
            return Ok(None);
        }

        let record = LineRecord {
            line_no: self.line_no,
            offset: self.offset,
            text: trimmed_text(&raw),
        };
        self.offset += read as u64;
        self.line_no += 1;
        Ok(Some(record))
    }
}

fn trimmed_text(raw: &[u8]) -> String
{
    let mut text = String::from_utf8_lossy(raw).into_owned();
    while text.ends_with('\n') || text.ends_with('\r') {
        text.pop();
    }
    text
}

/// Whether a line terminates a function block.
pub(crate) fn is_end_marker(text: &str) -> bool
{
    text.trim() == BLOCK_END_MARKER
}

/// Whether a line encodes an executable instruction.
pub(crate) fn is_opcode_line(text: &str) -> bool
{
    text.trim_start().starts_with(OPCODE_PREFIX)
}

/// Whether a line is a non-executable 4- or 8-byte immediate.
pub(crate) fn is_data_directive(text: &str) -> bool
{
    let trimmed = text.trim_start();
    trimmed.starts_with(WORD_DIRECTIVE) || trimmed.starts_with(DWORD_DIRECTIVE)
}

/// Extract the embedded pc hint from a byte-opcode line.
///
/// The last two `0x..` operands of an instruction word are the little-endian
/// 16-bit offset of that instruction. Continuation lines carry fewer
/// operands and yield `None`; the scanner then keeps the previous opcode's
/// offset.
pub(crate) fn embedded_pc_hint(text: &str) -> Option<u32>
{
    let encoding = text.split("//").next().unwrap_or("");
    let operands: Vec<u32> = encoding
        .split(',')
        .skip(1)
        .filter_map(|op| {
            let digits = op.trim().strip_prefix("0x")?;
            u32::from_str_radix(digits, 16).ok()
        })
        .collect();

    if operands.len() < 2 {
        return None;
    }
    let lo = operands[operands.len() - 2] & 0xff;
    let hi = operands[operands.len() - 1] & 0xff;
    Some(lo | (hi << 8))
}
