//! # Signature Decoding
//!
//! Recovery of formal-argument and local-variable names and types from a
//! function block's header sections.
//!
//! The header is a strict, ordered sequence: label line, encoded-size
//! directive, storage-info counts, then (only when the counts are non-zero)
//! a type section and a name section for formals and locals, each opened by
//! a literal marker comment. The decoder is a state machine that consumes
//! exactly this sequence; any missing or out-of-order marker aborts with
//! `None` without touching lines that belong to the next block, so one
//! malformed function never poisons its neighbors.
//!
//! Dynamically typed functions carry a degenerate header: the counts line is
//! marked `upFormalSize, frameSize, evalStackDepth, funcAttrs` and declares
//! frame byte sizes instead of slot counts, and no name or type sections
//! follow. For those, counts are derived from the sizes and names are
//! synthesized (`%par1..`, `%var1..`) with the catch-all `dynany` type.

use std::path::Path;

use super::{
    LineCursor, DYN_STORAGE_INFO_MARKER, FORMAL_NAMES_MARKER, FORMAL_TYPES_MARKER, LOCAL_NAMES_MARKER,
    LOCAL_TYPES_MARKER, STORAGE_INFO_MARKER, WORD_DIRECTIVE,
};
use crate::error::Result;
use crate::types::PrimType;

/// Decoded call signature of one compiled function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionSignature
{
    /// Primitive type of each formal argument, in declaration order.
    pub formals_type: Vec<PrimType>,
    /// Name of each formal argument, in declaration order.
    pub formals_name: Vec<String>,
    /// Primitive type of each local variable, in declaration order.
    pub locals_type: Vec<PrimType>,
    /// Name of each local variable, in declaration order.
    pub locals_name: Vec<String>,
    /// Operand-stack depth declared in the header.
    pub eval_depth: u32,
    /// Method attribute flags declared in the header.
    pub method_flags: u32,
}

impl FunctionSignature
{
    /// Number of formal arguments.
    #[must_use]
    pub fn formals_count(&self) -> usize
    {
        self.formals_name.len()
    }

    /// Number of local variables.
    #[must_use]
    pub fn locals_count(&self) -> usize
    {
        self.locals_name.len()
    }
}

/// Decode the signature header of the block starting at `start_offset`.
///
/// `label` is re-checked against the block's first line as a cheap guard
/// against a stale index. Returns `Ok(None)` for any malformed or
/// unsupported header layout.
///
/// ## Errors
///
/// Only `Io`; malformed headers are `Ok(None)`.
pub fn decode(path: &Path, label: &str, start_offset: u64) -> Result<Option<FunctionSignature>>
{
    let mut cursor = LineCursor::open_at(path, start_offset, 1)?;

    // Label confirmation.
    let Some(record) = cursor.next_line()? else {
        return Ok(None);
    };
    if !record.text.contains(label) {
        return Ok(None);
    }

    // Encoded-size directive.
    let Some(record) = cursor.next_line()? else {
        return Ok(None);
    };
    if !record.text.contains(WORD_DIRECTIVE) {
        return Ok(None);
    }

    // Storage-info counts.
    let Some(record) = cursor.next_line()? else {
        return Ok(None);
    };
    let counts_line = record.text;
    if !counts_line.trim_start().starts_with(".byte") {
        return Ok(None);
    }
    let Some(counts) = parse_counts(&counts_line) else {
        return Ok(None);
    };

    if counts_line.contains(DYN_STORAGE_INFO_MARKER) {
        return Ok(Some(synthesize_dynamic(counts)));
    }
    if !counts_line.contains(STORAGE_INFO_MARKER) {
        return Ok(None);
    }

    let [formals_num, locals_num, eval_depth, method_flags] = counts;
    let formals_num = formals_num as usize;
    let locals_num = locals_num as usize;

    let Some(formals_type) = read_type_section(&mut cursor, FORMAL_TYPES_MARKER, formals_num)? else {
        return Ok(None);
    };
    let Some(locals_type) = read_type_section(&mut cursor, LOCAL_TYPES_MARKER, locals_num)? else {
        return Ok(None);
    };
    let Some(formals_name) = read_name_section(&mut cursor, FORMAL_NAMES_MARKER, formals_num)? else {
        return Ok(None);
    };
    let Some(locals_name) = read_name_section(&mut cursor, LOCAL_NAMES_MARKER, locals_num)? else {
        return Ok(None);
    };

    Ok(Some(FunctionSignature {
        formals_type,
        formals_name,
        locals_type,
        locals_name,
        eval_depth,
        method_flags,
    }))
}

/// Parse the 2nd-5th whitespace-delimited tokens of a counts line.
fn parse_counts(text: &str) -> Option<[u32; 4]>
{
    let mut tokens = text.split_whitespace().skip(1);
    let mut counts = [0u32; 4];
    for slot in &mut counts {
        *slot = tokens.next()?.trim_end_matches(',').parse().ok()?;
    }
    Some(counts)
}

/// Build the degenerate dynamic-language signature from frame byte sizes.
///
/// The frame layout reserves one 8-byte slot per formal/local plus one
/// bookkeeping slot, hence `size / 8 - 1`.
fn synthesize_dynamic(counts: [u32; 4]) -> FunctionSignature
{
    let [up_formal_size, frame_size, eval_depth, method_flags] = counts;
    let formals_num = (up_formal_size / 8).saturating_sub(1) as usize;
    let locals_num = (frame_size / 8).saturating_sub(1) as usize;

    FunctionSignature {
        formals_type: vec![PrimType::DynAny; formals_num],
        formals_name: (1..=formals_num).map(|i| format!("%par{i}")).collect(),
        locals_type: vec![PrimType::DynAny; locals_num],
        locals_name: (1..=locals_num).map(|i| format!("%var{i}")).collect(),
        eval_depth,
        method_flags,
    }
}

/// Consume a marker line and `count` type-index lines.
///
/// Returns `Ok(None)` on a missing marker or an unparsable/out-of-range
/// index. A zero count consumes nothing, not even a marker.
fn read_type_section(cursor: &mut LineCursor, marker: &str, count: usize) -> Result<Option<Vec<PrimType>>>
{
    if count == 0 {
        return Ok(Some(Vec::new()));
    }

    let Some(record) = cursor.next_line()? else {
        return Ok(None);
    };
    if !record.text.contains(marker) {
        return Ok(None);
    }

    let mut types = Vec::with_capacity(count);
    for _ in 0..count {
        let Some(record) = cursor.next_line()? else {
            return Ok(None);
        };
        let Some(index) = parse_type_index(&record.text) else {
            return Ok(None);
        };
        let Some(prim) = PrimType::from_index(index) else {
            return Ok(None);
        };
        types.push(prim);
    }
    Ok(Some(types))
}

/// Consume a marker line and `count` quoted-name lines.
fn read_name_section(cursor: &mut LineCursor, marker: &str, count: usize) -> Result<Option<Vec<String>>>
{
    if count == 0 {
        return Ok(Some(Vec::new()));
    }

    let Some(record) = cursor.next_line()? else {
        return Ok(None);
    };
    if !record.text.contains(marker) {
        return Ok(None);
    }

    let mut names = Vec::with_capacity(count);
    for _ in 0..count {
        let Some(record) = cursor.next_line()? else {
            return Ok(None);
        };
        let Some(name) = parse_quoted_name(&record.text) else {
            return Ok(None);
        };
        names.push(name);
    }
    Ok(Some(names))
}

/// Extract the hexadecimal table index from a `.byte 0x..` line.
fn parse_type_index(text: &str) -> Option<usize>
{
    let token = text
        .split_whitespace()
        .find_map(|token| token.trim_end_matches(',').strip_prefix("0x"))?;
    usize::from_str_radix(token, 16).ok()
}

/// Extract the name from a quoted, NUL-terminated `.ascii` literal.
///
/// The name is everything after the first `"` up to the first `\0` escape.
fn parse_quoted_name(text: &str) -> Option<String>
{
    let (_, quoted) = text.split_once('"')?;
    let (name, _) = quoted.split_once("\\0")?;
    Some(name.to_string())
}
