//! # Source Correlation
//!
//! Resolution of a runtime pc offset to the originating source file/line.
//!
//! Inside a function block the compiler interleaves three kinds of line:
//! source annotations (`// LINE File.java : 10, INSTIDX : 2`), byte-encoded
//! instructions (`.byte OP_iadd, 0x0, 0x0c, 0x00  // 000c: iadd`), and raw
//! data immediates (`.long 84`). Annotations are sparse: the most recently
//! seen one covers every instruction until the next annotation, and a run of
//! instructions may have none at all (native runtime calls carry no source
//! mapping).
//!
//! [`resolve`] walks a block from its start and stops at the first line that
//! hosts the requested pc. Most offsets appear literally in an instruction
//! comment, rendered as a fixed-width four-digit hex token. Offsets that
//! fall on a data immediate never appear textually: immediates carry neither
//! a comment nor an embedded pc hint, so the scanner predicts them from the
//! previous opcode's embedded hint plus the fixed instruction stride, and
//! then reports the *next* executable line as the stop position (a deferred
//! stop; the immediate itself cannot host a breakpoint).

use std::path::Path;

use super::index::SymbolIndexEntry;
use super::{LineCursor, LineRecord, CLINIT_MARKER, INSTRUCTION_STRIDE, SOURCE_LINE_MARKER};
use crate::error::Result;
use crate::types::PcOffset;

/// How many lines [`next_annotation`] inspects before giving up.
///
/// The entry-sentinel fallback only ever needs to hop over the instruction
/// lines immediately at a function's start; the bound keeps malformed input
/// from turning the scan into a whole-block walk.
const ANNOTATION_SCAN_WINDOW: u32 = 6;

/// One `// LINE` annotation, as seen at a scan position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceAnnotation
{
    /// Short name of the originating source file.
    pub file: String,
    /// 1-based source line number.
    pub line: i32,
    /// Index of the first bytecode instruction the annotation covers.
    pub inst_index: String,
}

impl SourceAnnotation
{
    /// Whether two annotations refer to the same source position.
    ///
    /// The instruction index is deliberately ignored: stepping semantics
    /// care about distinct source lines, not distinct bytecode spans.
    #[must_use]
    pub fn same_source(&self, other: &SourceAnnotation) -> bool
    {
        self.line == other.line && self.file == other.file
    }
}

/// Result of resolving a pc offset within a function block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceHit
{
    /// Originating source file, if the hit had a covering annotation.
    pub file: Option<String>,
    /// Source line number; `-1` for the class-initializer sentinel, `0`
    /// when the instruction has no source mapping at all.
    pub line: i32,
    /// 1-based line number of the matched assembly line.
    pub found_at_line: u32,
    /// Byte offset of the start of the matched assembly line; later queries
    /// resume from here instead of rescanning the block.
    pub found_at_offset: u64,
    /// Instruction index from the covering annotation, if any.
    pub inst_index: Option<String>,
}

/// Parse a `// LINE <file> : <line>, INSTIDX : <idx>` comment.
pub(crate) fn parse_annotation(text: &str) -> Option<SourceAnnotation>
{
    let rest = text.trim_start().strip_prefix(SOURCE_LINE_MARKER)?;
    let (source, inst_index) = rest.split_once(", INSTIDX :")?;
    let (file, line) = source.rsplit_once(" : ")?;
    let line = line.trim().parse::<i32>().ok()?;
    Some(SourceAnnotation {
        file: file.trim().to_string(),
        line,
        inst_index: inst_index.trim().to_string(),
    })
}

/// Resolve `pc` inside `block` to the best-known source position.
///
/// Scans `[block.start_offset, block.end_offset)` with a small state
/// machine:
///
/// - annotation lines update the current annotation and are never matched
///   against the pc token (so source text cannot fake a hit);
/// - a line containing the four-digit rendering of `pc` is a direct hit;
/// - byte-opcode lines refresh the last seen embedded pc hint (continuation
///   lines without a parsable hint inherit the previous one);
/// - a data immediate whose predicted offset (`last opcode pc + stride`)
///   equals `pc` arms a deferred stop, claimed by the next opcode line.
///
/// The first match wins and the scan returns immediately; duplicate token
/// occurrences later in the block are unreachable. Returns `Ok(None)` when
/// the block ends without a match.
///
/// ## Errors
///
/// Only `Io`; an absent mapping is `Ok(None)`, never an error.
pub fn resolve(path: &Path, block: &SymbolIndexEntry, pc: PcOffset) -> Result<Option<SourceHit>>
{
    let token = pc.token();

    let mut cursor = LineCursor::open_at(path, block.start_offset, block.start_line)?;
    let mut current: Option<SourceAnnotation> = None;
    let mut last_opcode_pc: Option<u32> = None;
    let mut deferred_stop = false;

    while let Some(record) = cursor.next_line()? {
        if record.offset >= block.end_offset {
            break;
        }

        if let Some(annotation) = parse_annotation(&record.text) {
            current = Some(annotation);
            continue;
        }

        if deferred_stop && super::is_opcode_line(&record.text) {
            return Ok(Some(classify_hit(current.as_ref(), &record)));
        }

        if record.text.contains(&token) {
            return Ok(Some(classify_hit(current.as_ref(), &record)));
        }

        if super::is_opcode_line(&record.text) {
            if let Some(hint) = super::embedded_pc_hint(&record.text) {
                last_opcode_pc = Some(hint);
            }
            continue;
        }

        if super::is_data_directive(&record.text) {
            if let Some(previous) = last_opcode_pc {
                if PcOffset::new(previous).advanced_by(INSTRUCTION_STRIDE) == pc {
                    deferred_stop = true;
                }
            }
        }
    }

    Ok(None)
}

/// Find the next annotation shortly after a known position.
///
/// Used for the function-entry sentinel: a direct hit at pc `0000` with no
/// covering annotation still belongs to the entry point, whose annotation
/// follows the entry instructions. The scan begins on the line after
/// `(from_line, from_offset)` and inspects at most
/// [`ANNOTATION_SCAN_WINDOW`] lines, stopping early at the block end
/// marker.
pub fn next_annotation(path: &Path, from_line: u32, from_offset: u64) -> Result<(Option<String>, Option<i32>)>
{
    let mut cursor = LineCursor::open_at(path, from_offset, from_line)?;
    if cursor.next_line()?.is_none() {
        return Ok((None, None));
    }

    for _ in 0..ANNOTATION_SCAN_WINDOW {
        let Some(record) = cursor.next_line()? else {
            break;
        };
        if super::is_end_marker(&record.text) {
            break;
        }
        if let Some(annotation) = parse_annotation(&record.text) {
            return Ok((Some(annotation.file), Some(annotation.line)));
        }
    }

    Ok((None, None))
}

/// Whether execution should pause before the next opcode after a position.
///
/// Implements "step to next distinct source line": scanning from the line
/// after `(from_line, from_offset)`, returns `true` if an annotation for a
/// *different* source position than `current` appears before the next
/// byte-opcode line. An annotation equal to `current` is skipped; reaching
/// an opcode line first, or the block end marker, returns `false`.
pub fn annotation_changes_before_next_opcode(
    path: &Path,
    from_line: u32,
    from_offset: u64,
    current: Option<&SourceAnnotation>,
) -> Result<bool>
{
    let mut cursor = LineCursor::open_at(path, from_offset, from_line)?;
    if cursor.next_line()?.is_none() {
        return Ok(false);
    }

    while let Some(record) = cursor.next_line()? {
        if super::is_end_marker(&record.text) {
            return Ok(false);
        }
        if let Some(annotation) = parse_annotation(&record.text) {
            match current {
                Some(current) if current.same_source(&annotation) => continue,
                _ => return Ok(true),
            }
        }
        if super::is_opcode_line(&record.text) {
            return Ok(false);
        }
    }

    Ok(false)
}

fn classify_hit(current: Option<&SourceAnnotation>, record: &LineRecord) -> SourceHit
{
    if let Some(annotation) = current {
        return SourceHit {
            file: Some(annotation.file.clone()),
            line: annotation.line,
            found_at_line: record.line_no,
            found_at_offset: record.offset,
            inst_index: Some(annotation.inst_index.clone()),
        };
    }

    // No covering annotation: either the implicit class-initializer check
    // or an instruction with no source mapping (native runtime call).
    let line = if record.text.contains(CLINIT_MARKER) { -1 } else { 0 };
    SourceHit {
        file: None,
        line,
        found_at_line: record.line_no,
        found_at_offset: record.offset,
        inst_index: None,
    }
}
