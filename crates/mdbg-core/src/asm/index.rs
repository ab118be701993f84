//! # Symbol Index
//!
//! Positional index over the function blocks of one assembly symbol file.
//!
//! A symbol file interleaves blocks from many compiled functions. Each block
//! is headed by a `<mangled-name>_mirbin_info:` label line and terminated by
//! a `.cfi_endproc` marker, and blocks never nest or overlap. The index maps
//! each label to the byte range of its block so that the correlation and
//! signature scanners can jump straight to the right region instead of
//! rescanning the file per query.
//!
//! Building is a single linear pass that collects label lines and end-marker
//! lines with their positions, then pairs the Nth label with the Nth end
//! marker. The pairing is only sound while labels and end markers alternate
//! 1:1 in file order, which holds by construction of the format; a file that
//! violates it is rejected wholesale (see [`MdbgError::CorruptIndex`]).

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::{LineCursor, SYMBOL_LABEL_SUFFIX};
use crate::error::{MdbgError, Result};

/// Byte range of one function block inside a symbol file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolIndexEntry
{
    /// Label heading the block, without the trailing colon.
    pub label: String,
    /// 1-based line number of the label line.
    pub start_line: u32,
    /// Byte offset of the start of the label line.
    pub start_offset: u64,
    /// Byte offset of the start of the block's end-marker line. Scans over
    /// `[start_offset, end_offset)` therefore exclude the terminator.
    pub end_offset: u64,
}

/// Immutable label-to-block index for one symbol file.
///
/// Built once per file and shared behind an `Arc` by the runtime store;
/// all reads after construction are lock-free.
#[derive(Debug)]
pub struct SymbolIndex
{
    path: PathBuf,
    entries: HashMap<String, SymbolIndexEntry>,
}

impl SymbolIndex
{
    /// Scan `path` once and build the block index.
    ///
    /// ## Errors
    ///
    /// - `Io` if the file cannot be read
    /// - `CorruptIndex` if label and end-marker lines do not pair 1:1 in
    ///   file order; no usable index exists for such a file
    pub fn build(path: &Path) -> Result<Self>
    {
        let mut cursor = LineCursor::open(path)?;
        let mut labels: Vec<(String, u32, u64)> = Vec::new();
        let mut end_markers: Vec<u64> = Vec::new();

        while let Some(record) = cursor.next_line()? {
            let trimmed = record.text.trim();
            if let Some(label) = trimmed.strip_suffix(':') {
                if label.ends_with(SYMBOL_LABEL_SUFFIX) {
                    labels.push((label.to_string(), record.line_no, record.offset));
                }
            } else if super::is_end_marker(trimmed) {
                end_markers.push(record.offset);
            }
        }

        if labels.len() != end_markers.len() {
            return Err(MdbgError::CorruptIndex {
                path: path.to_path_buf(),
                detail: format!("{} labels but {} end markers", labels.len(), end_markers.len()),
            });
        }

        let mut entries = HashMap::with_capacity(labels.len());
        for ((label, start_line, start_offset), end_offset) in labels.into_iter().zip(end_markers) {
            if start_offset >= end_offset {
                return Err(MdbgError::CorruptIndex {
                    path: path.to_path_buf(),
                    detail: format!("end marker at byte {end_offset} precedes label `{label}` at byte {start_offset}"),
                });
            }
            entries.insert(
                label.clone(),
                SymbolIndexEntry {
                    label,
                    start_line,
                    start_offset,
                    end_offset,
                },
            );
        }

        tracing::debug!(path = %path.display(), functions = entries.len(), "built symbol index");
        Ok(Self {
            path: path.to_path_buf(),
            entries,
        })
    }

    /// File this index was built from.
    pub fn path(&self) -> &Path
    {
        &self.path
    }

    /// Number of indexed function blocks.
    #[must_use]
    pub fn len(&self) -> usize
    {
        self.entries.len()
    }

    /// Whether the file contained no function blocks.
    #[must_use]
    pub fn is_empty(&self) -> bool
    {
        self.entries.is_empty()
    }

    /// Look up a block by label.
    ///
    /// Accepts the label with or without the `_mirbin_info` suffix, since
    /// host debuggers report the runtime symbol either way.
    pub fn entry(&self, label: &str) -> Option<&SymbolIndexEntry>
    {
        if let Some(entry) = self.entries.get(label) {
            return Some(entry);
        }
        if label.ends_with(SYMBOL_LABEL_SUFFIX) {
            return None;
        }
        self.entries.get(&format!("{label}{SYMBOL_LABEL_SUFFIX}"))
    }

    /// Iterate over all entries in unspecified order.
    pub fn entries(&self) -> impl Iterator<Item = &SymbolIndexEntry>
    {
        self.entries.values()
    }
}
