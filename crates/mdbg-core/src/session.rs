//! # Debug Session
//!
//! Per-session façade tying the store and the scanners together.
//!
//! A session owns the [`RuntimeIndexStore`] and exposes the one operation
//! the display layer actually wants: given the symbol file, function label,
//! and pc offset of a stopped frame, produce everything known about it in a
//! single descriptor. It also reacts to host events, dropping the caches
//! when the debuggee exits.

use std::path::Path;
use std::sync::Arc;

use crate::asm::correlate::SourceHit;
use crate::asm::index::SymbolIndexEntry;
use crate::asm::signature::FunctionSignature;
use crate::asm::{correlate, demangle, signature};
use crate::error::Result;
use crate::events::{SessionEvent, StopReason};
use crate::store::RuntimeIndexStore;
use crate::types::{PcOffset, SymbolName};

/// Everything the core can recover about one stopped frame.
#[derive(Debug, Clone)]
pub struct FrameDescriptor
{
    /// The frame's function, demangled for display.
    pub function: SymbolName,
    /// The function's block in the symbol file.
    pub entry: SymbolIndexEntry,
    /// Source position of the pc, if one was resolved.
    pub source: Option<SourceHit>,
    /// Decoded call signature, if the header was well formed.
    pub signature: Option<FunctionSignature>,
}

/// One debugging session against a single debuggee process.
#[derive(Default)]
pub struct DebugSession
{
    store: Arc<RuntimeIndexStore>,
}

impl DebugSession
{
    /// Create a session with an empty store.
    #[must_use]
    pub fn new() -> Self
    {
        Self::default()
    }

    /// The session's cache store, shareable with background tasks.
    pub fn store(&self) -> &Arc<RuntimeIndexStore>
    {
        &self.store
    }

    /// Warm the index for a library before its first frame is inspected.
    ///
    /// Hosts call this as soon as they see a library load; the scan runs on
    /// a background thread and the first real lookup joins it instead of
    /// paying for the full scan at stop time.
    pub fn prefetch(&self, asm_path: &Path)
    {
        RuntimeIndexStore::prefetch(&self.store, asm_path);
    }

    /// Resolve one stopped frame into a [`FrameDescriptor`].
    ///
    /// Returns `Ok(None)` when `label` is absent from the file's index
    /// (including the corrupt-file case, which lookups treat as absent).
    /// A frame whose pc has no source mapping or whose header is malformed
    /// still yields a descriptor; the corresponding fields are just `None`.
    ///
    /// A direct hit at the function-entry offset (`0000`) frequently lands
    /// on setup instructions emitted before the first annotation; for that
    /// one offset the next annotation ahead of the hit belongs to the entry
    /// point and is folded into the result.
    pub fn describe_frame(&self, asm_path: &Path, label: &str, pc: PcOffset) -> Result<Option<FrameDescriptor>>
    {
        let Some(entry) = self.store.entry(asm_path, label)? else {
            return Ok(None);
        };

        let mut source = correlate::resolve(asm_path, &entry, pc)?;
        if pc.is_entry() {
            if let Some(hit) = source.as_mut() {
                if hit.file.is_none() {
                    let (file, line) = correlate::next_annotation(asm_path, hit.found_at_line, hit.found_at_offset)?;
                    if let (Some(file), Some(line)) = (file, line) {
                        hit.file = Some(file);
                        hit.line = line;
                    }
                }
            }
        }

        let signature = signature::decode(asm_path, &entry.label, entry.start_offset)?;
        Ok(Some(FrameDescriptor {
            function: demangle::make_symbol_name(&entry.label),
            entry,
            source,
            signature,
        }))
    }

    /// React to a host event.
    ///
    /// Process exit drops every cached index and layout wholesale; the
    /// files on disk may be rewritten before the next run.
    pub fn handle_event(&self, event: &SessionEvent)
    {
        if let SessionEvent::TargetStopped {
            reason: StopReason::Exited(code),
            ..
        } = event
        {
            tracing::debug!(code = *code, "debuggee exited; dropping per-library caches");
            self.store.reset();
        }
    }
}
