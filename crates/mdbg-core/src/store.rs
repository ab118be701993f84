//! # Runtime Index Store
//!
//! Per-session cache of symbol indexes and class layouts, keyed by file
//! path.
//!
//! The store is an explicit struct owned by the caller's session object,
//! deliberately not module-level global state, so that "process exit"
//! notifications map to an explicit [`RuntimeIndexStore::reset`] and tests
//! can run isolated stores side by side.
//!
//! ## Concurrency
//!
//! Indexing a large symbol file is the one expensive operation in the core,
//! so a host may kick it off out of band ([`RuntimeIndexStore::prefetch`])
//! while it does unrelated work. Each path owns one `OnceCell`: the first
//! caller runs the build, any caller arriving while that build is in flight
//! blocks on the same cell rather than starting a duplicate scan, and
//! builds for different paths proceed in parallel. The path map's mutex is
//! only held to fetch or insert a cell, never across a build. Once a cell
//! is populated the index is immutable and reads are lock-free.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use once_cell::sync::OnceCell;

use crate::asm::index::{SymbolIndex, SymbolIndexEntry};
use crate::error::{MdbgError, Result};
use crate::layout::ClassLayoutCache;

/// Outcome of a completed index build, cached per path.
///
/// Corruption is remembered so a broken file is diagnosed once instead of
/// rescanned on every query; I/O failures are not cached, the next caller
/// simply retries.
#[derive(Clone)]
enum IndexSlot
{
    Ready(Arc<SymbolIndex>),
    Corrupt(String),
}

type IndexCell = Arc<OnceCell<IndexSlot>>;
type LayoutCell = Arc<OnceCell<Arc<ClassLayoutCache>>>;

/// Session-wide cache of one [`SymbolIndex`] and one [`ClassLayoutCache`]
/// per loaded library.
#[derive(Default)]
pub struct RuntimeIndexStore
{
    indexes: Mutex<HashMap<PathBuf, IndexCell>>,
    layouts: Mutex<HashMap<PathBuf, LayoutCell>>,
    index_builds: AtomicUsize,
}

impl RuntimeIndexStore
{
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self
    {
        Self::default()
    }

    /// The symbol index for `path`, building it on first request.
    ///
    /// ## Errors
    ///
    /// - `Io` if the file cannot be read (not cached; retried next call)
    /// - `CorruptIndex` if the file's block structure is broken (cached;
    ///   re-reported without rescanning)
    pub fn index(&self, path: &Path) -> Result<Arc<SymbolIndex>>
    {
        let cell = self.index_cell(path);
        let slot = cell.get_or_try_init(|| {
            self.index_builds.fetch_add(1, Ordering::Relaxed);
            match SymbolIndex::build(path) {
                Ok(index) => Ok(IndexSlot::Ready(Arc::new(index))),
                Err(MdbgError::CorruptIndex { detail, .. }) => Ok(IndexSlot::Corrupt(detail)),
                Err(err) => Err(err),
            }
        })?;

        match slot {
            IndexSlot::Ready(index) => Ok(index.clone()),
            IndexSlot::Corrupt(detail) => Err(MdbgError::CorruptIndex {
                path: path.to_path_buf(),
                detail: detail.clone(),
            }),
        }
    }

    /// Look up one function block, treating a corrupt file as "not found".
    ///
    /// This is the lookup the per-frame pipeline uses: a file whose index
    /// cannot be trusted yields no symbols, and the display layer falls
    /// back exactly as it does for a genuinely unknown function.
    pub fn entry(&self, path: &Path, label: &str) -> Result<Option<SymbolIndexEntry>>
    {
        match self.index(path) {
            Ok(index) => Ok(index.entry(label).cloned()),
            Err(MdbgError::CorruptIndex { path, detail }) => {
                tracing::debug!(path = %path.display(), %detail, "treating corrupt index as symbol-not-found");
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    /// The class layouts for `path`, parsing the file on first request.
    ///
    /// ## Errors
    ///
    /// Only `Io`; malformed layout lines are skipped during parsing.
    pub fn layout(&self, path: &Path) -> Result<Arc<ClassLayoutCache>>
    {
        let cell = self.layout_cell(path);
        let layout = cell.get_or_try_init(|| ClassLayoutCache::load(path).map(Arc::new))?;
        Ok(layout.clone())
    }

    /// Start building the index for `path` on a background thread.
    ///
    /// Builds are not cancellable; a caller that needs the index before the
    /// background build completes simply blocks on the same cell inside
    /// [`RuntimeIndexStore::index`]. Failures are recorded in the cell (or
    /// retried later, for I/O) and surface on the next foreground request.
    pub fn prefetch(store: &Arc<Self>, path: &Path)
    {
        let store = Arc::clone(store);
        let path = path.to_path_buf();
        let spawned = thread::Builder::new().name("mdbg-index-build".into()).spawn(move || {
            if let Err(err) = store.index(&path) {
                tracing::debug!(path = %path.display(), %err, "background index build failed");
            }
        });
        if let Err(err) = spawned {
            tracing::warn!(%err, "could not spawn background index build");
        }
    }

    /// Drop the cached index and layout for one path.
    pub fn invalidate(&self, path: &Path)
    {
        self.indexes.lock().unwrap().remove(path);
        self.layouts.lock().unwrap().remove(path);
    }

    /// Drop every cache. Called when the debuggee process exits; the next
    /// session rebuilds lazily.
    pub fn reset(&self)
    {
        self.indexes.lock().unwrap().clear();
        self.layouts.lock().unwrap().clear();
    }

    /// Number of index scans actually performed (not served from cache).
    #[must_use]
    pub fn build_count(&self) -> usize
    {
        self.index_builds.load(Ordering::Relaxed)
    }

    fn index_cell(&self, path: &Path) -> IndexCell
    {
        let mut indexes = self.indexes.lock().unwrap();
        indexes.entry(path.to_path_buf()).or_default().clone()
    }

    fn layout_cell(&self, path: &Path) -> LayoutCell
    {
        let mut layouts = self.layouts.lock().unwrap();
        layouts.entry(path.to_path_buf()).or_default().clone()
    }
}
