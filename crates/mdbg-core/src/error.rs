//! # Error Types
//!
//! General error handling for the debug-info core.
//!
//! We use `thiserror` to automatically generate `Error` trait implementations
//! and nice error messages.
//!
//! The error surface is deliberately small. Most "nothing there" conditions
//! (unknown symbol, no annotation before a pc, class absent from a layout
//! file) are expressed as `None`/empty results, not errors, so that display
//! layers can degrade gracefully without matching on error variants. Errors
//! are reserved for conditions the caller genuinely has to handle:
//!
//! 1. **Resource failures**: the backing file could not be read (`Io`)
//! 2. **Structural corruption**: a symbol file whose label/end-marker pairing
//!    is broken (`CorruptIndex`); the whole file yields no usable index
//! 3. **Caller mistakes**: arguments the core cannot interpret
//!    (`InvalidArgument`)

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for debug-info operations
#[derive(Error, Debug)]
pub enum MdbgError
{
    /// A symbol file's label lines and end-marker lines do not pair up 1:1.
    ///
    /// The index builder pairs the Nth `_mirbin_info` label with the Nth
    /// `.cfi_endproc` marker, which is only sound while the two alternate in
    /// file order. A count or ordering mismatch means the file was truncated
    /// or mis-emitted; pairing by position would silently attach the wrong
    /// block to a symbol, so the whole file is rejected instead. Lookup
    /// callers treat the condition as "symbol not found".
    #[error("corrupt symbol index in {}: {detail}", path.display())]
    CorruptIndex
    {
        /// Assembly file that failed to index
        path: PathBuf,
        /// What did not line up
        detail: String,
    },

    /// Invalid argument passed to a core function
    ///
    /// Examples:
    /// - A pc-offset string that is not hexadecimal
    /// - An empty function label
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// I/O error (for file operations, etc.)
    ///
    /// Used for errors when reading symbol or layout files. This is a
    /// standard Rust `std::io::Error` converted to our error type.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for `Result<T, MdbgError>`
///
/// ```rust
/// use mdbg_core::error::Result;
/// fn foo() -> Result<()>
/// {
///     Ok(())
/// }
/// ```
pub type Result<T> = std::result::Result<T, MdbgError>;
