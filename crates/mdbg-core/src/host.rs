//! # Host Debugger Interface
//!
//! The seam between this core and whichever host debugger embeds it.
//!
//! The core deliberately knows nothing about GDB, LLDB, or any other host:
//! everything it needs from one fits behind these two small traits, and
//! host-specific adapters implement them on top of their own scripting
//! APIs. Keeping the seam this narrow is what lets a single resolver serve
//! every host instead of duplicating the engine per debugger.
//!
//! Stop notifications arrive separately, over the channel in
//! [`crate::events`].

use crate::error::Result;

/// A stack frame as exposed by the host debugger.
pub trait FrameHandle
{
    /// Runtime program counter of this frame.
    fn pc(&self) -> u64;

    /// Whether the frame is still valid to read from.
    ///
    /// Hosts invalidate frame handles when the target resumes; callers
    /// must check before dereferencing anything frame-relative.
    fn is_valid(&self) -> bool;
}

/// Read-only access to the debuggee, provided by the host.
pub trait HostBackend
{
    /// The currently selected stack frame, if the target is stopped.
    fn current_frame(&self) -> Option<Box<dyn FrameHandle>>;

    /// Read a named register from a frame.
    fn read_register(&self, frame: &dyn FrameHandle, name: &str) -> Result<u64>;

    /// Read raw debuggee memory.
    fn read_memory(&self, address: u64, length: usize) -> Result<Vec<u8>>;
}
