//! Session event types and helpers.
//!
//! The host debugger publishes an event whenever the debuggee stops,
//! resumes, or exits; the session consumes them to decide when its caches
//! must be dropped, and display layers consume them to narrate target state
//! without polling. The core itself never waits on this channel; it only
//! reacts to events handed to it.

use std::sync::mpsc;

/// Why the debuggee stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason
{
    /// Stopped at a breakpoint, with the runtime address that fired.
    Breakpoint(u64),
    /// Stopped by a signal.
    Signal(i32),
    /// The process exited with the given code; all per-library caches are
    /// invalid from this point on.
    Exited(i32),
    /// Stopped for a reason the host did not classify.
    Unknown,
}

/// Event emitted by the host debugger backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent
{
    /// Target stopped execution for a particular reason.
    TargetStopped
    {
        /// Reason reported by the host.
        reason: StopReason,
        /// Function-relative pc of the stopped frame, if the host had one.
        pc: Option<u32>,
    },
    /// Target resumed execution.
    TargetResumed,
}

impl SessionEvent
{
    /// Human-readable description of the event.
    #[must_use]
    pub fn describe(&self) -> String
    {
        match self {
            Self::TargetStopped { reason, pc } => {
                let mut description = format_stop_reason(*reason);
                if let Some(pc) = pc {
                    description.push_str(&format!(" (pc 0x{pc:04x})"));
                }
                description
            }
            Self::TargetResumed => "Target resumed execution".to_string(),
        }
    }
}

/// Format a [`StopReason`] into a user-facing message.
#[must_use]
pub fn format_stop_reason(reason: StopReason) -> String
{
    match reason {
        StopReason::Breakpoint(addr) => format!("Hit breakpoint at 0x{addr:x}"),
        StopReason::Signal(sig) => format!("Stopped by signal: {sig}"),
        StopReason::Exited(code) => format!("Process exited with code: {code}"),
        StopReason::Unknown => "Stopped for unknown reason".to_string(),
    }
}

/// Sender side of the session event channel.
pub type SessionEventSender = mpsc::Sender<SessionEvent>;
/// Receiver side of the session event channel.
pub type SessionEventReceiver = mpsc::Receiver<SessionEvent>;

/// Create a new session event channel.
#[must_use]
pub fn event_channel() -> (SessionEventSender, SessionEventReceiver)
{
    mpsc::channel()
}
