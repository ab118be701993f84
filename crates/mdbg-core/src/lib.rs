//! # mdbg-core
//!
//! Debug-information engine for the Maple bytecode runtime.
//!
//! The Maple compiler emits no DWARF. Its debug information is the
//! annotated pseudo-assembly listing itself (`*.s` / `*.VtableImpl.s`),
//! plus a sibling macro-definition file describing object layout. This
//! crate treats those text files as a serialized debug-info format and
//! provides the decoders a debugger front-end needs:
//!
//! - positional indexing of per-function blocks ([`asm::index`])
//! - pc-offset to source file/line correlation ([`asm::correlate`])
//! - formal/local signature recovery ([`asm::signature`])
//! - class layout and inheritance chains ([`layout`])
//! - per-session caching with background builds ([`store`], [`session`])
//!
//! Host debuggers (GDB, LLDB, anything scriptable) plug in behind the
//! narrow traits in [`host`] and the event channel in [`events`]; the core
//! itself never talks to a debugger and never prints.

pub mod asm;
pub mod error;
pub mod events;
pub mod host;
pub mod layout;
pub mod session;
pub mod store;
pub mod types;

pub use asm::correlate::{SourceAnnotation, SourceHit};
pub use asm::index::{SymbolIndex, SymbolIndexEntry};
pub use asm::signature::FunctionSignature;
// Re-export commonly used types
pub use error::{MdbgError, Result};
pub use layout::{ClassLayoutCache, ClassRecord, FieldDescriptor, ROOT_CLASS_SENTINEL};
pub use session::{DebugSession, FrameDescriptor};
pub use store::RuntimeIndexStore;
pub use types::{PcOffset, PrimType, SymbolLanguage, SymbolName};
