//! Shared value types for the debug-info core.

pub mod pc;
pub mod prim;
pub mod symbols;

pub use pc::PcOffset;
pub use prim::PrimType;
pub use symbols::{SymbolLanguage, SymbolName};
