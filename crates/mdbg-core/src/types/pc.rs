//! Program-counter offset type.

use std::fmt;

/// Strongly typed pc offset within one compiled function
///
/// A pc offset is a byte position inside a function's instruction stream,
/// counted from the function entry. It is the correlation key between the
/// runtime's execution position and the annotated assembly text: the symbol
/// file renders every instruction's offset as a fixed-width four-digit hex
/// token (`0000`, `0004`, ...), and resolution matches against that
/// rendering.
///
/// The wrapper prevents accidentally mixing pc offsets with byte offsets
/// into the symbol file itself, which are `u64` and an order of magnitude
/// larger.
///
/// ## Example
///
/// ```rust
/// use mdbg_core::types::PcOffset;
///
/// let pc = PcOffset::parse("0x54").unwrap();
/// assert_eq!(pc.token(), "0054");
/// assert_eq!(PcOffset::parse("0054"), Some(pc));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PcOffset(u32);

impl PcOffset
{
    /// The distinguished function-entry offset (`0000`).
    pub const ENTRY: Self = PcOffset(0);

    /// Create an offset from a raw `u32` value.
    pub const fn new(value: u32) -> Self
    {
        PcOffset(value)
    }

    /// Parse a hex string, with or without a `0x` prefix.
    ///
    /// Returns `None` if the string is not hexadecimal; callers treat that
    /// as malformed input, not a fatal error.
    pub fn parse(text: &str) -> Option<Self>
    {
        let digits = text.trim().trim_start_matches("0x").trim_start_matches("0X");
        u32::from_str_radix(digits, 16).ok().map(PcOffset)
    }

    /// Raw `u32` value of this offset.
    pub const fn value(self) -> u32
    {
        self.0
    }

    /// The fixed-width token the symbol file embeds in instruction comments.
    #[must_use]
    pub fn token(self) -> String
    {
        format!("{:04x}", self.0)
    }

    /// Whether this is the function-entry sentinel.
    #[must_use]
    pub fn is_entry(self) -> bool
    {
        self.0 == 0
    }

    /// Offset of the slot following this one, given a stride in bytes.
    #[must_use]
    pub fn advanced_by(self, stride: u32) -> Self
    {
        PcOffset(self.0.saturating_add(stride))
    }
}

impl From<u32> for PcOffset
{
    fn from(value: u32) -> Self
    {
        PcOffset(value)
    }
}

impl From<PcOffset> for u32
{
    fn from(pc: PcOffset) -> Self
    {
        pc.0
    }
}

impl fmt::Display for PcOffset
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        write!(f, "0x{:04x}", self.0)
    }
}
