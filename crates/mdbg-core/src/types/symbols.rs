//! Symbol name types.

use std::fmt;

/// Source language a compiled function originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolLanguage
{
    /// Java method (mangled with `|`-separated class/method/signature parts).
    Java,
    /// Dynamically typed script function (names not recoverable from text).
    JavaScript,
    /// Unknown or mixed origin.
    Unknown,
}

impl fmt::Display for SymbolLanguage
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        let label = match self {
            SymbolLanguage::Java => "java",
            SymbolLanguage::JavaScript => "javascript",
            SymbolLanguage::Unknown => "unknown",
        };
        write!(f, "{label}")
    }
}

/// A function label with demangling metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolName
{
    raw: String,
    demangled: Option<String>,
    language: SymbolLanguage,
}

impl SymbolName
{
    /// Construct from a raw label.
    pub fn new(raw: String, demangled: Option<String>, language: SymbolLanguage) -> Self
    {
        Self {
            raw,
            demangled,
            language,
        }
    }

    /// Raw (mangled) label emitted in the symbol file.
    pub fn raw(&self) -> &str
    {
        &self.raw
    }

    /// Demangled human-friendly name if available.
    pub fn demangled(&self) -> Option<&str>
    {
        self.demangled.as_deref()
    }

    /// Preferred presentation (demangled fallback to raw).
    pub fn display_name(&self) -> &str
    {
        self.demangled.as_deref().unwrap_or(&self.raw)
    }

    /// Language classification for the symbol.
    pub fn language(&self) -> SymbolLanguage
    {
        self.language
    }
}

impl fmt::Display for SymbolName
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        write!(f, "{}", self.display_name())
    }
}
