//! Maple label demangling.
//!
//! The compiler mangles Java names into label-safe form by replacing each
//! non-identifier character with `_XX`, its two-digit ASCII hex code:
//! `Ljava/lang/String;|indexOf|(I)I` becomes
//! `Ljava_2Flang_2FString_3B_7CindexOf_7C_28I_29I`. Demangling is the
//! straight inverse; unrecognized escapes are left untouched so a damaged
//! label still displays.

use super::SYMBOL_LABEL_SUFFIX;
use crate::types::{SymbolLanguage, SymbolName};

/// Create a [`SymbolName`] from a raw block label.
///
/// Strips the `_mirbin_info` suffix, decodes `_XX` escapes, and classifies
/// the source language: Java methods always carry `|` separators (`_7C`),
/// script entry points are emitted with a `__js` prefix, anything else is
/// unknown.
pub fn make_symbol_name(raw: &str) -> SymbolName
{
    let stem = raw.strip_suffix(SYMBOL_LABEL_SUFFIX).unwrap_or(raw);
    let demangled = demangle(stem);

    let language = if stem.contains("_7C") {
        SymbolLanguage::Java
    } else if stem.starts_with("__js") {
        SymbolLanguage::JavaScript
    } else {
        SymbolLanguage::Unknown
    };

    SymbolName::new(raw.to_string(), demangled, language)
}

/// Decode `_XX` hex escapes; `None` if the label contains none.
pub fn demangle(mangled: &str) -> Option<String>
{
    let bytes = mangled.as_bytes();
    let mut out = String::with_capacity(mangled.len());
    let mut decoded_any = false;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'_' && i + 2 < bytes.len() {
            if let Some(ch) = decode_pair(bytes[i + 1], bytes[i + 2]) {
                out.push(ch);
                decoded_any = true;
                i += 3;
                continue;
            }
        }
        out.push(bytes[i] as char);
        i += 1;
    }

    decoded_any.then_some(out)
}

/// Decode two hex digits into a printable ASCII character.
fn decode_pair(hi: u8, lo: u8) -> Option<char>
{
    let hi = (hi as char).to_digit(16)?;
    let lo = (lo as char).to_digit(16)?;
    let value = (hi * 16 + lo) as u8;
    // Only graphic ASCII; control codes stay escaped.
    (value > 0x20 && value < 0x7f).then(|| value as char)
}
