//! # Class Layout Cache
//!
//! Field offsets and inheritance chains recovered from the runtime's
//! macro-definition files.
//!
//! Alongside each compiled library the Maple toolchain emits a
//! `*.macros.def` text file describing object layout:
//!
//! ```text
//! OBJ_CLASS(Ljava_2Flang_2FObject_3B, 16, THE_ROOT)
//! OBJ_FIELD(Ljava_2Flang_2FObject_3B, shadow, 0, 8)
//! OBJ_FIELD(Ljava_2Flang_2FObject_3B, monitor, 8, 4)
//! ```
//!
//! `OBJ_CLASS` opens a class record (name, instance size, base class);
//! `OBJ_FIELD` appends a field to the class it names; lookup is by name,
//! not position, so field lines may appear anywhere after their class line.
//! Every other line is ignored. Records form a forest rooted at the
//! `THE_ROOT` sentinel.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Base-class sentinel terminating an inheritance chain.
pub const ROOT_CLASS_SENTINEL: &str = "THE_ROOT";

/// Class-declaration macro.
const CLASS_MACRO: &str = "OBJ_CLASS(";

/// Field-declaration macro.
const FIELD_MACRO: &str = "OBJ_FIELD(";

/// One declared instance field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor
{
    /// Field name.
    pub name: String,
    /// Byte offset from the object base.
    pub offset: u32,
    /// Field length in bytes.
    pub length: u32,
}

/// Layout record for one runtime class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassRecord
{
    /// Mangled class name.
    pub name: String,
    /// Instance size in bytes.
    pub size: u32,
    /// Mangled base-class name, or [`ROOT_CLASS_SENTINEL`].
    pub base_class: String,
    /// Declared fields in declaration order.
    pub fields: Vec<FieldDescriptor>,
}

impl ClassRecord
{
    /// Whether this class terminates an inheritance chain.
    #[must_use]
    pub fn is_root(&self) -> bool
    {
        self.base_class == ROOT_CLASS_SENTINEL
    }
}

/// Parsed class layouts for one macro-definition file.
///
/// Built once per path by the runtime store and immutable afterwards;
/// lookups are pure map reads.
#[derive(Debug)]
pub struct ClassLayoutCache
{
    path: PathBuf,
    classes: HashMap<String, ClassRecord>,
}

impl ClassLayoutCache
{
    /// Parse one `*.macros.def` file.
    ///
    /// Malformed class or field lines are skipped individually; they never
    /// abort the rest of the file. Fields naming a class the file has not
    /// declared are dropped.
    ///
    /// ## Errors
    ///
    /// Only `Io` when the file cannot be read.
    pub fn load(path: &Path) -> Result<Self>
    {
        let text = fs::read_to_string(path)?;
        let mut classes: HashMap<String, ClassRecord> = HashMap::new();
        let mut dropped = 0usize;

        for line in text.lines() {
            let trimmed = line.trim();
            if let Some(arguments) = macro_arguments(trimmed, CLASS_MACRO) {
                match parse_class(&arguments) {
                    Some(record) => {
                        classes.insert(record.name.clone(), record);
                    }
                    None => dropped += 1,
                }
            } else if let Some(arguments) = macro_arguments(trimmed, FIELD_MACRO) {
                match parse_field(&arguments) {
                    Some((class, field)) => match classes.get_mut(&class) {
                        Some(record) => record.fields.push(field),
                        None => dropped += 1,
                    },
                    None => dropped += 1,
                }
            }
        }

        if dropped > 0 {
            tracing::debug!(path = %path.display(), dropped, "skipped malformed layout lines");
        }
        Ok(Self {
            path: path.to_path_buf(),
            classes,
        })
    }

    /// File this cache was built from.
    pub fn path(&self) -> &Path
    {
        &self.path
    }

    /// Number of declared classes.
    #[must_use]
    pub fn len(&self) -> usize
    {
        self.classes.len()
    }

    /// Whether the file declared no classes.
    #[must_use]
    pub fn is_empty(&self) -> bool
    {
        self.classes.is_empty()
    }

    /// Look up one class record by mangled name.
    pub fn class(&self, name: &str) -> Option<&ClassRecord>
    {
        self.classes.get(name)
    }

    /// Inheritance chain from the root down to `name` (root first).
    ///
    /// Returns `None` when `name` itself or any base link along the chain
    /// is missing from the cache; callers treat that as "no layout known"
    /// rather than working from a partial chain. The walk carries a visited
    /// set so a cyclic chain (corrupt metadata) terminates instead of
    /// spinning.
    pub fn chain(&self, name: &str) -> Option<Vec<&ClassRecord>>
    {
        let mut chain = Vec::new();
        let mut visited = HashSet::new();
        let mut current = name;

        while current != ROOT_CLASS_SENTINEL {
            if !visited.insert(current) {
                tracing::warn!(class = name, "cyclic inheritance chain in {}", self.path.display());
                return None;
            }
            let record = self.classes.get(current)?;
            chain.push(record);
            current = &record.base_class;
        }

        chain.reverse();
        Some(chain)
    }

    /// All class names matching a plain substring pattern.
    ///
    /// Display-layer helper (pretty printers look classes up by fragments
    /// of a demangled name); layered on top of the map, no extra state.
    pub fn find_classes(&self, pattern: &str) -> Vec<&str>
    {
        let mut matches: Vec<&str> = self
            .classes
            .keys()
            .filter(|name| name.contains(pattern))
            .map(String::as_str)
            .collect();
        matches.sort_unstable();
        matches
    }
}

/// Extract `a, b, c` from `NAME(a, b, c)` if the line invokes `NAME`.
fn macro_arguments(line: &str, macro_prefix: &str) -> Option<String>
{
    let rest = line.strip_prefix(macro_prefix)?;
    let (arguments, _) = rest.split_once(')')?;
    Some(arguments.to_string())
}

fn parse_class(arguments: &str) -> Option<ClassRecord>
{
    let mut parts = arguments.split(',').map(str::trim);
    let name = parts.next()?.to_string();
    let size = parts.next()?.parse().ok()?;
    let base_class = parts.next()?.to_string();
    if name.is_empty() || base_class.is_empty() {
        return None;
    }
    Some(ClassRecord {
        name,
        size,
        base_class,
        fields: Vec::new(),
    })
}

fn parse_field(arguments: &str) -> Option<(String, FieldDescriptor)>
{
    let mut parts = arguments.split(',').map(str::trim);
    let class = parts.next()?.to_string();
    let name = parts.next()?.to_string();
    let offset = parts.next()?.parse().ok()?;
    let length = parts.next()?.parse().ok()?;
    if class.is_empty() || name.is_empty() {
        return None;
    }
    Some((class, FieldDescriptor { name, offset, length }))
}
