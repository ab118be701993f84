//! Maple primitive type tags.

use std::fmt;

/// Primitive type tag attached to formal arguments and local variables.
///
/// The signature header in a symbol file describes each formal and local
/// with a single byte indexing this closed table. The order is fixed by the
/// compiler; entries must never be reordered or removed. Index `0` is the
/// compiler's "invalid" placeholder and never appears in well-formed output,
/// but it stays in the table so the remaining indices line up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimType
{
    Invalid,
    Void,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    U1,
    Ptr,
    Ref,
    A32,
    A64,
    F32,
    F64,
    F128,
    C64,
    C128,
    SimpleStr,
    SimpleObj,
    DynAny,
    DynUndef,
    DynNull,
    DynBool,
    DynI32,
    DynStr,
    DynObj,
    DynF64,
    DynF32,
    DynNone,
    ConstStr,
    Gen,
    Agg,
    V2I64,
    V4I32,
    V8I16,
    V16I8,
    V2F64,
    V4F32,
    Unknown,
    Derived,
}

/// The full tag table in compiler index order.
const PRIM_TYPE_TABLE: [PrimType; 43] = [
    PrimType::Invalid,
    PrimType::Void,
    PrimType::I8,
    PrimType::I16,
    PrimType::I32,
    PrimType::I64,
    PrimType::U8,
    PrimType::U16,
    PrimType::U32,
    PrimType::U64,
    PrimType::U1,
    PrimType::Ptr,
    PrimType::Ref,
    PrimType::A32,
    PrimType::A64,
    PrimType::F32,
    PrimType::F64,
    PrimType::F128,
    PrimType::C64,
    PrimType::C128,
    PrimType::SimpleStr,
    PrimType::SimpleObj,
    PrimType::DynAny,
    PrimType::DynUndef,
    PrimType::DynNull,
    PrimType::DynBool,
    PrimType::DynI32,
    PrimType::DynStr,
    PrimType::DynObj,
    PrimType::DynF64,
    PrimType::DynF32,
    PrimType::DynNone,
    PrimType::ConstStr,
    PrimType::Gen,
    PrimType::Agg,
    PrimType::V2I64,
    PrimType::V4I32,
    PrimType::V8I16,
    PrimType::V16I8,
    PrimType::V2F64,
    PrimType::V4F32,
    PrimType::Unknown,
    PrimType::Derived,
];

impl PrimType
{
    /// Number of entries in the tag table.
    pub const COUNT: usize = PRIM_TYPE_TABLE.len();

    /// Look up a tag by the index embedded in the signature header.
    ///
    /// Returns `None` for out-of-range indices; the decoder treats that as
    /// malformed input for the whole function.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self>
    {
        PRIM_TYPE_TABLE.get(index).copied()
    }

    /// The tag's spelling as the compiler prints it.
    #[must_use]
    pub fn name(self) -> &'static str
    {
        match self {
            PrimType::Invalid => "invalid",
            PrimType::Void => "void",
            PrimType::I8 => "i8",
            PrimType::I16 => "i16",
            PrimType::I32 => "i32",
            PrimType::I64 => "i64",
            PrimType::U8 => "u8",
            PrimType::U16 => "u16",
            PrimType::U32 => "u32",
            PrimType::U64 => "u64",
            PrimType::U1 => "u1",
            PrimType::Ptr => "ptr",
            PrimType::Ref => "ref",
            PrimType::A32 => "a32",
            PrimType::A64 => "a64",
            PrimType::F32 => "f32",
            PrimType::F64 => "f64",
            PrimType::F128 => "f128",
            PrimType::C64 => "c64",
            PrimType::C128 => "c128",
            PrimType::SimpleStr => "simplestr",
            PrimType::SimpleObj => "simpleobj",
            PrimType::DynAny => "dynany",
            PrimType::DynUndef => "dynundef",
            PrimType::DynNull => "dynnull",
            PrimType::DynBool => "dynbool",
            PrimType::DynI32 => "dyni32",
            PrimType::DynStr => "dynstr",
            PrimType::DynObj => "dynobj",
            PrimType::DynF64 => "dynf64",
            PrimType::DynF32 => "dynf32",
            PrimType::DynNone => "dynnone",
            PrimType::ConstStr => "constStr",
            PrimType::Gen => "gen",
            PrimType::Agg => "agg",
            PrimType::V2I64 => "v2i64",
            PrimType::V4I32 => "v4i32",
            PrimType::V8I16 => "v8i16",
            PrimType::V16I8 => "v16i8",
            PrimType::V2F64 => "v2f64",
            PrimType::V4F32 => "v4f32",
            PrimType::Unknown => "unknown",
            PrimType::Derived => "derived",
        }
    }

    /// Whether the tag belongs to the dynamic-language family.
    #[must_use]
    pub fn is_dynamic(self) -> bool
    {
        matches!(
            self,
            PrimType::DynAny
                | PrimType::DynUndef
                | PrimType::DynNull
                | PrimType::DynBool
                | PrimType::DynI32
                | PrimType::DynStr
                | PrimType::DynObj
                | PrimType::DynF64
                | PrimType::DynF32
                | PrimType::DynNone
        )
    }
}

impl fmt::Display for PrimType
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        write!(f, "{}", self.name())
    }
}
