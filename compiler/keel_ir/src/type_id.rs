//! Interned type identifier.
//!
//! `TypeId` is the only handle the semantic core passes around for types.
//! The type pool (in `keel_types`) owns the structure behind each id; two
//! types are equal exactly when their ids are equal.

use std::fmt;

/// Interned type identifier.
///
/// # Layout
/// 32-bit index split into shard (4 bits) + local index (28 bits):
/// - Bits 31-28: Shard index (0-15)
/// - Bits 27-0: Local index within shard
///
/// # Pre-interned Types
/// Primitive and root types live in shard 0 at fixed local indices, so
/// their ids equal their raw values and can be matched as constants.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct TypeId(u32);

impl TypeId {
    pub const BOOL: TypeId = TypeId(0);
    pub const I8: TypeId = TypeId(1);
    pub const U8: TypeId = TypeId(2);
    pub const I16: TypeId = TypeId(3);
    pub const U16: TypeId = TypeId(4);
    pub const I32: TypeId = TypeId(5);
    pub const U32: TypeId = TypeId(6);
    pub const I64: TypeId = TypeId(7);
    pub const U64: TypeId = TypeId(8);
    pub const F32: TypeId = TypeId(9);
    pub const F64: TypeId = TypeId(10);
    pub const DECIMAL: TypeId = TypeId(11);
    /// UTF-16 code unit.
    pub const CHAR: TypeId = TypeId(12);
    pub const STR: TypeId = TypeId(13);
    pub const VOID: TypeId = TypeId(14);
    /// Native-size signed integer.
    pub const INTPTR: TypeId = TypeId(15);
    /// Native-size unsigned integer.
    pub const UINTPTR: TypeId = TypeId(16);
    /// Universal root of the class hierarchy.
    pub const OBJECT: TypeId = TypeId(17);
    /// Type of the `null` literal.
    pub const NULL: TypeId = TypeId(18);
    /// Type of `typeof(T)` literals.
    pub const TYPE: TypeId = TypeId(19);

    /// Number of pre-interned types.
    pub const PRIMITIVE_COUNT: u32 = 20;

    /// Maximum local index per shard (2^28 - 1).
    pub const MAX_LOCAL: u32 = 0x0FFF_FFFF;

    /// Number of shards for type interning.
    pub const NUM_SHARDS: usize = 16;

    /// Sentinel for "no type".
    pub const NONE: TypeId = TypeId(u32::MAX);

    #[inline]
    pub const fn from_shard_local(shard: u32, local: u32) -> Self {
        debug_assert!(shard < 16);
        debug_assert!(local <= Self::MAX_LOCAL);
        TypeId((shard << 28) | local)
    }

    #[inline]
    pub const fn shard(self) -> usize {
        (self.0 >> 28) as usize
    }

    #[inline]
    pub const fn local(self) -> usize {
        (self.0 & Self::MAX_LOCAL) as usize
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        TypeId(raw)
    }

    /// True for the pre-interned primitive and root types.
    #[inline]
    pub const fn is_builtin(self) -> bool {
        self.0 < Self::PRIMITIVE_COUNT
    }

    #[inline]
    pub const fn is_none(self) -> bool {
        self.0 == u32::MAX
    }

    /// Keyword spelling of a builtin type, `None` for pooled types.
    pub const fn builtin_name(self) -> Option<&'static str> {
        Some(match self.0 {
            0 => "bool",
            1 => "sbyte",
            2 => "byte",
            3 => "short",
            4 => "ushort",
            5 => "int",
            6 => "uint",
            7 => "long",
            8 => "ulong",
            9 => "float",
            10 => "double",
            11 => "decimal",
            12 => "char",
            13 => "string",
            14 => "void",
            15 => "nint",
            16 => "nuint",
            17 => "object",
            18 => "<null>",
            19 => "Type",
            _ => return None,
        })
    }
}

impl fmt::Debug for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.builtin_name() {
            Some(name) => write!(f, "TypeId({name})"),
            None if self.is_none() => write!(f, "TypeId::NONE"),
            None => write!(f, "TypeId(shard={}, local={})", self.shard(), self.local()),
        }
    }
}
