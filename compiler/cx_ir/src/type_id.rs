//! Type pool handle.
//!
//! Scalar and stream types are pre-interned at fixed indices so the
//! executor can test "is this the float type?" with one comparison, the
//! same identity test the tracer's value rendering is built on.

use std::fmt;

/// A 32-bit index into the type pool.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct TypeId(u32);

impl TypeId {
    // === Pre-interned types (indices 0-7) ===

    /// `int`: 32-bit signed integer.
    pub const INTEGER: Self = Self(0);
    /// `float`: 32-bit floating point.
    pub const FLOAT: Self = Self(1);
    /// `bool`.
    pub const BOOLEAN: Self = Self(2);
    /// `char`: 8-bit character.
    pub const CHAR: Self = Self(3);
    /// `wchar`: wide (Unicode) character.
    pub const WCHAR: Self = Self(4);
    /// `byte`: 8-bit unsigned integer.
    pub const BYTE: Self = Self(5);
    /// `file`: the stream type.
    pub const STREAM: Self = Self(6);
    /// `void`: result type of procedures.
    pub const VOID: Self = Self(7);

    /// Number of pre-interned types.
    pub const PREDEFINED_COUNT: u32 = 8;

    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Check if this is one of the pre-interned types.
    #[inline]
    pub const fn is_predefined(self) -> bool {
        self.0 < Self::PREDEFINED_COUNT
    }

    /// Name of a pre-interned type, `None` for pool-allocated types.
    pub const fn name(self) -> Option<&'static str> {
        match self.0 {
            0 => Some("int"),
            1 => Some("float"),
            2 => Some("bool"),
            3 => Some("char"),
            4 => Some("wchar"),
            5 => Some("byte"),
            6 => Some("file"),
            7 => Some("void"),
            _ => None,
        }
    }
}

impl fmt::Debug for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "TypeId({name})"),
            None => write!(f, "TypeId({})", self.0),
        }
    }
}
