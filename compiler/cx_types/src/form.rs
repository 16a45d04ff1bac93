//! Type form and scalar type codes.

use std::fmt;

/// Structural kind of a type.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum TypeForm {
    /// `int`, `float`, `bool`, `char`, `wchar`, `byte`.
    Scalar = 0,
    /// Enumeration with named constants.
    Enum = 1,
    /// Subrange of a scalar or enumeration.
    Subrange = 2,
    /// Fixed-size array.
    Array = 3,
    /// Record/class type.
    Complex = 4,
    /// `file`.
    Stream = 5,
    /// Result type of procedures.
    Void = 6,
}

impl TypeForm {
    pub const fn name(self) -> &'static str {
        match self {
            TypeForm::Scalar => "scalar",
            TypeForm::Enum => "enum",
            TypeForm::Subrange => "subrange",
            TypeForm::Array => "array",
            TypeForm::Complex => "complex",
            TypeForm::Stream => "stream",
            TypeForm::Void => "void",
        }
    }
}

impl fmt::Display for TypeForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Machine representation of a value, used by type-code driven formatting.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum TypeCode {
    Int,
    Float,
    Bool,
    Char,
    WChar,
    Byte,
    /// Anything held by reference: arrays, records, streams.
    Address,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_display() {
        assert_eq!(TypeForm::Array.to_string(), "array");
        assert_eq!(TypeForm::Stream.to_string(), "stream");
    }
}
