//! Type descriptors.

use cx_ir::{SymbolRef, TableIndex, TypeId};

use crate::{TypeCode, TypeForm};

/// Element layout of an array type.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct ArrayInfo {
    pub element: TypeId,
    pub element_count: usize,
    pub max_index: usize,
}

/// Form-specific payload of a descriptor.
#[derive(Clone, Eq, PartialEq, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum TypeKind {
    Scalar(TypeCode),
    /// Enumeration constants in ordinal order.
    Enum { constants: Vec<SymbolRef> },
    Subrange { base: TypeId, min: i32, max: i32 },
    Array(ArrayInfo),
    /// Record/class type; fields live in their own scope.
    Complex { fields: Option<TableIndex> },
    Stream,
    Void,
}

/// One type in the pool.
#[derive(Clone, Eq, PartialEq, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct TypeDescriptor {
    /// Declared name, if the type has one.
    pub name: Option<String>,
    /// Size in bytes.
    pub size: usize,
    pub kind: TypeKind,
    /// Member table consulted for `value.member` calls.
    pub class_scope: Option<TableIndex>,
}

impl TypeDescriptor {
    pub fn new(name: Option<&str>, size: usize, kind: TypeKind) -> Self {
        TypeDescriptor {
            name: name.map(str::to_string),
            size,
            kind,
            class_scope: None,
        }
    }

    pub fn form(&self) -> TypeForm {
        match self.kind {
            TypeKind::Scalar(_) => TypeForm::Scalar,
            TypeKind::Enum { .. } => TypeForm::Enum,
            TypeKind::Subrange { .. } => TypeForm::Subrange,
            TypeKind::Array(_) => TypeForm::Array,
            TypeKind::Complex { .. } => TypeForm::Complex,
            TypeKind::Stream => TypeForm::Stream,
            TypeKind::Void => TypeForm::Void,
        }
    }

    /// Representation code; non-scalars are held by address.
    pub fn code(&self) -> TypeCode {
        match self.kind {
            TypeKind::Scalar(code) => code,
            TypeKind::Enum { .. } | TypeKind::Subrange { .. } => TypeCode::Int,
            _ => TypeCode::Address,
        }
    }

    #[inline]
    pub fn array(&self) -> Option<&ArrayInfo> {
        match &self.kind {
            TypeKind::Array(info) => Some(info),
            _ => None,
        }
    }

    /// Enumeration constants, for enum descriptors.
    #[inline]
    pub fn enum_constants(&self) -> Option<&[SymbolRef]> {
        match &self.kind {
            TypeKind::Enum { constants } => Some(constants),
            _ => None,
        }
    }
}
