//! Type pool.
//!
//! Descriptors are stored in a flat vector and addressed by `TypeId`.
//! The first `TypeId::PREDEFINED_COUNT` slots hold the scalar, stream, and
//! void types in `TypeId` constant order.

use cx_ir::{SymbolRef, TableIndex, TypeId};

use crate::{ArrayInfo, TypeCode, TypeDescriptor, TypeForm, TypeKind};

/// Size of a stream handle slot.
const STREAM_SIZE: usize = 8;

/// Owner of every type descriptor in a session.
#[derive(Clone, Debug)]
pub struct TypePool {
    types: Vec<TypeDescriptor>,
}

impl TypePool {
    /// Create a pool with the predefined types interned.
    pub fn new() -> Self {
        let predefined = [
            TypeDescriptor::new(Some("int"), 4, TypeKind::Scalar(TypeCode::Int)),
            TypeDescriptor::new(Some("float"), 4, TypeKind::Scalar(TypeCode::Float)),
            TypeDescriptor::new(Some("bool"), 1, TypeKind::Scalar(TypeCode::Bool)),
            TypeDescriptor::new(Some("char"), 1, TypeKind::Scalar(TypeCode::Char)),
            TypeDescriptor::new(Some("wchar"), 4, TypeKind::Scalar(TypeCode::WChar)),
            TypeDescriptor::new(Some("byte"), 1, TypeKind::Scalar(TypeCode::Byte)),
            TypeDescriptor::new(Some("file"), STREAM_SIZE, TypeKind::Stream),
            TypeDescriptor::new(Some("void"), 0, TypeKind::Void),
        ];
        debug_assert_eq!(predefined.len(), TypeId::PREDEFINED_COUNT as usize);
        TypePool {
            types: predefined.into(),
        }
    }

    /// Scalar types that share the scalar member table.
    pub const SCALARS: [TypeId; 6] = [
        TypeId::INTEGER,
        TypeId::BYTE,
        TypeId::FLOAT,
        TypeId::BOOLEAN,
        TypeId::CHAR,
        TypeId::WCHAR,
    ];

    /// Add a descriptor and return its handle.
    pub fn alloc(&mut self, descriptor: TypeDescriptor) -> TypeId {
        let raw = u32::try_from(self.types.len()).unwrap_or(u32::MAX);
        self.types.push(descriptor);
        TypeId::from_raw(raw)
    }

    /// Look up a descriptor.
    ///
    /// Every `TypeId` handed out by this pool is valid for its lifetime;
    /// an id from another pool is a caller bug and panics.
    #[inline]
    pub fn get(&self, id: TypeId) -> &TypeDescriptor {
        &self.types[id.index()]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Allocate an array type of `element_count` elements.
    ///
    /// `max_index` is set to the element count, as open arrays produced by
    /// conversions expect.
    pub fn array(&mut self, element: TypeId, element_count: usize) -> TypeId {
        let size = self.get(element).size.saturating_mul(element_count);
        self.alloc(TypeDescriptor::new(
            None,
            size,
            TypeKind::Array(ArrayInfo {
                element,
                element_count,
                max_index: element_count,
            }),
        ))
    }

    /// Allocate an enumeration over `constants`, ordinal order.
    pub fn enumeration(&mut self, name: &str, constants: Vec<SymbolRef>) -> TypeId {
        self.alloc(TypeDescriptor::new(
            Some(name),
            4,
            TypeKind::Enum { constants },
        ))
    }

    /// Allocate a subrange of `base`.
    pub fn subrange(&mut self, base: TypeId, min: i32, max: i32) -> TypeId {
        let size = self.get(base).size;
        self.alloc(TypeDescriptor::new(
            None,
            size,
            TypeKind::Subrange { base, min, max },
        ))
    }

    /// Allocate a record type whose fields live in `fields`.
    pub fn complex(&mut self, name: &str, size: usize, fields: Option<TableIndex>) -> TypeId {
        self.alloc(TypeDescriptor::new(
            Some(name),
            size,
            TypeKind::Complex { fields },
        ))
    }

    #[inline]
    pub fn form(&self, id: TypeId) -> TypeForm {
        self.get(id).form()
    }

    #[inline]
    pub fn size(&self, id: TypeId) -> usize {
        self.get(id).size
    }

    /// The type a subrange ranges over; any other type is its own base.
    pub fn base_type(&self, id: TypeId) -> TypeId {
        let mut current = id;
        while let TypeKind::Subrange { base, .. } = self.get(current).kind {
            current = base;
        }
        current
    }

    /// Representation code, looking through subranges.
    pub fn code(&self, id: TypeId) -> TypeCode {
        self.get(self.base_type(id)).code()
    }

    /// Whether `id` is an array whose element type is `char`.
    pub fn is_char_array(&self, id: TypeId) -> bool {
        self.get(id)
            .array()
            .is_some_and(|info| info.element == TypeId::CHAR)
    }

    pub fn class_scope(&self, id: TypeId) -> Option<TableIndex> {
        self.get(id).class_scope
    }

    /// Point a type's member lookups at `table`.
    pub fn set_class_scope(&mut self, id: TypeId, table: TableIndex) {
        self.types[id.index()].class_scope = Some(table);
    }

    /// Printable name: declared name, or a structural rendering.
    pub fn display_name(&self, id: TypeId) -> String {
        let desc = self.get(id);
        if let Some(name) = &desc.name {
            return name.clone();
        }
        match &desc.kind {
            TypeKind::Array(info) => {
                format!("{}[{}]", self.display_name(info.element), info.element_count)
            }
            TypeKind::Subrange { base, min, max } => {
                format!("{}({min}..{max})", self.display_name(*base))
            }
            _ => desc.form().name().to_string(),
        }
    }
}

impl Default for TypePool {
    fn default() -> Self {
        Self::new()
    }
}
