//! Type system surface consumed by the Cx symbol table and executor.
//!
//! All types live in a `TypePool` and are referenced by `TypeId`. The
//! scalar types and the stream type are pre-interned at fixed indices
//! (see `TypeId::INTEGER` and friends), so identity tests are O(1).
//!
//! The executor only reads descriptors - form, size, element type, base
//! type - with two exceptions: the built-in member registry installs a
//! class scope on the scalar and stream types, and `to_str`/`read`
//! allocate fresh array types for their results.

mod descriptor;
mod form;
mod pool;

pub use cx_ir::TypeId;
pub use descriptor::{ArrayInfo, TypeDescriptor, TypeKind};
pub use form::{TypeCode, TypeForm};
pub use pool::TypePool;
