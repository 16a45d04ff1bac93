//! Cx IR - shared vocabulary for the Cx compiler and executor.
//!
//! This crate holds the small, dependency-free pieces every other stage
//! agrees on:
//! - Index newtypes that address symbols without live pointers
//!   (`TableIndex`, `NodeIndex`, `NodeId`, `SymbolRef`, `SymbolAddr`)
//! - `TypeId` handles into the type pool
//! - `SessionContext`: the one explicit context value (current line,
//!   trace flags, cross-reference flag, listing width)
//! - Built-in member metadata (`BuiltinMember`, `MemberDef`)
//! - Compiled code (`Op`, `Chunk`)
//!
//! # Addressing
//!
//! During analysis a symbol is reached through a `SymbolRef`: its owning
//! table plus its arena slot. Once a table is flattened every node also
//! has a `NodeIndex`, and the pair `(TableIndex, NodeIndex)` - a
//! `SymbolAddr` - is the only address compiled code is allowed to carry.

pub mod builtin_members;
mod code;
mod context;
mod ids;
mod type_id;

pub use builtin_members::{
    members_in, BuiltinMember, MemberDef, MemberScope, ParamDef, ParamSpec, ReturnSpec,
    BUILTIN_MEMBERS,
};
pub use code::{Chunk, Op};
pub use context::{SessionContext, SessionContextBuilder, TraceFlags, UnknownTraceFlag};
pub use ids::{NodeId, NodeIndex, SymbolAddr, SymbolRef, TableIndex};
pub use type_id::TypeId;
