//! Cx symbol tables.
//!
//! One `SymbolTable` per lexical scope. Each table is an unbalanced binary
//! search tree keyed by identifier, stored in an arena the table owns.
//! Identifier counts per scope are small, so lookups stay a plain ordered
//! descent with no rebalancing.
//!
//! # Addressing
//!
//! - During analysis nodes are reached by `SymbolRef` (table + arena slot).
//! - `SymbolTable::flatten` assigns every node a `NodeIndex` in key order
//!   and builds the index-addressable node vector. From then on a
//!   `SymbolAddr` resolves with two bounded integer lookups through
//!   `Symtabs::resolve`.
//!
//! `Symtabs` owns every table of a session in creation order; a table's
//! position in it is its `TableIndex`.

mod error;
mod node;
mod symtabs;
mod table;
mod xref;

pub use error::{AbortCode, SymtabError, SymtabResult};
pub use node::{DefnKind, Definition, RoutineCode, RoutineDefn, SymbolNode};
pub use symtabs::Symtabs;
pub use table::{InOrder, SymbolTable};
pub use xref::{CrossReferenceList, LINE_NUMBER_WIDTH};
