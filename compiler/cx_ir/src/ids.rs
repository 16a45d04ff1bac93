//! Index newtypes for symbol addressing.
//!
//! Two parallel schemes exist:
//! - `SymbolRef` = (`TableIndex`, `NodeId`): valid from the moment a node is
//!   entered. `NodeId` is the node's slot in its table's arena.
//! - `SymbolAddr` = (`TableIndex`, `NodeIndex`): valid only after the owning
//!   table has been flattened. This is the pointer-free address compiled
//!   code stores.
//!
//! Both table and node indices are 16 bits wide. A persisted program must
//! preserve these assignments exactly.

use std::fmt;

/// Index of a symbol table, drawn from the session's monotonically
/// increasing table counter.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct TableIndex(u16);

impl TableIndex {
    /// Largest representable table index.
    pub const MAX: u16 = u16::MAX;

    #[inline]
    pub const fn new(raw: u16) -> Self {
        TableIndex(raw)
    }

    /// Convert a table count into an index, if it fits.
    #[inline]
    pub fn from_usize(index: usize) -> Option<Self> {
        u16::try_from(index).ok().map(TableIndex)
    }

    #[inline]
    pub const fn raw(self) -> u16 {
        self.0
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for TableIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TableIndex({})", self.0)
    }
}

impl fmt::Display for TableIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Position of a node inside its table's flattened array.
///
/// Assigned by flattening; meaningless before it.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct NodeIndex(u16);

impl NodeIndex {
    /// Largest representable node index.
    pub const MAX: u16 = u16::MAX;

    #[inline]
    pub const fn new(raw: u16) -> Self {
        NodeIndex(raw)
    }

    #[inline]
    pub fn from_usize(index: usize) -> Option<Self> {
        u16::try_from(index).ok().map(NodeIndex)
    }

    #[inline]
    pub const fn raw(self) -> u16 {
        self.0
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for NodeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeIndex({})", self.0)
    }
}

impl fmt::Display for NodeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Arena slot of a node within the table that owns it.
///
/// Slots are handed out in insertion order and never reused, so a
/// `NodeId` is a stable identity for the life of the table.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    pub const fn new(raw: u32) -> Self {
        NodeId(raw)
    }

    #[inline]
    pub fn from_usize(index: usize) -> Option<Self> {
        u32::try_from(index).ok().map(NodeId)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

/// Reference to a node valid during analysis (no flattening required).
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct SymbolRef {
    pub table: TableIndex,
    pub node: NodeId,
}

impl SymbolRef {
    #[inline]
    pub const fn new(table: TableIndex, node: NodeId) -> Self {
        SymbolRef { table, node }
    }
}

/// Pointer-free symbol address: `(tableIndex, nodeIndex)`.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct SymbolAddr {
    pub table: TableIndex,
    pub node: NodeIndex,
}

impl SymbolAddr {
    #[inline]
    pub const fn new(table: TableIndex, node: NodeIndex) -> Self {
        SymbolAddr { table, node }
    }
}

impl fmt::Display for SymbolAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.table, self.node)
    }
}
