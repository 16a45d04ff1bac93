//! One lexical scope's symbol table.

use std::cmp::Ordering;
use std::fmt::Write;

use cx_ir::{NodeId, NodeIndex, SessionContext, SymbolAddr, SymbolRef, TableIndex};

use crate::{SymbolNode, SymtabError, SymtabResult};

/// Most nodes one table may hold: every node must fit a `NodeIndex`.
pub(crate) const MAX_NODES: usize = NodeIndex::MAX as usize + 1;

/// Width of the identifier column in a cross-reference listing.
const NAME_COLUMN: usize = 16;

/// Unbalanced binary search tree of identifiers, stored in an arena.
///
/// The arena owns every node. Child links and the flattened vector hold
/// `NodeId`s into it, so no node is ever reachable through two owners.
#[derive(Clone, Debug)]
pub struct SymbolTable {
    table_index: TableIndex,
    nodes: Vec<SymbolNode>,
    root: Option<NodeId>,
    /// Arena slots in `NodeIndex` order; `None` until flattened.
    flat: Option<Vec<NodeId>>,
    limit: usize,
}

impl SymbolTable {
    pub(crate) fn new(table_index: TableIndex) -> Self {
        SymbolTable {
            table_index,
            nodes: Vec::new(),
            root: None,
            flat: None,
            limit: MAX_NODES,
        }
    }

    #[cfg(test)]
    pub(crate) fn with_limit(table_index: TableIndex, limit: usize) -> Self {
        SymbolTable {
            limit,
            ..Self::new(table_index)
        }
    }

    #[inline]
    pub fn table_index(&self) -> TableIndex {
        self.table_index
    }

    #[inline]
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn is_flattened(&self) -> bool {
        self.flat.is_some()
    }

    /// Pointer-style reference to a node of this table.
    #[inline]
    pub fn symbol_ref(&self, id: NodeId) -> SymbolRef {
        SymbolRef::new(self.table_index, id)
    }

    /// Node at an arena slot.
    ///
    /// # Panics
    ///
    /// Panics if `id` did not come from this table.
    #[inline]
    pub fn node(&self, id: NodeId) -> &SymbolNode {
        &self.nodes[id.index()]
    }

    /// Mutable node at an arena slot.
    ///
    /// # Panics
    ///
    /// Panics if `id` did not come from this table.
    #[inline]
    pub fn node_mut(&mut self, id: NodeId) -> &mut SymbolNode {
        &mut self.nodes[id.index()]
    }

    #[inline]
    pub fn try_node(&self, id: NodeId) -> Option<&SymbolNode> {
        self.nodes.get(id.index())
    }

    #[inline]
    pub fn try_node_mut(&mut self, id: NodeId) -> Option<&mut SymbolNode> {
        self.nodes.get_mut(id.index())
    }

    /// Find `name` by ordered descent. Records nothing.
    pub fn search(&self, name: &str) -> Option<NodeId> {
        self.descend(name).ok()
    }

    /// Find `name` and, when cross-referencing is on, record the current
    /// line against it.
    pub fn lookup(&mut self, name: &str, ctx: &SessionContext) -> Option<NodeId> {
        let id = self.search(name)?;
        if ctx.xref_enabled() {
            self.nodes[id.index()].xref.update(ctx);
        }
        Some(id)
    }

    /// Enter `name`, returning the existing node if it is already present.
    ///
    /// A new node is linked where the failed search ended. Entering a new
    /// name into a flattened table discards the flattening; the table
    /// must be flattened again before its addresses are used.
    pub fn enter(&mut self, name: &str, ctx: &SessionContext) -> SymtabResult<NodeId> {
        let parent = match self.descend(name) {
            Ok(id) => {
                if ctx.xref_enabled() {
                    self.nodes[id.index()].xref.update(ctx);
                }
                return Ok(id);
            }
            Err(parent) => parent,
        };

        if self.nodes.len() >= self.limit {
            return Err(SymtabError::TableOverflow {
                table: self.table_index,
                max: self.limit,
            });
        }
        let id = NodeId::from_usize(self.nodes.len()).ok_or(SymtabError::TableOverflow {
            table: self.table_index,
            max: self.limit,
        })?;

        let mut node = SymbolNode::new(name, self.table_index);
        if ctx.xref_enabled() {
            node.xref.update(ctx);
        }
        self.nodes.push(node);

        match parent {
            None => self.root = Some(id),
            Some((parent, Ordering::Less)) => self.nodes[parent.index()].left = Some(id),
            Some((parent, _)) => self.nodes[parent.index()].right = Some(id),
        }

        if self.flat.take().is_some() {
            tracing::debug!(table = %self.table_index, "flattening discarded by enter");
            for node in &mut self.nodes {
                node.node_index = None;
            }
        }
        Ok(id)
    }

    /// Ordered descent. `Ok` is the match; `Err` is where a new key would
    /// hang (parent and the side it goes on), or `None` for an empty tree.
    fn descend(&self, name: &str) -> Result<NodeId, Option<(NodeId, Ordering)>> {
        let mut parent = None;
        let mut cursor = self.root;
        while let Some(id) = cursor {
            let node = &self.nodes[id.index()];
            match name.cmp(node.name()) {
                Ordering::Equal => return Ok(id),
                Ordering::Less => {
                    parent = Some((id, Ordering::Less));
                    cursor = node.left;
                }
                Ordering::Greater => {
                    parent = Some((id, Ordering::Greater));
                    cursor = node.right;
                }
            }
        }
        Err(parent)
    }

    /// Arena slots in key order.
    ///
    /// Walks the tree with an explicit stack, so depth is bounded by the
    /// heap and not the call stack however unbalanced the tree is.
    pub fn iter_in_order(&self) -> InOrder<'_> {
        InOrder {
            table: self,
            stack: Vec::new(),
            cursor: self.root,
        }
    }

    /// Assign every node its `NodeIndex` in key order and build the
    /// index-addressable node vector.
    ///
    /// Flattening an already flattened table reassigns the same indices.
    #[tracing::instrument(level = "debug", skip_all, fields(table = %self.table_index))]
    pub fn flatten(&mut self) -> SymtabResult<()> {
        let order: Vec<NodeId> = self.iter_in_order().collect();
        for (i, &id) in order.iter().enumerate() {
            let index = NodeIndex::from_usize(i).ok_or(SymtabError::TableOverflow {
                table: self.table_index,
                max: MAX_NODES,
            })?;
            self.nodes[id.index()].node_index = Some(index);
        }
        tracing::debug!(nodes = order.len(), "table flattened");
        self.flat = Some(order);
        Ok(())
    }

    /// The flattened node vector, in `NodeIndex` order.
    pub fn node_vector(&self) -> SymtabResult<&[NodeId]> {
        self.flat
            .as_deref()
            .ok_or(SymtabError::NotFlattened(self.table_index))
    }

    /// Arena slot at a flattened position.
    pub fn get_flat(&self, index: NodeIndex) -> SymtabResult<NodeId> {
        let flat = self.node_vector()?;
        flat.get(index.index())
            .copied()
            .ok_or(SymtabError::BadAddress(SymbolAddr::new(self.table_index, index)))
    }

    /// Cross-reference listing: one identifier per line in key order,
    /// padded to a fixed column and followed by its line numbers.
    pub fn print_xref(&self, ctx: &SessionContext) -> String {
        let mut out = String::new();
        for id in self.iter_in_order() {
            let node = &self.nodes[id.index()];
            // Writing into a String cannot fail.
            let _ = write!(out, "{:<width$}", node.name(), width = NAME_COLUMN);
            let wrap = node.name().len() > NAME_COLUMN;
            out.push_str(&node.xref().print(wrap, NAME_COLUMN, ctx));
            out.push('\n');
        }
        out
    }
}

/// In-order iterator over a table's arena slots.
pub struct InOrder<'a> {
    table: &'a SymbolTable,
    stack: Vec<NodeId>,
    cursor: Option<NodeId>,
}

impl Iterator for InOrder<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        while let Some(id) = self.cursor {
            self.stack.push(id);
            self.cursor = self.table.nodes[id.index()].left;
        }
        let id = self.stack.pop()?;
        self.cursor = self.table.nodes[id.index()].right;
        Some(id)
    }
}
