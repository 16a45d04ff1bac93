//! The session's symbol table store.

use cx_ir::{SymbolAddr, SymbolRef, TableIndex};

use crate::{SymbolNode, SymbolTable, SymtabError, SymtabResult};

/// Most tables one session may create: every table must fit a `TableIndex`.
const MAX_TABLES: usize = TableIndex::MAX as usize + 1;

/// Every symbol table of a session, in creation order.
///
/// A table's position here is its `TableIndex`, so this vector doubles as
/// the table-of-tables that flattened addresses resolve through. Tables
/// are only created through [`Symtabs::create_table`], which draws the
/// next index; indices are never reused.
#[derive(Clone, Debug)]
pub struct Symtabs {
    tables: Vec<SymbolTable>,
    limit: usize,
}

impl Symtabs {
    pub fn new() -> Self {
        Symtabs {
            tables: Vec::new(),
            limit: MAX_TABLES,
        }
    }

    #[cfg(test)]
    pub(crate) fn with_limit(limit: usize) -> Self {
        Symtabs {
            tables: Vec::new(),
            limit,
        }
    }

    /// Create the table for a newly entered scope.
    pub fn create_table(&mut self) -> SymtabResult<TableIndex> {
        let next = self.tables.len();
        let index = TableIndex::from_usize(next)
            .filter(|_| next < self.limit)
            .ok_or(SymtabError::TooManyTables { max: self.limit })?;
        self.tables.push(SymbolTable::new(index));
        tracing::trace!(table = %index, "symbol table created");
        Ok(index)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// All tables in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &SymbolTable> {
        self.tables.iter()
    }

    pub fn get(&self, index: TableIndex) -> SymtabResult<&SymbolTable> {
        self.tables
            .get(index.index())
            .ok_or(SymtabError::UnknownTable(index))
    }

    pub fn get_mut(&mut self, index: TableIndex) -> SymtabResult<&mut SymbolTable> {
        self.tables
            .get_mut(index.index())
            .ok_or(SymtabError::UnknownTable(index))
    }

    /// Table by index.
    ///
    /// # Panics
    ///
    /// Panics if `index` was not handed out by this store.
    #[inline]
    pub fn table(&self, index: TableIndex) -> &SymbolTable {
        &self.tables[index.index()]
    }

    /// Mutable table by index.
    ///
    /// # Panics
    ///
    /// Panics if `index` was not handed out by this store.
    #[inline]
    pub fn table_mut(&mut self, index: TableIndex) -> &mut SymbolTable {
        &mut self.tables[index.index()]
    }

    /// Node behind a pointer-style reference.
    pub fn node(&self, sym: SymbolRef) -> SymtabResult<&SymbolNode> {
        self.get(sym.table)?
            .try_node(sym.node)
            .ok_or(SymtabError::UnknownNode(sym))
    }

    pub fn node_mut(&mut self, sym: SymbolRef) -> SymtabResult<&mut SymbolNode> {
        self.get_mut(sym.table)?
            .try_node_mut(sym.node)
            .ok_or(SymtabError::UnknownNode(sym))
    }

    pub fn flatten(&mut self, index: TableIndex) -> SymtabResult<()> {
        self.get_mut(index)?.flatten()
    }

    /// Flatten every table; run once analysis of the whole program ends.
    #[tracing::instrument(level = "debug", skip_all, fields(tables = self.tables.len()))]
    pub fn flatten_all(&mut self) -> SymtabResult<()> {
        for table in &mut self.tables {
            table.flatten()?;
        }
        Ok(())
    }

    /// Resolve a flattened address: one lookup for the table, one for the
    /// node.
    pub fn resolve(&self, addr: SymbolAddr) -> SymtabResult<SymbolRef> {
        let table = self
            .tables
            .get(addr.table.index())
            .ok_or(SymtabError::BadAddress(addr))?;
        let id = table.get_flat(addr.node)?;
        Ok(table.symbol_ref(id))
    }

    pub fn resolve_node(&self, addr: SymbolAddr) -> SymtabResult<&SymbolNode> {
        let sym = self.resolve(addr)?;
        self.node(sym)
    }

    /// Flattened address of a node; its table must be flattened.
    pub fn address_of(&self, sym: SymbolRef) -> SymtabResult<SymbolAddr> {
        let node = self.node(sym)?;
        node.node_index()
            .map(|index| SymbolAddr::new(sym.table, index))
            .ok_or(SymtabError::NotFlattened(sym.table))
    }
}

impl Default for Symtabs {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests;
