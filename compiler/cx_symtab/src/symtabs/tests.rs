use super::*;
use cx_ir::{NodeId, NodeIndex, SessionContext};
use pretty_assertions::assert_eq;

fn enter(tabs: &mut Symtabs, table: TableIndex, name: &str) -> SymbolRef {
    let ctx = SessionContext::new();
    let id = tabs
        .table_mut(table)
        .enter(name, &ctx)
        .unwrap_or_else(|e| panic!("{e}"));
    SymbolRef::new(table, id)
}

#[test]
fn table_indices_increase() {
    let mut tabs = Symtabs::new();
    let created: Vec<TableIndex> = (0..4)
        .map(|_| tabs.create_table().unwrap_or_else(|e| panic!("{e}")))
        .collect();
    assert_eq!(created, (0..4).map(TableIndex::new).collect::<Vec<_>>());
    for (table, &ix) in tabs.iter().zip(&created) {
        assert_eq!(table.table_index(), ix);
    }
}

#[test]
fn too_many_tables() {
    let mut tabs = Symtabs::with_limit(2);
    assert!(tabs.create_table().is_ok());
    assert!(tabs.create_table().is_ok());
    let Err(err) = tabs.create_table() else {
        panic!("third table should be refused");
    };
    assert_eq!(err, SymtabError::TooManyTables { max: 2 });
    assert_eq!(err.abort_code(), crate::AbortCode::TooManyScopes);
    assert_eq!(tabs.len(), 2);
}

#[test]
fn resolve_round_trips_through_addresses() {
    let mut tabs = Symtabs::new();
    let globals = tabs.create_table().unwrap_or_else(|e| panic!("{e}"));
    let locals = tabs.create_table().unwrap_or_else(|e| panic!("{e}"));
    let syms = [
        enter(&mut tabs, globals, "total"),
        enter(&mut tabs, globals, "main"),
        enter(&mut tabs, locals, "i"),
    ];
    tabs.flatten_all().unwrap_or_else(|e| panic!("{e}"));

    for sym in syms {
        let addr = tabs.address_of(sym).unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(addr.table, sym.table);
        assert_eq!(tabs.resolve(addr), Ok(sym));
    }
    let Ok(node) = tabs.resolve_node(SymbolAddr::new(globals, NodeIndex::new(0))) else {
        panic!("(0, 0) should resolve");
    };
    assert_eq!(node.name(), "main");
}

#[test]
fn resolve_before_flatten_fails() {
    let mut tabs = Symtabs::new();
    let t = tabs.create_table().unwrap_or_else(|e| panic!("{e}"));
    let sym = enter(&mut tabs, t, "v");
    assert_eq!(tabs.address_of(sym), Err(SymtabError::NotFlattened(t)));
    let addr = SymbolAddr::new(t, NodeIndex::new(0));
    assert_eq!(tabs.resolve(addr), Err(SymtabError::NotFlattened(t)));

    tabs.flatten(t).unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(tabs.resolve(addr), Ok(sym));
}

#[test]
fn resolve_rejects_foreign_addresses() {
    let mut tabs = Symtabs::new();
    let t = tabs.create_table().unwrap_or_else(|e| panic!("{e}"));
    tabs.flatten_all().unwrap_or_else(|e| panic!("{e}"));

    let no_table = SymbolAddr::new(TableIndex::new(9), NodeIndex::new(0));
    assert_eq!(tabs.resolve(no_table), Err(SymtabError::BadAddress(no_table)));

    let no_node = SymbolAddr::new(t, NodeIndex::new(0));
    assert_eq!(tabs.resolve(no_node), Err(SymtabError::BadAddress(no_node)));
}

#[test]
fn node_access_by_reference() {
    let mut tabs = Symtabs::new();
    let t = tabs.create_table().unwrap_or_else(|e| panic!("{e}"));
    let sym = enter(&mut tabs, t, "pi");
    if let Ok(node) = tabs.node_mut(sym) {
        node.value = 3.25;
    }
    assert_eq!(tabs.node(sym).map(|n| n.value), Ok(3.25));

    let missing = SymbolRef::new(t, NodeId::new(5));
    assert_eq!(
        tabs.node(missing).map(SymbolNode::name),
        Err(SymtabError::UnknownNode(missing))
    );
    assert_eq!(
        tabs.get(TableIndex::new(3)).map(SymbolTable::node_count),
        Err(SymtabError::UnknownTable(TableIndex::new(3)))
    );
}
