//! Property-based tests for symbol tables.
//!
//! Random identifier sets in random insertion order check that:
//! 1. `enter` is idempotent
//! 2. the tree keeps binary search ordering
//! 3. flattening indexes every node exactly once, in key order

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use std::collections::BTreeSet;

use cx_ir::{NodeId, NodeIndex, SessionContext, SymbolAddr};
use cx_symtab::{SymbolTable, Symtabs};
use proptest::prelude::*;

fn identifier_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z_][a-z0-9_]{0,7}").expect("valid regex")
}

fn names_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(identifier_strategy(), 0..64)
}

/// Keys of the subtree rooted at `id`.
fn subtree_keys(table: &SymbolTable, id: Option<NodeId>, out: &mut Vec<String>) {
    let mut stack: Vec<NodeId> = id.into_iter().collect();
    while let Some(id) = stack.pop() {
        let node = table.node(id);
        out.push(node.name().to_string());
        stack.extend(node.left());
        stack.extend(node.right());
    }
}

fn build(names: &[String]) -> (Symtabs, cx_ir::TableIndex) {
    let ctx = SessionContext::new();
    let mut tabs = Symtabs::new();
    let t = tabs.create_table().unwrap();
    for name in names {
        tabs.table_mut(t).enter(name, &ctx).unwrap();
    }
    (tabs, t)
}

proptest! {
    #[test]
    fn enter_twice_returns_same_node(names in names_strategy()) {
        let ctx = SessionContext::new();
        let (mut tabs, t) = build(&names);
        let table = tabs.table_mut(t);
        for name in &names {
            let first = table.enter(name, &ctx).unwrap();
            let second = table.enter(name, &ctx).unwrap();
            prop_assert_eq!(first, second);
        }
        let distinct: BTreeSet<&String> = names.iter().collect();
        prop_assert_eq!(table.node_count(), distinct.len());
    }

    #[test]
    fn tree_is_ordered(names in names_strategy()) {
        let (tabs, t) = build(&names);
        let table = tabs.table(t);
        for id in table.iter_in_order() {
            let node = table.node(id);
            let mut left = Vec::new();
            subtree_keys(table, node.left(), &mut left);
            prop_assert!(left.iter().all(|k| k.as_str() < node.name()));
            let mut right = Vec::new();
            subtree_keys(table, node.right(), &mut right);
            prop_assert!(right.iter().all(|k| k.as_str() > node.name()));
        }
    }

    #[test]
    fn flatten_indexes_every_node(names in names_strategy()) {
        let (mut tabs, t) = build(&names);
        tabs.flatten_all().unwrap();
        let table = tabs.table(t);
        let flat = table.node_vector().unwrap();
        prop_assert_eq!(flat.len(), table.node_count());
        for (i, &id) in flat.iter().enumerate() {
            prop_assert_eq!(table.node(id).node_index(), NodeIndex::from_usize(i));
            let addr = SymbolAddr::new(t, NodeIndex::from_usize(i).unwrap());
            prop_assert_eq!(tabs.resolve(addr).unwrap().node, id);
        }
        let keys: Vec<&str> = flat.iter().map(|&id| table.node(id).name()).collect();
        prop_assert!(keys.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn table_indices_strictly_increase(count in 1usize..32) {
        let mut tabs = Symtabs::new();
        let indices: Vec<_> = (0..count).map(|_| tabs.create_table().unwrap()).collect();
        prop_assert!(indices.windows(2).all(|w| w[0] < w[1]));
    }
}
