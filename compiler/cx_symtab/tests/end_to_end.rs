//! Analysis-to-addressing flow over a small program's scopes.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use cx_ir::{SessionContext, SymbolRef, TypeId};
use cx_symtab::{Definition, DefnKind, RoutineCode, RoutineDefn, Symtabs};
use pretty_assertions::assert_eq;

#[test]
fn enter_x_y_x_then_flatten() {
    let ctx = SessionContext::new();
    let mut tabs = Symtabs::new();
    let t = tabs.create_table().unwrap();
    let table = tabs.table_mut(t);

    let x1 = table.enter("x", &ctx).unwrap();
    let _y = table.enter("y", &ctx).unwrap();
    let x2 = table.enter("x", &ctx).unwrap();

    assert_eq!(table.node_count(), 2);
    assert_eq!(x1, x2);
    assert_eq!(table.search("x"), table.search("x"));

    table.flatten().unwrap();
    let flat = table.node_vector().unwrap();
    assert_eq!(flat.len(), 2);
    let mut indices: Vec<u16> = flat
        .iter()
        .map(|&id| table.node(id).node_index().unwrap().raw())
        .collect();
    indices.sort_unstable();
    assert_eq!(indices, [0, 1]);
    // Key order: "x" precedes "y".
    assert_eq!(table.node(flat[0]).name(), "x");
}

#[test]
fn routine_scope_with_parameters() {
    let mut ctx = SessionContext::builder().xref(true).starting_line(1).build();
    let mut tabs = Symtabs::new();
    let globals = tabs.create_table().unwrap();
    let body = tabs.create_table().unwrap();

    let square = tabs.table_mut(globals).enter("square", &ctx).unwrap();
    ctx.next_line();
    let n = tabs.table_mut(body).enter("n", &ctx).unwrap();
    let n_ref = SymbolRef::new(body, n);
    {
        let node = tabs.table_mut(body).node_mut(n);
        node.defn = Definition::ValueParm;
        node.ty = Some(TypeId::INTEGER);
    }

    let mut routine = RoutineDefn::new(RoutineCode::Forward);
    routine.params.push(n_ref);
    routine.parm_count = 1;
    routine.total_parm_size = 4;
    routine.scope = Some(body);
    let square_node = tabs.table_mut(globals).node_mut(square);
    square_node.defn = Definition::Function(routine);
    square_node.ty = Some(TypeId::INTEGER);

    ctx.next_line();
    tabs.table_mut(body).lookup("n", &ctx);

    tabs.flatten_all().unwrap();

    let square_ref = SymbolRef::new(globals, square);
    let addr = tabs.address_of(square_ref).unwrap();
    let node = tabs.resolve_node(addr).unwrap();
    assert_eq!(node.kind(), DefnKind::Function);
    let Some(routine) = node.defn.routine() else {
        panic!("function carries a routine definition");
    };
    assert_eq!(routine.parm_count, routine.params.len());
    let param = tabs.node(routine.params[0]).unwrap();
    assert_eq!(param.name(), "n");
    assert_eq!(param.kind(), DefnKind::ValueParm);
    assert_eq!(param.xref().lines(), &[2, 3]);
    assert_eq!(tabs.table(body).print_xref(&ctx), "n                  2   3\n");
}
