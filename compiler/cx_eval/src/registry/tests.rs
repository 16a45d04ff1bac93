use super::*;
use cx_symtab::DefnKind;
use pretty_assertions::assert_eq;

fn installed() -> (Symtabs, TypePool, BuiltinRegistry) {
    let ctx = SessionContext::new();
    let mut symtabs = Symtabs::new();
    let mut types = TypePool::new();
    let registry = BuiltinRegistry::install(&mut symtabs, &mut types, &ctx)
        .unwrap_or_else(|e| panic!("{e}"));
    (symtabs, types, registry)
}

fn param_names(symtabs: &Symtabs, member: SymbolRef) -> Vec<String> {
    let Ok(node) = symtabs.node(member) else {
        panic!("member node exists");
    };
    let Some(routine) = node.defn.routine() else {
        panic!("members are functions");
    };
    routine
        .params
        .iter()
        .map(|&p| {
            symtabs
                .node(p)
                .map(|n| n.name().to_string())
                .unwrap_or_else(|e| panic!("{e}"))
        })
        .collect()
}

#[test]
fn class_scopes_point_at_shared_tables() {
    let (_, types, registry) = installed();
    for ty in TypePool::SCALARS {
        assert_eq!(types.class_scope(ty), Some(registry.scalar_table()));
    }
    assert_eq!(types.class_scope(TypeId::STREAM), Some(registry.stream_table()));
    assert_eq!(types.class_scope(TypeId::VOID), None);
}

#[test]
fn every_member_matches_its_handler() {
    let (symtabs, _, registry) = installed();
    for member in BuiltinMember::ALL {
        let Ok(node) = symtabs.node(registry.member(member)) else {
            panic!("{member} was entered");
        };
        assert_eq!(node.name(), member.name());
        assert_eq!(node.kind(), DefnKind::Function);
        let Some(routine) = node.defn.routine() else {
            panic!("{member} is a function");
        };
        assert_eq!(routine.native(), Some(member));
        assert_eq!(routine.parm_count, member.arity());
        assert_eq!(routine.parm_count, handler_arity(member));
        assert_eq!(routine.params.len(), routine.parm_count);
    }
}

#[test]
fn stream_parameter_chains() {
    let (symtabs, types, registry) = installed();
    let names = |m| param_names(&symtabs, registry.member(m));
    assert_eq!(names(BuiltinMember::Puts), ["str"]);
    assert_eq!(names(BuiltinMember::Open), ["filename", "mode"]);
    assert_eq!(names(BuiltinMember::Reopen), ["filename", "mode"]);
    assert_eq!(names(BuiltinMember::Wide), ["mode"]);
    assert_eq!(names(BuiltinMember::Read), ["size", "count"]);
    assert_eq!(names(BuiltinMember::Write), ["buffer", "size", "count"]);
    assert!(names(BuiltinMember::Close).is_empty());

    let Ok(write) = symtabs.node(registry.member(BuiltinMember::Write)) else {
        panic!("write exists");
    };
    let Some(routine) = write.defn.routine() else {
        panic!("write is a function");
    };
    let Ok(buffer) = symtabs.node(routine.params[0]) else {
        panic!("buffer parameter exists");
    };
    assert_eq!(buffer.kind(), DefnKind::ValueParm);
    let Some(buffer_ty) = buffer.ty else {
        panic!("parameters are typed");
    };
    assert_eq!(types.display_name(buffer_ty), "byte[0]");
    // Two int parameters; the open array contributes no fixed size.
    assert_eq!(routine.total_parm_size, 8);
}

#[test]
fn declared_result_types() {
    let (symtabs, types, registry) = installed();
    let result = |m| {
        symtabs
            .node(registry.member(m))
            .ok()
            .and_then(|n| n.ty)
            .map(|ty| types.display_name(ty))
    };
    assert_eq!(result(BuiltinMember::Size).as_deref(), Some("int"));
    assert_eq!(result(BuiltinMember::ToStr).as_deref(), Some("char[0]"));
    assert_eq!(result(BuiltinMember::ToWstr).as_deref(), Some("wchar[0]"));
    assert_eq!(result(BuiltinMember::ToByte).as_deref(), Some("byte"));
    assert_eq!(result(BuiltinMember::Puts).as_deref(), Some("bool"));
    assert_eq!(result(BuiltinMember::Read).as_deref(), Some("char[0]"));
    assert_eq!(result(BuiltinMember::Write).as_deref(), Some("int"));
}

#[test]
fn member_tables_are_flattened() {
    let (symtabs, _, registry) = installed();
    assert!(symtabs.table(registry.scalar_table()).is_flattened());
    assert!(symtabs.table(registry.stream_table()).is_flattened());
    assert_eq!(symtabs.table(registry.scalar_table()).node_count(), 10);
    assert_eq!(symtabs.table(registry.stream_table()).node_count(), 8);

    let addr = registry
        .member_addr(&symtabs, BuiltinMember::Length)
        .unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(symtabs.resolve(addr), Ok(registry.member(BuiltinMember::Length)));
}

#[test]
fn lookup_through_class_scope() {
    let (symtabs, mut types, registry) = installed();
    let digit = types.subrange(TypeId::INTEGER, 0, 9);
    let name = types.array(TypeId::CHAR, 8);

    assert_eq!(
        registry.lookup(&symtabs, &types, TypeId::CHAR, "to_str"),
        Some(registry.member(BuiltinMember::ToStr))
    );
    assert_eq!(
        registry.lookup(&symtabs, &types, digit, "size"),
        Some(registry.member(BuiltinMember::Size))
    );
    assert_eq!(
        registry.lookup(&symtabs, &types, name, "length"),
        Some(registry.member(BuiltinMember::Length))
    );
    assert_eq!(
        registry.lookup(&symtabs, &types, TypeId::STREAM, "flush"),
        Some(registry.member(BuiltinMember::Flush))
    );
    assert_eq!(registry.lookup(&symtabs, &types, TypeId::STREAM, "size"), None);
    assert_eq!(registry.lookup(&symtabs, &types, TypeId::VOID, "size"), None);
}

#[test]
fn install_happens_once() {
    let ctx = SessionContext::new();
    let mut symtabs = Symtabs::new();
    let mut types = TypePool::new();
    assert!(BuiltinRegistry::install(&mut symtabs, &mut types, &ctx).is_ok());
    let tables = symtabs.len();
    assert_eq!(
        BuiltinRegistry::install(&mut symtabs, &mut types, &ctx).map(|_| ()),
        Err(RegistryError::AlreadyInstalled)
    );
    assert_eq!(symtabs.len(), tables);
}
