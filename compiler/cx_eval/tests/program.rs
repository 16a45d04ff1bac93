//! A small program carried from declaration through execution.
//!
//! ```text
//! 1  program demo;
//! 2  var total: int; out: file;
//! 3  function twice(k: int): int;
//! 4  begin twice := k + k end;
//! 5  begin total := twice(21);
//! 6    out.puts(total.to_str)
//! 7  end.
//! ```

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use cx_eval::{buffer_sink, init_tracing, BuiltinRegistry, EvalError, Executor, StackItem, StreamId};
use cx_ir::{Op, SessionContext, SymbolRef, TableIndex, TraceFlags, TypeId};
use cx_symtab::{Definition, RoutineCode, RoutineDefn, Symtabs};
use cx_types::TypePool;
use pretty_assertions::assert_eq;

struct Demo {
    symtabs: Symtabs,
    types: TypePool,
    ctx: SessionContext,
    registry: BuiltinRegistry,
    program: SymbolRef,
    twice: SymbolRef,
    k: SymbolRef,
    total: SymbolRef,
    out: SymbolRef,
}

fn enter(
    symtabs: &mut Symtabs,
    ctx: &SessionContext,
    table: TableIndex,
    name: &str,
    defn: Definition,
    ty: TypeId,
) -> SymbolRef {
    let id = symtabs.table_mut(table).enter(name, ctx).unwrap();
    let node = symtabs.table_mut(table).node_mut(id);
    node.defn = defn;
    node.ty = Some(ty);
    SymbolRef::new(table, id)
}

fn routine(scope: TableIndex, params: &[SymbolRef]) -> RoutineDefn {
    let mut defn = RoutineDefn::new(RoutineCode::Forward);
    defn.params.extend(params.iter().copied());
    defn.parm_count = params.len();
    defn.scope = Some(scope);
    defn
}

/// Declare everything the way analysis would, line by line.
fn analyze(trace: TraceFlags) -> Demo {
    let mut ctx = SessionContext::builder()
        .trace(trace)
        .xref(true)
        .starting_line(1)
        .build();
    let mut symtabs = Symtabs::new();
    let mut types = TypePool::new();
    let registry = BuiltinRegistry::install(&mut symtabs, &mut types, &ctx).unwrap();

    let globals = symtabs.create_table().unwrap();
    let program_scope = symtabs.create_table().unwrap();
    let twice_scope = symtabs.create_table().unwrap();

    let program = enter(&mut symtabs, &ctx, globals, "demo", Definition::Undefined, TypeId::VOID);
    ctx.next_line();
    let total = enter(&mut symtabs, &ctx, program_scope, "total", Definition::Variable, TypeId::INTEGER);
    let out = enter(&mut symtabs, &ctx, program_scope, "out", Definition::Variable, TypeId::STREAM);
    ctx.next_line();
    let twice = enter(&mut symtabs, &ctx, program_scope, "twice", Definition::Undefined, TypeId::INTEGER);
    let k = enter(&mut symtabs, &ctx, twice_scope, "k", Definition::ValueParm, TypeId::INTEGER);
    symtabs.node_mut(twice).unwrap().defn = Definition::Function(routine(twice_scope, &[k]));
    symtabs.node_mut(program).unwrap().defn = Definition::Program(routine(program_scope, &[]));

    ctx.next_line();
    symtabs.table_mut(twice_scope).lookup("k", &ctx);
    ctx.next_line();
    symtabs.table_mut(program_scope).lookup("total", &ctx);
    symtabs.table_mut(program_scope).lookup("twice", &ctx);
    ctx.next_line();
    symtabs.table_mut(program_scope).lookup("out", &ctx);
    symtabs.table_mut(program_scope).lookup("total", &ctx);

    symtabs.flatten_all().unwrap();
    Demo {
        symtabs,
        types,
        ctx,
        registry,
        program,
        twice,
        k,
        total,
        out,
    }
}

/// Compile both bodies against the flattened addresses.
fn compile(demo: &mut Demo) {
    let addr = |sym| demo.symtabs.address_of(sym).unwrap();
    let member = |receiver: TypeId, name: &str| {
        let sym = demo
            .registry
            .lookup(&demo.symtabs, &demo.types, receiver, name)
            .unwrap();
        demo.symtabs.address_of(sym).unwrap()
    };

    let twice_body = vec![Op::Fetch(addr(demo.k)), Op::Fetch(addr(demo.k)), Op::Add, Op::Return];
    let main_body = vec![
        Op::Statement(5),
        Op::PushInt(21),
        Op::Call(addr(demo.twice)),
        Op::Store(addr(demo.total)),
        Op::Statement(6),
        Op::Fetch(addr(demo.out)),
        Op::Fetch(addr(demo.total)),
        Op::CallMember {
            member: member(TypeId::INTEGER, "to_str"),
            receiver: TypeId::INTEGER,
        },
        Op::CallMember {
            member: member(TypeId::STREAM, "puts"),
            receiver: TypeId::STREAM,
        },
        Op::Pop,
    ];

    for (sym, body) in [(demo.twice, twice_body), (demo.program, main_body)] {
        let defn = demo.symtabs.node_mut(sym).unwrap().defn.routine_mut().unwrap();
        defn.code = RoutineCode::Interpreted(body.into_iter().collect());
    }
}

#[test]
fn demo_runs_with_routine_statement_and_store_trace() {
    init_tracing();
    let mut demo = analyze(TraceFlags::ROUTINE | TraceFlags::STATEMENT | TraceFlags::STORE);
    compile(&mut demo);

    let out = buffer_sink();
    let mut exec =
        Executor::new(&demo.symtabs, &mut demo.types, &mut demo.ctx).with_output(out.clone());
    exec.define(demo.out, StackItem::Stream(StreamId::STDOUT));
    exec.execute_program(demo.program).unwrap();

    assert_eq!(exec.fetch(demo.total), Ok(StackItem::Int(42)));
    assert!(exec.stack().is_empty());
    assert_eq!(
        out.output(),
        concat!(
            ">> Entering routine demo\n",
            ">>  At 5\n",
            ">> Entering routine twice\n",
            ">> Exiting routine twice\n",
            ">>   total <== 42\n",
            ">>  At 6\n",
            "42\n",
            ">> Exiting routine demo\n",
        )
    );
}

#[test]
fn untraced_run_writes_only_program_output() {
    let mut demo = analyze(TraceFlags::empty());
    compile(&mut demo);

    let out = buffer_sink();
    let mut exec =
        Executor::new(&demo.symtabs, &mut demo.types, &mut demo.ctx).with_output(out.clone());
    exec.define(demo.out, StackItem::Stream(StreamId::STDOUT));
    exec.execute_program(demo.program).unwrap();
    assert_eq!(out.output(), "42\n");
}

#[test]
fn cross_reference_listing_of_program_scope() {
    let demo = analyze(TraceFlags::empty());
    let table = demo.symtabs.table(demo.total.table);
    let names: Vec<&str> = table.iter_in_order().map(|id| table.node(id).name()).collect();
    assert_eq!(names, ["out", "total", "twice"]);

    let total = table.node(demo.total.node);
    assert_eq!(total.xref().lines(), [2, 5, 6]);
}

#[test]
fn unbound_file_variable_stops_the_program() {
    let mut demo = analyze(TraceFlags::empty());
    compile(&mut demo);

    let mut exec =
        Executor::new(&demo.symtabs, &mut demo.types, &mut demo.ctx).with_output(buffer_sink());
    assert_eq!(
        exec.execute_program(demo.program),
        Err(EvalError::UnboundVariable {
            name: "out".to_string()
        })
    );
}
