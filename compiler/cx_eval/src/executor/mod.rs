//! Stack-based executor.
//!
//! Runs compiled chunks against the flattened symbol tables. Every
//! expression is evaluated through `push`, `pop`, and `top` alone.
//!
//! # Calling convention
//!
//! The caller pushes arguments left to right (for member calls the
//! receiver goes first). The callee pops exactly its declared parameters,
//! pushes one result unless it is a procedure, and reports its declared
//! result type so the caller continues without inspecting the callee.
//! Native members and interpreted routines share this protocol.

mod members;

use cx_ir::{Chunk, Op, SessionContext, SymbolRef, TableIndex, TypeId};
use cx_symtab::{DefnKind, RoutineCode, RoutineDefn, SymbolNode, Symtabs};
use cx_types::{TypeCode, TypePool};
use rustc_hash::FxHashMap;

use crate::output::{stdout_sink, SharedOutput};
use crate::stack::ensure_sufficient_stack;
use crate::streams::StreamTable;
use crate::tracer::Tracer;
use crate::value::{Place, VarAddr};
use crate::{errors::type_mismatch, CharBuffer, EvalError, EvalResult, EvalStack, StackItem};

pub(crate) use members::handler_arity;

/// Storage for one active interpreted routine.
struct Frame {
    scope: Option<TableIndex>,
    locals: FxHashMap<SymbolRef, StackItem>,
}

/// Executes compiled code for one session.
pub struct Executor<'a> {
    symtabs: &'a Symtabs,
    types: &'a mut TypePool,
    ctx: &'a mut SessionContext,
    stack: EvalStack,
    globals: FxHashMap<SymbolRef, StackItem>,
    frames: Vec<Frame>,
    streams: StreamTable,
    tracer: Tracer,
}

impl<'a> Executor<'a> {
    /// Executor writing to stdout.
    pub fn new(symtabs: &'a Symtabs, types: &'a mut TypePool, ctx: &'a mut SessionContext) -> Self {
        Executor {
            symtabs,
            types,
            ctx,
            stack: EvalStack::new(),
            globals: FxHashMap::default(),
            frames: Vec::new(),
            streams: StreamTable::new(),
            tracer: Tracer::new(stdout_sink()),
        }
    }

    /// Route trace lines and standard-output writes to `out`.
    #[must_use]
    pub fn with_output(mut self, out: SharedOutput) -> Self {
        self.tracer = Tracer::new(out);
        self
    }

    #[inline]
    pub fn output(&self) -> &SharedOutput {
        self.tracer.output()
    }

    #[inline]
    pub fn stack(&self) -> &EvalStack {
        &self.stack
    }

    #[inline]
    pub fn types(&self) -> &TypePool {
        &*self.types
    }

    #[inline]
    pub fn context(&self) -> &SessionContext {
        &*self.ctx
    }

    #[inline]
    pub fn streams(&self) -> &StreamTable {
        &self.streams
    }

    /// A fresh, closed stream slot for a `file` variable.
    pub fn open_stream(&mut self) -> StackItem {
        StackItem::Stream(self.streams.allocate())
    }

    #[inline]
    pub fn push(&mut self, item: StackItem) {
        self.stack.push(item);
    }

    #[inline]
    pub fn pop(&mut self) -> EvalResult<StackItem> {
        self.stack.pop()
    }

    #[inline]
    pub fn top(&self) -> EvalResult<&StackItem> {
        self.stack.top()
    }

    /// Bind a global's initial value without tracing it.
    pub fn define(&mut self, sym: SymbolRef, item: StackItem) {
        self.globals.insert(sym, item);
    }

    /// Innermost activation whose scope holds `sym`, or the globals.
    fn place(&self, sym: SymbolRef) -> Place {
        self.frames
            .iter()
            .rposition(|frame| frame.scope == Some(sym.table))
            .map_or(Place::Global, Place::Frame)
    }

    fn slot(&self, place: Place, sym: SymbolRef) -> Option<&StackItem> {
        match place {
            Place::Global => self.globals.get(&sym),
            Place::Frame(i) => self.frames.get(i)?.locals.get(&sym),
        }
    }

    fn write_slot(&mut self, place: Place, sym: SymbolRef, item: StackItem) {
        match place {
            Place::Global => {
                self.globals.insert(sym, item);
            }
            Place::Frame(i) => {
                if let Some(frame) = self.frames.get_mut(i) {
                    frame.locals.insert(sym, item);
                }
            }
        }
    }

    /// The variable a var parameter is bound to.
    fn referent(&self, node: &SymbolNode, sym: SymbolRef) -> Option<VarAddr> {
        if node.kind() != DefnKind::VarParm {
            return None;
        }
        match self.slot(self.place(sym), sym) {
            Some(&StackItem::Addr(target)) => Some(target),
            _ => None,
        }
    }

    /// Value of a variable, parameter, or constant.
    pub fn fetch(&mut self, sym: SymbolRef) -> EvalResult<StackItem> {
        let symtabs = self.symtabs;
        let node = symtabs.node(sym)?;

        let item = if node.kind() == DefnKind::Constant {
            self.constant_item(node)?
        } else {
            let (place, sym) = match self.referent(node, sym) {
                Some(target) => (target.place, target.sym),
                None => (self.place(sym), sym),
            };
            self.slot(place, sym).cloned().ok_or_else(|| unbound(node))?
        };

        self.tracer
            .data_fetch(self.ctx, node, &item, self.types, self.symtabs);
        Ok(item)
    }

    /// Assign `item` to a variable or parameter. Stores to a var
    /// parameter write through to its referent.
    pub fn store(&mut self, sym: SymbolRef, item: StackItem) -> EvalResult<()> {
        let symtabs = self.symtabs;
        let node = symtabs.node(sym)?;
        self.tracer
            .data_store(self.ctx, node, &item, self.types, self.symtabs);

        let (place, sym) = match self.referent(node, sym) {
            Some(target) => (target.place, target.sym),
            None => (self.place(sym), sym),
        };
        self.write_slot(place, sym, item);
        Ok(())
    }

    /// Address to pass for a var parameter. The address records the
    /// activation that owns the variable; a var parameter passes its own
    /// referent along.
    fn address(&self, sym: SymbolRef) -> EvalResult<StackItem> {
        let node = self.symtabs.node(sym)?;
        let target = self.referent(node, sym).unwrap_or(VarAddr {
            sym,
            place: self.place(sym),
        });
        Ok(StackItem::Addr(target))
    }

    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "constant slots hold values already range-checked by analysis"
    )]
    fn constant_item(&self, node: &SymbolNode) -> EvalResult<StackItem> {
        let value = node.value;
        let ty = node.ty.unwrap_or(TypeId::INTEGER);
        Ok(match self.types.code(ty) {
            TypeCode::Int => StackItem::Int(value as i32),
            TypeCode::Float => StackItem::Float(value as f32),
            TypeCode::Bool => StackItem::Bool(value != 0.0),
            TypeCode::Char => StackItem::Char(value as u8),
            TypeCode::WChar => StackItem::WChar(char::from_u32(value as u32).unwrap_or('\0')),
            TypeCode::Byte => StackItem::Byte(value as u8),
            TypeCode::Address => return Err(type_mismatch("scalar constant", "address")),
        })
    }

    /// Call the routine `sym` with its arguments already pushed.
    ///
    /// `receiver` is the static type of the receiver for member calls.
    /// Returns the routine's result type.
    #[tracing::instrument(level = "debug", skip_all, fields(routine = ?sym))]
    pub fn call(&mut self, sym: SymbolRef, receiver: Option<TypeId>) -> EvalResult<TypeId> {
        let symtabs = self.symtabs;
        let node = symtabs.node(sym)?;
        let Some(routine) = node.defn.routine() else {
            return Err(EvalError::NotARoutine {
                name: node.name().to_string(),
            });
        };
        let declared = node.ty.unwrap_or(TypeId::VOID);

        match &routine.code {
            RoutineCode::Native(member) => {
                let receiver =
                    receiver.ok_or_else(|| type_mismatch("member receiver", "none"))?;
                self.call_native(*member, receiver, declared)
            }
            RoutineCode::Interpreted(chunk) => {
                self.call_interpreted(node, routine, chunk)?;
                Ok(declared)
            }
            RoutineCode::Declared | RoutineCode::Forward => Err(EvalError::NotARoutine {
                name: node.name().to_string(),
            }),
        }
    }

    fn call_interpreted(
        &mut self,
        node: &SymbolNode,
        routine: &RoutineDefn,
        chunk: &Chunk,
    ) -> EvalResult<()> {
        let limit = self.ctx.max_call_depth();
        if self.frames.len() >= limit {
            return Err(EvalError::CallDepthExceeded { limit });
        }
        // A program's own variables are the globals and outlive its frame.
        let scope = match node.kind() {
            DefnKind::Program => None,
            _ => routine.scope,
        };
        let mut frame = Frame {
            scope,
            locals: FxHashMap::default(),
        };
        for (bound, &param) in routine.params.iter().rev().enumerate() {
            let Ok(arg) = self.stack.pop() else {
                return Err(EvalError::ArityMismatch {
                    routine: node.name().to_string(),
                    expected: routine.params.len(),
                    found: bound,
                });
            };
            frame.locals.insert(param, arg);
        }

        self.tracer.routine_entry(self.ctx, node.name());
        self.frames.push(frame);
        let result = ensure_sufficient_stack(|| self.run(chunk));
        self.frames.pop();
        result?;
        self.tracer.routine_exit(self.ctx, node.name());
        Ok(())
    }

    /// Run a program routine from the top level.
    pub fn execute_program(&mut self, program: SymbolRef) -> EvalResult<()> {
        self.call(program, None).map(|_| ())
    }

    /// Execute `chunk` until it ends or returns.
    pub fn run(&mut self, chunk: &Chunk) -> EvalResult<()> {
        let symtabs = self.symtabs;
        for op in chunk.ops() {
            match op {
                Op::PushInt(v) => self.push(StackItem::Int(*v)),
                Op::PushFloat(v) => self.push(StackItem::Float(*v)),
                Op::PushChar(c) => self.push(StackItem::Char(*c)),
                Op::PushWChar(c) => self.push(StackItem::WChar(*c)),
                Op::PushBool(b) => self.push(StackItem::Bool(*b)),
                Op::PushByte(b) => self.push(StackItem::Byte(*b)),
                Op::PushStr(s) => self.push(StackItem::Buffer(CharBuffer::from(s.as_str()))),
                Op::Fetch(addr) => {
                    let item = self.fetch(symtabs.resolve(*addr)?)?;
                    self.push(item);
                }
                Op::FetchAddr(addr) => {
                    let item = self.address(symtabs.resolve(*addr)?)?;
                    self.push(item);
                }
                Op::Store(addr) => {
                    let sym = symtabs.resolve(*addr)?;
                    let item = self.pop()?;
                    self.store(sym, item)?;
                }
                Op::Call(addr) => {
                    self.call(symtabs.resolve(*addr)?, None)?;
                }
                Op::CallMember { member, receiver } => {
                    self.call(symtabs.resolve(*member)?, Some(*receiver))?;
                }
                Op::Statement(line) => {
                    self.ctx.set_current_line(*line);
                    self.tracer.statement(self.ctx);
                }
                Op::Add | Op::Sub | Op::Mul => self.arithmetic(op)?,
                Op::Pop => {
                    self.pop()?;
                }
                Op::Return => return Ok(()),
            }
        }
        Ok(())
    }

    fn arithmetic(&mut self, op: &Op) -> EvalResult<()> {
        let rhs = self.pop()?;
        let lhs = self.pop()?;
        let result = match (&lhs, &rhs) {
            (StackItem::Float(_), _) | (_, StackItem::Float(_)) => {
                let (a, b) = (float_operand(&lhs)?, float_operand(&rhs)?);
                StackItem::Float(match op {
                    Op::Add => a + b,
                    Op::Sub => a - b,
                    _ => a * b,
                })
            }
            _ => {
                let a = lhs
                    .as_int()
                    .ok_or_else(|| type_mismatch("number", lhs.kind_name()))?;
                let b = rhs
                    .as_int()
                    .ok_or_else(|| type_mismatch("number", rhs.kind_name()))?;
                StackItem::Int(match op {
                    Op::Add => a.wrapping_add(b),
                    Op::Sub => a.wrapping_sub(b),
                    _ => a.wrapping_mul(b),
                })
            }
        };
        self.push(result);
        Ok(())
    }
}

#[expect(clippy::cast_precision_loss, reason = "int to float promotion as in C")]
fn float_operand(item: &StackItem) -> EvalResult<f32> {
    match item {
        StackItem::Float(v) => Ok(*v),
        other => other
            .as_int()
            .map(|v| v as f32)
            .ok_or_else(|| type_mismatch("number", other.kind_name())),
    }
}

fn unbound(node: &SymbolNode) -> EvalError {
    EvalError::UnboundVariable {
        name: node.name().to_string(),
    }
}
