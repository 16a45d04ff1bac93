//! Symbol table nodes and their definitions.

use std::fmt;

use cx_ir::{BuiltinMember, Chunk, NodeId, NodeIndex, SymbolRef, TableIndex, TypeId};
use smallvec::SmallVec;

use crate::CrossReferenceList;

/// How a routine's body is provided.
#[derive(Clone, Debug, PartialEq)]
pub enum RoutineCode {
    /// Declared; body not yet analyzed.
    Declared,
    /// Forward declaration awaiting its body.
    Forward,
    /// Implemented natively by the executor.
    Native(BuiltinMember),
    /// Compiled body run by the executor.
    Interpreted(Chunk),
}

/// Definition data for programs, procedures, and functions.
#[derive(Clone, Debug, PartialEq)]
pub struct RoutineDefn {
    pub code: RoutineCode,
    /// Number of formal parameters; equals `params.len()`.
    pub parm_count: usize,
    /// Sum of the parameters' byte sizes.
    pub total_parm_size: usize,
    /// Formal parameters in declaration order.
    pub params: SmallVec<[SymbolRef; 4]>,
    /// Local variables, constants, and types.
    pub locals: Vec<SymbolRef>,
    /// The routine's own scope, if it has one.
    pub scope: Option<TableIndex>,
}

impl RoutineDefn {
    pub fn new(code: RoutineCode) -> Self {
        RoutineDefn {
            code,
            parm_count: 0,
            total_parm_size: 0,
            params: SmallVec::new(),
            locals: Vec::new(),
            scope: None,
        }
    }

    /// Native member handled by the executor, if any.
    #[inline]
    pub fn native(&self) -> Option<BuiltinMember> {
        match self.code {
            RoutineCode::Native(member) => Some(member),
            _ => None,
        }
    }
}

/// Kind tag of a [`Definition`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DefnKind {
    Undefined,
    Constant,
    Type,
    Variable,
    Field,
    ValueParm,
    VarParm,
    Program,
    Procedure,
    Function,
}

impl DefnKind {
    pub const fn name(self) -> &'static str {
        match self {
            DefnKind::Undefined => "undefined",
            DefnKind::Constant => "constant",
            DefnKind::Type => "type",
            DefnKind::Variable => "variable",
            DefnKind::Field => "field",
            DefnKind::ValueParm => "value parameter",
            DefnKind::VarParm => "var parameter",
            DefnKind::Program => "program",
            DefnKind::Procedure => "procedure",
            DefnKind::Function => "function",
        }
    }

    /// Whether storage for this kind lives in the executor's frames.
    pub const fn has_storage(self) -> bool {
        matches!(
            self,
            DefnKind::Variable | DefnKind::Field | DefnKind::ValueParm | DefnKind::VarParm
        )
    }
}

impl fmt::Display for DefnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What an identifier has been declared as.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Definition {
    #[default]
    Undefined,
    /// Constant or enumeration constant; its value is the node's `value`.
    Constant,
    Type,
    Variable,
    Field,
    ValueParm,
    VarParm,
    Program(RoutineDefn),
    Procedure(RoutineDefn),
    Function(RoutineDefn),
}

impl Definition {
    pub fn kind(&self) -> DefnKind {
        match self {
            Definition::Undefined => DefnKind::Undefined,
            Definition::Constant => DefnKind::Constant,
            Definition::Type => DefnKind::Type,
            Definition::Variable => DefnKind::Variable,
            Definition::Field => DefnKind::Field,
            Definition::ValueParm => DefnKind::ValueParm,
            Definition::VarParm => DefnKind::VarParm,
            Definition::Program(_) => DefnKind::Program,
            Definition::Procedure(_) => DefnKind::Procedure,
            Definition::Function(_) => DefnKind::Function,
        }
    }

    pub fn routine(&self) -> Option<&RoutineDefn> {
        match self {
            Definition::Program(r) | Definition::Procedure(r) | Definition::Function(r) => Some(r),
            _ => None,
        }
    }

    pub fn routine_mut(&mut self) -> Option<&mut RoutineDefn> {
        match self {
            Definition::Program(r) | Definition::Procedure(r) | Definition::Function(r) => Some(r),
            _ => None,
        }
    }
}

/// One identifier in a scope.
///
/// Nodes are owned by the arena of the table they were entered into.
/// `left`/`right` are arena slots in that same table.
#[derive(Clone, Debug)]
pub struct SymbolNode {
    name: String,
    pub(crate) left: Option<NodeId>,
    pub(crate) right: Option<NodeId>,
    table_index: TableIndex,
    pub(crate) node_index: Option<NodeIndex>,
    /// Constant value or enumeration ordinal.
    pub value: f64,
    pub(crate) xref: CrossReferenceList,
    /// Declared type; `None` until analysis assigns one.
    pub ty: Option<TypeId>,
    pub defn: Definition,
}

impl SymbolNode {
    pub(crate) fn new(name: &str, table_index: TableIndex) -> Self {
        SymbolNode {
            name: name.to_string(),
            left: None,
            right: None,
            table_index,
            node_index: None,
            value: 0.0,
            xref: CrossReferenceList::new(),
            ty: None,
            defn: Definition::Undefined,
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn left(&self) -> Option<NodeId> {
        self.left
    }

    #[inline]
    pub fn right(&self) -> Option<NodeId> {
        self.right
    }

    #[inline]
    pub fn table_index(&self) -> TableIndex {
        self.table_index
    }

    /// Position in the flattened node vector; `None` before flattening.
    #[inline]
    pub fn node_index(&self) -> Option<NodeIndex> {
        self.node_index
    }

    #[inline]
    pub fn xref(&self) -> &CrossReferenceList {
        &self.xref
    }

    #[inline]
    pub fn kind(&self) -> DefnKind {
        self.defn.kind()
    }
}
