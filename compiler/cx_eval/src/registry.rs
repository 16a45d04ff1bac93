//! Built-in member registry.
//!
//! Builds the two shared member tables once per session: one for the
//! scalar types and one for `file`. Each member is entered as a function
//! whose parameters sit in their own scope table, the same shape a
//! user-defined routine has, so call dispatch treats both alike. The
//! tables are then installed as the class scope of the types they serve.

use cx_ir::{
    members_in, BuiltinMember, MemberDef, MemberScope, ParamSpec, ReturnSpec, SessionContext,
    SymbolAddr, SymbolRef, TableIndex, TypeId,
};
use cx_symtab::{Definition, RoutineCode, RoutineDefn, SymtabError, Symtabs};
use cx_types::{TypeForm, TypePool};

use crate::executor::handler_arity;

/// Failures while installing the built-in members.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("built-in members are already installed")]
    AlreadyInstalled,

    #[error("member `{member}` declares {declared} parameter(s) but its handler pops {handler}")]
    ArityMismatch {
        member: BuiltinMember,
        declared: usize,
        handler: usize,
    },

    #[error(transparent)]
    Symtab(#[from] SymtabError),
}

/// The installed member tables.
#[derive(Clone, Debug)]
pub struct BuiltinRegistry {
    scalar_table: TableIndex,
    stream_table: TableIndex,
    /// Indexed by `BuiltinMember as usize`.
    members: Vec<SymbolRef>,
}

impl BuiltinRegistry {
    /// Create and install both member tables.
    ///
    /// Every member's arity is checked against what its native handler
    /// pops; a disagreement refuses the whole registry. All tables created
    /// here are flattened before returning.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn install(
        symtabs: &mut Symtabs,
        types: &mut TypePool,
        ctx: &SessionContext,
    ) -> Result<Self, RegistryError> {
        if types.class_scope(TypeId::INTEGER).is_some()
            || types.class_scope(TypeId::STREAM).is_some()
        {
            return Err(RegistryError::AlreadyInstalled);
        }

        let scalar_table = symtabs.create_table()?;
        let stream_table = symtabs.create_table()?;
        let mut created = vec![scalar_table, stream_table];
        let mut members = Vec::with_capacity(BuiltinMember::ALL.len());

        for (scope, table) in [
            (MemberScope::Scalar, scalar_table),
            (MemberScope::Stream, stream_table),
        ] {
            for def in members_in(scope) {
                let member = def.member;
                debug_assert_eq!(members.len(), member as usize);
                let handler = handler_arity(member);
                if member.arity() != handler {
                    return Err(RegistryError::ArityMismatch {
                        member,
                        declared: member.arity(),
                        handler,
                    });
                }

                let routine = synthesize_routine(def, symtabs, types, ctx, &mut created)?;
                let id = symtabs.table_mut(table).enter(def.name, ctx)?;
                let node = symtabs.table_mut(table).node_mut(id);
                node.ty = Some(return_type(def.returns, types));
                node.defn = Definition::Function(routine);
                members.push(SymbolRef::new(table, id));
            }
        }

        for ty in TypePool::SCALARS {
            types.set_class_scope(ty, scalar_table);
        }
        types.set_class_scope(TypeId::STREAM, stream_table);

        for table in created {
            symtabs.flatten(table)?;
        }
        tracing::debug!(
            members = members.len(),
            scalar = %scalar_table,
            stream = %stream_table,
            "built-in members installed"
        );
        Ok(BuiltinRegistry {
            scalar_table,
            stream_table,
            members,
        })
    }

    #[inline]
    pub fn scalar_table(&self) -> TableIndex {
        self.scalar_table
    }

    #[inline]
    pub fn stream_table(&self) -> TableIndex {
        self.stream_table
    }

    /// Node of a member.
    #[inline]
    pub fn member(&self, member: BuiltinMember) -> SymbolRef {
        self.members[member as usize]
    }

    /// Flattened address of a member, for compiled code.
    pub fn member_addr(
        &self,
        symtabs: &Symtabs,
        member: BuiltinMember,
    ) -> Result<SymbolAddr, SymtabError> {
        symtabs.address_of(self.member(member))
    }

    /// Resolve `receiver.name` the way analysis does: through the class
    /// scope of the receiver's type, or of its base type. Arrays carry no
    /// class scope of their own and use the scalar members.
    pub fn lookup(
        &self,
        symtabs: &Symtabs,
        types: &TypePool,
        receiver: TypeId,
        name: &str,
    ) -> Option<SymbolRef> {
        let scope = types
            .class_scope(receiver)
            .or_else(|| types.class_scope(types.base_type(receiver)))
            .or_else(|| (types.form(receiver) == TypeForm::Array).then_some(self.scalar_table))?;
        let table = symtabs.get(scope).ok()?;
        table.search(name).map(|id| table.symbol_ref(id))
    }
}

/// Enter a member's parameters into a fresh scope and build its routine
/// definition.
fn synthesize_routine(
    def: &MemberDef,
    symtabs: &mut Symtabs,
    types: &mut TypePool,
    ctx: &SessionContext,
    created: &mut Vec<TableIndex>,
) -> Result<RoutineDefn, RegistryError> {
    let mut routine = RoutineDefn::new(RoutineCode::Native(def.member));
    if def.params.is_empty() {
        return Ok(routine);
    }

    let scope = symtabs.create_table()?;
    created.push(scope);
    for param in def.params {
        let ty = param_type(param.spec, types);
        let id = symtabs.table_mut(scope).enter(param.name, ctx)?;
        let node = symtabs.table_mut(scope).node_mut(id);
        node.defn = Definition::ValueParm;
        node.ty = Some(ty);
        routine.params.push(SymbolRef::new(scope, id));
        routine.total_parm_size += types.size(ty);
    }
    routine.parm_count = routine.params.len();
    routine.scope = Some(scope);
    Ok(routine)
}

fn param_type(spec: ParamSpec, types: &mut TypePool) -> TypeId {
    match spec {
        ParamSpec::Int => TypeId::INTEGER,
        ParamSpec::CharArray => types.array(TypeId::CHAR, 0),
        ParamSpec::ByteArray => types.array(TypeId::BYTE, 0),
    }
}

fn return_type(spec: ReturnSpec, types: &mut TypePool) -> TypeId {
    match spec {
        ReturnSpec::Int => TypeId::INTEGER,
        ReturnSpec::Float => TypeId::FLOAT,
        ReturnSpec::Bool => TypeId::BOOLEAN,
        ReturnSpec::Char => TypeId::CHAR,
        ReturnSpec::WChar => TypeId::WCHAR,
        ReturnSpec::Byte => TypeId::BYTE,
        ReturnSpec::CharArray => types.array(TypeId::CHAR, 0),
        ReturnSpec::WCharArray => types.array(TypeId::WCHAR, 0),
    }
}

#[cfg(test)]
mod tests;
