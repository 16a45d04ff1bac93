//! Compiled code.
//!
//! A `Chunk` is a flat op sequence for one routine body. Identifier
//! operands are `SymbolAddr`s, never live references, so a chunk can be
//! stored or inspected apart from the analysis structures that produced it.

use crate::{SymbolAddr, TypeId};

/// One executor instruction.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum Op {
    PushInt(i32),
    PushFloat(f32),
    PushChar(u8),
    PushWChar(char),
    PushBool(bool),
    PushByte(u8),
    /// Push a character-array literal.
    PushStr(String),
    /// Push the value of a variable or parameter.
    Fetch(SymbolAddr),
    /// Push a variable's address, for passing it to a var parameter.
    FetchAddr(SymbolAddr),
    /// Pop the top of the stack into a variable or parameter.
    Store(SymbolAddr),
    /// Call a routine whose arguments are already on the stack.
    Call(SymbolAddr),
    /// Call a member of the receiver's type. The receiver is pushed before
    /// the arguments; `receiver` is its static type.
    CallMember { member: SymbolAddr, receiver: TypeId },
    /// Statement boundary at a source line.
    Statement(u32),
    /// Integer arithmetic on the top two items.
    Add,
    Sub,
    Mul,
    /// Discard the top of the stack.
    Pop,
    /// Leave the current routine.
    Return,
}

/// A routine body.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct Chunk {
    ops: Vec<Op>,
}

impl Chunk {
    pub fn new() -> Self {
        Chunk { ops: Vec::new() }
    }

    /// Append an op, returning `self` for chaining.
    pub fn emit(&mut self, op: Op) -> &mut Self {
        self.ops.push(op);
        self
    }

    #[inline]
    pub fn ops(&self) -> &[Op] {
        &self.ops
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

impl FromIterator<Op> for Chunk {
    fn from_iter<I: IntoIterator<Item = Op>>(iter: I) -> Self {
        Chunk {
            ops: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{NodeIndex, TableIndex};

    #[test]
    fn test_emit_chains() {
        let x = SymbolAddr::new(TableIndex::new(0), NodeIndex::new(1));
        let mut chunk = Chunk::new();
        chunk
            .emit(Op::Statement(1))
            .emit(Op::PushInt(2))
            .emit(Op::Store(x));
        assert_eq!(chunk.len(), 3);
        assert_eq!(chunk.ops()[2], Op::Store(x));
    }

    #[test]
    fn test_collect_into_chunk() {
        let chunk: Chunk = [Op::PushBool(true), Op::Pop].into_iter().collect();
        assert_eq!(chunk.ops(), &[Op::PushBool(true), Op::Pop]);
        assert!(!chunk.is_empty());
    }
}
