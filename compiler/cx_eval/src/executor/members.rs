//! Native member handlers.
//!
//! Each handler pops its receiver and declared arguments in one go, pushes
//! one result, and returns the result type. The stub conversions are the
//! exception: they touch nothing and report only their declared type.

use std::path::Path;

use cx_ir::{BuiltinMember, TypeId};
use cx_types::TypeCode;
use smallvec::SmallVec;

use super::Executor;
use crate::errors::type_mismatch;
use crate::format::{format_g, FLOAT_DIGITS};
use crate::{CharBuffer, EvalError, EvalResult, StackItem, StreamId};

/// Arguments a member's handler pops, not counting the receiver.
///
/// Declared apart from the metadata table. The registry refuses to
/// install a member whose declared parameters disagree with this.
pub(crate) const fn handler_arity(member: BuiltinMember) -> usize {
    match member {
        BuiltinMember::Size
        | BuiltinMember::Length
        | BuiltinMember::ToStr
        | BuiltinMember::ToWstr
        | BuiltinMember::ToInt
        | BuiltinMember::ToChr
        | BuiltinMember::ToFlt
        | BuiltinMember::ToBool
        | BuiltinMember::ToWchr
        | BuiltinMember::ToByte
        | BuiltinMember::Close
        | BuiltinMember::Flush => 0,
        BuiltinMember::Puts | BuiltinMember::Wide => 1,
        BuiltinMember::Open | BuiltinMember::Reopen | BuiltinMember::Read => 2,
        BuiltinMember::Write => 3,
    }
}

impl Executor<'_> {
    /// Dispatch a native member. `receiver` is the receiver's static type,
    /// `declared` the member's declared result type.
    pub(super) fn call_native(
        &mut self,
        member: BuiltinMember,
        receiver: TypeId,
        declared: TypeId,
    ) -> EvalResult<TypeId> {
        tracing::trace!(%member, receiver = ?receiver, "native member dispatch");
        let name = member.name();

        match member {
            BuiltinMember::Size => {
                let [_value] = self.pop_operands::<1>(name)?;
                let size = self.types.size(receiver);
                self.push(StackItem::Int(i32::try_from(size).unwrap_or(i32::MAX)));
                Ok(declared)
            }
            BuiltinMember::Length => {
                let [_value] = self.pop_operands::<1>(name)?;
                let count = self
                    .types
                    .get(receiver)
                    .array()
                    .map_or(1, |info| info.element_count);
                self.push(StackItem::Int(i32::try_from(count).unwrap_or(i32::MAX)));
                Ok(declared)
            }
            BuiltinMember::ToStr => {
                let [value] = self.pop_operands::<1>(name)?;
                let text = scalar_text(&value, self.types.code(receiver));
                let ty = self.types.array(TypeId::CHAR, text.len());
                self.push(StackItem::Buffer(CharBuffer::from(text)));
                Ok(ty)
            }
            // Declared but unimplemented: the operand stays where it is.
            BuiltinMember::ToWstr
            | BuiltinMember::ToInt
            | BuiltinMember::ToChr
            | BuiltinMember::ToFlt
            | BuiltinMember::ToBool
            | BuiltinMember::ToWchr
            | BuiltinMember::ToByte => Ok(declared),

            BuiltinMember::Puts => {
                let [stream, text] = self.pop_operands::<2>(name)?;
                let stream = self.stream_operand(stream)?;
                let mut line = buffer_operand(text)?.c_str().into_bytes();
                line.push(b'\n');
                let written = self.streams.write(stream, &line, self.tracer.output());
                self.push(StackItem::Bool(written == line.len()));
                Ok(declared)
            }
            BuiltinMember::Open | BuiltinMember::Reopen => {
                let [stream, filename, mode] = self.pop_operands::<3>(name)?;
                let stream = self.stream_operand(stream)?;
                let filename = buffer_operand(filename)?.c_str();
                let mode = buffer_operand(mode)?.c_str();
                let path = Path::new(&filename);
                let ok = if member == BuiltinMember::Open {
                    self.streams.open(stream, path, &mode)
                } else {
                    self.streams.reopen(stream, path, &mode)
                };
                self.push(StackItem::Bool(ok));
                Ok(declared)
            }
            BuiltinMember::Close => {
                let [stream] = self.pop_operands::<1>(name)?;
                let stream = self.stream_operand(stream)?;
                let ok = self.streams.close(stream);
                self.push(StackItem::Bool(ok));
                Ok(declared)
            }
            BuiltinMember::Flush => {
                let [stream] = self.pop_operands::<1>(name)?;
                let stream = self.stream_operand(stream)?;
                let ok = self.streams.flush(stream, self.tracer.output());
                self.push(StackItem::Bool(ok));
                Ok(declared)
            }
            BuiltinMember::Wide => {
                let [stream, mode] = self.pop_operands::<2>(name)?;
                let stream = self.stream_operand(stream)?;
                let orientation = self.streams.wide(stream, int_operand(&mode)?);
                self.push(StackItem::Int(orientation));
                Ok(declared)
            }
            BuiltinMember::Read => {
                let [stream, size, count] = self.pop_operands::<3>(name)?;
                let stream = self.stream_operand(stream)?;
                let limit = byte_count(int_operand(&size)?, int_operand(&count)?);
                let bytes = self.streams.read(stream, limit);
                let ty = self.types.array(TypeId::CHAR, bytes.len());
                self.push(StackItem::Buffer(CharBuffer::new(bytes)));
                Ok(ty)
            }
            BuiltinMember::Write => {
                let [stream, buffer, size, count] = self.pop_operands::<4>(name)?;
                let stream = self.stream_operand(stream)?;
                let buffer = buffer_operand(buffer)?;
                let (size, count) = (int_operand(&size)?, int_operand(&count)?);
                let len = byte_count(size, count).min(buffer.len());
                let written =
                    self.streams
                        .write(stream, &buffer.as_bytes()[..len], self.tracer.output());
                let items = match usize::try_from(size) {
                    Ok(size) if size > 0 => written / size,
                    _ => 0,
                };
                self.push(StackItem::Int(i32::try_from(items).unwrap_or(i32::MAX)));
                Ok(declared)
            }
        }
    }

    /// Pop a member's receiver and arguments, returned in push order.
    ///
    /// Running out of items before `N` is an arity error naming how many
    /// were there.
    fn pop_operands<const N: usize>(&mut self, member: &str) -> EvalResult<[StackItem; N]> {
        let mut operands: SmallVec<[StackItem; N]> = SmallVec::new();
        while operands.len() < N {
            let Ok(item) = self.pop() else {
                return Err(EvalError::ArityMismatch {
                    routine: member.to_string(),
                    expected: N,
                    found: operands.len(),
                });
            };
            operands.push(item);
        }
        operands.reverse();
        operands.into_inner().map_err(|_| EvalError::StackUnderflow)
    }

    fn stream_operand(&self, item: StackItem) -> EvalResult<StreamId> {
        match item {
            StackItem::Stream(id) if self.streams.contains(id) => Ok(id),
            StackItem::Stream(id) => Err(EvalError::Stream(format!("{id} is not a stream slot"))),
            other => Err(type_mismatch("file", other.kind_name())),
        }
    }
}

fn buffer_operand(item: StackItem) -> EvalResult<CharBuffer> {
    match item {
        StackItem::Buffer(buf) => Ok(buf),
        other => Err(type_mismatch("array", other.kind_name())),
    }
}

fn int_operand(item: &StackItem) -> EvalResult<i32> {
    item.as_int()
        .ok_or_else(|| type_mismatch("int", item.kind_name()))
}

/// `size * count` bytes, treating negatives as zero.
fn byte_count(size: i32, count: i32) -> usize {
    let size = usize::try_from(size).unwrap_or(0);
    let count = usize::try_from(count).unwrap_or(0);
    size.saturating_mul(count)
}

/// Text of a value according to its type code. Values held by address
/// render as that address.
fn scalar_text(item: &StackItem, code: TypeCode) -> String {
    match (code, item) {
        (TypeCode::Char, StackItem::Char(c)) => char::from(*c).to_string(),
        (TypeCode::WChar, StackItem::WChar(c)) => c.to_string(),
        (TypeCode::Float, StackItem::Float(v)) => format_g(f64::from(*v), FLOAT_DIGITS),
        (TypeCode::Bool, _) => {
            let truth = item.as_int().is_some_and(|v| v != 0);
            if truth { "true" } else { "false" }.to_string()
        }
        (_, StackItem::Buffer(buf)) => format!("{:p}", buf.as_bytes().as_ptr()),
        (_, StackItem::Stream(id)) => id.to_string(),
        (_, StackItem::Addr(addr)) => addr.to_string(),
        (_, StackItem::Float(v)) => format_g(f64::from(*v), FLOAT_DIGITS),
        (_, other) => other.as_int().unwrap_or_default().to_string(),
    }
}
