//! Execution tracer.
//!
//! Announces routine entry/exit, statements, and data fetches/stores on
//! the executor's output sink when the matching `TraceFlags` are set. The
//! tracer only observes: it never changes a value or the control flow.
//!
//! Line formats:
//! - `>> Entering routine NAME` / `>> Exiting routine NAME`
//! - `>>  At LINE`
//! - `>>   NAME <== VALUE` (store) and `>>   NAME: VALUE` (fetch), with
//!   `[*]` after array names and `.*` after record names

use cx_ir::{SessionContext, TraceFlags, TypeId};
use cx_symtab::{SymbolNode, Symtabs};
use cx_types::{TypeForm, TypePool};

use crate::format::{format_g, FLOAT_DIGITS};
use crate::output::SharedOutput;
use crate::StackItem;

/// Trace announcer bound to an output sink.
pub struct Tracer {
    out: SharedOutput,
}

impl Tracer {
    pub fn new(out: SharedOutput) -> Self {
        Tracer { out }
    }

    #[inline]
    pub fn output(&self) -> &SharedOutput {
        &self.out
    }

    pub fn routine_entry(&self, ctx: &SessionContext, name: &str) {
        if ctx.traces(TraceFlags::ROUTINE) {
            self.out.println(&format!(">> Entering routine {name}"));
        }
    }

    pub fn routine_exit(&self, ctx: &SessionContext, name: &str) {
        if ctx.traces(TraceFlags::ROUTINE) {
            self.out.println(&format!(">> Exiting routine {name}"));
        }
    }

    pub fn statement(&self, ctx: &SessionContext) {
        if ctx.traces(TraceFlags::STATEMENT) {
            self.out.println(&format!(">>  At {}", ctx.current_line()));
        }
    }

    /// Announce a store of `item` into `target`.
    pub fn data_store(
        &self,
        ctx: &SessionContext,
        target: &SymbolNode,
        item: &StackItem,
        types: &TypePool,
        symtabs: &Symtabs,
    ) {
        if ctx.traces(TraceFlags::STORE) {
            self.data_line(target, " <== ", item, types, symtabs);
        }
    }

    /// Announce a fetch of `item` from `source`.
    pub fn data_fetch(
        &self,
        ctx: &SessionContext,
        source: &SymbolNode,
        item: &StackItem,
        types: &TypePool,
        symtabs: &Symtabs,
    ) {
        if ctx.traces(TraceFlags::FETCH) {
            self.data_line(source, ": ", item, types, symtabs);
        }
    }

    fn data_line(
        &self,
        node: &SymbolNode,
        separator: &str,
        item: &StackItem,
        types: &TypePool,
        symtabs: &Symtabs,
    ) {
        let ty = node.ty.unwrap_or(TypeId::VOID);
        let suffix = match types.form(ty) {
            TypeForm::Array => "[*]",
            TypeForm::Complex => ".*",
            _ => "",
        };
        self.out
            .print(&format!(">>   {}{suffix}{separator}", node.name()));
        // Stream values print nothing, not even the line break.
        if let Some(text) = render_value(item, ty, types, symtabs) {
            self.out.println(&text);
        }
    }
}

/// Render a value the way traces show it, or `None` for stream values.
///
/// The checks run in a fixed order: stream, float, char, bool, array,
/// record, enumeration (through the base type), then plain integer.
/// `float`, `char` and `bool` match the predefined types exactly, so a
/// subrange of `char` prints as an integer.
pub fn render_value(
    item: &StackItem,
    ty: TypeId,
    types: &TypePool,
    symtabs: &Symtabs,
) -> Option<String> {
    let form = types.form(ty);
    if form == TypeForm::Stream {
        return None;
    }

    let text = if ty == TypeId::FLOAT {
        match item {
            StackItem::Float(v) => format_g(f64::from(*v), FLOAT_DIGITS),
            other => integer_text(other),
        }
    } else if ty == TypeId::CHAR {
        match item {
            StackItem::Char(c) => format!("'{}'", char::from(*c)),
            other => integer_text(other),
        }
    } else if ty == TypeId::BOOLEAN {
        let truth = item.as_int().is_some_and(|v| v != 0);
        if truth { "true" } else { "false" }.to_string()
    } else if form == TypeForm::Array {
        match (types.get(ty).array(), item) {
            (Some(info), StackItem::Buffer(buf)) if info.element == TypeId::CHAR => {
                let shown: String = buf
                    .as_bytes()
                    .iter()
                    .take(info.element_count)
                    .take_while(|&&b| b != 0)
                    .map(|&b| char::from(b))
                    .collect();
                format!("'{shown}'")
            }
            _ => "<array>".to_string(),
        }
    } else if form == TypeForm::Complex {
        "<complex>".to_string()
    } else if let Some(constants) = types.get(types.base_type(ty)).enum_constants() {
        let name = item
            .as_int()
            .and_then(|ordinal| usize::try_from(ordinal).ok())
            .and_then(|ordinal| constants.get(ordinal))
            .and_then(|&sym| symtabs.node(sym).ok())
            .map(|node| node.name().to_string());
        name.unwrap_or_else(|| integer_text(item))
    } else {
        integer_text(item)
    };
    Some(text)
}

fn integer_text(item: &StackItem) -> String {
    match item.as_int() {
        Some(v) => v.to_string(),
        None => format!("<{}>", item.kind_name()),
    }
}
