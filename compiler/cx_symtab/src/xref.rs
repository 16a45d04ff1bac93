//! Cross-reference lists.
//!
//! Each symbol node keeps the source lines on which its identifier was
//! seen. The list only grows; consecutive references on the same line are
//! all kept.

use std::fmt::Write;

use cx_ir::SessionContext;

/// Column width of one printed line number.
pub const LINE_NUMBER_WIDTH: usize = 4;

/// Append-only list of source line numbers.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CrossReferenceList {
    lines: Vec<u32>,
}

impl CrossReferenceList {
    pub fn new() -> Self {
        CrossReferenceList { lines: Vec::new() }
    }

    /// Record a reference on the context's current line.
    pub fn update(&mut self, ctx: &SessionContext) {
        self.lines.push(ctx.current_line());
    }

    #[inline]
    pub fn lines(&self) -> &[u32] {
        &self.lines
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Render the line numbers, each right-aligned in
    /// [`LINE_NUMBER_WIDTH`] columns.
    ///
    /// Rendering assumes the caller's text ends at column `indent`. With
    /// `wrap` set it first breaks to a fresh line indented by `indent`.
    /// Whenever the next number would run past the context's print width,
    /// it breaks and indents again. The result has no trailing newline.
    pub fn print(&self, wrap: bool, indent: usize, ctx: &SessionContext) -> String {
        let width = ctx.print_width();
        let mut out = String::new();
        let mut column = indent;

        if wrap {
            out.push('\n');
            push_indent(&mut out, indent);
        }

        for &line in &self.lines {
            if column + LINE_NUMBER_WIDTH > width && column > indent {
                out.push('\n');
                push_indent(&mut out, indent);
                column = indent;
            }
            // Writing into a String cannot fail.
            let _ = write!(out, "{line:>width$}", width = LINE_NUMBER_WIDTH);
            column += LINE_NUMBER_WIDTH;
        }
        out
    }
}

fn push_indent(out: &mut String, indent: usize) {
    out.extend(std::iter::repeat(' ').take(indent));
}
