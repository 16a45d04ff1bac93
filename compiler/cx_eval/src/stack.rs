//! The evaluation stack and stack-depth safety.

use crate::{EvalError, EvalResult, StackItem};

/// LIFO value store for expression evaluation and argument passing.
///
/// `push`, `pop`, and `top` are the only ways in; nothing indexes into the
/// middle of the stack.
#[derive(Clone, Debug, Default)]
pub struct EvalStack {
    items: Vec<StackItem>,
}

impl EvalStack {
    pub fn new() -> Self {
        EvalStack { items: Vec::new() }
    }

    #[inline]
    pub fn push(&mut self, item: StackItem) {
        self.items.push(item);
    }

    #[inline]
    pub fn pop(&mut self) -> EvalResult<StackItem> {
        self.items.pop().ok_or(EvalError::StackUnderflow)
    }

    /// Peek without removing.
    #[inline]
    pub fn top(&self) -> EvalResult<&StackItem> {
        self.items.last().ok_or(EvalError::StackUnderflow)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Run `f` with room for one more routine activation.
///
/// Every interpreted call runs its body through here. A Cx call chain is
/// bounded by `SessionContext::max_call_depth` rather than by the native
/// stack: when less than `MIN_HEADROOM` remains, a fresh segment is
/// switched in for the nested body.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    const MIN_HEADROOM: usize = 100 * 1024;
    const SEGMENT: usize = 1024 * 1024;

    stacker::maybe_grow(MIN_HEADROOM, SEGMENT, f)
}

/// `stacker` cannot switch stacks on wasm; nested bodies run in place.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
