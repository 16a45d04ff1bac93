//! Evaluation errors.

use cx_symtab::SymtabError;

/// Result alias for executor operations.
pub type EvalResult<T> = Result<T, EvalError>;

/// Failures raised while executing compiled code.
///
/// Well-formed programs from the analyzer never hit most of these; they
/// guard the stack discipline and the addressing scheme against malformed
/// chunks.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum EvalError {
    #[error("evaluation stack underflow")]
    StackUnderflow,

    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("`{name}` is not a callable routine")]
    NotARoutine { name: String },

    #[error("variable `{name}` has no value")]
    UnboundVariable { name: String },

    #[error("`{routine}` takes {expected} stack operand(s), only {found} present")]
    ArityMismatch {
        routine: String,
        expected: usize,
        found: usize,
    },

    #[error("maximum call depth of {limit} exceeded")]
    CallDepthExceeded { limit: usize },

    #[error("stream error: {0}")]
    Stream(String),

    #[error(transparent)]
    Symtab(#[from] SymtabError),
}

pub(crate) fn type_mismatch(expected: &'static str, found: &'static str) -> EvalError {
    EvalError::TypeMismatch { expected, found }
}
