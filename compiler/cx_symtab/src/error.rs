//! Symbol table errors.

use cx_ir::{SymbolAddr, SymbolRef, TableIndex};

/// Result alias for symbol table operations.
pub type SymtabResult<T> = Result<T, SymtabError>;

/// Failures of the symbol table layer.
///
/// Only `TableOverflow` and `TooManyTables` can come out of `enter` or
/// table creation; both are fatal to the translation and map to an
/// [`AbortCode`]. The remaining variants report misuse of the flattened
/// addressing scheme.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SymtabError {
    #[error("symbol table {table} is full: at most {max} identifiers per scope")]
    TableOverflow { table: TableIndex, max: usize },

    #[error("too many symbol tables: at most {max} scopes per program")]
    TooManyTables { max: usize },

    #[error("no symbol table with index {0}")]
    UnknownTable(TableIndex),

    #[error("symbol table {0} has not been flattened")]
    NotFlattened(TableIndex),

    #[error("no symbol at address {0}")]
    BadAddress(SymbolAddr),

    #[error("no symbol node {0:?}")]
    UnknownNode(SymbolRef),
}

/// Reason handed to the translation-abort collaborator.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum AbortCode {
    /// A scope ran out of node indices.
    SymbolTableOverflow,
    /// The program ran out of table indices.
    TooManyScopes,
    /// The compiler's own bookkeeping is inconsistent.
    InternalError,
}

impl AbortCode {
    /// Process exit status for the abort.
    pub const fn exit_status(self) -> i32 {
        match self {
            AbortCode::SymbolTableOverflow => -11,
            AbortCode::TooManyScopes => -12,
            AbortCode::InternalError => -13,
        }
    }

    pub const fn message(self) -> &'static str {
        match self {
            AbortCode::SymbolTableOverflow => "Symbol table overflow",
            AbortCode::TooManyScopes => "Too many nested scopes",
            AbortCode::InternalError => "Internal compiler error",
        }
    }
}

impl SymtabError {
    /// Abort code for reporting this error as a fatal translation failure.
    pub fn abort_code(&self) -> AbortCode {
        match self {
            SymtabError::TableOverflow { .. } => AbortCode::SymbolTableOverflow,
            SymtabError::TooManyTables { .. } => AbortCode::TooManyScopes,
            SymtabError::UnknownTable(_)
            | SymtabError::NotFlattened(_)
            | SymtabError::BadAddress(_)
            | SymtabError::UnknownNode(_) => AbortCode::InternalError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cx_ir::NodeIndex;

    #[test]
    fn test_overflow_aborts() {
        let err = SymtabError::TableOverflow {
            table: TableIndex::new(2),
            max: 65_536,
        };
        assert_eq!(err.abort_code(), AbortCode::SymbolTableOverflow);
        assert!(err.to_string().contains("symbol table 2 is full"));
    }

    #[test]
    fn test_address_errors_are_internal() {
        let addr = SymbolAddr::new(TableIndex::new(0), NodeIndex::new(7));
        let err = SymtabError::BadAddress(addr);
        assert_eq!(err.abort_code(), AbortCode::InternalError);
        assert_eq!(err.to_string(), "no symbol at address (0, 7)");
    }

    #[test]
    fn test_exit_status_distinct() {
        let codes = [
            AbortCode::SymbolTableOverflow,
            AbortCode::TooManyScopes,
            AbortCode::InternalError,
        ];
        for (i, a) in codes.iter().enumerate() {
            for b in &codes[i + 1..] {
                assert_ne!(a.exit_status(), b.exit_status());
            }
        }
    }
}
