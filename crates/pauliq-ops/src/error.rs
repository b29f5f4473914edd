//! Error types for the ops crate.

use thiserror::Error;

/// Errors produced by operator algebra, Pauli decomposition and
/// measurement-circuit construction.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum OpsError {
    /// Operator cannot be decomposed: not Hermitian, or not an operator on
    /// two-dimensional factors.
    #[error("Invalid operator: {0}")]
    InvalidOperator(String),

    /// Pauli term label is malformed or its length is not supported by the
    /// requested strategy.
    #[error("Unsupported Pauli term '{term}': {reason}")]
    UnsupportedTerm {
        /// The offending label.
        term: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Operands disagree on their shape or qubit count.
    #[error("Dimension mismatch: expected {expected}, got {got}")]
    Dimension {
        /// Expected size.
        expected: usize,
        /// Size that was supplied.
        got: usize,
    },

    /// Numerical routine produced an inconsistent result.
    #[error("Numerical error: {0}")]
    Numerical(String),

    /// Circuit construction failed.
    #[error("Circuit IR error: {0}")]
    Ir(#[from] pauliq_ir::IrError),
}

impl OpsError {
    pub(crate) fn unsupported(term: impl Into<String>, reason: impl Into<String>) -> Self {
        OpsError::UnsupportedTerm {
            term: term.into(),
            reason: reason.into(),
        }
    }
}

/// Result type for ops operations.
pub type OpsResult<T> = Result<T, OpsError>;
