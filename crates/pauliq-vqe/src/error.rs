//! Error types for the estimator crate.

use thiserror::Error;

/// Errors that can occur while estimating an energy.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum VqeError {
    /// Argument outside its valid range (zero shots, empty batch size).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A non-identity term has no measurement circuit.
    #[error("No measurement circuit for term '{term}'")]
    MissingMeasurementCircuit {
        /// Label of the term.
        term: String,
    },

    /// Qubit counts of the inputs disagree.
    #[error("Dimension mismatch in {context}: expected {expected} qubits, got {got}")]
    Dimension {
        /// Which input disagreed.
        context: String,
        /// Qubit count of the decomposition.
        expected: usize,
        /// Qubit count that was supplied.
        got: usize,
    },

    /// Estimation was cancelled through its token.
    #[error("Estimation cancelled")]
    Cancelled,

    /// Dedicated worker pool could not be built.
    #[error("Thread pool error: {0}")]
    ThreadPool(String),

    /// Operator or measurement-circuit error.
    #[error("Operator error: {0}")]
    Ops(#[from] pauliq_ops::OpsError),

    /// Simulator error.
    #[error("Simulator error: {0}")]
    Hal(#[from] pauliq_hal::HalError),

    /// Circuit IR error.
    #[error("Circuit IR error: {0}")]
    Ir(#[from] pauliq_ir::IrError),

    /// Configuration could not be parsed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl VqeError {
    pub(crate) fn dimension(context: impl Into<String>, expected: usize, got: usize) -> Self {
        VqeError::Dimension {
            context: context.into(),
            expected,
            got,
        }
    }
}

/// Result type for estimator operations.
pub type VqeResult<T> = Result<T, VqeError>;
