//! Error types for the HAL crate.

use thiserror::Error;

/// Errors that can occur when running a circuit on a simulator.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum HalError {
    /// Circuit cannot be executed by this simulator.
    #[error("Invalid circuit: {0}")]
    InvalidCircuit(String),

    /// Circuit and state disagree on the number of qubits.
    #[error("Qubit count mismatch: circuit has {circuit}, state has {state}")]
    QubitMismatch {
        /// Qubits in the circuit.
        circuit: u32,
        /// Qubits in the state.
        state: u32,
    },

    /// State is malformed (wrong length, not normalised).
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Circuit exceeds the simulator's size limit.
    #[error("Circuit exceeds simulator capabilities: {0}")]
    CircuitTooLarge(String),

    /// Unsupported feature.
    #[error("Unsupported feature: {0}")]
    Unsupported(String),

    /// Circuit IR error.
    #[error("Circuit IR error: {0}")]
    Ir(#[from] pauliq_ir::IrError),
}

/// Result type for HAL operations.
pub type HalResult<T> = Result<T, HalError>;
