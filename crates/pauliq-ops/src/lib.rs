//! `pauliq-ops` - Pauli-basis operator algebra and measurement circuits.
//!
//! Provides the pieces an energy estimator needs before anything runs on a
//! simulator:
//!
//! - **Operators**: dense Hermitian matrices on qubits ([`Operator`])
//! - **Pauli basis**: the 4^n Pauli terms on n qubits ([`PauliBasis`])
//! - **Decomposition**: `H = Σ a_P · P` and back ([`decompose`], [`compose`])
//! - **Measurement circuits**: per-term basis rotations that put the term's
//!   parity on qubit 0 ([`MeasurementCircuitBuilder`])
//!
//! # Quick start
//!
//! ```rust
//! use pauliq_ops::{compose, decompose_default, Decomposition, MeasurementCircuitBuilder};
//!
//! // H = 0.5·XX - 1.0·ZI
//! let d = Decomposition::from_labels(2, [("XX", 0.5), ("ZI", -1.0)])?;
//! let h = compose(&d)?;
//! assert!(h.is_hermitian());
//!
//! let back = decompose_default(&h)?;
//! assert_eq!(back.len(), 2);
//!
//! let circuits = MeasurementCircuitBuilder::new().for_decomposition(&back)?;
//! assert_eq!(circuits.len(), 2);
//! # Ok::<(), pauliq_ops::OpsError>(())
//! ```

pub mod decompose;
pub mod error;
pub mod measurement;
pub mod operator;
pub mod pauli;

pub use decompose::{DEFAULT_TOLERANCE, Decomposition, compose, decompose, decompose_default};
pub use error::{OpsError, OpsResult};
pub use measurement::{
    MAX_EIGEN_QUBITS, MeasurementCircuit, MeasurementCircuitBuilder, MeasurementCircuits,
    MeasurementStrategy,
};
pub use operator::{EIGEN_RESIDUAL_TOLERANCE, HERMITIAN_TOLERANCE, Operator};
pub use pauli::{PauliBasis, PauliOp, PauliTerm, PauliTerms};
