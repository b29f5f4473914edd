//! `pauliq-vqe` - energy estimation for variational quantum algorithms.
//!
//! Given a Pauli decomposition `H = Σ a_P · P`, the measurement circuit of
//! every term, an ansatz circuit and an initial state, estimate
//! `⟨ψ|H|ψ⟩` for `|ψ⟩ = ansatz · |initial⟩` either by sampling or exactly.
//!
//! # Quick start
//!
//! ```rust
//! use pauliq_adapter_sim::{Statevector, StatevectorSimulator};
//! use pauliq_ir::{Circuit, QubitId};
//! use pauliq_ops::{Decomposition, MeasurementCircuitBuilder};
//! use pauliq_vqe::estimate_energy;
//!
//! // H = X on |+⟩ has energy 1
//! let h = Decomposition::from_labels(1, [("X", 1.0)])?;
//! let circuits = MeasurementCircuitBuilder::new().for_decomposition(&h)?;
//! let mut ansatz = Circuit::with_size("plus", 1, 0);
//! ansatz.h(QubitId(0))?;
//!
//! let sim = StatevectorSimulator::new();
//! let exact = estimate_energy(&sim, &h, &circuits, &Statevector::zero(1), &ansatz, 0, true)?;
//! assert!((exact - 1.0).abs() < 1e-12);
//!
//! // |+⟩ is an X eigenstate, so every shot agrees
//! let sampled = estimate_energy(&sim, &h, &circuits, &Statevector::zero(1), &ansatz, 500, false)?;
//! assert!((sampled - 1.0).abs() < 1e-12);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod cancel;
pub mod config;
pub mod error;
pub mod estimator;

pub use cancel::CancellationToken;
pub use config::{DEFAULT_SHOT_BATCH_SIZE, DEFAULT_SHOTS, EstimatorConfig};
pub use error::{VqeError, VqeResult};
pub use estimator::{EnergyEstimate, EnergyEstimator, EstimationMode, TermEstimate, estimate_energy};
