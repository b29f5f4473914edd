//! pauliq Local Statevector Simulator
//!
//! Exact statevector simulation implementing [`pauliq_hal::Simulator`].
//! Runs start from any [`Statevector`], not only |0...0⟩, so a prepared
//! state can be handed straight to an estimator.
//!
//! # Features
//!
//! - **Exact Simulation**: Full statevector representation
//! - **All Gates**: Every standard gate from `pauliq-ir` plus explicit
//!   k-qubit unitaries
//! - **Mid-circuit Measurement**: `run()` collapses on each measurement;
//!   `run_statistics()` branches and merges equal outcomes
//!
//! # Performance
//!
//! | Qubits | Memory | Simulation Speed |
//! |--------|--------|------------------|
//! | 10 | ~16 KB | Instant |
//! | 15 | ~512 KB | Fast |
//! | 20 | ~16 MB | Moderate |
//! | 25 | ~512 MB | Slow |
//!
//! # Example
//!
//! ```rust
//! use pauliq_adapter_sim::{Statevector, StatevectorSimulator};
//! use pauliq_hal::Simulator;
//! use pauliq_ir::{Circuit, ClbitId, QubitId};
//!
//! let mut circuit = Circuit::with_size("plus", 1, 1);
//! circuit.h(QubitId(0))?.measure(QubitId(0), ClbitId(0))?;
//!
//! let sim = StatevectorSimulator::new();
//! let dist = sim.run_statistics(&circuit, &Statevector::zero(1))?;
//! let (p0, p1) = dist.marginal(0);
//! assert!((p0 - 0.5).abs() < 1e-12 && (p1 - 0.5).abs() < 1e-12);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod simulator;
mod statevector;

pub use simulator::StatevectorSimulator;
pub use statevector::{NORM_TOLERANCE, Statevector};
