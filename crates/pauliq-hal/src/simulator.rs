//! Simulator trait.
//!
//! # Contract
//!
//! ```text
//!   validate() ──→ run()             one stochastic execution
//!              └─→ run_statistics()  exact outcome distribution
//! ```
//!
//! | Method | Required | Returns |
//! |--------|----------|---------|
//! | `name()` | yes | `&str` |
//! | `run()` | yes | `HalResult<Outcome>` |
//! | `run_statistics()` | yes | `HalResult<OutcomeDistribution>` |
//! | `validate()` | provided | `HalResult<()>` |
//!
//! All methods are synchronous and take `&self`; a simulator is shared
//! across worker threads, so per-run randomness comes from the caller's
//! RNG rather than interior state.

use pauliq_ir::Circuit;
use rand::Rng;

use crate::error::{HalError, HalResult};
use crate::outcome::{Outcome, OutcomeDistribution};

/// An initial state a simulator can evolve.
pub trait QuantumState: Clone + Send + Sync {
    /// Number of qubits in the state.
    fn num_qubits(&self) -> u32;
}

/// A circuit simulator.
///
/// # Contract
///
/// - `run()` MUST leave `state` untouched and evolve a private copy.
/// - `run()` MUST draw every random number from `rng`, so that equal RNG
///   seeds give equal outcomes.
/// - Each `Measure` writes its clbit; clbits never written read as 0.
/// - `run_statistics()` MUST return the exact distribution `run()` samples
///   from, with zero-probability outcomes omitted.
/// - Both MUST reject circuits whose qubit count differs from the state's.
pub trait Simulator: Send + Sync {
    /// The initial-state representation.
    type State: QuantumState;

    /// Get the name of this simulator.
    fn name(&self) -> &str;

    /// Execute `circuit` once on `state`, collapsing at each measurement.
    fn run<R: Rng + ?Sized>(
        &self,
        circuit: &Circuit,
        state: &Self::State,
        rng: &mut R,
    ) -> HalResult<Outcome>;

    /// Exact distribution over the classical register after `circuit`.
    fn run_statistics(
        &self,
        circuit: &Circuit,
        state: &Self::State,
    ) -> HalResult<OutcomeDistribution>;

    /// Check that `circuit` can run on `state`.
    fn validate(&self, circuit: &Circuit, state: &Self::State) -> HalResult<()> {
        if circuit.num_qubits() != state.num_qubits() {
            return Err(HalError::QubitMismatch {
                circuit: circuit.num_qubits(),
                state: state.num_qubits(),
            });
        }
        Ok(())
    }
}
