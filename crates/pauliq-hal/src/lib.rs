//! pauliq Simulator Abstraction Layer
//!
//! The seam between circuit construction and circuit execution. Energy
//! estimation only needs two things from a simulator: a single stochastic
//! run producing classical bits, and the exact distribution over those
//! bits. Both are captured by the [`Simulator`] trait, together with the
//! [`QuantumState`] type the simulator evolves.
//!
//! # Overview
//!
//! - [`Simulator`]: run a circuit on an initial state, once or exactly
//! - [`QuantumState`]: the simulator's initial-state representation
//! - [`Outcome`] and [`OutcomeDistribution`]: classical-register results
//!
//! # Implementing a Simulator
//!
//! ```ignore
//! use pauliq_hal::{HalResult, Outcome, OutcomeDistribution, QuantumState, Simulator};
//! use pauliq_ir::Circuit;
//! use rand::Rng;
//!
//! struct MySimulator;
//!
//! impl Simulator for MySimulator {
//!     type State = MyState;
//!
//!     fn name(&self) -> &str { "my_simulator" }
//!
//!     fn run<R: Rng + ?Sized>(
//!         &self,
//!         circuit: &Circuit,
//!         state: &MyState,
//!         rng: &mut R,
//!     ) -> HalResult<Outcome> {
//!         // Evolve, collapsing at each measurement
//!         # todo!()
//!     }
//!
//!     fn run_statistics(&self, circuit: &Circuit, state: &MyState) -> HalResult<OutcomeDistribution> {
//!         // Evolve, branching at each measurement
//!         # todo!()
//!     }
//! }
//! ```

pub mod error;
pub mod outcome;
pub mod simulator;

pub use error::{HalError, HalResult};
pub use outcome::{Outcome, OutcomeDistribution};
pub use simulator::{QuantumState, Simulator};
