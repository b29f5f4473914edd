//! pauliq Circuit Intermediate Representation
//!
//! The circuit types shared by the Pauli measurement builder, the energy
//! estimator and the simulator adapters.
//!
//! # Core Components
//!
//! - **Qubits and Classical Bits**: [`QubitId`], [`ClbitId`]
//! - **Gates**: [`StandardGate`] for built-in gates and [`UnitaryGate`] for
//!   basis changes given by an explicit matrix
//! - **Instructions**: [`Instruction`] combining gates with their operands
//! - **Circuit**: [`Circuit`], a validated instruction list with a fluent
//!   builder API and [`Circuit::compose`]
//!
//! # Example: Measuring X⊗Y parity on qubit 0
//!
//! ```rust
//! use pauliq_ir::{Circuit, ClbitId, QubitId};
//! use std::f64::consts::FRAC_PI_2;
//!
//! let mut circuit = Circuit::with_size("xy_parity", 2, 1);
//! circuit
//!     .h(QubitId(0))?
//!     .p(-FRAC_PI_2, QubitId(1))?
//!     .h(QubitId(1))?
//!     .cx(QubitId(1), QubitId(0))?
//!     .measure(QubitId(0), ClbitId(0))?;
//!
//! assert_eq!(circuit.num_ops(), 5);
//! assert_eq!(circuit.count_2q(), 1);
//! # Ok::<(), pauliq_ir::IrError>(())
//! ```
//!
//! # Supported Gates
//!
//! | Gate | Qubits | Description |
//! |------|--------|-------------|
//! | `I`, `X`, `Y`, `Z` | 1 | Pauli gates |
//! | `H` | 1 | Hadamard gate |
//! | `S`, `Sdg` | 1 | S and S-dagger gates |
//! | `Rx`, `Ry`, `Rz` | 1 | Rotation gates |
//! | `P` | 1 | Phase gate with explicit angle |
//! | `CX`, `CZ` | 2 | Controlled-NOT and Controlled-Z |
//! | `Swap` | 2 | SWAP gate |
//! | `Unitary` | k | Explicit 2^k × 2^k matrix |

pub mod circuit;
pub mod error;
pub mod gate;
pub mod instruction;
pub mod qubit;

pub use circuit::Circuit;
pub use error::{IrError, IrResult};
pub use gate::{Gate, GateKind, StandardGate, UnitaryGate};
pub use instruction::{Instruction, InstructionKind};
pub use qubit::{ClbitId, QubitId};
