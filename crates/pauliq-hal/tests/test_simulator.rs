//! Contract tests against a minimal classical simulator.

use pauliq_hal::{HalError, HalResult, Outcome, OutcomeDistribution, QuantumState, Simulator};
use pauliq_ir::{Circuit, ClbitId, InstructionKind, QubitId, StandardGate};
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Computational-basis state; only X flips it.
#[derive(Debug, Clone, PartialEq)]
struct BitState {
    bits: Vec<bool>,
}

impl QuantumState for BitState {
    fn num_qubits(&self) -> u32 {
        self.bits.len() as u32
    }
}

/// Deterministic simulator for circuits of X gates and measurements.
struct BitSimulator;

impl BitSimulator {
    fn evolve(&self, circuit: &Circuit, state: &BitState) -> HalResult<Outcome> {
        self.validate(circuit, state)?;
        let mut bits = state.bits.clone();
        let mut outcome = Outcome::zeros(circuit.num_clbits() as usize);
        for instruction in circuit.instructions() {
            match &instruction.kind {
                InstructionKind::Gate(gate) => {
                    if gate.name() != StandardGate::X.name() {
                        return Err(HalError::Unsupported(gate.name().to_string()));
                    }
                    let q = instruction.qubits[0].index();
                    bits[q] = !bits[q];
                }
                InstructionKind::Measure => {
                    for (q, c) in instruction.qubits.iter().zip(&instruction.clbits) {
                        outcome.set(c.index(), bits[q.index()]);
                    }
                }
                InstructionKind::Barrier => {}
            }
        }
        Ok(outcome)
    }
}

impl Simulator for BitSimulator {
    type State = BitState;

    fn name(&self) -> &str {
        "bits"
    }

    fn run<R: Rng + ?Sized>(
        &self,
        circuit: &Circuit,
        state: &BitState,
        _rng: &mut R,
    ) -> HalResult<Outcome> {
        self.evolve(circuit, state)
    }

    fn run_statistics(
        &self,
        circuit: &Circuit,
        state: &BitState,
    ) -> HalResult<OutcomeDistribution> {
        let mut distribution = OutcomeDistribution::new();
        distribution.add(self.evolve(circuit, state)?, 1.0);
        Ok(distribution)
    }
}

fn flip_and_measure() -> Circuit {
    let mut circuit = Circuit::with_size("flip", 2, 2);
    circuit
        .x(QubitId(1))
        .unwrap()
        .measure(QubitId(0), ClbitId(0))
        .unwrap()
        .measure(QubitId(1), ClbitId(1))
        .unwrap();
    circuit
}

// ---------------------------------------------------------------------------
// Contract
// ---------------------------------------------------------------------------

#[test]
fn run_and_statistics_agree() {
    let sim = BitSimulator;
    let state = BitState {
        bits: vec![true, false],
    };
    let mut rng = StdRng::seed_from_u64(0);
    let outcome = sim.run(&flip_and_measure(), &state, &mut rng).unwrap();
    assert_eq!(outcome.to_string(), "11");

    let distribution = sim.run_statistics(&flip_and_measure(), &state).unwrap();
    assert_eq!(distribution.len(), 1);
    assert_eq!(distribution.probability(&outcome), 1.0);
    assert_eq!(distribution.marginal(1), (0.0, 1.0));
}

#[test]
fn default_validate_rejects_qubit_mismatch() {
    let sim = BitSimulator;
    let state = BitState {
        bits: vec![false; 3],
    };
    let result = sim.run_statistics(&flip_and_measure(), &state);
    assert_eq!(
        result,
        Err(HalError::QubitMismatch {
            circuit: 2,
            state: 3
        })
    );
}

#[test]
fn simulator_is_usable_as_generic_bound() {
    fn names<S: Simulator>(sims: &[S]) -> Vec<&str> {
        sims.iter().map(Simulator::name).collect()
    }
    assert_eq!(names(&[BitSimulator, BitSimulator]), ["bits", "bits"]);
}

#[test]
fn unsupported_gate_surfaces_as_error() {
    let mut circuit = Circuit::with_size("h", 1, 1);
    circuit.h(QubitId(0)).unwrap();
    let result = BitSimulator.run_statistics(&circuit, &BitState { bits: vec![false] });
    assert!(matches!(result, Err(HalError::Unsupported(_))));
}
