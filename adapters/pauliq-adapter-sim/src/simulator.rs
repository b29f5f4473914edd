//! Statevector simulator implementation.

use rand::Rng;
use tracing::{debug, instrument};

use pauliq_hal::{HalError, HalResult, Outcome, OutcomeDistribution, Simulator};
use pauliq_ir::{Circuit, Instruction, InstructionKind};

use crate::statevector::Statevector;

/// Branches lighter than this are dropped by [`StatevectorSimulator::run_statistics`].
const PRUNE_PROBABILITY: f64 = 1e-15;

/// Local statevector simulator.
///
/// Exact, limited by memory to roughly 20-25 qubits.
#[derive(Debug, Clone)]
pub struct StatevectorSimulator {
    /// Name reported by [`Simulator::name`].
    name: String,
    /// Maximum number of qubits supported.
    max_qubits: u32,
}

impl StatevectorSimulator {
    /// Create a new simulator with default settings.
    pub fn new() -> Self {
        Self::with_max_qubits(20)
    }

    /// Create a simulator with custom max qubits.
    pub fn with_max_qubits(max_qubits: u32) -> Self {
        Self {
            name: "statevector".into(),
            max_qubits,
        }
    }

    /// Maximum number of qubits supported.
    pub fn max_qubits(&self) -> u32 {
        self.max_qubits
    }

    fn check_size(&self, circuit: &Circuit) -> HalResult<()> {
        if circuit.num_qubits() > self.max_qubits {
            return Err(HalError::CircuitTooLarge(format!(
                "Circuit has {} qubits but simulator only supports {}",
                circuit.num_qubits(),
                self.max_qubits
            )));
        }
        Ok(())
    }
}

impl Default for StatevectorSimulator {
    fn default() -> Self {
        Self::new()
    }
}

fn gate_qubits(instruction: &Instruction) -> Vec<usize> {
    instruction.qubits.iter().map(|q| q.index()).collect()
}

impl Simulator for StatevectorSimulator {
    type State = Statevector;

    fn name(&self) -> &str {
        &self.name
    }

    fn run<R: Rng + ?Sized>(
        &self,
        circuit: &Circuit,
        state: &Statevector,
        rng: &mut R,
    ) -> HalResult<Outcome> {
        self.validate(circuit, state)?;
        self.check_size(circuit)?;

        let mut sv = state.clone();
        let mut outcome = Outcome::zeros(circuit.num_clbits() as usize);

        for instruction in circuit.instructions() {
            match &instruction.kind {
                InstructionKind::Gate(gate) => sv.apply_gate(&gate.kind, &gate_qubits(instruction)),
                InstructionKind::Measure => {
                    for (qubit, clbit) in instruction.qubits.iter().zip(&instruction.clbits) {
                        let p1 = sv.probability_one(qubit.index()).clamp(0.0, 1.0);
                        let r: f64 = rng.r#gen();
                        let bit = r < p1;
                        sv.collapse(qubit.index(), bit, if bit { p1 } else { 1.0 - p1 });
                        outcome.set(clbit.index(), bit);
                    }
                }
                InstructionKind::Barrier => {}
            }
        }

        Ok(outcome)
    }

    #[instrument(skip(self, circuit, state), fields(circuit = circuit.name()))]
    fn run_statistics(
        &self,
        circuit: &Circuit,
        state: &Statevector,
    ) -> HalResult<OutcomeDistribution> {
        self.validate(circuit, state)?;
        self.check_size(circuit)?;

        let mut branches = vec![(
            state.clone(),
            Outcome::zeros(circuit.num_clbits() as usize),
            1.0_f64,
        )];

        for instruction in circuit.instructions() {
            match &instruction.kind {
                InstructionKind::Gate(gate) => {
                    let qubits = gate_qubits(instruction);
                    for (sv, _, _) in &mut branches {
                        sv.apply_gate(&gate.kind, &qubits);
                    }
                }
                InstructionKind::Measure => {
                    for (qubit, clbit) in instruction.qubits.iter().zip(&instruction.clbits) {
                        let mut next = Vec::with_capacity(branches.len() * 2);
                        for (sv, outcome, weight) in branches {
                            let p1 = sv.probability_one(qubit.index()).clamp(0.0, 1.0);
                            for (bit, p) in [(false, 1.0 - p1), (true, p1)] {
                                if weight * p <= PRUNE_PROBABILITY {
                                    continue;
                                }
                                let mut sv = sv.clone();
                                sv.collapse(qubit.index(), bit, p);
                                let mut outcome = outcome.clone();
                                outcome.set(clbit.index(), bit);
                                next.push((sv, outcome, weight * p));
                            }
                        }
                        branches = next;
                    }
                }
                InstructionKind::Barrier => {}
            }
        }

        let mut distribution = OutcomeDistribution::new();
        for (_, outcome, weight) in branches {
            distribution.add(outcome, weight);
        }
        debug!(
            instructions = circuit.num_ops(),
            outcomes = distribution.len(),
            "Computed outcome distribution"
        );
        Ok(distribution)
    }
}
