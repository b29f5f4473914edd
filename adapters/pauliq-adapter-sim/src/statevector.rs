//! Statevector simulation engine.
//!
//! Qubit 0 is the most significant bit of an amplitude index, matching
//! the Kronecker ordering of operators: on two qubits, |q0 q1⟩ = |10⟩ is
//! amplitude 2.

use num_complex::Complex64;
use std::f64::consts::{FRAC_1_SQRT_2, PI};

use pauliq_hal::{HalError, HalResult, QuantumState};
use pauliq_ir::{Circuit, GateKind, InstructionKind, StandardGate};

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);

/// Allowed deviation of the squared norm from 1.
pub const NORM_TOLERANCE: f64 = 1e-9;

/// A pure quantum state on `n` qubits.
#[derive(Debug, Clone, PartialEq)]
pub struct Statevector {
    /// The state amplitudes (2^n complex numbers).
    amplitudes: Vec<Complex64>,
    /// Number of qubits.
    num_qubits: usize,
}

impl Statevector {
    /// Create a new statevector initialized to |0...0⟩.
    pub fn zero(num_qubits: usize) -> Self {
        let size = 1 << num_qubits;
        let mut amplitudes = vec![ZERO; size];
        amplitudes[0] = ONE;
        Self {
            amplitudes,
            num_qubits,
        }
    }

    /// Computational basis state |index⟩.
    pub fn basis(num_qubits: usize, index: usize) -> HalResult<Self> {
        let size = 1usize << num_qubits;
        if index >= size {
            return Err(HalError::InvalidState(format!(
                "basis index {index} out of range for {num_qubits} qubits"
            )));
        }
        let mut amplitudes = vec![ZERO; size];
        amplitudes[index] = ONE;
        Ok(Self {
            amplitudes,
            num_qubits,
        })
    }

    /// Create a state from explicit amplitudes.
    ///
    /// The length must be a power of two, at least 2, and the squared norm
    /// must be 1 within [`NORM_TOLERANCE`].
    pub fn from_amplitudes(amplitudes: Vec<Complex64>) -> HalResult<Self> {
        let size = amplitudes.len();
        if size < 2 || !size.is_power_of_two() {
            return Err(HalError::InvalidState(format!(
                "{size} amplitudes do not describe a qubit register"
            )));
        }
        let norm_sqr: f64 = amplitudes.iter().map(Complex64::norm_sqr).sum();
        if (norm_sqr - 1.0).abs() > NORM_TOLERANCE {
            return Err(HalError::InvalidState(format!(
                "state is not normalised (squared norm {norm_sqr})"
            )));
        }
        Ok(Self {
            num_qubits: size.trailing_zeros() as usize,
            amplitudes,
        })
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// The amplitudes, indexed with qubit 0 as the most significant bit.
    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    /// Probability of finding `qubit` in |1⟩.
    pub fn probability_one(&self, qubit: usize) -> f64 {
        let mask = self.mask(qubit);
        self.amplitudes
            .iter()
            .enumerate()
            .filter(|(i, _)| i & mask != 0)
            .map(|(_, a)| a.norm_sqr())
            .sum()
    }

    /// Apply every gate of `circuit`. Measurements are rejected; use a
    /// [`pauliq_hal::Simulator`] to run measured circuits.
    pub fn apply_circuit(&mut self, circuit: &Circuit) -> HalResult<()> {
        if circuit.num_qubits() as usize != self.num_qubits {
            return Err(HalError::QubitMismatch {
                circuit: circuit.num_qubits(),
                state: self.num_qubits as u32,
            });
        }
        for instruction in circuit.instructions() {
            match &instruction.kind {
                InstructionKind::Gate(gate) => {
                    let qubits: Vec<_> = instruction.qubits.iter().map(|q| q.index()).collect();
                    self.apply_gate(&gate.kind, &qubits);
                }
                InstructionKind::Barrier => {}
                InstructionKind::Measure => {
                    return Err(HalError::Unsupported(
                        "measurement while applying a unitary circuit".into(),
                    ));
                }
            }
        }
        Ok(())
    }

    /// Project `qubit` onto `outcome` and renormalise.
    ///
    /// `probability` is the probability of `outcome` before the projection.
    pub(crate) fn collapse(&mut self, qubit: usize, outcome: bool, probability: f64) {
        let mask = self.mask(qubit);
        let scale = if probability > 0.0 {
            1.0 / probability.sqrt()
        } else {
            0.0
        };
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            if (i & mask != 0) == outcome {
                *amp *= scale;
            } else {
                *amp = ZERO;
            }
        }
    }

    /// Apply a gate to specific qubits.
    pub(crate) fn apply_gate(&mut self, gate: &GateKind, qubits: &[usize]) {
        match gate {
            GateKind::Standard(std_gate) => self.apply_standard_gate(std_gate, qubits),
            GateKind::Unitary(unitary) => self.apply_matrix(&unitary.matrix, qubits),
        }
    }

    /// Apply a standard gate.
    fn apply_standard_gate(&mut self, gate: &StandardGate, qubits: &[usize]) {
        match gate {
            // Single-qubit gates
            StandardGate::I => {}
            StandardGate::X => self.apply_x(qubits[0]),
            StandardGate::Y => self.apply_y(qubits[0]),
            StandardGate::Z => self.apply_z(qubits[0]),
            StandardGate::H => self.apply_h(qubits[0]),
            StandardGate::S => self.apply_phase(qubits[0], PI / 2.0),
            StandardGate::Sdg => self.apply_phase(qubits[0], -PI / 2.0),
            StandardGate::Rx(theta) => self.apply_rx(qubits[0], *theta),
            StandardGate::Ry(theta) => self.apply_ry(qubits[0], *theta),
            StandardGate::Rz(theta) => self.apply_rz(qubits[0], *theta),
            StandardGate::P(lambda) => self.apply_phase(qubits[0], *lambda),

            // Two-qubit gates
            StandardGate::CX => self.apply_cx(qubits[0], qubits[1]),
            StandardGate::CZ => self.apply_cz(qubits[0], qubits[1]),
            StandardGate::Swap => self.apply_swap(qubits[0], qubits[1]),
        }
    }

    #[inline]
    fn mask(&self, qubit: usize) -> usize {
        1 << (self.num_qubits - 1 - qubit)
    }

    // =========================================================================
    // Single-qubit gate implementations
    // =========================================================================

    fn apply_x(&mut self, qubit: usize) {
        let mask = self.mask(qubit);
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                self.amplitudes.swap(i, i | mask);
            }
        }
    }

    fn apply_y(&mut self, qubit: usize) {
        let mask = self.mask(qubit);
        let i_val = Complex64::new(0.0, 1.0);
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                let j = i | mask;
                let tmp = self.amplitudes[i];
                self.amplitudes[i] = -i_val * self.amplitudes[j];
                self.amplitudes[j] = i_val * tmp;
            }
        }
    }

    fn apply_z(&mut self, qubit: usize) {
        let mask = self.mask(qubit);
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            if i & mask != 0 {
                *amp = -*amp;
            }
        }
    }

    fn apply_h(&mut self, qubit: usize) {
        let mask = self.mask(qubit);
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                let j = i | mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = FRAC_1_SQRT_2 * (a + b);
                self.amplitudes[j] = FRAC_1_SQRT_2 * (a - b);
            }
        }
    }

    fn apply_phase(&mut self, qubit: usize, theta: f64) {
        let mask = self.mask(qubit);
        let phase = Complex64::from_polar(1.0, theta);
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            if i & mask != 0 {
                *amp *= phase;
            }
        }
    }

    fn apply_rx(&mut self, qubit: usize, theta: f64) {
        let mask = self.mask(qubit);
        let c = (theta / 2.0).cos();
        let neg_i_s = Complex64::new(0.0, -(theta / 2.0).sin());
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                let j = i | mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = c * a + neg_i_s * b;
                self.amplitudes[j] = neg_i_s * a + c * b;
            }
        }
    }

    fn apply_ry(&mut self, qubit: usize, theta: f64) {
        let mask = self.mask(qubit);
        let c = (theta / 2.0).cos();
        let s = (theta / 2.0).sin();
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                let j = i | mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = c * a - s * b;
                self.amplitudes[j] = s * a + c * b;
            }
        }
    }

    fn apply_rz(&mut self, qubit: usize, theta: f64) {
        let mask = self.mask(qubit);
        let phase_0 = Complex64::from_polar(1.0, -theta / 2.0);
        let phase_1 = Complex64::from_polar(1.0, theta / 2.0);
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            *amp *= if i & mask == 0 { phase_0 } else { phase_1 };
        }
    }

    // =========================================================================
    // Two-qubit gate implementations
    // =========================================================================

    fn apply_cx(&mut self, control: usize, target: usize) {
        let ctrl_mask = self.mask(control);
        let tgt_mask = self.mask(target);
        for i in 0..self.amplitudes.len() {
            if (i & ctrl_mask != 0) && (i & tgt_mask == 0) {
                self.amplitudes.swap(i, i | tgt_mask);
            }
        }
    }

    fn apply_cz(&mut self, control: usize, target: usize) {
        let ctrl_mask = self.mask(control);
        let tgt_mask = self.mask(target);
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            if (i & ctrl_mask != 0) && (i & tgt_mask != 0) {
                *amp = -*amp;
            }
        }
    }

    fn apply_swap(&mut self, q1: usize, q2: usize) {
        let mask1 = self.mask(q1);
        let mask2 = self.mask(q2);
        for i in 0..self.amplitudes.len() {
            if (i & mask1 != 0) && (i & mask2 == 0) {
                let j = (i & !mask1) | mask2;
                self.amplitudes.swap(i, j);
            }
        }
    }

    // =========================================================================
    // Explicit unitaries
    // =========================================================================

    /// Apply a row-major 2^k × 2^k matrix; `qubits[0]` is the most
    /// significant bit of the local index.
    fn apply_matrix(&mut self, matrix: &[Complex64], qubits: &[usize]) {
        let k = qubits.len();
        let dim = 1usize << k;
        let masks: Vec<usize> = qubits.iter().map(|&q| self.mask(q)).collect();
        let support = masks.iter().fold(0, |acc, m| acc | m);
        let offsets: Vec<usize> = (0..dim)
            .map(|local| {
                masks
                    .iter()
                    .enumerate()
                    .filter(|(j, _)| (local >> (k - 1 - j)) & 1 == 1)
                    .fold(0, |acc, (_, m)| acc | m)
            })
            .collect();

        let mut local = vec![ZERO; dim];
        for base in 0..self.amplitudes.len() {
            if base & support != 0 {
                continue;
            }
            for (slot, offset) in local.iter_mut().zip(&offsets) {
                *slot = self.amplitudes[base | offset];
            }
            for (row, offset) in offsets.iter().enumerate() {
                self.amplitudes[base | offset] = matrix[row * dim..(row + 1) * dim]
                    .iter()
                    .zip(&local)
                    .map(|(m, a)| m * a)
                    .sum();
            }
        }
    }
}

impl QuantumState for Statevector {
    fn num_qubits(&self) -> u32 {
        self.num_qubits as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pauliq_ir::{QubitId, UnitaryGate};

    fn approx_eq(a: Complex64, b: Complex64) -> bool {
        (a - b).norm() < 1e-10
    }

    fn c(re: f64, im: f64) -> Complex64 {
        Complex64::new(re, im)
    }

    #[test]
    fn test_initial_state() {
        let sv = Statevector::zero(2);
        assert!(approx_eq(sv.amplitudes[0], ONE));
        assert!(sv.amplitudes[1..].iter().all(|a| approx_eq(*a, ZERO)));
    }

    #[test]
    fn test_qubit_zero_is_most_significant() {
        let mut sv = Statevector::zero(2);
        sv.apply_x(0);
        assert!(approx_eq(sv.amplitudes[2], ONE));
        assert!((sv.probability_one(0) - 1.0).abs() < 1e-12);
        assert!(sv.probability_one(1).abs() < 1e-12);
    }

    #[test]
    fn test_hadamard() {
        let mut sv = Statevector::zero(1);
        sv.apply_h(0);
        assert!(approx_eq(sv.amplitudes[0], c(FRAC_1_SQRT_2, 0.0)));
        assert!(approx_eq(sv.amplitudes[1], c(FRAC_1_SQRT_2, 0.0)));
    }

    #[test]
    fn test_bell_state() {
        let mut sv = Statevector::zero(2);
        sv.apply_h(0);
        sv.apply_cx(0, 1);
        assert!(approx_eq(sv.amplitudes[0], c(FRAC_1_SQRT_2, 0.0)));
        assert!(approx_eq(sv.amplitudes[1], ZERO));
        assert!(approx_eq(sv.amplitudes[2], ZERO));
        assert!(approx_eq(sv.amplitudes[3], c(FRAC_1_SQRT_2, 0.0)));
    }

    #[test]
    fn test_cx_direction() {
        // |q0 q1⟩ = |01⟩, control q1 flips q0
        let mut sv = Statevector::basis(2, 1).unwrap();
        sv.apply_cx(1, 0);
        assert!(approx_eq(sv.amplitudes[3], ONE));
    }

    #[test]
    fn test_unitary_matches_standard_gates() {
        let mut circuit = Circuit::with_size("u", 2, 0);
        let mut cx_then_h = Circuit::with_size("std", 2, 0);
        cx_then_h.h(QubitId(1)).unwrap().cx(QubitId(1), QubitId(0)).unwrap();

        // CX with control on the first operand, applied as (q1, q0)
        let cx = UnitaryGate::new("cx_u", 2, StandardGate::CX.matrix()).unwrap();
        let h = UnitaryGate::new("h_u", 1, StandardGate::H.matrix()).unwrap();
        circuit.unitary(h, [QubitId(1)]).unwrap();
        circuit.unitary(cx, [QubitId(1), QubitId(0)]).unwrap();

        for index in 0..4 {
            let mut a = Statevector::basis(2, index).unwrap();
            let mut b = a.clone();
            a.apply_circuit(&circuit).unwrap();
            b.apply_circuit(&cx_then_h).unwrap();
            for (x, y) in a.amplitudes().iter().zip(b.amplitudes()) {
                assert!(approx_eq(*x, *y), "basis {index}");
            }
        }
    }

    #[test]
    fn test_kernels_match_gate_matrices() {
        // Uneven three-qubit state so every amplitude moves.
        let raw: Vec<Complex64> = (0..8)
            .map(|k| c(0.1 + 0.05 * k as f64, 0.3 - 0.07 * k as f64))
            .collect();
        let norm = raw.iter().map(Complex64::norm_sqr).sum::<f64>().sqrt();
        let state = Statevector::from_amplitudes(raw.iter().map(|a| *a / norm).collect()).unwrap();

        let cases: &[(StandardGate, &[usize])] = &[
            (StandardGate::I, &[1]),
            (StandardGate::X, &[2]),
            (StandardGate::Y, &[0]),
            (StandardGate::Z, &[1]),
            (StandardGate::H, &[2]),
            (StandardGate::S, &[0]),
            (StandardGate::Sdg, &[2]),
            (StandardGate::Rx(0.7), &[1]),
            (StandardGate::Ry(-1.3), &[0]),
            (StandardGate::Rz(2.1), &[2]),
            (StandardGate::P(0.4), &[1]),
            (StandardGate::CX, &[0, 2]),
            (StandardGate::CX, &[2, 1]),
            (StandardGate::CZ, &[1, 0]),
            (StandardGate::Swap, &[0, 2]),
        ];
        for (gate, qubits) in cases {
            let mut kernel = state.clone();
            kernel.apply_standard_gate(gate, qubits);
            let mut dense = state.clone();
            dense.apply_matrix(&gate.matrix(), qubits);
            for (index, (x, y)) in kernel.amplitudes().iter().zip(dense.amplitudes()).enumerate() {
                assert!(approx_eq(*x, *y), "{} on {qubits:?}: amplitude {index}", gate.name());
            }
        }
    }

    #[test]
    fn test_from_amplitudes_validation() {
        assert!(Statevector::from_amplitudes(vec![ONE]).is_err());
        assert!(Statevector::from_amplitudes(vec![ONE, ZERO, ZERO]).is_err());
        assert!(Statevector::from_amplitudes(vec![ONE, ONE]).is_err());
        let sv = Statevector::from_amplitudes(vec![c(FRAC_1_SQRT_2, 0.0), c(0.0, FRAC_1_SQRT_2)]).unwrap();
        assert_eq!(sv.num_qubits(), 1);
    }

    #[test]
    fn test_basis_out_of_range() {
        assert!(Statevector::basis(2, 4).is_err());
    }

    #[test]
    fn test_collapse_renormalises() {
        let mut sv = Statevector::zero(1);
        sv.apply_h(0);
        sv.collapse(0, true, 0.5);
        assert!(approx_eq(sv.amplitudes[0], ZERO));
        assert!(approx_eq(sv.amplitudes[1], ONE));
    }

    #[test]
    fn test_apply_circuit_rejects_measure_and_mismatch() {
        let mut measured = Circuit::with_size("m", 1, 1);
        measured.measure(QubitId(0), pauliq_ir::ClbitId(0)).unwrap();
        assert!(Statevector::zero(1).apply_circuit(&measured).is_err());
        assert!(matches!(
            Statevector::zero(2).apply_circuit(&Circuit::with_size("c", 1, 0)),
            Err(HalError::QubitMismatch { .. })
        ));
    }
}
