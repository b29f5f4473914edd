//! Quantum gate types.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_1_SQRT_2;

use crate::error::{IrError, IrResult};

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);
const I: Complex64 = Complex64::new(0.0, 1.0);

/// Standard gates with known semantics.
///
/// Rotation angles are concrete radians; circuits handed to a simulator
/// are always fully bound.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StandardGate {
    // Single-qubit Pauli gates
    /// Identity gate.
    I,
    /// Pauli-X gate.
    X,
    /// Pauli-Y gate.
    Y,
    /// Pauli-Z gate.
    Z,

    // Single-qubit Clifford gates
    /// Hadamard gate.
    H,
    /// S gate (sqrt(Z)).
    S,
    /// S-dagger gate.
    Sdg,

    // Single-qubit rotation gates
    /// Rotation around X axis.
    Rx(f64),
    /// Rotation around Y axis.
    Ry(f64),
    /// Rotation around Z axis.
    Rz(f64),
    /// Phase gate, diag(1, e^{iλ}).
    P(f64),

    // Two-qubit gates
    /// Controlled-X (CNOT) gate. Operands are (control, target).
    CX,
    /// Controlled-Z gate.
    CZ,
    /// SWAP gate.
    Swap,
}

impl StandardGate {
    /// Get the name of this gate.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            StandardGate::I => "id",
            StandardGate::X => "x",
            StandardGate::Y => "y",
            StandardGate::Z => "z",
            StandardGate::H => "h",
            StandardGate::S => "s",
            StandardGate::Sdg => "sdg",
            StandardGate::Rx(_) => "rx",
            StandardGate::Ry(_) => "ry",
            StandardGate::Rz(_) => "rz",
            StandardGate::P(_) => "p",
            StandardGate::CX => "cx",
            StandardGate::CZ => "cz",
            StandardGate::Swap => "swap",
        }
    }

    /// Get the number of qubits this gate operates on.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        match self {
            StandardGate::I
            | StandardGate::X
            | StandardGate::Y
            | StandardGate::Z
            | StandardGate::H
            | StandardGate::S
            | StandardGate::Sdg
            | StandardGate::Rx(_)
            | StandardGate::Ry(_)
            | StandardGate::Rz(_)
            | StandardGate::P(_) => 1,

            StandardGate::CX | StandardGate::CZ | StandardGate::Swap => 2,
        }
    }

    /// Row-major unitary matrix of this gate.
    ///
    /// For two-qubit gates the first operand is the most significant bit
    /// of the row/column index.
    pub fn matrix(&self) -> Vec<Complex64> {
        match self {
            StandardGate::I => vec![ONE, ZERO, ZERO, ONE],
            StandardGate::X => vec![ZERO, ONE, ONE, ZERO],
            StandardGate::Y => vec![ZERO, -I, I, ZERO],
            StandardGate::Z => vec![ONE, ZERO, ZERO, -ONE],
            StandardGate::H => {
                let h = Complex64::new(FRAC_1_SQRT_2, 0.0);
                vec![h, h, h, -h]
            }
            StandardGate::S => vec![ONE, ZERO, ZERO, I],
            StandardGate::Sdg => vec![ONE, ZERO, ZERO, -I],
            StandardGate::Rx(theta) => {
                let c = Complex64::new((theta / 2.0).cos(), 0.0);
                let s = Complex64::new(0.0, -(theta / 2.0).sin());
                vec![c, s, s, c]
            }
            StandardGate::Ry(theta) => {
                let c = Complex64::new((theta / 2.0).cos(), 0.0);
                let s = Complex64::new((theta / 2.0).sin(), 0.0);
                vec![c, -s, s, c]
            }
            StandardGate::Rz(theta) => vec![
                Complex64::from_polar(1.0, -theta / 2.0),
                ZERO,
                ZERO,
                Complex64::from_polar(1.0, theta / 2.0),
            ],
            StandardGate::P(lambda) => vec![ONE, ZERO, ZERO, Complex64::from_polar(1.0, *lambda)],
            StandardGate::CX => vec![
                ONE, ZERO, ZERO, ZERO, //
                ZERO, ONE, ZERO, ZERO, //
                ZERO, ZERO, ZERO, ONE, //
                ZERO, ZERO, ONE, ZERO,
            ],
            StandardGate::CZ => vec![
                ONE, ZERO, ZERO, ZERO, //
                ZERO, ONE, ZERO, ZERO, //
                ZERO, ZERO, ONE, ZERO, //
                ZERO, ZERO, ZERO, -ONE,
            ],
            StandardGate::Swap => vec![
                ONE, ZERO, ZERO, ZERO, //
                ZERO, ZERO, ONE, ZERO, //
                ZERO, ONE, ZERO, ZERO, //
                ZERO, ZERO, ZERO, ONE,
            ],
        }
    }
}

/// A gate given by an explicit unitary matrix.
///
/// Used for basis changes that have no short standard-gate expansion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitaryGate {
    /// The name of the gate.
    pub name: String,
    /// The number of qubits it operates on.
    pub num_qubits: u32,
    /// Row-major unitary matrix, 2^k × 2^k, first operand most significant.
    pub matrix: Vec<Complex64>,
}

impl UnitaryGate {
    /// Create a unitary gate, checking that the matrix has (2^k)^2 entries.
    pub fn new(name: impl Into<String>, num_qubits: u32, matrix: Vec<Complex64>) -> IrResult<Self> {
        let name = name.into();
        let dim = 1usize << num_qubits;
        if matrix.len() != dim * dim {
            return Err(IrError::InvalidMatrix {
                gate_name: name,
                expected: dim * dim,
                got: matrix.len(),
            });
        }
        Ok(Self {
            name,
            num_qubits,
            matrix,
        })
    }
}

/// A quantum gate, either standard or given by its matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GateKind {
    /// A standard gate with known semantics.
    Standard(StandardGate),
    /// An explicit unitary.
    Unitary(UnitaryGate),
}

impl GateKind {
    /// Get the name of this gate.
    #[inline]
    pub fn name(&self) -> &str {
        match self {
            GateKind::Standard(g) => g.name(),
            GateKind::Unitary(g) => &g.name,
        }
    }

    /// Get the number of qubits.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        match self {
            GateKind::Standard(g) => g.num_qubits(),
            GateKind::Unitary(g) => g.num_qubits,
        }
    }

    /// Row-major matrix of the gate.
    pub fn matrix(&self) -> Vec<Complex64> {
        match self {
            GateKind::Standard(g) => g.matrix(),
            GateKind::Unitary(g) => g.matrix.clone(),
        }
    }
}

/// A gate with associated metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gate {
    /// The kind of gate.
    pub kind: GateKind,
    /// Optional label for the gate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Gate {
    /// Create a new gate from a standard gate.
    pub fn standard(gate: StandardGate) -> Self {
        Self {
            kind: GateKind::Standard(gate),
            label: None,
        }
    }

    /// Create a new gate from an explicit unitary.
    pub fn unitary(gate: UnitaryGate) -> Self {
        Self {
            kind: GateKind::Unitary(gate),
            label: None,
        }
    }

    /// Add a label to the gate.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Get the name of this gate.
    pub fn name(&self) -> &str {
        self.kind.name()
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> u32 {
        self.kind.num_qubits()
    }
}

impl From<StandardGate> for Gate {
    fn from(gate: StandardGate) -> Self {
        Gate::standard(gate)
    }
}

impl From<UnitaryGate> for Gate {
    fn from(gate: UnitaryGate) -> Self {
        Gate::unitary(gate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn matmul2(a: &[Complex64], b: &[Complex64]) -> Vec<Complex64> {
        let mut out = vec![ZERO; 4];
        for r in 0..2 {
            for c in 0..2 {
                out[r * 2 + c] = a[r * 2] * b[c] + a[r * 2 + 1] * b[2 + c];
            }
        }
        out
    }

    fn approx_eq(a: &[Complex64], b: &[Complex64]) -> bool {
        a.iter().zip(b).all(|(x, y)| (x - y).norm() < 1e-12)
    }

    #[test]
    fn test_standard_gate_properties() {
        assert_eq!(StandardGate::H.num_qubits(), 1);
        assert_eq!(StandardGate::CX.num_qubits(), 2);
        assert_eq!(StandardGate::P(PI).name(), "p");
        assert_eq!(StandardGate::Swap.matrix().len(), 16);
    }

    #[test]
    fn test_phase_minus_half_pi_is_sdg() {
        let p = StandardGate::P(-PI / 2.0).matrix();
        assert!(approx_eq(&p, &StandardGate::Sdg.matrix()));
    }

    #[test]
    fn test_hadamard_squared_is_identity() {
        let h = StandardGate::H.matrix();
        assert!(approx_eq(&matmul2(&h, &h), &StandardGate::I.matrix()));
    }

    #[test]
    fn test_unitary_gate_size_checked() {
        assert!(UnitaryGate::new("u", 1, vec![ONE, ZERO, ZERO, ONE]).is_ok());
        let err = UnitaryGate::new("u", 2, vec![ONE; 4]).unwrap_err();
        assert!(matches!(err, IrError::InvalidMatrix { expected: 16, got: 4, .. }));
    }

    #[test]
    fn test_gate_creation() {
        let h = Gate::standard(StandardGate::H);
        assert_eq!(h.name(), "h");
        assert!(h.label.is_none());

        let labelled = Gate::from(StandardGate::X).with_label("flip");
        assert_eq!(labelled.label.as_deref(), Some("flip"));
    }
}
