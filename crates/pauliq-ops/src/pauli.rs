//! Pauli operators, Pauli terms and the n-qubit Pauli basis.
//!
//! A Pauli term is a length-n string over `{I, X, Y, Z}`; character `k`
//! acts on qubit `k`, and qubit 0 is the leading tensor factor (the most
//! significant bit of a matrix index):
//!
//!   P = σ_{p₀} ⊗ σ_{p₁} ⊗ … ⊗ σ_{p_{n-1}}
//!
//! # Example
//!
//! ```rust
//! use pauliq_ops::pauli::{PauliBasis, PauliTerm};
//!
//! let labels: Vec<String> = PauliBasis::terms(1).map(|t| t.to_string()).collect();
//! assert_eq!(labels, ["I", "X", "Y", "Z"]);
//!
//! let term: PauliTerm = "XIZ".parse()?;
//! assert_eq!(term.weight(), 2);
//! # Ok::<(), pauliq_ops::OpsError>(())
//! ```

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use nalgebra::DMatrix;
use num_complex::Complex64;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{OpsError, OpsResult};
use crate::operator::Operator;

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);
const I: Complex64 = Complex64::new(0.0, 1.0);

static PAULI_MATRICES: LazyLock<[DMatrix<Complex64>; 4]> = LazyLock::new(|| {
    [
        DMatrix::from_row_slice(2, 2, &[ONE, ZERO, ZERO, ONE]),
        DMatrix::from_row_slice(2, 2, &[ZERO, ONE, ONE, ZERO]),
        DMatrix::from_row_slice(2, 2, &[ZERO, -I, I, ZERO]),
        DMatrix::from_row_slice(2, 2, &[ONE, ZERO, ZERO, -ONE]),
    ]
});

/// Single-qubit Pauli operator.
///
/// Ordered `I < X < Y < Z`, which is also the enumeration order of
/// [`PauliBasis`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PauliOp {
    /// Identity.
    I,
    /// Pauli-X.
    X,
    /// Pauli-Y.
    Y,
    /// Pauli-Z.
    Z,
}

impl PauliOp {
    /// All four operators in alphabet order.
    pub const ALL: [PauliOp; 4] = [PauliOp::I, PauliOp::X, PauliOp::Y, PauliOp::Z];

    /// Parse a single label character.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(PauliOp::I),
            'X' => Some(PauliOp::X),
            'Y' => Some(PauliOp::Y),
            'Z' => Some(PauliOp::Z),
            _ => None,
        }
    }

    /// Label character.
    pub fn as_char(self) -> char {
        match self {
            PauliOp::I => 'I',
            PauliOp::X => 'X',
            PauliOp::Y => 'Y',
            PauliOp::Z => 'Z',
        }
    }

    /// The 2×2 matrix of this operator.
    pub fn matrix(self) -> &'static DMatrix<Complex64> {
        &PAULI_MATRICES[self as usize]
    }

    /// Column bit and entry of the single non-zero element in row `bit`.
    #[inline]
    fn row_entry(self, bit: usize) -> (usize, Complex64) {
        match (self, bit) {
            (PauliOp::I, b) => (b, ONE),
            (PauliOp::X, b) => (b ^ 1, ONE),
            (PauliOp::Y, 0) => (1, -I),
            (PauliOp::Y, _) => (0, I),
            (PauliOp::Z, 0) => (0, ONE),
            (PauliOp::Z, _) => (1, -ONE),
        }
    }
}

impl fmt::Display for PauliOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// A tensor product of Pauli operators over `n` qubits.
///
/// Serialized as its label string, e.g. `"XYZ"`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PauliTerm {
    ops: Vec<PauliOp>,
}

impl PauliTerm {
    /// Create a term from its per-qubit operators.
    pub fn new(ops: Vec<PauliOp>) -> Self {
        Self { ops }
    }

    /// The all-identity term on `num_qubits` qubits.
    pub fn identity(num_qubits: usize) -> Self {
        Self {
            ops: vec![PauliOp::I; num_qubits],
        }
    }

    /// Per-qubit operators; index `k` acts on qubit `k`.
    pub fn ops(&self) -> &[PauliOp] {
        &self.ops
    }

    /// Number of qubits the term acts on.
    pub fn num_qubits(&self) -> usize {
        self.ops.len()
    }

    /// True if every factor is the identity.
    pub fn is_identity(&self) -> bool {
        self.ops.iter().all(|op| *op == PauliOp::I)
    }

    /// Number of non-identity factors.
    pub fn weight(&self) -> usize {
        self.ops.iter().filter(|op| **op != PauliOp::I).count()
    }

    /// Non-identity factors as `(qubit, op)` pairs, ascending by qubit.
    pub fn support(&self) -> impl Iterator<Item = (usize, PauliOp)> + '_ {
        self.ops
            .iter()
            .copied()
            .enumerate()
            .filter(|(_, op)| *op != PauliOp::I)
    }

    /// The non-zero entry of row `row` of the term's matrix.
    ///
    /// Every Pauli tensor product has exactly one non-zero entry per row,
    /// so the matrix is a phased permutation: returns `(col, P[row, col])`.
    pub fn row_entry(&self, row: usize) -> (usize, Complex64) {
        let n = self.ops.len();
        let mut col = 0usize;
        let mut phase = ONE;
        for (k, op) in self.ops.iter().enumerate() {
            let shift = n - 1 - k;
            let (bit, factor) = op.row_entry((row >> shift) & 1);
            col |= bit << shift;
            phase *= factor;
        }
        (col, phase)
    }
}

impl fmt::Display for PauliTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for op in &self.ops {
            write!(f, "{}", op.as_char())?;
        }
        Ok(())
    }
}

impl FromStr for PauliTerm {
    type Err = OpsError;

    fn from_str(s: &str) -> OpsResult<Self> {
        if s.is_empty() {
            return Err(OpsError::unsupported(s, "label is empty"));
        }
        let ops = s
            .chars()
            .map(|c| {
                PauliOp::from_char(c)
                    .ok_or_else(|| OpsError::unsupported(s, format!("invalid character '{c}'")))
            })
            .collect::<OpsResult<Vec<_>>>()?;
        Ok(Self { ops })
    }
}

impl Serialize for PauliTerm {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PauliTerm {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        label.parse().map_err(serde::de::Error::custom)
    }
}

/// The 4^n Pauli terms on n qubits.
pub struct PauliBasis;

impl PauliBasis {
    /// Number of basis terms on `num_qubits` qubits.
    pub fn num_terms(num_qubits: usize) -> usize {
        1usize << (2 * num_qubits)
    }

    /// Iterate all Pauli terms of length `num_qubits` in lexicographic
    /// order over `I < X < Y < Z`, starting with the all-identity term.
    ///
    /// # Panics
    ///
    /// Panics if `num_qubits >= 32`; the basis is not addressable.
    pub fn terms(num_qubits: usize) -> PauliTerms {
        assert!(
            num_qubits < 32,
            "Pauli basis on {num_qubits} qubits is not addressable"
        );
        PauliTerms {
            num_qubits,
            next: 0,
            end: Self::num_terms(num_qubits),
        }
    }

    /// Dense matrix of a term, built as the Kronecker product of its factors.
    pub fn operator_for(term: &PauliTerm) -> OpsResult<Operator> {
        let mut ops = term.ops().iter();
        let first = ops
            .next()
            .ok_or_else(|| OpsError::unsupported("", "label is empty"))?;
        Ok(ops.fold(Operator::pauli(*first), |acc, op| {
            acc.tensor(&Operator::pauli(*op))
        }))
    }
}

/// Iterator over a Pauli basis, see [`PauliBasis::terms`].
#[derive(Debug, Clone)]
pub struct PauliTerms {
    num_qubits: usize,
    next: usize,
    end: usize,
}

impl Iterator for PauliTerms {
    type Item = PauliTerm;

    fn next(&mut self) -> Option<PauliTerm> {
        if self.next >= self.end {
            return None;
        }
        let index = self.next;
        self.next += 1;
        let n = self.num_qubits;
        let ops = (0..n)
            .map(|k| PauliOp::ALL[(index >> (2 * (n - 1 - k))) & 3])
            .collect();
        Some(PauliTerm { ops })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.end - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for PauliTerms {}
