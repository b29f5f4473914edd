//! Measurement-basis rotations for Pauli terms.
//!
//! Measuring a Pauli term P in the computational basis needs a unitary W
//! that maps P's eigenspaces onto the two values of a single qubit. Every
//! circuit produced here follows one convention: after W, the +1
//! eigenspace of P has qubit 0 in |0⟩ and the −1 eigenspace has qubit 0 in
//! |1⟩. The expectation of P is then `p0 − p1` for qubit 0.
//!
//! Two strategies build W:
//!
//! - [`MeasurementStrategy::Table`]: fixed Clifford circuits for 1 and 2
//!   qubits. X becomes Z through H, Y through P(−π/2) then H, and the
//!   parity of all non-identity qubits is folded onto qubit 0 with CNOTs.
//! - [`MeasurementStrategy::Eigen`]: any n. W = V†, where the columns of V
//!   are the eigenvectors of P with all +1 eigenvalues first, emitted as a
//!   single unitary gate labelled `PM_<term>`. The eigenvectors are built
//!   exactly from P's phased-permutation form and checked against P before
//!   use.
//!
//! The identity term has no rotation at all and is reported as
//! [`MeasurementCircuit::NoRotation`]; its expectation is always 1.

use std::collections::BTreeMap;
use std::f64::consts::{FRAC_1_SQRT_2, FRAC_PI_2};
use std::sync::LazyLock;

use num_complex::Complex64;
use pauliq_ir::{Circuit, QubitId, UnitaryGate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::decompose::Decomposition;
use crate::error::{OpsError, OpsResult};
use crate::operator::EIGEN_RESIDUAL_TOLERANCE;
use crate::pauli::{PauliBasis, PauliTerm};

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);

/// Largest term length the eigen strategy accepts.
pub const MAX_EIGEN_QUBITS: usize = 10;

/// Basis-change circuit for one Pauli term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MeasurementCircuit {
    /// The identity term; nothing to measure.
    NoRotation,
    /// Rotation to apply before measuring qubit 0. May contain no gates,
    /// e.g. for `Z` or `ZI`, where qubit 0 already carries the parity.
    Rotation(Circuit),
}

impl MeasurementCircuit {
    /// True for the identity sentinel.
    pub fn is_no_rotation(&self) -> bool {
        matches!(self, MeasurementCircuit::NoRotation)
    }

    /// The rotation circuit, unless this is the identity sentinel.
    pub fn circuit(&self) -> Option<&Circuit> {
        match self {
            MeasurementCircuit::NoRotation => None,
            MeasurementCircuit::Rotation(c) => Some(c),
        }
    }
}

/// How a measurement circuit is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasurementStrategy {
    /// Fixed Clifford circuits, 1 and 2 qubits only.
    Table,
    /// Eigen-decomposition of the term, any length up to
    /// [`MAX_EIGEN_QUBITS`].
    Eigen,
}

impl MeasurementStrategy {
    /// Default strategy for terms of the given length.
    pub fn for_qubits(num_qubits: usize) -> Self {
        if num_qubits <= 2 {
            MeasurementStrategy::Table
        } else {
            MeasurementStrategy::Eigen
        }
    }

    /// Build the measurement circuit of `term` with this strategy.
    ///
    /// # Errors
    ///
    /// - [`OpsError::UnsupportedTerm`] if the term is empty or its length is
    ///   outside the strategy's range.
    pub fn build(self, term: &PauliTerm) -> OpsResult<MeasurementCircuit> {
        let n = term.num_qubits();
        if n == 0 {
            return Err(OpsError::unsupported("", "label is empty"));
        }
        match self {
            MeasurementStrategy::Table => table_rotation(term),
            MeasurementStrategy::Eigen => eigen_rotation(term),
        }
    }
}

/// Builds measurement circuits, dispatching on term length unless a
/// strategy is forced.
///
/// # Example
///
/// ```rust
/// use pauliq_ops::measurement::{MeasurementCircuit, MeasurementCircuitBuilder};
///
/// let builder = MeasurementCircuitBuilder::new();
/// let circuit = builder.measurement_circuit_for("XZ")?;
/// assert_eq!(circuit.circuit().map(|c| c.num_ops()), Some(2));
/// assert_eq!(builder.measurement_circuit_for("II")?, MeasurementCircuit::NoRotation);
/// # Ok::<(), pauliq_ops::OpsError>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct MeasurementCircuitBuilder {
    strategy: Option<MeasurementStrategy>,
}

impl MeasurementCircuitBuilder {
    /// Builder using [`MeasurementStrategy::for_qubits`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Force a strategy for every term.
    #[must_use]
    pub fn with_strategy(mut self, strategy: MeasurementStrategy) -> Self {
        self.strategy = Some(strategy);
        self
    }

    /// Measurement circuit of one term.
    pub fn measurement_circuit(&self, term: &PauliTerm) -> OpsResult<MeasurementCircuit> {
        let strategy = self
            .strategy
            .unwrap_or_else(|| MeasurementStrategy::for_qubits(term.num_qubits()));
        debug!(term = %term, ?strategy, "Building measurement circuit");
        strategy.build(term)
    }

    /// Measurement circuit of the term with the given label.
    pub fn measurement_circuit_for(&self, label: &str) -> OpsResult<MeasurementCircuit> {
        self.measurement_circuit(&label.parse()?)
    }

    /// Measurement circuits for every term of a decomposition.
    pub fn for_decomposition(&self, decomposition: &Decomposition) -> OpsResult<MeasurementCircuits> {
        decomposition
            .terms()
            .map(|t| self.measurement_circuit(t).map(|c| (t.clone(), c)))
            .collect()
    }

    /// Measurement circuits for all 4^n terms on `num_qubits` qubits.
    ///
    /// # Errors
    ///
    /// - [`OpsError::UnsupportedTerm`] if `num_qubits` exceeds
    ///   [`MAX_EIGEN_QUBITS`], or if a term is outside the forced
    ///   strategy's range.
    pub fn all_for(&self, num_qubits: usize) -> OpsResult<MeasurementCircuits> {
        if num_qubits > MAX_EIGEN_QUBITS {
            return Err(OpsError::unsupported(
                format!("<{num_qubits} qubits>"),
                format!("measurement circuits cover at most {MAX_EIGEN_QUBITS} qubits"),
            ));
        }
        PauliBasis::terms(num_qubits)
            .map(|t| self.measurement_circuit(&t).map(|c| (t, c)))
            .collect()
    }
}

/// Measurement circuits keyed by Pauli term.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeasurementCircuits {
    circuits: BTreeMap<PauliTerm, MeasurementCircuit>,
}

impl MeasurementCircuits {
    /// Empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a circuit, returning the previous one for that term.
    pub fn insert(&mut self, term: PauliTerm, circuit: MeasurementCircuit) -> Option<MeasurementCircuit> {
        self.circuits.insert(term, circuit)
    }

    /// Circuit for `term`.
    pub fn get(&self, term: &PauliTerm) -> Option<&MeasurementCircuit> {
        self.circuits.get(term)
    }

    /// Circuit for the term with the given label.
    pub fn get_label(&self, label: &str) -> Option<&MeasurementCircuit> {
        label.parse::<PauliTerm>().ok().and_then(|t| self.circuits.get(&t))
    }

    /// True if a circuit is stored for `term`.
    pub fn contains(&self, term: &PauliTerm) -> bool {
        self.circuits.contains_key(term)
    }

    /// Number of stored circuits.
    pub fn len(&self) -> usize {
        self.circuits.len()
    }

    /// True if no circuit is stored.
    pub fn is_empty(&self) -> bool {
        self.circuits.is_empty()
    }

    /// Iterate in term order.
    pub fn iter(&self) -> impl Iterator<Item = (&PauliTerm, &MeasurementCircuit)> {
        self.circuits.iter()
    }
}

impl FromIterator<(PauliTerm, MeasurementCircuit)> for MeasurementCircuits {
    fn from_iter<T: IntoIterator<Item = (PauliTerm, MeasurementCircuit)>>(iter: T) -> Self {
        Self {
            circuits: iter.into_iter().collect(),
        }
    }
}

// =============================================================================
// Table strategy
// =============================================================================

/// One gate of a table entry.
#[derive(Debug, Clone, Copy)]
enum Step {
    /// Hadamard.
    H(u32),
    /// Phase P(−π/2).
    Sdg(u32),
    /// CNOT (control, target).
    Cx(u32, u32),
}

type TableEntry = (&'static str, &'static [Step]);

const ONE_QUBIT_TABLE: &[TableEntry] = &[
    ("X", &[Step::H(0)]),
    ("Y", &[Step::Sdg(0), Step::H(0)]),
    ("Z", &[]),
];

// Qubit 0 is the first label character. When qubit 0 is idle the parity
// lands on qubit 1 and is moved over with CX(0,1) CX(1,0).
const TWO_QUBIT_TABLE: &[TableEntry] = &[
    ("IX", &[Step::H(1), Step::Cx(0, 1), Step::Cx(1, 0)]),
    ("IY", &[Step::Sdg(1), Step::H(1), Step::Cx(0, 1), Step::Cx(1, 0)]),
    ("IZ", &[Step::Cx(0, 1), Step::Cx(1, 0)]),
    ("XI", &[Step::H(0)]),
    ("XX", &[Step::H(0), Step::H(1), Step::Cx(1, 0)]),
    ("XY", &[Step::H(0), Step::Sdg(1), Step::H(1), Step::Cx(1, 0)]),
    ("XZ", &[Step::H(0), Step::Cx(1, 0)]),
    ("YI", &[Step::Sdg(0), Step::H(0)]),
    ("YX", &[Step::Sdg(0), Step::H(0), Step::H(1), Step::Cx(1, 0)]),
    ("YY", &[Step::Sdg(0), Step::H(0), Step::Sdg(1), Step::H(1), Step::Cx(1, 0)]),
    ("YZ", &[Step::Sdg(0), Step::H(0), Step::Cx(1, 0)]),
    ("ZI", &[]),
    ("ZX", &[Step::H(1), Step::Cx(1, 0)]),
    ("ZY", &[Step::Sdg(1), Step::H(1), Step::Cx(1, 0)]),
    ("ZZ", &[Step::Cx(1, 0)]),
];

struct MeasurementTables {
    one_qubit: BTreeMap<PauliTerm, Circuit>,
    two_qubit: BTreeMap<PauliTerm, Circuit>,
}

static TABLES: LazyLock<MeasurementTables> = LazyLock::new(|| {
    let load = |n: usize, entries: &[TableEntry]| {
        load_table(n, entries)
            .unwrap_or_else(|e| panic!("{n}-qubit measurement table is invalid: {e}"))
    };
    MeasurementTables {
        one_qubit: load(1, ONE_QUBIT_TABLE),
        two_qubit: load(2, TWO_QUBIT_TABLE),
    }
});

/// Parse and check a table: one entry per non-identity term, no extras.
fn load_table(num_qubits: usize, entries: &[TableEntry]) -> OpsResult<BTreeMap<PauliTerm, Circuit>> {
    let mut table = BTreeMap::new();
    for (label, steps) in entries {
        let term: PauliTerm = label.parse()?;
        if term.num_qubits() != num_qubits {
            return Err(OpsError::unsupported(*label, format!("table is for {num_qubits} qubit(s)")));
        }
        if term.is_identity() {
            return Err(OpsError::unsupported(*label, "identity has no table entry"));
        }
        let circuit = table_circuit(&term, steps)?;
        if table.insert(term, circuit).is_some() {
            return Err(OpsError::unsupported(*label, "duplicate table entry"));
        }
    }
    let expected = PauliBasis::num_terms(num_qubits) - 1;
    if table.len() != expected {
        return Err(OpsError::Dimension {
            expected,
            got: table.len(),
        });
    }
    Ok(table)
}

fn table_circuit(term: &PauliTerm, steps: &[Step]) -> OpsResult<Circuit> {
    let mut circuit = Circuit::with_size(format!("PM_{term}"), term.num_qubits() as u32, 0);
    for step in steps {
        match *step {
            Step::H(q) => circuit.h(QubitId(q))?,
            Step::Sdg(q) => circuit.p(-FRAC_PI_2, QubitId(q))?,
            Step::Cx(c, t) => circuit.cx(QubitId(c), QubitId(t))?,
        };
    }
    Ok(circuit)
}

fn table_rotation(term: &PauliTerm) -> OpsResult<MeasurementCircuit> {
    let table = match term.num_qubits() {
        1 => &TABLES.one_qubit,
        2 => &TABLES.two_qubit,
        n => {
            return Err(OpsError::unsupported(
                term.to_string(),
                format!("table strategy covers 1 and 2 qubits, got {n}"),
            ));
        }
    };
    if term.is_identity() {
        return Ok(MeasurementCircuit::NoRotation);
    }
    table
        .get(term)
        .cloned()
        .map(MeasurementCircuit::Rotation)
        .ok_or_else(|| OpsError::unsupported(term.to_string(), "missing from measurement table"))
}

// =============================================================================
// Eigen strategy
// =============================================================================

fn eigen_rotation(term: &PauliTerm) -> OpsResult<MeasurementCircuit> {
    let n = term.num_qubits();
    if n > MAX_EIGEN_QUBITS {
        return Err(OpsError::unsupported(
            term.to_string(),
            format!("eigen strategy covers at most {MAX_EIGEN_QUBITS} qubits, got {n}"),
        ));
    }
    if term.is_identity() {
        return Ok(MeasurementCircuit::NoRotation);
    }

    let (plus, minus) = eigenbasis(term);
    let dim = 1usize << n;
    if plus.len() != dim / 2 || minus.len() != dim / 2 {
        return Err(OpsError::Numerical(format!(
            "term {term} has {} +1 and {} -1 eigenvectors, expected {} each",
            plus.len(),
            minus.len(),
            dim / 2
        )));
    }
    let residual = plus
        .iter()
        .map(|v| eigen_residual(term, v, 1.0))
        .chain(minus.iter().map(|v| eigen_residual(term, v, -1.0)))
        .fold(0.0, f64::max);
    if residual > EIGEN_RESIDUAL_TOLERANCE {
        return Err(OpsError::Numerical(format!(
            "eigenvector residual {residual:e} of term {term} exceeds tolerance"
        )));
    }

    // Row k of W is the conjugate of eigenvector k, so W·v_k = e_k and the
    // +1 half lands on qubit 0 = |0⟩.
    let matrix = plus
        .iter()
        .chain(&minus)
        .flat_map(|v| v.iter().map(|z| z.conj()))
        .collect();
    let name = format!("PM_{term}");
    let gate = UnitaryGate::new(name.clone(), n as u32, matrix)?;
    let mut circuit = Circuit::with_size(name, n as u32, 0);
    circuit.unitary(gate, (0..n as u32).map(QubitId))?;
    Ok(MeasurementCircuit::Rotation(circuit))
}

/// Orthonormal `(+1, −1)` eigenvectors of a non-identity term.
///
/// P is a phased permutation with `P|r⟩ ∝ |r ⊕ m⟩`, where m marks the X/Y
/// factors. With m = 0, P is diagonal and the basis states are the
/// eigenvectors. Otherwise each pair `{r, r ⊕ m}` spans a 2-dimensional
/// invariant subspace holding `(|r⟩ ± P|r⟩)/√2`.
fn eigenbasis(term: &PauliTerm) -> (Vec<Vec<Complex64>>, Vec<Vec<Complex64>>) {
    let dim = 1usize << term.num_qubits();
    let (mask, _) = term.row_entry(0);
    let mut plus = Vec::with_capacity(dim / 2);
    let mut minus = Vec::with_capacity(dim / 2);

    for row in 0..dim {
        let (col, phase) = term.row_entry(row);
        if mask == 0 {
            let mut v = vec![ZERO; dim];
            v[row] = ONE;
            if phase.re > 0.0 {
                plus.push(v);
            } else {
                minus.push(v);
            }
        } else if row < col {
            // P[col, row] = conj(P[row, col]) since P is Hermitian.
            let image = phase.conj() * FRAC_1_SQRT_2;
            for (sign, out) in [(1.0, &mut plus), (-1.0, &mut minus)] {
                let mut v = vec![ZERO; dim];
                v[row] = Complex64::new(FRAC_1_SQRT_2, 0.0);
                v[col] = image * sign;
                out.push(v);
            }
        }
    }
    (plus, minus)
}

/// Largest entry of `P·v − λ·v`, using the sparse row form of P.
fn eigen_residual(term: &PauliTerm, v: &[Complex64], value: f64) -> f64 {
    (0..v.len())
        .map(|row| {
            let (col, phase) = term.row_entry(row);
            (phase * v[col] - v[row] * value).norm()
        })
        .fold(0.0, f64::max)
}
