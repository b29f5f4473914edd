//! Pauli decomposition of Hermitian operators.
//!
//! Any Hermitian H on n qubits expands uniquely in the Pauli basis with
//! real coefficients:
//!
//!   H = Σ_P  a_P · P,   a_P = Tr(P·H) / 2^n
//!
//! Each Pauli term is a phased permutation, so `Tr(P·H)` only touches one
//! entry of H per row and decomposition costs O(4^n · 2^n) instead of the
//! O(4^n · 8^n) of forming every dense product.

use std::collections::BTreeMap;

use nalgebra::DMatrix;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::{OpsError, OpsResult};
use crate::operator::Operator;
use crate::pauli::{PauliBasis, PauliTerm};

/// Default magnitude below which coefficients are dropped.
pub const DEFAULT_TOLERANCE: f64 = 1e-12;

/// A sparse map from Pauli terms to real coefficients.
///
/// Every term has the same length, equal to [`Decomposition::num_qubits`].
/// Iteration follows the `I < X < Y < Z` lexicographic term order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "DecompositionRepr")]
pub struct Decomposition {
    num_qubits: usize,
    coefficients: BTreeMap<PauliTerm, f64>,
}

#[derive(Deserialize)]
struct DecompositionRepr {
    num_qubits: usize,
    coefficients: BTreeMap<PauliTerm, f64>,
}

impl TryFrom<DecompositionRepr> for Decomposition {
    type Error = OpsError;

    fn try_from(repr: DecompositionRepr) -> OpsResult<Self> {
        Self::from_terms(repr.num_qubits, repr.coefficients)
    }
}

impl Decomposition {
    /// Create an empty decomposition on `num_qubits` qubits.
    pub fn new(num_qubits: usize) -> Self {
        Self {
            num_qubits,
            coefficients: BTreeMap::new(),
        }
    }

    /// Build a decomposition from `(term, coefficient)` pairs.
    pub fn from_terms(
        num_qubits: usize,
        terms: impl IntoIterator<Item = (PauliTerm, f64)>,
    ) -> OpsResult<Self> {
        let mut decomposition = Self::new(num_qubits);
        for (term, coefficient) in terms {
            decomposition.insert(term, coefficient)?;
        }
        Ok(decomposition)
    }

    /// Build a decomposition from `(label, coefficient)` pairs, e.g.
    /// `[("XX", 0.5), ("ZI", -1.0)]`.
    pub fn from_labels<'a>(
        num_qubits: usize,
        terms: impl IntoIterator<Item = (&'a str, f64)>,
    ) -> OpsResult<Self> {
        let mut decomposition = Self::new(num_qubits);
        for (label, coefficient) in terms {
            decomposition.insert(label.parse()?, coefficient)?;
        }
        Ok(decomposition)
    }

    /// Set the coefficient of `term`, returning the previous one.
    pub fn insert(&mut self, term: PauliTerm, coefficient: f64) -> OpsResult<Option<f64>> {
        if term.num_qubits() != self.num_qubits {
            return Err(OpsError::Dimension {
                expected: self.num_qubits,
                got: term.num_qubits(),
            });
        }
        Ok(self.coefficients.insert(term, coefficient))
    }

    /// Coefficient of `term`, if present.
    pub fn get(&self, term: &PauliTerm) -> Option<f64> {
        self.coefficients.get(term).copied()
    }

    /// Coefficient of the term with the given label, if present.
    pub fn get_label(&self, label: &str) -> Option<f64> {
        label.parse::<PauliTerm>().ok().and_then(|t| self.get(&t))
    }

    /// Iterate `(term, coefficient)` pairs in term order.
    pub fn iter(&self) -> impl Iterator<Item = (&PauliTerm, f64)> {
        self.coefficients.iter().map(|(t, a)| (t, *a))
    }

    /// Iterate the terms in order.
    pub fn terms(&self) -> impl Iterator<Item = &PauliTerm> {
        self.coefficients.keys()
    }

    /// Number of stored terms.
    pub fn len(&self) -> usize {
        self.coefficients.len()
    }

    /// True if no term is stored.
    pub fn is_empty(&self) -> bool {
        self.coefficients.is_empty()
    }

    /// Number of qubits of every term.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Coefficient of the all-identity term, or zero.
    pub fn identity_coefficient(&self) -> f64 {
        self.get(&PauliTerm::identity(self.num_qubits))
            .unwrap_or(0.0)
    }

    /// Sum of coefficient magnitudes, an upper bound on the spectral norm
    /// of the composed operator.
    pub fn one_norm(&self) -> f64 {
        self.coefficients.values().map(|a| a.abs()).sum()
    }
}

/// Decompose a Hermitian operator into the Pauli basis.
///
/// Terms with `|a_P| < tol` are dropped; with `tol == 0.0` all 4^n terms
/// are kept, zeros included.
///
/// # Errors
///
/// - [`OpsError::InvalidOperator`] if `operator` is not Hermitian or is not
///   an operator on qubits, or if `tol` is negative or not finite.
#[instrument(skip(operator), fields(dim = operator.dim()))]
pub fn decompose(operator: &Operator, tol: f64) -> OpsResult<Decomposition> {
    if !tol.is_finite() || tol < 0.0 {
        return Err(OpsError::InvalidOperator(format!(
            "tolerance must be finite and non-negative, got {tol}"
        )));
    }
    let n = operator.num_qubits().ok_or_else(|| {
        OpsError::InvalidOperator(format!(
            "factor dimensions {:?} are not all 2",
            operator.dims()
        ))
    })?;
    if !operator.is_hermitian() {
        return Err(OpsError::InvalidOperator(
            "operator is not Hermitian".into(),
        ));
    }

    let dim = operator.dim();
    let norm = dim as f64;
    let mut decomposition = Decomposition::new(n);
    let mut max_imag = 0.0f64;

    for term in PauliBasis::terms(n) {
        // Tr(P·H) = Σ_r P[r, c(r)] · H[c(r), r]
        let trace: Complex64 = (0..dim)
            .map(|row| {
                let (col, phase) = term.row_entry(row);
                phase * operator.entry(col, row)
            })
            .sum();
        let coefficient = trace.re / norm;
        max_imag = max_imag.max((trace.im / norm).abs());
        if coefficient.abs() >= tol {
            decomposition.coefficients.insert(term, coefficient);
        }
    }

    debug!(
        num_qubits = n,
        kept = decomposition.len(),
        max_imag,
        "Decomposed operator into Pauli basis"
    );
    Ok(decomposition)
}

/// [`decompose`] with [`DEFAULT_TOLERANCE`].
pub fn decompose_default(operator: &Operator) -> OpsResult<Decomposition> {
    decompose(operator, DEFAULT_TOLERANCE)
}

/// Rebuild the dense operator `Σ a_P · P` from a decomposition.
///
/// # Errors
///
/// - [`OpsError::InvalidOperator`] if the decomposition has zero qubits.
pub fn compose(decomposition: &Decomposition) -> OpsResult<Operator> {
    let n = decomposition.num_qubits();
    if n == 0 {
        return Err(OpsError::InvalidOperator(
            "cannot compose an operator on zero qubits".into(),
        ));
    }
    let dim = 1usize << n;
    let mut matrix = DMatrix::<Complex64>::zeros(dim, dim);
    for (term, coefficient) in decomposition.iter() {
        for row in 0..dim {
            let (col, phase) = term.row_entry(row);
            matrix[(row, col)] += phase * coefficient;
        }
    }
    debug!(num_qubits = n, terms = decomposition.len(), "Composed operator");
    Operator::new(matrix, vec![2; n])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pauli::PauliOp;

    fn c(re: f64, im: f64) -> Complex64 {
        Complex64::new(re, im)
    }

    #[test]
    fn test_decompose_single_pauli() {
        let y = Operator::pauli(PauliOp::Y);
        let d = decompose_default(&y).unwrap();
        assert_eq!(d.len(), 1);
        assert!((d.get_label("Y").unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_decompose_zero_tolerance_keeps_all_terms() {
        let d = decompose(&Operator::identity(2), 0.0).unwrap();
        assert_eq!(d.len(), 16);
        assert!((d.get_label("II").unwrap() - 1.0).abs() < 1e-12);
        assert_eq!(d.get_label("XZ"), Some(0.0));
    }

    #[test]
    fn test_decompose_zero_operator_is_empty() {
        let d = decompose_default(&Operator::zeros(2)).unwrap();
        assert!(d.is_empty());
        assert_eq!(d.num_qubits(), 2);
    }

    #[test]
    fn test_decompose_rejects_non_hermitian() {
        let m = DMatrix::from_row_slice(2, 2, &[c(0.0, 0.0), c(1.0, 0.0), c(0.0, 0.0), c(0.0, 0.0)]);
        let op = Operator::from_qubit_matrix(m).unwrap();
        assert!(matches!(
            decompose_default(&op),
            Err(OpsError::InvalidOperator(_))
        ));
    }

    #[test]
    fn test_decompose_rejects_qutrit() {
        let op = Operator::new(DMatrix::identity(3, 3), vec![3]).unwrap();
        assert!(matches!(
            decompose_default(&op),
            Err(OpsError::InvalidOperator(_))
        ));
    }

    #[test]
    fn test_decompose_rejects_negative_tolerance() {
        assert!(decompose(&Operator::identity(1), -1.0).is_err());
        assert!(decompose(&Operator::identity(1), f64::NAN).is_err());
    }

    #[test]
    fn test_insert_checks_length() {
        let mut d = Decomposition::new(2);
        assert!(d.insert("XY".parse().unwrap(), 1.0).unwrap().is_none());
        assert_eq!(d.insert("XY".parse().unwrap(), 2.0).unwrap(), Some(1.0));
        assert!(matches!(
            d.insert("X".parse().unwrap(), 1.0),
            Err(OpsError::Dimension { expected: 2, got: 1 })
        ));
    }

    #[test]
    fn test_one_norm_and_identity_coefficient() {
        let d = Decomposition::from_labels(2, [("II", -1.5), ("XZ", 2.0), ("YY", -0.5)]).unwrap();
        assert!((d.one_norm() - 4.0).abs() < 1e-15);
        assert!((d.identity_coefficient() + 1.5).abs() < 1e-15);
        assert_eq!(Decomposition::new(2).identity_coefficient(), 0.0);
    }

    #[test]
    fn test_compose_zero_qubits_rejected() {
        assert!(compose(&Decomposition::new(0)).is_err());
    }

    #[test]
    fn test_serde_roundtrip_validates_lengths() {
        let d = Decomposition::from_labels(2, [("XY", 0.5), ("ZI", -1.0)]).unwrap();
        let json = serde_json::to_string(&d).unwrap();
        let back: Decomposition = serde_json::from_str(&json).unwrap();
        assert_eq!(back, d);

        let bad = r#"{"num_qubits":2,"coefficients":{"XYZ":1.0}}"#;
        assert!(serde_json::from_str::<Decomposition>(bad).is_err());
    }
}
