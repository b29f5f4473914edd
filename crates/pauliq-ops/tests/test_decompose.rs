//! Tests for Pauli decomposition and composition.

use nalgebra::DMatrix;
use num_complex::Complex64;
use pauliq_ops::{
    Decomposition, Operator, OpsError, PauliBasis, PauliOp, compose, decompose, decompose_default,
};

fn c(re: f64, im: f64) -> Complex64 {
    Complex64::new(re, im)
}

fn kron(ops: &[PauliOp]) -> Operator {
    ops[1..]
        .iter()
        .fold(Operator::pauli(ops[0]), |acc, op| acc.tensor(&Operator::pauli(*op)))
}

fn assert_coefficients(d: &Decomposition, expected: &[(&str, f64)]) {
    assert_eq!(d.len(), expected.len(), "terms: {:?}", d.iter().collect::<Vec<_>>());
    for (label, value) in expected {
        let got = d.get_label(label).unwrap_or_else(|| panic!("missing {label}"));
        assert!((got - value).abs() < 1e-10, "{label}: {got} != {value}");
    }
}

// ---------------------------------------------------------------------------
// Known operators
// ---------------------------------------------------------------------------

#[test]
fn single_qubit_operator() {
    use PauliOp::*;
    let h = Operator::identity(1)
        .add(&Operator::pauli(X).scaled(2.0))
        .unwrap()
        .add(&Operator::pauli(Y).scaled(3.0))
        .unwrap()
        .add(&Operator::pauli(Z).scaled(4.0))
        .unwrap();
    let d = decompose_default(&h).unwrap();
    assert_coefficients(&d, &[("I", 1.0), ("X", 2.0), ("Y", 3.0), ("Z", 4.0)]);
}

#[test]
fn two_qubit_operator() {
    use PauliOp::*;
    let h = Operator::identity(2)
        .add(&kron(&[X, Y]).scaled(2.0))
        .unwrap()
        .add(&kron(&[Y, Z]).scaled(3.0))
        .unwrap()
        .add(&kron(&[I, Z]).scaled(4.0))
        .unwrap();
    let d = decompose_default(&h).unwrap();
    assert_coefficients(&d, &[("II", 1.0), ("XY", 2.0), ("YZ", 3.0), ("IZ", 4.0)]);
}

#[test]
fn three_qubit_operator() {
    use PauliOp::*;
    let h = Operator::identity(3)
        .add(&kron(&[X, Y, X]).scaled(2.0))
        .unwrap()
        .add(&kron(&[Y, Z, Z]).scaled(3.0))
        .unwrap()
        .add(&kron(&[I, Z, I]).scaled(4.0))
        .unwrap();
    let d = decompose_default(&h).unwrap();
    assert_coefficients(&d, &[("III", 1.0), ("XYX", 2.0), ("YZZ", 3.0), ("IZI", 4.0)]);
}

#[test]
fn identity_decomposes_to_identity_term() {
    for n in 1..=3 {
        let d = decompose_default(&Operator::identity(n)).unwrap();
        assert_eq!(d.len(), 1);
        assert!((d.identity_coefficient() - 1.0).abs() < 1e-12);
    }
}

#[test]
fn complex_hermitian_matrix() {
    // [[1, 1-i], [1+i, -1]] = X + Y + Z
    let m = DMatrix::from_row_slice(2, 2, &[c(1.0, 0.0), c(1.0, -1.0), c(1.0, 1.0), c(-1.0, 0.0)]);
    let d = decompose_default(&Operator::from_qubit_matrix(m).unwrap()).unwrap();
    assert_coefficients(&d, &[("X", 1.0), ("Y", 1.0), ("Z", 1.0)]);
}

// ---------------------------------------------------------------------------
// Laws
// ---------------------------------------------------------------------------

#[test]
fn zero_tolerance_keeps_every_term() {
    for n in 1..=3 {
        let d = decompose(&Operator::zeros(n), 0.0).unwrap();
        assert_eq!(d.len(), PauliBasis::num_terms(n));
    }
}

#[test]
fn compose_inverts_decompose() {
    let d = Decomposition::from_labels(2, [("II", 0.5), ("XZ", -1.25), ("YY", 3.0), ("ZX", 0.1)])
        .unwrap();
    let h = compose(&d).unwrap();
    assert!(h.is_hermitian());
    let back = decompose_default(&h).unwrap();
    assert_eq!(back.len(), d.len());
    for (term, value) in d.iter() {
        assert!((back.get(term).unwrap() - value).abs() < 1e-12);
    }
}

#[test]
fn compose_matches_dense_kronecker_sum() {
    let d = Decomposition::from_labels(3, [("XYZ", 0.7), ("ZZI", -0.3), ("IIY", 1.1)]).unwrap();
    let mut dense = Operator::zeros(3);
    for (term, value) in d.iter() {
        dense = dense
            .add(&PauliBasis::operator_for(term).unwrap().scaled(value))
            .unwrap();
    }
    let composed = compose(&d).unwrap();
    assert!(composed.approx_eq(&dense, 1e-12));
}

#[test]
fn truncation_error_bounded_by_dropped_weight() {
    let full = Decomposition::from_labels(
        2,
        [("II", 1.0), ("XX", 0.5), ("YZ", 1e-3), ("ZI", 2e-4), ("IY", -5e-4)],
    )
    .unwrap();
    let h = compose(&full).unwrap();
    let tol = 1e-2;
    let truncated = decompose(&h, tol).unwrap();
    assert_eq!(truncated.len(), 2);

    let dropped: f64 = full
        .iter()
        .filter(|(_, a)| a.abs() < tol)
        .map(|(_, a)| a.abs())
        .sum();
    let diff = h.max_abs_diff(&compose(&truncated).unwrap()).unwrap();
    assert!(diff <= dropped + 1e-12, "{diff} > {dropped}");
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[test]
fn non_hermitian_rejected() {
    let xy = Operator::pauli(PauliOp::X)
        .matmul(&Operator::pauli(PauliOp::Y))
        .unwrap();
    assert!(matches!(decompose_default(&xy), Err(OpsError::InvalidOperator(_))));
}

#[test]
fn non_qubit_dims_rejected() {
    let op = Operator::new(DMatrix::identity(6, 6), vec![2, 3]).unwrap();
    assert!(matches!(decompose_default(&op), Err(OpsError::InvalidOperator(_))));
}
