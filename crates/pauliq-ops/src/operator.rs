//! Dense operators on tensor-product Hilbert spaces.

use nalgebra::{DMatrix, DVector};
use num_complex::Complex64;

use crate::error::{OpsError, OpsResult};
use crate::pauli::PauliOp;

/// Tolerance of the Hermiticity check, relative to the largest entry.
pub const HERMITIAN_TOLERANCE: f64 = 1e-10;

/// Largest accepted `‖Av − λv‖` entry for an eigenpair, relative to the
/// spectral radius.
pub const EIGEN_RESIDUAL_TOLERANCE: f64 = 1e-9;

const EIGEN_EPSILON: f64 = 1e-15;
const EIGEN_MAX_ITERATIONS: usize = 100_000;

/// A complex square matrix acting on a space with factor dimensions `dims`.
///
/// The Hermitian tag is computed once at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Operator {
    matrix: DMatrix<Complex64>,
    dims: Vec<usize>,
    hermitian: bool,
}

impl Operator {
    /// Create an operator, checking that `matrix` is square and that the
    /// factor dimensions multiply to its size.
    pub fn new(matrix: DMatrix<Complex64>, dims: Vec<usize>) -> OpsResult<Self> {
        if !matrix.is_square() {
            return Err(OpsError::Dimension {
                expected: matrix.nrows(),
                got: matrix.ncols(),
            });
        }
        if dims.is_empty() || dims.contains(&0) {
            return Err(OpsError::InvalidOperator(format!(
                "factor dimensions {dims:?} do not describe a Hilbert space"
            )));
        }
        let product: usize = dims.iter().product();
        if product != matrix.nrows() {
            return Err(OpsError::Dimension {
                expected: product,
                got: matrix.nrows(),
            });
        }
        let hermitian = is_hermitian_matrix(&matrix);
        Ok(Self {
            matrix,
            dims,
            hermitian,
        })
    }

    /// Create an operator on qubits from a 2^n × 2^n matrix.
    pub fn from_qubit_matrix(matrix: DMatrix<Complex64>) -> OpsResult<Self> {
        let size = matrix.nrows();
        if size < 2 || !size.is_power_of_two() {
            return Err(OpsError::InvalidOperator(format!(
                "matrix of size {size} is not an operator on qubits"
            )));
        }
        let n = size.trailing_zeros() as usize;
        Self::new(matrix, vec![2; n])
    }

    /// Identity on `num_qubits` qubits.
    pub fn identity(num_qubits: usize) -> Self {
        let dim = 1usize << num_qubits;
        Self {
            matrix: DMatrix::identity(dim, dim),
            dims: vec![2; num_qubits],
            hermitian: true,
        }
    }

    /// Zero operator on `num_qubits` qubits.
    pub fn zeros(num_qubits: usize) -> Self {
        let dim = 1usize << num_qubits;
        Self {
            matrix: DMatrix::zeros(dim, dim),
            dims: vec![2; num_qubits],
            hermitian: true,
        }
    }

    /// Single-qubit Pauli operator.
    pub fn pauli(op: PauliOp) -> Self {
        Self {
            matrix: op.matrix().clone(),
            dims: vec![2],
            hermitian: true,
        }
    }

    /// Tensor product `self ⊗ other`; `self` supplies the leading factors.
    pub fn tensor(&self, other: &Operator) -> Self {
        let matrix = self.matrix.kronecker(&other.matrix);
        let hermitian = is_hermitian_matrix(&matrix);
        let mut dims = self.dims.clone();
        dims.extend_from_slice(&other.dims);
        Self {
            matrix,
            dims,
            hermitian,
        }
    }

    /// Matrix product `self · other`.
    pub fn matmul(&self, other: &Operator) -> OpsResult<Self> {
        self.check_same_space(other)?;
        Self::new(&self.matrix * &other.matrix, self.dims.clone())
    }

    /// Sum `self + other`.
    pub fn add(&self, other: &Operator) -> OpsResult<Self> {
        self.check_same_space(other)?;
        Self::new(&self.matrix + &other.matrix, self.dims.clone())
    }

    /// Multiply every entry by a real factor.
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            matrix: self.matrix.map(|z| z * factor),
            dims: self.dims.clone(),
            hermitian: self.hermitian,
        }
    }

    /// Conjugate transpose.
    pub fn adjoint(&self) -> Self {
        Self {
            matrix: self.matrix.adjoint(),
            dims: self.dims.clone(),
            hermitian: self.hermitian,
        }
    }

    /// Trace.
    pub fn trace(&self) -> Complex64 {
        self.matrix.trace()
    }

    /// Whether the operator equals its adjoint within [`HERMITIAN_TOLERANCE`].
    pub fn is_hermitian(&self) -> bool {
        self.hermitian
    }

    /// Factor dimensions.
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    /// Total dimension of the space.
    pub fn dim(&self) -> usize {
        self.matrix.nrows()
    }

    /// Number of qubits, if every factor is two-dimensional.
    pub fn num_qubits(&self) -> Option<usize> {
        self.dims.iter().all(|&d| d == 2).then_some(self.dims.len())
    }

    /// Underlying matrix.
    pub fn matrix(&self) -> &DMatrix<Complex64> {
        &self.matrix
    }

    /// Entry at (`row`, `col`).
    pub fn entry(&self, row: usize, col: usize) -> Complex64 {
        self.matrix[(row, col)]
    }

    /// Largest entrywise distance to `other`.
    pub fn max_abs_diff(&self, other: &Operator) -> OpsResult<f64> {
        self.check_same_space(other)?;
        Ok(self
            .matrix
            .iter()
            .zip(other.matrix.iter())
            .map(|(a, b)| (a - b).norm())
            .fold(0.0, f64::max))
    }

    /// Entrywise equality within `tol`; operators on different spaces are
    /// never equal.
    pub fn approx_eq(&self, other: &Operator, tol: f64) -> bool {
        self.max_abs_diff(other).is_ok_and(|d| d <= tol)
    }

    /// Eigenvalues and normalised eigenvectors of a Hermitian operator, in
    /// ascending eigenvalue order.
    ///
    /// # Errors
    ///
    /// - [`OpsError::InvalidOperator`] if the operator is not Hermitian.
    /// - [`OpsError::Numerical`] if the solver does not converge or a
    ///   returned pair misses `‖Av − λv‖ ≤ EIGEN_RESIDUAL_TOLERANCE · max(1, |λ|max)`.
    pub fn eigenstates(&self) -> OpsResult<Vec<(f64, DVector<Complex64>)>> {
        if !self.hermitian {
            return Err(OpsError::InvalidOperator(
                "eigen-decomposition requires a Hermitian operator".into(),
            ));
        }
        // The default stopping rule leaves degenerate spectra (Pauli
        // products from 4 qubits up) with vectors that are not eigenvectors.
        let eigen = self
            .matrix
            .clone()
            .try_symmetric_eigen(EIGEN_EPSILON, EIGEN_MAX_ITERATIONS)
            .ok_or_else(|| {
                OpsError::Numerical(format!(
                    "eigen-decomposition of a {0}x{0} operator did not converge",
                    self.dim()
                ))
            })?;
        let mut states: Vec<(f64, DVector<Complex64>)> = eigen
            .eigenvalues
            .iter()
            .enumerate()
            .map(|(i, &value)| (value, eigen.eigenvectors.column(i).into_owned()))
            .collect();
        states.sort_by(|a, b| a.0.total_cmp(&b.0));

        let scale = states.iter().map(|(v, _)| v.abs()).fold(1.0, f64::max);
        let residual = states
            .iter()
            .map(|(value, vector)| {
                (&self.matrix * vector)
                    .iter()
                    .zip(vector.iter())
                    .map(|(av, v)| (*av - *v * *value).norm())
                    .fold(0.0, f64::max)
            })
            .fold(0.0, f64::max);
        if residual > EIGEN_RESIDUAL_TOLERANCE * scale {
            return Err(OpsError::Numerical(format!(
                "eigenvector residual {residual:e} exceeds tolerance"
            )));
        }
        Ok(states)
    }

    /// Expectation value ⟨ψ|A|ψ⟩ (real part) for a normalised state vector.
    pub fn expectation(&self, state: &[Complex64]) -> OpsResult<f64> {
        if state.len() != self.dim() {
            return Err(OpsError::Dimension {
                expected: self.dim(),
                got: state.len(),
            });
        }
        let psi = DVector::from_column_slice(state);
        let value = psi.dotc(&(&self.matrix * &psi));
        Ok(value.re)
    }

    fn check_same_space(&self, other: &Operator) -> OpsResult<()> {
        if self.dims != other.dims {
            return Err(OpsError::Dimension {
                expected: self.dim(),
                got: other.dim(),
            });
        }
        Ok(())
    }
}

fn is_hermitian_matrix(matrix: &DMatrix<Complex64>) -> bool {
    let n = matrix.nrows();
    let scale = matrix.iter().map(|z| z.norm()).fold(1.0, f64::max);
    let tol = HERMITIAN_TOLERANCE * scale;
    (0..n).all(|r| (r..n).all(|c| (matrix[(r, c)] - matrix[(c, r)].conj()).norm() <= tol))
}
