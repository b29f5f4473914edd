//! Energy estimation.
//!
//! For `H = Σ a_P · P` and a trial state `|ψ⟩ = A|ψ₀⟩`,
//!
//!   ⟨ψ|H|ψ⟩ = Σ_P  a_P · ⟨ψ|P|ψ⟩
//!
//! Each non-identity term is measured with the circuit
//! `A ; barrier ; W_P ; measure q0 → c0`, where W_P maps the +1 eigenspace
//! of P onto qubit 0 = |0⟩. Then `⟨ψ|P|ψ⟩ = p0 − p1`. The identity term
//! contributes its coefficient directly.
//!
//! Terms are evaluated in parallel, and within a term, sampling splits its
//! shots into batches that also run in parallel. Batch `b` of term `t`
//! draws from an RNG seeded with a hash of `(seed, t, b)`, so for a fixed
//! seed the result does not depend on the number of worker threads.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use pauliq_hal::{QuantumState, Simulator};
use pauliq_ir::{Circuit, ClbitId, QubitId};
use pauliq_ops::{Decomposition, MeasurementCircuit, MeasurementCircuits, PauliTerm};

use crate::cancel::CancellationToken;
use crate::config::EstimatorConfig;
use crate::error::{VqeError, VqeResult};

/// How outcome probabilities were obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EstimationMode {
    /// Monte Carlo over repeated runs.
    Sampling,
    /// Exact outcome distribution from the simulator.
    Analytical,
}

/// Measured statistics of one term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermEstimate {
    /// The Pauli term.
    pub term: PauliTerm,
    /// Its coefficient in the decomposition.
    pub coefficient: f64,
    /// Probability that qubit 0 read 0.
    pub p0: f64,
    /// Probability that qubit 0 read 1.
    pub p1: f64,
    /// Estimated `⟨ψ|P|ψ⟩ = p0 − p1`.
    pub expectation: f64,
    /// `coefficient · expectation`.
    pub contribution: f64,
}

/// Result of an energy estimation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyEstimate {
    /// Estimated `⟨ψ|H|ψ⟩`.
    pub energy: f64,
    /// Sampling or analytic.
    pub mode: EstimationMode,
    /// Shots per term; `None` in analytic mode.
    pub shots: Option<u32>,
    /// Seed the sampling RNGs were derived from; `None` in analytic mode.
    pub seed: Option<u64>,
    /// Per-term statistics in term order.
    pub terms: Vec<TermEstimate>,
}

/// A term ready to evaluate.
struct TermJob<'a> {
    index: usize,
    term: &'a PauliTerm,
    coefficient: f64,
    /// `None` for the identity term.
    circuit: Option<Circuit>,
}

/// Estimates `⟨ψ|H|ψ⟩` on a [`Simulator`].
///
/// # Example
///
/// ```rust
/// use pauliq_adapter_sim::{Statevector, StatevectorSimulator};
/// use pauliq_ir::Circuit;
/// use pauliq_ops::{Decomposition, MeasurementCircuitBuilder};
/// use pauliq_vqe::{EnergyEstimator, EstimatorConfig};
///
/// // H = 2·ZI - 0.5·XX on |00⟩
/// let h = Decomposition::from_labels(2, [("ZI", 2.0), ("XX", -0.5)])?;
/// let circuits = MeasurementCircuitBuilder::new().for_decomposition(&h)?;
///
/// let sim = StatevectorSimulator::new();
/// let estimate = EnergyEstimator::new(&sim)
///     .with_config(EstimatorConfig::new().with_analytical(true))
///     .estimate(&h, &circuits, &Statevector::zero(2), &Circuit::with_size("id", 2, 0))?;
///
/// assert!((estimate.energy - 2.0).abs() < 1e-12);
/// # Ok::<(), pauliq_vqe::VqeError>(())
/// ```
pub struct EnergyEstimator<'a, S: Simulator> {
    simulator: &'a S,
    config: EstimatorConfig,
    cancellation: Option<CancellationToken>,
}

impl<'a, S: Simulator> EnergyEstimator<'a, S> {
    /// Create an estimator with the default configuration.
    pub fn new(simulator: &'a S) -> Self {
        Self {
            simulator,
            config: EstimatorConfig::default(),
            cancellation: None,
        }
    }

    /// Replace the configuration.
    #[must_use]
    pub fn with_config(mut self, config: EstimatorConfig) -> Self {
        self.config = config;
        self
    }

    /// Attach a cancellation token.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// The active configuration.
    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    /// Estimate the energy of `decomposition` in the state `ansatz` prepares
    /// from `initial_state`.
    ///
    /// # Errors
    ///
    /// - [`VqeError::InvalidArgument`] for an invalid configuration
    /// - [`VqeError::Dimension`] if the state, the ansatz or a measurement
    ///   circuit does not have the decomposition's qubit count
    /// - [`VqeError::MissingMeasurementCircuit`] if a non-identity term has
    ///   no circuit in `circuits`
    /// - [`VqeError::Cancelled`] if the token fires before completion
    #[instrument(
        skip_all,
        fields(
            analytical = self.config.analytical,
            shots = self.config.shots,
            terms = decomposition.len(),
        )
    )]
    pub fn estimate(
        &self,
        decomposition: &Decomposition,
        circuits: &MeasurementCircuits,
        initial_state: &S::State,
        ansatz: &Circuit,
    ) -> VqeResult<EnergyEstimate> {
        self.config.validate()?;
        let jobs = prepare_jobs(decomposition, circuits, initial_state, ansatz)?;

        let (mode, shots, seed) = if self.config.analytical {
            (EstimationMode::Analytical, None, None)
        } else {
            let seed = self.config.seed.unwrap_or_else(rand::random);
            debug!(seed, "Sampling seed");
            (EstimationMode::Sampling, Some(self.config.shots), Some(seed))
        };

        let evaluate = || {
            jobs.par_iter()
                .map(|job| self.evaluate_term(job, initial_state, seed))
                .collect::<VqeResult<Vec<_>>>()
        };
        let terms = match self.config.num_threads {
            Some(num_threads) => rayon::ThreadPoolBuilder::new()
                .num_threads(num_threads)
                .build()
                .map_err(|e| VqeError::ThreadPool(e.to_string()))?
                .install(evaluate)?,
            None => evaluate()?,
        };

        // Sequential sum in term order keeps the result reproducible.
        let energy: f64 = terms.iter().map(|t| t.contribution).sum();
        info!(energy, ?mode, "Estimated energy");

        Ok(EnergyEstimate {
            energy,
            mode,
            shots,
            seed,
            terms,
        })
    }

    fn check_cancelled(&self) -> VqeResult<()> {
        match &self.cancellation {
            Some(token) => token.check(),
            None => Ok(()),
        }
    }

    fn evaluate_term(
        &self,
        job: &TermJob<'_>,
        state: &S::State,
        seed: Option<u64>,
    ) -> VqeResult<TermEstimate> {
        self.check_cancelled()?;

        let (p0, p1) = match (&job.circuit, seed) {
            (None, _) => (1.0, 0.0),
            (Some(circuit), None) => self
                .simulator
                .run_statistics(circuit, state)?
                .marginal(0),
            (Some(circuit), Some(seed)) => self.sample_term(job.index, circuit, state, seed)?,
        };

        let expectation = p0 - p1;
        let contribution = job.coefficient * expectation;
        debug!(term = %job.term, p0, p1, contribution, "Evaluated term");

        Ok(TermEstimate {
            term: job.term.clone(),
            coefficient: job.coefficient,
            p0,
            p1,
            expectation,
            contribution,
        })
    }

    /// Run `circuit` `shots` times in parallel batches and return the
    /// observed frequencies of qubit 0.
    fn sample_term(
        &self,
        term_index: usize,
        circuit: &Circuit,
        state: &S::State,
        seed: u64,
    ) -> VqeResult<(f64, f64)> {
        let shots = u64::from(self.config.shots);
        let batch_size = u64::from(self.config.shot_batch_size);
        let num_batches = shots.div_ceil(batch_size);

        let ones: u64 = (0..num_batches)
            .into_par_iter()
            .map(|batch| {
                self.check_cancelled()?;
                let size = batch_size.min(shots - batch * batch_size);
                let mut rng = StdRng::seed_from_u64(batch_seed(seed, term_index, batch));
                let mut ones = 0u64;
                for _ in 0..size {
                    let outcome = self.simulator.run(circuit, state, &mut rng)?;
                    if outcome.get(0) == Some(true) {
                        ones += 1;
                    }
                }
                Ok(ones)
            })
            .collect::<VqeResult<Vec<u64>>>()?
            .into_iter()
            .sum();

        let p1 = ones as f64 / shots as f64;
        let p0 = (shots - ones) as f64 / shots as f64;
        Ok((p0, p1))
    }
}

/// Estimate `⟨ψ|H|ψ⟩` with `shots` runs per term, or exactly when
/// `analytical` is set.
///
/// Shorthand for [`EnergyEstimator`] with the default configuration and
/// the given shots and mode.
pub fn estimate_energy<S: Simulator>(
    simulator: &S,
    decomposition: &Decomposition,
    circuits: &MeasurementCircuits,
    initial_state: &S::State,
    ansatz: &Circuit,
    shots: u32,
    analytical: bool,
) -> VqeResult<f64> {
    let config = EstimatorConfig::new()
        .with_shots(shots)
        .with_analytical(analytical);
    EnergyEstimator::new(simulator)
        .with_config(config)
        .estimate(decomposition, circuits, initial_state, ansatz)
        .map(|estimate| estimate.energy)
}

/// Check qubit counts and build the measured circuit of every term.
fn prepare_jobs<'d, T: QuantumState>(
    decomposition: &'d Decomposition,
    circuits: &MeasurementCircuits,
    initial_state: &T,
    ansatz: &Circuit,
) -> VqeResult<Vec<TermJob<'d>>> {
    let n = decomposition.num_qubits();
    if initial_state.num_qubits() as usize != n {
        return Err(VqeError::dimension(
            "initial state",
            n,
            initial_state.num_qubits() as usize,
        ));
    }
    if ansatz.num_qubits() as usize != n {
        return Err(VqeError::dimension("ansatz", n, ansatz.num_qubits() as usize));
    }

    decomposition
        .iter()
        .enumerate()
        .map(|(index, (term, coefficient))| {
            let circuit = if term.is_identity() {
                None
            } else {
                let rotation = match circuits.get(term) {
                    Some(MeasurementCircuit::Rotation(rotation)) => rotation,
                    Some(MeasurementCircuit::NoRotation) => {
                        return Err(VqeError::InvalidArgument(format!(
                            "identity sentinel given for non-identity term '{term}'"
                        )));
                    }
                    None => {
                        return Err(VqeError::MissingMeasurementCircuit {
                            term: term.to_string(),
                        });
                    }
                };
                if rotation.num_qubits() as usize != n {
                    return Err(VqeError::dimension(
                        format!("measurement circuit for '{term}'"),
                        n,
                        rotation.num_qubits() as usize,
                    ));
                }
                Some(measured_circuit(ansatz, rotation)?)
            };
            Ok(TermJob {
                index,
                term,
                coefficient,
                circuit,
            })
        })
        .collect()
}

/// `ansatz ; barrier ; rotation ; measure q0 → c0`.
fn measured_circuit(ansatz: &Circuit, rotation: &Circuit) -> VqeResult<Circuit> {
    let mut circuit = Circuit::with_size(
        format!("{}_{}", ansatz.name(), rotation.name()),
        ansatz.num_qubits(),
        ansatz.num_clbits().max(1),
    );
    circuit
        .compose(ansatz)?
        .barrier_all()?
        .compose(rotation)?
        .measure(QubitId(0), ClbitId(0))?;
    Ok(circuit)
}

/// Seed of one shot batch.
fn batch_seed(seed: u64, term_index: usize, batch: u64) -> u64 {
    splitmix64(splitmix64(seed ^ splitmix64(term_index as u64)) ^ batch)
}

fn splitmix64(x: u64) -> u64 {
    let mut z = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
