//! Estimator configuration.

use serde::{Deserialize, Serialize};

use crate::error::{VqeError, VqeResult};

/// Default shots per term.
pub const DEFAULT_SHOTS: u32 = 100;

/// Default shots per parallel batch.
pub const DEFAULT_SHOT_BATCH_SIZE: u32 = 256;

/// Configuration of an [`EnergyEstimator`](crate::EnergyEstimator).
///
/// Missing JSON fields take their default:
///
/// ```rust
/// use pauliq_vqe::EstimatorConfig;
///
/// let config = EstimatorConfig::from_json(r#"{ "shots": 4096, "seed": 7 }"#)?;
/// assert_eq!(config.shots, 4096);
/// assert_eq!(config.seed, Some(7));
/// assert!(!config.analytical);
/// # Ok::<(), pauliq_vqe::VqeError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EstimatorConfig {
    /// Shots per non-identity term in sampling mode.
    pub shots: u32,
    /// Use exact outcome probabilities instead of sampling.
    pub analytical: bool,
    /// Seed for sampling; drawn once per estimation when absent.
    pub seed: Option<u64>,
    /// Shots per unit of parallel work and per cancellation check.
    pub shot_batch_size: u32,
    /// Size of a dedicated worker pool; the global pool when absent.
    pub num_threads: Option<usize>,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            shots: DEFAULT_SHOTS,
            analytical: false,
            seed: None,
            shot_batch_size: DEFAULT_SHOT_BATCH_SIZE,
            num_threads: None,
        }
    }
}

impl EstimatorConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON configuration and validate it.
    pub fn from_json(json: &str) -> VqeResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Set the number of shots.
    #[must_use]
    pub fn with_shots(mut self, shots: u32) -> Self {
        self.shots = shots;
        self
    }

    /// Select analytic or sampling mode.
    #[must_use]
    pub fn with_analytical(mut self, analytical: bool) -> Self {
        self.analytical = analytical;
        self
    }

    /// Fix the sampling seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the shots per parallel batch.
    #[must_use]
    pub fn with_shot_batch_size(mut self, shot_batch_size: u32) -> Self {
        self.shot_batch_size = shot_batch_size;
        self
    }

    /// Run on a dedicated pool of `num_threads` workers.
    #[must_use]
    pub fn with_num_threads(mut self, num_threads: usize) -> Self {
        self.num_threads = Some(num_threads);
        self
    }

    /// Check the configuration.
    ///
    /// # Errors
    ///
    /// [`VqeError::InvalidArgument`] for zero shots in sampling mode, a
    /// zero batch size, or a zero-sized worker pool.
    pub fn validate(&self) -> VqeResult<()> {
        if !self.analytical && self.shots == 0 {
            return Err(VqeError::InvalidArgument(
                "shots must be positive in sampling mode".into(),
            ));
        }
        if self.shot_batch_size == 0 {
            return Err(VqeError::InvalidArgument(
                "shot_batch_size must be positive".into(),
            ));
        }
        if self.num_threads == Some(0) {
            return Err(VqeError::InvalidArgument(
                "num_threads must be positive".into(),
            ));
        }
        Ok(())
    }
}
