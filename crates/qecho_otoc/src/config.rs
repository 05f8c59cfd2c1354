//! Loschmidt echo sweep configuration
//!
//! Gantree: L4_Otoc → LoschmidtConfig

use crate::estimate::SamplingRates;
use qecho_core::loschmidt::{
    DEFAULT_INSTANCES, DEFAULT_MACROCYCLE_DEPTHS, DEFAULT_MAX_SIDE, DEFAULT_MIN_SIDE,
    DEFAULT_REPETITIONS, DEFAULT_SEED,
};
use qecho_core::{Probability, QechoError, QechoResult, TwoQubitGate};
use qecho_runtime::RuntimeConfig;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Root group name of generated batches
pub const BATCH_NAME: &str = "qecho.otoc.loschmidt";

/// Sweep configuration
/// Gantree: LoschmidtConfig // 에코 실험 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoschmidtConfig {
    // ========================================================================
    // Batch Parameters
    // ========================================================================
    /// Root group name
    pub name: String,

    /// Random circuit instances per (topology, depth)
    pub n_instances: usize,

    /// Repetitions per executable
    pub n_repetitions: u64,

    /// Smallest rectangle side
    pub min_side: usize,

    /// Largest rectangle side
    pub max_side: usize,

    /// Macrocycle depths swept
    pub macrocycle_depths: Vec<usize>,

    /// Circuit generation seed
    pub seed: u64,

    /// Coupler between interacting pairs
    pub two_qubit_gate: TwoQubitGate,

    // ========================================================================
    // Output Parameters
    // ========================================================================
    /// Where the gzip-compressed batch is written
    pub output: PathBuf,

    /// Wall-clock model for estimates
    pub sampling: SamplingRates,

    // ========================================================================
    // Mock Run Parameters
    // ========================================================================
    /// Runtime for an optional mock run of the batch
    pub runtime: Option<RuntimeConfig>,

    /// Readout flip probability of the mock sampler
    pub readout_error: f64,
}

impl LoschmidtConfig {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Full sweep: sides 1..=4
    pub fn full() -> Self {
        Self {
            name: BATCH_NAME.to_string(),
            n_instances: DEFAULT_INSTANCES,
            n_repetitions: DEFAULT_REPETITIONS,
            min_side: DEFAULT_MIN_SIDE,
            max_side: DEFAULT_MAX_SIDE,
            macrocycle_depths: DEFAULT_MACROCYCLE_DEPTHS.to_vec(),
            seed: DEFAULT_SEED,
            two_qubit_gate: TwoQubitGate::default(),
            output: PathBuf::from("loschmidt-v1.json.gz"),
            sampling: SamplingRates::default(),
            runtime: None,
            readout_error: 0.0,
        }
    }

    /// Small sweep: sides 1..=3
    pub fn small() -> Self {
        Self {
            max_side: 3,
            output: PathBuf::from("loschmidt-small-v1.json.gz"),
            ..Self::full()
        }
    }

    // ========================================================================
    // Builder Methods
    // ========================================================================

    /// Set instances per (topology, depth)
    pub fn with_instances(mut self, n: usize) -> Self {
        self.n_instances = n;
        self
    }

    /// Set repetitions
    pub fn with_repetitions(mut self, n: u64) -> Self {
        self.n_repetitions = n;
        self
    }

    /// Set side range
    pub fn with_sides(mut self, min_side: usize, max_side: usize) -> Self {
        self.min_side = min_side;
        self.max_side = max_side;
        self
    }

    /// Set macrocycle depths
    pub fn with_macrocycle_depths(mut self, depths: Vec<usize>) -> Self {
        self.macrocycle_depths = depths;
        self
    }

    /// Set seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set coupler
    pub fn with_two_qubit_gate(mut self, gate: TwoQubitGate) -> Self {
        self.two_qubit_gate = gate;
        self
    }

    /// Set output path
    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = output.into();
        self
    }

    /// Set sampling rates
    pub fn with_sampling(mut self, sampling: SamplingRates) -> Self {
        self.sampling = sampling;
        self
    }

    /// Enable a mock run with `runtime` and readout flip probability `p`
    pub fn with_mock_run(mut self, runtime: RuntimeConfig, readout_error: f64) -> Self {
        self.runtime = Some(runtime);
        self.readout_error = readout_error;
        self
    }

    // ========================================================================
    // Validation
    // ========================================================================

    /// Validate configuration
    pub fn validate(&self) -> QechoResult<()> {
        if self.name.is_empty() {
            return Err(QechoError::ConfigError("name must not be empty".to_string()));
        }

        if self.n_instances == 0 {
            return Err(QechoError::ConfigError("n_instances must be > 0".to_string()));
        }

        if self.n_repetitions == 0 {
            return Err(QechoError::ConfigError(
                "n_repetitions must be > 0".to_string(),
            ));
        }

        if self.min_side == 0 || self.min_side > self.max_side {
            return Err(QechoError::ConfigError(format!(
                "side range must satisfy 1 <= min_side <= max_side, got {}..={}",
                self.min_side, self.max_side
            )));
        }

        if self.macrocycle_depths.is_empty() {
            return Err(QechoError::ConfigError(
                "macrocycle_depths must not be empty".to_string(),
            ));
        }

        let mut depths = self.macrocycle_depths.clone();
        depths.sort_unstable();
        depths.dedup();
        if depths.len() != self.macrocycle_depths.len() {
            return Err(QechoError::ConfigError(
                "macrocycle_depths must be distinct".to_string(),
            ));
        }

        if let TwoQubitGate::FSim { theta, phi } = self.two_qubit_gate {
            if !(theta.is_finite() && phi.is_finite()) {
                return Err(QechoError::ConfigError(
                    "two_qubit_gate angles must be finite".to_string(),
                ));
            }
        }

        self.sampling.validate()?;
        Probability::new(self.readout_error)?;

        if let Some(runtime) = &self.runtime {
            runtime.validate()?;
        }

        Ok(())
    }

    /// Number of rectangles in the sweep
    pub fn n_topologies(&self) -> usize {
        let sides = (self.max_side + 1).saturating_sub(self.min_side);
        sides * (sides + 1) / 2
    }

    /// Number of executables the sweep produces
    pub fn n_executables(&self) -> usize {
        self.n_topologies() * self.macrocycle_depths.len() * self.n_instances
    }
}

impl Default for LoschmidtConfig {
    fn default() -> Self {
        Self::full()
    }
}

impl fmt::Display for LoschmidtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "LoschmidtConfig(sides={}..={}, depths={:?}, instances={}, reps={}, seed={})",
            self.min_side,
            self.max_side,
            self.macrocycle_depths,
            self.n_instances,
            self.n_repetitions,
            self.seed
        )
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LoschmidtConfig::default();
        assert_eq!(config.name, BATCH_NAME);
        assert_eq!(config.seed, 52);
        assert_eq!(config.macrocycle_depths, vec![1, 3, 5, 7, 9]);
        assert_eq!(config.n_topologies(), 10);
        assert_eq!(config.n_executables(), 500);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_small() {
        let config = LoschmidtConfig::small();
        assert_eq!(config.n_topologies(), 6);
        assert_eq!(config.output, PathBuf::from("loschmidt-small-v1.json.gz"));
    }

    #[test]
    fn test_validation() {
        let base = LoschmidtConfig::small();
        assert!(base.clone().with_instances(0).validate().is_err());
        assert!(base.clone().with_repetitions(0).validate().is_err());
        assert!(base.clone().with_sides(3, 2).validate().is_err());
        assert!(base.clone().with_sides(0, 2).validate().is_err());
        assert!(base.clone().with_macrocycle_depths(vec![]).validate().is_err());
        assert!(base.clone().with_macrocycle_depths(vec![1, 1]).validate().is_err());
        assert!(base
            .clone()
            .with_mock_run(RuntimeConfig::mock(), 1.5)
            .validate()
            .is_err());
        assert!(base
            .with_sampling(SamplingRates::new(0.0, 0.5))
            .validate()
            .is_err());
    }

    #[test]
    fn test_partial_json() {
        let config: LoschmidtConfig = serde_json::from_str(
            r#"{
                "max_side": 2,
                "n_instances": 3,
                "two_qubit_gate": {"kind": "cz"},
                "runtime": {"name": "mock"}
            }"#,
        )
        .unwrap();

        assert_eq!(config.max_side, 2);
        assert_eq!(config.n_instances, 3);
        assert_eq!(config.two_qubit_gate, TwoQubitGate::Cz);
        assert_eq!(config.n_repetitions, DEFAULT_REPETITIONS);
        assert!(config.runtime.is_some());
        assert!(config.validate().is_ok());
    }
}
