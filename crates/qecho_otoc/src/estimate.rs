//! Wall-clock estimates
//!
//! Gantree: L4_Otoc → Estimate

use qecho_core::sampling::{OVERHEAD_S, SAMPLING_HZ};
use qecho_core::{QechoError, QechoResult};
use qecho_exec::{Measurement, ProgramGroup, QuantumExecutable};
use serde::{Deserialize, Serialize};

/// Sampling-rate model
/// Gantree: SamplingRates // 샘플링 속도 모델
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingRates {
    /// Repetitions per second
    pub sampling_hz: f64,
    /// Fixed cost per executable (seconds)
    pub overhead_s: f64,
}

impl SamplingRates {
    /// Create a rate model
    pub fn new(sampling_hz: f64, overhead_s: f64) -> Self {
        Self {
            sampling_hz,
            overhead_s,
        }
    }

    /// Validate rates
    pub fn validate(&self) -> QechoResult<()> {
        if !(self.sampling_hz.is_finite() && self.sampling_hz > 0.0) {
            return Err(QechoError::ConfigError(format!(
                "sampling_hz must be > 0, got {}",
                self.sampling_hz
            )));
        }
        if !(self.overhead_s.is_finite() && self.overhead_s >= 0.0) {
            return Err(QechoError::ConfigError(format!(
                "overhead_s must be >= 0, got {}",
                self.overhead_s
            )));
        }
        Ok(())
    }
}

impl Default for SamplingRates {
    fn default() -> Self {
        Self::new(SAMPLING_HZ, OVERHEAD_S)
    }
}

/// Seconds needed to run one executable: `reps / hz + overhead`
/// Gantree: estimate_runtime_seconds(executable, rates) -> Result<f64>
pub fn estimate_runtime_seconds(
    executable: &QuantumExecutable,
    rates: &SamplingRates,
) -> QechoResult<f64> {
    match executable.measurement() {
        Measurement::Bitstrings { n_repetitions, .. } => {
            Ok(*n_repetitions as f64 / rates.sampling_hz + rates.overhead_s)
        }
        other => Err(QechoError::UnsupportedMeasurement(other.kind().to_string())),
    }
}

/// Sum of estimates over every executable in a tree
/// Gantree: estimate_group_runtime_seconds(group, rates) -> Result<f64>
pub fn estimate_group_runtime_seconds(
    program: &ProgramGroup,
    rates: &SamplingRates,
) -> QechoResult<f64> {
    program.flatten().try_fold(0.0, |total, entry| -> QechoResult<f64> {
        Ok(total + estimate_runtime_seconds(entry?.executable, rates)?)
    })
}
