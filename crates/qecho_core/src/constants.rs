//! Constants for QEcho
//!
//! Gantree: L0_Foundation → Constants
//!
//! Sampling-rate assumptions and Loschmidt echo experiment defaults.

// ============================================================================
// Sampling Constants
// Gantree: sampling // 샘플링 상수
// ============================================================================

pub mod sampling {
    //! Wall-clock model for sampling on the processor

    /// Bitstring sampling rate (Hz)
    /// Gantree: SAMPLING_HZ: f64 = 5000.0
    pub const SAMPLING_HZ: f64 = 5_000.0;

    /// Fixed per-executable overhead (seconds)
    /// Gantree: OVERHEAD_S: f64 = 0.5
    pub const OVERHEAD_S: f64 = 0.5;
}

// ============================================================================
// Loschmidt Echo Constants
// Gantree: loschmidt // 에코 실험 상수
// ============================================================================

pub mod loschmidt {
    //! Defaults for the diagonal-rectangle Loschmidt echo sweep

    use std::f64::consts::PI;

    /// Batch generation seed
    /// Gantree: DEFAULT_SEED: u64 = 52
    pub const DEFAULT_SEED: u64 = 52;

    /// Random circuit instances per (topology, depth)
    pub const DEFAULT_INSTANCES: usize = 10;

    /// Repetitions per executable
    pub const DEFAULT_REPETITIONS: u64 = 1_000;

    /// Smallest rectangle side
    pub const DEFAULT_MIN_SIDE: usize = 1;

    /// Largest rectangle side
    pub const DEFAULT_MAX_SIDE: usize = 4;

    /// Macrocycle depths swept (1, 3, 5, 7, 9)
    pub const DEFAULT_MACROCYCLE_DEPTHS: [usize; 5] = [1, 3, 5, 7, 9];

    /// Interaction-layer cycles per macrocycle
    /// Gantree: CYCLES_PER_MACROCYCLE: usize = 4
    pub const CYCLES_PER_MACROCYCLE: usize = 4;

    /// Measurement key for the final readout
    pub const MEASUREMENT_KEY: &str = "z";

    /// Default FSim swap angle
    pub const FSIM_THETA: f64 = PI / 4.0;

    /// Default FSim conditional phase
    pub const FSIM_PHI: f64 = 0.0;

    /// Number of z/axis-phase exponents in the single-qubit gate pool
    pub const PHASE_STEPS: usize = 8;

    /// Exponents 0, 1/4, ..., 7/4
    pub fn phase_exponents() -> Vec<f64> {
        (0..PHASE_STEPS).map(|i| i as f64 / 4.0).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_exponents() {
        let exps = loschmidt::phase_exponents();
        assert_eq!(exps.len(), 8);
        assert_eq!(exps[0], 0.0);
        assert_eq!(exps[7], 1.75);
    }

    #[test]
    fn test_sampling_defaults() {
        let estimate = 1000.0 / sampling::SAMPLING_HZ + sampling::OVERHEAD_S;
        approx::assert_relative_eq!(estimate, 0.7);
    }
}
