//! # QEcho Runtime
//!
//! Samplers, qubit placement and batch execution.
//!
//! ## Gantree Architecture
//!
//! ```text
//! qecho_runtime // L3: Runtime (완료)
//!     Sampler // 샘플러 trait + 모의 샘플러 (완료)
//!     Placer // 큐빗 배치 전략 (완료)
//!     RuntimeConfig // 팩토리 기반 설정 (완료)
//!     QuantumRuntime // 배치 실행 (완료)
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use qecho_core::CircuitBuilder;
//! use qecho_exec::{Info, Measurement, ProgramGroup, QuantumExecutable};
//! use qecho_runtime::prelude::*;
//!
//! let leaf = QuantumExecutable::builder()
//!     .circuit(CircuitBuilder::new(2).cz(0, 1).measure_all("z").build().unwrap())
//!     .measurement(Measurement::bitstrings(100))
//!     .build()
//!     .unwrap();
//! let program = ProgramGroup::new(Info::new(), [leaf]);
//!
//! let sampler = MockSampler::with_readout_error(0.01).unwrap().with_seed(42);
//! let mut runtime = QuantumRuntime::new(RuntimeConfig::mock(), sampler).unwrap();
//! let results = runtime.execute(&program).unwrap();
//! assert_eq!(results[0].repetitions, 100);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// ============================================================================
// Module Declarations
// ============================================================================

/// Samplers (Gantree: L3_Runtime → Sampler)
pub mod sampler;

/// Qubit placement (Gantree: L3_Runtime → Placer)
pub mod placer;

/// Runtime configuration (Gantree: L3_Runtime → RuntimeConfig)
pub mod config;

/// Batch execution (Gantree: L3_Runtime → QuantumRuntime)
pub mod runtime;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::RuntimeConfig;
pub use placer::{DevicePlacement, NaivePlacer, PlacerConfig, QubitPlacer, RandomPlacer};
pub use runtime::{ExecutableResult, QuantumRuntime};
pub use sampler::{MockSampler, SampleResult, Sampler};

// ============================================================================
// Prelude
// ============================================================================

pub mod prelude {
    //! Convenient imports
    //!
    //! ```rust
    //! use qecho_runtime::prelude::*;
    //! ```

    pub use crate::config::RuntimeConfig;
    pub use crate::placer::{NaivePlacer, PlacerConfig, QubitPlacer, RandomPlacer};
    pub use crate::runtime::{ExecutableResult, QuantumRuntime};
    pub use crate::sampler::{MockSampler, SampleResult, Sampler};
}

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Integration Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use qecho_core::{CircuitBuilder, DiagonalRectangleTopology};
    use qecho_exec::{from_json, to_json, Info, Measurement, ProgramGroup, QuantumExecutable};

    #[test]
    fn test_execute_deserialized_batch() {
        let topo = DiagonalRectangleTopology::new(1, 2);
        let leaf = QuantumExecutable::builder()
            .circuit(
                CircuitBuilder::new(topo.n_qubits())
                    .measure_all("z")
                    .build()
                    .unwrap(),
            )
            .measurement(Measurement::bitstrings(25))
            .problem_topology(topo.clone())
            .info_entry("instance_i", 0)
            .build()
            .unwrap();
        let original = ProgramGroup::new(Info::from_pairs([("topology", topo)]).unwrap(), [leaf]);
        let restored: ProgramGroup = from_json(&to_json(&original).unwrap()).unwrap();

        let config = RuntimeConfig::processor("grid").with_device(6, 6).with_seed(3);
        let mut runtime = QuantumRuntime::new(config, MockSampler::ideal()).unwrap();
        let results = runtime.execute(&restored).unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].uuid, original.executables()[0].uuid());
        assert_eq!(results[0].info.keys().count(), 2);
        assert_eq!(results[0].records_for("z").unwrap().len(), 25);
    }

    #[test]
    fn test_result_json() {
        let leaf = QuantumExecutable::builder()
            .circuit(CircuitBuilder::new(1).measure_all("z").build().unwrap())
            .measurement(Measurement::bitstrings(3))
            .build()
            .unwrap();
        let mut runtime =
            QuantumRuntime::new(RuntimeConfig::mock(), MockSampler::ideal()).unwrap();
        let results = runtime
            .execute(&ProgramGroup::new(Info::new(), [leaf]))
            .unwrap();

        let json = serde_json::to_string(&results).unwrap();
        let back: Vec<ExecutableResult> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, results);
    }
}
