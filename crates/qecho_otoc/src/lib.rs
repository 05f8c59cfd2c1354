//! # QEcho OTOC
//!
//! Loschmidt echo experiments on diagonal-rectangle topologies: batch
//! generation, runtime estimates and result summaries.
//!
//! ## Gantree Architecture
//!
//! ```text
//! qecho_otoc // L4: Experiment driver (완료)
//!     EchoCircuit // U + U† + 측정 (완료)
//!     LoschmidtConfig // 스윕 설정 (완료)
//!     Batch // 프로그램 트리 생성 (완료)
//!     Estimate // 실행 시간 추정 (완료)
//!     Analysis // 생존 확률 / 감쇠 피팅 (완료)
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use qecho_otoc::prelude::*;
//!
//! let config = LoschmidtConfig::small()
//!     .with_sides(1, 1)
//!     .with_macrocycle_depths(vec![1])
//!     .with_instances(2);
//!
//! let program = all_diagonal_rect_executables(&config).unwrap();
//! let seconds = estimate_group_runtime_seconds(&program, &config.sampling).unwrap();
//! assert_eq!(program.num_executables(), 2);
//! assert!((seconds - 1.4).abs() < 1e-12);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// ============================================================================
// Module Declarations
// ============================================================================

/// Echo circuits (Gantree: L4_Otoc → EchoCircuit)
pub mod echo;

/// Sweep configuration (Gantree: L4_Otoc → LoschmidtConfig)
pub mod config;

/// Batch generation (Gantree: L4_Otoc → Batch)
pub mod batch;

/// Runtime estimates (Gantree: L4_Otoc → Estimate)
pub mod estimate;

/// Result analysis (Gantree: L4_Otoc → Analysis)
pub mod analysis;

// ============================================================================
// Re-exports
// ============================================================================

pub use analysis::{
    fit_decay, fit_summaries, ground_state_probability, summarize, DecayFit, EchoSummary,
};
pub use batch::{all_diagonal_rect_executables, all_diagonal_rect_topologies};
pub use config::{LoschmidtConfig, BATCH_NAME};
pub use echo::loschmidt_echo_circuit;
pub use estimate::{estimate_group_runtime_seconds, estimate_runtime_seconds, SamplingRates};

// ============================================================================
// Prelude
// ============================================================================

pub mod prelude {
    //! Convenient imports
    //!
    //! ```rust
    //! use qecho_otoc::prelude::*;
    //! ```

    pub use crate::analysis::{fit_decay, ground_state_probability, summarize, EchoSummary};
    pub use crate::batch::all_diagonal_rect_executables;
    pub use crate::config::LoschmidtConfig;
    pub use crate::echo::loschmidt_echo_circuit;
    pub use crate::estimate::{
        estimate_group_runtime_seconds, estimate_runtime_seconds, SamplingRates,
    };
}

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Integration Tests
// ============================================================================
