//! # QEcho Core
//!
//! Foundation types, circuits, topologies and placement search for
//! Loschmidt echo experiments.
//!
//! ## Gantree Architecture
//!
//! ```text
//! qecho_core // L0+L1: Foundation + Circuit (완료)
//!     L0_Foundation // 기반 타입/상수/에러 (완료)
//!         CoreTypes // 핵심 타입 (완료)
//!         Constants // 샘플링/에코 상수 (완료)
//!         Errors // 에러 타입 (완료)
//!     L1_Circuit // 회로 구조 (완료)
//!         Gate // 게이트 enum (완료)
//!         Circuit // 회로 + 동결 회로 (완료)
//!         CircuitBuilder // 빌더 패턴 (완료)
//!         RandomCircuit // 무작위 회전 회로 (완료)
//!         Topology // 문제 토폴로지 (완료)
//!         Placement // 부분 그래프 배치 (완료)
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use qecho_core::prelude::*;
//!
//! let circuit = CircuitBuilder::new(3)
//!     .phased_xz(0, 0.5, 0.25, 0.0)
//!     .fsim(0, 1, std::f64::consts::FRAC_PI_4, 0.0)
//!     .measure_all("z")
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(circuit.count_2q(), 1);
//! println!("{}", circuit);
//! ```
//!
//! ## Topologies and Placement
//!
//! ```rust
//! use qecho_core::prelude::*;
//!
//! let rect = DiagonalRectangleTopology::new(2, 3);
//! assert_eq!(rect.n_qubits(), 2 * 2 * 3 + 2 + 3 + 1);
//!
//! let line = LineTopology::new(4).unwrap();
//! let placements = find_placements(line.graph(), line.graph()).unwrap();
//! assert_eq!(placements[0].nodes().len(), 4);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// ============================================================================
// Module Declarations
// ============================================================================

/// Core types (Gantree: L0_Foundation → CoreTypes)
pub mod types;

/// Constants (Gantree: L0_Foundation → Constants)
pub mod constants;

/// Error types (Gantree: L0_Foundation → Errors)
pub mod error;

/// Quantum gates (Gantree: L1_Circuit → Gate)
pub mod gate;

/// Circuit structure (Gantree: L1_Circuit → Circuit)
pub mod circuit;

/// Circuit builder (Gantree: L1_Circuit → CircuitBuilder)
pub mod builder;

/// Random rotation circuits (Gantree: L1_Circuit → RandomCircuit)
pub mod random_circuit;

/// Problem topologies (Gantree: L1_Circuit → Topology)
pub mod topology;

/// Placement search (Gantree: L1_Circuit → Placement)
pub mod placement;

// ============================================================================
// Re-exports
// ============================================================================

pub use builder::CircuitBuilder;
pub use circuit::{Circuit, FrozenCircuit};
pub use constants::{loschmidt, sampling};
pub use error::{QechoError, QechoResult};
pub use gate::{Gate, TwoQubitGate};
pub use placement::{find_placements, Placement};
pub use random_circuit::{random_rotations_circuit, InteractionLayer, GRID_STAGGERED_PATTERN};
pub use topology::{
    all_diagonal_rectangles, device_grid, DiagonalRectangleTopology, LineTopology,
    ProblemTopology, TopologyGraph,
};
pub use types::{Angle, Basis, Bitstring, Exponent, GridQubit, Probability, QubitId};

// ============================================================================
// Prelude
// ============================================================================

pub mod prelude {
    //! Convenient imports for common use cases
    //!
    //! ```rust
    //! use qecho_core::prelude::*;
    //! ```

    pub use crate::builder::CircuitBuilder;
    pub use crate::circuit::{Circuit, FrozenCircuit};
    pub use crate::constants::{loschmidt, sampling};
    pub use crate::error::{QechoError, QechoResult};
    pub use crate::gate::{Gate, TwoQubitGate};
    pub use crate::placement::{find_placements, Placement};
    pub use crate::random_circuit::random_rotations_circuit;
    pub use crate::topology::{
        all_diagonal_rectangles, device_grid, DiagonalRectangleTopology, LineTopology,
        ProblemTopology, TopologyGraph,
    };
    pub use crate::types::{Angle, Basis, Bitstring, Exponent, GridQubit, Probability, QubitId};
}

// ============================================================================
// Version Information
// ============================================================================

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");

// ============================================================================
// Integration Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::BTreeSet;

    #[test]
    fn test_rectangle_circuit_respects_topology() {
        let rect = DiagonalRectangleTopology::new(2, 2);
        let topo = ProblemTopology::from(rect.clone());
        let mut rng = ChaCha8Rng::seed_from_u64(loschmidt::DEFAULT_SEED);

        let circuit = random_rotations_circuit(
            &rect.qubits(),
            loschmidt::CYCLES_PER_MACROCYCLE,
            TwoQubitGate::default(),
            &mut rng,
        )
        .unwrap();

        assert!(topo.validate_circuit(&circuit).is_ok());
        assert!(circuit.count_2q() > 0);
    }

    #[test]
    fn test_echo_circuit_inverse_cancels_structure() {
        let qubits = DiagonalRectangleTopology::new(1, 1).qubits();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let forward =
            random_rotations_circuit(&qubits, 4, TwoQubitGate::default(), &mut rng).unwrap();
        let reverse = forward.inverse().unwrap();

        let echo = CircuitBuilder::new(qubits.len())
            .extend(&forward)
            .extend(&reverse)
            .measure_all(loschmidt::MEASUREMENT_KEY)
            .build_frozen()
            .unwrap();

        assert_eq!(echo.circuit().count_2q(), 2 * forward.count_2q());
        assert_eq!(echo.circuit().count_measurements(), 1);
        assert!(echo.unfreeze().inverse().is_err());
    }

    #[test]
    fn test_rectangle_placements_on_device() {
        let device = device_grid(5, 5);
        let topo = ProblemTopology::from(DiagonalRectangleTopology::new(1, 2));
        let placements = topo.placements_in(&device).unwrap();

        assert!(!placements.is_empty());
        let sets: BTreeSet<BTreeSet<GridQubit>> = placements
            .iter()
            .map(|qs| qs.iter().copied().collect())
            .collect();
        assert_eq!(sets.len(), placements.len());
        for qubits in &placements {
            assert_eq!(qubits.len(), topo.n_qubits());
        }
    }

    #[test]
    fn test_probability_validation() {
        assert!(Probability::new(0.0).is_ok());
        assert!(Probability::new(1.0).is_ok());
        assert!(Probability::new(-0.1).is_err());
        assert!(Probability::new(1.1).is_err());
    }

    #[test]
    fn test_sampling_constants() {
        approx::assert_relative_eq!(
            loschmidt::DEFAULT_REPETITIONS as f64 / sampling::SAMPLING_HZ + sampling::OVERHEAD_S,
            0.7
        );
    }
}
