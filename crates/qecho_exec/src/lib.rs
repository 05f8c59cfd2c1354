//! # QEcho Exec
//!
//! Immutable executables, program-group trees and batch persistence.
//!
//! ## Gantree Architecture
//!
//! ```text
//! qecho_exec // L2: Executable batch model (완료)
//!     Measurement // 측정 enum (완료)
//!     Info // 메타데이터/파라미터 (완료)
//!     InitialState // 초기 상태 (완료)
//!     QuantumExecutable // 실행 단위 + 빌더 (완료)
//!     ProgramGroup // 프로그램 그룹 (완료)
//!     Flatten // 지연 평탄화 (완료)
//!     Visit // 순회/렌더링 (완료)
//!     IO // JSON / gzip (완료)
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use qecho_core::CircuitBuilder;
//! use qecho_exec::{flatten_all, Info, Measurement, ProgramGroup, QuantumExecutable};
//!
//! let leaf = QuantumExecutable::builder()
//!     .circuit(CircuitBuilder::new(2).cz(0, 1).measure_all("z").build().unwrap())
//!     .measurement(Measurement::bitstrings(1000))
//!     .info_entry("n", 2)
//!     .build()
//!     .unwrap();
//!
//! let root = ProgramGroup::new(Info::from_pairs([("p", 3)]).unwrap(), [leaf]);
//! let entries = flatten_all(&root).unwrap();
//! assert_eq!(entries[0].keys(), vec!["p", "n"]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// ============================================================================
// Module Declarations
// ============================================================================

/// Measurement specifications (Gantree: L2_Executable → Measurement)
pub mod measurement;

/// Metadata and parameters (Gantree: L2_Executable → Info)
pub mod info;

/// Initial product states (Gantree: L2_Executable → InitialState)
pub mod initial_state;

/// Executables and their builder (Gantree: L2_Executable → QuantumExecutable)
pub mod executable;

/// Program groups (Gantree: L2_Executable → ProgramGroup)
pub mod group;

/// Flattening (Gantree: L2_Executable → Flatten)
pub mod flatten;

/// Traversal and rendering (Gantree: L2_Executable → Visit)
pub mod visit;

/// Persistence (Gantree: L2_Executable → IO)
pub mod io;

// ============================================================================
// Re-exports
// ============================================================================

pub use executable::{ExecutableBuilder, QuantumExecutable};
pub use flatten::{flatten, flatten_all, FlatEntry, Flatten};
pub use group::{ProgramGroup, ProgramNode};
pub use info::{Info, InfoValue, Params};
pub use initial_state::{InitialState, KetState};
pub use io::{from_json, from_json_gzip, to_json, to_json_gzip};
pub use measurement::{FrozenCollectionOfPauliSum, Measurement, PauliString, PauliSum};
pub use visit::{render_html, render_tree, visit_depth_first, VisitEvent};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
