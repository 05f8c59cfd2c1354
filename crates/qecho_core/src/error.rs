//! Error types for QEcho
//!
//! Gantree: L0_Foundation → Errors
//!
//! Single error enum shared by every QEcho crate.

// Error variant fields are self-documenting via error messages
#![allow(missing_docs)]

use thiserror::Error;

/// Main error type for QEcho
/// Gantree: QechoError // enum
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QechoError {
    // ========================================================================
    // Validation Errors
    // ========================================================================
    /// Probability value out of range [0, 1]
    #[error("Invalid probability {0}: must be in range [0, 1]")]
    InvalidProbability(f64),

    /// Qubit index out of range
    /// Gantree: QubitOutOfRange{{q,max}} // 큐비트 범위
    #[error("Qubit {qubit} out of range: circuit has {num_qubits} qubits")]
    QubitOutOfRange { qubit: usize, num_qubits: usize },

    /// Invalid bitstring format
    #[error("Invalid bitstring '{0}': must contain only '0' and '1'")]
    InvalidBitstring(String),

    /// Invalid basis character
    #[error("Invalid basis '{0}': must be X, Y, or Z")]
    InvalidBasis(String),

    /// Non-finite numeric value where a finite one is required
    #[error("Invalid value for '{name}': {value} is not finite")]
    NonFiniteValue { name: String, value: f64 },

    /// Integer too large for a signed 64-bit value
    #[error("Integer {0} does not fit in i64")]
    IntegerOutOfRange(String),

    // ========================================================================
    // Circuit Errors
    // ========================================================================
    /// Gate parameter or shape is not acceptable
    #[error("Invalid gate: {0}")]
    InvalidGate(String),

    /// Circuit cannot be inverted (e.g. contains measurements)
    /// Gantree: NotInvertible(String) // 역연산 불가
    #[error("Circuit is not invertible: {0}")]
    NotInvertible(String),

    /// Circuit input rejected at freeze time
    #[error("Invalid circuit: {0}")]
    InvalidCircuit(String),

    /// Two measurements write the same record key
    #[error("Measurement key '{0}' is used by more than one measurement")]
    DuplicateMeasurementKey(String),

    // ========================================================================
    // Topology Errors
    // ========================================================================
    /// Topology parameters are not acceptable
    /// Gantree: InvalidTopology(String) // 토폴로지 파라미터
    #[error("Invalid topology: {0}")]
    InvalidTopology(String),

    /// Graph rejected by the placement search
    #[error("Invalid graph: {0}")]
    InvalidGraph(String),

    /// Two-qubit gate on a pair the topology does not couple
    /// Gantree: TopologyViolation{{q1,q2}} // 연결 위반
    #[error("Topology violation: qubits {q1} and {q2} are not coupled")]
    TopologyViolation { q1: usize, q2: usize },

    /// No placement of a problem topology on a device
    #[error("No placement of '{topology}' found on device")]
    NoPlacement { topology: String },

    // ========================================================================
    // Executable Errors
    // ========================================================================
    /// Measurement specification not recognized or invalid
    /// Gantree: InvalidMeasurement(String) // 측정 명세
    #[error("Invalid measurement: {0}")]
    InvalidMeasurement(String),

    /// Measurement kind not supported by the requested operation
    #[error("Unsupported measurement '{0}' for this operation")]
    UnsupportedMeasurement(String),

    /// Required builder field missing
    #[error("Missing required field '{0}'")]
    MissingField(&'static str),

    /// Key defined twice within one node
    #[error("Duplicate key '{0}' within a single node")]
    DuplicateKey(String),

    /// Key defined twice along one root-to-leaf path
    /// Gantree: DuplicateInfoKey(String) // 경로 키 중복
    #[error("Info key '{0}' already defined by an enclosing group")]
    DuplicateInfoKey(String),

    /// Initial state rejected
    #[error("Invalid initial state: {0}")]
    InvalidInitialState(String),

    // ========================================================================
    // Runtime Errors
    // ========================================================================
    /// Sampler execution error
    /// Gantree: SamplerError(String) // 샘플러
    #[error("Sampler error: {0}")]
    SamplerError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Analysis could not be carried out on the given data
    #[error("Analysis error: {0}")]
    AnalysisError(String),

    // ========================================================================
    // I/O Errors
    // ========================================================================
    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(String),

    /// File I/O error
    #[error("File error: {0}")]
    FileError(String),
}

/// Result type alias for QEcho operations
/// Gantree: QechoResult<T> // type alias
pub type QechoResult<T> = Result<T, QechoError>;

// ============================================================================
// Error Conversion Helpers
// ============================================================================

impl From<serde_json::Error> for QechoError {
    fn from(err: serde_json::Error) -> Self {
        QechoError::JsonError(err.to_string())
    }
}

impl From<std::io::Error> for QechoError {
    fn from(err: std::io::Error) -> Self {
        QechoError::FileError(err.to_string())
    }
}

// ============================================================================
// Error Helpers
// ============================================================================

impl QechoError {
    /// Check if error was raised while validating constructor input
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            QechoError::InvalidProbability(_)
                | QechoError::QubitOutOfRange { .. }
                | QechoError::InvalidBitstring(_)
                | QechoError::InvalidBasis(_)
                | QechoError::NonFiniteValue { .. }
                | QechoError::IntegerOutOfRange(_)
                | QechoError::InvalidGate(_)
                | QechoError::InvalidCircuit(_)
                | QechoError::DuplicateMeasurementKey(_)
                | QechoError::InvalidTopology(_)
                | QechoError::TopologyViolation { .. }
                | QechoError::InvalidMeasurement(_)
                | QechoError::MissingField(_)
                | QechoError::DuplicateKey(_)
                | QechoError::InvalidInitialState(_)
        )
    }

    /// Check if error signals a broken tree invariant
    pub fn is_invariant_violation(&self) -> bool {
        matches!(self, QechoError::DuplicateInfoKey(_))
    }
}

// ============================================================================
// Tests
// ============================================================================
