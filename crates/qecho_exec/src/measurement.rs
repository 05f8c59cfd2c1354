//! Measurement specifications
//!
//! Gantree: L2_Executable → Measurement
//!
//! Closed set of ways an executable can be measured: raw bitstring
//! sampling, a collection of Pauli-sum observables, or a histogram.

use qecho_core::types::canonical_bits;
use qecho_core::{Basis, QechoError, QechoResult, QubitId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};

// ============================================================================
// Pauli Sums
// ============================================================================

/// Weighted product of single-qubit Paulis
/// Gantree: PauliString // 파울리 문자열
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PauliString {
    /// Real coefficient
    pub coefficient: f64,
    /// (qubit, Pauli) factors; identity on every other qubit
    pub paulis: Vec<(QubitId, Basis)>,
}

impl PauliString {
    /// Create a Pauli string
    pub fn new(coefficient: f64, paulis: Vec<(QubitId, Basis)>) -> Self {
        Self {
            coefficient,
            paulis,
        }
    }

    /// `Z_a Z_b` with unit coefficient
    pub fn zz(a: QubitId, b: QubitId) -> Self {
        Self::new(1.0, vec![(a, Basis::Z), (b, Basis::Z)])
    }

    fn validate(&self) -> QechoResult<()> {
        if !self.coefficient.is_finite() {
            return Err(QechoError::InvalidMeasurement(format!(
                "Pauli coefficient {} is not finite",
                self.coefficient
            )));
        }
        let mut seen = BTreeSet::new();
        for (qubit, _) in &self.paulis {
            if !seen.insert(*qubit) {
                return Err(QechoError::InvalidMeasurement(format!(
                    "qubit {} appears twice in one Pauli string",
                    qubit
                )));
            }
        }
        Ok(())
    }
}

impl Hash for PauliString {
    fn hash<H: Hasher>(&self, state: &mut H) {
        canonical_bits(self.coefficient).hash(state);
        self.paulis.hash(state);
    }
}

/// Sum of Pauli strings
#[derive(Debug, Clone, PartialEq, Hash, Serialize, Deserialize)]
pub struct PauliSum {
    /// Terms
    pub terms: Vec<PauliString>,
}

impl PauliSum {
    /// Create from terms
    pub fn new(terms: Vec<PauliString>) -> Self {
        Self { terms }
    }
}

/// Ordered collection of observables measured together
/// Gantree: FrozenCollectionOfPauliSum // 관측량 묶음
#[derive(Debug, Clone, PartialEq, Hash, Serialize, Deserialize)]
pub struct FrozenCollectionOfPauliSum {
    /// Observables
    pub sums: Vec<PauliSum>,
}

impl FrozenCollectionOfPauliSum {
    /// Create from observables
    pub fn new(sums: Vec<PauliSum>) -> Self {
        Self { sums }
    }

    /// Every qubit touched by any observable
    pub fn qubits(&self) -> BTreeSet<QubitId> {
        self.sums
            .iter()
            .flat_map(|s| s.terms.iter())
            .flat_map(|t| t.paulis.iter().map(|(q, _)| *q))
            .collect()
    }
}

// ============================================================================
// Measurement
// ============================================================================

/// How an executable is measured
/// Gantree: Measurement // 측정 enum
#[derive(Debug, Clone, PartialEq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", try_from = "MeasurementRepr")]
pub enum Measurement {
    /// Sample bitstrings from the circuit's measurement gates
    Bitstrings {
        /// Number of repetitions
        n_repetitions: u64,
        /// Restrict sampling to these qubits
        #[serde(default, skip_serializing_if = "Option::is_none")]
        measure_qubits: Option<Vec<QubitId>>,
    },
    /// Estimate a collection of Pauli-sum observables
    PauliSumCollection(FrozenCollectionOfPauliSum),
    /// Accumulate a histogram of outcomes
    Histogrammer {
        /// Number of repetitions
        n_repetitions: u64,
    },
}

/// Unvalidated wire form
#[derive(Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum MeasurementRepr {
    Bitstrings {
        n_repetitions: u64,
        #[serde(default)]
        measure_qubits: Option<Vec<QubitId>>,
    },
    PauliSumCollection(FrozenCollectionOfPauliSum),
    Histogrammer {
        n_repetitions: u64,
    },
}

impl TryFrom<MeasurementRepr> for Measurement {
    type Error = QechoError;

    fn try_from(repr: MeasurementRepr) -> Result<Self, Self::Error> {
        let measurement = match repr {
            MeasurementRepr::Bitstrings {
                n_repetitions,
                measure_qubits,
            } => Measurement::Bitstrings {
                n_repetitions,
                measure_qubits,
            },
            MeasurementRepr::PauliSumCollection(c) => Measurement::PauliSumCollection(c),
            MeasurementRepr::Histogrammer { n_repetitions } => {
                Measurement::Histogrammer { n_repetitions }
            }
        };
        measurement.validate()?;
        Ok(measurement)
    }
}

impl Measurement {
    /// Recognized `kind` tags
    pub const KINDS: [&'static str; 3] = ["bitstrings", "pauli_sum_collection", "histogrammer"];

    /// Bitstring sampling over every measured qubit
    pub fn bitstrings(n_repetitions: u64) -> Self {
        Measurement::Bitstrings {
            n_repetitions,
            measure_qubits: None,
        }
    }

    /// Kind tag
    pub fn kind(&self) -> &'static str {
        match self {
            Measurement::Bitstrings { .. } => "bitstrings",
            Measurement::PauliSumCollection(_) => "pauli_sum_collection",
            Measurement::Histogrammer { .. } => "histogrammer",
        }
    }

    /// Repetition count, if the kind has one
    pub fn n_repetitions(&self) -> Option<u64> {
        match self {
            Measurement::Bitstrings { n_repetitions, .. }
            | Measurement::Histogrammer { n_repetitions } => Some(*n_repetitions),
            Measurement::PauliSumCollection(_) => None,
        }
    }

    /// Qubits the measurement refers to explicitly
    pub fn referenced_qubits(&self) -> BTreeSet<QubitId> {
        match self {
            Measurement::Bitstrings {
                measure_qubits: Some(qs),
                ..
            } => qs.iter().copied().collect(),
            Measurement::PauliSumCollection(c) => c.qubits(),
            _ => BTreeSet::new(),
        }
    }

    /// Check internal consistency
    /// Gantree: validate(&self) -> Result // 측정 검증
    pub fn validate(&self) -> QechoResult<()> {
        match self {
            Measurement::Bitstrings {
                n_repetitions,
                measure_qubits,
            } => {
                check_repetitions(*n_repetitions)?;
                if let Some(qs) = measure_qubits {
                    let unique: BTreeSet<_> = qs.iter().collect();
                    if unique.len() != qs.len() {
                        return Err(QechoError::InvalidMeasurement(
                            "measure_qubits repeats a qubit".into(),
                        ));
                    }
                }
                Ok(())
            }
            Measurement::PauliSumCollection(collection) => {
                if collection.sums.is_empty() {
                    return Err(QechoError::InvalidMeasurement(
                        "empty observable collection".into(),
                    ));
                }
                for term in collection.sums.iter().flat_map(|s| s.terms.iter()) {
                    term.validate()?;
                }
                Ok(())
            }
            Measurement::Histogrammer { n_repetitions } => check_repetitions(*n_repetitions),
        }
    }

    /// Parse loosely-typed JSON, rejecting unknown kinds with a clear message
    /// Gantree: from_json_value(Value) -> Result<Measurement> // 느슨한 입력
    pub fn from_json_value(value: &serde_json::Value) -> QechoResult<Self> {
        let kind = value
            .get("kind")
            .and_then(|k| k.as_str())
            .ok_or_else(|| QechoError::InvalidMeasurement(format!("no kind tag in {}", value)))?;

        if !Self::KINDS.contains(&kind) {
            return Err(QechoError::InvalidMeasurement(format!(
                "unrecognized measurement kind '{}', expected one of {:?}",
                kind,
                Self::KINDS
            )));
        }

        serde_json::from_value(value.clone())
            .map_err(|e| QechoError::InvalidMeasurement(e.to_string()))
    }
}

fn check_repetitions(n_repetitions: u64) -> QechoResult<()> {
    if n_repetitions == 0 {
        return Err(QechoError::InvalidMeasurement(
            "n_repetitions must be > 0".into(),
        ));
    }
    Ok(())
}

// Coefficients are finite after validation.
impl Eq for Measurement {}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Measurement::Bitstrings {
                n_repetitions,
                measure_qubits,
            } => match measure_qubits {
                Some(qs) => write!(f, "Bitstrings(n_repetitions={}, qubits={:?})", n_repetitions, qs),
                None => write!(f, "Bitstrings(n_repetitions={})", n_repetitions),
            },
            Measurement::PauliSumCollection(c) => {
                write!(f, "PauliSumCollection({} observables)", c.sums.len())
            }
            Measurement::Histogrammer { n_repetitions } => {
                write!(f, "Histogrammer(n_repetitions={})", n_repetitions)
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bitstrings_json() {
        let m = Measurement::bitstrings(1000);
        let json = serde_json::to_value(&m).unwrap();
        assert_eq!(json, json!({"kind": "bitstrings", "n_repetitions": 1000}));

        let back: Measurement = serde_json::from_value(json).unwrap();
        assert_eq!(back, m);
        assert_eq!(back.n_repetitions(), Some(1000));
    }

    #[test]
    fn test_zero_repetitions_rejected() {
        assert!(Measurement::bitstrings(0).validate().is_err());
        let parsed = serde_json::from_value::<Measurement>(json!({
            "kind": "histogrammer",
            "n_repetitions": 0
        }));
        assert!(parsed.is_err());
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let value = json!({"kind": "tomography", "n_repetitions": 5});
        let err = Measurement::from_json_value(&value).unwrap_err();
        assert!(err.to_string().contains("tomography"));

        assert!(Measurement::from_json_value(&json!({"n_repetitions": 5})).is_err());
        assert!(serde_json::from_value::<Measurement>(value).is_err());
    }

    #[test]
    fn test_from_json_value() {
        let m = Measurement::from_json_value(&json!({
            "kind": "bitstrings",
            "n_repetitions": 10,
            "measure_qubits": [0, 2]
        }))
        .unwrap();
        assert_eq!(m.referenced_qubits().len(), 2);
        assert_eq!(m.kind(), "bitstrings");
    }

    #[test]
    fn test_pauli_collection() {
        let collection =
            FrozenCollectionOfPauliSum::new(vec![PauliSum::new(vec![PauliString::zz(0, 1)])]);
        let m = Measurement::PauliSumCollection(collection);
        assert!(m.validate().is_ok());
        assert_eq!(m.n_repetitions(), None);

        let json = serde_json::to_string(&m).unwrap();
        let back: Measurement = serde_json::from_str(&json).unwrap();
        assert_eq!(back, m);

        let repeated = PauliString::new(1.0, vec![(0, Basis::Z), (0, Basis::X)]);
        let bad = Measurement::PauliSumCollection(FrozenCollectionOfPauliSum::new(vec![
            PauliSum::new(vec![repeated]),
        ]));
        assert!(bad.validate().is_err());
    }
}
