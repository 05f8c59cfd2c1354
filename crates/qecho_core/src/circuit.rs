//! Quantum circuit structure for QEcho
//!
//! Gantree: L1_Circuit → Circuit
//!
//! `Circuit` is the mutable working form used while building;
//! `FrozenCircuit` is the validated, immutable form stored in executables.

use crate::error::{QechoError, QechoResult};
use crate::gate::Gate;
use crate::types::QubitId;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Quantum circuit
/// Gantree: Circuit // 회로 구조체
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circuit {
    /// Number of qubits
    /// Gantree: num_qubits: usize // 큐비트 수
    num_qubits: usize,

    /// Gate sequence
    /// Gantree: gates: Vec<Gate> // 게이트 목록
    gates: Vec<Gate>,

    /// Optional circuit name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

impl Circuit {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Create a new empty circuit
    /// Gantree: new(n) -> Self // 생성자
    pub fn new(num_qubits: usize) -> Self {
        Self {
            num_qubits,
            gates: Vec::new(),
            name: None,
        }
    }

    /// Create a circuit with a name
    pub fn with_name(num_qubits: usize, name: impl Into<String>) -> Self {
        Self {
            num_qubits,
            gates: Vec::new(),
            name: Some(name.into()),
        }
    }

    // ========================================================================
    // Basic Operations
    // ========================================================================

    /// Add a gate to the circuit
    /// Gantree: add_gate(&mut, Gate) -> Result // 게이트 추가
    pub fn add_gate(&mut self, gate: Gate) -> QechoResult<()> {
        gate.validate(self.num_qubits)?;
        self.gates.push(gate);
        Ok(())
    }

    /// Add multiple gates
    pub fn add_gates(&mut self, gates: impl IntoIterator<Item = Gate>) -> QechoResult<()> {
        for gate in gates {
            self.add_gate(gate)?;
        }
        Ok(())
    }

    /// Append every gate of `other` after the gates of `self`
    /// Gantree: append(&mut, &Circuit) -> Result // 회로 연결
    pub fn append(&mut self, other: &Circuit) -> QechoResult<()> {
        self.add_gates(other.gates.iter().cloned())
    }

    /// Get number of qubits
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Get gates
    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    /// Get circuit name
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Check if circuit is empty
    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }

    // ========================================================================
    // Circuit Analysis
    // ========================================================================

    /// Calculate circuit depth (longest path)
    /// Gantree: depth(&self) -> usize // 깊이 계산
    pub fn depth(&self) -> usize {
        let mut qubit_depths = vec![0usize; self.num_qubits];

        for gate in &self.gates {
            let qubits = gate.qubits();
            let layer = qubits
                .iter()
                .filter_map(|&q| qubit_depths.get(q))
                .max()
                .copied()
                .unwrap_or(0)
                + 1;
            for q in qubits {
                if let Some(d) = qubit_depths.get_mut(q) {
                    *d = layer;
                }
            }
        }

        qubit_depths.into_iter().max().unwrap_or(0)
    }

    /// Get total gate count
    pub fn gate_count(&self) -> usize {
        self.gates.len()
    }

    /// Count single-qubit gates
    pub fn count_1q(&self) -> usize {
        self.gates.iter().filter(|g| g.is_single_qubit()).count()
    }

    /// Count two-qubit gates
    pub fn count_2q(&self) -> usize {
        self.gates.iter().filter(|g| g.is_two_qubit()).count()
    }

    /// Count measurement operations
    pub fn count_measurements(&self) -> usize {
        self.gates.iter().filter(|g| g.is_measurement()).count()
    }

    /// Get two-qubit gate pairs (for topology validation)
    pub fn two_qubit_pairs(&self) -> Vec<(QubitId, QubitId)> {
        self.gates
            .iter()
            .filter(|g| g.is_two_qubit())
            .map(|g| {
                let qs = g.qubits();
                (qs[0], qs[1])
            })
            .collect()
    }

    /// Measurement keys in order of appearance
    pub fn measurement_keys(&self) -> Vec<&str> {
        self.gates
            .iter()
            .filter_map(|g| match g {
                Gate::Measure(_, key) => Some(key.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Qubits measured under `key`
    pub fn measured_qubits(&self, key: &str) -> Option<&[QubitId]> {
        self.gates.iter().find_map(|g| match g {
            Gate::Measure(qs, k) if k == key => Some(qs.as_slice()),
            _ => None,
        })
    }

    // ========================================================================
    // Transformations
    // ========================================================================

    /// Inverse circuit: gates reversed and individually inverted
    /// Gantree: inverse(&self) -> Result<Circuit> // 역회로
    pub fn inverse(&self) -> QechoResult<Circuit> {
        let gates = self
            .gates
            .iter()
            .rev()
            .map(Gate::inverse)
            .collect::<QechoResult<Vec<_>>>()?;
        Ok(Circuit {
            num_qubits: self.num_qubits,
            gates,
            name: self.name.as_ref().map(|n| format!("{}^-1", n)),
        })
    }

    /// Validate and freeze
    /// Gantree: freeze(self) -> Result<FrozenCircuit> // 동결
    pub fn freeze(self) -> QechoResult<FrozenCircuit> {
        FrozenCircuit::new(self)
    }

    // ========================================================================
    // Validation
    // ========================================================================

    /// Validate all gates in the circuit
    fn validate_gates(&self) -> QechoResult<()> {
        for gate in &self.gates {
            gate.validate(self.num_qubits)?;
        }
        Ok(())
    }

    /// Each measurement key names exactly one record
    fn validate_measurement_keys(&self) -> QechoResult<()> {
        let mut seen = HashSet::new();
        for key in self.measurement_keys() {
            if !seen.insert(key) {
                return Err(QechoError::DuplicateMeasurementKey(key.to_string()));
            }
        }
        Ok(())
    }
}

// ============================================================================
// FrozenCircuit
// ============================================================================

/// Immutable, validated circuit with structural `Eq`/`Hash`
/// Gantree: FrozenCircuit // 동결 회로
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "Circuit", into = "Circuit")]
pub struct FrozenCircuit {
    inner: Circuit,
}

impl FrozenCircuit {
    /// Freeze a circuit after validating every gate and measurement key
    pub fn new(circuit: Circuit) -> QechoResult<Self> {
        circuit
            .validate_gates()
            .map_err(|e| QechoError::InvalidCircuit(e.to_string()))?;
        circuit.validate_measurement_keys()?;
        Ok(Self { inner: circuit })
    }

    /// Borrow the underlying circuit
    pub fn circuit(&self) -> &Circuit {
        &self.inner
    }

    /// Copy back into a mutable circuit
    pub fn unfreeze(&self) -> Circuit {
        self.inner.clone()
    }

    /// Number of qubits
    pub fn num_qubits(&self) -> usize {
        self.inner.num_qubits
    }

    /// Gates
    pub fn gates(&self) -> &[Gate] {
        &self.inner.gates
    }
}

impl PartialEq for FrozenCircuit {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

// Parameters are finite after validation, so `PartialEq` is total here.
impl Eq for FrozenCircuit {}

impl Hash for FrozenCircuit {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.num_qubits.hash(state);
        self.inner.gates.hash(state);
        self.inner.name.hash(state);
    }
}

impl TryFrom<Circuit> for FrozenCircuit {
    type Error = QechoError;

    fn try_from(circuit: Circuit) -> Result<Self, Self::Error> {
        Self::new(circuit)
    }
}

impl From<FrozenCircuit> for Circuit {
    fn from(frozen: FrozenCircuit) -> Self {
        frozen.inner
    }
}

// ============================================================================
// Display
// ============================================================================

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Circuit({} qubits, {} gates)",
            self.num_qubits,
            self.gates.len()
        )?;
        writeln!(f, "  Depth: {}", self.depth())?;
        writeln!(f, "  1Q gates: {}", self.count_1q())?;
        writeln!(f, "  2Q gates: {}", self.count_2q())?;
        Ok(())
    }
}

impl fmt::Display for FrozenCircuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Frozen{}", self.inner)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;

    fn hash_of<T: Hash>(value: &T) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    fn sample() -> Circuit {
        let mut circuit = Circuit::new(3);
        circuit.add_gate(Gate::PhasedXz(0, 0.5, 0.25, 0.0)).unwrap();
        circuit.add_gate(Gate::PhasedXz(1, 0.5, 0.0, 0.5)).unwrap();
        circuit.add_gate(Gate::FSim(0, 1, 0.7, 0.0)).unwrap();
        circuit.add_gate(Gate::PhasedXz(2, 0.5, 1.0, 0.0)).unwrap();
        circuit
    }

    #[test]
    fn test_circuit_new() {
        let circuit = Circuit::new(5);
        assert_eq!(circuit.num_qubits(), 5);
        assert!(circuit.is_empty());
        assert_eq!(circuit.depth(), 0);
    }

    #[test]
    fn test_add_gate_out_of_range() {
        let mut circuit = Circuit::new(3);
        assert!(circuit.add_gate(Gate::Cz(0, 5)).is_err());
    }

    #[test]
    fn test_circuit_depth() {
        // PhXZ(0), PhXZ(1) parallel, FSim(0,1) next, PhXZ(2) parallel to both
        assert_eq!(sample().depth(), 2);
    }

    #[test]
    fn test_gate_counts() {
        let circuit = sample();
        assert_eq!(circuit.count_1q(), 3);
        assert_eq!(circuit.count_2q(), 1);
        assert_eq!(circuit.two_qubit_pairs(), vec![(0, 1)]);
    }

    #[test]
    fn test_inverse_reverses_and_inverts() {
        let circuit = sample();
        let inverse = circuit.inverse().unwrap();

        assert_eq!(inverse.gate_count(), circuit.gate_count());
        assert_eq!(inverse.gates()[0], Gate::PhasedXz(2, -0.5, -1.0, 1.0));
        assert_eq!(inverse.gates()[1], Gate::FSim(0, 1, -0.7, -0.0));

        // Inverting twice restores the exponents up to the axis phase shift
        let twice = inverse.inverse().unwrap();
        assert_eq!(twice.gates()[2], Gate::FSim(0, 1, 0.7, 0.0));
    }

    #[test]
    fn test_inverse_rejects_measurement() {
        let mut circuit = sample();
        circuit
            .add_gate(Gate::Measure(vec![0, 1, 2], "z".into()))
            .unwrap();
        assert!(circuit.inverse().is_err());
        assert_eq!(circuit.measurement_keys(), vec!["z"]);
        assert_eq!(circuit.measured_qubits("z"), Some(&[0, 1, 2][..]));
    }

    #[test]
    fn test_append() {
        let mut forward = sample();
        let reverse = forward.inverse().unwrap();
        forward.append(&reverse).unwrap();
        assert_eq!(forward.gate_count(), 8);
    }

    #[test]
    fn test_frozen_equality_and_hash() {
        let a = sample().freeze().unwrap();
        let b = sample().freeze().unwrap();
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));

        let mut other = sample();
        other.add_gate(Gate::Cz(1, 2)).unwrap();
        let c = other.freeze().unwrap();
        assert_ne!(a, c);
        assert_ne!(hash_of(&a), hash_of(&c));
    }

    #[test]
    fn test_freeze_rejects_repeated_measurement_key() {
        let mut circuit = Circuit::new(3);
        circuit.add_gate(Gate::Measure(vec![0], "z".into())).unwrap();
        circuit
            .add_gate(Gate::Measure(vec![1, 2], "z".into()))
            .unwrap();

        assert_eq!(
            circuit.clone().freeze().unwrap_err(),
            QechoError::DuplicateMeasurementKey("z".into())
        );

        let json = serde_json::to_string(&circuit).unwrap();
        assert!(serde_json::from_str::<FrozenCircuit>(&json).is_err());
    }

    #[test]
    fn test_frozen_rejects_invalid_on_deserialize() {
        let json = r#"{"num_qubits":1,"gates":[{"Cz":[0,1]}]}"#;
        let result: Result<FrozenCircuit, _> = serde_json::from_str(json);
        assert!(result.is_err());

        let json = r#"{"num_qubits":2,"gates":[{"Cz":[0,1]}]}"#;
        let frozen: FrozenCircuit = serde_json::from_str(json).unwrap();
        assert_eq!(frozen.gates().len(), 1);
    }
}
