//! Immutable quantum executables
//!
//! Gantree: L2_Executable → QuantumExecutable
//!
//! A `QuantumExecutable` bundles everything needed to run one circuit:
//! frozen circuit, measurement, parameters, metadata, optional problem
//! topology and initial state. It is produced by `ExecutableBuilder`, which
//! normalizes loose inputs and validates them once.

use crate::info::{write_pairs, Info, InfoValue, Params};
use crate::initial_state::InitialState;
use crate::measurement::Measurement;
use qecho_core::{Circuit, FrozenCircuit, ProblemTopology, QechoError, QechoResult};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use uuid::Uuid;

// ============================================================================
// QuantumExecutable
// ============================================================================

/// An executable quantum program
/// Gantree: QuantumExecutable // 실행 단위
///
/// Equality and hashing cover the payload only; two executables built
/// independently from the same inputs compare equal even though their
/// UUIDs differ.
///
/// Fields cannot be assigned after construction:
///
/// ```compile_fail
/// use qecho_core::CircuitBuilder;
/// use qecho_exec::{Measurement, QuantumExecutable};
///
/// let mut exe = QuantumExecutable::builder()
///     .circuit(CircuitBuilder::new(1).build().unwrap())
///     .measurement(Measurement::bitstrings(10))
///     .build()
///     .unwrap();
/// exe.measurement = Measurement::bitstrings(20);
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "ExecutableRepr")]
pub struct QuantumExecutable {
    circuit: FrozenCircuit,
    measurement: Measurement,
    params: Params,
    info: Info,
    problem_topology: Option<ProblemTopology>,
    initial_state: Option<InitialState>,
    uuid: Uuid,
    payload_hash: u64,
}

impl QuantumExecutable {
    /// Start building an executable
    pub fn builder() -> ExecutableBuilder {
        ExecutableBuilder::new()
    }

    /// Frozen circuit
    pub fn circuit(&self) -> &FrozenCircuit {
        &self.circuit
    }

    /// Measurement specification
    pub fn measurement(&self) -> &Measurement {
        &self.measurement
    }

    /// Circuit parameters
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Metadata
    pub fn info(&self) -> &Info {
        &self.info
    }

    /// Problem topology, if declared
    pub fn problem_topology(&self) -> Option<&ProblemTopology> {
        self.problem_topology.as_ref()
    }

    /// Initial state, if not all-zeros
    pub fn initial_state(&self) -> Option<&InitialState> {
        self.initial_state.as_ref()
    }

    /// Identifier
    pub fn uuid(&self) -> Uuid {
        self.uuid
    }

    /// Cached payload hash
    pub fn payload_hash(&self) -> u64 {
        self.payload_hash
    }

    /// Validate the parts against each other and seal them
    /// Gantree: assemble(parts, uuid) -> Result<Self> // 검증 + 봉인
    fn assemble(parts: ExecutableRepr) -> QechoResult<Self> {
        let ExecutableRepr {
            circuit,
            measurement,
            params,
            info,
            problem_topology,
            initial_state,
            uuid,
        } = parts;
        let num_qubits = circuit.num_qubits();

        measurement.validate()?;
        if let Some(&qubit) = measurement.referenced_qubits().iter().next_back() {
            if qubit >= num_qubits {
                return Err(QechoError::QubitOutOfRange { qubit, num_qubits });
            }
        }

        if let Some(qubit) = initial_state.as_ref().and_then(InitialState::max_qubit) {
            if qubit >= num_qubits {
                return Err(QechoError::QubitOutOfRange { qubit, num_qubits });
            }
        }

        if let Some(topology) = &problem_topology {
            topology.validate_circuit(circuit.circuit())?;
        }

        let mut hasher = DefaultHasher::new();
        circuit.hash(&mut hasher);
        measurement.hash(&mut hasher);
        params.hash(&mut hasher);
        info.hash(&mut hasher);
        problem_topology.hash(&mut hasher);
        initial_state.hash(&mut hasher);

        Ok(Self {
            circuit,
            measurement,
            params,
            info,
            problem_topology,
            initial_state,
            uuid,
            payload_hash: hasher.finish(),
        })
    }
}

impl PartialEq for QuantumExecutable {
    fn eq(&self, other: &Self) -> bool {
        self.payload_hash == other.payload_hash
            && self.circuit == other.circuit
            && self.measurement == other.measurement
            && self.params == other.params
            && self.info == other.info
            && self.problem_topology == other.problem_topology
            && self.initial_state == other.initial_state
    }
}

impl Eq for QuantumExecutable {}

impl Hash for QuantumExecutable {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.payload_hash);
    }
}

impl fmt::Display for QuantumExecutable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "QuantumExecutable(info=")?;
        write_pairs(f, self.info.iter())?;
        write!(f, ", uuid={})", self.uuid)
    }
}

// ============================================================================
// Wire Form
// ============================================================================

#[derive(Serialize)]
struct ExecutableView<'a> {
    circuit: &'a FrozenCircuit,
    measurement: &'a Measurement,
    params: &'a Params,
    info: &'a Info,
    #[serde(skip_serializing_if = "Option::is_none")]
    problem_topology: Option<&'a ProblemTopology>,
    #[serde(skip_serializing_if = "Option::is_none")]
    initial_state: Option<&'a InitialState>,
    uuid: Uuid,
}

impl Serialize for QuantumExecutable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        ExecutableView {
            circuit: &self.circuit,
            measurement: &self.measurement,
            params: &self.params,
            info: &self.info,
            problem_topology: self.problem_topology.as_ref(),
            initial_state: self.initial_state.as_ref(),
            uuid: self.uuid,
        }
        .serialize(serializer)
    }
}

#[derive(Deserialize)]
struct ExecutableRepr {
    circuit: FrozenCircuit,
    measurement: Measurement,
    #[serde(default)]
    params: Params,
    #[serde(default)]
    info: Info,
    #[serde(default)]
    problem_topology: Option<ProblemTopology>,
    #[serde(default)]
    initial_state: Option<InitialState>,
    uuid: Uuid,
}

impl TryFrom<ExecutableRepr> for QuantumExecutable {
    type Error = QechoError;

    fn try_from(repr: ExecutableRepr) -> Result<Self, Self::Error> {
        Self::assemble(repr)
    }
}

// ============================================================================
// ExecutableBuilder
// ============================================================================

/// Two-phase builder for `QuantumExecutable`
/// Gantree: ExecutableBuilder // 빌더 패턴
#[derive(Debug, Default)]
pub struct ExecutableBuilder {
    circuit: Option<FrozenCircuit>,
    measurement: Option<Measurement>,
    params: Vec<(String, f64)>,
    info: Vec<(String, InfoValue)>,
    problem_topology: Option<ProblemTopology>,
    initial_state: Option<InitialState>,
    uuid: Option<Uuid>,
    error: Option<QechoError>,
}

impl ExecutableBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Circuit to freeze
    pub fn circuit(mut self, circuit: Circuit) -> Self {
        match circuit.freeze() {
            Ok(frozen) => self.circuit = Some(frozen),
            Err(e) => {
                self.error.get_or_insert(e);
            }
        }
        self
    }

    /// Already-frozen circuit
    pub fn frozen_circuit(mut self, circuit: FrozenCircuit) -> Self {
        self.circuit = Some(circuit);
        self
    }

    /// Measurement specification
    pub fn measurement(mut self, measurement: Measurement) -> Self {
        self.measurement = Some(measurement);
        self
    }

    /// Append parameters
    pub fn params<I, K>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<String>,
    {
        self.params
            .extend(params.into_iter().map(|(k, v)| (k.into(), v)));
        self
    }

    /// Append one parameter
    pub fn param(self, name: impl Into<String>, value: f64) -> Self {
        self.params([(name.into(), value)])
    }

    /// Append metadata
    pub fn info<I, K, V>(mut self, info: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<InfoValue>,
    {
        self.info
            .extend(info.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Append one metadata entry
    pub fn info_entry(self, key: impl Into<String>, value: impl Into<InfoValue>) -> Self {
        self.info([(key.into(), value.into())])
    }

    /// Problem topology the circuit is laid out on
    pub fn problem_topology(mut self, topology: impl Into<ProblemTopology>) -> Self {
        self.problem_topology = Some(topology.into());
        self
    }

    /// Initial product state
    pub fn initial_state(mut self, state: InitialState) -> Self {
        self.initial_state = Some(state);
        self
    }

    /// Reuse an identifier (reconstruction only)
    pub fn uuid(mut self, uuid: Uuid) -> Self {
        self.uuid = Some(uuid);
        self
    }

    /// Normalize, validate and seal
    /// Gantree: build(self) -> Result<QuantumExecutable> // 빌드
    pub fn build(self) -> QechoResult<QuantumExecutable> {
        if let Some(e) = self.error {
            return Err(e);
        }
        let circuit = self.circuit.ok_or(QechoError::MissingField("circuit"))?;
        let measurement = self
            .measurement
            .ok_or(QechoError::MissingField("measurement"))?;

        QuantumExecutable::assemble(ExecutableRepr {
            circuit,
            measurement,
            params: Params::from_pairs(self.params)?,
            info: Info::from_pairs(self.info)?,
            problem_topology: self.problem_topology,
            initial_state: self.initial_state,
            uuid: self.uuid.unwrap_or_else(Uuid::new_v4),
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::initial_state::KetState;
    use qecho_core::{CircuitBuilder, Gate, LineTopology};
    use std::collections::HashSet;

    fn circuit(n: usize) -> Circuit {
        let mut builder = CircuitBuilder::new(n);
        for q in 0..n {
            builder = builder.phased_xz(q, 0.5, 0.25 * q as f64, 0.0);
        }
        for q in 1..n {
            builder = builder.cz(q - 1, q);
        }
        builder.measure_all("z").build().unwrap()
    }

    fn executable(reps: u64) -> QuantumExecutable {
        QuantumExecutable::builder()
            .info([("name", "example-program")])
            .circuit(circuit(10))
            .measurement(Measurement::bitstrings(reps))
            .build()
            .unwrap()
    }

    fn hash_of(exe: &QuantumExecutable) -> u64 {
        let mut hasher = DefaultHasher::new();
        exe.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_fields_normalized() {
        let exe = executable(10);
        assert_eq!(
            exe.info().get("name"),
            Some(&InfoValue::Str("example-program".into()))
        );
        assert_eq!(exe.circuit().num_qubits(), 10);
        assert!(exe.problem_topology().is_none());
    }

    #[test]
    fn test_independent_builds_equal() {
        let a = executable(10);
        let b = executable(10);
        assert_ne!(a.uuid(), b.uuid());
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));

        let set: HashSet<QuantumExecutable> = [a, b].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_repetitions_distinguish() {
        let a = executable(10);
        let c = executable(20);
        assert_ne!(a, c);
        assert_ne!(hash_of(&a), hash_of(&c));
    }

    #[test]
    fn test_missing_fields() {
        let no_measurement = QuantumExecutable::builder().circuit(circuit(2)).build();
        assert_eq!(
            no_measurement.unwrap_err(),
            QechoError::MissingField("measurement")
        );

        let no_circuit = QuantumExecutable::builder()
            .measurement(Measurement::bitstrings(1))
            .build();
        assert_eq!(no_circuit.unwrap_err(), QechoError::MissingField("circuit"));
    }

    #[test]
    fn test_validation_errors() {
        let zero_reps = QuantumExecutable::builder()
            .circuit(circuit(2))
            .measurement(Measurement::bitstrings(0))
            .build();
        assert!(matches!(zero_reps, Err(QechoError::InvalidMeasurement(_))));

        let dup_info = QuantumExecutable::builder()
            .circuit(circuit(2))
            .measurement(Measurement::bitstrings(1))
            .info_entry("n", 2)
            .info_entry("n", 3)
            .build();
        assert_eq!(dup_info.unwrap_err(), QechoError::DuplicateKey("n".into()));

        let out_of_range = QuantumExecutable::builder()
            .circuit(circuit(2))
            .measurement(Measurement::Bitstrings {
                n_repetitions: 5,
                measure_qubits: Some(vec![0, 4]),
            })
            .build();
        assert!(matches!(
            out_of_range,
            Err(QechoError::QubitOutOfRange { qubit: 4, .. })
        ));

        let bad_state = QuantumExecutable::builder()
            .circuit(circuit(2))
            .measurement(Measurement::bitstrings(1))
            .initial_state(InitialState::uniform(3, KetState::Plus))
            .build();
        assert!(bad_state.is_err());

        let nan_param = QuantumExecutable::builder()
            .circuit(circuit(2))
            .measurement(Measurement::bitstrings(1))
            .param("theta", f64::NAN)
            .build();
        assert!(matches!(nan_param, Err(QechoError::NonFiniteValue { .. })));
    }

    #[test]
    fn test_invalid_circuit_reported() {
        let mut raw = Circuit::new(1);
        raw.add_gate(Gate::PhasedXz(0, 0.5, 0.0, 0.0)).unwrap();
        let bad: Circuit = serde_json::from_str(r#"{"num_qubits":1,"gates":[{"Cz":[0,3]}]}"#).unwrap();

        let result = QuantumExecutable::builder()
            .circuit(bad)
            .circuit(raw)
            .measurement(Measurement::bitstrings(1))
            .build();
        assert!(matches!(result, Err(QechoError::InvalidCircuit(_))));
    }

    #[test]
    fn test_topology_checked() {
        let on_line = QuantumExecutable::builder()
            .circuit(circuit(4))
            .measurement(Measurement::bitstrings(1))
            .problem_topology(LineTopology::new(4).unwrap())
            .build();
        assert!(on_line.is_ok());

        let too_small = QuantumExecutable::builder()
            .circuit(circuit(4))
            .measurement(Measurement::bitstrings(1))
            .problem_topology(LineTopology::new(2).unwrap())
            .build();
        assert!(too_small.is_err());
    }

    #[test]
    fn test_json_round_trip_keeps_uuid() {
        let exe = QuantumExecutable::builder()
            .circuit(circuit(3))
            .measurement(Measurement::bitstrings(100))
            .param("theta", 0.5)
            .info_entry("instance_i", 0)
            .problem_topology(LineTopology::new(3).unwrap())
            .initial_state(InitialState::uniform(3, KetState::Zero))
            .build()
            .unwrap();

        let json = serde_json::to_string(&exe).unwrap();
        let back: QuantumExecutable = serde_json::from_str(&json).unwrap();
        assert_eq!(back, exe);
        assert_eq!(back.uuid(), exe.uuid());
        assert_eq!(back.payload_hash(), exe.payload_hash());
    }

    #[test]
    fn test_deserialize_revalidates() {
        let exe = executable(10);
        let mut value = serde_json::to_value(&exe).unwrap();
        value["measurement"]["n_repetitions"] = serde_json::json!(0);
        assert!(serde_json::from_value::<QuantumExecutable>(value).is_err());
    }

    #[test]
    fn test_display() {
        let exe = executable(10);
        let s = exe.to_string();
        assert!(s.starts_with("QuantumExecutable(info={name: 'example-program'}"));
        assert!(s.contains(&exe.uuid().to_string()));
    }
}
