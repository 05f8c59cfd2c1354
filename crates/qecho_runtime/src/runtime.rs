//! Batch execution
//!
//! Gantree: L3_Runtime → QuantumRuntime
//!
//! Flattens a program group, places each executable on the device and
//! samples it.

use crate::config::RuntimeConfig;
use crate::placer::{DevicePlacement, QubitPlacer};
use crate::sampler::Sampler;
use qecho_core::{
    Bitstring, FrozenCircuit, GridQubit, QechoError, QechoResult, QubitId, TopologyGraph,
};
use qecho_exec::{Info, Measurement, ProgramGroup};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

// ============================================================================
// ExecutableResult
// ============================================================================

/// Outcome of one executable
/// Gantree: ExecutableResult // 실행 결과
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutableResult {
    /// Executable identifier
    pub uuid: Uuid,

    /// Metadata merged from the root group down
    pub info: Info,

    /// Device qubits used, in topology qubit order
    pub placement: DevicePlacement,

    /// Repetitions that were run
    pub repetitions: u64,

    /// Bitstrings per measurement key
    pub records: BTreeMap<String, Vec<Bitstring>>,
}

impl ExecutableResult {
    /// Records for one key
    pub fn records_for(&self, key: &str) -> Option<&[Bitstring]> {
        self.records.get(key).map(Vec::as_slice)
    }
}

impl fmt::Display for ExecutableResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ExecutableResult(info={}, repetitions={}, placed={})",
            self.info,
            self.repetitions,
            self.placement.is_some()
        )
    }
}

// ============================================================================
// QuantumRuntime
// ============================================================================

/// Runs program groups on a sampler
/// Gantree: QuantumRuntime // 런타임
pub struct QuantumRuntime<S: Sampler> {
    config: RuntimeConfig,
    sampler: S,
    placer: Box<dyn QubitPlacer>,
    device: TopologyGraph<GridQubit>,
    rng: StdRng,
}

impl<S: Sampler> QuantumRuntime<S> {
    /// Create a runtime from a validated configuration
    /// Gantree: new(config, sampler) -> Result<Self>
    pub fn new(config: RuntimeConfig, sampler: S) -> QechoResult<Self> {
        config.validate()?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            placer: config.placer.build()?,
            device: config.device_graph(),
            config,
            sampler,
            rng,
        })
    }

    /// Configuration
    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Sampler
    pub fn sampler(&self) -> &S {
        &self.sampler
    }

    /// Execute every executable in `program`, depth-first
    /// Gantree: execute(program) -> Result<Vec<ExecutableResult>> // 배치 실행
    ///
    /// Only `Bitstrings` measurements are supported.
    pub fn execute(&mut self, program: &ProgramGroup) -> QechoResult<Vec<ExecutableResult>> {
        log::info!(
            "{}: executing {} executables with {} sampler, {} placer",
            self.config.name,
            program.num_executables(),
            self.sampler.name(),
            self.placer.name()
        );

        let mut results = Vec::with_capacity(program.num_executables());
        for entry in program.flatten() {
            let entry = entry?;
            let executable = entry.executable;

            let (repetitions, measure_qubits) = match executable.measurement() {
                Measurement::Bitstrings {
                    n_repetitions,
                    measure_qubits,
                } => (*n_repetitions, measure_qubits.as_deref()),
                other => {
                    return Err(QechoError::UnsupportedMeasurement(other.kind().to_string()))
                }
            };

            let placement = self.placer.place(executable, &self.device, &mut self.rng)?;
            let sample = self.sampler.run(executable.circuit(), repetitions)?;
            let records = match measure_qubits {
                Some(qubits) => restrict_records(executable.circuit(), sample.records, qubits)?,
                None => sample.records,
            };

            results.push(ExecutableResult {
                uuid: executable.uuid(),
                info: entry.to_info()?,
                placement,
                repetitions: sample.repetitions,
                records,
            });
        }

        log::info!("{}: collected {} results", self.config.name, results.len());
        Ok(results)
    }
}

/// Keep only the bits of `qubits` in each record
///
/// Bits stay in the measurement gate's qubit order. Keys left with no bits
/// are dropped, and every requested qubit must be measured somewhere.
fn restrict_records(
    circuit: &FrozenCircuit,
    records: BTreeMap<String, Vec<Bitstring>>,
    qubits: &[QubitId],
) -> QechoResult<BTreeMap<String, Vec<Bitstring>>> {
    let circuit = circuit.circuit();
    if let Some(missing) = qubits.iter().find(|&q| {
        !circuit
            .measurement_keys()
            .iter()
            .filter_map(|key| circuit.measured_qubits(key))
            .any(|measured| measured.contains(q))
    }) {
        return Err(QechoError::InvalidMeasurement(format!(
            "qubit {} is not measured by the circuit",
            missing
        )));
    }

    let mut restricted = BTreeMap::new();
    for (key, bitstrings) in records {
        let positions: Vec<usize> = match circuit.measured_qubits(&key) {
            Some(measured) => measured
                .iter()
                .enumerate()
                .filter(|&(_, q)| qubits.contains(q))
                .map(|(i, _)| i)
                .collect(),
            None => continue,
        };
        if positions.is_empty() {
            continue;
        }

        let kept: Vec<Bitstring> = bitstrings
            .iter()
            .map(|b| Bitstring::new(positions.iter().filter_map(|&i| b.get(i)).collect()))
            .collect();
        restricted.insert(key, kept);
    }
    Ok(restricted)
}

impl<S: Sampler> fmt::Debug for QuantumRuntime<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuantumRuntime")
            .field("config", &self.config)
            .field("sampler", &self.sampler.name())
            .field("placer", &self.placer.name())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placer::PlacerConfig;
    use crate::sampler::MockSampler;
    use qecho_core::{CircuitBuilder, DiagonalRectangleTopology, LineTopology};
    use qecho_exec::{InfoValue, QuantumExecutable};

    fn leaf(topology: LineTopology, reps: u64, i: i64) -> QuantumExecutable {
        QuantumExecutable::builder()
            .circuit(
                CircuitBuilder::new(topology.n_qubits())
                    .cz(0, 1)
                    .measure_all("z")
                    .build()
                    .unwrap(),
            )
            .measurement(Measurement::bitstrings(reps))
            .problem_topology(topology)
            .info_entry("instance_i", i)
            .build()
            .unwrap()
    }

    fn program() -> ProgramGroup {
        let line = LineTopology::new(3).unwrap();
        ProgramGroup::new(
            Info::from_pairs([("name", "demo")]).unwrap(),
            [leaf(line.clone(), 20, 0), leaf(line, 30, 1)],
        )
    }

    #[test]
    fn test_execute_mock() {
        let mut runtime = QuantumRuntime::new(RuntimeConfig::mock(), MockSampler::ideal()).unwrap();
        let group = program();
        let results = runtime.execute(&group).unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].uuid, group.executables()[0].uuid());
        assert_eq!(results[1].repetitions, 30);
        assert_eq!(results[1].info.get("name"), Some(&InfoValue::from("demo")));
        assert_eq!(results[1].info.get("instance_i"), Some(&InfoValue::Int(1)));
        assert!(results[0].placement.is_none());
        assert!(results[0]
            .records_for("z")
            .unwrap()
            .iter()
            .all(Bitstring::is_all_zero));
    }

    #[test]
    fn test_execute_with_random_placement() {
        let config = RuntimeConfig::processor("test-device")
            .with_device(3, 3)
            .with_placer(PlacerConfig::Random { trials: 50 })
            .with_seed(9);
        let mut runtime = QuantumRuntime::new(config, MockSampler::ideal()).unwrap();

        let results = runtime.execute(&program()).unwrap();
        for result in &results {
            let qubits = result.placement.as_ref().unwrap();
            assert_eq!(qubits.len(), 3);
            assert!(qubits[0].is_adjacent(&qubits[1]));
        }
    }

    #[test]
    fn test_unsupported_measurement() {
        let exe = QuantumExecutable::builder()
            .circuit(CircuitBuilder::new(1).measure_all("z").build().unwrap())
            .measurement(Measurement::Histogrammer { n_repetitions: 10 })
            .build()
            .unwrap();
        let group = ProgramGroup::new(Info::new(), [exe]);

        let mut runtime = QuantumRuntime::new(RuntimeConfig::mock(), MockSampler::ideal()).unwrap();
        assert!(matches!(
            runtime.execute(&group),
            Err(QechoError::UnsupportedMeasurement(_))
        ));
    }

    #[test]
    fn test_rectangle_fits_processor_grid() {
        let topo = DiagonalRectangleTopology::new(2, 2);
        let exe = QuantumExecutable::builder()
            .circuit(CircuitBuilder::new(topo.n_qubits()).measure_all("z").build().unwrap())
            .measurement(Measurement::bitstrings(5))
            .problem_topology(topo.clone())
            .build()
            .unwrap();
        let group = ProgramGroup::new(Info::new(), [exe]);

        let config = RuntimeConfig::processor("grid").with_device(5, 5).with_seed(1);
        let mut runtime = QuantumRuntime::new(config, MockSampler::ideal()).unwrap();
        let results = runtime.execute(&group).unwrap();
        assert_eq!(results[0].placement.as_ref().unwrap().len(), topo.n_qubits());
    }

    #[test]
    fn test_measure_qubits_restrict_records() {
        let circuit = CircuitBuilder::new(3)
            .measure(vec![0], "a")
            .measure(vec![1, 2], "b")
            .build()
            .unwrap();
        let exe = QuantumExecutable::builder()
            .circuit(circuit)
            .measurement(Measurement::Bitstrings {
                n_repetitions: 10,
                measure_qubits: Some(vec![2]),
            })
            .build()
            .unwrap();
        let group = ProgramGroup::new(Info::new(), [exe]);

        let mut runtime = QuantumRuntime::new(RuntimeConfig::mock(), MockSampler::ideal()).unwrap();
        let results = runtime.execute(&group).unwrap();

        assert!(results[0].records_for("a").is_none());
        let records = results[0].records_for("b").unwrap();
        assert_eq!(records.len(), 10);
        assert!(records.iter().all(|b| b.len() == 1));
    }

    #[test]
    fn test_measure_qubits_single_key() {
        let exe = QuantumExecutable::builder()
            .circuit(CircuitBuilder::new(3).measure_all("z").build().unwrap())
            .measurement(Measurement::Bitstrings {
                n_repetitions: 5,
                measure_qubits: Some(vec![0]),
            })
            .build()
            .unwrap();
        let group = ProgramGroup::new(Info::new(), [exe]);

        let mut runtime = QuantumRuntime::new(RuntimeConfig::mock(), MockSampler::ideal()).unwrap();
        let results = runtime.execute(&group).unwrap();
        assert_eq!(results[0].records_for("z").unwrap()[0].len(), 1);
    }

    #[test]
    fn test_measure_qubits_must_be_measured() {
        let exe = QuantumExecutable::builder()
            .circuit(CircuitBuilder::new(2).measure(vec![0], "z").build().unwrap())
            .measurement(Measurement::Bitstrings {
                n_repetitions: 5,
                measure_qubits: Some(vec![1]),
            })
            .build()
            .unwrap();
        let group = ProgramGroup::new(Info::new(), [exe]);

        let mut runtime = QuantumRuntime::new(RuntimeConfig::mock(), MockSampler::ideal()).unwrap();
        assert!(matches!(
            runtime.execute(&group),
            Err(QechoError::InvalidMeasurement(_))
        ));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = RuntimeConfig::mock().with_device(0, 0);
        assert!(QuantumRuntime::new(config, MockSampler::ideal()).is_err());
    }
}
