//! Samplers and measurement records
//!
//! Gantree: L3_Runtime → Sampler
//!
//! A sampler runs a frozen circuit for a number of repetitions and returns
//! one bitstring per repetition for every measurement key in the circuit.

use qecho_core::{Bitstring, FrozenCircuit, Gate, Probability, QechoError, QechoResult};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ============================================================================
// SampleResult
// ============================================================================

/// Measurement records keyed by measurement key
/// Gantree: SampleResult // 샘플링 결과
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SampleResult {
    /// Repetitions that were run
    pub repetitions: u64,

    /// One bitstring per repetition, per key
    pub records: BTreeMap<String, Vec<Bitstring>>,
}

impl SampleResult {
    /// Create an empty result
    pub fn new(repetitions: u64) -> Self {
        Self {
            repetitions,
            records: BTreeMap::new(),
        }
    }

    /// Records for one key
    pub fn get(&self, key: &str) -> Option<&[Bitstring]> {
        self.records.get(key).map(Vec::as_slice)
    }

    /// Measurement keys in order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }
}

impl fmt::Display for SampleResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SampleResult(repetitions={}, keys={})",
            self.repetitions,
            self.records.len()
        )
    }
}

// ============================================================================
// Sampler Trait
// ============================================================================

/// Anything that can sample a frozen circuit
/// Gantree: Sampler // 샘플러 인터페이스
pub trait Sampler {
    /// Sampler name
    fn name(&self) -> &str;

    /// Run `circuit` `repetitions` times
    /// Gantree: run(circuit, repetitions) -> Result<SampleResult>
    fn run(&mut self, circuit: &FrozenCircuit, repetitions: u64) -> QechoResult<SampleResult>;

    /// Whether results come from a model rather than hardware
    fn is_simulator(&self) -> bool {
        true
    }
}

// ============================================================================
// MockSampler
// ============================================================================

/// Sampler that treats every circuit as a perfect echo
/// Gantree: MockSampler // 모의 샘플러
///
/// Every measured qubit reads `0`, then each bit flips independently with
/// the readout error probability.
#[derive(Debug, Clone)]
pub struct MockSampler {
    name: String,
    readout_error: Probability,
    seed: Option<u64>,
    rng: StdRng,
}

impl MockSampler {
    /// Noiseless mock
    pub fn ideal() -> Self {
        Self {
            name: "mock".to_string(),
            readout_error: Probability::ZERO,
            seed: None,
            rng: StdRng::from_entropy(),
        }
    }

    /// Mock with readout bit flips
    pub fn with_readout_error(p: f64) -> QechoResult<Self> {
        Ok(Self {
            readout_error: Probability::new(p)?,
            ..Self::ideal()
        })
    }

    /// Set seed for reproducibility
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Set sampler name
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    /// Readout flip probability
    pub fn readout_error(&self) -> Probability {
        self.readout_error
    }

    /// Seed, if one was set
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    fn sample_bits(&mut self, width: usize) -> Bitstring {
        let p = self.readout_error.value();
        if p == 0.0 {
            return Bitstring::zeros(width);
        }
        Bitstring::new((0..width).map(|_| self.rng.gen_bool(p)).collect())
    }
}

impl Default for MockSampler {
    fn default() -> Self {
        Self::ideal()
    }
}

impl Sampler for MockSampler {
    fn name(&self) -> &str {
        &self.name
    }

    fn run(&mut self, circuit: &FrozenCircuit, repetitions: u64) -> QechoResult<SampleResult> {
        if repetitions == 0 {
            return Err(QechoError::SamplerError(
                "repetitions must be > 0".to_string(),
            ));
        }

        let measurements: Vec<(&str, usize)> = circuit
            .gates()
            .iter()
            .filter_map(|gate| match gate {
                Gate::Measure(qubits, key) => Some((key.as_str(), qubits.len())),
                _ => None,
            })
            .collect();

        if measurements.is_empty() {
            return Err(QechoError::SamplerError(
                "circuit has no measurements".to_string(),
            ));
        }

        let mut result = SampleResult::new(repetitions);
        for (key, width) in measurements {
            let records: Vec<Bitstring> =
                (0..repetitions).map(|_| self.sample_bits(width)).collect();
            result.records.insert(key.to_string(), records);
        }

        Ok(result)
    }
}

// ============================================================================
// Tests
// ============================================================================
