//! Qubit placement onto a device
//!
//! Gantree: L3_Runtime → Placer
//!
//! A placer decides which device qubits carry an executable's logical
//! qubits. The answer is listed in the problem topology's qubit order.

use qecho_core::{GridQubit, ProblemTopology, QechoError, QechoResult, TopologyGraph};
use qecho_exec::QuantumExecutable;
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Device qubits for logical qubits `0..n`, or `None` for no remapping
pub type DevicePlacement = Option<Vec<GridQubit>>;

// ============================================================================
// QubitPlacer Trait
// ============================================================================

/// Placement strategy
/// Gantree: QubitPlacer // 배치 인터페이스
pub trait QubitPlacer {
    /// Strategy name
    fn name(&self) -> &str;

    /// Choose device qubits for `executable`
    /// Gantree: place(executable, device, rng) -> Result<DevicePlacement>
    fn place(
        &mut self,
        executable: &QuantumExecutable,
        device: &TopologyGraph<GridQubit>,
        rng: &mut StdRng,
    ) -> QechoResult<DevicePlacement>;
}

// ============================================================================
// NaivePlacer
// ============================================================================

/// Runs circuits on their own qubit indices
#[derive(Debug, Clone, Copy, Default)]
pub struct NaivePlacer;

impl QubitPlacer for NaivePlacer {
    fn name(&self) -> &str {
        "naive"
    }

    fn place(
        &mut self,
        _executable: &QuantumExecutable,
        _device: &TopologyGraph<GridQubit>,
        _rng: &mut StdRng,
    ) -> QechoResult<DevicePlacement> {
        Ok(None)
    }
}

// ============================================================================
// RandomPlacer
// ============================================================================

/// Picks uniformly among up to `trials` distinct placements
/// Gantree: RandomPlacer // 무작위 배치
///
/// Placements are searched once per topology and cached.
#[derive(Debug, Clone)]
pub struct RandomPlacer {
    trials: usize,
    cache: HashMap<ProblemTopology, Vec<Vec<GridQubit>>>,
}

impl RandomPlacer {
    /// Create a placer considering at most `trials` placements
    pub fn new(trials: usize) -> QechoResult<Self> {
        if trials == 0 {
            return Err(QechoError::ConfigError("trials must be > 0".to_string()));
        }
        Ok(Self {
            trials,
            cache: HashMap::new(),
        })
    }

    /// Maximum placements considered
    pub fn trials(&self) -> usize {
        self.trials
    }

    fn candidates(
        &mut self,
        topology: &ProblemTopology,
        device: &TopologyGraph<GridQubit>,
    ) -> QechoResult<&[Vec<GridQubit>]> {
        if !self.cache.contains_key(topology) {
            let mut placements = topology.placements_in(device)?;
            placements.truncate(self.trials);
            log::debug!(
                "{}: {} candidate placements on {}-qubit device",
                topology,
                placements.len(),
                device.node_count()
            );
            self.cache.insert(topology.clone(), placements);
        }
        Ok(self
            .cache
            .get(topology)
            .map(Vec::as_slice)
            .unwrap_or_default())
    }
}

impl QubitPlacer for RandomPlacer {
    fn name(&self) -> &str {
        "random"
    }

    fn place(
        &mut self,
        executable: &QuantumExecutable,
        device: &TopologyGraph<GridQubit>,
        rng: &mut StdRng,
    ) -> QechoResult<DevicePlacement> {
        let topology = executable.problem_topology().ok_or_else(|| {
            QechoError::InvalidTopology(
                "random placement needs an executable with a problem topology".to_string(),
            )
        })?;

        let candidates = self.candidates(topology, device)?;
        if candidates.is_empty() {
            return Err(QechoError::NoPlacement {
                topology: topology.name(),
            });
        }

        let chosen = rng.gen_range(0..candidates.len());
        Ok(Some(candidates[chosen].clone()))
    }
}

// ============================================================================
// PlacerConfig
// ============================================================================

/// Serializable placer choice
/// Gantree: PlacerConfig // 배치 설정
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlacerConfig {
    /// No remapping
    #[default]
    Naive,
    /// Random among distinct placements
    Random {
        /// Maximum placements considered
        trials: usize,
    },
}

impl PlacerConfig {
    /// Build the placer
    pub fn build(&self) -> QechoResult<Box<dyn QubitPlacer>> {
        Ok(match *self {
            PlacerConfig::Naive => Box::new(NaivePlacer),
            PlacerConfig::Random { trials } => Box::new(RandomPlacer::new(trials)?),
        })
    }
}

impl fmt::Display for PlacerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlacerConfig::Naive => write!(f, "naive"),
            PlacerConfig::Random { trials } => write!(f, "random(trials={})", trials),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
