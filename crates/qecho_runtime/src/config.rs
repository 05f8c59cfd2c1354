//! Runtime configuration
//!
//! Gantree: L3_Runtime → RuntimeConfig
//!
//! Runtimes are described by plain values built from factory functions.
//! There are no process-wide runtime instances.

use crate::placer::PlacerConfig;
use qecho_core::{device_grid, GridQubit, QechoError, QechoResult, TopologyGraph};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Processor device grid rows
pub const PROCESSOR_ROWS: usize = 9;

/// Processor device grid columns
pub const PROCESSOR_COLS: usize = 9;

/// Placements considered by processor runtimes
pub const PROCESSOR_TRIALS: usize = 100;

/// Runtime configuration
/// Gantree: RuntimeConfig // 런타임 설정
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Runtime name
    pub name: String,

    /// Target processor, `None` for a mock runtime
    pub processor_id: Option<String>,

    /// Device grid rows
    pub device_rows: usize,

    /// Device grid columns
    pub device_cols: usize,

    /// Placement strategy
    pub placer: PlacerConfig,

    /// Seed for placement choices
    pub seed: Option<u64>,
}

impl RuntimeConfig {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Runtime targeting a named processor
    /// Gantree: processor(id) -> Self // 프로세서 런타임
    pub fn processor(processor_id: &str) -> Self {
        Self {
            name: format!("processor:{}", processor_id),
            processor_id: Some(processor_id.to_string()),
            device_rows: PROCESSOR_ROWS,
            device_cols: PROCESSOR_COLS,
            placer: PlacerConfig::Random {
                trials: PROCESSOR_TRIALS,
            },
            seed: None,
        }
    }

    /// Local mock runtime
    /// Gantree: mock() -> Self // 모의 런타임
    pub fn mock() -> Self {
        Self {
            name: "mock".to_string(),
            processor_id: None,
            device_rows: PROCESSOR_ROWS,
            device_cols: PROCESSOR_COLS,
            placer: PlacerConfig::Naive,
            seed: None,
        }
    }

    // ========================================================================
    // Builder Methods
    // ========================================================================

    /// Set device grid size
    pub fn with_device(mut self, rows: usize, cols: usize) -> Self {
        self.device_rows = rows;
        self.device_cols = cols;
        self
    }

    /// Set placement strategy
    pub fn with_placer(mut self, placer: PlacerConfig) -> Self {
        self.placer = placer;
        self
    }

    /// Set seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set name
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Whether this runtime targets a processor
    pub fn is_processor(&self) -> bool {
        self.processor_id.is_some()
    }

    /// Device coupling graph
    pub fn device_graph(&self) -> TopologyGraph<GridQubit> {
        device_grid(self.device_rows, self.device_cols)
    }

    // ========================================================================
    // Validation
    // ========================================================================

    /// Validate configuration
    pub fn validate(&self) -> QechoResult<()> {
        if self.name.is_empty() {
            return Err(QechoError::ConfigError("name must not be empty".to_string()));
        }

        if let Some(id) = &self.processor_id {
            if id.trim().is_empty() {
                return Err(QechoError::ConfigError(
                    "processor_id must not be empty".to_string(),
                ));
            }
        }

        if self.device_rows == 0 || self.device_cols == 0 {
            return Err(QechoError::ConfigError(format!(
                "device grid must be non-empty, got {}x{}",
                self.device_rows, self.device_cols
            )));
        }

        if let PlacerConfig::Random { trials: 0 } = self.placer {
            return Err(QechoError::ConfigError("trials must be > 0".to_string()));
        }

        Ok(())
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self::mock()
    }
}

impl fmt::Display for RuntimeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RuntimeConfig({}, device={}x{}, placer={})",
            self.name, self.device_rows, self.device_cols, self.placer
        )
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factories() {
        let processor = RuntimeConfig::processor("rainbow");
        assert!(processor.is_processor());
        assert_eq!(processor.name, "processor:rainbow");
        assert!(matches!(processor.placer, PlacerConfig::Random { .. }));
        assert!(processor.validate().is_ok());

        let mock = RuntimeConfig::mock();
        assert!(!mock.is_processor());
        assert_eq!(mock.placer, PlacerConfig::Naive);
        assert!(mock.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = RuntimeConfig::mock().with_device(3, 4).with_seed(5);
        assert_eq!(config.device_graph().node_count(), 12);
        assert_eq!(config.seed, Some(5));
    }

    #[test]
    fn test_validation() {
        assert!(RuntimeConfig::mock().with_device(0, 3).validate().is_err());
        assert!(RuntimeConfig::processor(" ").validate().is_err());
        assert!(RuntimeConfig::mock()
            .with_placer(PlacerConfig::Random { trials: 0 })
            .validate()
            .is_err());
        assert!(RuntimeConfig::mock().with_name("").validate().is_err());
    }

    #[test]
    fn test_serde_defaults() {
        let config: RuntimeConfig =
            serde_json::from_str(r#"{"name": "bench", "device_rows": 2}"#).unwrap();
        assert_eq!(config.name, "bench");
        assert_eq!(config.device_rows, 2);
        assert_eq!(config.device_cols, PROCESSOR_COLS);
        assert_eq!(config.placer, PlacerConfig::Naive);
    }
}
