//! Pipeline configuration contracts that can be shared across crates.

use serde::{Deserialize, Serialize};

use crate::PipelineError;

/// Sync pipeline configuration
///
/// Processors and camera sets are passed alongside this at construction;
/// this struct carries only the scalar knobs so it can live in a config
/// file or be built programmatically.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Number of worker threads (must be >= 1)
    pub num_workers: usize,

    /// Maximum |timestamp difference| in nanoseconds for matching a frame
    /// to an existing bundle instead of opening a new one (must be >= 0)
    pub tolerance_ns: i64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            num_workers: 2,
            tolerance_ns: 1_000_000,
        }
    }
}

impl PipelineConfig {
    /// Validate scalar fields, independent of processors and camera sets
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.num_workers == 0 {
            return Err(PipelineError::invalid_configuration(
                "num_workers",
                "worker count must be at least 1",
            ));
        }
        if self.tolerance_ns < 0 {
            return Err(PipelineError::invalid_configuration(
                "tolerance_ns",
                "timestamp tolerance must be non-negative",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(PipelineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_workers_rejected() {
        let config = PipelineConfig {
            num_workers: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(PipelineError::InvalidConfiguration { ref field, .. }) if field == "num_workers"
        ));
    }

    #[test]
    fn test_negative_tolerance_rejected() {
        let config = PipelineConfig {
            tolerance_ns: -1,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_serde_roundtrip() {
        let config = PipelineConfig {
            num_workers: 4,
            tolerance_ns: 500_000,
        };
        let json = serde_json::to_string(&config).unwrap();
        let parsed: PipelineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.num_workers, 4);
        assert_eq!(parsed.tolerance_ns, 500_000);
    }
}
