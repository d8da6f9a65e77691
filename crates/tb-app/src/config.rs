//! FCirc run configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tb_core::units::{Time, minutes};

use crate::error::{AppError, AppResult};

pub const DEFAULT_STEADY_STATE_THRESHOLD_MIN: f64 = 150.0;

/// Options for an FCirc run. Every field is optional in the YAML file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FCircConfig {
    /// Serum collected earlier than this is flagged as possibly pre-steady-state.
    pub steady_state_threshold_min: f64,
    pub parallel: bool,
    pub calculator_version: String,
    pub use_cache: bool,
}

impl Default for FCircConfig {
    fn default() -> Self {
        Self {
            steady_state_threshold_min: DEFAULT_STEADY_STATE_THRESHOLD_MIN,
            parallel: true,
            calculator_version: env!("CARGO_PKG_VERSION").to_string(),
            use_cache: true,
        }
    }
}

impl FCircConfig {
    pub fn load(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| AppError::FileRead {
            what: "config",
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: FCircConfig = serde_yaml::from_str(&content)
            .map_err(|e| AppError::Config(format!("Failed to parse config YAML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> AppResult<()> {
        let t = self.steady_state_threshold_min;
        if !t.is_finite() || t < 0.0 {
            return Err(AppError::Config(format!(
                "steady_state_threshold_min must be finite and non-negative, got {t}"
            )));
        }
        if self.calculator_version.trim().is_empty() {
            return Err(AppError::Config(
                "calculator_version must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn steady_state_threshold(&self) -> Time {
        minutes(self.steady_state_threshold_min)
    }

    /// Settings that change the produced table. Evaluation mode and caching
    /// do not.
    pub fn fingerprint(&self) -> String {
        format!(
            "steady_state_threshold_min={}",
            self.steady_state_threshold_min
        )
    }
}
