// src/config.rs
//! Tunables for the edit engine and service.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::geometry::{EPSILON, MAX_ADJACENT_SNAP_DISTANCE};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid setting '{key}': {reason}")]
    Invalid { key: &'static str, reason: &'static str },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// Undo depth. 0 disables history.
    pub history_max_depth: usize,
    pub max_transaction_commands: usize,
    pub max_adjacent_snap_distance: f64,
    /// Tolerance for vertex reuse and collinearity.
    pub epsilon: f64,
    /// Offset applied to `x` and `y` when cloning lights, particles and entities.
    pub clone_offset: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_max_depth: 100,
            max_transaction_commands: 100,
            max_adjacent_snap_distance: MAX_ADJACENT_SNAP_DISTANCE,
            epsilon: EPSILON,
            clone_offset: 16.0,
        }
    }
}

impl EditorConfig {
    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.epsilon.is_finite() && self.epsilon > 0.0) {
            return Err(ConfigError::Invalid {
                key: "epsilon",
                reason: "must be a positive finite number",
            });
        }
        if !(self.max_adjacent_snap_distance.is_finite() && self.max_adjacent_snap_distance >= 0.0) {
            return Err(ConfigError::Invalid {
                key: "maxAdjacentSnapDistance",
                reason: "must be a non-negative finite number",
            });
        }
        if !self.clone_offset.is_finite() {
            return Err(ConfigError::Invalid {
                key: "cloneOffset",
                reason: "must be finite",
            });
        }
        Ok(())
    }
}
