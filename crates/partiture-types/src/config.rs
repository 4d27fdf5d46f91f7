//! Pipeline configuration
//!
//! Settings for the schedule resolver and the partiture compiler. Every field has
//! a default, so an empty TOML document is a valid configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration value for '{field}': {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Top-level configuration for a compile pipeline
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub resolver: ResolverConfig,
    pub compiler: CompilerConfig,
}

/// Schedule resolver settings
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Fail on relations with no resolution-table entry instead of falling
    /// back to Switching
    pub strict: bool,
}

/// Smallest accepted depth decay. Decay raised to the deepest edge depth a
/// parsed tree can reach stays a normal float.
pub const MIN_DEPTH_DECAY: f64 = 0.01;

/// Partiture compiler settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// Weight multiplier applied once per nesting level, in [0.01, 1]
    pub depth_decay: f64,

    /// Base orbital period, in evaluation steps
    pub orbital_period: f64,

    /// Base drag damping coefficient
    pub drag_damping: f64,

    /// Base switching interval, in evaluation steps
    pub switch_interval: u64,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            depth_decay: 0.5,
            orbital_period: 100.0,
            drag_damping: 0.5,
            switch_interval: 50,
        }
    }
}

impl CompilerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_DEPTH_DECAY..=1.0).contains(&self.depth_decay) {
            return Err(ConfigError::Invalid {
                field: "compiler.depth_decay",
                reason: format!("{} is outside [{}, 1]", self.depth_decay, MIN_DEPTH_DECAY),
            });
        }
        if !(self.orbital_period.is_finite() && self.orbital_period > 0.0) {
            return Err(ConfigError::Invalid {
                field: "compiler.orbital_period",
                reason: format!("{} is not a positive number", self.orbital_period),
            });
        }
        if !(self.drag_damping.is_finite() && self.drag_damping >= 0.0) {
            return Err(ConfigError::Invalid {
                field: "compiler.drag_damping",
                reason: format!("{} is not a non-negative number", self.drag_damping),
            });
        }
        if self.switch_interval == 0 {
            return Err(ConfigError::Invalid {
                field: "compiler.switch_interval",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

impl PipelineConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: PipelineConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.compiler.validate()
    }

    /// Same configuration with strict resolution switched on or off
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.resolver.strict = strict;
        self
    }
}
