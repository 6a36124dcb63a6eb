//! Analyzer configuration.
//!
//! One explicit value carries every tunable threshold and is handed to each
//! component at construction, so tests can vary thresholds independently.
//! Metric status bands are fixed and live in [`crate::metrics`] instead.

pub mod presets;
pub mod thresholds;
pub mod validation;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

pub use presets::GodClassPreset;
pub use thresholds::SmellThresholds;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    #[serde(default)]
    pub smells: SmellThresholds,

    #[serde(default)]
    pub god_class_preset: GodClassPreset,

    /// Run the syntax-tree smell strategy in addition to the threshold rules.
    #[serde(default = "default_structural_strategy")]
    pub structural_strategy: bool,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            smells: SmellThresholds::default(),
            god_class_preset: GodClassPreset::default(),
            structural_strategy: default_structural_strategy(),
        }
    }
}

fn default_structural_strategy() -> bool {
    true
}

impl AnalyzerConfig {
    /// Parse a TOML document and validate it.
    ///
    /// ```rust
    /// use smellmap::config::{AnalyzerConfig, GodClassPreset};
    ///
    /// let config = AnalyzerConfig::from_toml_str(
    ///     "god_class_preset = \"lenient\"\n[smells]\nlong_method_lines = 60\n",
    /// )
    /// .unwrap();
    /// assert_eq!(config.god_class_preset, GodClassPreset::Lenient);
    /// assert_eq!(config.smells.long_method_lines, 60);
    /// assert_eq!(config.smells.god_class_loc, 200);
    /// ```
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config = toml::from_str::<AnalyzerConfig>(contents)?;
        config.validate()?;
        log::debug!("Loaded analyzer config: preset {:?}", config.god_class_preset);
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validation::validate_config(self)
    }

    pub fn with_preset(mut self, preset: GodClassPreset) -> Self {
        self.god_class_preset = preset;
        self
    }
}
