//! PBooster settings file (pbooster.toml)
//!
//! Every field is optional; missing sections fall back to the defaults in
//! `pbooster_core::constants`. Command-line flags override the file.

use anyhow::{Context, Result};
use pbooster_core::constants::{
    DEFAULT_MAX_ITERATIONS, DEFAULT_POPULATION_LAMBDA, DEFAULT_POPULATION_USER, DEFAULT_TARGET_USER,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default settings file name, looked up in the current directory
pub const SETTINGS_FILE: &str = "pbooster.toml";

/// Settings loaded from pbooster.toml
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Local search parameters
    pub search: SearchSettings,

    /// Experiment selection
    pub experiment: ExperimentSettings,
}

/// `[search]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Pass cap before the search reports non-termination
    pub max_iterations: usize,

    /// Overrides the dataset's `Epsilon:` line when set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub epsilon: Option<f64>,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            epsilon: None,
        }
    }
}

/// `[experiment]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentSettings {
    /// User swept over every lambda
    pub target_user: String,

    /// User group swept at a single lambda
    pub population_user: String,

    /// Lambda for the population sweep
    pub population_lambda: f64,
}

impl Default for ExperimentSettings {
    fn default() -> Self {
        Self {
            target_user: DEFAULT_TARGET_USER.to_string(),
            population_user: DEFAULT_POPULATION_USER.to_string(),
            population_lambda: DEFAULT_POPULATION_LAMBDA,
        }
    }
}

impl Settings {
    /// Parse settings from a TOML string
    pub fn parse(content: &str) -> Result<Self> {
        let settings: Settings = toml::from_str(content).context("Failed to parse settings")?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a file path
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Invalid settings in {}", path.display()))
    }

    /// Resolve settings: an explicit path must exist, otherwise
    /// `pbooster.toml` in `dir` is used when present, else defaults
    pub fn load(explicit: Option<&Path>, dir: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            tracing::debug!("Loading settings from {}", path.display());
            return Self::from_file(path);
        }

        let default_path = dir.join(SETTINGS_FILE);
        if default_path.exists() {
            tracing::debug!("Loading settings from {}", default_path.display());
            Self::from_file(&default_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Serialize settings to a TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize settings")
    }

    /// Epsilon to use given the dataset's value
    pub fn epsilon_or(&self, dataset_epsilon: f64) -> f64 {
        self.search.epsilon.unwrap_or(dataset_epsilon)
    }

    fn validate(&self) -> Result<()> {
        if self.search.max_iterations == 0 {
            anyhow::bail!("search.max_iterations must be greater than zero");
        }
        if let Some(eps) = self.search.epsilon {
            if !(eps.is_finite() && eps > 0.0) {
                anyhow::bail!("search.epsilon must be a positive number, got {}", eps);
            }
        }
        if !(self.experiment.population_lambda.is_finite() && self.experiment.population_lambda >= 0.0) {
            anyhow::bail!(
                "experiment.population_lambda must be non-negative, got {}",
                self.experiment.population_lambda
            );
        }
        Ok(())
    }
}
