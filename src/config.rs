//! Application-level configuration loading: search, extraction and training tunables.

use std::{env, fs, io::ErrorKind, path::PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

use crate::engine::{
    extractor::ExtractorConfig, features::PALETTE_SLOTS, model::TrainingParams,
    search::CandidateSearch,
};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "SWATCHWISE_CONFIG_PATH";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    /// Random candidates drawn per `/generate` once the model is trusted.
    pub trial_budget: usize,
    /// Usable feedback records required before probabilities are reported.
    pub min_feedback: usize,
    /// Colors per generated palette.
    pub palette_size: usize,
    /// Directory where uploaded images are kept and served from.
    pub upload_dir: PathBuf,
    /// Request body limit for `/upload`.
    pub max_upload_bytes: usize,
    /// Image palette extraction tunables.
    pub extractor: ExtractorConfig,
    /// Logistic regression hyperparameters.
    pub training: TrainingParams,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to built-in defaults.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match Self::from_json(&contents) {
                Ok(config) => {
                    info!(
                        path = %path.display(),
                        trial_budget = config.trial_budget,
                        min_feedback = config.min_feedback,
                        "loaded config"
                    );
                    config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    /// Parse a JSON document; missing keys keep their defaults.
    pub fn from_json(contents: &str) -> Result<Self, serde_json::Error> {
        let mut config: Self = serde_json::from_str(contents)?;
        let clamped = config.palette_size.clamp(1, PALETTE_SLOTS);
        if clamped != config.palette_size {
            warn!(
                requested = config.palette_size,
                used = clamped,
                "palette_size out of range; clamping"
            );
            config.palette_size = clamped;
        }
        Ok(config)
    }

    /// Candidate search built from the configured budget and thresholds.
    pub fn candidate_search(&self) -> CandidateSearch {
        CandidateSearch::new(self.trial_budget, self.min_feedback, self.palette_size)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            trial_budget: 15,
            min_feedback: 15,
            palette_size: PALETTE_SLOTS,
            upload_dir: PathBuf::from("uploads"),
            max_upload_bytes: 16 * 1024 * 1024,
            extractor: ExtractorConfig::default(),
            training: TrainingParams::default(),
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_document_keeps_defaults() {
        let config =
            AppConfig::from_json(r#"{"trial_budget": 30, "training": {"epochs": 10}}"#).unwrap();
        assert_eq!(config.trial_budget, 30);
        assert_eq!(config.min_feedback, 15);
        assert_eq!(config.training.epochs, 10);
        assert_eq!(config.training.learning_rate, 0.5);
        assert_eq!(config.extractor.seed, 42);
        assert_eq!(config.upload_dir, PathBuf::from("uploads"));
    }

    #[test]
    fn palette_size_is_clamped() {
        assert_eq!(
            AppConfig::from_json(r#"{"palette_size": 9}"#)
                .unwrap()
                .palette_size,
            PALETTE_SLOTS
        );
        assert_eq!(
            AppConfig::from_json(r#"{"palette_size": 0}"#)
                .unwrap()
                .palette_size,
            1
        );
    }

    #[test]
    fn malformed_document_is_an_error() {
        assert!(AppConfig::from_json("{ not json").is_err());
    }
}
