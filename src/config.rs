use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{QuizError, Result};
use crate::model::{FitOptions, LayerSpec, default_hidden_layers};

/// Name of the per-project config file looked up in the working directory.
pub const PROJECT_CONFIG_FILE: &str = "majorquiz.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub classifier: ClassifierConfig,
    #[serde(default)]
    pub training: TrainingConfig,
}

impl Config {
    /// Defaults, then the global and project files (or only the explicit
    /// file), then `MQ_*` environment overrides. The result is validated.
    pub fn load(explicit_path: Option<&Path>, project_dir: &Path) -> Result<Self> {
        let mut config = Self::default();

        let explicit = explicit_path
            .map(PathBuf::from)
            .or_else(|| std::env::var("MQ_CONFIG").ok().map(PathBuf::from));

        if let Some(path) = explicit {
            let patch = Self::load_patch(&path)?.ok_or_else(|| {
                QuizError::MissingConfig(format!("config file {} does not exist", path.display()))
            })?;
            config.merge_patch(patch);
        } else {
            if let Some(global) = Self::load_global()? {
                config.merge_patch(global);
            }
            if let Some(project) = Self::load_patch(&project_dir.join(PROJECT_CONFIG_FILE))? {
                config.merge_patch(project);
            }
        }

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    fn load_global() -> Result<Option<ConfigPatch>> {
        match dirs::config_dir() {
            Some(dir) => Self::load_patch(&dir.join("majorquiz/config.toml")),
            None => Ok(None),
        }
    }

    fn load_patch(path: &Path) -> Result<Option<ConfigPatch>> {
        if !path.exists() {
            return Ok(None);
        }

        let raw = std::fs::read_to_string(path)
            .map_err(|err| QuizError::Config(format!("read config {}: {err}", path.display())))?;
        let patch = toml::from_str(&raw)
            .map_err(|err| QuizError::Config(format!("parse config {}: {err}", path.display())))?;
        Ok(Some(patch))
    }

    fn merge_patch(&mut self, patch: ConfigPatch) {
        if let Some(patch) = patch.database {
            self.database.merge(patch);
        }
        if let Some(patch) = patch.classifier {
            self.classifier.merge(patch);
        }
        if let Some(patch) = patch.training {
            self.training.merge(patch);
        }
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(value) = var("MQ_DB_PATH") {
            self.database.path = PathBuf::from(value);
        }

        if let Some(value) = parse_var(&var, "MQ_EPOCHS")? {
            self.training.epochs = value;
        }
        if let Some(value) = parse_var(&var, "MQ_BATCH_SIZE")? {
            self.training.batch_size = value;
        }
        if let Some(value) = parse_var(&var, "MQ_VERBOSITY")? {
            self.training.verbosity = value;
        }

        if let Some(value) = parse_var(&var, "MQ_LEARNING_RATE")? {
            self.classifier.learning_rate = value;
        }
        if let Some(value) = parse_var(&var, "MQ_SEED")? {
            self.classifier.seed = value;
        }
        if let Some(value) = var("MQ_HIDDEN_LAYERS") {
            self.classifier.hidden_layers = parse_layers(&value)?;
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.training.epochs == 0 {
            return Err(QuizError::Config("training.epochs must be at least 1".to_string()));
        }
        if self.training.batch_size == 0 {
            return Err(QuizError::Config(
                "training.batch_size must be at least 1".to_string(),
            ));
        }
        if let Some(layer) = self.classifier.hidden_layers.iter().find(|l| l.units == 0) {
            return Err(QuizError::Config(format!(
                "classifier.hidden_layers: layer {layer} has no units"
            )));
        }
        let rate = self.classifier.learning_rate;
        if !rate.is_finite() || rate <= 0.0 {
            return Err(QuizError::Config(format!(
                "classifier.learning_rate must be a positive number, got {rate}"
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        let base = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
        Self {
            path: base.join("majorquiz").join("quiz.db"),
        }
    }
}

impl DatabaseConfig {
    fn merge(&mut self, patch: DatabasePatch) {
        if let Some(value) = patch.path {
            self.path = value;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub hidden_layers: Vec<LayerSpec>,
    pub learning_rate: f64,
    pub seed: u64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            hidden_layers: default_hidden_layers(),
            learning_rate: 0.001,
            seed: 42,
        }
    }
}

impl ClassifierConfig {
    fn merge(&mut self, patch: ClassifierPatch) {
        if let Some(value) = patch.hidden_layers {
            self.hidden_layers = value;
        }
        if let Some(value) = patch.learning_rate {
            self.learning_rate = value;
        }
        if let Some(value) = patch.seed {
            self.seed = value;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    pub epochs: u32,
    pub batch_size: usize,
    /// 0 silent, 1 progress bar, 2 one log line per epoch.
    pub verbosity: u8,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        let options = FitOptions::default();
        Self {
            epochs: options.epochs,
            batch_size: options.batch_size,
            verbosity: options.verbosity,
        }
    }
}

impl TrainingConfig {
    fn merge(&mut self, patch: TrainingPatch) {
        if let Some(value) = patch.epochs {
            self.epochs = value;
        }
        if let Some(value) = patch.batch_size {
            self.batch_size = value;
        }
        if let Some(value) = patch.verbosity {
            self.verbosity = value;
        }
    }

    #[must_use]
    pub const fn fit_options(&self) -> FitOptions {
        FitOptions {
            epochs: self.epochs,
            batch_size: self.batch_size,
            verbosity: self.verbosity,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ConfigPatch {
    pub database: Option<DatabasePatch>,
    pub classifier: Option<ClassifierPatch>,
    pub training: Option<TrainingPatch>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct DatabasePatch {
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ClassifierPatch {
    pub hidden_layers: Option<Vec<LayerSpec>>,
    pub learning_rate: Option<f64>,
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct TrainingPatch {
    pub epochs: Option<u32>,
    pub batch_size: Option<usize>,
    pub verbosity: Option<u8>,
}

fn parse_var<T>(var: impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match var(key) {
        Some(value) => value
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|err| QuizError::Config(format!("invalid {key} value {value}: {err}"))),
        None => Ok(None),
    }
}

/// Parse `"100:relu,50:relu"`. An empty string means no hidden layers.
pub fn parse_layers(value: &str) -> Result<Vec<LayerSpec>> {
    value
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(LayerSpec::from_str)
        .collect()
}
