//! TOML-based application configuration.
//!
//! Holds settings only, never session state:
//! - Which presentation variant to run (wizard or chat)
//! - Validation thresholds
//! - Insight/typing/analysis pacing
//! - Optional RNG seed and custom content document
//!
//! Looked up at `~/.config/pmfcheck/config.toml` unless a path is given.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::analysis::{AnalysisTiming, DEFAULT_FACT_INTERVAL_MS};
use crate::assessment::Variant;
use crate::error::ConfigError;

/// Session behaviour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentConfig {
    #[serde(default)]
    pub variant: Variant,
    /// Minimum trimmed length of a free-text answer, inclusive.
    #[serde(default = "default_min_answer_chars")]
    pub min_answer_chars: usize,
    /// Fixed seed for insight selection; entropy when absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Pacing of the timed transitions, in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Wizard: how long an insight stays up before the next question.
    #[serde(default = "default_insight_delay")]
    pub insight_delay_ms: u64,
    /// Chat: typing indicator before a bot reply.
    #[serde(default = "default_typing_delay")]
    pub typing_delay_ms: u64,
    /// Chat: typing before the opening greeting.
    #[serde(default = "default_greeting_delay")]
    pub greeting_delay_ms: u64,
    /// Chat: typing between the greeting and the category prompt.
    #[serde(default = "default_category_prompt_delay")]
    pub category_prompt_delay_ms: u64,
    /// Chat: typing between the category reply and the first question.
    #[serde(default = "default_question_lead_in")]
    pub question_lead_in_ms: u64,
    /// Chat: typing between the email submission and the unlocked report.
    #[serde(default = "default_unlock_delay")]
    pub unlock_delay_ms: u64,
    /// Chat: pause after an insight before the next question.
    #[serde(default = "default_chat_insight_delay")]
    pub chat_insight_delay_ms: u64,
    /// Chat: pause after the last insight before the analysis starts.
    #[serde(default = "default_final_delay")]
    pub final_delay_ms: u64,
    #[serde(default = "default_analysis_duration")]
    pub analysis_duration_ms: u64,
    #[serde(default = "default_analysis_settle")]
    pub analysis_settle_ms: u64,
    #[serde(default = "default_fact_interval")]
    pub fact_interval_ms: u64,
    /// Use the row-by-row checklist loader with this many rows instead of the
    /// progress-bar loader.
    #[serde(default)]
    pub analysis_table_rows: Option<u64>,
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Alternative content document (TOML or JSON).
    #[serde(default)]
    pub content_path: Option<PathBuf>,
    #[serde(default)]
    pub assessment: AssessmentConfig,
    #[serde(default)]
    pub timing: TimingConfig,
}

// Default functions
fn default_min_answer_chars() -> usize {
    10
}
fn default_insight_delay() -> u64 {
    2_000
}
fn default_typing_delay() -> u64 {
    1_200
}
fn default_greeting_delay() -> u64 {
    800
}
fn default_category_prompt_delay() -> u64 {
    600
}
fn default_question_lead_in() -> u64 {
    800
}
fn default_unlock_delay() -> u64 {
    800
}
fn default_chat_insight_delay() -> u64 {
    3_000
}
fn default_final_delay() -> u64 {
    2_000
}
fn default_analysis_duration() -> u64 {
    8_000
}
fn default_analysis_settle() -> u64 {
    400
}
fn default_fact_interval() -> u64 {
    DEFAULT_FACT_INTERVAL_MS
}

impl Default for AssessmentConfig {
    fn default() -> Self {
        Self {
            variant: Variant::default(),
            min_answer_chars: default_min_answer_chars(),
            seed: None,
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            insight_delay_ms: default_insight_delay(),
            typing_delay_ms: default_typing_delay(),
            greeting_delay_ms: default_greeting_delay(),
            category_prompt_delay_ms: default_category_prompt_delay(),
            question_lead_in_ms: default_question_lead_in(),
            unlock_delay_ms: default_unlock_delay(),
            chat_insight_delay_ms: default_chat_insight_delay(),
            final_delay_ms: default_final_delay(),
            analysis_duration_ms: default_analysis_duration(),
            analysis_settle_ms: default_analysis_settle(),
            fact_interval_ms: default_fact_interval(),
            analysis_table_rows: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            content_path: None,
            assessment: AssessmentConfig::default(),
            timing: TimingConfig::default(),
        }
    }
}

impl TimingConfig {
    pub fn analysis(&self) -> AnalysisTiming {
        match self.analysis_table_rows {
            Some(rows) => AnalysisTiming {
                fact_interval_ms: self.fact_interval_ms,
                ..AnalysisTiming::table(rows)
            },
            None => AnalysisTiming {
                duration_ms: self.analysis_duration_ms,
                settle_ms: self.analysis_settle_ms,
                fact_interval_ms: self.fact_interval_ms,
            },
        }
    }
}

impl Config {
    /// Config for the given variant, everything else default.
    pub fn for_variant(variant: Variant) -> Self {
        let mut cfg = Self::default();
        cfg.assessment.variant = variant;
        cfg
    }

    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    /// Reject values the engine cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.assessment.min_answer_chars == 0 {
            return Err(ConfigError::InvalidValue {
                key: "assessment.min_answer_chars".into(),
                message: "must be at least 1".into(),
            });
        }
        if self.timing.fact_interval_ms == 0 {
            return Err(ConfigError::InvalidValue {
                key: "timing.fact_interval_ms".into(),
                message: "must be greater than 0".into(),
            });
        }
        if self.timing.analysis_table_rows.is_none() && self.timing.analysis_duration_ms == 0 {
            return Err(ConfigError::InvalidValue {
                key: "timing.analysis_duration_ms".into(),
                message: "must be greater than 0".into(),
            });
        }
        Ok(())
    }

    /// `~/.config/pmfcheck/config.toml`, or `pmfcheck-dev` when
    /// `PMFCHECK_ENV=dev`.
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let base = dirs::home_dir()
            .ok_or(ConfigError::NoConfigDir)?
            .join(".config");

        let env = std::env::var("PMFCHECK_ENV").unwrap_or_else(|_| "production".to_string());
        let dir = if env == "dev" {
            base.join("pmfcheck-dev")
        } else {
            base.join("pmfcheck")
        };
        Ok(dir.join("config.toml"))
    }

    /// Parse and validate a config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or holds values
    /// that fail [`Config::validate`].
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let cfg: Config = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load `path` (or the default path) when the file exists, default
    /// otherwise. Missing files are not created.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match Self::default_path() {
                Ok(p) => p,
                Err(_) => return Ok(Self::default()),
            },
        };
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Write as pretty TOML, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_err = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_err(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| save_err(e.to_string()))?;
        }
        std::fs::write(path, content).map_err(|e| save_err(e.to_string()))
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}
