use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::work::AnnotationValue;

/// Errors raised while loading or validating a [`PipelineConfig`].
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    /// The configuration parsed but is unusable.
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "Config IO error: {e}"),
            ConfigError::Parse(e) => write!(f, "Config parse error: {e}"),
            ConfigError::Invalid(s) => write!(f, "Invalid config: {s}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
            ConfigError::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::Io(err)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err)
    }
}

/// Parameters of one annotate → select → follow up → report run.
///
/// The defaults describe the classic walkthrough: tag every passage with
/// its sentiment, then dig into the negative ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Tool applied to every item in the first pass.
    pub pass1_tool: String,
    /// Annotation key the filter looks at.
    pub filter_key: String,
    /// Value the annotation must equal exactly.
    pub filter_value: AnnotationValue,
    /// Tools applied to the selected items, in order.
    pub pass2_tools: Vec<String>,
    /// Question asked of every selected item.
    pub answer_prompt: String,
    /// Key the generated answer is stored under.
    pub answer_key: String,
    /// Keys rendered in the final report, in order.
    pub report_keys: Vec<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            pass1_tool: "sentiment".into(),
            filter_key: "sentiment".into(),
            filter_value: AnnotationValue::from("negative"),
            pass2_tools: vec![
                "tags".into(),
                "emotions".into(),
                "topics".into(),
                "ner".into(),
            ],
            answer_prompt: "What is a brief summary?".into(),
            answer_key: "summary".into(),
            report_keys: vec![
                "sentiment".into(),
                "tags".into(),
                "emotions".into(),
                "topics".into(),
                "ner".into(),
                "summary".into(),
            ],
        }
    }
}

impl PipelineConfig {
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)?;
        let config: PipelineConfig = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Every tool the run will need, first pass included.
    pub fn required_tools(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.pass1_tool.as_str()).chain(self.pass2_tools.iter().map(String::as_str))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let named = [
            ("pass1_tool", &self.pass1_tool),
            ("filter_key", &self.filter_key),
            ("answer_key", &self.answer_key),
        ];
        for (field, value) in named {
            if value.trim().is_empty() {
                return Err(ConfigError::Invalid(format!("'{field}' must not be empty")));
            }
        }
        if self.pass2_tools.iter().any(|t| t.trim().is_empty()) {
            return Err(ConfigError::Invalid("'pass2_tools' contains an empty name".into()));
        }
        if self.report_keys.iter().any(|k| k.trim().is_empty()) {
            return Err(ConfigError::Invalid("'report_keys' contains an empty key".into()));
        }
        Ok(())
    }
}
