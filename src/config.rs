//! YAML settings file for `wlpclean`.
//!
//! One file groups the cleaner configuration, the reference segmenter's
//! abbreviations and the corpus runner settings. Every section is optional;
//! missing sections and fields take their defaults.
//!
//! ## Example YAML Settings
//!
//! ```yaml
//! version: "1.0"
//! name: "coha-1930s"
//!
//! cleaner:
//!   drop_null_tagged: true
//!   malformed_tag: "mal"
//!   null_substitute: "UNK"
//!   exhausted_policy: "passthrough"
//!
//! segmenter:
//!   # added to the built-in abbreviation list
//!   extra_abbreviations: ["rep", "dept"]
//!
//! corpus:
//!   jobs: 10
//!   input_encoding: "auto"
//!   extension: "txt"
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use annotate::SegmenterConfig;
use cleaner::CleanConfig;

use crate::decode::InputEncoding;

/// Errors that can occur when loading a settings file.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("unsupported settings version: {0}")]
    UnsupportedVersion(String),
}

/// Top-level settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Settings format version.
    #[serde(default = "default_version")]
    pub version: String,

    /// Optional run name, echoed in the run report.
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub cleaner: CleanConfig,

    #[serde(default)]
    pub segmenter: SegmenterConfig,

    #[serde(default)]
    pub corpus: CorpusSettings,
}

impl Settings {
    /// Load a YAML settings file from the given path.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse YAML settings from a string.
    pub fn from_yaml(yaml: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_yaml::from_str(yaml)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Applies command line overrides and validates the result.
    pub fn with_overrides(mut self, overrides: &Overrides) -> Result<Self, SettingsError> {
        if overrides.keep_null {
            self.cleaner.drop_null_tagged = false;
        }
        if let Some(tag) = &overrides.malformed_tag {
            self.cleaner.malformed_tag = tag.clone();
        }
        if let Some(substitute) = &overrides.null_substitute {
            self.cleaner.null_substitute = substitute.clone();
        }
        if let Some(jobs) = overrides.jobs {
            self.corpus.jobs = jobs;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        match self.version.as_str() {
            "1.0" | "1" => Ok(()),
            v => Err(SettingsError::UnsupportedVersion(v.to_string())),
        }?;

        self.cleaner
            .validate()
            .map_err(|e| SettingsError::Validation(e.to_string()))?;
        self.segmenter
            .validate()
            .map_err(|e| SettingsError::Validation(e.to_string()))?;
        self.corpus.validate()?;

        Ok(())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: default_version(),
            name: None,
            cleaner: CleanConfig::default(),
            segmenter: SegmenterConfig::default(),
            corpus: CorpusSettings::default(),
        }
    }
}

/// Corpus runner settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusSettings {
    /// Worker threads; one document per task.
    #[serde(default = "default_jobs")]
    pub jobs: usize,

    #[serde(default)]
    pub input_encoding: InputEncoding,

    /// Extension of the files picked up from the input directory.
    #[serde(default = "default_extension")]
    pub extension: String,
}

impl CorpusSettings {
    fn validate(&self) -> Result<(), SettingsError> {
        if self.jobs == 0 {
            return Err(SettingsError::Validation(
                "corpus.jobs must be greater than 0".into(),
            ));
        }
        if self.extension.trim().is_empty() || self.extension.starts_with('.') {
            return Err(SettingsError::Validation(
                "corpus.extension must be a bare extension such as `txt`".into(),
            ));
        }
        Ok(())
    }
}

impl Default for CorpusSettings {
    fn default() -> Self {
        Self {
            jobs: default_jobs(),
            input_encoding: InputEncoding::default(),
            extension: default_extension(),
        }
    }
}

/// Command line flags that take precedence over the settings file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub keep_null: bool,
    pub malformed_tag: Option<String>,
    pub null_substitute: Option<String>,
    pub jobs: Option<usize>,
}

fn default_version() -> String {
    "1.0".to_string()
}

fn default_jobs() -> usize {
    10
}

fn default_extension() -> String {
    "txt".to_string()
}
