//! Configuration types for the cleaning pipeline.
//!
//! This module defines [`CleanConfig`], which controls how raw tri-column
//! lines are normalized, which malformed tokens are split, and how records
//! that cannot be re-derived are labelled.
//!
//! The configuration is immutable once a [`Cleaner`](crate::Cleaner) is built
//! from it: compiled patterns and collaborator settings are derived at
//! construction time and never mutated mid-document.
//!
//! # Examples
//!
//! ## Default Configuration
//!
//! ```rust
//! use cleaner::CleanConfig;
//!
//! let config = CleanConfig::default();
//! assert!(config.drop_null_tagged);
//! assert_eq!(config.null_substitute, "UNK");
//! assert!(config.exempt_patterns.iter().any(|p| p == "n't"));
//! ```
//!
//! ## Keeping `null`-Tagged Tokens
//!
//! ```rust
//! use cleaner::CleanConfig;
//!
//! let config = CleanConfig {
//!     drop_null_tagged: false,
//!     malformed_tag: "fo".into(),
//!     ..Default::default()
//! };
//! assert!(config.validate().is_ok());
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::CleanError;

/// What the reconciler does with tokens left over once every oracle sentence
/// has been consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExhaustedPolicy {
    /// Keep appending the remaining tokens without further boundaries.
    #[default]
    Passthrough,
    /// Drop the remaining tokens.
    Drop,
}

/// Configuration for the cleaning pipeline.
///
/// # Serialization
///
/// ```json
/// {
///   "drop_null_tagged": true,
///   "malformed_tag": "mal",
///   "null_substitute": "UNK",
///   "exempt_patterns": ["n't", "'s", "'m", "'d", "'ve", "'ing", "'ll", "etc."]
/// }
/// ```
///
/// Every field has a default, so partial documents deserialize.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CleanConfig {
    /// Drop tokens tagged `null` whose form is an HTML/control placeholder
    /// (`<P>`, `&nbsp;`, ...). Other `null`-tagged tokens are kept.
    pub drop_null_tagged: bool,

    /// Suffix attached to re-derived tags (`nn1_<malformed_tag>`), and the
    /// tag given to pieces that could not be resolved at all.
    pub malformed_tag: String,

    /// Replacement text for null bytes and for missing lemma/tag columns.
    pub null_substitute: String,

    /// Substrings that are legitimate inside a word (contractions, trailing
    /// abbreviation periods). Characters covered by one of these never make
    /// a token malformed.
    pub exempt_patterns: Vec<String>,

    /// Filler token dropped on sight (`q!` in the source corpus).
    pub skip_token: String,

    /// Form inserted by the corpus editors in place of redacted text. Kept in
    /// the output, never sent to the tagger.
    pub redaction_marker: String,

    /// Upstream tag value meaning "no tag".
    pub null_tag: String,

    /// Markers identifying HTML/control-character placeholder forms.
    pub control_markers: Vec<String>,

    /// Canonical lemma → lower-cased spelling variants that must share it.
    pub lemma_unifications: BTreeMap<String, Vec<String>>,

    /// Tag forced onto hyphen-only pieces (`-`, `--`).
    pub unclassified_tag: String,

    /// Behaviour once the boundary oracle runs out of sentences.
    pub exhausted_policy: ExhaustedPolicy,
}

impl CleanConfig {
    /// Checks that every required string is non-empty.
    pub fn validate(&self) -> Result<(), CleanError> {
        let required = [
            ("malformed_tag", &self.malformed_tag),
            ("null_substitute", &self.null_substitute),
            ("skip_token", &self.skip_token),
            ("redaction_marker", &self.redaction_marker),
            ("null_tag", &self.null_tag),
            ("unclassified_tag", &self.unclassified_tag),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(CleanError::InvalidConfig(format!(
                    "{name} must not be empty"
                )));
            }
        }
        if self.malformed_tag.contains(char::is_whitespace) {
            return Err(CleanError::InvalidConfig(
                "malformed_tag must not contain whitespace".into(),
            ));
        }
        if self.exempt_patterns.iter().any(|p| p.is_empty()) {
            return Err(CleanError::InvalidConfig(
                "exempt_patterns must not contain empty entries".into(),
            ));
        }
        if self.control_markers.iter().any(|m| m.is_empty()) {
            return Err(CleanError::InvalidConfig(
                "control_markers must not contain empty entries".into(),
            ));
        }
        Ok(())
    }

    /// Canonical lemma for a lower-cased form, if the form is a known
    /// spelling variant.
    pub fn unified_lemma(&self, lowered_form: &str) -> Option<&str> {
        self.lemma_unifications
            .iter()
            .find(|(_, variants)| variants.iter().any(|v| v == lowered_form))
            .map(|(lemma, _)| lemma.as_str())
    }

    /// `true` when `form` is the redaction marker.
    pub fn is_redaction_marker(&self, form: &str) -> bool {
        form == self.redaction_marker
    }

    /// `true` when `form` is the skip token (case-insensitive).
    pub fn is_skip_token(&self, form: &str) -> bool {
        form.to_lowercase() == self.skip_token.to_lowercase()
    }
}

impl Default for CleanConfig {
    fn default() -> Self {
        let mut lemma_unifications = BTreeMap::new();
        lemma_unifications.insert(
            "saute".to_string(),
            [
                "sauteed", "sauted", "saut", "saute", "sauteing", "sautes", "sauting",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        );

        Self {
            drop_null_tagged: true,
            malformed_tag: "mal".to_string(),
            null_substitute: "UNK".to_string(),
            exempt_patterns: ["n't", "'s", "'m", "'d", "'ve", "'ing", "'ll", "etc."]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            skip_token: "q!".to_string(),
            redaction_marker: "@".to_string(),
            null_tag: "null".to_string(),
            control_markers: ["&nbsp;", "&#10;", "&#13;", "&#09;", "<"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            lemma_unifications,
            unclassified_tag: "z".to_string(),
            exhausted_policy: ExhaustedPolicy::Passthrough,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(CleanConfig::default().validate().is_ok());
    }

    #[test]
    fn empty_malformed_tag_rejected() {
        let cfg = CleanConfig {
            malformed_tag: " ".into(),
            ..Default::default()
        };
        assert!(matches!(cfg.validate(), Err(CleanError::InvalidConfig(_))));
    }

    #[test]
    fn empty_exempt_pattern_rejected() {
        let cfg = CleanConfig {
            exempt_patterns: vec!["n't".into(), String::new()],
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn unified_lemma_lookup() {
        let cfg = CleanConfig::default();
        assert_eq!(cfg.unified_lemma("sauteed"), Some("saute"));
        assert_eq!(cfg.unified_lemma("boiled"), None);
    }

    #[test]
    fn skip_token_is_case_insensitive() {
        let cfg = CleanConfig::default();
        assert!(cfg.is_skip_token("Q!"));
        assert!(!cfg.is_skip_token("q"));
    }

    #[test]
    fn partial_json_uses_defaults() {
        let cfg: CleanConfig =
            serde_json::from_str(r#"{"null_substitute": "NUL", "exhausted_policy": "drop"}"#)
                .expect("partial config parses");
        assert_eq!(cfg.null_substitute, "NUL");
        assert_eq!(cfg.exhausted_policy, ExhaustedPolicy::Drop);
        assert_eq!(cfg.malformed_tag, "mal");
    }
}
