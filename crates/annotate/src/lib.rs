//! Reference collaborators for the `cleaner` crate.
//!
//! The cleaner only defines the contracts for sentence segmentation, tagging
//! and lemmatization. This crate ships deterministic, dependency-light
//! implementations of all three so the command line tool works out of the
//! box:
//!
//! - [`RuleSegmenter`]: terminal-punctuation splitter with an abbreviation
//!   list ([`SegmenterConfig`]).
//! - [`LexiconTagger`]: closed-class lexicon plus suffix rules, Penn
//!   Treebank tags.
//! - [`RuleLemmatizer`]: irregular-form tables plus suffix detachment.
//!
//! Callers with better models plug their own implementations into
//! [`cleaner::Annotators`] instead.
//!
//! # Examples
//!
//! ```rust
//! use annotate::{default_annotators, SegmenterConfig};
//! use cleaner::{CleanConfig, Cleaner};
//!
//! let annotators = default_annotators(&SegmenterConfig::default()).unwrap();
//! let cleaner = Cleaner::new(CleanConfig::default(), annotators).unwrap();
//!
//! let doc = cleaner
//!     .clean_text("fic_1900_1", "@@1\nIt\tit\tpphh1\nrained\train\tvvd\n.\t.\ty\n")
//!     .unwrap();
//! assert_eq!(doc.sentence_count(), 1);
//! ```

use std::sync::Arc;

use cleaner::Annotators;

mod error;
mod lemma;
mod segment;
mod tagger;

pub use crate::error::AnnotateError;
pub use crate::lemma::RuleLemmatizer;
pub use crate::segment::{RuleSegmenter, SegmenterConfig, DEFAULT_ABBREVIATIONS};
pub use crate::tagger::LexiconTagger;

/// Bundles the three rule-based collaborators.
pub fn default_annotators(config: &SegmenterConfig) -> Result<Annotators, AnnotateError> {
    let segmenter = RuleSegmenter::new(config)?;
    Ok(Annotators::new(
        Arc::new(segmenter),
        Arc::new(LexiconTagger::new()),
        Arc::new(RuleLemmatizer::new()),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cleaner::{CleanConfig, Cleaner};

    #[test]
    fn default_annotators_repair_a_glued_boundary() {
        let annotators = default_annotators(&SegmenterConfig::default()).unwrap();
        let cleaner = Cleaner::new(CleanConfig::default(), annotators).unwrap();
        let input = "@@7\nThey\tthey\tpphs1\nwent\tgo\tvvd\nhome.The\thome.the\tnn1\ndogs\tdog\tnn2\nbarked\tbark\tvvd\n.\t.\ty\n";
        let doc = cleaner.clean_text("fic_1900_7", input).unwrap();

        assert_eq!(doc.sentence_count(), 2);
        let forms: Vec<&str> = doc.records.iter().map(|r| r.form.as_str()).collect();
        assert_eq!(
            forms,
            vec!["They", "went", "home", ".", "<eos>", "The", "dogs", "barked", ".", "<eos>"]
        );
    }

    #[test]
    fn invalid_segmenter_config_is_reported() {
        let config = SegmenterConfig {
            extra_abbreviations: vec![String::new()],
        };
        assert!(matches!(
            default_annotators(&config),
            Err(AnnotateError::InvalidConfig(_))
        ));
    }
}
