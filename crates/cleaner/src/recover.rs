//! Re-derivation of lemma and tag for records the cleaner had to touch.

use crate::annotator::Annotators;
use crate::config::CleanConfig;
use crate::error::AnnotatorError;
use crate::record::{RecordStatus, TokenRecord};
use crate::tagset::TagMapper;

/// Builds recovered records from tagger output, or literal-form fallbacks
/// when no usable tag exists.
pub(crate) struct Recovery<'a> {
    config: &'a CleanConfig,
    annotators: &'a Annotators,
    mapper: TagMapper,
}

impl<'a> Recovery<'a> {
    pub(crate) fn new(config: &'a CleanConfig, annotators: &'a Annotators) -> Self {
        Self {
            config,
            annotators,
            mapper: TagMapper,
        }
    }

    pub(crate) fn annotators(&self) -> &'a Annotators {
        self.annotators
    }

    /// Re-derives a placeholder record: lemmatizes `form` under `penn_tag`
    /// when it is purely alphabetic and formats the tag as
    /// `<claws>_<malformed_tag>`. Hyphen-only forms get the unclassified tag.
    pub(crate) fn recover(&self, form: &str, penn_tag: &str) -> Result<TokenRecord, AnnotatorError> {
        self.derive(form, penn_tag, form.chars().all(char::is_alphabetic))
    }

    /// Like [`recover`](Self::recover) for pieces of a split resolved token;
    /// every piece goes through the lemmatizer.
    pub(crate) fn recover_piece(
        &self,
        piece: &str,
        penn_tag: &str,
    ) -> Result<TokenRecord, AnnotatorError> {
        self.derive(piece, penn_tag, true)
    }

    fn derive(
        &self,
        form: &str,
        penn_tag: &str,
        lemmatize: bool,
    ) -> Result<TokenRecord, AnnotatorError> {
        if is_hyphen_only(form) {
            let tag = format!(
                "{}_{}",
                self.config.unclassified_tag.to_lowercase(),
                self.config.malformed_tag
            );
            return Ok(TokenRecord::recovered(form, form, tag));
        }

        let lemma = if lemmatize {
            self.annotators
                .lemmatizer
                .lemmatize(form, self.mapper.coarse(penn_tag))?
        } else {
            form.to_string()
        };
        let tag = self.mapper.recovered_tag(penn_tag, &self.config.malformed_tag);
        Ok(TokenRecord::recovered(form, lemma, tag))
    }

    /// Literal-form fallback: the form doubles as lemma. Split pieces get the
    /// bare malformed tag; records with missing columns keep what they had.
    pub(crate) fn fallback(&self, record: &TokenRecord) -> TokenRecord {
        match record.status {
            RecordStatus::MissingFields => {
                let lemma = if record.lemma == self.config.null_substitute {
                    record.form.clone()
                } else {
                    record.lemma.clone()
                };
                TokenRecord::recovered(record.form.clone(), lemma, record.tag.clone())
            }
            _ => self.fallback_piece(&record.form),
        }
    }

    pub(crate) fn fallback_piece(&self, form: &str) -> TokenRecord {
        TokenRecord::recovered(form, form, self.config.malformed_tag.clone())
    }
}

fn is_hyphen_only(form: &str) -> bool {
    form == "-" || form == "--"
}
