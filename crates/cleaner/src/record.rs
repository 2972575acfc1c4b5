//! Token records flowing through the cleaning pipeline.
//!
//! A [`TokenRecord`] is one row of the tri-column format (`form`, `lemma`,
//! `tag`) plus an explicit [`RecordStatus`]. The status replaces the old
//! practice of inferring "needs work" from sentinel strings in positional
//! fields: callers match on the enum, and the sentinel strings only exist so
//! that a record can still be printed while it is in flight.
//!
//! # Lifecycle
//!
//! ```text
//! raw line ──► Original ───────────────────────────────┐
//!          ├─► MissingFields ──► Recovered | fallback ──┤
//!          └─► Placeholder ───► Recovered | fallback ───┼──► output
//!                                     Boundary (<eos>) ─┘
//! ```

use serde::{Deserialize, Serialize};

/// Lemma/tag value carried by records that still await resolution.
pub const PLACEHOLDER: &str = "<temp>";

/// Value of all three fields of a sentence boundary record.
pub const BOUNDARY: &str = "<eos>";

/// Resolution state of a [`TokenRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    /// Taken from the input as-is (after first-pass fixups).
    Original,
    /// Produced by a pass-1 split; lemma and tag are [`PLACEHOLDER`].
    Placeholder,
    /// Input line lacked the lemma and/or tag column; those fields hold the
    /// configured null substitute.
    MissingFields,
    /// Lemma and tag were re-derived by the tagger and lemmatizer, or by the
    /// literal-form fallback.
    Recovered,
    /// Sentence boundary sentinel.
    Boundary,
}

/// One `form / lemma / tag` row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRecord {
    pub form: String,
    pub lemma: String,
    pub tag: String,
    pub status: RecordStatus,
}

impl TokenRecord {
    pub fn new(
        form: impl Into<String>,
        lemma: impl Into<String>,
        tag: impl Into<String>,
    ) -> Self {
        Self {
            form: form.into(),
            lemma: lemma.into(),
            tag: tag.into(),
            status: RecordStatus::Original,
        }
    }

    /// A pass-1 piece whose lemma and tag are resolved later.
    pub fn placeholder(form: impl Into<String>) -> Self {
        Self {
            form: form.into(),
            lemma: PLACEHOLDER.to_string(),
            tag: PLACEHOLDER.to_string(),
            status: RecordStatus::Placeholder,
        }
    }

    /// A record whose lemma and tag were re-derived.
    pub fn recovered(
        form: impl Into<String>,
        lemma: impl Into<String>,
        tag: impl Into<String>,
    ) -> Self {
        Self {
            form: form.into(),
            lemma: lemma.into(),
            tag: tag.into(),
            status: RecordStatus::Recovered,
        }
    }

    /// The `<eos>` sentinel.
    pub fn boundary() -> Self {
        Self {
            form: BOUNDARY.to_string(),
            lemma: BOUNDARY.to_string(),
            tag: BOUNDARY.to_string(),
            status: RecordStatus::Boundary,
        }
    }

    pub fn with_status(mut self, status: RecordStatus) -> Self {
        self.status = status;
        self
    }

    /// True for records the reconciler must resolve before emitting.
    pub fn needs_resolution(&self) -> bool {
        matches!(
            self.status,
            RecordStatus::Placeholder | RecordStatus::MissingFields
        )
    }

    pub fn is_boundary(&self) -> bool {
        self.status == RecordStatus::Boundary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_needs_resolution() {
        let rec = TokenRecord::placeholder("dog");
        assert_eq!(rec.lemma, PLACEHOLDER);
        assert_eq!(rec.tag, PLACEHOLDER);
        assert!(rec.needs_resolution());
        assert!(!rec.is_boundary());
    }

    #[test]
    fn missing_fields_need_resolution() {
        let rec = TokenRecord::new("dog", "UNK", "UNK").with_status(RecordStatus::MissingFields);
        assert!(rec.needs_resolution());
        assert!(!TokenRecord::new("dog", "dog", "nn1").needs_resolution());
    }

    #[test]
    fn boundary_is_eos_triple() {
        let rec = TokenRecord::boundary();
        assert_eq!(
            (rec.form.as_str(), rec.lemma.as_str(), rec.tag.as_str()),
            (BOUNDARY, BOUNDARY, BOUNDARY)
        );
        assert!(rec.is_boundary());
        assert!(!rec.needs_resolution());
    }
}
