//! Document types for the cleaning pipeline.
//!
//! This module defines [`CleanedDocument`], the output of
//! [`Cleaner::clean_document`](crate::Cleaner::clean_document), and
//! [`CleanReport`], the per-document counters that go with it.
//!
//! # Document Structure
//!
//! A `CleanedDocument` contains:
//! - The header line, verbatim apart from null-byte substitution
//! - The final record stream, `<eos>` sentinels included
//! - A report of what the two passes did
//!
//! # Determinism
//!
//! For a fixed configuration and deterministic collaborators, the same input
//! lines always produce the same document, report included.
//!
//! # Examples
//!
//! ```rust
//! use cleaner::{CleanReport, CleanedDocument, TokenRecord};
//!
//! let doc = CleanedDocument {
//!     doc_id: "fic_1936_10080".into(),
//!     header: "@@10080".into(),
//!     records: vec![
//!         TokenRecord::new("Hello", "hello", "UH"),
//!         TokenRecord::boundary(),
//!     ],
//!     report: CleanReport::default(),
//! };
//!
//! assert_eq!(doc.to_tagged_text(), "@@10080\nHello\thello\tuh\n<eos>\t<eos>\t<eos>\n");
//! assert_eq!(doc.to_plain_text("q!"), "@@10080\n\nHello");
//! assert_eq!(doc.sentence_count(), 1);
//! ```

use std::collections::BTreeMap;
use std::io::{self, Write};

use serde::Serialize;

use crate::normalize::DropReason;
use crate::output::{render_plain_text, render_tagged, write_tagged};
use crate::reconcile::ReconcileStats;
use crate::record::{RecordStatus, TokenRecord};

/// A cleaned tri-column document.
///
/// # Structure
///
/// ```text
/// CleanedDocument
/// ├── doc_id: String              # Caller-supplied identifier
/// ├── header: String              # First input line
/// ├── records: Vec<TokenRecord>   # Final records, no placeholders left
/// └── report: CleanReport         # What the cleaner did
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CleanedDocument {
    /// Identifier used in logs and errors, usually the file stem.
    pub doc_id: String,

    /// First line of the input, kept out of cleaning.
    ///
    /// Empty for an empty document.
    pub header: String,

    /// Final record stream.
    ///
    /// Every record is either [`RecordStatus::Original`],
    /// [`RecordStatus::Recovered`] or [`RecordStatus::Boundary`]; nothing
    /// awaiting resolution survives [`clean_document`](crate::Cleaner::clean_document).
    pub records: Vec<TokenRecord>,

    /// Counters for the two passes.
    pub report: CleanReport,
}

impl CleanedDocument {
    /// The tagged output format as a string.
    pub fn to_tagged_text(&self) -> String {
        render_tagged(&self.header, &self.records)
    }

    /// Streams the tagged output format into `writer`.
    pub fn write_tagged<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        write_tagged(writer, &self.header, &self.records)
    }

    /// The plain-text export: header title, blank line, running text.
    pub fn to_plain_text(&self, skip_token: &str) -> String {
        render_plain_text(&self.header, &self.records, skip_token)
    }

    /// Number of `<eos>` sentinels.
    pub fn sentence_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_boundary()).count()
    }

    /// Records whose lemma and tag were re-derived or fell back.
    pub fn recovered(&self) -> impl Iterator<Item = &TokenRecord> {
        self.records
            .iter()
            .filter(|r| r.status == RecordStatus::Recovered)
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Per-document counters.
///
/// Serialized as part of the corpus run report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CleanReport {
    /// Token lines read, header excluded.
    pub lines: usize,
    /// Lines that became exactly one record.
    pub kept: usize,
    /// Lines split into placeholder pieces in the first pass.
    pub split_tokens: usize,
    /// Pieces those splits produced.
    pub split_pieces: usize,
    /// Lines discarded, by reason.
    pub dropped: BTreeMap<DropReason, usize>,
    /// Second-pass counters.
    pub reconcile: ReconcileStats,
}

impl CleanReport {
    pub fn dropped_total(&self) -> usize {
        self.dropped.values().sum()
    }

    pub(crate) fn record_drop(&mut self, reason: DropReason) {
        *self.dropped.entry(reason).or_default() += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_totals_drops() {
        let mut report = CleanReport::default();
        report.record_drop(DropReason::SkipToken);
        report.record_drop(DropReason::SkipToken);
        report.record_drop(DropReason::NullTagControl);
        assert_eq!(report.dropped_total(), 3);
        assert_eq!(report.dropped[&DropReason::SkipToken], 2);
    }

    #[test]
    fn report_serializes_reasons_as_keys() {
        let mut report = CleanReport::default();
        report.record_drop(DropReason::EmptyForm);
        let json = serde_json::to_value(&report).expect("report serializes");
        assert_eq!(json["dropped"]["empty_form"], 1);
        assert_eq!(json["reconcile"]["alignment_lost"], false);
    }

    #[test]
    fn recovered_filters_by_status() {
        let doc = CleanedDocument {
            doc_id: "d".into(),
            header: String::new(),
            records: vec![
                TokenRecord::new("a", "a", "at1"),
                TokenRecord::recovered("b", "b", "mal"),
                TokenRecord::boundary(),
            ],
            report: CleanReport::default(),
        };
        let forms: Vec<&str> = doc.recovered().map(|r| r.form.as_str()).collect();
        assert_eq!(forms, vec!["b"]);
        assert_eq!(doc.sentence_count(), 1);
    }
}
