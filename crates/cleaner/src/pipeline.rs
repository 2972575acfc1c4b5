use std::time::Instant;

use tracing::{debug, info, info_span, warn};

use crate::annotator::Annotators;
use crate::config::CleanConfig;
use crate::document::{CleanReport, CleanedDocument};
use crate::error::{CleanError, DocumentError};
use crate::malformed::MalformedDetector;
use crate::normalize::{Normalized, TokenNormalizer};
use crate::reconcile::SentenceReconciler;
use crate::whitespace::reconstruct_text;

/// Main entry point. Holds the validated configuration, the compiled
/// malformed-token rules and the collaborators, and cleans one document at a
/// time.
///
/// A `Cleaner` is immutable after construction and `Send + Sync`; share one
/// instance across worker threads.
#[derive(Debug)]
pub struct Cleaner {
    config: CleanConfig,
    detector: MalformedDetector,
    annotators: Annotators,
}

impl Cleaner {
    /// Validates `config` and binds it to the collaborators.
    pub fn new(config: CleanConfig, annotators: Annotators) -> Result<Self, CleanError> {
        config.validate()?;
        let detector = MalformedDetector::new(&config);
        Ok(Self {
            config,
            detector,
            annotators,
        })
    }

    pub fn config(&self) -> &CleanConfig {
        &self.config
    }

    pub fn annotators(&self) -> &Annotators {
        &self.annotators
    }

    /// Cleans a document given as one string.
    pub fn clean_text(&self, doc_id: &str, text: &str) -> Result<CleanedDocument, DocumentError> {
        let lines: Vec<&str> = text.lines().collect();
        self.clean_document(doc_id, &lines)
    }

    /// Cleans a document given as its lines. The first line is the header.
    ///
    /// Failures of the tagger or lemmatizer abort this document only; the
    /// returned [`DocumentError`] names it.
    pub fn clean_document<S: AsRef<str>>(
        &self,
        doc_id: &str,
        lines: &[S],
    ) -> Result<CleanedDocument, DocumentError> {
        let span = info_span!("clean_document", doc_id = %doc_id);
        let _guard = span.enter();
        let started = Instant::now();

        match self.run(doc_id, lines) {
            Ok(doc) => {
                let stats = &doc.report.reconcile;
                info!(
                    lines = doc.report.lines,
                    records = doc.records.len(),
                    sentences = stats.boundaries,
                    resolved = stats.resolved,
                    fallbacks = stats.fallbacks,
                    drift_repairs = stats.drift_repairs,
                    dropped = doc.report.dropped_total(),
                    elapsed_micros = started.elapsed().as_micros() as u64,
                    "document_cleaned"
                );
                Ok(doc)
            }
            Err(source) => {
                warn!(
                    error = %source,
                    elapsed_micros = started.elapsed().as_micros() as u64,
                    "document_failed"
                );
                Err(DocumentError {
                    doc_id: doc_id.to_string(),
                    source,
                })
            }
        }
    }

    fn run<S: AsRef<str>>(&self, doc_id: &str, lines: &[S]) -> Result<CleanedDocument, CleanError> {
        let mut report = CleanReport::default();
        let Some((first, rest)) = lines.split_first() else {
            return Ok(CleanedDocument {
                doc_id: doc_id.to_string(),
                header: String::new(),
                records: Vec::new(),
                report,
            });
        };

        // First pass: per-line fixups and pass-1 splits.
        let normalizer = TokenNormalizer::new(&self.config, &self.detector);
        let header = normalizer.normalize_header(first.as_ref());
        let mut records = Vec::with_capacity(rest.len());
        for line in rest {
            let line = line.as_ref();
            report.lines += 1;
            match normalizer.normalize_line(line) {
                Normalized::Kept(record) => {
                    report.kept += 1;
                    records.push(record);
                }
                Normalized::Split(pieces) => {
                    report.split_tokens += 1;
                    report.split_pieces += pieces.len();
                    records.extend(pieces);
                }
                Normalized::Dropped(reason) => {
                    debug!(line = %line, reason = %reason, "token_dropped");
                    report.record_drop(reason);
                }
            }
        }

        if records.is_empty() {
            return Ok(CleanedDocument {
                doc_id: doc_id.to_string(),
                header,
                records,
                report,
            });
        }

        // Second pass: boundaries, resolution and drift repair against the
        // oracle's view of the reconstructed text.
        let text = reconstruct_text(&records);
        let sentences = self.annotators.segmenter.segment(&text);
        debug!(sentences = sentences.len(), chars = text.len(), "text_segmented");

        let mut reconciler =
            SentenceReconciler::new(&self.config, &self.detector, &self.annotators, sentences);
        for record in records {
            reconciler.push(record)?;
        }
        let (records, stats) = reconciler.finish();
        report.reconcile = stats;

        Ok(CleanedDocument {
            doc_id: doc_id.to_string(),
            header,
            records,
            report,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotator::testing::{annotators, FailingTagger, PeriodSegmenter, TableTagger};
    use crate::record::BOUNDARY;

    fn cleaner() -> Cleaner {
        Cleaner::new(
            CleanConfig::default(),
            annotators(PeriodSegmenter, TableTagger::default()),
        )
        .expect("default config is valid")
    }

    #[test]
    fn invalid_config_is_rejected() {
        let cfg = CleanConfig {
            null_substitute: String::new(),
            ..Default::default()
        };
        let err = Cleaner::new(cfg, annotators(PeriodSegmenter, TableTagger::default()))
            .expect_err("empty substitute rejected");
        assert!(matches!(err, CleanError::InvalidConfig(_)));
    }

    #[test]
    fn empty_document_has_no_records() {
        let doc = cleaner().clean_document::<&str>("empty", &[]).unwrap();
        assert_eq!(doc.header, "");
        assert!(doc.records.is_empty());
    }

    #[test]
    fn header_only_document() {
        let doc = cleaner().clean_text("h", "@@1\n").unwrap();
        assert_eq!(doc.header, "@@1");
        assert!(doc.records.is_empty());
        assert_eq!(doc.to_tagged_text(), "@@1\n");
    }

    #[test]
    fn report_counts_first_pass_outcomes() {
        let text = "@@1\nq!\tq!\tfo\nYes\tyes\tuh\nwhy;not\twhy;not\trr\n.\t.\ty\n";
        let doc = cleaner().clean_text("d", text).unwrap();
        assert_eq!(doc.report.lines, 4);
        assert_eq!(doc.report.kept, 2);
        assert_eq!(doc.report.split_tokens, 1);
        assert_eq!(doc.report.split_pieces, 3);
        assert_eq!(doc.report.dropped_total(), 1);
        assert_eq!(doc.records.last().map(|r| r.form.as_str()), Some(BOUNDARY));
    }

    #[test]
    fn tagger_failure_names_the_document() {
        let cleaner = Cleaner::new(
            CleanConfig::default(),
            annotators(PeriodSegmenter, FailingTagger),
        )
        .unwrap();
        let err = cleaner
            .clean_text("fic_1900_1", "@@1\nwhy;not\twhy;not\trr\nso\tso\trr\n")
            .expect_err("placeholder needs the tagger");
        assert_eq!(err.doc_id, "fic_1900_1");
        assert!(matches!(err.source, CleanError::Annotator(_)));
    }
}
