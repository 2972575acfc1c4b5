//! First pass over a document: one raw line in, zero or more records out.
//!
//! Rules are applied in a fixed order:
//!
//! 1. `null`-tagged HTML/control placeholders are dropped (when configured).
//! 2. The skip token is dropped.
//! 3. Null bytes in any field become the configured substitute.
//! 4. Spelling variants are unified onto one canonical lemma.
//! 5. HTML entities in the form are decoded.
//! 6. Pass-1 malformed forms are split into placeholder records.
//!
//! Tags of well-formed tokens are passed through untouched.

use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::config::CleanConfig;
use crate::entity::{contains_entity, decode_entities};
use crate::malformed::{MalformedDetector, Pass};
use crate::record::{RecordStatus, TokenRecord};

const NUL: char = '\0';

/// Why the normalizer discarded a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    /// `null` tag on an HTML/control-character placeholder form.
    NullTagControl,
    /// The configured skip token.
    SkipToken,
    /// Nothing left of the form.
    EmptyForm,
    /// A malformed form whose split produced no usable piece.
    EmptySplit,
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DropReason::NullTagControl => "null_tag_control",
            DropReason::SkipToken => "skip_token",
            DropReason::EmptyForm => "empty_form",
            DropReason::EmptySplit => "empty_split",
        };
        f.write_str(name)
    }
}

/// Outcome of normalizing one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Normalized {
    Kept(TokenRecord),
    /// Pass-1 placeholder pieces replacing the original token.
    Split(Vec<TokenRecord>),
    Dropped(DropReason),
}

/// Applies the first-pass rules.
#[derive(Debug, Clone, Copy)]
pub struct TokenNormalizer<'a> {
    config: &'a CleanConfig,
    detector: &'a MalformedDetector,
}

impl<'a> TokenNormalizer<'a> {
    pub fn new(config: &'a CleanConfig, detector: &'a MalformedDetector) -> Self {
        Self { config, detector }
    }

    /// Header lines are kept verbatim apart from null-byte substitution and
    /// the line terminator.
    pub fn normalize_header(&self, line: &str) -> String {
        line.trim_end_matches(['\r', '\n'])
            .replace(NUL, &self.config.null_substitute)
    }

    /// Normalizes one tab-separated `form, lemma, tag` line. Trailing
    /// whitespace is removed first, so a blank tag column counts as missing.
    pub fn normalize_line(&self, line: &str) -> Normalized {
        let mut fields = line.trim_end().split('\t');
        let form = fields.next().unwrap_or_default();
        let lemma = fields.next();
        let tag = fields.next();
        self.normalize_fields(form, lemma, tag)
    }

    pub fn normalize_fields(&self, form: &str, lemma: Option<&str>, tag: Option<&str>) -> Normalized {
        let cfg = self.config;
        let lowered = form.to_lowercase();

        if cfg.drop_null_tagged
            && tag.is_some_and(|t| t.eq_ignore_ascii_case(&cfg.null_tag))
            && cfg
                .control_markers
                .iter()
                .any(|marker| lowered.contains(&marker.to_lowercase()))
        {
            return Normalized::Dropped(DropReason::NullTagControl);
        }

        if cfg.is_skip_token(form) {
            return Normalized::Dropped(DropReason::SkipToken);
        }

        let missing = |field: Option<&str>| field.map_or(true, str::is_empty);
        let status = if missing(lemma) || missing(tag) {
            RecordStatus::MissingFields
        } else {
            RecordStatus::Original
        };
        let substitute = |field: Option<&str>| match field {
            Some(value) if !value.is_empty() => value.replace(NUL, &cfg.null_substitute),
            _ => cfg.null_substitute.clone(),
        };

        let mut record = TokenRecord {
            form: form.replace(NUL, &cfg.null_substitute),
            lemma: substitute(lemma),
            tag: substitute(tag),
            status,
        };

        if let Some(canonical) = cfg.unified_lemma(&record.form.to_lowercase()) {
            record.lemma = canonical.to_string();
        }

        if contains_entity(&record.form.to_lowercase()) {
            record.form = decode_entities(&record.form).into_owned();
        }

        if record.form.trim().is_empty() {
            return Normalized::Dropped(DropReason::EmptyForm);
        }

        if !self.detector.is_malformed(&record.form, Pass::First) {
            return Normalized::Kept(record);
        }

        let mut pieces = self.detector.split_placeholders(&record.form);
        match pieces.len() {
            0 => {
                debug!(form = %record.form, "malformed_split_empty");
                Normalized::Dropped(DropReason::EmptySplit)
            }
            1 => {
                let piece = pieces.remove(0);
                record.form = piece.form;
                Normalized::Kept(record)
            }
            _ => Normalized::Split(pieces),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::PLACEHOLDER;

    fn run(line: &str) -> Normalized {
        run_with(&CleanConfig::default(), line)
    }

    fn run_with(cfg: &CleanConfig, line: &str) -> Normalized {
        let detector = MalformedDetector::new(cfg);
        TokenNormalizer::new(cfg, &detector).normalize_line(line)
    }

    fn kept(n: Normalized) -> TokenRecord {
        match n {
            Normalized::Kept(rec) => rec,
            other => panic!("expected kept record, got {other:?}"),
        }
    }

    #[test]
    fn well_formed_line_is_untouched() {
        let rec = kept(run("Dogs\tdog\tnn2\n"));
        assert_eq!(rec, TokenRecord::new("Dogs", "dog", "nn2"));
    }

    #[test]
    fn null_tagged_control_placeholders_are_dropped() {
        assert_eq!(run("<P>\t<p>\tnull"), Normalized::Dropped(DropReason::NullTagControl));
        assert_eq!(run("&NBSP;\tx\tNULL"), Normalized::Dropped(DropReason::NullTagControl));
        // Other null-tagged tokens survive.
        assert_eq!(kept(run("word\tword\tnull")).tag, "null");
    }

    #[test]
    fn null_tagged_placeholders_kept_when_configured() {
        let cfg = CleanConfig {
            drop_null_tagged: false,
            ..Default::default()
        };
        assert_eq!(kept(run_with(&cfg, "<P>\t<p>\tnull")).form, "<P>");
    }

    #[test]
    fn skip_token_is_dropped() {
        assert_eq!(run("q!\tq!\tfo"), Normalized::Dropped(DropReason::SkipToken));
        assert_eq!(run("Q!\tq!\tfo"), Normalized::Dropped(DropReason::SkipToken));
    }

    #[test]
    fn null_bytes_are_substituted_in_every_field() {
        let rec = kept(run("\0\t\0\t\0"));
        assert_eq!(rec, TokenRecord::new("UNK", "UNK", "UNK"));
    }

    #[test]
    fn missing_columns_are_substituted_and_flagged() {
        let rec = kept(run("dog\tdog\t "));
        assert_eq!(rec.tag, "UNK");
        assert_eq!(rec.status, RecordStatus::MissingFields);

        let rec = kept(run("dog"));
        assert_eq!((rec.lemma.as_str(), rec.tag.as_str()), ("UNK", "UNK"));
        assert_eq!(rec.status, RecordStatus::MissingFields);
    }

    #[test]
    fn spelling_variants_share_a_lemma() {
        assert_eq!(kept(run("Sauteed\tsauteed\tvvd")).lemma, "saute");
    }

    #[test]
    fn html_entities_are_decoded() {
        assert_eq!(kept(run("caf&#233;\tcafe\tnn1")).form, "café");
        assert_eq!(kept(run("AT&amp;T\tat&t\tnp1")).form, "AT&T");
    }

    #[test]
    fn malformed_forms_become_placeholders() {
        match run("word;another\tword;another\tnn1") {
            Normalized::Split(pieces) => {
                let forms: Vec<&str> = pieces.iter().map(|p| p.form.as_str()).collect();
                assert_eq!(forms, vec!["word", ";", "another"]);
                assert!(pieces.iter().all(|p| p.tag == PLACEHOLDER));
            }
            other => panic!("expected split, got {other:?}"),
        }
    }

    #[test]
    fn single_piece_split_keeps_original_record() {
        let rec = kept(run("hello \thello\tuh"));
        assert_eq!(rec.form, "hello");
        assert_eq!(rec.tag, "uh");
    }

    #[test]
    fn period_is_left_for_the_second_pass() {
        assert_eq!(kept(run("end.The\tend.the\tnn1")).form, "end.The");
    }

    #[test]
    fn empty_form_is_dropped() {
        assert_eq!(run("\tx\tnn1"), Normalized::Dropped(DropReason::EmptyForm));
    }

    #[test]
    fn header_keeps_content() {
        let cfg = CleanConfig::default();
        let detector = MalformedDetector::new(&cfg);
        let header = TokenNormalizer::new(&cfg, &detector).normalize_header("@@1234\tfic\0\r\n");
        assert_eq!(header, "@@1234\tficUNK");
    }
}
