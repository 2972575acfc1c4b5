//! Detection and splitting of malformed tokens.
//!
//! A token is *malformed* when punctuation that should stand on its own is
//! glued to a word (`word;another`, `end.The`). Detection runs in two passes:
//!
//! - [`Pass::First`] looks at `--`, space, `:`, `;`, `*`, `?`, `!`. These never
//!   belong inside a word, so the normalizer splits them on sight.
//! - [`Pass::Second`] adds `.` and `'`. Those are legitimate inside many words
//!   and abbreviations, so they are only acted on when a token overruns a
//!   sentence boundary.
//!
//! Exempt patterns (`n't`, `'s`, `etc.`, ...) shield the characters they
//! cover: `it's` is well formed, `don't.` is malformed through its final
//! period only.
//!
//! Separators are kept as pieces of their own (space excepted), so the pieces
//! of a split concatenate back to the original form.

use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::annotator::TaggedToken;
use crate::config::CleanConfig;
use crate::error::AnnotatorError;
use crate::record::TokenRecord;
use crate::recover::Recovery;

/// Characters that make a token malformed. The first two are only considered
/// in the second pass.
const MALFORMED_CHARS: &[&str] = &[".", "'", "--", " ", ":", ";", "*", "?", "!"];

static PASS_ONE: Lazy<Regex> = Lazy::new(|| alternation(&MALFORMED_CHARS[2..]));
static PASS_TWO: Lazy<Regex> = Lazy::new(|| alternation(MALFORMED_CHARS));

fn alternation(items: &[&str]) -> Regex {
    let pattern = items
        .iter()
        .map(|item| regex::escape(item))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&pattern).expect("malformed character pattern is a valid regex")
}

/// Which character class a check or split uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    /// Boundary-exclusive: ignores `.` and `'`.
    First,
    /// Boundary-inclusive: every malformed character.
    Second,
}

impl Pass {
    fn regex(self) -> &'static Regex {
        match self {
            Pass::First => Lazy::force(&PASS_ONE),
            Pass::Second => Lazy::force(&PASS_TWO),
        }
    }
}

/// Predicate and pure splitter over token forms.
#[derive(Debug, Clone)]
pub struct MalformedDetector {
    exempt_patterns: Vec<String>,
    skip_token: String,
}

impl MalformedDetector {
    pub fn new(config: &CleanConfig) -> Self {
        Self {
            exempt_patterns: config
                .exempt_patterns
                .iter()
                .map(|p| p.to_lowercase())
                .collect(),
            skip_token: config.skip_token.to_lowercase(),
        }
    }

    /// `true` when `form` has a letter and at least one unshielded
    /// malformed character for `pass`.
    pub fn is_malformed(&self, form: &str, pass: Pass) -> bool {
        if !form.chars().any(char::is_alphabetic) {
            return false;
        }
        if form.to_lowercase() == self.skip_token {
            return false;
        }
        !self.separators(form, pass).is_empty()
    }

    /// Byte ranges of the malformed characters in `form` that no exempt
    /// pattern covers.
    pub fn separators(&self, form: &str, pass: Pass) -> Vec<Range<usize>> {
        let shields = self.shielded_spans(form);
        pass.regex()
            .find_iter(form)
            .map(|m| m.range())
            .filter(|m| !shields.iter().any(|s| s.start < m.end && m.start < s.end))
            .collect()
    }

    /// Splits `form` on its unshielded separators. Separators become pieces of
    /// their own; empty and whitespace-only pieces are discarded.
    pub fn split(&self, form: &str, pass: Pass) -> Vec<String> {
        let mut pieces = Vec::new();
        let mut cursor = 0;
        for sep in self.separators(form, pass) {
            pieces.push(&form[cursor..sep.start]);
            pieces.push(&form[sep.clone()]);
            cursor = sep.end;
        }
        pieces.push(&form[cursor..]);

        pieces
            .into_iter()
            .filter(|p| !p.trim().is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Pass-1 split: every piece becomes a placeholder record.
    pub fn split_placeholders(&self, form: &str) -> Vec<TokenRecord> {
        self.split(form, Pass::First)
            .into_iter()
            .map(TokenRecord::placeholder)
            .collect()
    }

    /// Case-insensitive occurrences of the exempt patterns.
    fn shielded_spans(&self, form: &str) -> Vec<Range<usize>> {
        let mut spans = Vec::new();
        for pattern in &self.exempt_patterns {
            for (start, _) in form.char_indices() {
                let end = start + pattern.len();
                if let Some(candidate) = form.get(start..end) {
                    if candidate.eq_ignore_ascii_case(pattern) {
                        spans.push(start..end);
                    }
                }
            }
        }
        spans
    }
}

/// Result of a pass-2 split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPieces {
    /// One record per piece, in split order.
    pub records: Vec<TokenRecord>,
    /// Pieces the tagger output did not contain; they carry the literal-form
    /// fallback.
    pub unmatched: usize,
}

/// Pass-2 splitter: splits `form` and re-derives every piece against the
/// tagged `sentence` context.
///
/// Pieces are matched to tagged tokens by exact string value. Each piece
/// takes the earliest tagged occurrence not yet claimed, so repeated pieces
/// map onto successive occurrences in the sentence.
pub(crate) fn split_resolved(
    detector: &MalformedDetector,
    recovery: &Recovery<'_>,
    form: &str,
    sentence: &str,
) -> Result<ResolvedPieces, AnnotatorError> {
    let pieces = detector.split(form, Pass::Second);
    let context = sentence_context(detector, sentence);
    let tagged = recovery.annotators().tagger.tag(&context)?;

    let mut claimed = vec![false; tagged.len()];
    let mut records = Vec::with_capacity(pieces.len());
    let mut unmatched = 0;

    for piece in &pieces {
        match claim(&tagged, &mut claimed, piece) {
            Some(tag) => records.push(recovery.recover_piece(piece, tag)?),
            None => {
                debug!(piece = %piece, form = %form, "piece_not_in_tagged_sentence");
                unmatched += 1;
                records.push(recovery.fallback_piece(piece));
            }
        }
    }

    Ok(ResolvedPieces { records, unmatched })
}

/// Whitespace tokens of `sentence`, with pass-2 malformed tokens split so
/// that glued pieces are visible to the tagger.
fn sentence_context(detector: &MalformedDetector, sentence: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    for token in sentence.split_whitespace() {
        if detector.is_malformed(token, Pass::Second) {
            tokens.extend(detector.split(token, Pass::Second));
        } else {
            tokens.push(token.to_string());
        }
    }
    tokens
}

fn claim<'t>(tagged: &'t [TaggedToken], claimed: &mut [bool], piece: &str) -> Option<&'t str> {
    let idx = tagged
        .iter()
        .zip(claimed.iter())
        .position(|(t, used)| !used && t.token == piece)?;
    claimed[idx] = true;
    Some(tagged[idx].tag.as_str())
}
