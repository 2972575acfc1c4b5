//! Rule-based sentence boundary oracle.
//!
//! Breaks after `.`, `!` or `?` (optionally followed by closing quotes or
//! brackets) when the next token opens a sentence: an upper-case letter, a
//! digit or an opening quote/bracket. A terminal glued directly to an
//! upper-case word (`home.The`) is a break too; tagged corpus exports are
//! full of those.
//!
//! Periods never break after a known abbreviation (`Dr.`, `e.g.`) or a
//! single-letter initial (`J. R. R. Tolkien`).

use fxhash::FxHashSet;
use serde::{Deserialize, Serialize};
use tracing::debug;

use cleaner::SentenceSegmenter;

use crate::error::AnnotateError;

/// Abbreviations the corpus is known to contain. Always recognised, together
/// with the common titles and any `extra_abbreviations`.
pub const DEFAULT_ABBREVIATIONS: &[&str] = &[
    "dr", "vs", "mr", "mrs", "prof", "inc", "i.e", "e.g", "p.k", "c.c.f", "m.c", "etc", "o.k",
    "fr", "acct", "co", "d.o.a", "approx", "ave", "bros", "sq", "st", "d.j",
];

const BUILTIN_ABBREVIATIONS: &[&str] = &[
    "ms", "jr", "sr", "gen", "col", "capt", "lt", "sgt", "rev", "hon", "messrs", "mt", "ft",
    "gov", "sen", "u.s", "a.m", "p.m",
];

/// Settings for [`RuleSegmenter`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmenterConfig {
    /// Abbreviations, without the final period, added to
    /// [`DEFAULT_ABBREVIATIONS`]. Matched case-insensitively.
    pub extra_abbreviations: Vec<String>,
}

impl SegmenterConfig {
    pub fn validate(&self) -> Result<(), AnnotateError> {
        for abbr in &self.extra_abbreviations {
            if abbr.trim().is_empty() {
                return Err(AnnotateError::InvalidConfig(
                    "extra_abbreviations must not contain empty entries".into(),
                ));
            }
            if abbr.contains(char::is_whitespace) {
                return Err(AnnotateError::InvalidConfig(format!(
                    "abbreviation `{abbr}` contains whitespace"
                )));
            }
        }
        Ok(())
    }
}

/// Deterministic sentence splitter. The abbreviation set is fixed at
/// construction.
#[derive(Debug, Clone)]
pub struct RuleSegmenter {
    abbreviations: FxHashSet<String>,
}

impl RuleSegmenter {
    pub fn new(config: &SegmenterConfig) -> Result<Self, AnnotateError> {
        config.validate()?;
        let abbreviations = BUILTIN_ABBREVIATIONS
            .iter()
            .chain(DEFAULT_ABBREVIATIONS)
            .map(|s| s.to_string())
            .chain(
                config
                    .extra_abbreviations
                    .iter()
                    .map(|s| s.trim_end_matches('.').to_lowercase()),
            )
            .collect();
        Ok(Self { abbreviations })
    }

    /// `true` for a known abbreviation or a single-letter initial. `word` may
    /// carry its trailing period.
    pub fn is_abbreviation(&self, word: &str) -> bool {
        let word = word
            .trim_end_matches('.')
            .trim_start_matches(|c: char| !c.is_alphanumeric());
        if word.is_empty() {
            return false;
        }
        if self.abbreviations.contains(&word.to_lowercase()) {
            return true;
        }
        let last_segment = word.rsplit('.').next().unwrap_or(word);
        let mut chars = last_segment.chars();
        matches!((chars.next(), chars.next()), (Some(c), None) if c.is_alphabetic())
    }

    /// Byte offsets at which `text` is cut into sentences.
    fn cuts(&self, text: &str) -> Vec<usize> {
        let tokens = token_spans(text);
        let mut cuts = Vec::new();
        for (i, &(start, end)) in tokens.iter().enumerate() {
            let token = &text[start..end];
            cuts.extend(self.glued_breaks(token).into_iter().map(|off| start + off));

            let prev = i.checked_sub(1).map(|p| &text[tokens[p].0..tokens[p].1]);
            let next = tokens.get(i + 1).map(|&(s, e)| &text[s..e]);
            if self.ends_sentence(prev, token, next) {
                cuts.push(end);
            }
        }
        cuts
    }

    /// Offsets inside `token` where a terminal is glued to the next
    /// sentence's first word.
    fn glued_breaks(&self, token: &str) -> Vec<usize> {
        let chars: Vec<(usize, char)> = token.char_indices().collect();
        let mut breaks = Vec::new();
        for (k, &(pos, ch)) in chars.iter().enumerate() {
            if !is_terminal(ch) {
                continue;
            }
            let mut j = k + 1;
            while chars.get(j).is_some_and(|&(_, c)| is_closer(c)) {
                j += 1;
            }
            let Some(&(cut, opener)) = chars.get(j) else {
                continue;
            };
            if !opener.is_uppercase() {
                continue;
            }

            let head = &token[..pos];
            let run_start = head
                .char_indices()
                .rev()
                .take_while(|&(_, c)| c.is_alphabetic() || c == '.')
                .last()
                .map_or(pos, |(i, _)| i);
            let word = head[run_start..].trim_matches('.');
            if !word.chars().any(char::is_alphabetic) {
                continue;
            }
            if ch == '.' && self.is_abbreviation(word) {
                continue;
            }
            breaks.push(cut);
        }
        breaks
    }

    fn ends_sentence(&self, prev: Option<&str>, token: &str, next: Option<&str>) -> bool {
        let core = token.trim_end_matches(is_closer);
        let Some(last) = core.chars().last() else {
            return false;
        };
        if !is_terminal(last) {
            return false;
        }
        if last == '.' {
            let word = core.trim_end_matches('.');
            // A bare period belongs to the word before it.
            let word = if word.chars().any(char::is_alphanumeric) {
                word
            } else {
                prev.unwrap_or_default()
            };
            if self.is_abbreviation(word) {
                return false;
            }
        }
        match next {
            None => true,
            Some(next) => next
                .chars()
                .next()
                .is_some_and(|c| c.is_uppercase() || c.is_ascii_digit() || is_opener(c)),
        }
    }
}

impl SentenceSegmenter for RuleSegmenter {
    fn segment(&self, text: &str) -> Vec<String> {
        let mut sentences = Vec::new();
        let mut from = 0;
        for cut in self.cuts(text) {
            push_trimmed(&mut sentences, &text[from..cut]);
            from = cut;
        }
        push_trimmed(&mut sentences, &text[from..]);
        debug!(sentences = sentences.len(), "rule_segmentation");
        sentences
    }
}

fn push_trimmed(sentences: &mut Vec<String>, piece: &str) {
    let piece = piece.trim();
    if !piece.is_empty() {
        sentences.push(piece.to_string());
    }
}

/// `(start, end)` byte spans of the whitespace-separated tokens.
fn token_spans(text: &str) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut start = None;
    for (i, c) in text.char_indices() {
        match (c.is_whitespace(), start) {
            (true, Some(s)) => {
                spans.push((s, i));
                start = None;
            }
            (false, None) => start = Some(i),
            _ => {}
        }
    }
    if let Some(s) = start {
        spans.push((s, text.len()));
    }
    spans
}

fn is_terminal(c: char) -> bool {
    matches!(c, '.' | '!' | '?')
}

fn is_closer(c: char) -> bool {
    matches!(c, '"' | '\'' | '\u{201d}' | '\u{2019}' | ')' | ']')
}

fn is_opener(c: char) -> bool {
    matches!(c, '"' | '\'' | '\u{201c}' | '\u{2018}' | '(' | '[')
}
