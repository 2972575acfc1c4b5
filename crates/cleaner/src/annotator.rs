//! Contracts for the external capabilities the cleaner depends on.
//!
//! The cleaner does not own a sentence splitter, a tagger or a lemmatizer.
//! It defines exactly how they are called:
//!
//! - [`SentenceSegmenter`]: boundary oracle over the reconstructed text.
//! - [`SentenceTagger`]: Penn Treebank tags for one tokenized sentence.
//! - [`Lemmatizer`]: base form for a token in a coarse category.
//!
//! All three are `Send + Sync`: one instance is built per process from
//! immutable settings and shared read-only by every worker.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::AnnotatorError;

/// Coarse part of speech understood by the lemmatizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoarsePos {
    Noun,
    Verb,
    Adj,
    Adv,
}

impl fmt::Display for CoarsePos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CoarsePos::Noun => "noun",
            CoarsePos::Verb => "verb",
            CoarsePos::Adj => "adj",
            CoarsePos::Adv => "adv",
        };
        f.write_str(name)
    }
}

/// A `(token, tag)` pair returned by a [`SentenceTagger`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggedToken {
    pub token: String,
    pub tag: String,
}

impl TaggedToken {
    pub fn new(token: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            tag: tag.into(),
        }
    }
}

/// Splits text into sentences.
///
/// Must be deterministic: the same text always yields the same sentences.
/// Sentences are expected to be substrings of the input; the reconciler
/// aligns on their non-whitespace characters.
pub trait SentenceSegmenter: Send + Sync {
    fn segment(&self, text: &str) -> Vec<String>;
}

/// Tags one tokenized sentence.
///
/// The result should have the same length and order as `tokens`; callers
/// still guard every positional lookup.
pub trait SentenceTagger: Send + Sync {
    fn tag(&self, tokens: &[String]) -> Result<Vec<TaggedToken>, AnnotatorError>;
}

/// Reduces a token to its base form.
pub trait Lemmatizer: Send + Sync {
    fn lemmatize(&self, token: &str, pos: CoarsePos) -> Result<String, AnnotatorError>;
}

/// The three collaborators, bundled for construction of a
/// [`Cleaner`](crate::Cleaner).
#[derive(Clone)]
pub struct Annotators {
    pub segmenter: Arc<dyn SentenceSegmenter>,
    pub tagger: Arc<dyn SentenceTagger>,
    pub lemmatizer: Arc<dyn Lemmatizer>,
}

impl Annotators {
    pub fn new(
        segmenter: Arc<dyn SentenceSegmenter>,
        tagger: Arc<dyn SentenceTagger>,
        lemmatizer: Arc<dyn Lemmatizer>,
    ) -> Self {
        Self {
            segmenter,
            tagger,
            lemmatizer,
        }
    }

    /// Tags the whitespace tokens of `sentence`.
    pub(crate) fn tag_sentence(&self, sentence: &str) -> Result<Vec<TaggedToken>, AnnotatorError> {
        let tokens: Vec<String> = sentence.split_whitespace().map(str::to_string).collect();
        self.tagger.tag(&tokens)
    }
}

impl fmt::Debug for Annotators {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Annotators").finish_non_exhaustive()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Deterministic stand-ins for the collaborators.

    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    /// Returns a fixed sentence list regardless of the input text.
    pub struct FixedSegmenter(pub Vec<String>);

    impl SentenceSegmenter for FixedSegmenter {
        fn segment(&self, _text: &str) -> Vec<String> {
            self.0.clone()
        }
    }

    /// Breaks after every whitespace token ending in `.`, `!` or `?`, and
    /// inside tokens where a period is glued to an upper-case letter.
    pub struct PeriodSegmenter;

    impl SentenceSegmenter for PeriodSegmenter {
        fn segment(&self, text: &str) -> Vec<String> {
            let chars: Vec<(usize, char)> = text.char_indices().collect();
            let mut sentences = Vec::new();
            let mut start = 0;
            for (i, &(pos, ch)) in chars.iter().enumerate() {
                if !matches!(ch, '.' | '!' | '?') {
                    continue;
                }
                let end = pos + ch.len_utf8();
                let next = chars.get(i + 1).map(|&(_, c)| c);
                let breaks = match next {
                    None => true,
                    Some(c) => c.is_whitespace() || c.is_uppercase(),
                };
                if breaks {
                    let sentence = text[start..end].trim();
                    if !sentence.is_empty() {
                        sentences.push(sentence.to_string());
                    }
                    start = end;
                }
            }
            let rest = text[start..].trim();
            if !rest.is_empty() {
                sentences.push(rest.to_string());
            }
            sentences
        }
    }

    /// Looks tokens up in a small table; punctuation gets `.`, everything
    /// else `NN`. Counts calls.
    #[derive(Default)]
    pub struct TableTagger {
        pub table: HashMap<String, String>,
        pub calls: AtomicUsize,
    }

    impl TableTagger {
        pub fn with(entries: &[(&str, &str)]) -> Self {
            Self {
                table: entries
                    .iter()
                    .map(|(w, t)| (w.to_lowercase(), t.to_string()))
                    .collect(),
                calls: AtomicUsize::new(0),
            }
        }

        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl SentenceTagger for TableTagger {
        fn tag(&self, tokens: &[String]) -> Result<Vec<TaggedToken>, AnnotatorError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(tokens
                .iter()
                .map(|t| {
                    let tag = match self.table.get(&t.to_lowercase()) {
                        Some(tag) => tag.clone(),
                        None if t.chars().all(|c| !c.is_alphanumeric()) => ".".to_string(),
                        None => "NN".to_string(),
                    };
                    TaggedToken::new(t.clone(), tag)
                })
                .collect())
        }
    }

    /// Always fails.
    pub struct FailingTagger;

    impl SentenceTagger for FailingTagger {
        fn tag(&self, _tokens: &[String]) -> Result<Vec<TaggedToken>, AnnotatorError> {
            Err(AnnotatorError::tagger("model unavailable"))
        }
    }

    /// Lower-cases the token and strips a plural `s` from nouns.
    pub struct LowerLemmatizer;

    impl Lemmatizer for LowerLemmatizer {
        fn lemmatize(&self, token: &str, pos: CoarsePos) -> Result<String, AnnotatorError> {
            let lower = token.to_lowercase();
            if pos == CoarsePos::Noun && lower.len() > 3 && lower.ends_with('s') {
                return Ok(lower[..lower.len() - 1].to_string());
            }
            Ok(lower)
        }
    }

    pub fn annotators(
        segmenter: impl SentenceSegmenter + 'static,
        tagger: impl SentenceTagger + 'static,
    ) -> Annotators {
        Annotators::new(Arc::new(segmenter), Arc::new(tagger), Arc::new(LowerLemmatizer))
    }
}
