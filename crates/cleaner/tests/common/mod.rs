//! Deterministic collaborators shared by the integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use cleaner::{
    AnnotatorError, Annotators, CleanConfig, Cleaner, CoarsePos, Lemmatizer, SentenceSegmenter,
    SentenceTagger, TaggedToken,
};

/// Breaks after `.`, `!` or `?` when followed by whitespace, an upper-case
/// letter or the end of the text.
pub struct SentenceEndSegmenter;

impl SentenceSegmenter for SentenceEndSegmenter {
    fn segment(&self, text: &str) -> Vec<String> {
        let chars: Vec<(usize, char)> = text.char_indices().collect();
        let mut sentences = Vec::new();
        let mut start = 0;
        for (i, &(pos, ch)) in chars.iter().enumerate() {
            if !matches!(ch, '.' | '!' | '?') {
                continue;
            }
            let end = pos + ch.len_utf8();
            let breaks = match chars.get(i + 1) {
                None => true,
                Some(&(_, next)) => next.is_whitespace() || next.is_uppercase(),
            };
            if breaks {
                push_trimmed(&mut sentences, &text[start..end]);
                start = end;
            }
        }
        push_trimmed(&mut sentences, &text[start..]);
        sentences
    }
}

fn push_trimmed(sentences: &mut Vec<String>, piece: &str) {
    let piece = piece.trim();
    if !piece.is_empty() {
        sentences.push(piece.to_string());
    }
}

/// Returns the same sentences whatever the text.
pub struct ScriptedSegmenter(pub Vec<&'static str>);

impl SentenceSegmenter for ScriptedSegmenter {
    fn segment(&self, _text: &str) -> Vec<String> {
        self.0.iter().map(|s| s.to_string()).collect()
    }
}

/// Table lookup; punctuation tags as `.`, unknown words as `NN`.
pub struct LookupTagger(pub HashMap<String, String>);

impl LookupTagger {
    pub fn new(entries: &[(&str, &str)]) -> Self {
        Self(
            entries
                .iter()
                .map(|(w, t)| (w.to_lowercase(), t.to_string()))
                .collect(),
        )
    }
}

impl SentenceTagger for LookupTagger {
    fn tag(&self, tokens: &[String]) -> Result<Vec<TaggedToken>, AnnotatorError> {
        Ok(tokens
            .iter()
            .map(|token| {
                let tag = match self.0.get(&token.to_lowercase()) {
                    Some(tag) => tag.clone(),
                    None if !token.chars().any(char::is_alphanumeric) => ".".into(),
                    None => "NN".into(),
                };
                TaggedToken::new(token.clone(), tag)
            })
            .collect())
    }
}

pub struct BrokenTagger;

impl SentenceTagger for BrokenTagger {
    fn tag(&self, _tokens: &[String]) -> Result<Vec<TaggedToken>, AnnotatorError> {
        Err(AnnotatorError::tagger("model not loaded"))
    }
}

/// Lower-cases; strips a plural `s` from nouns.
pub struct LowercaseLemmatizer;

impl Lemmatizer for LowercaseLemmatizer {
    fn lemmatize(&self, token: &str, pos: CoarsePos) -> Result<String, AnnotatorError> {
        let lower = token.to_lowercase();
        match lower.strip_suffix('s') {
            Some(stem) if pos == CoarsePos::Noun && stem.len() > 2 => Ok(stem.to_string()),
            _ => Ok(lower),
        }
    }
}

pub fn tagger() -> LookupTagger {
    LookupTagger::new(&[
        ("went", "VBD"),
        ("home", "NN"),
        ("dogs", "NNS"),
        ("bark", "VBP"),
        ("quickly", "RB"),
        ("happy", "JJ"),
        ("don't", "VBP"),
        ("the", "DT"),
    ])
}

pub fn cleaner_with(
    config: CleanConfig,
    segmenter: impl SentenceSegmenter + 'static,
    tagger: impl SentenceTagger + 'static,
) -> Cleaner {
    let annotators = Annotators::new(
        Arc::new(segmenter),
        Arc::new(tagger),
        Arc::new(LowercaseLemmatizer),
    );
    Cleaner::new(config, annotators).expect("valid configuration")
}

pub fn default_cleaner() -> Cleaner {
    cleaner_with(CleanConfig::default(), SentenceEndSegmenter, tagger())
}

/// `(form, lemma, tag)` triples of a cleaned document.
pub fn triples(doc: &cleaner::CleanedDocument) -> Vec<(String, String, String)> {
    doc.records
        .iter()
        .map(|r| (r.form.clone(), r.lemma.clone(), r.tag.clone()))
        .collect()
}
