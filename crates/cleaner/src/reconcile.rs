//! Second pass: aligning the record stream with the boundary oracle.
//!
//! The reconciler walks normalized records against the oracle's sentences of
//! the reconstructed text. It keeps three cursors in step: the record stream,
//! a buffer of the current sentence being rebuilt, and the oracle sentence
//! list. Along the way it
//!
//! - emits an `<eos>` record whenever the buffer matches the oracle sentence,
//! - resolves placeholder and missing-field records through the tagger,
//! - repairs *drift*: a malformed token glued across a sentence break makes
//!   the buffer overshoot the sentence; the token is re-split with the
//!   second-pass rules and its pieces are replayed around the boundary.
//!
//! Comparison uses [`alignment_key`](crate::alignment_key): lower-cased,
//! whitespace removed. The oracle sees `home.The` while the pieces are
//! `home`, `.`, `The`; without whitespace both sides read `home.the`.
//!
//! Records are appended only once final. Placeholders are resolved before
//! they reach the [`RecordBuilder`], so nothing is deleted and re-added.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::annotator::{Annotators, TaggedToken};
use crate::config::{CleanConfig, ExhaustedPolicy};
use crate::error::AnnotatorError;
use crate::malformed::{split_resolved, MalformedDetector, Pass};
use crate::record::TokenRecord;
use crate::recover::Recovery;
use crate::whitespace::alignment_key;

/// Counters describing one reconciliation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileStats {
    /// Sentences returned by the oracle (empty ones excluded).
    pub oracle_sentences: usize,
    /// `<eos>` records emitted.
    pub boundaries: usize,
    /// Records re-derived from tagger output.
    pub resolved: usize,
    /// Records that took the literal-form fallback.
    pub fallbacks: usize,
    /// Tokens re-split because they overran a sentence.
    pub drift_repairs: usize,
    /// Pass-2 pieces with no match in the tagged sentence.
    pub unmatched_pieces: usize,
    /// Boundaries placed after a token whose text continues into the next
    /// sentence.
    pub carried_boundaries: usize,
    /// Records appended without oracle alignment.
    pub passthrough: usize,
    /// Records dropped under [`ExhaustedPolicy::Drop`].
    pub dropped_after_exhaustion: usize,
    /// Oracle sentences never completed because the tokens ran out.
    pub unconsumed_sentences: usize,
    /// The buffer stopped being a prefix of the oracle text.
    pub alignment_lost: bool,
}

/// How a record needing resolution was settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Tag and lemma came from the collaborators.
    Resolved(TokenRecord),
    /// The literal form stands in for the lemma.
    Fallback(TokenRecord, FallbackReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    /// The record closes its sentence.
    EndOfSentence,
    /// Redaction marker; never tagged.
    RedactionMarker,
    /// Token position beyond the tagged sentence.
    IndexOutOfRange,
    /// Tagged token at the position is a different word.
    TokenMismatch,
    /// No oracle alignment available.
    Unaligned,
}

/// Append-only sink for finalized records.
#[derive(Debug, Default)]
pub struct RecordBuilder {
    records: Vec<TokenRecord>,
}

impl RecordBuilder {
    pub fn push(&mut self, record: TokenRecord) {
        debug_assert!(
            !record.needs_resolution(),
            "unresolved record reached the builder: {record:?}"
        );
        self.records.push(record);
    }

    pub fn push_boundary(&mut self) {
        self.records.push(TokenRecord::boundary());
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn into_records(self) -> Vec<TokenRecord> {
        self.records
    }
}

/// Forms of the sentence being rebuilt and their joint alignment key.
#[derive(Debug, Default)]
struct SentenceBuffer {
    forms: Vec<String>,
    key: String,
}

impl SentenceBuffer {
    fn push(&mut self, form: &str) {
        self.forms.push(form.to_string());
        self.key.push_str(&alignment_key(form));
    }

    fn pop(&mut self) {
        if let Some(form) = self.forms.pop() {
            let len = alignment_key(&form).len();
            self.key.truncate(self.key.len() - len);
        }
    }

    /// Buffer seeded with text carried over from the previous sentence.
    fn carried(remainder: String) -> Self {
        if remainder.is_empty() {
            return Self::default();
        }
        Self {
            forms: vec![remainder.clone()],
            key: remainder,
        }
    }

    fn is_empty(&self) -> bool {
        self.key.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Aligned,
    Lost,
}

/// The stateful second pass. Feed records with [`push`](Self::push), then
/// call [`finish`](Self::finish).
pub struct SentenceReconciler<'a> {
    config: &'a CleanConfig,
    detector: &'a MalformedDetector,
    recovery: Recovery<'a>,
    sentences: Vec<String>,
    keys: Vec<String>,
    sentence_index: usize,
    token_index: usize,
    buffer: SentenceBuffer,
    builder: RecordBuilder,
    tagged: Option<(usize, Vec<TaggedToken>)>,
    mode: Mode,
    exhaustion_logged: bool,
    stats: ReconcileStats,
}

impl<'a> SentenceReconciler<'a> {
    pub fn new(
        config: &'a CleanConfig,
        detector: &'a MalformedDetector,
        annotators: &'a Annotators,
        sentences: Vec<String>,
    ) -> Self {
        let (sentences, keys): (Vec<String>, Vec<String>) = sentences
            .into_iter()
            .map(|s| {
                let key = alignment_key(&s);
                (s, key)
            })
            .filter(|(_, key)| !key.is_empty())
            .unzip();

        let stats = ReconcileStats {
            oracle_sentences: keys.len(),
            ..Default::default()
        };

        Self {
            config,
            detector,
            recovery: Recovery::new(config, annotators),
            sentences,
            keys,
            sentence_index: 0,
            token_index: 0,
            buffer: SentenceBuffer::default(),
            builder: RecordBuilder::default(),
            tagged: None,
            mode: Mode::Aligned,
            exhaustion_logged: false,
            stats,
        }
    }

    /// Consumes one normalized record.
    pub fn push(&mut self, record: TokenRecord) -> Result<(), AnnotatorError> {
        if self.mode == Mode::Lost || self.sentence_index >= self.keys.len() {
            self.push_unaligned(record);
            return Ok(());
        }

        let position = self.token_index;
        self.token_index += 1;
        self.buffer.push(&record.form);

        let key_len = self.keys[self.sentence_index].len();
        let end_of_sentence = self.buffer.key == self.keys[self.sentence_index];
        let drift = !end_of_sentence && self.buffer.key.len() > key_len;

        if drift && self.detector.is_malformed(&record.form, Pass::Second) {
            self.buffer.pop();
            return self.repair_drift(&record.form);
        }

        let record = self.finalize(record, position, end_of_sentence)?;
        self.builder.push(record);

        if end_of_sentence {
            self.close_sentence();
        } else if drift {
            self.realign();
        }
        Ok(())
    }

    /// Returns the final records and counters. Oracle sentences left open
    /// when the tokens run out get no boundary.
    pub fn finish(mut self) -> (Vec<TokenRecord>, ReconcileStats) {
        if self.mode == Mode::Aligned && self.sentence_index < self.keys.len() {
            self.stats.unconsumed_sentences = self.keys.len() - self.sentence_index;
            debug!(
                unconsumed = self.stats.unconsumed_sentences,
                open_forms = self.buffer.forms.len(),
                "token_stream_exhausted"
            );
        }
        (self.builder.into_records(), self.stats)
    }

    fn finalize(
        &mut self,
        record: TokenRecord,
        position: usize,
        end_of_sentence: bool,
    ) -> Result<TokenRecord, AnnotatorError> {
        if !record.needs_resolution() {
            return Ok(record);
        }

        let resolution = if end_of_sentence {
            self.fallback(&record, FallbackReason::EndOfSentence)
        } else if self.config.is_redaction_marker(&record.form) {
            self.fallback(&record, FallbackReason::RedactionMarker)
        } else {
            match self.tag_at(position, &record.form)? {
                Ok(tag) => Resolution::Resolved(self.recovery.recover(&record.form, &tag)?),
                Err(reason) => self.fallback(&record, reason),
            }
        };
        Ok(self.settle(resolution))
    }

    fn fallback(&self, record: &TokenRecord, reason: FallbackReason) -> Resolution {
        Resolution::Fallback(self.recovery.fallback(record), reason)
    }

    fn settle(&mut self, resolution: Resolution) -> TokenRecord {
        match resolution {
            Resolution::Resolved(record) => {
                self.stats.resolved += 1;
                record
            }
            Resolution::Fallback(record, reason) => {
                self.stats.fallbacks += 1;
                debug!(
                    form = %record.form,
                    reason = ?reason,
                    sentence_index = self.sentence_index,
                    "literal_form_fallback"
                );
                record
            }
        }
    }

    /// Penn tag for the token at `position` of the current oracle sentence.
    /// The sentence is tagged once and reused until the next boundary.
    fn tag_at(
        &mut self,
        position: usize,
        form: &str,
    ) -> Result<Result<String, FallbackReason>, AnnotatorError> {
        let current = self.sentence_index;
        if self.tagged.as_ref().map(|(idx, _)| *idx) != Some(current) {
            let tagged = self
                .recovery
                .annotators()
                .tag_sentence(&self.sentences[current])?;
            self.tagged = Some((current, tagged));
        }
        let tagged = match &self.tagged {
            Some((_, tagged)) => tagged,
            None => return Ok(Err(FallbackReason::IndexOutOfRange)),
        };

        Ok(match tagged.get(position) {
            Some(t) if t.token.to_lowercase() == form.to_lowercase() => Ok(t.tag.clone()),
            Some(t) => {
                debug!(form = %form, tagged = %t.token, position, "tagged_token_mismatch");
                Err(FallbackReason::TokenMismatch)
            }
            None => {
                debug!(form = %form, position, len = tagged.len(), "token_index_out_of_range");
                Err(FallbackReason::IndexOutOfRange)
            }
        })
    }

    fn close_sentence(&mut self) {
        self.builder.push_boundary();
        self.stats.boundaries += 1;
        self.buffer = SentenceBuffer::default();
        self.sentence_index += 1;
        self.token_index = 0;
    }

    /// Re-splits a token that overran the current sentence and replays its
    /// pieces, closing the sentence as soon as the buffer matches it.
    fn repair_drift(&mut self, form: &str) -> Result<(), AnnotatorError> {
        let sentence = self.sentences[self.sentence_index].clone();
        let pieces = split_resolved(self.detector, &self.recovery, form, &sentence)?;

        self.stats.drift_repairs += 1;
        self.stats.unmatched_pieces += pieces.unmatched;
        self.stats.resolved += pieces.records.len() - pieces.unmatched;
        self.stats.fallbacks += pieces.unmatched;
        debug!(
            form = %form,
            pieces = pieces.records.len(),
            sentence_index = self.sentence_index,
            "drift_repaired"
        );

        let mut closed = false;
        for piece in pieces.records {
            if self.mode == Mode::Lost || self.sentence_index >= self.keys.len() {
                self.push_unaligned(piece);
                continue;
            }
            self.buffer.push(&piece.form);
            self.builder.push(piece);
            if self.buffer.key == self.keys[self.sentence_index] {
                self.close_sentence();
                closed = true;
            }
        }

        // Leftover pieces are one fragment of a single token in the next
        // sentence.
        if closed {
            self.token_index = usize::from(!self.buffer.is_empty());
        }
        self.realign();
        Ok(())
    }

    /// Handles a buffer that still overshoots its sentence. If the sentence
    /// is a prefix of the buffer, the boundary goes after the offending token
    /// and the surplus text is carried into the next sentence. Otherwise the
    /// stream no longer matches the oracle and alignment is abandoned.
    fn realign(&mut self) {
        while self.mode == Mode::Aligned && self.sentence_index < self.keys.len() {
            let key = &self.keys[self.sentence_index];
            if self.buffer.key.len() <= key.len() {
                if self.buffer.key == *key {
                    self.close_sentence();
                }
                break;
            }
            if !self.buffer.key.starts_with(key.as_str()) {
                warn!(
                    sentence_index = self.sentence_index,
                    buffer = %self.buffer.key,
                    sentence = %key,
                    "alignment_lost"
                );
                self.mode = Mode::Lost;
                self.stats.alignment_lost = true;
                self.buffer = SentenceBuffer::default();
                break;
            }

            let remainder = self.buffer.key[key.len()..].to_string();
            debug!(
                sentence_index = self.sentence_index,
                carried = %remainder,
                "boundary_inside_token"
            );
            self.stats.carried_boundaries += 1;
            self.close_sentence();
            self.token_index = usize::from(!remainder.is_empty());
            self.buffer = SentenceBuffer::carried(remainder);
        }
    }

    /// Appends a record once the oracle can no longer align it.
    fn push_unaligned(&mut self, record: TokenRecord) {
        let exhausted = self.mode == Mode::Aligned;
        if exhausted && !self.exhaustion_logged {
            self.exhaustion_logged = true;
            info!(
                sentences = self.keys.len(),
                policy = ?self.config.exhausted_policy,
                "oracle_exhausted"
            );
        }
        if exhausted && self.config.exhausted_policy == ExhaustedPolicy::Drop {
            self.stats.dropped_after_exhaustion += 1;
            return;
        }

        let record = if record.needs_resolution() {
            let resolution = self.fallback(&record, FallbackReason::Unaligned);
            self.settle(resolution)
        } else {
            record
        };
        self.stats.passthrough += 1;
        self.builder.push(record);
    }
}

impl std::fmt::Debug for SentenceReconciler<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SentenceReconciler")
            .field("sentence_index", &self.sentence_index)
            .field("token_index", &self.token_index)
            .field("sentences", &self.keys.len())
            .field("mode", &self.mode)
            .field("emitted", &self.builder.len())
            .finish()
    }
}
