//! Two-pass cleaner for word/lemma/POS tagged corpora.
//!
//! Input documents are tab-separated `form, lemma, tag` lines under one
//! header line, as exported by large tagged corpora (COHA's WLP files). The
//! exports have known defects: punctuation glued to words, missing sentence
//! boundaries, HTML debris, null bytes, spelling variants with different
//! lemmas. This crate repairs them.
//!
//! ## What we do
//!
//! - **First pass** ([`TokenNormalizer`]): drop control placeholders and
//!   filler tokens, substitute null bytes, unify spelling variants, decode
//!   HTML entities, split tokens with glued punctuation into placeholders.
//! - **Second pass** ([`SentenceReconciler`]): align the records with a
//!   sentence boundary oracle, insert `<eos>` records, re-derive lemma and
//!   tag for placeholders, and repair tokens glued across a sentence break.
//! - **Output** ([`CleanedDocument`]): the tagged format or a plain-text
//!   rendering.
//!
//! ## Collaborators
//!
//! Sentence segmentation, tagging and lemmatization are external. The
//! [`SentenceSegmenter`], [`SentenceTagger`] and [`Lemmatizer`] traits fix the
//! contract; callers bundle implementations into [`Annotators`].
//!
//! ## Invariants worth knowing
//!
//! - No record in the output carries the `<temp>` placeholder.
//! - Every input line is accounted for: kept, split or dropped for a reason
//!   recorded in the [`CleanReport`].
//! - An already clean document only gains `<eos>` records.
//! - Re-derived tags end in `_<malformed_tag>`, so downstream consumers can
//!   tell them from the corpus's own tags.
//!
//! ## Example
//!
//! ```rust,ignore
//! use cleaner::{Annotators, CleanConfig, Cleaner};
//!
//! let cleaner = Cleaner::new(CleanConfig::default(), annotators)?;
//! let doc = cleaner.clean_text("fic_1936_10080", &raw)?;
//! std::fs::write(out_path, doc.to_tagged_text())?;
//! ```

mod annotator;
mod config;
mod document;
mod entity;
mod error;
mod malformed;
mod normalize;
mod output;
mod pipeline;
mod reconcile;
mod record;
mod recover;
mod tagset;
mod whitespace;

pub use crate::annotator::{
    Annotators, CoarsePos, Lemmatizer, SentenceSegmenter, SentenceTagger, TaggedToken,
};
pub use crate::config::{CleanConfig, ExhaustedPolicy};
pub use crate::document::{CleanReport, CleanedDocument};
pub use crate::entity::{contains_entity, decode_entities};
pub use crate::error::{AnnotatorError, CleanError, DocumentError};
pub use crate::malformed::{MalformedDetector, Pass};
pub use crate::normalize::{DropReason, Normalized, TokenNormalizer};
pub use crate::output::{plain_text_from_tagged, render_plain_text, render_tagged, write_tagged};
pub use crate::pipeline::Cleaner;
pub use crate::reconcile::{
    FallbackReason, ReconcileStats, RecordBuilder, Resolution, SentenceReconciler,
};
pub use crate::record::{RecordStatus, TokenRecord, BOUNDARY, PLACEHOLDER};
pub use crate::tagset::TagMapper;
pub use crate::whitespace::{alignment_key, reconstruct_text};
