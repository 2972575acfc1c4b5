//! Workspace umbrella crate for `wlpclean`.
//!
//! Stitches the cleaning core (`cleaner`), the reference annotators
//! (`annotate`) and the corpus plumbing together so callers can clean a whole
//! directory of tagged documents with one settings value:
//!
//! ```rust,no_run
//! use std::path::Path;
//! use wlpclean::{CorpusRunner, Settings};
//!
//! let settings = Settings::from_file("wlpclean.yaml")?;
//! let runner = CorpusRunner::new(&settings)?;
//! let report = runner.clean_corpus(Path::new("coha/wlp"), Path::new("coha/clean/tagged"))?;
//! println!("{} cleaned, {} failed", report.succeeded, report.documents_failed);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Single documents go straight through [`Cleaner`]:
//!
//! ```rust
//! use wlpclean::{default_annotators, CleanConfig, Cleaner, SegmenterConfig};
//!
//! let annotators = default_annotators(&SegmenterConfig::default()).unwrap();
//! let cleaner = Cleaner::new(CleanConfig::default(), annotators).unwrap();
//! let doc = cleaner
//!     .clean_text("news_1990_1", "@@1\nwait--what\twait--what\tnn1\n?\t?\ty\n")
//!     .unwrap();
//! assert_eq!(doc.to_plain_text("q!"), "@@1\n\nwait -- what ?");
//! ```

pub mod config;
mod corpus;
mod decode;

pub use annotate::{
    AnnotateError, DEFAULT_ABBREVIATIONS, LexiconTagger, RuleLemmatizer, RuleSegmenter,
    SegmenterConfig, default_annotators,
};
pub use cleaner::{
    Annotators, AnnotatorError, BOUNDARY, CleanConfig, CleanError, CleanReport, CleanedDocument,
    Cleaner, CoarsePos, DocumentError, DropReason, ExhaustedPolicy, Lemmatizer, PLACEHOLDER,
    RecordStatus, SentenceSegmenter, SentenceTagger, TagMapper, TaggedToken, TokenRecord,
    plain_text_from_tagged,
};
pub use config::{CorpusSettings, Overrides, Settings, SettingsError};
pub use corpus::{
    CorpusError, CorpusReport, CorpusRunner, DocumentFailure, DocumentSummary, collect_documents,
    export_text,
};
pub use decode::{InputEncoding, decode_document};
