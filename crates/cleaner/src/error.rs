use thiserror::Error;

/// Failure reported by an external tagging or lemmatization capability.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{capability} failed: {message}")]
pub struct AnnotatorError {
    pub capability: &'static str,
    pub message: String,
}

impl AnnotatorError {
    pub fn tagger(message: impl Into<String>) -> Self {
        Self {
            capability: "tagger",
            message: message.into(),
        }
    }

    pub fn lemmatizer(message: impl Into<String>) -> Self {
        Self {
            capability: "lemmatizer",
            message: message.into(),
        }
    }
}

/// Errors that can occur while cleaning.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CleanError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error(transparent)]
    Annotator(#[from] AnnotatorError),
}

/// A document-level failure, tagged with the document identifier so the
/// caller can record it and move on to the next document.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("document `{doc_id}` failed: {source}")]
pub struct DocumentError {
    pub doc_id: String,
    #[source]
    pub source: CleanError,
}
