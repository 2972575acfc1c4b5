use thiserror::Error;

/// Errors raised while building the reference annotators.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AnnotateError {
    #[error("invalid segmenter configuration: {0}")]
    InvalidConfig(String),
}
