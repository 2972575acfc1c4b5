//! Corpus runner: walks an input directory, cleans every document on a
//! rayon pool and mirrors the results under an output directory.
//!
//! A document that fails (undecodable bytes, collaborator failure, write
//! error) is recorded in the [`CorpusReport`] and skipped; the rest of the
//! corpus is still processed. Only problems with the directories themselves
//! abort the run.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use rayon::prelude::*;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, info_span, warn};

use annotate::{AnnotateError, default_annotators};
use cleaner::{CleanError, CleanReport, Cleaner, plain_text_from_tagged};

use crate::config::{CorpusSettings, Settings};
use crate::decode::{InputEncoding, decode_document};

/// Run-level failures.
#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("input directory {} does not exist", .0.display())]
    MissingInput(PathBuf),

    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid UTF-8 in {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: std::str::Utf8Error,
    },

    #[error("invalid cleaner configuration: {0}")]
    Clean(#[from] CleanError),

    #[error("failed to build annotators: {0}")]
    Annotate(#[from] AnnotateError),

    #[error("failed to build worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}

impl CorpusError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        CorpusError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Outcome of one run over a directory.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CorpusReport {
    /// Run name from the settings file, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub documents: usize,
    pub succeeded: usize,
    pub documents_failed: usize,
    pub elapsed_millis: u64,
    pub summaries: Vec<DocumentSummary>,
    pub failures: Vec<DocumentFailure>,
}

impl CorpusReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    fn from_outcomes(outcomes: Vec<Result<DocumentSummary, DocumentFailure>>) -> Self {
        let mut report = CorpusReport {
            documents: outcomes.len(),
            ..Default::default()
        };
        for outcome in outcomes {
            match outcome {
                Ok(summary) => report.summaries.push(summary),
                Err(failure) => report.failures.push(failure),
            }
        }
        report.succeeded = report.summaries.len();
        report.documents_failed = report.failures.len();
        report
    }
}

/// A document that made it to the output directory.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentSummary {
    pub doc_id: String,
    /// Path relative to the input directory.
    pub path: PathBuf,
    /// Cleaning counters; absent for plain-text export.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<CleanReport>,
}

/// A document that was skipped.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentFailure {
    pub doc_id: String,
    pub path: PathBuf,
    pub error: String,
}

/// Cleans a corpus directory with a shared [`Cleaner`].
#[derive(Debug)]
pub struct CorpusRunner {
    cleaner: Cleaner,
    corpus: CorpusSettings,
    name: Option<String>,
}

impl CorpusRunner {
    /// Builds the reference annotators and the cleaner from `settings`.
    pub fn new(settings: &Settings) -> Result<Self, CorpusError> {
        let annotators = default_annotators(&settings.segmenter)?;
        let cleaner = Cleaner::new(settings.cleaner.clone(), annotators)?;
        Ok(Self {
            cleaner,
            corpus: settings.corpus.clone(),
            name: settings.name.clone(),
        })
    }

    /// Uses a caller-built cleaner, e.g. one with model-backed annotators.
    pub fn with_cleaner(cleaner: Cleaner, corpus: CorpusSettings) -> Self {
        Self {
            cleaner,
            corpus,
            name: None,
        }
    }

    /// Cleans every document under `input` into the mirrored path under
    /// `output`.
    pub fn clean_corpus(&self, input: &Path, output: &Path) -> Result<CorpusReport, CorpusError> {
        let span = info_span!("clean_corpus", input = %input.display(), output = %output.display());
        let _guard = span.enter();

        let mut report = run_pool(input, output, &self.corpus, |relative| {
            self.clean_one(input, output, relative)
        })?;
        report.name = self.name.clone();
        Ok(report)
    }

    fn clean_one(
        &self,
        input: &Path,
        output: &Path,
        relative: &Path,
    ) -> Result<DocumentSummary, DocumentFailure> {
        let doc_id = doc_id(relative);
        let fail = |error: String| DocumentFailure {
            doc_id: doc_id.clone(),
            path: relative.to_path_buf(),
            error,
        };

        let text = read_document(&input.join(relative), self.corpus.input_encoding)
            .map_err(|e| fail(e.to_string()))?;
        let lines: Vec<&str> = text.lines().collect();
        let doc = self
            .cleaner
            .clean_document(&doc_id, &lines)
            .map_err(|e| fail(e.to_string()))?;

        let target = output.join(relative);
        write_output(&target, |w| doc.write_tagged(w)).map_err(|e| fail(e.to_string()))?;

        Ok(DocumentSummary {
            doc_id,
            path: relative.to_path_buf(),
            report: Some(doc.report),
        })
    }
}

/// Converts cleaned tagged files under `input` into the plain-text export
/// under `output`.
pub fn export_text(
    input: &Path,
    output: &Path,
    corpus: &CorpusSettings,
    skip_token: &str,
) -> Result<CorpusReport, CorpusError> {
    let span = info_span!("export_text", input = %input.display(), output = %output.display());
    let _guard = span.enter();

    run_pool(input, output, corpus, |relative| {
        let doc_id = doc_id(relative);
        let fail = |error: CorpusError| DocumentFailure {
            doc_id: doc_id.clone(),
            path: relative.to_path_buf(),
            error: error.to_string(),
        };
        let tagged = read_document(&input.join(relative), corpus.input_encoding).map_err(fail)?;
        let text = plain_text_from_tagged(&tagged, skip_token);
        write_output(&output.join(relative), |w| w.write_all(text.as_bytes())).map_err(fail)?;
        Ok(DocumentSummary {
            doc_id,
            path: relative.to_path_buf(),
            report: None,
        })
    })
}

/// Relative paths of every file under `root` with the given extension,
/// sorted.
pub fn collect_documents(root: &Path, extension: &str) -> Result<Vec<PathBuf>, CorpusError> {
    if !root.is_dir() {
        return Err(CorpusError::MissingInput(root.to_path_buf()));
    }
    let mut found = Vec::new();
    let mut pending = vec![root.to_path_buf()];
    while let Some(dir) = pending.pop() {
        let entries = fs::read_dir(&dir).map_err(|e| CorpusError::io(&dir, e))?;
        for entry in entries {
            let entry = entry.map_err(|e| CorpusError::io(&dir, e))?;
            let path = entry.path();
            let file_type = entry.file_type().map_err(|e| CorpusError::io(&path, e))?;
            if file_type.is_dir() {
                pending.push(path);
            } else if path.extension().is_some_and(|ext| ext == extension) {
                if let Ok(relative) = path.strip_prefix(root) {
                    found.push(relative.to_path_buf());
                }
            }
        }
    }
    found.sort();
    Ok(found)
}

fn run_pool<F>(
    input: &Path,
    output: &Path,
    corpus: &CorpusSettings,
    process: F,
) -> Result<CorpusReport, CorpusError>
where
    F: Fn(&Path) -> Result<DocumentSummary, DocumentFailure> + Sync,
{
    let started = Instant::now();
    let documents = collect_documents(input, &corpus.extension)?;
    fs::create_dir_all(output).map_err(|e| CorpusError::io(output, e))?;
    info!(documents = documents.len(), jobs = corpus.jobs, "corpus_started");

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(corpus.jobs)
        .thread_name(|i| format!("wlpclean-worker-{i}"))
        .build()?;
    let outcomes: Vec<_> = pool.install(|| {
        documents
            .par_iter()
            .map(|relative| {
                let outcome = process(relative.as_path());
                if let Err(failure) = &outcome {
                    warn!(
                        doc_id = %failure.doc_id,
                        error = %failure.error,
                        "document_skipped"
                    );
                }
                outcome
            })
            .collect()
    });

    let mut report = CorpusReport::from_outcomes(outcomes);
    report.elapsed_millis = started.elapsed().as_millis() as u64;
    info!(
        succeeded = report.succeeded,
        failed = report.documents_failed,
        elapsed_millis = report.elapsed_millis,
        "corpus_finished"
    );
    Ok(report)
}

fn doc_id(relative: &Path) -> String {
    relative
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn read_document(path: &Path, encoding: InputEncoding) -> Result<String, CorpusError> {
    let bytes = fs::read(path).map_err(|e| CorpusError::io(path, e))?;
    decode_document(&bytes, encoding).map_err(|source| CorpusError::Decode {
        path: path.to_path_buf(),
        source,
    })
}

fn write_output<F>(target: &Path, write: F) -> Result<(), CorpusError>
where
    F: FnOnce(&mut BufWriter<File>) -> std::io::Result<()>,
{
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).map_err(|e| CorpusError::io(parent, e))?;
    }
    let file = File::create(target).map_err(|e| CorpusError::io(target, e))?;
    let mut writer = BufWriter::new(file);
    write(&mut writer).map_err(|e| CorpusError::io(target, e))?;
    writer.flush().map_err(|e| CorpusError::io(target, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn doc_id_is_the_file_stem() {
        assert_eq!(doc_id(Path::new("1930s/fic_1936_10080.txt")), "fic_1936_10080");
    }

    #[test]
    fn report_partitions_outcomes() {
        let ok = DocumentSummary {
            doc_id: "a".into(),
            path: "a.txt".into(),
            report: None,
        };
        let failed = DocumentFailure {
            doc_id: "b".into(),
            path: "b.txt".into(),
            error: "boom".into(),
        };
        let report = CorpusReport::from_outcomes(vec![Ok(ok), Err(failed)]);
        assert_eq!(report.documents, 2);
        assert_eq!(report.succeeded, 1);
        assert_eq!(report.documents_failed, 1);
        assert!(!report.is_success());
    }

    #[test]
    fn read_failures_are_typed() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("gone.txt");
        let err = read_document(&missing, InputEncoding::Auto).unwrap_err();
        assert!(matches!(&err, CorpusError::Io { path, .. } if path == &missing));

        let latin = dir.path().join("latin.txt");
        fs::write(&latin, b"caf\xe9\tcafe\tnn1\n").unwrap();
        let err = read_document(&latin, InputEncoding::Utf8).unwrap_err();
        assert!(matches!(err, CorpusError::Decode { .. }));
        assert!(err.to_string().contains("invalid UTF-8"));
    }

    #[test]
    fn write_failures_are_typed() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "file, not a directory").unwrap();
        let err = write_output(&blocker.join("out.txt"), |w| w.write_all(b"x")).unwrap_err();
        assert!(matches!(err, CorpusError::Io { .. }));
    }

    #[test]
    fn missing_input_directory_is_reported() {
        let err = collect_documents(Path::new("/definitely/not/here"), "txt").unwrap_err();
        assert!(matches!(err, CorpusError::MissingInput(_)));
    }
}
