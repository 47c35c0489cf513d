use crate::document::Document;
use crate::engine::{EngineError, PatchEngine};
use crate::report::ReportCollector;
use crate::rule::PatchRule;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// What one run produced: the per-rule report, whether the text changed, and
/// the final text (for diff display or dry-run inspection).
#[derive(Debug)]
pub struct SessionOutcome {
    pub report: ReportCollector,
    pub modified: bool,
    pub text: String,
}

/// Apply `rules` to the file at `path`, writing the result back only if the
/// document was actually mutated. An unchanged file is left byte-for-byte
/// untouched. A fatal engine error propagates before any write, so a
/// half-applied in-memory document is never persisted.
pub fn apply_to_file(path: &Path, rules: &[PatchRule]) -> Result<SessionOutcome, SessionError> {
    run(path, rules, true)
}

/// Evaluate `rules` against the file without ever writing it back.
pub fn check_file(path: &Path, rules: &[PatchRule]) -> Result<SessionOutcome, SessionError> {
    run(path, rules, false)
}

fn run(path: &Path, rules: &[PatchRule], persist: bool) -> Result<SessionOutcome, SessionError> {
    let text = fs::read_to_string(path).map_err(|source| SessionError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let mut document = Document::new(text);
    let results = PatchEngine::new().apply(rules, &mut document)?;
    let report: ReportCollector = results.into_iter().collect();

    let modified = document.is_dirty();
    let text = document.into_text();

    if persist && modified {
        atomic_write(path, text.as_bytes()).map_err(|source| SessionError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        // Touch mtime so incremental builds notice the rewrite.
        let now = filetime::FileTime::now();
        filetime::set_file_mtime(path, now).map_err(|source| SessionError::Write {
            path: path.to_path_buf(),
            source,
        })?;
    }

    Ok(SessionOutcome {
        report,
        modified,
        text,
    })
}

/// Atomic file write: tempfile in the same directory + fsync + rename.
fn atomic_write(path: &Path, content: &[u8]) -> Result<(), std::io::Error> {
    let parent = path.parent().ok_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::InvalidInput, "path has no parent directory")
    })?;

    let mut temp = tempfile::NamedTempFile::new_in(parent)?;
    temp.write_all(content)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| e.error)?;

    Ok(())
}
