//! Rulepatch: ordered, idempotent search-and-replace patching for a single
//! source file.
//!
//! # Architecture
//!
//! A run applies an ordered sequence of [`PatchRule`]s to one [`Document`]
//! and reports, per rule, whether it was applied or skipped. Rules match
//! literal text or literal segments with `$$$` wildcard gaps; nothing parses
//! the document's grammar. The central correctness property is idempotence:
//! every replacement destroys its own match pattern, so re-running the full
//! sequence on an already-patched file is a safe no-op.
//!
//! # Safety
//!
//! - A pattern that is absent is an ordinary skip, never an error
//! - A malformed rule is fatal and nothing is written back
//! - Atomic file writes (tempfile + fsync + rename)
//! - An unchanged file is left byte-for-byte untouched
//!
//! # Example
//!
//! ```
//! use rulepatch::{Document, PatchEngine, PatchRule};
//!
//! let mut doc = Document::new("fields: {a, b}\n");
//! let rules = vec![PatchRule::literal(
//!     "add-c",
//!     "fields: {a, b}",
//!     "fields: {a, b, c}",
//! )];
//!
//! let results = PatchEngine::new().apply(&rules, &mut doc).unwrap();
//! assert_eq!(doc.text(), "fields: {a, b, c}\n");
//! assert!(doc.is_dirty());
//! # assert_eq!(results.len(), 1);
//! ```

pub mod document;
pub mod engine;
pub mod pattern;
pub mod report;
pub mod rule;
pub mod rules;
pub mod session;

// Re-exports
pub use document::Document;
pub use engine::{ApplicationResult, ApplyStatus, EngineError, PatchEngine};
pub use pattern::PatternError;
pub use report::{ReportCollector, Summary};
pub use rule::{MatchSpec, Occurrences, PatchRule};
pub use session::{apply_to_file, check_file, SessionError, SessionOutcome};
