use crate::document::Document;
use crate::pattern::{CompiledPattern, PatternError, PatternMatch, Template};
use crate::rule::PatchRule;
use std::fmt;
use thiserror::Error;

/// Outcome of one rule against the current document text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyStatus {
    /// The rule matched and the document was rewritten.
    Applied,
    /// The rule's applied-marker was found; the edit is already in place.
    AlreadyApplied,
    /// The rule's target pattern is absent. An ordinary outcome, not an
    /// error: a prior rule may have consumed the precondition, or the target
    /// never existed in this document.
    NotFound,
}

impl fmt::Display for ApplyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApplyStatus::Applied => write!(f, "applied"),
            ApplyStatus::AlreadyApplied => write!(f, "already applied"),
            ApplyStatus::NotFound => write!(f, "not found"),
        }
    }
}

/// Result of applying a single rule. Created once per rule per run and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "ApplicationResult should be recorded or inspected"]
pub struct ApplicationResult {
    pub rule_id: String,
    pub status: ApplyStatus,
    pub detail: Option<String>,
}

/// Fatal conditions that abort the remaining rule sequence.
///
/// Mutations made by earlier rules remain in the in-memory document; the
/// session driver decides whether to persist or discard them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("rule '{rule_id}' is malformed: {source}")]
    MalformedRule {
        rule_id: String,
        source: PatternError,
    },
}

/// Applies an ordered rule sequence to a document, one result per rule.
#[derive(Debug, Default)]
pub struct PatchEngine;

impl PatchEngine {
    pub fn new() -> Self {
        Self
    }

    /// Apply `rules` in order, mutating `document` in place.
    ///
    /// A rule whose pattern is absent produces a skip result and the run
    /// continues; only a malformed rule aborts. The engine never retains a
    /// reference to the document after returning.
    pub fn apply(
        &self,
        rules: &[PatchRule],
        document: &mut Document,
    ) -> Result<Vec<ApplicationResult>, EngineError> {
        let mut results = Vec::with_capacity(rules.len());

        for rule in rules {
            let (pattern, template) =
                rule.compile().map_err(|source| EngineError::MalformedRule {
                    rule_id: rule.id.clone(),
                    source,
                })?;

            let matches = collect_matches(&pattern, document.text(), rule.occurrences.cap());

            if matches.is_empty() {
                results.push(skip_result(rule, document.text()));
                continue;
            }

            let replaced = matches.len();
            document.set_text(splice(document.text(), &matches, &template));

            let detail = match replaced {
                1 => None,
                n => Some(format!("replaced {n} occurrences")),
            };
            results.push(ApplicationResult {
                rule_id: rule.id.clone(),
                status: ApplyStatus::Applied,
                detail,
            });
        }

        Ok(results)
    }
}

/// Collect non-overlapping matches left to right, bounded by `cap`.
fn collect_matches(
    pattern: &CompiledPattern,
    text: &str,
    cap: Option<usize>,
) -> Vec<PatternMatch> {
    let mut matches = Vec::new();
    let mut from = 0;

    while cap.map_or(true, |cap| matches.len() < cap) {
        match pattern.find_at(text, from) {
            Some(m) => {
                from = m.byte_end;
                matches.push(m);
            }
            None => break,
        }
    }

    matches
}

/// Rebuild the text with every match replaced by its rendered template.
fn splice(text: &str, matches: &[PatternMatch], template: &Template) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;

    for m in matches {
        out.push_str(&text[last..m.byte_start]);
        out.push_str(&template.render(&m.captures));
        last = m.byte_end;
    }
    out.push_str(&text[last..]);
    out
}

/// Classify a zero-match rule. Only a rule with an applied-marker can
/// positively recognize its own post-state; everything else reports
/// not-found, whether the target was already migrated or never existed.
fn skip_result(rule: &PatchRule, text: &str) -> ApplicationResult {
    if let Some(marker) = &rule.applied_marker {
        if text.contains(marker.as_str()) {
            return ApplicationResult {
                rule_id: rule.id.clone(),
                status: ApplyStatus::AlreadyApplied,
                detail: Some("applied marker present".to_string()),
            };
        }
    }
    ApplicationResult {
        rule_id: rule.id.clone(),
        status: ApplyStatus::NotFound,
        detail: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::PatchRule;

    fn apply(rules: &[PatchRule], doc: &mut Document) -> Vec<ApplicationResult> {
        PatchEngine::new().apply(rules, doc).unwrap()
    }

    #[test]
    fn empty_rule_list_is_a_no_op() {
        let mut doc = Document::new("anything");
        let results = apply(&[], &mut doc);
        assert!(results.is_empty());
        assert!(!doc.is_dirty());
    }

    #[test]
    fn field_list_scenario() {
        let mut doc = Document::new("fields: {a, b}\n");
        let rule = PatchRule::literal("add-c", "fields: {a, b}", "fields: {a, b, c}");

        let results = apply(&[rule.clone()], &mut doc);
        assert_eq!(results[0].status, ApplyStatus::Applied);
        assert_eq!(doc.text(), "fields: {a, b, c}\n");
        assert!(doc.is_dirty());

        // Re-run against the patched text: the pattern is gone.
        let mut second = Document::new(doc.text());
        let results = apply(&[rule], &mut second);
        assert_eq!(results[0].status, ApplyStatus::NotFound);
        assert_eq!(second.text(), "fields: {a, b, c}\n");
        assert!(!second.is_dirty());
    }

    #[test]
    fn occurrence_limit_replaces_exactly_one() {
        let mut doc = Document::new("x xx x");
        let rule = PatchRule::literal("first-x", "x", "y");
        apply(&[rule], &mut doc);
        assert_eq!(doc.text(), "y xx x");
    }

    #[test]
    fn all_occurrences_replaces_every_match() {
        let mut doc = Document::new("x xx x");
        let rule = PatchRule::literal("every-x", "x", "y").all_occurrences();
        let results = apply(&[rule], &mut doc);
        assert_eq!(doc.text(), "y yy y");
        assert_eq!(results[0].detail.as_deref(), Some("replaced 4 occurrences"));
    }

    #[test]
    fn matches_do_not_overlap() {
        let mut doc = Document::new("aaa");
        let rule = PatchRule::literal("aa", "aa", "b").all_occurrences();
        apply(&[rule], &mut doc);
        assert_eq!(doc.text(), "ba");
    }

    #[test]
    fn order_sensitivity() {
        let a = PatchRule::literal("a", "one", "two");
        let b = PatchRule::literal("b", "two", "three");

        // B's pattern only exists after A has run.
        let mut doc = Document::new("one");
        let results = apply(&[a.clone(), b.clone()], &mut doc);
        assert_eq!(results[0].status, ApplyStatus::Applied);
        assert_eq!(results[1].status, ApplyStatus::Applied);
        assert_eq!(doc.text(), "three");

        let mut doc = Document::new("one");
        let results = apply(&[b, a], &mut doc);
        assert_eq!(results[0].status, ApplyStatus::NotFound);
        assert_eq!(results[1].status, ApplyStatus::Applied);
        assert_eq!(doc.text(), "two");
    }

    #[test]
    fn foreign_input_leaves_document_clean() {
        let mut doc = Document::new("nothing to see here");
        let rules = vec![
            PatchRule::literal("a", "alpha", "beta"),
            PatchRule::pattern("b", "gamma$$$delta", "gamma$$$epsilon"),
        ];
        let results = apply(&rules, &mut doc);
        assert!(results.iter().all(|r| r.status == ApplyStatus::NotFound));
        assert_eq!(doc.text(), "nothing to see here");
        assert!(!doc.is_dirty());
    }

    #[test]
    fn wildcard_rule_reinserts_gap_text() {
        let mut doc = Document::new("header(keep this)footer rest");
        let rule = PatchRule::pattern("wrap", "header($$$)footer", "header($$$)FOOTER");
        apply(&[rule], &mut doc);
        assert_eq!(doc.text(), "header(keep this)FOOTER rest");
    }

    #[test]
    fn malformed_rule_is_fatal_and_keeps_prior_mutations() {
        let mut doc = Document::new("one two");
        let good = PatchRule::literal("good", "one", "uno");
        let bad = PatchRule::pattern("bad", "$$$", "x");

        let err = PatchEngine::new().apply(&[good, bad], &mut doc).unwrap_err();
        let EngineError::MalformedRule { rule_id, .. } = err;
        assert_eq!(rule_id, "bad");

        // The first rule's mutation is still present in memory.
        assert_eq!(doc.text(), "uno two");
        assert!(doc.is_dirty());
    }

    #[test]
    fn applied_marker_refines_skip_status() {
        let marked = PatchRule::literal("marked", "old()", "new()").with_applied_marker("new()");

        // Post-state present: positively recognized.
        let mut doc = Document::new("call new() here");
        let results = apply(&[marked.clone()], &mut doc);
        assert_eq!(results[0].status, ApplyStatus::AlreadyApplied);
        assert!(!doc.is_dirty());

        // Neither pre- nor post-state: plain not-found.
        let mut doc = Document::new("unrelated");
        let results = apply(&[marked], &mut doc);
        assert_eq!(results[0].status, ApplyStatus::NotFound);
    }

    #[test]
    fn double_application_reports_skips_and_changes_nothing() {
        let rules = vec![
            PatchRule::literal("a", "red", "green"),
            PatchRule::literal("b", "blue", "yellow").all_occurrences(),
        ];
        let mut doc = Document::new("red blue blue");
        apply(&rules, &mut doc);
        let once = doc.text().to_string();

        let mut doc2 = Document::new(once.clone());
        let results = apply(&rules, &mut doc2);
        assert!(results.iter().all(|r| r.status != ApplyStatus::Applied));
        assert_eq!(doc2.text(), once);
        assert!(!doc2.is_dirty());
    }
}
