use crate::engine::{ApplicationResult, ApplyStatus};
use std::fmt;

/// Accumulates per-rule results and renders them as a human-readable report,
/// one line per rule, in rule order. Presentation only; carries no decision
/// logic and never touches the document.
#[derive(Debug, Default)]
pub struct ReportCollector {
    results: Vec<ApplicationResult>,
}

/// Per-status counts over a collected report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Summary {
    pub applied: usize,
    pub already_applied: usize,
    pub not_found: usize,
}

impl ReportCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, result: ApplicationResult) {
        self.results.push(result);
    }

    pub fn results(&self) -> &[ApplicationResult] {
        &self.results
    }

    /// One `<status>: <rule label>` line per rule.
    pub fn lines(&self) -> impl Iterator<Item = String> + '_ {
        self.results.iter().map(|r| match &r.detail {
            Some(detail) => format!("{}: {} ({detail})", r.status, r.rule_id),
            None => format!("{}: {}", r.status, r.rule_id),
        })
    }

    pub fn summary(&self) -> Summary {
        let mut summary = Summary::default();
        for result in &self.results {
            match result.status {
                ApplyStatus::Applied => summary.applied += 1,
                ApplyStatus::AlreadyApplied => summary.already_applied += 1,
                ApplyStatus::NotFound => summary.not_found += 1,
            }
        }
        summary
    }
}

impl FromIterator<ApplicationResult> for ReportCollector {
    fn from_iter<I: IntoIterator<Item = ApplicationResult>>(iter: I) -> Self {
        Self {
            results: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for ReportCollector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.lines() {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(id: &str, status: ApplyStatus, detail: Option<&str>) -> ApplicationResult {
        ApplicationResult {
            rule_id: id.to_string(),
            status,
            detail: detail.map(str::to_string),
        }
    }

    #[test]
    fn lines_follow_rule_order() {
        let report: ReportCollector = vec![
            result("first", ApplyStatus::Applied, None),
            result("second", ApplyStatus::NotFound, None),
        ]
        .into_iter()
        .collect();

        let lines: Vec<_> = report.lines().collect();
        assert_eq!(lines, vec!["applied: first", "not found: second"]);
    }

    #[test]
    fn detail_is_appended_in_parens() {
        let mut report = ReportCollector::new();
        report.record(result("r", ApplyStatus::Applied, Some("replaced 2 occurrences")));
        assert_eq!(
            report.lines().next().unwrap(),
            "applied: r (replaced 2 occurrences)"
        );
    }

    #[test]
    fn summary_counts_by_status() {
        let report: ReportCollector = vec![
            result("a", ApplyStatus::Applied, None),
            result("b", ApplyStatus::Applied, None),
            result("c", ApplyStatus::AlreadyApplied, None),
            result("d", ApplyStatus::NotFound, None),
        ]
        .into_iter()
        .collect();

        assert_eq!(
            report.summary(),
            Summary {
                applied: 2,
                already_applied: 1,
                not_found: 1
            }
        );
    }

    #[test]
    fn display_renders_one_line_per_rule() {
        let report: ReportCollector = vec![
            result("a", ApplyStatus::Applied, None),
            result("b", ApplyStatus::NotFound, None),
        ]
        .into_iter()
        .collect();

        assert_eq!(report.to_string(), "applied: a\nnot found: b\n");
    }
}
