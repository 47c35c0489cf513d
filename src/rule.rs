use crate::pattern::{CompiledPattern, PatternError, Template};

/// How a rule locates its target text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchSpec {
    /// Exact substring; wildcard syntax in the text is not interpreted.
    Literal(String),
    /// Literal segments separated by `$$$` wildcard gaps that match
    /// arbitrary intervening text.
    Pattern(String),
}

/// How many matches a rule is allowed to replace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Occurrences {
    /// Replace at most this many matches, scanning left to right.
    AtMost(usize),
    /// Replace every match.
    All,
}

impl Occurrences {
    pub fn cap(self) -> Option<usize> {
        match self {
            Occurrences::AtMost(n) => Some(n),
            Occurrences::All => None,
        }
    }
}

/// One intended, idempotent textual edit.
///
/// Rules are immutable value data. The replacement must be authored so the
/// rule's own match spec no longer matches afterwards; that is what makes
/// re-running a rule sequence a safe no-op.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchRule {
    /// Stable label used in reports.
    pub id: String,
    pub match_spec: MatchSpec,
    /// Replacement text. For `Pattern` rules this is a template whose `$$$`
    /// placeholders re-expand, in order, to the text each gap matched.
    pub replacement: String,
    pub occurrences: Occurrences,
    /// Literal whose presence positively identifies the post-state. Rules
    /// without one cannot distinguish "already applied" from "target never
    /// existed", and report not-found for both.
    pub applied_marker: Option<String>,
}

impl PatchRule {
    /// An exact-substring rule, limited to one occurrence.
    pub fn literal(
        id: impl Into<String>,
        search: impl Into<String>,
        replacement: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            match_spec: MatchSpec::Literal(search.into()),
            replacement: replacement.into(),
            occurrences: Occurrences::AtMost(1),
            applied_marker: None,
        }
    }

    /// A wildcard-pattern rule, limited to one occurrence.
    pub fn pattern(
        id: impl Into<String>,
        pattern: impl Into<String>,
        template: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            match_spec: MatchSpec::Pattern(pattern.into()),
            replacement: template.into(),
            occurrences: Occurrences::AtMost(1),
            applied_marker: None,
        }
    }

    /// Replace every match instead of only the first.
    pub fn all_occurrences(mut self) -> Self {
        self.occurrences = Occurrences::All;
        self
    }

    /// Cap the number of replaced matches.
    pub fn at_most(mut self, n: usize) -> Self {
        self.occurrences = Occurrences::AtMost(n);
        self
    }

    /// Attach a literal that positively identifies the post-state.
    pub fn with_applied_marker(mut self, marker: impl Into<String>) -> Self {
        self.applied_marker = Some(marker.into());
        self
    }

    /// Compile the match spec and replacement. Failure here is fatal to the
    /// whole run; the caller surfaces the rule id.
    pub(crate) fn compile(&self) -> Result<(CompiledPattern, Template), PatternError> {
        match &self.match_spec {
            MatchSpec::Literal(search) => {
                let pattern = CompiledPattern::literal(search)?;
                Ok((pattern, Template::literal(&self.replacement)))
            }
            MatchSpec::Pattern(spec) => {
                let pattern = CompiledPattern::compile(spec)?;
                let template = Template::compile(&self.replacement, pattern.gap_count())?;
                Ok((pattern, template))
            }
        }
    }
}
