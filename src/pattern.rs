use thiserror::Error;

/// Marker separating literal segments in a wildcard pattern, and marking
/// re-expansion points in a replacement template.
pub const WILDCARD: &str = "$$$";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    #[error("match spec is empty")]
    EmptySpec,

    #[error("wildcard gap must be bracketed by literal text on both sides")]
    UnanchoredWildcard,

    #[error(
        "replacement template references {placeholders} wildcard spans but the pattern captures {captured}"
    )]
    TemplateArity {
        placeholders: usize,
        captured: usize,
    },
}

/// A single match of a compiled pattern against some text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternMatch {
    /// Byte range of the entire match
    pub byte_start: usize,
    pub byte_end: usize,
    /// Text of each wildcard gap, in pattern order
    pub captures: Vec<String>,
}

/// A wildcard match spec compiled into its literal segments.
///
/// Pattern syntax: literal text with `$$$` marking gaps that match arbitrary
/// intervening text. Matching is plain substring chaining with no grammar
/// awareness: each segment is located at its earliest occurrence after the
/// previous one (shortest gap), and the first-segment anchor is retried at
/// later occurrences when the chain cannot be completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledPattern {
    segments: Vec<String>,
}

impl CompiledPattern {
    /// Compile a wildcard spec into literal segments.
    pub fn compile(spec: &str) -> Result<Self, PatternError> {
        if spec.is_empty() {
            return Err(PatternError::EmptySpec);
        }
        let segments: Vec<String> = spec.split(WILDCARD).map(str::to_string).collect();
        if segments.iter().any(|s| s.is_empty()) {
            // A leading, trailing, or doubled wildcard has no literal anchor.
            return Err(PatternError::UnanchoredWildcard);
        }
        Ok(Self { segments })
    }

    /// Compile a spec that is taken verbatim, with no wildcard syntax.
    pub fn literal(spec: &str) -> Result<Self, PatternError> {
        if spec.is_empty() {
            return Err(PatternError::EmptySpec);
        }
        Ok(Self {
            segments: vec![spec.to_string()],
        })
    }

    /// Number of wildcard gaps.
    pub fn gap_count(&self) -> usize {
        self.segments.len() - 1
    }

    /// Find the first match at or after `from`.
    pub fn find_at(&self, text: &str, from: usize) -> Option<PatternMatch> {
        let first = &self.segments[0];
        let mut anchor_from = from;

        while let Some(rel) = text.get(anchor_from..)?.find(first.as_str()) {
            let start = anchor_from + rel;
            if let Some(m) = self.chain_from(text, start) {
                return Some(m);
            }
            // Chain failed past this anchor; retry at the next occurrence.
            // Advance by one char so the offset stays on a UTF-8 boundary.
            let step = text[start..].chars().next().map_or(1, char::len_utf8);
            anchor_from = start + step;
        }
        None
    }

    /// Attempt to chain all segments starting with the first segment anchored
    /// at `start`.
    fn chain_from(&self, text: &str, start: usize) -> Option<PatternMatch> {
        let mut pos = start + self.segments[0].len();
        let mut captures = Vec::with_capacity(self.gap_count());

        for segment in &self.segments[1..] {
            let rel = text.get(pos..)?.find(segment.as_str())?;
            captures.push(text[pos..pos + rel].to_string());
            pos = pos + rel + segment.len();
        }

        Some(PatternMatch {
            byte_start: start,
            byte_end: pos,
            captures,
        })
    }
}

/// A replacement template whose `$$$` placeholders re-expand, in order, to
/// the text the corresponding wildcard gap matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pieces: Vec<String>,
}

impl Template {
    /// Compile a template against a pattern with `captured` wildcard gaps.
    ///
    /// A template may reference fewer gaps than the pattern captures (the
    /// trailing gap text is simply dropped), but never more.
    pub fn compile(spec: &str, captured: usize) -> Result<Self, PatternError> {
        let pieces: Vec<String> = spec.split(WILDCARD).map(str::to_string).collect();
        let placeholders = pieces.len() - 1;
        if placeholders > captured {
            return Err(PatternError::TemplateArity {
                placeholders,
                captured,
            });
        }
        Ok(Self { pieces })
    }

    /// Compile a template that is taken verbatim.
    pub fn literal(spec: &str) -> Self {
        Self {
            pieces: vec![spec.to_string()],
        }
    }

    /// Render the template for one match.
    pub fn render(&self, captures: &[String]) -> String {
        let mut out = self.pieces[0].clone();
        for (piece, capture) in self.pieces[1..].iter().zip(captures) {
            out.push_str(capture);
            out.push_str(piece);
        }
        out
    }
}
