use xxhash_rust::xxh3::xxh3_64;

/// The mutable text buffer one patch run operates on.
///
/// The document owns its text for the lifetime of a session. The dirty flag
/// tracks whether the text currently differs from its construction-time
/// value; it is maintained by hash comparison rather than a sticky boolean,
/// so a later rule that happens to restore the original text clears it.
#[derive(Debug, Clone)]
pub struct Document {
    text: String,
    pristine_hash: u64,
    dirty: bool,
}

impl Document {
    /// Create a document from its initial text.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let pristine_hash = xxh3_64(text.as_bytes());
        Self {
            text,
            pristine_hash,
            dirty: false,
        }
    }

    /// Current text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether the text differs from its value at construction.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Consume the document, yielding the final text.
    pub fn into_text(self) -> String {
        self.text
    }

    /// Replace the full text, updating the dirty flag.
    pub(crate) fn set_text(&mut self, text: String) {
        self.text = text;
        self.dirty = xxh3_64(self.text.as_bytes()) != self.pristine_hash;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_document_is_clean() {
        let doc = Document::new("hello world");
        assert!(!doc.is_dirty());
        assert_eq!(doc.text(), "hello world");
    }

    #[test]
    fn mutation_sets_dirty() {
        let mut doc = Document::new("hello world");
        doc.set_text("hello rust".to_string());
        assert!(doc.is_dirty());
        assert_eq!(doc.text(), "hello rust");
    }

    #[test]
    fn restoring_original_text_clears_dirty() {
        let mut doc = Document::new("hello world");
        doc.set_text("hello rust".to_string());
        doc.set_text("hello world".to_string());
        assert!(!doc.is_dirty());
    }

    #[test]
    fn into_text_yields_final_state() {
        let mut doc = Document::new("a");
        doc.set_text("b".to_string());
        assert_eq!(doc.into_text(), "b");
    }
}
