//! Line-oriented view over a document's extracted text.

/// Non-empty, trimmed lines of one document, in reading order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentText<'a> {
    lines: Vec<&'a str>,
}

impl<'a> DocumentText<'a> {
    /// Split `text` into non-empty trimmed lines.
    pub fn new(text: &'a str) -> Self {
        Self {
            lines: text
                .split('\n')
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .collect(),
        }
    }

    pub fn lines(&self) -> &[&'a str] {
        &self.lines
    }

    /// Line at `index`, if any.
    pub fn line(&self, index: usize) -> Option<&'a str> {
        self.lines.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_lines_are_dropped() {
        let doc = DocumentText::new("  Order ID: OD1  \r\n\n   \n\tSold By: X,\n");
        assert_eq!(doc.lines(), &["Order ID: OD1", "Sold By: X,"]);
        assert_eq!(doc.line(1), Some("Sold By: X,"));
        assert_eq!(doc.line(2), None);
    }

    #[test]
    fn test_empty_text() {
        assert!(DocumentText::new("").is_empty());
        assert!(DocumentText::new("\n \n").is_empty());
    }
}
