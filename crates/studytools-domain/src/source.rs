//! Source documents - text pulled out of an uploaded paper

/// Text extracted from an uploaded file.
///
/// Created once per request and never mutated. Byte-to-text extraction
/// happens before this type exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    content: String,
}

impl SourceDocument {
    /// Wrap extracted text
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }

    /// Length of the content in bytes
    pub fn byte_len(&self) -> usize {
        self.content.len()
    }

    /// True when the document holds nothing but whitespace
    pub fn is_blank(&self) -> bool {
        self.content.trim().is_empty()
    }

    /// Collapse every whitespace run to a single space and trim the ends.
    ///
    /// PDF text extraction leaves hard line breaks and column padding all over
    /// the place; the model does not need them.
    ///
    /// # Examples
    ///
    /// ```
    /// use studytools_domain::SourceDocument;
    ///
    /// let doc = SourceDocument::new("  Page 1:\n\n  Define   motivation. (2)\n");
    /// assert_eq!(doc.normalized().unwrap(), "Page 1: Define motivation. (2)");
    /// ```
    pub fn normalized(&self) -> Result<String, String> {
        if self.is_blank() {
            return Err("Cannot process empty text".to_string());
        }
        Ok(self.content.split_whitespace().collect::<Vec<_>>().join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_len_counts_bytes() {
        let doc = SourceDocument::new("Schrödinger");
        assert_eq!(doc.byte_len(), 12);
    }

    #[test]
    fn test_normalized_collapses_whitespace() {
        let doc = SourceDocument::new("HL questions\t25 marks,\r\n45 minutes");
        assert_eq!(doc.normalized().unwrap(), "HL questions 25 marks, 45 minutes");
    }

    #[test]
    fn test_normalized_rejects_blank() {
        assert!(SourceDocument::new("").normalized().is_err());
        assert!(SourceDocument::new(" \n\t ").normalized().is_err());
    }
}
