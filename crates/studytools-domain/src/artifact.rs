//! Identifiers for generated artifacts (decks and papers)

use std::fmt;

/// Identifier attached to every generated deck or paper.
///
/// Backed by a UUIDv7, so identifiers sort by creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ArtifactId(uuid::Uuid);

impl ArtifactId {
    /// Generate a fresh identifier
    ///
    /// # Examples
    ///
    /// ```
    /// use studytools_domain::ArtifactId;
    ///
    /// let id = ArtifactId::new();
    /// assert_eq!(id.to_string().len(), 36);
    /// ```
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7())
    }

    /// Parse an identifier from its hyphenated string form
    pub fn parse(s: &str) -> Result<Self, String> {
        uuid::Uuid::parse_str(s)
            .map(Self)
            .map_err(|e| format!("Invalid artifact id '{}': {}", s, e))
    }

    /// Short prefix used in file names and table output
    pub fn short(&self) -> String {
        self.0.simple().to_string()[..8].to_string()
    }
}

impl Default for ArtifactId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
