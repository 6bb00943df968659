//! Table of contents entries.

use serde::{Deserialize, Serialize};

/// One annotated heading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocEntry {
    /// Heading level (2-4 for annotated headings).
    pub level: u8,

    /// Heading text with markup stripped.
    pub text: String,

    /// Anchor ID the navigation link points at.
    pub id: String,
}

impl TocEntry {
    /// Create a new TOC entry.
    pub fn new(level: u8, text: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
            id: id.into(),
        }
    }

    /// Fragment link target, e.g. `#0`.
    pub fn href(&self) -> String {
        format!("#{}", self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_href() {
        let entry = TocEntry::new(2, "Intro", "0");
        assert_eq!(entry.href(), "#0");
    }
}
