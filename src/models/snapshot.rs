// src/models/snapshot.rs

//! Parsed snapshot of one published version of the tracked code.

use serde::{Deserialize, Serialize};

/// A cluster of article references sharing a common section within one
/// modification event.
///
/// `article_numbers` and `article_urls` are index-aligned; pairs are only
/// ever pushed together through [`ArticleGroup::push_article`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ArticleGroup {
    /// Article numbers in document order
    pub article_numbers: Vec<String>,

    /// Resolved article URLs, index-aligned with `article_numbers`
    pub article_urls: Vec<String>,

    /// Section name, empty when the group has no section link
    #[serde(default)]
    pub section_name: String,

    /// Resolved section URL, empty when the group has no section link
    #[serde(default)]
    pub section_url: String,
}

impl ArticleGroup {
    /// Append one article reference, keeping numbers and URLs aligned.
    pub fn push_article(&mut self, number: impl Into<String>, url: impl Into<String>) {
        self.article_numbers.push(number.into());
        self.article_urls.push(url.into());
    }

    /// Whether the group carries neither article references nor a section.
    pub fn is_empty(&self) -> bool {
        self.article_numbers.is_empty() && self.section_name.is_empty()
    }

    /// Whether the group has a section link.
    pub fn has_section(&self) -> bool {
        !self.section_name.is_empty()
    }
}

/// One legal-instrument action (amend/create/repeal) recorded under a
/// published version, in document order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModificationEvent {
    /// Title of the modifying text (decree, order, law)
    pub title: String,

    /// Resolved URL of the modifying text
    pub url: String,

    /// Free-text verb phrase describing the action, possibly empty
    #[serde(default)]
    pub action: String,

    /// Article groups touched by this modification, in document order
    pub articles: Vec<ArticleGroup>,
}

/// One parsed capture of the timeline document.
///
/// Ordering of `modifications` matches document order exactly; the
/// formatter relies on it for pagination grouping.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ParsedSnapshot {
    /// Human-readable publication date label from the title link
    pub date: String,

    /// Resolved URL of the title link
    pub date_url: String,

    /// Modification events in document order
    pub modifications: Vec<ModificationEvent>,
}

impl ParsedSnapshot {
    /// Whether the published version carries no extracted modifications.
    pub fn is_empty(&self) -> bool {
        self.modifications.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_article_keeps_alignment() {
        let mut group = ArticleGroup::default();
        group.push_article("12", "https://example.com/a/12");
        group.push_article("13", "https://example.com/a/13");

        assert_eq!(group.article_numbers.len(), group.article_urls.len());
        assert_eq!(group.article_numbers, vec!["12", "13"]);
        assert_eq!(group.article_urls[1], "https://example.com/a/13");
    }

    #[test]
    fn test_group_emptiness() {
        let mut group = ArticleGroup::default();
        assert!(group.is_empty());

        group.section_name = "Section 1".into();
        assert!(!group.is_empty());
        assert!(group.has_section());

        let mut other = ArticleGroup::default();
        other.push_article("7", "u");
        assert!(!other.is_empty());
        assert!(!other.has_section());
    }

    #[test]
    fn test_snapshot_emptiness() {
        let snapshot = ParsedSnapshot {
            date: "07/01/2026".into(),
            date_url: "https://example.com/version".into(),
            modifications: vec![],
        };
        assert!(snapshot.is_empty());
    }
}
