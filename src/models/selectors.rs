// src/models/selectors.rs

//! CSS selectors for scraping the version timeline page.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::utils::dom;

/// CSS selectors for the timeline markup, kept as configuration so an
/// upstream markup change is a config edit rather than a code change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineSelectors {
    /// Selector for version markers carrying a publication-date attribute
    #[serde(default = "defaults::version_marker")]
    pub version_marker: String,

    /// Attribute on a marker holding its date (DD/MM/YYYY)
    #[serde(default = "defaults::date_attr")]
    pub date_attr: String,

    /// Selector for the container flagged as the current version
    #[serde(default = "defaults::current_container")]
    pub current_container: String,

    /// Selector for the container's title link (date text and date URL)
    #[serde(default = "defaults::title_link")]
    pub title_link: String,

    /// Selector for one modification block inside the container
    #[serde(default = "defaults::modification_block")]
    pub modification_block: String,

    /// Selector for the modification title link within a block
    #[serde(default = "defaults::modification_title")]
    pub modification_title: String,

    /// Selector for the action tag within a block
    #[serde(default = "defaults::action_tag")]
    pub action_tag: String,

    /// Selector for one article-group item within a block
    #[serde(default = "defaults::article_item")]
    pub article_item: String,

    /// Selector for links within an article-group item
    #[serde(default = "defaults::article_link")]
    pub article_link: String,

    /// Href substring identifying a section link among a group's links
    #[serde(default = "defaults::section_href_pattern")]
    pub section_href_pattern: String,

    /// Selector for one per-year accordion section of the timeline
    #[serde(default = "defaults::year_section")]
    pub year_section: String,

    /// Attribute on a year section holding its year
    #[serde(default = "defaults::year_attr")]
    pub year_attr: String,

    /// Selector for one version item within a year section
    #[serde(default = "defaults::version_item")]
    pub version_item: String,

    /// Class flagging a version item as the current version
    #[serde(default = "defaults::current_class")]
    pub current_class: String,

    /// Selector for the date link within a version item
    #[serde(default = "defaults::item_date_link")]
    pub item_date_link: String,
}

impl Default for TimelineSelectors {
    fn default() -> Self {
        Self {
            version_marker: defaults::version_marker(),
            date_attr: defaults::date_attr(),
            current_container: defaults::current_container(),
            title_link: defaults::title_link(),
            modification_block: defaults::modification_block(),
            modification_title: defaults::modification_title(),
            action_tag: defaults::action_tag(),
            article_item: defaults::article_item(),
            article_link: defaults::article_link(),
            section_href_pattern: defaults::section_href_pattern(),
            year_section: defaults::year_section(),
            year_attr: defaults::year_attr(),
            version_item: defaults::version_item(),
            current_class: defaults::current_class(),
            item_date_link: defaults::item_date_link(),
        }
    }
}

impl TimelineSelectors {
    /// Check that every selector string compiles.
    pub fn validate(&self) -> Result<()> {
        for selector in [
            &self.version_marker,
            &self.current_container,
            &self.title_link,
            &self.modification_block,
            &self.modification_title,
            &self.action_tag,
            &self.article_item,
            &self.article_link,
            &self.year_section,
            &self.version_item,
            &self.item_date_link,
        ] {
            dom::parse_selector(selector)?;
        }
        Ok(())
    }
}

mod defaults {
    pub fn version_marker() -> String {
        "#timeline a.version-date".into()
    }
    pub fn date_attr() -> String {
        "data-date".into()
    }
    pub fn current_container() -> String {
        "article.version-en-vigueur".into()
    }
    pub fn title_link() -> String {
        "h2.version-titre a".into()
    }
    pub fn modification_block() -> String {
        "div.texte-modificateur".into()
    }
    pub fn modification_title() -> String {
        "div.titre-texte a".into()
    }
    pub fn action_tag() -> String {
        "span.action-texte".into()
    }
    pub fn article_item() -> String {
        "ul.liste-articles > li".into()
    }
    pub fn article_link() -> String {
        "a".into()
    }
    pub fn section_href_pattern() -> String {
        "/codes/section_lc/".into()
    }
    pub fn year_section() -> String {
        "div.timeline-annee".into()
    }
    pub fn year_attr() -> String {
        "data-annee".into()
    }
    pub fn version_item() -> String {
        "li.version-item".into()
    }
    pub fn current_class() -> String {
        "version-en-vigueur".into()
    }
    pub fn item_date_link() -> String {
        "a".into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_selectors_compile() {
        assert!(TimelineSelectors::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_broken_selector() {
        let mut selectors = TimelineSelectors::default();
        selectors.modification_block = "[[broken".to_string();
        assert!(selectors.validate().is_err());
    }
}
