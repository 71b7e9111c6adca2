// src/pipeline/parse.rs

//! Timeline document parser.
//!
//! Turns the rendered timeline markup into a [`ParsedSnapshot`]: the
//! publication date of the version in force plus its ordered modification
//! events. The two "nothing to extract" cases are distinct outcomes so the
//! caller can log them separately.

use chrono::NaiveDate;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::error::Result;
use crate::models::{ArticleGroup, ModificationEvent, ParsedSnapshot, TimelineSelectors};
use crate::utils::{self, dom};

/// Outcome of one parse attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseOutcome {
    /// No version marker carries the reference date. Normal on days
    /// without a publication.
    NoVersionForDate,

    /// A marker matched but the current-version container is missing,
    /// which points at an upstream markup change.
    MissingContainer,

    /// A snapshot was extracted. Its modification list may be empty.
    Parsed(ParsedSnapshot),
}

/// Compiled selector set for one parse call.
struct Queries {
    version_marker: Selector,
    current_container: Selector,
    title_link: Selector,
    modification_block: Selector,
    modification_title: Selector,
    action_tag: Selector,
    article_item: Selector,
    article_link: Selector,
}

impl Queries {
    fn compile(selectors: &TimelineSelectors) -> Result<Self> {
        Ok(Self {
            version_marker: dom::parse_selector(&selectors.version_marker)?,
            current_container: dom::parse_selector(&selectors.current_container)?,
            title_link: dom::parse_selector(&selectors.title_link)?,
            modification_block: dom::parse_selector(&selectors.modification_block)?,
            modification_title: dom::parse_selector(&selectors.modification_title)?,
            action_tag: dom::parse_selector(&selectors.action_tag)?,
            article_item: dom::parse_selector(&selectors.article_item)?,
            article_link: dom::parse_selector(&selectors.article_link)?,
        })
    }
}

/// Parse the timeline markup against an explicit reference date.
///
/// The reference date is injected rather than read from the clock so the
/// same document can be parsed deterministically in tests and backfills.
/// `Err` is reserved for configuration problems (selector strings or base
/// URL that do not compile); every content-level irregularity degrades to
/// an outcome or a skipped fragment instead.
pub fn parse_snapshot(
    html: &str,
    reference_date: NaiveDate,
    selectors: &TimelineSelectors,
    base_url: &str,
) -> Result<ParseOutcome> {
    let queries = Queries::compile(selectors)?;
    let base = Url::parse(base_url)?;

    let doc = Html::parse_document(html);
    let root = doc.root_element();

    // Step 1: is a version published for the reference date at all?
    let wanted = utils::format_date_fr(reference_date);
    let marker_present = dom::select_all(root, &queries.version_marker)
        .into_iter()
        .any(|marker| dom::attr(marker, &selectors.date_attr) == Some(wanted.as_str()));
    if !marker_present {
        return Ok(ParseOutcome::NoVersionForDate);
    }

    // Step 2: the container flagged as the version in force.
    let Some(container) = dom::select_first(root, &queries.current_container) else {
        return Ok(ParseOutcome::MissingContainer);
    };

    // Step 3: date label and link from the container title. A missing
    // title link leaves both empty rather than aborting the parse.
    let (date, date_url) = match dom::select_first(container, &queries.title_link) {
        Some(link) => (
            dom::text(link),
            dom::attr(link, "href")
                .map(|href| utils::resolve_url(&base, href))
                .unwrap_or_default(),
        ),
        None => (String::new(), String::new()),
    };

    // Steps 4 and 5: modification blocks in document order.
    let modifications = dom::select_all(container, &queries.modification_block)
        .into_iter()
        .filter_map(|block| parse_modification_block(block, &queries, selectors, &base))
        .collect();

    Ok(ParseOutcome::Parsed(ParsedSnapshot {
        date,
        date_url,
        modifications,
    }))
}

/// Extract one modification event from its block.
///
/// Blocks without a title link are malformed fragments and yield `None`.
fn parse_modification_block(
    block: ElementRef<'_>,
    queries: &Queries,
    selectors: &TimelineSelectors,
    base: &Url,
) -> Option<ModificationEvent> {
    let title_link = dom::select_first(block, &queries.modification_title)?;
    let title = dom::text(title_link);
    let url = dom::attr(title_link, "href")
        .map(|href| utils::resolve_url(base, href))
        .unwrap_or_default();

    let action = dom::select_first(block, &queries.action_tag)
        .map(dom::text)
        .unwrap_or_default();

    let articles = dom::select_all(block, &queries.article_item)
        .into_iter()
        .filter_map(|item| parse_article_item(item, queries, selectors, base))
        .collect();

    Some(ModificationEvent {
        title,
        url,
        action,
        articles,
    })
}

/// Extract one article group from a list item.
///
/// Anchors without an href are skipped; the anchor whose href matches the
/// section pattern fills the section fields; every other anchor is an
/// article-number/URL pair. Items yielding nothing at all are dropped.
fn parse_article_item(
    item: ElementRef<'_>,
    queries: &Queries,
    selectors: &TimelineSelectors,
    base: &Url,
) -> Option<ArticleGroup> {
    let mut group = ArticleGroup::default();

    for link in dom::select_all(item, &queries.article_link) {
        let Some(href) = dom::attr(link, "href") else {
            continue;
        };
        let resolved = utils::resolve_url(base, href);
        if href.contains(&selectors.section_href_pattern) {
            group.section_name = dom::text(link);
            group.section_url = resolved;
        } else {
            group.push_article(dom::text(link), resolved);
        }
    }

    (!group.is_empty()).then_some(group)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://www.legifrance.gouv.fr";

    fn reference_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 7).unwrap()
    }

    fn parse(html: &str) -> ParseOutcome {
        parse_snapshot(html, reference_date(), &TimelineSelectors::default(), BASE).unwrap()
    }

    fn sample_timeline() -> String {
        r##"
        <html><body>
        <div id="timeline">
          <div class="timeline-annee" data-annee="2026">
            <a class="version-date" data-date="07/01/2026" href="#v1">07 janvier 2026</a>
            <a class="version-date" data-date="15/12/2025" href="#v2">15 décembre 2025</a>
          </div>
        </div>
        <article class="version-en-vigueur">
          <h2 class="version-titre">
            <a href="/codes/id/LEGITEXT000006070721/2026-01-07/">Version en vigueur au 07 janvier 2026</a>
          </h2>
          <div class="texte-modificateur">
            <div class="titre-texte"><a href="/loda/id/JORFTEXT000050000001">Décret n° 2026-12 du 5 janvier 2026</a></div>
            <span class="action-texte">a modifié</span>
            <ul class="liste-articles">
              <li>
                <a href="/codes/article_lc/LEGIARTI000000000012">12</a>
                <a href="/codes/article_lc/LEGIARTI000000000013">13</a>
                <a href="/codes/section_lc/LEGISCTA000000000100">Du mariage</a>
              </li>
            </ul>
          </div>
          <div class="texte-modificateur">
            <div class="titre-texte"><a href="/loda/id/JORFTEXT000050000002">Ordonnance n° 2026-3 du 6 janvier 2026</a></div>
            <span class="action-texte">a créé</span>
            <ul class="liste-articles">
              <li>
                <a href="/codes/article_lc/LEGIARTI000000000099">99-1</a>
              </li>
            </ul>
          </div>
        </article>
        </body></html>
        "##
        .to_string()
    }

    #[test]
    fn test_no_marker_for_reference_date() {
        let html = sample_timeline();
        let other_day = NaiveDate::from_ymd_opt(2026, 1, 8).unwrap();
        let outcome =
            parse_snapshot(&html, other_day, &TimelineSelectors::default(), BASE).unwrap();
        assert_eq!(outcome, ParseOutcome::NoVersionForDate);
    }

    #[test]
    fn test_marker_without_container() {
        let html = r##"
            <div id="timeline">
              <a class="version-date" data-date="07/01/2026" href="#v1">07 janvier 2026</a>
            </div>
        "##;
        assert_eq!(parse(html), ParseOutcome::MissingContainer);
    }

    #[test]
    fn test_extracts_snapshot_in_document_order() {
        let outcome = parse(&sample_timeline());
        let ParseOutcome::Parsed(snapshot) = outcome else {
            panic!("expected a parsed snapshot, got {outcome:?}");
        };

        assert_eq!(snapshot.date, "Version en vigueur au 07 janvier 2026");
        assert_eq!(
            snapshot.date_url,
            "https://www.legifrance.gouv.fr/codes/id/LEGITEXT000006070721/2026-01-07/"
        );
        assert_eq!(snapshot.modifications.len(), 2);

        let first = &snapshot.modifications[0];
        assert_eq!(first.title, "Décret n° 2026-12 du 5 janvier 2026");
        assert_eq!(
            first.url,
            "https://www.legifrance.gouv.fr/loda/id/JORFTEXT000050000001"
        );
        assert_eq!(first.action, "a modifié");
        assert_eq!(first.articles.len(), 1);
        assert_eq!(first.articles[0].article_numbers, vec!["12", "13"]);
        assert_eq!(first.articles[0].section_name, "Du mariage");
        assert_eq!(
            first.articles[0].section_url,
            "https://www.legifrance.gouv.fr/codes/section_lc/LEGISCTA000000000100"
        );

        let second = &snapshot.modifications[1];
        assert_eq!(second.title, "Ordonnance n° 2026-3 du 6 janvier 2026");
        assert_eq!(second.action, "a créé");
        assert_eq!(second.articles[0].article_numbers, vec!["99-1"]);
        assert!(!second.articles[0].has_section());
    }

    #[test]
    fn test_article_numbers_and_urls_stay_aligned() {
        let ParseOutcome::Parsed(snapshot) = parse(&sample_timeline()) else {
            panic!("expected a parsed snapshot");
        };
        for event in &snapshot.modifications {
            for group in &event.articles {
                assert_eq!(group.article_numbers.len(), group.article_urls.len());
            }
        }
    }

    #[test]
    fn test_block_without_title_link_is_skipped() {
        let html = r##"
            <div id="timeline">
              <a class="version-date" data-date="07/01/2026" href="#v1">07 janvier 2026</a>
            </div>
            <article class="version-en-vigueur">
              <h2 class="version-titre"><a href="/codes/id/X/2026-01-07/">07 janvier 2026</a></h2>
              <div class="texte-modificateur">
                <div class="titre-texte">Titre sans lien</div>
              </div>
              <div class="texte-modificateur">
                <div class="titre-texte"><a href="/loda/id/Y">Arrêté du 2 janvier 2026</a></div>
              </div>
            </article>
        "##;
        let ParseOutcome::Parsed(snapshot) = parse(html) else {
            panic!("expected a parsed snapshot");
        };
        assert_eq!(snapshot.modifications.len(), 1);
        assert_eq!(snapshot.modifications[0].title, "Arrêté du 2 janvier 2026");
        assert!(snapshot.modifications[0].action.is_empty());
    }

    #[test]
    fn test_container_without_blocks_yields_empty_snapshot() {
        let html = r##"
            <div id="timeline">
              <a class="version-date" data-date="07/01/2026" href="#v1">07 janvier 2026</a>
            </div>
            <article class="version-en-vigueur">
              <h2 class="version-titre"><a href="/codes/id/X/2026-01-07/">07 janvier 2026</a></h2>
            </article>
        "##;
        let ParseOutcome::Parsed(snapshot) = parse(html) else {
            panic!("expected a parsed snapshot");
        };
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.date, "07 janvier 2026");
    }

    #[test]
    fn test_missing_title_link_leaves_date_empty() {
        let html = r##"
            <div id="timeline">
              <a class="version-date" data-date="07/01/2026" href="#v1">07 janvier 2026</a>
            </div>
            <article class="version-en-vigueur">
              <div class="texte-modificateur">
                <div class="titre-texte"><a href="/loda/id/Z">Loi du 1 janvier 2026</a></div>
              </div>
            </article>
        "##;
        let ParseOutcome::Parsed(snapshot) = parse(html) else {
            panic!("expected a parsed snapshot");
        };
        assert!(snapshot.date.is_empty());
        assert!(snapshot.date_url.is_empty());
        assert_eq!(snapshot.modifications.len(), 1);
    }

    #[test]
    fn test_anchor_without_href_is_skipped() {
        let html = r##"
            <div id="timeline">
              <a class="version-date" data-date="07/01/2026" href="#v1">07 janvier 2026</a>
            </div>
            <article class="version-en-vigueur">
              <h2 class="version-titre"><a href="/codes/id/X/2026-01-07/">07 janvier 2026</a></h2>
              <div class="texte-modificateur">
                <div class="titre-texte"><a href="/loda/id/Y">Décret du 3 janvier 2026</a></div>
                <ul class="liste-articles">
                  <li>
                    <a>sans href</a>
                    <a href="/codes/article_lc/LEGIARTI000000000042">42</a>
                  </li>
                  <li><a>rien du tout</a></li>
                </ul>
              </div>
            </article>
        "##;
        let ParseOutcome::Parsed(snapshot) = parse(html) else {
            panic!("expected a parsed snapshot");
        };
        let groups = &snapshot.modifications[0].articles;
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].article_numbers, vec!["42"]);
    }

    #[test]
    fn test_bad_base_url_is_a_config_error() {
        let html = sample_timeline();
        let result = parse_snapshot(
            &html,
            reference_date(),
            &TimelineSelectors::default(),
            "not a base url",
        );
        assert!(result.is_err());
    }
}
