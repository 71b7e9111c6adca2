// src/utils/url.rs

//! URL resolution and timeline query construction.

use chrono::NaiveDate;
use url::Url;

use crate::error::Result;
use crate::utils::format_date_fr;

/// Resolve a potentially relative href against a base URL.
///
/// Falls back to the raw href when it cannot be joined, so a malformed
/// fragment degrades to its original text instead of aborting a parse.
pub fn resolve_url(base: &Url, href: &str) -> String {
    base.join(href)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| href.to_string())
}

/// Build the dated timeline URL for one fetch.
///
/// The page expects `startYear`, `endYear` and `dateConsult` all set to the
/// consultation date, formatted DD/MM/YYYY.
pub fn timeline_url(page_url: &str, date: NaiveDate) -> Result<String> {
    let mut url = Url::parse(page_url)?;
    let stamp = format_date_fr(date);
    url.query_pairs_mut()
        .clear()
        .append_pair("startYear", &stamp)
        .append_pair("endYear", &stamp)
        .append_pair("dateConsult", &stamp);
    Ok(url.to_string())
}
