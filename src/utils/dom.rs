// src/utils/dom.rs

//! Thin query layer over the HTML engine.
//!
//! The parser and tracker express their traversal entirely through these
//! helpers plus configured selector strings, so the extraction logic stays
//! independent of the concrete query engine.

use scraper::{ElementRef, Selector};

use crate::error::{AppError, Result};

/// Compile a CSS selector string.
pub fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}

/// All descendants of `node` matching `selector`, in document order.
pub fn select_all<'a>(node: ElementRef<'a>, selector: &Selector) -> Vec<ElementRef<'a>> {
    node.select(selector).collect()
}

/// First descendant of `node` matching `selector`.
pub fn select_first<'a>(node: ElementRef<'a>, selector: &Selector) -> Option<ElementRef<'a>> {
    node.select(selector).next()
}

/// Attribute value on `node`, if present.
pub fn attr<'a>(node: ElementRef<'a>, name: &str) -> Option<&'a str> {
    node.value().attr(name)
}

/// Concatenated text content of `node`, trimmed.
pub fn text(node: ElementRef<'_>) -> String {
    node.text().collect::<String>().trim().to_string()
}

/// Inner markup of `node`, captured verbatim.
pub fn inner_html(node: ElementRef<'_>) -> String {
    node.inner_html()
}

/// Whether `node` carries the given class token.
pub fn has_class(node: ElementRef<'_>, class: &str) -> bool {
    node.value().classes().any(|c| c == class)
}
