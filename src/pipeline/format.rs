// src/pipeline/format.rs

//! Notification formatter.
//!
//! Renders a [`ParsedSnapshot`] into ordered, size-bounded message chunks.
//! Rendering is deterministic layout only; pagination never reorders or
//! splits a modification block, so concatenating all chunk bodies yields
//! exactly the blocks of the snapshot in document order.

use chrono::{DateTime, Utc};

use crate::models::{ArticleGroup, MessageChunk, ModificationEvent, ParsedSnapshot};

/// Action keywords matched against the lowercased action text, in priority
/// order. French verbs first, their English counterparts second.
const ACTION_ICONS: &[(&str, &str)] = &[
    ("modifi", "📝"),
    ("amend", "📝"),
    ("cré", "✨"),
    ("creat", "✨"),
    ("abrog", "🗑️"),
    ("repeal", "🗑️"),
];

/// Icon for actions matching no table entry, and for empty actions.
const DEFAULT_ICON: &str = "📄";

/// Title suffix of continuation chunks.
const CONTINUATION_SUFFIX: &str = " (suite)";

/// Pick the icon for an action phrase.
fn action_icon(action: &str) -> &'static str {
    let needle = action.to_lowercase();
    ACTION_ICONS
        .iter()
        .find(|(keyword, _)| needle.contains(keyword))
        .map(|(_, icon)| *icon)
        .unwrap_or(DEFAULT_ICON)
}

/// Render one article group as a single line, without trailing newline.
///
/// Returns an empty string for a group with neither articles nor section,
/// which the block renderer drops.
fn render_group(group: &ArticleGroup) -> String {
    let mut line = String::new();

    if !group.article_numbers.is_empty() {
        let links: Vec<String> = group
            .article_numbers
            .iter()
            .zip(&group.article_urls)
            .map(|(number, url)| format!("[{number}]({url})"))
            .collect();
        line.push_str("Articles : ");
        line.push_str(&links.join(", "));
    }

    if group.has_section() {
        if !line.is_empty() {
            line.push_str(" · ");
        }
        line.push_str("Section : [");
        line.push_str(&group.section_name);
        line.push_str("](");
        line.push_str(&group.section_url);
        line.push(')');
    }

    line
}

/// Render one modification event as a self-contained block.
///
/// The block always ends with a newline, so chunk bodies concatenate
/// losslessly.
pub fn render_block(event: &ModificationEvent) -> String {
    let mut block = format!(
        "{} **[{}]({})**\n",
        action_icon(&event.action),
        event.title,
        event.url
    );

    if !event.action.is_empty() {
        block.push_str(&event.action);
        block.push('\n');
    }

    for group in &event.articles {
        let line = render_group(group);
        if !line.is_empty() {
            block.push_str(&line);
            block.push('\n');
        }
    }

    block
}

/// Render a snapshot into ordered chunks, each body at most
/// `max_chunk_chars` characters.
///
/// The bound is checked before appending a block: a block that would
/// overflow a non-empty body seals the current chunk and opens a
/// continuation chunk with a suffixed title and unchanged url, color and
/// timestamp. A single block is never split, so a block larger than the
/// bound lands alone in an oversized chunk. An empty snapshot yields zero
/// chunks; callers send the fixed no-changes notice instead.
pub fn format_snapshot(
    snapshot: &ParsedSnapshot,
    title: &str,
    color: u32,
    timestamp: DateTime<Utc>,
    max_chunk_chars: usize,
) -> Vec<MessageChunk> {
    let mut chunks: Vec<MessageChunk> = Vec::new();
    let mut body = String::new();

    for event in &snapshot.modifications {
        let block = render_block(event);
        let would_overflow =
            body.chars().count() + block.chars().count() > max_chunk_chars;
        if !body.is_empty() && would_overflow {
            push_chunk(&mut chunks, snapshot, title, color, timestamp, &mut body);
        }
        body.push_str(&block);
    }

    if !body.is_empty() {
        push_chunk(&mut chunks, snapshot, title, color, timestamp, &mut body);
    }

    chunks
}

/// Seal the in-progress body into a chunk, suffixing continuation titles.
fn push_chunk(
    chunks: &mut Vec<MessageChunk>,
    snapshot: &ParsedSnapshot,
    title: &str,
    color: u32,
    timestamp: DateTime<Utc>,
    body: &mut String,
) {
    let chunk_title = if chunks.is_empty() {
        title.to_string()
    } else {
        format!("{title}{CONTINUATION_SUFFIX}")
    };
    chunks.push(MessageChunk {
        title: chunk_title,
        url: snapshot.date_url.clone(),
        color,
        timestamp,
        body: std::mem::take(body),
    });
}
