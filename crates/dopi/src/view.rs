//! Presentation helpers for front ends. Storage keeps text verbatim; these
//! only shape it for display.

use std::ops::Range;

use serde::Serialize;

use crate::catalog::Document;
use crate::db;

/// Maximum number of characters of content shown in a listing row.
pub const SUMMARY_CONTENT_CHARS: usize = 300;

/// Removes line breaks so a field fits on one row.
pub fn flatten(text: &str) -> String {
    text.chars().filter(|c| !matches!(c, '\n' | '\r')).collect()
}

fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// One listing row: every field flattened, content shortened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentSummary {
    pub id: i64,
    pub name: String,
    pub keyword1: String,
    pub keyword2: String,
    pub date: String,
    pub content: String,
}

pub fn summary(doc: &Document) -> DocumentSummary {
    let field = |value: &Option<String>| value.as_deref().map(flatten).unwrap_or_default();
    let content = flatten(&doc.content);

    DocumentSummary {
        id: doc.id,
        name: flatten(&doc.name),
        keyword1: field(&doc.keyword1),
        keyword2: field(&doc.keyword2),
        date: field(&doc.date),
        content: truncate_chars(&content, SUMMARY_CONTENT_CHARS).to_string(),
    }
}

/// Full record as labelled lines, with a blank line between the metadata
/// and the content. Absent fields are skipped.
pub fn detail(doc: &Document) -> String {
    let mut out = format!("Name: {}\n", doc.name);
    for (label, value) in [
        ("Keyword 1", &doc.keyword1),
        ("Keyword 2", &doc.keyword2),
        ("Date", &doc.date),
    ] {
        if let Some(value) = value {
            out.push_str(&format!("{}: {}\n", label, value));
        }
    }
    out.push('\n');
    out.push_str(&format!("Content: {}\n", doc.content));
    out
}

/// Byte ranges of every non-overlapping, case-insensitive occurrence of
/// `term` in `text`, for highlighting.
pub fn match_ranges(text: &str, term: &str) -> Vec<Range<usize>> {
    if term.is_empty() {
        return Vec::new();
    }
    let needle: Vec<char> = term.chars().flat_map(db::fold_char).collect();

    // Folded chars paired with the byte offset of the char they came from.
    let folded: Vec<(usize, char)> = text
        .char_indices()
        .flat_map(|(idx, c)| db::fold_char(c).map(move |l| (idx, l)))
        .collect();
    let end_of = |pos: usize| -> usize {
        folded
            .get(pos)
            .map(|&(idx, _)| idx)
            .unwrap_or(text.len())
    };

    let mut ranges = Vec::new();
    let mut pos = 0;
    while pos + needle.len() <= folded.len() {
        let window = folded[pos..pos + needle.len()].iter().map(|&(_, c)| c);
        if window.eq(needle.iter().copied()) {
            let start = folded[pos].0;
            let mut next = pos + needle.len();
            // Never end a range inside a char that folded into several.
            while next < folded.len() && folded[next].0 == folded[next - 1].0 {
                next += 1;
            }
            ranges.push(start..end_of(next));
            pos = next;
        } else {
            pos += 1;
        }
    }
    ranges
}

/// Wraps each match of `term` in `open`/`close` markers.
pub fn highlight(text: &str, term: &str, open: &str, close: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for range in match_ranges(text, term) {
        out.push_str(&text[last..range.start]);
        out.push_str(open);
        out.push_str(&text[range.clone()]);
        out.push_str(close);
        last = range.end;
    }
    out.push_str(&text[last..]);
    out
}
