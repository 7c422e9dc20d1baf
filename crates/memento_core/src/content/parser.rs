//! Line-oriented entry content parser.
//!
//! # Responsibility
//! - Split raw entry text into text runs, bare URLs and checklist items,
//!   all in source line order.
//! - Number checklist items as one flattened checklist.
//!
//! # Invariants
//! - Lines containing markdown link syntax (`](`) are never scanned for
//!   bare URLs; the markdown renderer owns them.
//! - Multiple URLs on one line are emitted left to right.
//! - Checklist indices depend only on the order of checklist lines, so
//!   re-parsing text whose checklist lines were not reordered keeps every
//!   index stable.

use crate::content::checklist::checklist_item_text;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

const MARKDOWN_LINK_OPENER: &str = "](";

static BARE_URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"https?://\S+").expect("valid bare url regex"));
static STANDALONE_URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^https?://\S+$").expect("valid standalone url regex"));

/// One typed unit of parsed entry content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentSegment {
    /// Markdown text run, trimmed, never empty.
    Text(String),
    /// Bare `http(s)://` URL rendered as a link preview.
    Url(String),
    /// Checklist item addressed by its flattened position.
    Checklist { content: String, index: usize },
}

impl ContentSegment {
    pub fn is_checklist(&self) -> bool {
        matches!(self, Self::Checklist { .. })
    }
}

/// Parses raw entry text into ordered segments.
///
/// A checklist line splits the text run around it, so every segment
/// appears where its line sat in `raw_text`.
pub fn parse(raw_text: &str) -> Vec<ContentSegment> {
    let runs = split_runs(raw_text);
    extract_checklists(runs)
}

/// Iterates `(index, text)` for every checklist segment.
pub fn checklist_items(segments: &[ContentSegment]) -> impl Iterator<Item = (usize, &str)> {
    segments.iter().filter_map(|segment| match segment {
        ContentSegment::Checklist { content, index } => Some((*index, content.as_str())),
        _ => None,
    })
}

/// First pass: text runs and URLs, before checklist extraction.
fn split_runs(raw_text: &str) -> Vec<ContentSegment> {
    let mut runs = Vec::new();
    let mut buffer: Vec<String> = Vec::new();

    for line in raw_text.lines() {
        if line.contains(MARKDOWN_LINK_OPENER) {
            buffer.push(line.to_string());
            continue;
        }

        let trimmed = line.trim();
        if STANDALONE_URL_RE.is_match(trimmed) {
            flush(&mut buffer, &mut runs);
            runs.push(ContentSegment::Url(trimmed.to_string()));
            continue;
        }

        let urls = BARE_URL_RE
            .find_iter(line)
            .map(|found| found.as_str().to_string())
            .collect::<Vec<_>>();
        if urls.is_empty() {
            buffer.push(line.to_string());
            continue;
        }

        let remainder = BARE_URL_RE.replace_all(line, "");
        let remainder = remainder.trim();
        if !remainder.is_empty() {
            buffer.push(remainder.to_string());
        }
        flush(&mut buffer, &mut runs);
        runs.extend(urls.into_iter().map(ContentSegment::Url));
    }

    flush(&mut buffer, &mut runs);
    runs
}

fn flush(buffer: &mut Vec<String>, runs: &mut Vec<ContentSegment>) {
    if buffer.is_empty() {
        return;
    }
    let joined = buffer.join("\n");
    buffer.clear();

    let content = joined.trim();
    if !content.is_empty() {
        runs.push(ContentSegment::Text(content.to_string()));
    }
}

/// Second pass: split text runs at their checklist lines.
fn extract_checklists(runs: Vec<ContentSegment>) -> Vec<ContentSegment> {
    let mut segments = Vec::with_capacity(runs.len());
    let mut next_index = 0usize;

    for run in runs {
        let ContentSegment::Text(content) = run else {
            segments.push(run);
            continue;
        };

        let mut kept: Vec<String> = Vec::new();
        for line in content.split('\n') {
            match checklist_item_text(line) {
                Some(text) => {
                    flush(&mut kept, &mut segments);
                    segments.push(ContentSegment::Checklist {
                        content: text.to_string(),
                        index: next_index,
                    });
                    next_index += 1;
                }
                None => kept.push(line.to_string()),
            }
        }
        flush(&mut kept, &mut segments);
    }

    segments
}

#[cfg(test)]
mod tests {
    use super::{checklist_items, parse, ContentSegment};

    fn text(value: &str) -> ContentSegment {
        ContentSegment::Text(value.to_string())
    }

    fn url(value: &str) -> ContentSegment {
        ContentSegment::Url(value.to_string())
    }

    fn item(value: &str, index: usize) -> ContentSegment {
        ContentSegment::Checklist {
            content: value.to_string(),
            index,
        }
    }

    #[test]
    fn empty_and_blank_input_yield_nothing() {
        assert!(parse("").is_empty());
        assert!(parse("  \n\n \t").is_empty());
    }

    #[test]
    fn plain_text_is_one_trimmed_segment() {
        assert_eq!(
            parse("\n  first line\nsecond line  \n"),
            vec![text("first line\nsecond line")]
        );
    }

    #[test]
    fn standalone_url_flushes_preceding_text() {
        assert_eq!(
            parse("intro\n  https://example.com/a  \noutro"),
            vec![text("intro"), url("https://example.com/a"), text("outro")]
        );
    }

    #[test]
    fn inline_urls_are_split_out_left_to_right() {
        assert_eq!(
            parse("Check this http://a.example http://b.example"),
            vec![
                text("Check this"),
                url("http://a.example"),
                url("http://b.example")
            ]
        );
    }

    #[test]
    fn inline_urls_keep_surrounding_words_in_one_text_run() {
        let segments = parse("Check this http://a.example and http://b.example");
        assert_eq!(segments.len(), 3);
        assert!(matches!(&segments[0], ContentSegment::Text(t) if t.starts_with("Check this")));
        assert_eq!(segments[1], url("http://a.example"));
        assert_eq!(segments[2], url("http://b.example"));
    }

    #[test]
    fn inline_url_line_joins_buffered_text() {
        assert_eq!(
            parse("line one\nsee https://x.example now\nafter"),
            vec![
                text("line one\nsee  now"),
                url("https://x.example"),
                text("after")
            ]
        );
    }

    #[test]
    fn markdown_link_line_is_never_decomposed() {
        let raw = "[docs](https://docs.example) and https://bare.example";
        assert_eq!(parse(raw), vec![text(raw)]);
    }

    #[test]
    fn checklist_lines_are_fully_consumed() {
        assert_eq!(
            parse("○ buy milk\n○ walk dog"),
            vec![item("buy milk", 0), item("walk dog", 1)]
        );
    }

    #[test]
    fn checklist_indices_flatten_across_segments() {
        let raw = "groceries\n○ eggs\nhttps://shop.example\n○ flour\nnotes\n○ sugar";
        assert_eq!(
            parse(raw),
            vec![
                text("groceries"),
                item("eggs", 0),
                url("https://shop.example"),
                item("flour", 1),
                text("notes"),
                item("sugar", 2),
            ]
        );
    }

    #[test]
    fn text_after_a_checklist_line_stays_after_it() {
        assert_eq!(parse("○ a\nnote"), vec![item("a", 0), text("note")]);
        assert_eq!(
            parse("before\n○ a\nmiddle\n○ b\nafter"),
            vec![
                text("before"),
                item("a", 0),
                text("middle"),
                item("b", 1),
                text("after"),
            ]
        );
    }

    #[test]
    fn bare_marker_is_an_empty_item() {
        assert_eq!(parse("todo\n○ "), vec![text("todo"), item("", 0)]);
        assert_eq!(parse("○ a\n○ \n○ b"), vec![item("a", 0), item("", 1), item("b", 2)]);
    }

    #[test]
    fn reparse_is_deterministic() {
        let raw = "○ one\ntext https://u.example\n○ two";
        assert_eq!(parse(raw), parse(raw));
    }

    #[test]
    fn editing_non_checklist_text_keeps_indices() {
        let before = parse("intro\n○ a\n○ b");
        let after = parse("a much longer intro\nwith two lines\n○ a\n○ b\nand an outro");
        let before: Vec<_> = checklist_items(&before).collect();
        let after: Vec<_> = checklist_items(&after).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn crlf_line_endings_are_tolerated() {
        assert_eq!(
            parse("○ a\r\n○ b\r\n"),
            vec![item("a", 0), item("b", 1)]
        );
    }
}
