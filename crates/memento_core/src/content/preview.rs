//! Plain-text previews for compact entry listings (pinned list, CLI).
//!
//! # Invariants
//! - Output never contains newlines or markdown punctuation.
//! - Output is capped at the requested number of chars.

use crate::content::checklist::CHECKLIST_GLYPH;
use once_cell::sync::Lazy;
use regex::Regex;

/// Default cap for preview labels.
pub const PREVIEW_MAX_CHARS: usize = 80;

static MARKDOWN_IMAGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"!\[[^\]]*]\([^)]*\)").expect("valid image regex"));
static MARKDOWN_LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\]]+)\]\([^)]+\)").expect("valid link regex"));
static MARKDOWN_SYMBOL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\*_`#>~\[\]\(\)!]+").expect("valid markdown symbol regex"));
static LIST_BULLET_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s*-\s+").expect("valid list bullet regex"));
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Derives a one-line preview of raw entry text.
///
/// Images are dropped, links collapse to their label, list bullets and
/// checklist glyphs are removed, whitespace is normalized. Returns `None`
/// when nothing readable is left.
pub fn preview_text(raw_text: &str, max_chars: usize) -> Option<String> {
    let without_images = MARKDOWN_IMAGE_RE.replace_all(raw_text, " ");
    let without_links = MARKDOWN_LINK_RE.replace_all(&without_images, "$1");
    let without_bullets = LIST_BULLET_RE.replace_all(&without_links, "");
    let without_glyphs = without_bullets.replace(CHECKLIST_GLYPH, " ");
    let without_symbols = MARKDOWN_SYMBOL_RE.replace_all(&without_glyphs, " ");
    let normalized = WHITESPACE_RE.replace_all(&without_symbols, " ");
    let trimmed = normalized.trim();
    if trimmed.is_empty() {
        return None;
    }

    let mut preview: String = trimmed.chars().take(max_chars).collect();
    if trimmed.chars().count() > max_chars {
        preview = preview.trim_end().to_string();
        preview.push('…');
    }
    Some(preview)
}

#[cfg(test)]
mod tests {
    use super::preview_text;

    #[test]
    fn strips_markdown_and_checklist_syntax() {
        let raw = "# Trip\n\n○ pack bags\n- [map](https://maps.example)\n**early** start";
        assert_eq!(
            preview_text(raw, 80).as_deref(),
            Some("Trip pack bags map early start")
        );
    }

    #[test]
    fn drops_images_entirely() {
        assert_eq!(preview_text("![cover](a.png)", 80), None);
        assert_eq!(
            preview_text("look ![cover](a.png) here", 80).as_deref(),
            Some("look here")
        );
    }

    #[test]
    fn truncates_on_char_boundary() {
        let preview = preview_text("ééééé ééééé", 4).expect("text should yield a preview");
        assert_eq!(preview, "éééé…");
    }

    #[test]
    fn blank_input_has_no_preview() {
        assert_eq!(preview_text("  \n ", 10), None);
    }
}
