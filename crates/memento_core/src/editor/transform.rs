//! Pure text transforms behind the compose toolbar.
//!
//! # Responsibility
//! - Toggle heading/list/quote/checklist prefixes on the caret line.
//! - Wrap the selection in inline markers.
//! - Continue or close checklists when a line break is requested.
//!
//! # Invariants
//! - Offsets are UTF-8 byte offsets; inputs are clamped to the text and
//!   snapped back to a char boundary, so every transform is total.
//! - The caret line is the span between the preceding `\n` (or start of
//!   text) and the following `\n` (or end of text) of the selection start.
//! - No transform leaves a marker split across lines or half written.

use crate::content::checklist::{checklist_item_text, CHECKLIST_MARKER};

pub const HEADING_ONE_PREFIX: &str = "# ";
pub const HEADING_TWO_PREFIX: &str = "## ";
pub const LIST_PREFIX: &str = "- ";
pub const QUOTE_PREFIX: &str = "> ";
pub const BOLD_MARKER: &str = "**";

/// Text plus selection as handed over by the text input.
///
/// Only constructible through [`EditState::new`], so the selection is
/// always ordered and lies on char boundaries inside `text`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditState {
    text: String,
    selection_start: usize,
    selection_end: usize,
}

impl EditState {
    /// Creates a state, normalizing the selection into range and order.
    pub fn new(text: impl Into<String>, selection_start: usize, selection_end: usize) -> Self {
        let text = text.into();
        let start = clamp_offset(&text, selection_start);
        let end = clamp_offset(&text, selection_end);
        Self {
            text,
            selection_start: start.min(end),
            selection_end: start.max(end),
        }
    }

    /// Collapsed selection at `caret`.
    pub fn at_caret(text: impl Into<String>, caret: usize) -> Self {
        Self::new(text, caret, caret)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn selection_start(&self) -> usize {
        self.selection_start
    }

    pub fn selection_end(&self) -> usize {
        self.selection_end
    }

    pub fn into_text(self) -> String {
        self.text
    }

    pub fn has_selection(&self) -> bool {
        self.selection_start < self.selection_end
    }

    pub fn selected_text(&self) -> &str {
        &self.text[self.selection_start..self.selection_end]
    }
}

/// Result of one transform: full new text and the caret to restore.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditOutcome {
    pub text: String,
    pub caret: usize,
}

impl EditOutcome {
    /// Collapsed state for chaining transforms.
    pub fn into_state(self) -> EditState {
        EditState::at_caret(self.text, self.caret)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LineSpan {
    start: usize,
    end: usize,
}

/// Cycles the caret line through no prefix, `# `, `## `, no prefix.
pub fn toggle_heading_level(state: &EditState) -> EditOutcome {
    let line = current_line(&state.text, state.selection_start);
    let content = &state.text[line.start..line.end];

    if content.starts_with(HEADING_TWO_PREFIX) {
        rewrite_line_start(state, line, HEADING_TWO_PREFIX.len(), "")
    } else if content.starts_with(HEADING_ONE_PREFIX) {
        rewrite_line_start(state, line, HEADING_ONE_PREFIX.len(), HEADING_TWO_PREFIX)
    } else {
        rewrite_line_start(state, line, 0, HEADING_ONE_PREFIX)
    }
}

/// Removes `prefix` from the caret line if present, otherwise prepends it.
///
/// Applying the same prefix twice restores the original text.
pub fn toggle_line_prefix(state: &EditState, prefix: &str) -> EditOutcome {
    if prefix.is_empty() {
        return EditOutcome {
            text: state.text.clone(),
            caret: state.selection_start,
        };
    }

    let line = current_line(&state.text, state.selection_start);
    if state.text[line.start..line.end].starts_with(prefix) {
        rewrite_line_start(state, line, prefix.len(), "")
    } else {
        rewrite_line_start(state, line, 0, prefix)
    }
}

pub fn toggle_list_item(state: &EditState) -> EditOutcome {
    toggle_line_prefix(state, LIST_PREFIX)
}

pub fn toggle_quote(state: &EditState) -> EditOutcome {
    toggle_line_prefix(state, QUOTE_PREFIX)
}

pub fn toggle_checklist_item(state: &EditState) -> EditOutcome {
    toggle_line_prefix(state, CHECKLIST_MARKER)
}

/// Wraps the selection in `marker`, or inserts an empty marker pair.
///
/// With a selection the caret lands after the closing marker; without one
/// it lands between the two markers.
pub fn toggle_wrap(state: &EditState, marker: &str) -> EditOutcome {
    let (start, end) = (state.selection_start, state.selection_end);
    let mut text = String::with_capacity(state.text.len() + marker.len() * 2);
    text.push_str(&state.text[..start]);
    text.push_str(marker);

    let caret = if state.has_selection() {
        text.push_str(&state.text[start..end]);
        text.push_str(marker);
        text.len()
    } else {
        let caret = text.len();
        text.push_str(marker);
        caret
    };

    text.push_str(&state.text[end..]);
    EditOutcome { text, caret }
}

pub fn toggle_bold(state: &EditState) -> EditOutcome {
    toggle_wrap(state, BOLD_MARKER)
}

/// Handles a line break request on a checklist line.
///
/// Returns `None` when a modifier is held or the caret line is not a
/// checklist line; the caller then inserts a plain newline. On an empty
/// item the marker is deleted and a bare line remains. Otherwise a new line
/// with a fresh marker is inserted and the caret placed right after it.
/// The selection collapses to its start.
pub fn continue_checklist(state: &EditState, modifier_held: bool) -> Option<EditOutcome> {
    if modifier_held {
        return None;
    }

    let caret = state.selection_start;
    let line = current_line(&state.text, caret);
    let content = &state.text[line.start..line.end];
    let item = checklist_item_text(content)?;

    if item.trim().is_empty() {
        let mut text = String::with_capacity(state.text.len());
        text.push_str(&state.text[..line.start]);
        text.push_str(&state.text[line.end..]);
        return Some(EditOutcome {
            text,
            caret: line.start,
        });
    }

    // never split inside the existing marker
    let marker_end = line.start + (content.len() - item.len());
    let split = caret.max(marker_end);

    let mut text = String::with_capacity(state.text.len() + CHECKLIST_MARKER.len() + 1);
    text.push_str(&state.text[..split]);
    text.push('\n');
    text.push_str(CHECKLIST_MARKER);
    let caret = text.len();
    text.push_str(&state.text[split..]);
    Some(EditOutcome { text, caret })
}

fn rewrite_line_start(
    state: &EditState,
    line: LineSpan,
    remove: usize,
    insert: &str,
) -> EditOutcome {
    let mut text = String::with_capacity(state.text.len() + insert.len());
    text.push_str(&state.text[..line.start]);
    text.push_str(insert);
    text.push_str(&state.text[line.start + remove..]);

    let caret = state.selection_start;
    let caret = if caret >= line.start + remove {
        caret - remove + insert.len()
    } else {
        line.start + insert.len()
    };

    EditOutcome { text, caret }
}

fn current_line(text: &str, offset: usize) -> LineSpan {
    let start = text[..offset].rfind('\n').map_or(0, |idx| idx + 1);
    let end = text[offset..]
        .find('\n')
        .map_or(text.len(), |idx| offset + idx);
    LineSpan { start, end }
}

fn clamp_offset(text: &str, offset: usize) -> usize {
    let mut offset = offset.min(text.len());
    while !text.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}
