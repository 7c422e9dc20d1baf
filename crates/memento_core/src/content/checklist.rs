//! Checklist marker syntax and completion state.
//!
//! # Invariants
//! - A checklist line starts with [`CHECKLIST_MARKER`] (glyph + one space),
//!   or consists of the bare glyph alone (an empty item).
//! - Completion state is a set of flattened checklist positions; toggling
//!   never renumbers other items.

use std::collections::BTreeSet;

/// Glyph that opens a checklist line.
pub const CHECKLIST_GLYPH: &str = "○";
/// Full line prefix written by the editor for a checklist item.
pub const CHECKLIST_MARKER: &str = "○ ";

/// Returns the item text when `line` is a checklist line.
pub fn checklist_item_text(line: &str) -> Option<&str> {
    if let Some(rest) = line.strip_prefix(CHECKLIST_MARKER) {
        return Some(rest);
    }
    // flush trimming strips the space after a trailing bare marker
    (line == CHECKLIST_GLYPH).then_some("")
}

pub fn is_checklist_line(line: &str) -> bool {
    checklist_item_text(line).is_some()
}

pub fn is_completed(completed: &BTreeSet<usize>, index: usize) -> bool {
    completed.contains(&index)
}

/// Returns a new completion set with `index` flipped.
pub fn toggle_completed(completed: &BTreeSet<usize>, index: usize) -> BTreeSet<usize> {
    let mut next = completed.clone();
    if !next.remove(&index) {
        next.insert(index);
    }
    next
}

/// Decodes the stored completion payload (a JSON array of indices).
///
/// Missing or malformed payloads decode to an empty set; negative or
/// non-integer members are ignored.
pub fn decode_completed(payload: Option<&str>) -> BTreeSet<usize> {
    let Some(raw) = payload.map(str::trim).filter(|raw| !raw.is_empty()) else {
        return BTreeSet::new();
    };
    match serde_json::from_str::<Vec<serde_json::Value>>(raw) {
        Ok(values) => values
            .iter()
            .filter_map(serde_json::Value::as_u64)
            .filter_map(|value| usize::try_from(value).ok())
            .collect(),
        Err(_) => BTreeSet::new(),
    }
}

/// Encodes a completion set into the stored JSON array form.
pub fn encode_completed(completed: &BTreeSet<usize>) -> String {
    let members = completed
        .iter()
        .map(usize::to_string)
        .collect::<Vec<_>>()
        .join(",");
    format!("[{members}]")
}

#[cfg(test)]
mod tests {
    use super::{
        checklist_item_text, decode_completed, encode_completed, is_checklist_line,
        is_completed, toggle_completed,
    };
    use std::collections::BTreeSet;

    #[test]
    fn marker_detection() {
        assert_eq!(checklist_item_text("○ buy milk"), Some("buy milk"));
        assert_eq!(checklist_item_text("○ "), Some(""));
        assert_eq!(checklist_item_text("○"), Some(""));
        assert_eq!(checklist_item_text("○buy"), None);
        assert_eq!(checklist_item_text(" ○ indented"), None);
        assert!(!is_checklist_line("- list item"));
    }

    #[test]
    fn toggle_is_self_inverse() {
        let start: BTreeSet<usize> = [2].into_iter().collect();
        let toggled = toggle_completed(&start, 0);
        assert_eq!(toggled.iter().copied().collect::<Vec<_>>(), vec![0, 2]);
        assert!(is_completed(&toggled, 0));
        assert_eq!(toggle_completed(&toggled, 0), start);
    }

    #[test]
    fn decode_is_lenient() {
        assert!(decode_completed(None).is_empty());
        assert!(decode_completed(Some("not json")).is_empty());
        let decoded = decode_completed(Some("[3, -1, \"x\", 0, 3]"));
        assert_eq!(decoded.iter().copied().collect::<Vec<_>>(), vec![0, 3]);
    }

    #[test]
    fn encode_produces_sorted_json_array() {
        let set: BTreeSet<usize> = [4, 1].into_iter().collect();
        assert_eq!(encode_completed(&set), "[1,4]");
        assert_eq!(encode_completed(&BTreeSet::new()), "[]");
        assert_eq!(decode_completed(Some(&encode_completed(&set))), set);
    }
}
