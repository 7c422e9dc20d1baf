//! Render model for one entry card.

use crate::content::checklist::is_completed;
use crate::content::parser::{parse, ContentSegment};
use crate::model::attachment::Attachment;
use crate::model::entry::{Entry, EntryId};
use crate::tags::palette::{color_class, TagColor};
use chrono::{FixedOffset, NaiveDate};
use serde::Serialize;

/// Tag chip with its palette slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagChip {
    pub name: String,
    pub color: TagColor,
}

/// Checklist row with completion state applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChecklistRow {
    pub index: usize,
    pub content: String,
    pub completed: bool,
}

/// Everything a card needs, derived from one entry snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryView {
    pub id: EntryId,
    pub date: NaiveDate,
    /// e.g. `Monday, March 4 at 3:15 PM`.
    pub posted_label: String,
    /// Text and URL segments in order; checklist items live in `checklist`.
    pub blocks: Vec<ContentSegment>,
    pub checklist: Vec<ChecklistRow>,
    pub tags: Vec<TagChip>,
    pub images: Vec<Attachment>,
    pub files: Vec<Attachment>,
    pub is_pinned: bool,
    pub reminder_time: Option<String>,
}

impl EntryView {
    /// Builds the card model; `offset` localizes the posting time.
    pub fn render(entry: &Entry, offset: FixedOffset) -> Self {
        let mut blocks = Vec::new();
        let mut checklist = Vec::new();
        for segment in parse(&entry.raw_text) {
            match segment {
                ContentSegment::Checklist { content, index } => checklist.push(ChecklistRow {
                    completed: is_completed(&entry.completed_indices, index),
                    index,
                    content,
                }),
                other => blocks.push(other),
            }
        }

        let (images, files): (Vec<_>, Vec<_>) = entry
            .attachments
            .iter()
            .cloned()
            .partition(Attachment::is_image);

        Self {
            id: entry.id,
            date: entry.date,
            posted_label: posted_label(entry, offset),
            blocks,
            checklist,
            tags: entry
                .display_tags()
                .map(|name| TagChip {
                    name: name.to_string(),
                    color: color_class(name),
                })
                .collect(),
            images,
            files,
            is_pinned: entry.is_pinned,
            reminder_time: entry.reminder_time.clone(),
        }
    }

    /// Collapsed cards show one text block, one URL block and one image.
    pub fn has_more_content(&self) -> bool {
        self.blocks.len() > 2
            || !self.checklist.is_empty()
            || self.images.len() > 1
            || !self.files.is_empty()
    }

    pub fn completed_count(&self) -> usize {
        self.checklist.iter().filter(|row| row.completed).count()
    }
}

/// Day label from the entry date, time from the local creation instant.
pub fn posted_label(entry: &Entry, offset: FixedOffset) -> String {
    let local = entry.created_at.with_timezone(&offset);
    format!(
        "{} at {}",
        entry.date.format("%A, %B %-d"),
        local.format("%-I:%M %p")
    )
}

#[cfg(test)]
mod tests {
    use super::{posted_label, EntryView};
    use crate::model::attachment::{Attachment, AttachmentKind};
    use crate::model::entry::Entry;
    use crate::tags::palette::color_class;
    use chrono::{FixedOffset, NaiveDate, TimeZone, Utc};

    fn entry(text: &str) -> Entry {
        Entry::new(
            NaiveDate::from_ymd_opt(2024, 3, 4).expect("fixture date should be valid"),
            Utc
                .with_ymd_and_hms(2024, 3, 4, 15, 15, 0)
                .single()
                .expect("fixture timestamp should be valid"),
            text,
        )
    }

    #[test]
    fn posted_label_uses_entry_date_and_local_time() {
        let utc = FixedOffset::east_opt(0).expect("fixture offset should be valid");
        assert_eq!(posted_label(&entry(""), utc), "Monday, March 4 at 3:15 PM");

        let tokyo = FixedOffset::east_opt(9 * 3600).expect("fixture offset should be valid");
        assert_eq!(posted_label(&entry(""), tokyo), "Monday, March 4 at 12:15 AM");
    }

    #[test]
    fn checklist_rows_carry_completion() {
        let mut entry = entry("list\n○ a\n○ b\n○ c");
        entry.completed_indices = [1].into_iter().collect();
        let utc = FixedOffset::east_opt(0).expect("fixture offset should be valid");
        let view = EntryView::render(&entry, utc);
        assert_eq!(view.blocks.len(), 1);
        let done = view
            .checklist
            .iter()
            .map(|row| (row.index, row.completed))
            .collect::<Vec<_>>();
        assert_eq!(done, vec![(0, false), (1, true), (2, false)]);
        assert_eq!(view.completed_count(), 1);
        assert!(view.has_more_content());
    }

    #[test]
    fn tags_are_sorted_with_palette_colors_and_attachments_split() {
        let mut entry = entry("hi");
        entry.tags = ["zeta", "Alpha"].iter().map(|tag| tag.to_string()).collect();
        entry.attachments = vec![
            Attachment::remote(AttachmentKind::File, "a.pdf", "https://cdn.example/a.pdf"),
            Attachment::remote(AttachmentKind::Image, "b.png", "https://cdn.example/b.png"),
        ];
        let utc = FixedOffset::east_opt(0).expect("fixture offset should be valid");
        let view = EntryView::render(&entry, utc);
        let names = view.tags.iter().map(|chip| chip.name.as_str()).collect::<Vec<_>>();
        assert_eq!(names, vec!["Alpha", "zeta"]);
        assert_eq!(view.tags[0].color, color_class("alpha"));
        assert_eq!(view.images.len(), 1);
        assert_eq!(view.files[0].display_name, "a.pdf");
        assert!(view.has_more_content());
    }
}
