//! Compose/edit session for one entry draft.
//!
//! # Responsibility
//! - Hold draft text, tags, pin flag, reminder time and attachment drafts.
//! - Decide when a draft is submittable and build the submission payload.
//! - Own the lifetime of local previews generated for pending files.
//!
//! # Invariants
//! - Every local preview is handed to the [`PreviewReleaser`] exactly once:
//!   on removal, on submit, on discard, or when the session is dropped.
//! - Attachments that already belong to a stored entry are never released.
//! - Tags are trimmed, non-empty and unique within the draft.

use crate::model::attachment::{Attachment, AttachmentKind, PreviewRef};
use crate::model::entry::{Entry, EntryId};
use log::debug;

/// Frees a locally generated attachment preview.
///
/// Implemented for any `FnMut(&PreviewRef)` so callers can pass a closure.
pub trait PreviewReleaser {
    fn release(&mut self, preview: &PreviewRef);
}

impl<F> PreviewReleaser for F
where
    F: FnMut(&PreviewRef),
{
    fn release(&mut self, preview: &PreviewRef) {
        self(preview)
    }
}

/// File picked during this session and not uploaded yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingFile {
    pub kind: AttachmentKind,
    pub display_name: String,
    /// Caller-defined handle used to upload the file on submit.
    pub source: String,
    /// Local preview, only generated for images.
    pub preview: Option<PreviewRef>,
}

/// One attachment slot of a draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftAttachment {
    /// Already persisted with the entry being edited.
    Existing(Attachment),
    Pending(PendingFile),
}

impl DraftAttachment {
    pub fn display_name(&self) -> &str {
        match self {
            Self::Existing(attachment) => &attachment.display_name,
            Self::Pending(file) => &file.display_name,
        }
    }

    pub fn kind(&self) -> AttachmentKind {
        match self {
            Self::Existing(attachment) => attachment.kind,
            Self::Pending(file) => file.kind,
        }
    }
}

/// Attachment slot in a submission, in draft order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmittedAttachment {
    Keep(Attachment),
    Upload {
        kind: AttachmentKind,
        display_name: String,
        source: String,
    },
}

/// Payload handed to the persistence layer on submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntrySubmission {
    /// `Some` when editing a stored entry.
    pub entry_id: Option<EntryId>,
    /// Trimmed draft text; may be empty when attachments are present.
    pub text: String,
    pub tags: Vec<String>,
    pub is_pinned: bool,
    pub reminder_time: Option<String>,
    pub attachments: Vec<SubmittedAttachment>,
}

impl EntrySubmission {
    /// Resolves the final attachment list in draft order.
    ///
    /// `upload` returns the remote URL of a stored file; files it cannot
    /// store (`None`) are left out.
    pub fn resolve_attachments<F>(&self, mut upload: F) -> Vec<Attachment>
    where
        F: FnMut(&str) -> Option<String>,
    {
        self.attachments
            .iter()
            .filter_map(|slot| match slot {
                SubmittedAttachment::Keep(attachment) => Some(attachment.clone()),
                SubmittedAttachment::Upload {
                    kind,
                    display_name,
                    source,
                } => upload(source)
                    .map(|url| Attachment::remote(*kind, display_name.clone(), url)),
            })
            .collect()
    }

    pub fn pending_uploads(&self) -> usize {
        self.attachments
            .iter()
            .filter(|slot| matches!(slot, SubmittedAttachment::Upload { .. }))
            .count()
    }
}

/// Mutable draft state for composing a new entry or editing a stored one.
pub struct ComposeSession<R: PreviewReleaser> {
    entry_id: Option<EntryId>,
    text: String,
    tags: Vec<String>,
    is_pinned: bool,
    reminder_time: Option<String>,
    attachments: Vec<DraftAttachment>,
    releaser: R,
}

impl<R: PreviewReleaser> ComposeSession<R> {
    /// Starts an empty draft for a new entry.
    pub fn new(releaser: R) -> Self {
        Self {
            entry_id: None,
            text: String::new(),
            tags: Vec::new(),
            is_pinned: false,
            reminder_time: None,
            attachments: Vec::new(),
            releaser,
        }
    }

    /// Starts a draft prefilled from a stored entry.
    pub fn for_entry(entry: &Entry, releaser: R) -> Self {
        Self {
            entry_id: Some(entry.id),
            text: entry.raw_text.clone(),
            tags: entry.display_tags().map(str::to_string).collect(),
            is_pinned: entry.is_pinned,
            reminder_time: entry.reminder_time.clone(),
            attachments: entry
                .attachments
                .iter()
                .cloned()
                .map(DraftAttachment::Existing)
                .collect(),
            releaser,
        }
    }

    pub fn entry_id(&self) -> Option<EntryId> {
        self.entry_id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Adds a tag; returns `false` for blank input or an exact duplicate.
    pub fn add_tag(&mut self, raw: &str) -> bool {
        let tag = raw.trim();
        if tag.is_empty() || self.tags.iter().any(|existing| existing == tag) {
            return false;
        }
        self.tags.push(tag.to_string());
        true
    }

    pub fn remove_tag(&mut self, tag: &str) -> bool {
        let before = self.tags.len();
        self.tags.retain(|existing| existing != tag);
        self.tags.len() != before
    }

    /// Removes the most recently added tag (backspace on empty tag input).
    pub fn pop_tag(&mut self) -> Option<String> {
        self.tags.pop()
    }

    pub fn is_pinned(&self) -> bool {
        self.is_pinned
    }

    pub fn toggle_pin(&mut self) -> bool {
        self.is_pinned = !self.is_pinned;
        self.is_pinned
    }

    pub fn reminder_time(&self) -> Option<&str> {
        self.reminder_time.as_deref()
    }

    pub fn set_reminder_time(&mut self, value: Option<&str>) {
        self.reminder_time = value
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string);
    }

    pub fn attachments(&self) -> &[DraftAttachment] {
        &self.attachments
    }

    /// Adds a locally picked file.
    ///
    /// The kind is derived from `mime`. A preview is only kept for images;
    /// one supplied for any other kind is released right away.
    pub fn attach_file(
        &mut self,
        display_name: impl Into<String>,
        mime: &str,
        source: impl Into<String>,
        preview: Option<PreviewRef>,
    ) {
        let kind = AttachmentKind::from_mime(mime);
        let preview = match preview {
            Some(preview) if kind != AttachmentKind::Image => {
                self.release(&preview, "non_image");
                None
            }
            other => other,
        };
        self.attachments.push(DraftAttachment::Pending(PendingFile {
            kind,
            display_name: display_name.into(),
            source: source.into(),
            preview,
        }));
    }

    /// Removes the attachment at `index`, releasing its local preview.
    pub fn remove_attachment(&mut self, index: usize) -> Option<DraftAttachment> {
        if index >= self.attachments.len() {
            return None;
        }
        let mut removed = self.attachments.remove(index);
        if let DraftAttachment::Pending(file) = &mut removed {
            if let Some(preview) = file.preview.take() {
                self.release(&preview, "remove");
            }
        }
        Some(removed)
    }

    /// A draft is submittable with non-blank text or at least one attachment.
    pub fn can_submit(&self) -> bool {
        !self.text.trim().is_empty() || !self.attachments.is_empty()
    }

    /// Builds the submission payload, or `None` when not submittable.
    pub fn submission(&self) -> Option<EntrySubmission> {
        if !self.can_submit() {
            return None;
        }
        Some(EntrySubmission {
            entry_id: self.entry_id,
            text: self.text.trim().to_string(),
            tags: self.tags.clone(),
            is_pinned: self.is_pinned,
            reminder_time: self.reminder_time.clone(),
            attachments: self
                .attachments
                .iter()
                .map(|slot| match slot {
                    DraftAttachment::Existing(attachment) => {
                        SubmittedAttachment::Keep(attachment.clone())
                    }
                    DraftAttachment::Pending(file) => SubmittedAttachment::Upload {
                        kind: file.kind,
                        display_name: file.display_name.clone(),
                        source: file.source.clone(),
                    },
                })
                .collect(),
        })
    }

    /// Ends the session after a successful submit.
    pub fn complete_submit(mut self) {
        self.release_all("submit");
    }

    /// Ends the session without submitting.
    pub fn discard(mut self) {
        self.release_all("discard");
    }

    fn release_all(&mut self, reason: &'static str) {
        let previews = self
            .attachments
            .iter_mut()
            .filter_map(|slot| match slot {
                DraftAttachment::Pending(file) => file.preview.take(),
                DraftAttachment::Existing(_) => None,
            })
            .collect::<Vec<_>>();
        for preview in &previews {
            self.release(preview, reason);
        }
    }

    fn release(&mut self, preview: &PreviewRef, reason: &'static str) {
        self.releaser.release(preview);
        debug!("event=preview_release module=editor status=ok reason={reason}");
    }
}

impl<R: PreviewReleaser> Drop for ComposeSession<R> {
    fn drop(&mut self) {
        self.release_all("drop");
    }
}
