//! Core domain logic for the Memento journal.
//! This crate is the single source of truth for content, calendar and
//! editing invariants; hosts only render what it returns.

pub mod calendar;
pub mod config;
pub mod content;
pub mod editor;
pub mod feed;
pub mod logging;
pub mod model;
pub mod service;
pub mod source;
pub mod tags;

pub use calendar::activity::{classify, ActivityCounts, ActivityLevel, ActivityStrip};
pub use calendar::grid::{
    build_recent_window, CalendarDay, CalendarGridBuilder, CalendarMonth, CalendarWeek,
    RecentWindow, DEFAULT_RECENT_WEEKS, MAX_RECENT_WEEKS,
};
pub use calendar::range::DateRange;
pub use config::{check_recent_week_count, CoreSettings, SettingsError};
pub use content::parser::{parse, ContentSegment};
pub use editor::session::{ComposeSession, EntrySubmission, PreviewReleaser};
pub use editor::transform::{EditOutcome, EditState};
pub use feed::view::EntryView;
pub use feed::{EntryFilter, ReminderItem};
pub use logging::{init_from_settings, LogStart, LoggingError};
pub use model::attachment::{Attachment, AttachmentKind, AttachmentPayloadError, PreviewRef};
pub use model::entry::{Entry, EntryId, EntryRow};
pub use service::journal_service::{DayFeed, JournalService, MonthView};
pub use source::{EntrySource, SnapshotSource, SourceError, SourceResult};
pub use tags::palette::{color_class, color_index, TagColor};
