//! Entry content model.
//!
//! # Responsibility
//! - Split raw entry text into ordered typed segments.
//! - Own checklist marker syntax and completion bookkeeping.
//! - Derive plain-text previews for compact listings.
//!
//! # Invariants
//! - Parsing is total: any input yields a (possibly empty) segment list.
//! - Checklist identity is the 0-based position in the entry-wide
//!   flattened checklist.

pub mod checklist;
pub mod parser;
pub mod preview;
