//! Journal domain model.
//!
//! # Responsibility
//! - Define the entry snapshot shape the core reads from storage.
//! - Define the explicit attachment record that replaces the free-form
//!   attachment payload stored alongside an entry.
//!
//! # Invariants
//! - Every entry is identified by a stable `EntryId`.
//! - Durable remote attachment locations and local preview references are
//!   distinct variants and never compared with each other.

pub mod attachment;
pub mod entry;
