//! Entry editing.
//!
//! # Responsibility
//! - Provide pure line-oriented text transforms for the compose box.
//! - Track one draft's tags, pin state and attachments, including the
//!   lifetime of locally generated previews.
//!
//! # Invariants
//! - Transforms are `(text, selection) -> (text, caret)` functions with no
//!   hidden state.
//! - A local preview is released exactly once; persisted attachments are
//!   never released locally.

pub mod session;
pub mod transform;
