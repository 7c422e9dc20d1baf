//! Tag presentation helpers.
//!
//! # Responsibility
//! - Map free-form tag text onto a fixed color palette.
//!
//! # Invariants
//! - Mapping is a pure function over a constant table; no global state.

pub mod palette;
