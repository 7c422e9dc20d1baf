//! Calendar geometry and activity aggregation.
//!
//! # Responsibility
//! - Lay out Monday-first month grids with ISO week numbers.
//! - Build the rolling window used by the compact activity strip.
//! - Translate per-day entry counts into discrete intensity levels.
//!
//! # Invariants
//! - Every emitted week holds exactly 7 days, Monday first.
//! - Days after "today" in a rolling window are never queried for activity.

pub mod activity;
pub mod grid;
pub mod range;
