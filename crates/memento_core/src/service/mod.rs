//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate entry source calls into view-level APIs.
//! - Keep hosts decoupled from storage details.

pub mod journal_service;
