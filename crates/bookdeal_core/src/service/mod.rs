//! Core use-case services.
//!
//! # Responsibility
//! - Shape registry queries into report-level answers for callers.
//! - Keep CLI/embedding layers decoupled from entity internals.

pub mod royalty_service;
