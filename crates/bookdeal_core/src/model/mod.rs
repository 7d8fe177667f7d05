//! Book/author/contract domain model.
//!
//! # Responsibility
//! - Define the two leaf entities and the contract join entity.
//! - Keep one process-wide, append-only registry per entity type.
//!
//! # Invariants
//! - Entity handles compare by identity, never by field value.
//! - book <-> author relationships are derived by scanning contracts.
//! - A failed construction never reaches a registry.

pub mod author;
pub mod book;
pub mod contract;
mod field;
pub mod value;
