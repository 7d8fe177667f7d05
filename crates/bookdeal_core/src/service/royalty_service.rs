//! Royalty reporting service.
//!
//! # Responsibility
//! - Summarize authors and books into plain, serializable records.
//! - Provide stable read entry points for CLI and embedding callers.
//!
//! # Invariants
//! - Summaries are computed from live registry scans at call time.
//! - Service reads never register or mutate entities.

use crate::model::author::Author;
use crate::model::book::Book;
use crate::model::contract::Contract;
use serde::Serialize;

/// Royalty overview for one author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorSummary {
    pub name: String,
    /// Book titles in contract order; repeated for repeated contracts.
    pub books: Vec<String>,
    pub contract_count: usize,
    pub total_royalties: i64,
}

/// Contract overview for one book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookSummary {
    pub title: String,
    pub authors: Vec<String>,
    pub contract_count: usize,
}

/// Read-only use-case service over the entity registries.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoyaltyService;

impl RoyaltyService {
    pub fn new() -> Self {
        Self
    }

    /// Summarizes one author from a single contract scan.
    pub fn author_summary(&self, author: &Author) -> AuthorSummary {
        let contracts = author.contracts();
        AuthorSummary {
            name: author.name(),
            books: contracts
                .iter()
                .map(|contract| contract.book().title())
                .collect(),
            contract_count: contracts.len(),
            total_royalties: contracts.iter().map(Contract::royalties).sum(),
        }
    }

    pub fn book_summary(&self, book: &Book) -> BookSummary {
        let contracts = book.contracts();
        BookSummary {
            title: book.title(),
            authors: contracts
                .iter()
                .map(|contract| contract.author().name())
                .collect(),
            contract_count: contracts.len(),
        }
    }

    /// Summaries for `authors`, in the order given.
    pub fn report<'a>(
        &self,
        authors: impl IntoIterator<Item = &'a Author>,
    ) -> Vec<AuthorSummary> {
        authors
            .into_iter()
            .map(|author| self.author_summary(author))
            .collect()
    }

    /// Contracts signed on `date` across the whole registry.
    pub fn contracts_on(&self, date: &str) -> Vec<Contract> {
        Contract::contracts_by_date(date)
    }
}
