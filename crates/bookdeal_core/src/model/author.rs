//! Author entity.
//!
//! # Responsibility
//! - Hold a validated name behind a shared, identity-compared handle.
//! - Provide the contract signing shortcut and royalty totals.
//!
//! # Invariants
//! - Every constructed author is appended to the author registry exactly once.
//! - `books()` and `total_royalties()` are derived from `contracts()`.

use crate::model::book::Book;
use crate::model::contract::Contract;
use crate::model::field::Field;
use crate::model::value::{expect_str, rejected, FieldValue, TypeValidationError};
use crate::registry::Registry;
use log::debug;
use once_cell::sync::Lazy;
use serde::{Serialize, Serializer};
use std::fmt::{Debug, Display, Formatter};
use std::sync::Arc;
use uuid::Uuid;

/// Diagnostic identifier of an author.
pub type AuthorId = Uuid;

const NAME: &str = "name";

static AUTHORS: Lazy<Registry<Author>> = Lazy::new(Registry::new);

struct AuthorRecord {
    id: AuthorId,
    name: Field<String>,
}

/// Shared handle to one registered author.
///
/// Clones refer to the same author; `==` compares identity, not name.
#[derive(Clone)]
pub struct Author {
    record: Arc<AuthorRecord>,
}

impl Author {
    /// Creates and registers an author.
    pub fn new(name: impl Into<String>) -> Self {
        Self::register(name.into())
    }

    /// Creates and registers an author from an untyped name.
    ///
    /// # Errors
    /// - Returns `TypeValidationError` when `name` is not a string. The author
    ///   registry is left unchanged.
    pub fn try_new(name: impl Into<FieldValue>) -> Result<Self, TypeValidationError> {
        let name = expect_str(NAME, name.into()).map_err(|err| rejected("author", err))?;
        Ok(Self::register(name))
    }

    fn register(name: String) -> Self {
        let author = Self {
            record: Arc::new(AuthorRecord {
                id: Uuid::new_v4(),
                name: Field::new(name),
            }),
        };
        let registered = AUTHORS.push(author.clone());
        debug!(
            "event=author_registered module=model status=ok id={} registry_len={}",
            author.id(),
            registered
        );
        author
    }

    /// Returns every author created in this process, in creation order.
    pub fn all() -> Vec<Author> {
        AUTHORS.snapshot()
    }

    pub fn id(&self) -> AuthorId {
        self.record.id
    }

    pub fn name(&self) -> String {
        self.record.name.get()
    }

    pub fn set_name(&self, name: impl Into<String>) {
        self.record.name.set(name.into());
    }

    /// Replaces the name from an untyped value, keeping the old one on error.
    pub fn try_set_name(&self, value: impl Into<FieldValue>) -> Result<(), TypeValidationError> {
        let name = expect_str(NAME, value.into()).map_err(|err| rejected("author", err))?;
        self.set_name(name);
        Ok(())
    }

    /// Returns whether both handles refer to the same author.
    pub fn is(&self, other: &Author) -> bool {
        Arc::ptr_eq(&self.record, &other.record)
    }

    /// Contracts signed by this author, in contract registry order.
    pub fn contracts(&self) -> Vec<Contract> {
        Contract::select(|contract| contract.author().is(self))
    }

    /// Books of this author's contracts, one entry per contract.
    pub fn books(&self) -> Vec<Book> {
        self.contracts().iter().map(Contract::book).collect()
    }

    /// Signs a contract between this author and `book`.
    pub fn sign_contract(
        &self,
        book: &Book,
        date: impl Into<String>,
        royalties: i64,
    ) -> Contract {
        Contract::new(self, book, date, royalties)
    }

    /// Signs a contract from untyped arguments.
    ///
    /// # Errors
    /// - Propagates the `TypeValidationError` of [`Contract::try_new`]
    ///   unchanged; no contract is registered.
    pub fn try_sign_contract(
        &self,
        book: impl Into<FieldValue>,
        date: impl Into<FieldValue>,
        royalties: impl Into<FieldValue>,
    ) -> Result<Contract, TypeValidationError> {
        Contract::try_new(self, book, date, royalties)
    }

    /// Sum of royalty percentages over this author's contracts.
    pub fn total_royalties(&self) -> i64 {
        self.contracts().iter().map(Contract::royalties).sum()
    }
}

impl PartialEq for Author {
    fn eq(&self, other: &Self) -> bool {
        self.is(other)
    }
}

impl Eq for Author {}

impl Display for Author {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.record
            .name
            .with(|name| write!(f, "<Author name={name:?}>"))
    }
}

impl Debug for Author {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Author")
            .field("id", &self.record.id)
            .field("name", &self.name())
            .finish()
    }
}

#[derive(Serialize)]
struct AuthorView {
    id: AuthorId,
    name: String,
}

impl Serialize for Author {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        AuthorView {
            id: self.id(),
            name: self.name(),
        }
        .serialize(serializer)
    }
}
