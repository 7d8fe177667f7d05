//! Book entity.
//!
//! # Responsibility
//! - Hold a validated title behind a shared, identity-compared handle.
//! - Derive contract and author relationships from the contract registry.
//!
//! # Invariants
//! - Every constructed book is appended to the book registry exactly once.
//! - `authors()` is always projected from `contracts()`, never cached.

use crate::model::author::Author;
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

/// Diagnostic identifier of a book. Identity comparison does not use it.
pub type BookId = Uuid;

const TITLE: &str = "title";

static BOOKS: Lazy<Registry<Book>> = Lazy::new(Registry::new);

struct BookRecord {
    id: BookId,
    title: Field<String>,
}

/// Shared handle to one registered book.
///
/// Clones refer to the same book; `==` compares identity, not title.
#[derive(Clone)]
pub struct Book {
    record: Arc<BookRecord>,
}

impl Book {
    /// Creates and registers a book.
    pub fn new(title: impl Into<String>) -> Self {
        Self::register(title.into())
    }

    /// Creates and registers a book from an untyped title.
    ///
    /// # Errors
    /// - Returns `TypeValidationError` when `title` is not a string. The book
    ///   registry is left unchanged.
    pub fn try_new(title: impl Into<FieldValue>) -> Result<Self, TypeValidationError> {
        let title = expect_str(TITLE, title.into()).map_err(|err| rejected("book", err))?;
        Ok(Self::register(title))
    }

    fn register(title: String) -> Self {
        let book = Self {
            record: Arc::new(BookRecord {
                id: Uuid::new_v4(),
                title: Field::new(title),
            }),
        };
        let registered = BOOKS.push(book.clone());
        debug!(
            "event=book_registered module=model status=ok id={} registry_len={}",
            book.id(),
            registered
        );
        book
    }

    /// Returns every book created in this process, in creation order.
    pub fn all() -> Vec<Book> {
        BOOKS.snapshot()
    }

    pub fn id(&self) -> BookId {
        self.record.id
    }

    pub fn title(&self) -> String {
        self.record.title.get()
    }

    pub fn set_title(&self, title: impl Into<String>) {
        self.record.title.set(title.into());
    }

    /// Replaces the title from an untyped value.
    ///
    /// # Errors
    /// - Returns `TypeValidationError` when `value` is not a string; the
    ///   previous title stays in place.
    pub fn try_set_title(&self, value: impl Into<FieldValue>) -> Result<(), TypeValidationError> {
        let title = expect_str(TITLE, value.into()).map_err(|err| rejected("book", err))?;
        self.set_title(title);
        Ok(())
    }

    /// Returns whether both handles refer to the same book.
    pub fn is(&self, other: &Book) -> bool {
        Arc::ptr_eq(&self.record, &other.record)
    }

    /// Contracts referencing this book, in contract registry order.
    pub fn contracts(&self) -> Vec<Contract> {
        Contract::select(|contract| contract.book().is(self))
    }

    /// Authors of this book's contracts, one entry per contract.
    pub fn authors(&self) -> Vec<Author> {
        self.contracts().iter().map(Contract::author).collect()
    }
}

impl PartialEq for Book {
    fn eq(&self, other: &Self) -> bool {
        self.is(other)
    }
}

impl Eq for Book {}

impl Display for Book {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.record
            .title
            .with(|title| write!(f, "<Book title={title:?}>"))
    }
}

impl Debug for Book {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Book")
            .field("id", &self.record.id)
            .field("title", &self.title())
            .finish()
    }
}

#[derive(Serialize)]
struct BookView {
    id: BookId,
    title: String,
}

impl Serialize for Book {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        BookView {
            id: self.id(),
            title: self.title(),
        }
        .serialize(serializer)
    }
}
