//! Contract join entity.
//!
//! # Responsibility
//! - Associate one author with one book, carrying a date and royalties.
//! - Answer registry-wide date queries.
//!
//! # Invariants
//! - Untyped construction checks `author`, `book`, `date`, `royalties` in
//!   that order and stops at the first failure.
//! - A contract enters the registry only after every field is valid.
//! - Contracts do not own their author or book.

use crate::model::author::{Author, AuthorId};
use crate::model::book::{Book, BookId};
use crate::model::field::Field;
use crate::model::value::{
    expect_author, expect_book, expect_int, expect_str, rejected, CheckResult, FieldValue,
    TypeValidationError,
};
use crate::registry::Registry;
use log::debug;
use once_cell::sync::Lazy;
use serde::{Serialize, Serializer};
use std::fmt::{Debug, Display, Formatter};
use std::sync::Arc;
use uuid::Uuid;

/// Diagnostic identifier of a contract.
pub type ContractId = Uuid;

const AUTHOR: &str = "author";
const BOOK: &str = "book";
const DATE: &str = "date";
const ROYALTIES: &str = "royalties";

static CONTRACTS: Lazy<Registry<Contract>> = Lazy::new(Registry::new);

struct ContractRecord {
    id: ContractId,
    author: Field<Author>,
    book: Field<Book>,
    date: Field<String>,
    royalties: Field<i64>,
}

/// Shared handle to one registered contract.
#[derive(Clone)]
pub struct Contract {
    record: Arc<ContractRecord>,
}

impl Contract {
    /// Creates and registers a contract between `author` and `book`.
    pub fn new(author: &Author, book: &Book, date: impl Into<String>, royalties: i64) -> Self {
        Self::register(author.clone(), book.clone(), date.into(), royalties)
    }

    /// Creates and registers a contract from untyped arguments.
    ///
    /// # Errors
    /// - Returns the `TypeValidationError` of the first invalid field in the
    ///   order `author`, `book`, `date`, `royalties`. The contract registry is
    ///   left unchanged.
    pub fn try_new(
        author: impl Into<FieldValue>,
        book: impl Into<FieldValue>,
        date: impl Into<FieldValue>,
        royalties: impl Into<FieldValue>,
    ) -> Result<Self, TypeValidationError> {
        let (author, book, date, royalties) = check_fields(
            author.into(),
            book.into(),
            date.into(),
            royalties.into(),
        )
        .map_err(|err| rejected("contract", err))?;
        Ok(Self::register(author, book, date, royalties))
    }

    fn register(author: Author, book: Book, date: String, royalties: i64) -> Self {
        let contract = Self {
            record: Arc::new(ContractRecord {
                id: Uuid::new_v4(),
                author: Field::new(author),
                book: Field::new(book),
                date: Field::new(date),
                royalties: Field::new(royalties),
            }),
        };
        let registered = CONTRACTS.push(contract.clone());
        debug!(
            "event=contract_signed module=model status=ok id={} author_id={} book_id={} royalties={} registry_len={}",
            contract.id(),
            contract.author().id(),
            contract.book().id(),
            contract.royalties(),
            registered
        );
        contract
    }

    /// Returns every contract created in this process, in creation order.
    pub fn all() -> Vec<Contract> {
        CONTRACTS.snapshot()
    }

    /// Contracts whose date equals `date` exactly, across the whole registry.
    pub fn contracts_by_date(date: &str) -> Vec<Contract> {
        Self::select(|contract| contract.record.date.with(|value| value == date))
    }

    pub(crate) fn select(predicate: impl FnMut(&Contract) -> bool) -> Vec<Contract> {
        CONTRACTS.select(predicate)
    }

    pub fn id(&self) -> ContractId {
        self.record.id
    }

    pub fn author(&self) -> Author {
        self.record.author.get()
    }

    pub fn book(&self) -> Book {
        self.record.book.get()
    }

    pub fn date(&self) -> String {
        self.record.date.get()
    }

    pub fn royalties(&self) -> i64 {
        self.record.royalties.get()
    }

    pub fn set_author(&self, author: &Author) {
        self.record.author.set(author.clone());
    }

    pub fn set_book(&self, book: &Book) {
        self.record.book.set(book.clone());
    }

    pub fn set_date(&self, date: impl Into<String>) {
        self.record.date.set(date.into());
    }

    pub fn set_royalties(&self, royalties: i64) {
        self.record.royalties.set(royalties);
    }

    pub fn try_set_author(&self, value: impl Into<FieldValue>) -> Result<(), TypeValidationError> {
        let author =
            expect_author(AUTHOR, value.into()).map_err(|err| rejected("contract", err))?;
        self.record.author.set(author);
        Ok(())
    }

    pub fn try_set_book(&self, value: impl Into<FieldValue>) -> Result<(), TypeValidationError> {
        let book = expect_book(BOOK, value.into()).map_err(|err| rejected("contract", err))?;
        self.record.book.set(book);
        Ok(())
    }

    pub fn try_set_date(&self, value: impl Into<FieldValue>) -> Result<(), TypeValidationError> {
        let date = expect_str(DATE, value.into()).map_err(|err| rejected("contract", err))?;
        self.record.date.set(date);
        Ok(())
    }

    pub fn try_set_royalties(
        &self,
        value: impl Into<FieldValue>,
    ) -> Result<(), TypeValidationError> {
        let royalties =
            expect_int(ROYALTIES, value.into()).map_err(|err| rejected("contract", err))?;
        self.record.royalties.set(royalties);
        Ok(())
    }

    /// Returns whether both handles refer to the same contract.
    pub fn is(&self, other: &Contract) -> bool {
        Arc::ptr_eq(&self.record, &other.record)
    }
}

fn check_fields(
    author: FieldValue,
    book: FieldValue,
    date: FieldValue,
    royalties: FieldValue,
) -> CheckResult<(Author, Book, String, i64)> {
    Ok((
        expect_author(AUTHOR, author)?,
        expect_book(BOOK, book)?,
        expect_str(DATE, date)?,
        expect_int(ROYALTIES, royalties)?,
    ))
}

impl PartialEq for Contract {
    fn eq(&self, other: &Self) -> bool {
        self.is(other)
    }
}

impl Eq for Contract {}

impl Display for Contract {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "<Contract author={:?} book={:?} date={:?} royalties={}%>",
            self.author().name(),
            self.book().title(),
            self.date(),
            self.royalties()
        )
    }
}

impl Debug for Contract {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Contract")
            .field("id", &self.record.id)
            .field("author", &self.author().id())
            .field("book", &self.book().id())
            .field("date", &self.date())
            .field("royalties", &self.royalties())
            .finish()
    }
}

#[derive(Serialize)]
struct ContractView {
    id: ContractId,
    author_id: AuthorId,
    book_id: BookId,
    date: String,
    royalties: i64,
}

impl Serialize for Contract {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        ContractView {
            id: self.id(),
            author_id: self.author().id(),
            book_id: self.book().id(),
            date: self.date(),
            royalties: self.royalties(),
        }
        .serialize(serializer)
    }
}
