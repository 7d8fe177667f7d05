//! JSON catalog import boundary.
//!
//! # Responsibility
//! - Read books, authors and contracts from an untyped JSON document.
//! - Route every field through the model's runtime type checks.
//!
//! # Invariants
//! - The whole document is validated before any entity is registered, so a
//!   failed import leaves every registry unchanged.
//! - Contract `author`/`book` fields are zero-based indexes into the same
//!   document's `authors`/`books` lists.

use crate::model::author::Author;
use crate::model::book::Book;
use crate::model::contract::Contract;
use crate::model::value::{expect_int, expect_map, expect_str, FieldValue, TypeValidationError};
use log::{info, warn};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

pub type ImportResult<T> = Result<T, ImportError>;

/// Position of one record inside the imported document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub section: &'static str,
    pub index: usize,
}

impl Display for Location {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[{}]", self.section, self.index)
    }
}

/// Catalog import failures.
#[derive(Debug)]
pub enum ImportError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Validation {
        location: Location,
        source: TypeValidationError,
    },
    UnknownReference {
        location: Location,
        field: &'static str,
        index: i64,
        len: usize,
    },
}

impl Display for ImportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "failed to read catalog: {err}"),
            Self::Json(err) => write!(f, "malformed catalog document: {err}"),
            Self::Validation { location, source } => write!(f, "{location}: {source}"),
            Self::UnknownReference {
                location,
                field,
                index,
                len,
            } => write!(
                f,
                "{location}: {field} index {index} is out of range for {len} entries"
            ),
        }
    }
}

impl Error for ImportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Json(err) => Some(err),
            Self::Validation { source, .. } => Some(source),
            Self::UnknownReference { .. } => None,
        }
    }
}

impl From<std::io::Error> for ImportError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for ImportError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

/// Entities registered by one successful import, in document order.
#[derive(Debug, Clone, Default)]
pub struct ImportedCatalog {
    pub books: Vec<Book>,
    pub authors: Vec<Author>,
    pub contracts: Vec<Contract>,
}

type Record = BTreeMap<String, FieldValue>;

// Records stay untyped so a malformed entry is reported with its location.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawCatalog {
    books: Vec<serde_json::Value>,
    authors: Vec<serde_json::Value>,
    contracts: Vec<serde_json::Value>,
}

struct PendingContract {
    author: usize,
    book: usize,
    date: String,
    royalties: i64,
}

struct PendingCatalog {
    titles: Vec<String>,
    names: Vec<String>,
    contracts: Vec<PendingContract>,
}

/// Imports a catalog from a JSON file.
pub fn import_file(path: impl AsRef<Path>) -> ImportResult<ImportedCatalog> {
    let text = std::fs::read_to_string(path.as_ref())?;
    import_str(&text)
}

/// Imports a catalog from JSON text.
pub fn import_str(json: &str) -> ImportResult<ImportedCatalog> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    import_value(value)
}

/// Imports a catalog from an already-parsed JSON value.
///
/// # Errors
/// - `Json` when the document shape is not an object of record lists.
/// - `Validation` for the first wrong-typed field.
/// - `UnknownReference` for an author/book index outside its list.
pub fn import_value(value: serde_json::Value) -> ImportResult<ImportedCatalog> {
    let raw: RawCatalog = serde_json::from_value(value)?;
    let pending = validate(raw).inspect_err(|err| {
        warn!("event=catalog_import module=import status=error reason={err}");
    })?;
    let catalog = register(pending);
    info!(
        "event=catalog_import module=import status=ok books={} authors={} contracts={}",
        catalog.books.len(),
        catalog.authors.len(),
        catalog.contracts.len()
    );
    Ok(catalog)
}

fn validate(raw: RawCatalog) -> ImportResult<PendingCatalog> {
    let titles = read_strings("books", "title", raw.books)?;
    let names = read_strings("authors", "name", raw.authors)?;

    let mut contracts = Vec::with_capacity(raw.contracts.len());
    for (index, raw_record) in raw.contracts.into_iter().enumerate() {
        let location = Location {
            section: "contracts",
            index,
        };
        let mut record = read_record(location, raw_record)?;
        let author = read_reference(location, "author", take(&mut record, "author"), names.len())?;
        let book = read_reference(location, "book", take(&mut record, "book"), titles.len())?;
        let date = expect_str("date", take(&mut record, "date"))
            .map_err(|source| ImportError::Validation { location, source })?;
        let royalties = expect_int("royalties", take(&mut record, "royalties"))
            .map_err(|source| ImportError::Validation { location, source })?;
        contracts.push(PendingContract {
            author,
            book,
            date,
            royalties,
        });
    }

    Ok(PendingCatalog {
        titles,
        names,
        contracts,
    })
}

fn register(pending: PendingCatalog) -> ImportedCatalog {
    let books: Vec<Book> = pending.titles.into_iter().map(Book::new).collect();
    let authors: Vec<Author> = pending.names.into_iter().map(Author::new).collect();
    let contracts = pending
        .contracts
        .into_iter()
        .map(|contract| {
            authors[contract.author].sign_contract(
                &books[contract.book],
                contract.date,
                contract.royalties,
            )
        })
        .collect();

    ImportedCatalog {
        books,
        authors,
        contracts,
    }
}

fn read_strings(
    section: &'static str,
    field: &'static str,
    records: Vec<serde_json::Value>,
) -> ImportResult<Vec<String>> {
    records
        .into_iter()
        .enumerate()
        .map(|(index, raw_record)| {
            let location = Location { section, index };
            let mut record = read_record(location, raw_record)?;
            expect_str(field, take(&mut record, field))
                .map_err(|source| ImportError::Validation { location, source })
        })
        .collect()
}

fn read_record(location: Location, value: serde_json::Value) -> ImportResult<Record> {
    expect_map("record", FieldValue::from(value))
        .map_err(|source| ImportError::Validation { location, source })
}

fn read_reference(
    location: Location,
    field: &'static str,
    value: FieldValue,
    len: usize,
) -> ImportResult<usize> {
    let index =
        expect_int(field, value).map_err(|source| ImportError::Validation { location, source })?;
    usize::try_from(index)
        .ok()
        .filter(|resolved| *resolved < len)
        .ok_or(ImportError::UnknownReference {
            location,
            field,
            index,
            len,
        })
}

fn take(record: &mut Record, field: &str) -> FieldValue {
    FieldValue::from(record.remove(field))
}
