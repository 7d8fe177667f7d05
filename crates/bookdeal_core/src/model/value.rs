//! Dynamically-typed field values and the field type checks.
//!
//! # Responsibility
//! - Represent heterogeneous input arriving from outside the type system
//!   (JSON documents, scripting bridges) as `FieldValue`.
//! - Apply the one validation rule per field kind and report
//!   `TypeValidationError` on mismatch.
//!
//! # Invariants
//! - Checks never coerce: `bool` is not an int, `float` is not an int.
//! - A failed check is reported before any entity state is touched.

use crate::model::author::Author;
use crate::model::book::Book;
use crate::model::contract::Contract;
use log::warn;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub(crate) const EXPECTED_STRING: &str = "a string";
pub(crate) const EXPECTED_INT: &str = "an int";
pub(crate) const EXPECTED_BOOK: &str = "a Book instance";
pub(crate) const EXPECTED_AUTHOR: &str = "an Author instance";
pub(crate) const EXPECTED_OBJECT: &str = "an object";

/// Raised when a field assignment receives a value of the wrong type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeValidationError {
    /// Name of the rejected field, e.g. `royalties`.
    pub field: &'static str,
    /// Human description of the accepted type, e.g. `an int`.
    pub expected: &'static str,
    /// Type name of the offending value, see [`FieldValue::type_name`].
    pub actual: &'static str,
}

impl Display for TypeValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} must be {}, got {}",
            self.field, self.expected, self.actual
        )
    }
}

impl Error for TypeValidationError {}

/// A value of any type that may be offered to an entity field.
#[derive(Debug, Clone)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<FieldValue>),
    Map(BTreeMap<String, FieldValue>),
    Book(Book),
    Author(Author),
    Contract(Contract),
}

impl FieldValue {
    /// Stable type name reported in validation errors.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Str(_) => "str",
            Self::List(_) => "list",
            Self::Map(_) => "map",
            Self::Book(_) => "Book",
            Self::Author(_) => "Author",
            Self::Contract(_) => "Contract",
        }
    }
}

impl From<serde_json::Value> for FieldValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Null => Self::Null,
            Value::Bool(flag) => Self::Bool(flag),
            Value::Number(number) => match number.as_i64() {
                Some(int) => Self::Int(int),
                None => number.as_f64().map_or(Self::Null, Self::Float),
            },
            Value::String(text) => Self::Str(text),
            Value::Array(items) => Self::List(items.into_iter().map(Self::from).collect()),
            Value::Object(entries) => Self::Map(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, Self::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl From<Book> for FieldValue {
    fn from(value: Book) -> Self {
        Self::Book(value)
    }
}

impl From<&Book> for FieldValue {
    fn from(value: &Book) -> Self {
        Self::Book(value.clone())
    }
}

impl From<Author> for FieldValue {
    fn from(value: Author) -> Self {
        Self::Author(value)
    }
}

impl From<&Author> for FieldValue {
    fn from(value: &Author) -> Self {
        Self::Author(value.clone())
    }
}

impl From<Contract> for FieldValue {
    fn from(value: Contract) -> Self {
        Self::Contract(value)
    }
}

impl From<&Contract> for FieldValue {
    fn from(value: &Contract) -> Self {
        Self::Contract(value.clone())
    }
}

pub(crate) type CheckResult<T> = Result<T, TypeValidationError>;

pub(crate) fn expect_str(field: &'static str, value: FieldValue) -> CheckResult<String> {
    match value {
        FieldValue::Str(text) => Ok(text),
        other => Err(mismatch(field, EXPECTED_STRING, &other)),
    }
}

pub(crate) fn expect_int(field: &'static str, value: FieldValue) -> CheckResult<i64> {
    match value {
        FieldValue::Int(int) => Ok(int),
        other => Err(mismatch(field, EXPECTED_INT, &other)),
    }
}

pub(crate) fn expect_book(field: &'static str, value: FieldValue) -> CheckResult<Book> {
    match value {
        FieldValue::Book(book) => Ok(book),
        other => Err(mismatch(field, EXPECTED_BOOK, &other)),
    }
}

pub(crate) fn expect_author(field: &'static str, value: FieldValue) -> CheckResult<Author> {
    match value {
        FieldValue::Author(author) => Ok(author),
        other => Err(mismatch(field, EXPECTED_AUTHOR, &other)),
    }
}

pub(crate) fn expect_map(
    field: &'static str,
    value: FieldValue,
) -> CheckResult<BTreeMap<String, FieldValue>> {
    match value {
        FieldValue::Map(entries) => Ok(entries),
        other => Err(mismatch(field, EXPECTED_OBJECT, &other)),
    }
}

fn mismatch(
    field: &'static str,
    expected: &'static str,
    value: &FieldValue,
) -> TypeValidationError {
    TypeValidationError {
        field,
        expected,
        actual: value.type_name(),
    }
}

/// Logs a rejected assignment and hands the error back for propagation.
pub(crate) fn rejected(entity: &'static str, err: TypeValidationError) -> TypeValidationError {
    warn!(
        "event=field_rejected module=model status=error entity={} field={} actual={}",
        entity, err.field, err.actual
    );
    err
}
