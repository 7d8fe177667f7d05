use bookdeal_core::{Author, Book, FieldValue, TypeValidationError};
use serde_json::json;
use std::sync::{Mutex, MutexGuard, PoisonError};

// Registry length assertions need exclusive access to the process-wide registries.
static REGISTRY_GUARD: Mutex<()> = Mutex::new(());

fn serial() -> MutexGuard<'static, ()> {
    REGISTRY_GUARD.lock().unwrap_or_else(PoisonError::into_inner)
}

#[test]
fn new_book_is_registered_once_and_last() {
    let _guard = serial();
    let before = Book::all();

    let book = Book::new("Neuromancer");

    let after = Book::all();
    assert_eq!(book.title(), "Neuromancer");
    assert_eq!(after.len(), before.len() + 1);
    assert_eq!(after.last(), Some(&book));
    assert_eq!(after.iter().filter(|entry| entry.is(&book)).count(), 1);
    assert_eq!(&after[..before.len()], before.as_slice());
}

#[test]
fn non_string_title_is_rejected_without_registering() {
    let _guard = serial();
    let before = Book::all();

    for value in [
        FieldValue::Null,
        FieldValue::Bool(false),
        FieldValue::Int(1984),
        FieldValue::Float(3.5),
        FieldValue::from(json!(["a"])),
        FieldValue::from(json!({"title": "nested"})),
    ] {
        let actual = value.type_name();
        let err = Book::try_new(value).unwrap_err();
        assert_eq!(
            err,
            TypeValidationError {
                field: "title",
                expected: "a string",
                actual,
            }
        );
    }

    assert_eq!(Book::all(), before);
}

#[test]
fn untyped_string_title_registers_book() {
    let _guard = serial();
    let before = Book::all().len();

    let book = Book::try_new(json!("Hyperion")).unwrap();

    assert_eq!(book.title(), "Hyperion");
    assert_eq!(Book::all().len(), before + 1);
}

#[test]
fn non_string_name_is_rejected_without_registering() {
    let _guard = serial();
    let before = Author::all();
    let book = Book::new("Ubik");

    let err = Author::try_new(&book).unwrap_err();

    assert_eq!(err.to_string(), "name must be a string, got Book");
    assert_eq!(Author::all(), before);
}

#[test]
fn new_author_is_registered_last() {
    let _guard = serial();

    let author = Author::new("Philip K. Dick");

    assert_eq!(Author::all().last(), Some(&author));
}

#[test]
fn name_setter_validates_every_assignment() {
    let _guard = serial();
    let author = Author::new("Mary Shelley");

    author.try_set_name("Mary Wollstonecraft Shelley").unwrap();
    assert_eq!(author.name(), "Mary Wollstonecraft Shelley");

    let err = author.try_set_name(1818).unwrap_err();
    assert_eq!(err.field, "name");
    assert_eq!(err.actual, "int");
    assert_eq!(author.name(), "Mary Wollstonecraft Shelley");
}

#[test]
fn identity_not_value_decides_relationships() {
    let _guard = serial();
    let original = Book::new("Twins");
    let lookalike = Book::new("Twins");
    let author = Author::new("Same Name");

    author.sign_contract(&original, "2001-01-01", 5);

    assert_eq!(original.authors(), vec![author.clone()]);
    assert!(lookalike.authors().is_empty());
    assert!(lookalike.contracts().is_empty());
}

#[test]
fn read_queries_are_idempotent() {
    let _guard = serial();
    let book = Book::new("Foundation");
    let first = Author::new("Isaac Asimov");
    let second = Author::new("Robert Silverberg");
    first.sign_contract(&book, "1951-06-01", 10);
    second.sign_contract(&book, "1990-01-01", 4);

    let once = book.authors();
    let twice = book.authors();

    assert_eq!(once, twice);
    assert_eq!(once, vec![first, second]);
}

#[test]
fn authors_repeat_for_repeated_contracts() {
    let _guard = serial();
    let book = Book::new("Leviathan Wakes");
    let author = Author::new("James S. A. Corey");

    author.sign_contract(&book, "2011-06-02", 7);
    author.sign_contract(&book, "2019-12-13", 3);

    assert_eq!(book.authors(), vec![author.clone(), author]);
}

#[test]
fn entities_serialize_as_id_and_field() {
    let _guard = serial();
    let book = Book::new("Dhalgren");
    let author = Author::new("Samuel R. Delany");

    let book_json = serde_json::to_value(&book).unwrap();
    let author_json = serde_json::to_value(&author).unwrap();

    assert_eq!(book_json, json!({"id": book.id().to_string(), "title": "Dhalgren"}));
    assert_eq!(
        author_json,
        json!({"id": author.id().to_string(), "name": "Samuel R. Delany"})
    );
}
