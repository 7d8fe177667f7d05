use bookdeal_core::{Author, Book, Contract, FieldValue, TypeValidationError};
use std::sync::{Mutex, MutexGuard, PoisonError};

static REGISTRY_GUARD: Mutex<()> = Mutex::new(());

fn serial() -> MutexGuard<'static, ()> {
    REGISTRY_GUARD.lock().unwrap_or_else(PoisonError::into_inner)
}

fn expect_rejected(
    author: impl Into<FieldValue>,
    book: impl Into<FieldValue>,
    date: impl Into<FieldValue>,
    royalties: impl Into<FieldValue>,
) -> TypeValidationError {
    let before = Contract::all();
    let err = Contract::try_new(author, book, date, royalties)
        .expect_err("construction with a wrong-typed field must fail");
    assert_eq!(Contract::all(), before, "failed construction must not register");
    err
}

#[test]
fn dune_scenario() {
    let _guard = serial();
    let dune = Book::new("Dune");
    let herbert = Author::new("F. Herbert");

    herbert.sign_contract(&dune, "1965-08-01", 15);

    assert_eq!(dune.authors(), vec![herbert.clone()]);
    assert_eq!(herbert.books(), vec![dune.clone()]);
    assert_eq!(herbert.total_royalties(), 15);
    assert_eq!(Contract::contracts_by_date("1965-08-01").len(), 1);
}

#[test]
fn sign_contract_round_trip() {
    let _guard = serial();
    let book = Book::new("The Left Hand of Darkness");
    let author = Author::new("Ursula K. Le Guin");

    let contract = author.sign_contract(&book, "2024-01-01", 10);

    assert!(book.authors().contains(&author));
    assert!(author.books().contains(&book));
    assert_eq!(Contract::contracts_by_date("2024-01-01").last(), Some(&contract));
    assert_eq!(Contract::all().last(), Some(&contract));
    assert!(contract.author().is(&author));
    assert!(contract.book().is(&book));
    assert_eq!(contract.date(), "2024-01-01");
    assert_eq!(contract.royalties(), 10);
}

#[test]
fn untyped_construction_accepts_valid_fields() {
    let _guard = serial();
    let book = Book::new("Anathem");
    let author = Author::new("Neal Stephenson");
    let before = Contract::all().len();

    let contract = Contract::try_new(&author, &book, "2008-09-09", 12).unwrap();

    assert_eq!(Contract::all().len(), before + 1);
    assert_eq!(author.contracts(), vec![contract]);
}

#[test]
fn fields_are_checked_in_declaration_order() {
    let _guard = serial();
    let book = Book::new("Blindsight");
    let author = Author::new("Peter Watts");

    // Every field is wrong; the author check must win.
    let err = expect_rejected(&book, &author, 2006, "ten");
    assert_eq!(err.to_string(), "author must be an Author instance, got Book");

    let err = expect_rejected(&author, &author, 2006, "ten");
    assert_eq!(err.to_string(), "book must be a Book instance, got Author");

    let err = expect_rejected(&author, &book, 2006, "ten");
    assert_eq!(err.to_string(), "date must be a string, got int");

    let err = expect_rejected(&author, &book, "2006-10-03", "ten");
    assert_eq!(err.to_string(), "royalties must be an int, got str");
}

#[test]
fn royalties_reject_bool_and_float() {
    let _guard = serial();
    let book = Book::new("Accelerando");
    let author = Author::new("Charles Stross");

    let err = expect_rejected(&author, &book, "2005-07-05", true);
    assert_eq!(err.actual, "bool");

    let err = expect_rejected(&author, &book, "2005-07-05", 7.5);
    assert_eq!(err.actual, "float");

    assert!(author.contracts().is_empty());
}

#[test]
fn try_sign_contract_propagates_failure_unchanged() {
    let _guard = serial();
    let author = Author::new("Ted Chiang");
    let before = Contract::all();

    let err = author
        .try_sign_contract("Stories of Your Life", "2002-01-01", 10)
        .unwrap_err();

    assert_eq!(
        err,
        TypeValidationError {
            field: "book",
            expected: "a Book instance",
            actual: "str",
        }
    );
    assert_eq!(Contract::all(), before);
    assert_eq!(author.total_royalties(), 0);
}

#[test]
fn total_royalties_grows_by_each_new_contract() {
    let _guard = serial();
    let author = Author::new("Lois McMaster Bujold");
    let other = Author::new("Someone Else");
    let first = Book::new("Shards of Honor");
    let second = Book::new("Barrayar");

    author.sign_contract(&first, "1986-06-01", 6);
    other.sign_contract(&first, "1986-06-01", 50);
    let before = author.total_royalties();
    author.sign_contract(&second, "1991-10-01", 9);

    assert_eq!(before, 6);
    assert_eq!(author.total_royalties(), before + 9);
    let expected: i64 = Contract::all()
        .iter()
        .filter(|contract| contract.author().is(&author))
        .map(Contract::royalties)
        .sum();
    assert_eq!(author.total_royalties(), expected);
}

#[test]
fn contracts_by_date_is_registry_wide_and_exact() {
    let _guard = serial();
    let first = Author::new("First Signer");
    let second = Author::new("Second Signer");
    let book = Book::new("Shared Launch");

    let a = first.sign_contract(&book, "1999-12-31", 1);
    second.sign_contract(&book, "1999-12-31 ", 2);
    let c = second.sign_contract(&book, "1999-12-31", 3);

    assert_eq!(Contract::contracts_by_date("1999-12-31"), vec![a, c]);
    assert!(Contract::contracts_by_date("1999-12").is_empty());
}

#[test]
fn setters_move_contract_between_dates_and_authors() {
    let _guard = serial();
    let author = Author::new("Original Author");
    let replacement = Author::new("Replacement Author");
    let book = Book::new("Reassigned");
    let contract = author.sign_contract(&book, "2010-02-02", 4);

    contract.try_set_date("2010-03-03").unwrap();
    contract.try_set_author(&replacement).unwrap();
    contract.set_royalties(6);

    assert!(Contract::contracts_by_date("2010-02-02").is_empty());
    assert_eq!(Contract::contracts_by_date("2010-03-03"), vec![contract]);
    assert_eq!(author.total_royalties(), 0);
    assert_eq!(replacement.total_royalties(), 6);
    assert_eq!(book.authors(), vec![replacement]);
}

#[test]
fn failed_setter_keeps_relationships() {
    let _guard = serial();
    let author = Author::new("Steady Author");
    let book = Book::new("Steady Book");
    let contract = author.sign_contract(&book, "2012-12-12", 5);

    let err = contract.try_set_book(FieldValue::Null).unwrap_err();

    assert_eq!(err.to_string(), "book must be a Book instance, got null");
    assert_eq!(book.contracts(), vec![contract]);
}
