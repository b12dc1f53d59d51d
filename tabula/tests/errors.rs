//! Tests for error kinds and message verbosity.

use tabula::prelude::*;

fn table(verbosity: ErrorVerbosity) -> Table {
    Table::new(
        TableOptions::new()
            .with_columns(vec![ColumnDef::new("name")])
            .with_data(vec![RowData::new("r1").with_value("name", "Ada")])
            .with_error_verbosity(verbosity),
    )
    .unwrap()
}

// ============================================================================
// Verbose
// ============================================================================

#[test]
fn test_verbose_row_message() {
    let err = table(ErrorVerbosity::Verbose).get_row("r9").unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "[Table] could not find row with id r9");
}

#[test]
fn test_verbose_cell_message() {
    let err = table(ErrorVerbosity::Verbose).get_cell("r1", "age").unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.message(), "[Table] could not find cell age in row r1");
}

#[test]
fn test_verbose_column_message() {
    let err = table(ErrorVerbosity::Verbose).get_column("age").unwrap_err();
    assert!(err.is_invariant_violation());
    assert_eq!(err.message(), "[Table] could not find column with id age");
}

// ============================================================================
// Terse
// ============================================================================

#[test]
fn test_terse_keeps_error_kind() {
    let table = table(ErrorVerbosity::Terse);

    let err = table.get_row("r9").unwrap_err();
    assert_eq!(err, TableError::not_found("not found"));

    let err = table.get_cell("r1", "age").unwrap_err();
    assert_eq!(err, TableError::not_found("not found"));

    let err = table.toggle_column_visibility("age", None).unwrap_err();
    assert_eq!(err, TableError::invariant("invariant violation"));
}

#[test]
fn test_terse_construction_errors() {
    let err = Table::new(
        TableOptions::new()
            .with_columns(vec![ColumnDef::new("a"), ColumnDef::new("a")])
            .with_error_verbosity(ErrorVerbosity::Terse),
    )
    .unwrap_err();
    assert_eq!(err.message(), "invariant violation");
}

// ============================================================================
// Feature errors
// ============================================================================

#[test]
fn test_feature_error_display() {
    let err = TableError::feature("pinning", "unknown region");
    assert_eq!(err.to_string(), "feature `pinning` failed: unknown region");
    assert!(!err.is_not_found());
    assert!(!err.is_invariant_violation());
}

#[test]
fn test_default_verbosity_follows_build() {
    let expected = if cfg!(debug_assertions) {
        ErrorVerbosity::Verbose
    } else {
        ErrorVerbosity::Terse
    };
    assert_eq!(ErrorVerbosity::default(), expected);
    assert_eq!(TableOptions::new().error_verbosity, expected);
}

#[test]
fn test_terse_detached_entities() {
    let table = table(ErrorVerbosity::Terse);
    let row = table.get_row("r1").unwrap();
    let cell = table.get_cell("r1", "name").unwrap();
    drop(table);

    assert_eq!(row.table().unwrap_err(), TableError::invariant("invariant violation"));
    assert_eq!(
        cell.get_cell_props(None).unwrap_err(),
        TableError::invariant("invariant violation")
    );
}

#[test]
fn test_verbose_detached_row() {
    let table = table(ErrorVerbosity::Verbose);
    let row = table.get_row("r1").unwrap();
    drop(table);
    assert_eq!(row.table().unwrap_err().message(), "[Table] row r1 outlived its table");
}
