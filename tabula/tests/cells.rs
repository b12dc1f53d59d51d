//! Tests for cell materialization and lookup.

use std::rc::Rc;

use serde_json::{Value, json};
use tabula::prelude::*;

fn people_table() -> Table {
    Table::new(
        TableOptions::new()
            .with_columns(vec![
                ColumnDef::new("name").cell(|cx| format!("<{}>", cx.value.as_str().unwrap_or(""))),
                ColumnDef::new("age"),
            ])
            .with_data(vec![
                RowData::new("r1").with_value("name", "Ada").with_value("age", 30),
                RowData::new("r2").with_value("name", "Linus"),
            ]),
    )
    .unwrap()
}

// ============================================================================
// Cell identity
// ============================================================================

#[test]
fn test_scenario_single_row() {
    let table = Table::new(
        TableOptions::new()
            .with_columns(vec![ColumnDef::new("age")])
            .with_data(vec![RowData::new("r1").with_value("age", 30)]),
    )
    .unwrap();

    let cell = table.get_cell("r1", "age").unwrap();
    assert_eq!(cell.id(), "r1_age");
    assert_eq!(cell.value(), &json!(30));
}

#[test]
fn test_cell_id_is_row_and_column() {
    let table = people_table();
    for row in table.get_rows().unwrap().iter() {
        for column in table.get_all_leaf_columns().iter() {
            let cell = table.get_cell(row.id(), column.id()).unwrap();
            assert_eq!(cell.id(), format!("{}_{}", row.id(), column.id()));
            assert_eq!(cell.row_id(), row.id());
            assert_eq!(cell.column_id(), column.id());
        }
    }
}

#[test]
fn test_create_cell_uses_given_value() {
    let table = people_table();
    let row = table.get_row("r1").unwrap();
    let column = table.get_column("age").unwrap();

    let cell = table.create_cell(&row, &column, json!(99)).unwrap();
    assert_eq!(cell.id(), "r1_age");
    assert_eq!(cell.value(), &json!(99));
    assert!(cell.row().unwrap().ptr_eq(&row));
    assert!(cell.column().ptr_eq(&column));
}

#[test]
fn test_missing_value_is_null() {
    let table = people_table();
    assert_eq!(table.get_cell("r2", "age").unwrap().value(), &Value::Null);
}

// ============================================================================
// Memoization
// ============================================================================

#[test]
fn test_all_cells_are_memoized() {
    let table = people_table();
    let row = table.get_row("r1").unwrap();

    let first = row.get_all_cells().unwrap();
    let second = row.get_all_cells().unwrap();
    assert!(Rc::ptr_eq(&first, &second));
    assert_eq!(first.len(), 2);

    let by_id = row.get_all_cells_by_column_id().unwrap();
    assert!(by_id["name"].ptr_eq(&first[0]));
    assert!(Rc::ptr_eq(&by_id, &row.get_all_cells_by_column_id().unwrap()));
}

#[test]
fn test_get_cell_returns_materialized_cell() {
    let table = people_table();
    let a = table.get_cell("r1", "name").unwrap();
    let b = table.get_cell("r1", "name").unwrap();
    assert!(a.ptr_eq(&b));
}

#[test]
fn test_new_data_rebuilds_rows_and_cells() {
    let table = people_table();
    let before = table.get_cell("r1", "age").unwrap();

    table.set_data(vec![RowData::new("r1").with_value("age", 31)]);
    let after = table.get_cell("r1", "age").unwrap();

    assert_eq!(before.value(), &json!(30), "old cell keeps its snapshot");
    assert_eq!(after.value(), &json!(31));
    assert!(!before.ptr_eq(&after));
    assert!(table.get_row("r2").unwrap_err().is_not_found());
}

#[test]
fn test_row_model_memoized_on_data_identity() {
    let table = people_table();
    let first = table.get_rows().unwrap();
    let second = table.get_rows().unwrap();
    assert!(Rc::ptr_eq(&first, &second));

    table.set_data(table.data());
    assert!(Rc::ptr_eq(&first, &table.get_rows().unwrap()), "same snapshot, same rows");
}

// ============================================================================
// Rendering
// ============================================================================

#[test]
fn test_render_cell_uses_column_renderer() {
    let table = people_table();
    assert_eq!(
        table.get_cell("r1", "name").unwrap().render_cell().as_deref(),
        Some("<Ada>")
    );
}

#[test]
fn test_render_cell_without_renderer() {
    let table = people_table();
    assert_eq!(table.get_cell("r1", "age").unwrap().render_cell(), None);
}

#[test]
fn test_default_column_renderer() {
    let table = Table::new(
        TableOptions::new()
            .with_columns(vec![ColumnDef::new("age")])
            .with_data(vec![RowData::new("r1").with_value("age", 30)])
            .with_default_column(ColumnDefaults::new().with_cell(|cx| cx.value.to_string())),
    )
    .unwrap();

    assert_eq!(
        table.get_cell("r1", "age").unwrap().render_cell().as_deref(),
        Some("30")
    );
}

#[test]
fn test_renderer_sees_row_and_column() {
    let table = Table::new(
        TableOptions::new()
            .with_columns(vec![ColumnDef::new("age").cell(|cx| {
                let row = cx.row.as_ref().map(|row| row.id().to_string()).unwrap_or_default();
                format!("{}:{}:{}", row, cx.column.id(), cx.cell.id())
            })])
            .with_data(vec![RowData::new("r1").with_value("age", 30)]),
    )
    .unwrap();

    assert_eq!(
        table.get_cell("r1", "age").unwrap().render_cell().as_deref(),
        Some("r1:age:r1_age")
    );
}

// ============================================================================
// Lookup failures
// ============================================================================

#[test]
fn test_missing_row_is_not_found() {
    let table = people_table();
    let err = table.get_cell("missing-row", "any-col").unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn test_missing_column_in_row_is_not_found() {
    let table = people_table();
    let err = table.get_cell("r1", "nope").unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn test_present_pairs_do_not_fail() {
    let table = people_table();
    for row_id in ["r1", "r2"] {
        for column_id in ["name", "age"] {
            assert!(table.get_cell(row_id, column_id).is_ok());
        }
    }
}

// ============================================================================
// Cell props
// ============================================================================

#[test]
fn test_cell_props() {
    let table = people_table();
    let props = table.get_cell_props("r1", "age", None).unwrap();
    assert_eq!(props.to_json(), json!({ "key": "r1_age", "role": "gridcell" }));

    let cell = table.get_cell("r1", "age").unwrap();
    let merged = cell
        .get_cell_props(Some(PropBag::new().attr("class", "num").into()))
        .unwrap();
    assert_eq!(merged.get("class"), Some(&json!("num")));
    assert_eq!(merged.get("role"), Some(&json!("gridcell")));
}

#[test]
fn test_cell_props_for_missing_cell() {
    let table = people_table();
    assert!(table.get_cell_props("r9", "age", None).unwrap_err().is_not_found());
}
