//! Plain text rendering of the visible table

use tabula::error::TableError;
use tabula::table::Table;

/// Renders the visible header and rows as tab-separated lines.
pub fn render(table: &Table) -> Result<Vec<String>, TableError> {
    let columns = table.get_visible_leaf_columns()?;
    let mut lines = vec![
        columns
            .iter()
            .map(|column| column.header().unwrap_or(column.id()).to_string())
            .collect::<Vec<_>>()
            .join("\t"),
    ];

    for row in table.get_rows()?.iter() {
        let cells = row.get_visible_cells()?;
        lines.push(
            cells
                .iter()
                .map(|cell| cell.render_cell().unwrap_or_default())
                .collect::<Vec<_>>()
                .join("\t"),
        );
    }

    Ok(lines)
}

/// One-line visibility report.
pub fn summary(table: &Table) -> String {
    let leaves = table.get_all_leaf_columns();
    let total = leaves.len();
    let hidden: Vec<_> = leaves
        .iter()
        .filter(|column| !column.get_is_visible())
        .map(|column| column.id().to_string())
        .collect();
    let visible = total - hidden.len();

    if hidden.is_empty() {
        format!("{visible} of {total} columns visible")
    } else {
        format!("{visible} of {total} columns visible (hidden: {})", hidden.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;

    fn table() -> Table {
        let doc: Document = serde_json::from_str(
            r#"{
                "columns": [
                    { "id": "name", "header": "Name" },
                    { "id": "age" },
                    { "id": "id", "enable_hiding": false }
                ],
                "rows": [
                    { "id": "r1", "values": { "name": "Ada", "age": 36, "id": 1 } },
                    { "id": "r2", "values": { "name": "Alan", "id": 2 } }
                ]
            }"#,
        )
        .unwrap();
        Table::new(doc.into_options()).unwrap()
    }

    #[test]
    fn test_render_all_visible() {
        let table = table();
        assert_eq!(render(&table).unwrap(), ["Name\tage\tid", "Ada\t36\t1", "Alan\t\t2"]);
        assert_eq!(summary(&table), "3 of 3 columns visible");
    }

    #[test]
    fn test_render_after_hiding() {
        let table = table();
        table.toggle_all_columns_visible(Some(false)).unwrap();
        assert_eq!(render(&table).unwrap(), ["id", "1", "2"]);
        assert_eq!(summary(&table), "1 of 3 columns visible (hidden: name, age)");
    }
}
