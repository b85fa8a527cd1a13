use std::collections::HashMap;
use std::path::Path;

use crate::error::BatchError;
use crate::model::{CombinedTable, TaggedTable};

/// Identity of a column across tables: its label plus how many earlier
/// columns in the same table carry that label.
type ColumnKey = (String, usize);

fn column_keys(columns: &[String]) -> Vec<ColumnKey> {
    let mut seen: HashMap<&str, usize> = HashMap::new();
    columns
        .iter()
        .map(|label| {
            let occurrence = seen.entry(label.as_str()).or_insert(0);
            let key = (label.clone(), *occurrence);
            *occurrence += 1;
            key
        })
        .collect()
}

/// Concatenates tagged tables row-wise.
///
/// Columns are the union of all tables' columns in first-seen order; a row
/// from a table lacking a column gets an absent cell there.
///
/// # Errors
///
/// Returns [`BatchError::NoDataExtracted`] when `tables` is empty.
pub fn combine_tables(
    tables: &[TaggedTable],
    directory: &Path,
) -> Result<CombinedTable, BatchError> {
    if tables.is_empty() {
        return Err(BatchError::NoDataExtracted {
            directory: directory.to_path_buf(),
        });
    }

    let mut keys: Vec<ColumnKey> = Vec::new();
    let mut positions: HashMap<ColumnKey, usize> = HashMap::new();
    let mut layouts = Vec::with_capacity(tables.len());

    for tagged in tables {
        let layout = column_keys(&tagged.table.columns)
            .into_iter()
            .map(|key| {
                *positions.entry(key.clone()).or_insert_with(|| {
                    keys.push(key);
                    keys.len() - 1
                })
            })
            .collect::<Vec<_>>();
        layouts.push(layout);
    }

    let width = keys.len();
    let mut rows = Vec::new();
    for (tagged, layout) in tables.iter().zip(&layouts) {
        for source_row in &tagged.table.rows {
            let mut row = vec![None; width];
            for (cell, &target) in source_row.iter().zip(layout) {
                row[target].clone_from(cell);
            }
            rows.push(row);
        }
    }

    Ok(CombinedTable {
        columns: keys.into_iter().map(|(label, _)| label).collect(),
        rows,
    })
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use pretty_assertions::assert_eq;

    use super::combine_tables;
    use crate::error::BatchError;
    use crate::model::{CleanedTable, SOURCE_FILE_COLUMN, TaggedTable};

    fn tagged(file: &str, columns: &[&str], rows: &[&[&str]]) -> TaggedTable {
        TaggedTable::new(
            file,
            CleanedTable {
                page: 1,
                columns: columns.iter().map(ToString::to_string).collect(),
                rows: rows
                    .iter()
                    .map(|row| row.iter().map(|cell| Some((*cell).to_string())).collect())
                    .collect(),
            },
        )
    }

    fn cell(value: &str) -> Option<String> {
        Some(value.to_string())
    }

    #[test]
    fn unions_columns_and_fills_missing_cells() {
        let tables = vec![
            tagged("a.pdf", &["Name", "Age"], &[&["Ana", "30"]]),
            tagged("b.pdf", &["Name", "City"], &[&["Bo", "Lima"], &["Cy", "Oslo"]]),
        ];
        let combined = combine_tables(&tables, Path::new("pdfs")).expect("combine should succeed");

        assert_eq!(combined.columns, vec!["Name", "Age", SOURCE_FILE_COLUMN, "City"]);
        assert_eq!(combined.row_count(), 3);
        assert_eq!(combined.rows[0], vec![cell("Ana"), cell("30"), cell("a.pdf"), None]);
        assert_eq!(combined.rows[2], vec![cell("Cy"), None, cell("b.pdf"), cell("Oslo")]);
    }

    #[test]
    fn every_row_has_a_source_file() {
        let tables = vec![
            tagged("a.pdf", &["X"], &[&["1"], &["2"]]),
            tagged("b.pdf", &["Y"], &[&["3"]]),
        ];
        let combined = combine_tables(&tables, Path::new("pdfs")).expect("combine should succeed");
        let source = combined
            .column_index(SOURCE_FILE_COLUMN)
            .expect("source column present");
        assert!(
            combined
                .rows
                .iter()
                .all(|row| row[source].as_deref().is_some_and(|name| !name.is_empty()))
        );
    }

    #[test]
    fn duplicate_labels_stay_positional() {
        let tables = vec![
            tagged("a.pdf", &["Qty", "Qty"], &[&["1", "2"]]),
            tagged("b.pdf", &["Qty"], &[&["3"]]),
        ];
        let combined = combine_tables(&tables, Path::new("pdfs")).expect("combine should succeed");
        assert_eq!(combined.columns, vec!["Qty", "Qty", SOURCE_FILE_COLUMN]);
        assert_eq!(combined.rows[1], vec![cell("3"), None, cell("b.pdf")]);
    }

    #[test]
    fn empty_input_is_no_data() {
        let error = combine_tables(&[], Path::new("pdfs")).expect_err("should fail");
        assert!(matches!(error, BatchError::NoDataExtracted { .. }));
    }
}
