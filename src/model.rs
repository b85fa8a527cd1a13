use serde::Serialize;

/// A table cell. `None` marks a cell that was never present in the source
/// grid, `Some("")` one that was present but blank.
pub type Cell = Option<String>;

pub const SOURCE_FILE_COLUMN: &str = "Source_File";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageText {
    pub page_number: u32,
    pub text: String,
}

/// Grid of text cells as detected on one page. Row 0 holds the header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTable {
    pub page: u32,
    pub rows: Vec<Vec<Cell>>,
}

impl RawTable {
    /// Builds a rectangular table, padding short rows with absent cells.
    #[must_use]
    pub fn from_rows(page: u32, rows: Vec<Vec<Cell>>) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, None);
                row
            })
            .collect();
        Self { page, rows }
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CleanedTable {
    pub page: u32,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl CleanedTable {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty() && self.rows.is_empty()
    }
}

/// A cleaned table stamped with the name of the file it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedTable {
    pub source_file: String,
    pub table: CleanedTable,
}

impl TaggedTable {
    /// Stamps every row with `source_file`. An existing `Source_File` column
    /// is overwritten in place rather than duplicated.
    #[must_use]
    pub fn new(source_file: impl Into<String>, mut table: CleanedTable) -> Self {
        let source_file = source_file.into();
        let existing = table
            .columns
            .iter()
            .enumerate()
            .filter(|(_, label)| label.as_str() == SOURCE_FILE_COLUMN)
            .map(|(index, _)| index)
            .collect::<Vec<_>>();

        if existing.is_empty() {
            table.columns.push(SOURCE_FILE_COLUMN.to_string());
            for row in &mut table.rows {
                row.push(Some(source_file.clone()));
            }
        } else {
            for row in &mut table.rows {
                for &index in &existing {
                    row[index] = Some(source_file.clone());
                }
            }
        }

        Self { source_file, table }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CombinedTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl CombinedTable {
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn column_index(&self, label: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == label)
    }
}

/// A file the batch gave up on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedFile {
    pub file: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct BatchReport {
    pub files_processed: usize,
    pub table_count: usize,
    pub row_count: usize,
    pub skipped: Vec<SkippedFile>,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{CleanedTable, RawTable, SOURCE_FILE_COLUMN, TaggedTable};

    fn cell(value: &str) -> Option<String> {
        Some(value.to_string())
    }

    #[test]
    fn pads_ragged_rows_with_absent_cells() {
        let table = RawTable::from_rows(1, vec![vec![cell("a"), cell("b")], vec![cell("c")]]);
        assert_eq!(table.width(), 2);
        assert_eq!(table.rows[1], vec![cell("c"), None]);
    }

    #[test]
    fn tagging_appends_source_file_column() {
        let table = CleanedTable {
            page: 1,
            columns: vec!["Name".to_string()],
            rows: vec![vec![cell("Ana")], vec![cell("Bo")]],
        };
        let tagged = TaggedTable::new("a.pdf", table);
        assert_eq!(tagged.table.columns, vec!["Name", SOURCE_FILE_COLUMN]);
        assert_eq!(tagged.table.rows[1], vec![cell("Bo"), cell("a.pdf")]);
    }

    #[test]
    fn tagging_overwrites_existing_source_file_column() {
        let table = CleanedTable {
            page: 1,
            columns: vec![SOURCE_FILE_COLUMN.to_string(), "Qty".to_string()],
            rows: vec![vec![cell("old.pdf"), cell("3")]],
        };
        let tagged = TaggedTable::new("new.pdf", table);
        assert_eq!(tagged.table.columns.len(), 2);
        assert_eq!(tagged.table.rows[0], vec![cell("new.pdf"), cell("3")]);
    }
}
