use tracing::debug;

use crate::model::{PageText, RawTable};
use crate::table_parse::{RowCells, table_row_cells};

/// Runs of at least this many consecutive row-like lines form a table.
const MIN_TABLE_ROWS: usize = 2;

/// Drops single-space rows at the top of a run whose width disagrees with
/// the first row that was split on real gaps. Those are titles with a number
/// in them, not headers.
fn trim_leading_soft_rows(rows: &mut Vec<RowCells>) {
    let Some(anchor) = rows.iter().find(|row| !row.soft).map(|row| row.cells.len()) else {
        return;
    };
    let leading = rows
        .iter()
        .take_while(|row| row.soft && row.cells.len() != anchor)
        .count();
    rows.drain(..leading);
}

fn detect_tables_in_page(page: &PageText, min_cols: usize) -> Vec<RawTable> {
    let mut tables = Vec::new();
    let mut current_rows: Vec<RowCells> = Vec::new();

    let flush_current = |rows: &mut Vec<RowCells>, tables: &mut Vec<RawTable>| {
        trim_leading_soft_rows(rows);
        if rows.len() >= MIN_TABLE_ROWS {
            let grid = std::mem::take(rows)
                .into_iter()
                .map(|row| row.cells.into_iter().map(Some).collect())
                .collect();
            tables.push(RawTable::from_rows(page.page_number, grid));
        } else {
            rows.clear();
        }
    };

    for line in page.text.lines() {
        match table_row_cells(line, min_cols) {
            Some(row) => current_rows.push(row),
            None => flush_current(&mut current_rows, &mut tables),
        }
    }
    flush_current(&mut current_rows, &mut tables);

    tables
}

/// Detects tables on every page, in page order then top-to-bottom order.
pub(crate) fn detect_tables(pages: &[PageText], min_cols: usize) -> Vec<RawTable> {
    let mut tables = Vec::new();
    for page in pages {
        let found = detect_tables_in_page(page, min_cols.max(2));
        for table in &found {
            debug!(
                page = table.page,
                rows = table.rows.len(),
                columns = table.width(),
                "detected table"
            );
        }
        tables.extend(found);
    }
    tables
}
