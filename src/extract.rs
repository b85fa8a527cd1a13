use std::path::Path;

use crate::error::BatchError;
use crate::model::RawTable;
use crate::options::ExtractOptions;
use crate::pdf_reader::read_pdf_pages;
use crate::table_detect::detect_tables;

/// Extracts every table found in the PDF at `path`, in page order and then
/// in top-to-bottom order within a page.
///
/// # Errors
///
/// Returns [`BatchError::UnreadableDocument`] when `path` is not a readable
/// PDF, and [`BatchError::InvalidOption`] when `options.min_cols` is below 2.
pub fn extract_tables(path: &Path, options: &ExtractOptions) -> Result<Vec<RawTable>, BatchError> {
    if options.min_cols < 2 {
        return Err(BatchError::InvalidOption(
            "min_cols must be at least 2".to_string(),
        ));
    }

    let pages = read_pdf_pages(path, options.pages.as_ref())?;
    let tables = detect_tables(&pages, options.min_cols)
        .into_iter()
        .filter(|table| !table.rows.is_empty())
        .collect();
    Ok(tables)
}
