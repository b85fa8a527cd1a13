use std::io;
use std::path::Path;

use csv::WriterBuilder;
use rust_xlsxwriter::{ColNum, RowNum, Workbook};

use crate::error::BatchError;
use crate::model::CombinedTable;

pub const SHEET_NAME: &str = "Sheet1";

const MAX_SHEET_ROWS: usize = 1_048_576;
const MAX_SHEET_COLUMNS: usize = 16_384;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Csv,
    Xlsx,
}

impl OutputFormat {
    /// Picks the format from the path's suffix. Matching is case-sensitive.
    ///
    /// # Errors
    ///
    /// Returns [`BatchError::InvalidOutputExtension`] for anything other
    /// than `.csv` or `.xlsx`.
    pub fn from_path(path: &Path) -> Result<Self, BatchError> {
        let name = path.to_string_lossy();
        if name.ends_with(".csv") {
            Ok(Self::Csv)
        } else if name.ends_with(".xlsx") {
            Ok(Self::Xlsx)
        } else {
            Err(BatchError::InvalidOutputExtension {
                path: path.to_path_buf(),
            })
        }
    }
}

fn write_records<W: std::io::Write>(
    writer: &mut csv::Writer<W>,
    combined: &CombinedTable,
) -> Result<(), BatchError> {
    writer.write_record(&combined.columns)?;
    for row in &combined.rows {
        writer.write_record(row.iter().map(|cell| cell.as_deref().unwrap_or_default()))?;
    }
    writer.flush()?;
    Ok(())
}

pub(crate) fn write_csv(path: &Path, combined: &CombinedTable) -> Result<(), BatchError> {
    let mut writer = WriterBuilder::new().from_path(path)?;
    write_records(&mut writer, combined)
}

/// Renders the combined table as CSV text, header first, no index column.
///
/// # Errors
///
/// Returns [`BatchError::Csv`] if serialization fails and [`BatchError::Io`]
/// if the rendered bytes are not UTF-8.
pub fn write_csv_to_string(combined: &CombinedTable) -> Result<String, BatchError> {
    let mut writer = WriterBuilder::new().from_writer(Vec::<u8>::new());
    write_records(&mut writer, combined)?;

    let bytes = writer
        .into_inner()
        .map_err(|error| BatchError::Io(error.into_error()))?;
    csv_text(bytes)
}

fn csv_text(bytes: Vec<u8>) -> Result<String, BatchError> {
    String::from_utf8(bytes)
        .map_err(|error| BatchError::Io(io::Error::new(io::ErrorKind::InvalidData, error)))
}

pub(crate) fn write_xlsx(path: &Path, combined: &CombinedTable) -> Result<(), BatchError> {
    let rows = combined.rows.len() + 1;
    let columns = combined.columns.len();
    if rows > MAX_SHEET_ROWS || columns > MAX_SHEET_COLUMNS {
        return Err(BatchError::SheetTooLarge { rows, columns });
    }

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    for (col, label) in (0..).zip(&combined.columns) {
        let col: ColNum = col;
        worksheet.write_string(0, col, label)?;
    }
    for (row_index, row) in (1..).zip(&combined.rows) {
        let row_index: RowNum = row_index;
        for (col, cell) in (0..).zip(row) {
            if let Some(value) = cell {
                worksheet.write_string(row_index, col, value)?;
            }
        }
    }

    workbook.save(path)?;
    Ok(())
}

/// Writes the combined table to `path` in the format named by its suffix.
///
/// # Errors
///
/// Fails on an unsupported suffix or any I/O, CSV or XLSX error.
pub fn write_combined(path: &Path, combined: &CombinedTable) -> Result<OutputFormat, BatchError> {
    let format = OutputFormat::from_path(path)?;
    match format {
        OutputFormat::Csv => write_csv(path, combined)?,
        OutputFormat::Xlsx => write_xlsx(path, combined)?,
    }
    Ok(format)
}
