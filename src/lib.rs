//! Batch-extract tables from a directory of PDFs into one CSV or XLSX file.
//!
//! The pipeline runs one file at a time: [`extract_tables`] pulls raw grids
//! out of a PDF, [`clean_table`] promotes each grid's first row to column
//! labels, and [`process_directory`] tags, combines and writes the result.

mod batch;
mod clean;
mod combine;
mod error;
mod extract;
mod model;
mod options;
mod output;
mod pdf_reader;
mod table_detect;
mod table_parse;

pub use batch::{collect_tables, list_pdf_files, process_directory, validate_request};
pub use clean::{clean_table, is_blank_row};
pub use combine::combine_tables;
pub use error::BatchError;
pub use extract::extract_tables;
pub use model::{
    BatchReport, Cell, CleanedTable, CombinedTable, RawTable, SOURCE_FILE_COLUMN, SkippedFile,
    TaggedTable,
};
pub use options::{BatchOptions, ExtractOptions, FailurePolicy, HeaderPolicy, PageSelection};
pub use output::{OutputFormat, SHEET_NAME, write_combined, write_csv_to_string};
