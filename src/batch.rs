use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::clean::clean_table;
use crate::combine::combine_tables;
use crate::error::BatchError;
use crate::extract::extract_tables;
use crate::model::{BatchReport, SkippedFile, TaggedTable};
use crate::options::{BatchOptions, FailurePolicy};
use crate::output::{OutputFormat, write_combined};

/// Checks the user's input before any file is read or written.
///
/// # Errors
///
/// Returns [`BatchError::InvalidInputDirectory`] when `input_dir` is not an
/// existing directory, then [`BatchError::InvalidOutputExtension`] when
/// `output` does not end in `.xlsx` or `.csv`.
pub fn validate_request(input_dir: &Path, output: &Path) -> Result<OutputFormat, BatchError> {
    if !input_dir.is_dir() {
        return Err(BatchError::InvalidInputDirectory {
            path: input_dir.to_path_buf(),
        });
    }
    OutputFormat::from_path(output)
}

/// Lists the `.pdf` files directly inside `dir`, sorted by file name.
///
/// The suffix match is case-sensitive and subdirectories are not entered.
///
/// # Errors
///
/// Returns [`BatchError::Io`] if the directory cannot be listed.
pub fn list_pdf_files(dir: &Path) -> Result<Vec<PathBuf>, BatchError> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let is_pdf = entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.ends_with(".pdf"));
        if is_pdf && entry.file_type()?.is_file() {
            files.push(entry.path());
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Extracts, cleans and tags the tables of every PDF in `input_dir`.
///
/// # Errors
///
/// Returns [`BatchError::UnreadableDocument`] under
/// [`FailurePolicy::Abort`]; under [`FailurePolicy::Skip`] such files are
/// logged and listed in the report instead.
pub fn collect_tables(
    input_dir: &Path,
    options: &BatchOptions,
) -> Result<(Vec<TaggedTable>, BatchReport), BatchError> {
    let mut tagged = Vec::new();
    let mut report = BatchReport::default();

    for path in list_pdf_files(input_dir)? {
        let file_name = file_name_of(&path);
        info!(file = %file_name, "Processing {file_name}...");

        let tables = match extract_tables(&path, &options.extract) {
            Ok(tables) => tables,
            Err(error @ BatchError::UnreadableDocument { .. })
                if options.on_error == FailurePolicy::Skip =>
            {
                warn!(file = %file_name, %error, "skipping unreadable PDF");
                report.skipped.push(SkippedFile {
                    file: file_name,
                    reason: error.to_string(),
                });
                continue;
            }
            Err(error) => return Err(error),
        };

        report.files_processed += 1;
        for table in tables {
            let cleaned = clean_table(table, options.header_policy);
            report.row_count += cleaned.rows.len();
            tagged.push(TaggedTable::new(file_name.clone(), cleaned));
        }
    }

    report.table_count = tagged.len();
    Ok((tagged, report))
}

/// Runs the whole batch: collect every table under `input_dir`, combine
/// them and write the result to `output`.
///
/// Nothing is written when no table was found.
///
/// # Errors
///
/// Propagates validation, extraction and write failures, and returns
/// [`BatchError::NoDataExtracted`] when no PDF yielded a table.
pub fn process_directory(
    input_dir: &Path,
    output: &Path,
    options: &BatchOptions,
) -> Result<BatchReport, BatchError> {
    validate_request(input_dir, output)?;

    let (tables, report) = collect_tables(input_dir, options)?;
    let combined = combine_tables(&tables, input_dir)?;
    let format = write_combined(output, &combined)?;

    info!(
        tables = report.table_count,
        rows = report.row_count,
        skipped = report.skipped.len(),
        ?format,
        output = %output.display(),
        "batch complete"
    );
    Ok(report)
}
