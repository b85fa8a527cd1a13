use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BatchError {
    #[error("input directory does not exist or is not a directory: '{}'", path.display())]
    InvalidInputDirectory { path: PathBuf },

    #[error("output file must end with .xlsx or .csv: '{}'", path.display())]
    InvalidOutputExtension { path: PathBuf },

    #[error("failed to read PDF '{}': {reason}", path.display())]
    UnreadableDocument { path: PathBuf, reason: String },

    #[error("no tables were extracted from any PDF in '{}'", directory.display())]
    NoDataExtracted { directory: PathBuf },

    #[error("invalid page selection: {0}")]
    InvalidPageSelection(String),

    #[error("invalid option: {0}")]
    InvalidOption(String),

    #[error("combined table ({rows} rows x {columns} columns) does not fit in one worksheet")]
    SheetTooLarge { rows: usize, columns: usize },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("XLSX write error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
}

impl BatchError {
    /// Process exit code the `pdf2sheet` binary reports for this error.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::InvalidInputDirectory { .. } => 2,
            Self::InvalidOutputExtension { .. } => 3,
            Self::NoDataExtracted { .. } => 4,
            Self::UnreadableDocument { .. } => 5,
            Self::InvalidPageSelection(_) | Self::InvalidOption(_) => 64,
            Self::SheetTooLarge { .. } | Self::Io(_) | Self::Csv(_) | Self::Xlsx(_) => 1,
        }
    }

    pub(crate) fn unreadable(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::UnreadableDocument {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
