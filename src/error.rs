use core::fmt;

/// Result alias for `agglom`.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by the file-ingestion layer.
///
/// The clustering engine itself is total: lookups of unknown clusters
/// return `None` or a −∞ sentinel, duplicate edges overwrite, and
/// size-cap violations are skipped. Only reading tabular input can fail.
#[derive(Debug)]
pub enum Error {
    /// Underlying I/O failure.
    Io(std::io::Error),

    /// Malformed tab-delimited data.
    Tabular(csv::Error),

    /// A requested column was not present in the header.
    MissingColumn {
        /// Column name or 1-based position, as given.
        column: String,
    },

    /// A score field could not be parsed as a number.
    BadScore {
        /// The offending field text.
        value: String,
        /// 1-based record number (excluding the header).
        record: usize,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O error: {e}"),
            Error::Tabular(e) => write!(f, "tabular input error: {e}"),
            Error::MissingColumn { column } => {
                write!(f, "column '{column}' not found in header")
            }
            Error::BadScore { value, record } => {
                write!(f, "cannot parse score '{value}' in record {record}")
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Tabular(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<csv::Error> for Error {
    fn from(e: csv::Error) -> Self {
        Error::Tabular(e)
    }
}
