use std::io;
use std::path::PathBuf;

use thiserror::Error;

use super::model::Column;

/// Errors raised while loading or exporting an employee dataset.
#[derive(Debug, Error)]
pub enum DataError {
    /// The header lacks one or more required columns. Fatal for the session.
    #[error("missing required columns: {}", join_columns(.0))]
    MissingColumns(Vec<Column>),

    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
}

impl DataError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        DataError::Io {
            path: path.into(),
            source,
        }
    }
}

fn join_columns(columns: &[Column]) -> String {
    columns
        .iter()
        .map(|c| c.name())
        .collect::<Vec<_>>()
        .join(", ")
}

pub type Result<T> = std::result::Result<T, DataError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_columns_message_names_every_column() {
        let err = DataError::MissingColumns(vec![Column::Age, Column::Salary]);
        assert_eq!(err.to_string(), "missing required columns: age, salary");
    }
}
