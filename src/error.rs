use std::{io, path::PathBuf};

use thiserror::Error;

/// Fatal conditions that abort schema inference.
///
/// Every variant terminates the run; a partially scanned file never yields a
/// statement.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Wrong argument count or an unrecognised flag.
    #[error("invalid arguments: {0}")]
    Usage(String),

    /// The input file could not be opened or read.
    #[error("unable to open {path:?}")]
    InputOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A malformed row, an undecodable field, or a missing header.
    #[error("{0}")]
    Parse(String),
}

impl SchemaError {
    pub fn input_open(path: impl Into<PathBuf>, source: io::Error) -> Self {
        SchemaError::InputOpen {
            path: path.into(),
            source,
        }
    }

    pub fn field_count(row: u64, expected: usize, found: usize) -> Self {
        SchemaError::Parse(format!(
            "Row {row} has {found} field(s) but the header defines {expected}"
        ))
    }
}

impl From<csv::Error> for SchemaError {
    fn from(err: csv::Error) -> Self {
        if let csv::ErrorKind::UnequalLengths {
            pos,
            expected_len,
            len,
        } = err.kind()
        {
            let row = pos.as_ref().map(|p| p.line()).unwrap_or_default();
            return SchemaError::Parse(format!(
                "Line {row} has {len} field(s) but the header defines {expected_len}"
            ));
        }
        SchemaError::Parse(format!("Malformed input: {err}"))
    }
}

pub type Result<T> = std::result::Result<T, SchemaError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn input_open_leaves_os_message_to_source_chain() {
        let err = SchemaError::input_open(
            "orders.csv",
            io::Error::new(io::ErrorKind::NotFound, "no such file"),
        );
        assert_eq!(err.to_string(), "unable to open \"orders.csv\"");
        let source = err.source().expect("io error kept as source");
        assert_eq!(source.to_string(), "no such file");

        let chained = format!("{:#}", anyhow::Error::new(err));
        assert_eq!(chained.matches("no such file").count(), 1);
    }
}
