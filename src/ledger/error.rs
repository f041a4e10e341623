//! Ledger error types

use std::fmt;

use super::records::RecordError;

/// Errors that can occur within the capitalization ledger
#[derive(Debug)]
#[non_exhaustive]
pub enum LedgerError {
    /// A raw OCF record could not be decoded
    Record(RecordError),

    /// The referenced stock class has never been consumed
    UnknownStockClass(String),

    /// Conversion ratios are only resolved starting from a preferred class
    NotPreferred {
        /// Id of the common stock class that was passed as a start node
        stock_class_id: String,
    },

    /// Converting a quantity into common stock overflowed
    ConversionOverflow {
        /// Id of the class being converted
        stock_class_id: String,
    },

    /// Error while serializing summary data
    SerializationError {
        /// Underlying error message
        message: String,
    },

    /// Error while deserializing summary data
    DeserializationError {
        /// Underlying error message
        message: String,
    },

    /// Summary integrity check failed
    ChecksumMismatch {
        /// Expected checksum value
        expected: String,
        /// Actual checksum value
        actual: String,
    },

    /// The summary package was written with an unsupported format version
    UnsupportedVersion {
        /// Version found in the package
        found: u32,
        /// Version this build understands
        expected: u32,
    },
}

impl fmt::Display for LedgerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LedgerError::Record(err) => write!(f, "Record error: {err}"),
            LedgerError::UnknownStockClass(id) => write!(f, "Unknown stock class: {id}"),
            LedgerError::NotPreferred { stock_class_id } => {
                write!(
                    f,
                    "Stock class {stock_class_id} is not preferred; conversion ratios start from preferred classes"
                )
            }
            LedgerError::ConversionOverflow { stock_class_id } => {
                write!(f, "Conversion of stock class {stock_class_id} overflowed")
            }
            LedgerError::SerializationError { message } => {
                write!(f, "Serialization error: {message}")
            }
            LedgerError::DeserializationError { message } => {
                write!(f, "Deserialization error: {message}")
            }
            LedgerError::ChecksumMismatch { expected, actual } => {
                write!(
                    f,
                    "Checksum mismatch: expected {expected}, but computed {actual}"
                )
            }
            LedgerError::UnsupportedVersion { found, expected } => {
                write!(
                    f,
                    "Unsupported summary version: {found} (expected {expected})"
                )
            }
        }
    }
}

impl std::error::Error for LedgerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LedgerError::Record(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RecordError> for LedgerError {
    fn from(err: RecordError) -> Self {
        LedgerError::Record(err)
    }
}
