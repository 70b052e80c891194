//! Error handling for PawBox
//!
//! Provides the error types shared across the workspace:
//! - Unit errors (length parsing)
//! - I/O errors (writing generated drawings)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Length parsing error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum UnitsError {
    /// Input could not be read as a number
    #[error("Invalid number '{input}'")]
    InvalidNumber {
        /// The rejected input text.
        input: String,
    },

    /// Fraction was malformed (e.g. `1/2/3`)
    #[error("Invalid fraction '{input}'")]
    InvalidFraction {
        /// The rejected input text.
        input: String,
    },

    /// Fraction had a zero denominator
    #[error("Division by zero in '{input}'")]
    DivisionByZero {
        /// The rejected input text.
        input: String,
    },

    /// Unit suffix is not one of mm, cm, in
    #[error("Unknown length unit '{unit}'")]
    UnknownUnit {
        /// The unrecognised suffix.
        unit: String,
    },
}

/// Main error type for PawBox
#[derive(Error, Debug)]
pub enum Error {
    /// Units error
    #[error(transparent)]
    Units(#[from] UnitsError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Check if this is an I/O error
    pub fn is_io_error(&self) -> bool {
        matches!(self, Error::Io(_))
    }
}

/// Result type for PawBox operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_units_error_display() {
        let err = UnitsError::UnknownUnit {
            unit: "ft".to_string(),
        };
        assert_eq!(err.to_string(), "Unknown length unit 'ft'");

        let err = UnitsError::DivisionByZero {
            input: "1/0".to_string(),
        };
        assert_eq!(err.to_string(), "Division by zero in '1/0'");
    }

    #[test]
    fn test_error_conversion() {
        let err: Error = UnitsError::InvalidNumber {
            input: "abc".to_string(),
        }
        .into();
        assert!(matches!(err, Error::Units(_)));
        assert_eq!(err.to_string(), "Invalid number 'abc'");

        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: Error = io_err.into();
        assert!(err.is_io_error());
    }
}
