//! Typed errors for configuration and schema checks.
//!
//! File loading reports through `anyhow` with context chains; the two
//! failure families below are matched on by callers and tests, so they get
//! concrete types.

use thiserror::Error;

/// The loaded table does not have the shape the dashboard expects.
#[derive(Debug, Error, PartialEq)]
pub enum SchemaError {
    /// A declared column is absent from the table.
    #[error("Missing expected column: {0}")]
    MissingColumn(String),

    /// Two dimensions are declared over the same column.
    #[error("Column '{0}' is declared more than once")]
    DuplicateDimension(String),
}

/// Invalid environment configuration.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// A variable is set but empty.
    #[error("{0} is set but empty")]
    Empty(&'static str),

    /// A variable could not be parsed.
    #[error("Invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = SchemaError::MissingColumn("age".into());
        assert!(err.to_string().contains("age"));

        let err = ConfigError::Invalid {
            name: "PULSE_WINDOW_SIZE",
            value: "wide".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("PULSE_WINDOW_SIZE"));
        assert!(msg.contains("wide"));
    }
}
