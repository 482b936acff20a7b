//! Error types for the ODBC probe.
//!
//! All failures are expressed as [`ProbeError`] via `thiserror`. Variants
//! carry enough context (source label, table name) for the log output to
//! identify which part of a run went wrong.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("Invalid settings: {message}")]
    Config { message: String },

    #[error("Connection failed for source '{label}': {message}")]
    Connection { label: String, message: String },

    #[error("Catalog read failed: {message}")]
    Catalog { message: String },

    #[error("Query failed for table '{table}': {message}")]
    Query { table: String, message: String },

    #[error("Driver error: {message}")]
    Odbc { message: String },

    #[error("{failed} of {total} data sources failed")]
    SourcesFailed { failed: usize, total: usize },
}

impl ProbeError {
    /// Create a settings error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a connection error tagged with the label of the source it
    /// belongs to.
    pub fn connection(label: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Connection {
            label: label.into(),
            message: message.into(),
        }
    }

    /// Create a table-catalog error.
    pub fn catalog(message: impl Into<String>) -> Self {
        Self::Catalog {
            message: message.into(),
        }
    }

    /// Create a query error tagged with the table it ran against.
    pub fn query(table: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Query {
            table: table.into(),
            message: message.into(),
        }
    }

    /// Create the end-of-run error summarizing failed sources.
    pub fn sources_failed(failed: usize, total: usize) -> Self {
        Self::SourcesFailed { failed, total }
    }
}

/// Convert raw ODBC driver errors where no richer context is available.
impl From<odbc_api::Error> for ProbeError {
    fn from(err: odbc_api::Error) -> Self {
        Self::Odbc {
            message: err.to_string(),
        }
    }
}

/// Result type alias for probe operations.
pub type ProbeResult<T> = Result<T, ProbeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ProbeError::connection("northwind", "login timeout");
        assert!(err.to_string().contains("northwind"));
        assert!(err.to_string().contains("login timeout"));
    }

    #[test]
    fn test_connection_error_carries_label_not_cause() {
        use std::error::Error;

        // The source label is plain display context; the variant must not
        // expose it (or anything else) as an underlying cause.
        let err = ProbeError::connection("northwind", "login timeout");
        assert_eq!(
            err.to_string(),
            "Connection failed for source 'northwind': login timeout"
        );
        assert!(err.source().is_none());
    }

    #[test]
    fn test_query_error_names_table() {
        let err = ProbeError::query("Orders", "table is locked");
        assert_eq!(
            err.to_string(),
            "Query failed for table 'Orders': table is locked"
        );
    }

    #[test]
    fn test_sources_failed_summary() {
        let err = ProbeError::sources_failed(2, 5);
        assert_eq!(err.to_string(), "2 of 5 data sources failed");
    }

    #[test]
    fn test_config_error_display() {
        let err = ProbeError::config("settings.json is not valid JSON");
        assert!(err.to_string().starts_with("Invalid settings:"));
    }
}
