use crate::domain::model::Engine;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Failed to connect to {engine}: {message}")]
    ConnectionError { engine: Engine, message: String },

    #[error("Query execution failed on {engine}: {message}")]
    QueryError { engine: Engine, message: String },

    #[error("Cannot convert row {row}: {reason}")]
    ConversionError { row: String, reason: String },

    #[error("Backend client error: {message}")]
    BackendError { message: String },

    #[error("Upsert into '{table}' rejected{}: {message}", http_status(.status))]
    UpsertError {
        table: String,
        status: Option<u16>,
        message: String,
    },

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Connection,
    Query,
    Data,
    Transport,
}

impl SyncError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            SyncError::ConfigError { .. }
            | SyncError::MissingConfigError { .. }
            | SyncError::InvalidConfigValueError { .. }
            | SyncError::IoError(_) => ErrorCategory::Configuration,
            SyncError::ConnectionError { .. } | SyncError::BackendError { .. } => {
                ErrorCategory::Connection
            }
            SyncError::QueryError { .. } => ErrorCategory::Query,
            SyncError::ConversionError { .. } => ErrorCategory::Data,
            SyncError::UpsertError { .. } | SyncError::ApiError(_) => ErrorCategory::Transport,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            SyncError::MissingConfigError { .. } => {
                "Set the missing environment variable or add it to the --config profile"
            }
            SyncError::ConfigError { .. } | SyncError::InvalidConfigValueError { .. } => {
                "Check the engine selection and credential values"
            }
            SyncError::IoError(_) => "Check that the profile file exists and is readable",
            SyncError::ConnectionError { .. } => {
                "Verify host, port, user and password, and that the database server is running"
            }
            SyncError::QueryError { .. } => {
                "Check that the 'vendas' and 'produtos' tables exist in the selected database"
            }
            SyncError::ConversionError { .. } => "Inspect the offending rows in the source database",
            SyncError::BackendError { .. } => "Check SUPABASE_URL and SUPABASE_KEY",
            SyncError::UpsertError { .. } => {
                "Check that the target table exists and has a unique constraint on the conflict column"
            }
            SyncError::ApiError(_) => "Check network connectivity to the backend",
        }
    }
}

fn http_status(status: &Option<u16>) -> String {
    status.map(|s| format!(" (HTTP {})", s)).unwrap_or_default()
}

pub type Result<T> = std::result::Result<T, SyncError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upsert_error_message_includes_status() {
        let err = SyncError::UpsertError {
            table: "sales_summary".to_string(),
            status: Some(409),
            message: "duplicate key".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Upsert into 'sales_summary' rejected (HTTP 409): duplicate key"
        );
        assert_eq!(err.category(), ErrorCategory::Transport);
    }

    #[test]
    fn test_connection_error_names_engine() {
        let err = SyncError::ConnectionError {
            engine: Engine::Firebird,
            message: "connection refused".to_string(),
        };
        assert_eq!(err.to_string(), "Failed to connect to Firebird: connection refused");
        assert_eq!(err.category(), ErrorCategory::Connection);
    }
}
