//! Error types for `dayflags`.

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T, E = DayFlagError> = std::result::Result<T, E>;

/// Errors raised by the store, addressing, and configuration layers.
#[derive(Debug, Error)]
pub enum DayFlagError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The address does not name a known namespace or item.
    #[error("Unknown URL {uri}")]
    InvalidArgument { uri: String },

    #[error("invalid resource address '{input}': {reason}")]
    InvalidUri { input: String, reason: String },

    /// A projection or filter named a column outside `id`, `date`, `state`.
    #[error("unknown column '{column}'")]
    UnknownColumn { column: String },

    #[error("invalid date '{input}': expected YYYY-MM-DD")]
    InvalidDate { input: String },

    #[error("configuration error: {0}")]
    Config(String),
}

impl DayFlagError {
    pub fn invalid_uri(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidUri {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Whether this error came from the embedded engine.
    #[must_use]
    pub const fn is_database(&self) -> bool {
        matches!(self, Self::Database(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_argument_message_names_the_address() {
        let err = DayFlagError::InvalidArgument {
            uri: "content://dayflags/vacation".to_string(),
        };
        assert_eq!(err.to_string(), "Unknown URL content://dayflags/vacation");
        assert!(!err.is_database());
    }

    #[test]
    fn rusqlite_errors_convert() {
        let err: DayFlagError = rusqlite::Error::InvalidQuery.into();
        assert!(err.is_database());
    }
}
