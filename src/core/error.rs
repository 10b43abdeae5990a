//! Error types for the logger system

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// IO error with context
    #[error("IO error while {operation}: {message}")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// Level name missing from the level table
    #[error("Unknown log level: '{0}'")]
    UnknownLevel(String),

    /// File lock error
    #[error("Failed to acquire file lock on '{path}': {source}")]
    FileLockError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Writer error (generic)
    #[error("Writer error: {0}")]
    WriterError(String),

    /// Formatter error with format type
    #[error("Formatter error ({format_type}): {message}")]
    FormatterError {
        format_type: String,
        message: String,
    },
}

impl LoggerError {
    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        LoggerError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create an unknown level error
    pub fn unknown_level(level: impl Into<String>) -> Self {
        LoggerError::UnknownLevel(level.into())
    }

    /// Create a file lock error
    pub fn file_lock(path: impl Into<String>, source: std::io::Error) -> Self {
        LoggerError::FileLockError {
            path: path.into(),
            source,
        }
    }

    /// Create a formatter error
    pub fn formatter(format_type: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::FormatterError {
            format_type: format_type.into(),
            message: message.into(),
        }
    }

    /// Create a writer error (generic)
    pub fn writer<S: Into<String>>(msg: S) -> Self {
        LoggerError::WriterError(msg.into())
    }

    /// Whether this error came from the configuration layer
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            LoggerError::InvalidConfiguration { .. } | LoggerError::UnknownLevel(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = LoggerError::config("levels", "duplicate rank");
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));
        assert!(err.is_config());

        let io_err = std::io::Error::new(std::io::ErrorKind::WouldBlock, "lock held");
        let err = LoggerError::file_lock("/var/log/app.log", io_err);
        assert!(matches!(err, LoggerError::FileLockError { .. }));
        assert!(!err.is_config());
        assert!(err.to_string().contains("lock held"));

        let source = std::error::Error::source(&err).expect("lock error keeps its cause");
        assert_eq!(source.to_string(), "lock held");
    }

    #[test]
    fn test_error_display() {
        let err = LoggerError::unknown_level("verbose");
        assert_eq!(err.to_string(), "Unknown log level: 'verbose'");

        let err = LoggerError::config("types", "cyclic extension: a -> b -> a");
        assert_eq!(
            err.to_string(),
            "Invalid configuration for types: cyclic extension: a -> b -> a"
        );

        let err = LoggerError::formatter("JSON", "Invalid field type");
        assert_eq!(err.to_string(), "Formatter error (JSON): Invalid field type");
    }

    #[test]
    fn test_io_operation_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = LoggerError::io_operation("writing log file", "cannot write to file", io_err);

        assert!(matches!(err, LoggerError::IoOperation { .. }));
        assert!(err.to_string().contains("writing log file"));
        assert!(err.to_string().contains("cannot write to file"));
    }
}
