use thiserror::Error;

/// Top-level error type for the rl-core crate and dependents.
#[derive(Debug, Error)]
pub enum RlError {
    /// A mandatory linguistic resource (lexicon, stopword list, ...) could not
    /// be loaded at startup.
    #[error("resource unavailable: {name}: {reason}")]
    ResourceUnavailable { name: String, reason: String },

    #[error("corpus not found: {0}")]
    CorpusMissing(String),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl RlError {
    /// Shorthand for a [`RlError::ResourceUnavailable`] with a displayable cause.
    pub fn resource(name: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        RlError::ResourceUnavailable {
            name: name.into(),
            reason: reason.to_string(),
        }
    }
}

/// Convenience Result alias used across the workspace.
pub type Result<T> = std::result::Result<T, RlError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_error_names_the_resource() {
        let err = RlError::resource("stopwords", "file missing");
        assert_eq!(
            err.to_string(),
            "resource unavailable: stopwords: file missing"
        );
    }

    #[test]
    fn io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: RlError = io.into();
        assert!(matches!(err, RlError::Io(_)));
    }
}
