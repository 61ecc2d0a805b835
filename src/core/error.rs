use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BenchError {
    /// Template substitution stage
    #[error("Template error: {0}")]
    Template(String),

    /// Argument binding stage: placeholder and argument counts disagree
    #[error("Binding error: expected {expected} arguments, got {actual}")]
    Binding { expected: usize, actual: usize },

    #[error("Binding error: no value for parameter ':{0}'")]
    UnknownParameter(String),

    #[error("Connection error: {0}")]
    Connection(#[source] sqlx::Error),

    #[error("Timeout connecting to db after {0:?}")]
    ConnectTimeout(Duration),

    #[error("Database error: {0}")]
    Database(#[source] sqlx::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl BenchError {
    pub fn template(message: impl Into<String>) -> Self {
        Self::Template(message.into())
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

pub type Result<T> = std::result::Result<T, BenchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_message_names_deadline() {
        let err = BenchError::ConnectTimeout(Duration::from_millis(1));
        assert_eq!(err.to_string(), "Timeout connecting to db after 1ms");
    }

    #[test]
    fn test_binding_message_names_counts() {
        let err = BenchError::Binding { expected: 120, actual: 119 };
        assert_eq!(
            err.to_string(),
            "Binding error: expected 120 arguments, got 119"
        );
    }
}
