//! Error types
//!
//! The simulation itself has no error channel; these cover loading tuning
//! files and handling score-service requests.

/// Errors raised while loading or validating a [`crate::Tuning`] file
#[derive(thiserror::Error, Debug)]
pub enum TuningError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value outside the range the simulation can run with
    #[error("Invalid value for {field}: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Errors raised by the score service
///
/// Validation variants are user-facing (HTTP 400); `Storage` is an
/// infrastructure failure (HTTP 500) and is reported with a generic message.
#[derive(thiserror::Error, Debug)]
pub enum ScoreError {
    #[error("Invalid action")]
    UnknownAction,

    #[error("Method not allowed for this action")]
    MethodNotAllowed,

    #[error("Invalid request body: {0}")]
    MalformedBody(String),

    #[error("Missing required fields")]
    MissingFields,

    #[error("Initials must be exactly 3 uppercase letters (A-Z)")]
    InvalidInitials,

    #[error("Score must be greater than 0")]
    InvalidScore,

    #[error("Storage failure: {0}")]
    Storage(String),
}

impl ScoreError {
    /// HTTP status code for this error
    pub fn status(&self) -> u16 {
        match self {
            ScoreError::Storage(_) => 500,
            _ => 400,
        }
    }

    /// Message shown to the client; storage details stay in the server log
    pub fn public_message(&self) -> String {
        match self {
            ScoreError::Storage(_) => "Database error".to_string(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ScoreError::InvalidInitials.status(), 400);
        assert_eq!(ScoreError::MethodNotAllowed.status(), 400);
        assert_eq!(ScoreError::Storage("disk full".into()).status(), 500);
    }

    #[test]
    fn test_storage_message_is_generic() {
        let err = ScoreError::Storage("connection refused at 10.0.0.3".into());
        assert_eq!(err.public_message(), "Database error");
        assert!(ScoreError::InvalidScore.public_message().contains("greater than 0"));
    }
}
