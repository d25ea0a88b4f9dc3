use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Insufficient data: need at least {required} points, got {got}")]
    InsufficientData { required: usize, got: usize },

    #[error("Feed error: {0}")]
    Feed(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<String> for DomainError {
    fn from(s: String) -> Self {
        DomainError::Parse(s)
    }
}

impl From<&str> for DomainError {
    fn from(s: &str) -> Self {
        DomainError::InvalidInput(s.to_string())
    }
}
