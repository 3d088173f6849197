use thiserror::Error;

#[derive(Error, Debug)]
pub enum GymError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Authorization error: {0}")]
    Authorization(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(#[from] eyre::Report),

    #[error("Internal server error: {0}")]
    Internal(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl GymError {
    /// Message safe to show to API clients. Database and internal failures
    /// are reduced to a generic text so driver details never leak.
    pub fn public_message(&self) -> String {
        match self {
            GymError::NotFound(msg)
            | GymError::Validation(msg)
            | GymError::Authentication(msg)
            | GymError::Authorization(msg)
            | GymError::Conflict(msg) => msg.clone(),
            GymError::Database(_) | GymError::Internal(_) => "Internal server error".to_string(),
        }
    }
}

pub type GymResult<T> = Result<T, GymError>;
