// Custom error types for the application, built on thiserror.
use thiserror::Error;

pub mod response;
pub mod store;
pub mod auth;

// Re-export commonly used types
pub use store::{StoreError, StoreResult};
pub use auth::AuthError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication error: {0}")]
    Auth(String),

    // #[from] converts a StoreError into AppError::Store via the From trait.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("File error: {0}")]
    File(#[from] std::io::Error),
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            // Business failures carry the message the login form renders verbatim
            AuthError::InvalidPassword => AppError::Auth(err.to_string()),
            AuthError::Store(e) => AppError::Store(e),
        }
    }
}

// Custom result type
pub type AppResult<T> = Result<T, AppError>;
