use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("authentication failed: {0}")]
    Authentication(String),
    #[error("access token is missing")]
    MissingToken,
}
