use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VidbriefError {
    #[error("{message}")]
    MissingApiKey { message: String },

    #[error("Please enter a valid API key")]
    InvalidApiKey,

    #[error("API error: {status}")]
    Network { status: u16 },

    #[error("{message}")]
    Remote { message: String },

    #[error("Preference store error at {path}: {reason}")]
    Store { path: PathBuf, reason: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),
}

impl VidbriefError {
    /// True for the errors a user fixes by configuring a credential.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            VidbriefError::MissingApiKey { .. } | VidbriefError::InvalidApiKey
        )
    }
}

pub type Result<T> = std::result::Result<T, VidbriefError>;
