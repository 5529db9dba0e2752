use crate::FetchError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
pub enum AppError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Could not reach website: {0}")]
    FetchFailed(String),

    #[error("Could not read website content: {0}")]
    ParseFailed(String),

    #[error("Caption history storage failed: {0}")]
    Persistence(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl FromStr for AppError {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(rest) = s.strip_prefix("Invalid URL: ") {
            Ok(AppError::InvalidUrl(rest.to_string()))
        } else if let Some(rest) = s.strip_prefix("Could not reach website: ") {
            Ok(AppError::FetchFailed(rest.to_string()))
        } else if let Some(rest) = s.strip_prefix("Could not read website content: ") {
            Ok(AppError::ParseFailed(rest.to_string()))
        } else if let Some(rest) = s.strip_prefix("Caption history storage failed: ") {
            Ok(AppError::Persistence(rest.to_string()))
        } else if let Some(rest) = s.strip_prefix("Internal error: ") {
            Ok(AppError::Internal(rest.to_string()))
        } else {
            Ok(AppError::Internal(s.to_string()))
        }
    }
}

impl AppError {
    pub fn user_message(&self) -> &str {
        match self {
            Self::InvalidUrl(_) => "That URL doesn't look right. Check it and try again.",
            Self::FetchFailed(_) => {
                "The website blocked or refused automated access. Fill in the business details manually; captions will still be generated without website context."
            }
            Self::ParseFailed(_) => {
                "The website returned content we couldn't read. Fill in the business details manually."
            }
            Self::Persistence(_) => "Saving the caption history failed. Your change was not stored.",
            Self::Internal(_) => "Something went wrong. Try again later.",
        }
    }

    /// Fetch and parse failures mean "continue without website context".
    pub fn is_recoverable_extraction_failure(&self) -> bool {
        matches!(self, Self::FetchFailed(_) | Self::ParseFailed(_))
    }
}

impl From<FetchError> for AppError {
    fn from(err: FetchError) -> Self {
        AppError::FetchFailed(err.to_string())
    }
}
