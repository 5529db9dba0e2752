use serde::{Deserialize, Serialize};

/// Failure of a single page fetch, after whatever retrying the caller applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum FetchError {
    #[error("{url} answered HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("{url} blocked automated access")]
    Blocked { url: String },

    #[error("all {attempts} fetch strategies failed for {url}")]
    Exhausted { url: String, attempts: u32 },
}

impl FetchError {
    pub fn is_blocked(&self) -> bool {
        matches!(self, Self::Blocked { .. })
    }
}
