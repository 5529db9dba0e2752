use serde::{Deserialize, Serialize};

/// A same-domain link from the homepage, scored for how likely it is to describe the business.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidatePage {
    pub url: String,
    pub score: u32,
}

impl CandidatePage {
    pub fn new(url: String, score: u32) -> Self {
        Self { url, score }
    }
}
