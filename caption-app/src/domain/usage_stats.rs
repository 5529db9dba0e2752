use serde::{Deserialize, Serialize};

pub const NO_BUSINESS: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageStats {
    pub total_used: usize,
    pub recent_used: usize,
    pub most_used_business: String,
    pub total_usage_count: u64,
    pub avg_usage_per_caption: f64,
}

impl Default for UsageStats {
    fn default() -> Self {
        Self {
            total_used: 0,
            recent_used: 0,
            most_used_business: NO_BUSINESS.to_string(),
            total_usage_count: 0,
            avg_usage_per_caption: 0.0,
        }
    }
}
