mod business_info;
mod candidate_page;
mod site_analysis;
mod text;
mod usage_stats;
mod used_caption;

pub use business_info::BusinessInfo;
pub use candidate_page::CandidatePage;
pub use site_analysis::{SiteAnalysis, WebsiteImage};
pub use text::{calculate_similarity, caption_hash, collapse_whitespace, truncate_chars, word_set};
pub use usage_stats::{UsageStats, NO_BUSINESS};
pub use used_caption::{
    format_timestamp, parse_date, parse_timestamp, CaptionEntry, CaptionImport, CaptionMap,
    UsedCaptionRecord,
};
