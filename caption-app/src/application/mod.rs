mod analyze_website;
mod caption_tracker;

pub use analyze_website::{AnalyzeWebsite, WebsiteContext};
pub use caption_tracker::CaptionTracker;
