mod content_extractor;
mod content_merge;
mod image_extractor;
mod page_discovery;
mod page_metadata;
mod site_content_extractor;

pub use content_extractor::{ContentExtractor, ExtractedContent, KeywordContentExtractor};
pub use content_merge::{merge_about_texts, merge_services};
pub use image_extractor::extract_images;
pub use page_discovery::{discover_candidate_pages, score_link};
pub use page_metadata::PageMetadata;
pub use site_content_extractor::SiteContentExtractor;
