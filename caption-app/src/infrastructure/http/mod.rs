mod browser_headers;
mod page_fetcher;

pub use browser_headers::{random_browser_headers, random_user_agent};
pub use page_fetcher::{domain_root, url_variations, FetchedPage, PageFetcher};
