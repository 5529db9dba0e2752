pub mod http;
pub mod scraper;
pub mod security;
pub mod storage;
