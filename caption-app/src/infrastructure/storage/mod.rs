mod caption_store;
mod json_file_store;
mod memory_store;

pub use caption_store::CaptionStore;
pub use json_file_store::JsonFileStore;
pub use memory_store::MemoryStore;
