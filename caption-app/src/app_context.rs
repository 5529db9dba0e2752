use crate::application::{AnalyzeWebsite, CaptionTracker};
use crate::config::AppConfig;
use crate::infrastructure::scraper::SiteContentExtractor;
use crate::infrastructure::storage::JsonFileStore;
use caption_errors::AppError;
use std::sync::Arc;

/// Services built once at startup and shared by reference with every caller.
#[derive(Clone)]
pub struct AppContext {
    pub analyze_website: Arc<AnalyzeWebsite>,
    pub caption_tracker: Arc<CaptionTracker>,
}

impl AppContext {
    pub fn new(config: AppConfig) -> Result<Self, AppError> {
        let extractor = SiteContentExtractor::new(config.fetch, config.extraction)?;
        let store = JsonFileStore::new(&config.store_path);

        tracing::info!(
            "Caption history at {} (similarity threshold {})",
            config.store_path.display(),
            config.similarity_threshold
        );

        Ok(Self {
            analyze_website: Arc::new(AnalyzeWebsite::new(extractor)),
            caption_tracker: Arc::new(CaptionTracker::with_threshold(
                Arc::new(store),
                config.similarity_threshold,
            )),
        })
    }

    pub fn from_env() -> Result<Self, AppError> {
        Self::new(AppConfig::from_env())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_uses_configured_store_and_threshold() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            store_path: dir.path().join("history.json"),
            similarity_threshold: 0.5,
            ..AppConfig::default()
        };

        let context = AppContext::new(config).unwrap();
        assert_eq!(context.caption_tracker.similarity_threshold(), 0.5);

        context.caption_tracker.mark_as_used("hello there", "Acme").unwrap();
        assert!(dir.path().join("history.json").exists());
    }
}
