use super::CaptionStore;
use crate::domain::CaptionMap;
use caption_errors::AppError;
use std::sync::Mutex;

#[derive(Default)]
pub struct MemoryStore {
    captions: Mutex<CaptionMap>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_captions(captions: CaptionMap) -> Self {
        Self {
            captions: Mutex::new(captions),
        }
    }
}

impl CaptionStore for MemoryStore {
    fn load(&self) -> Result<CaptionMap, AppError> {
        self.captions
            .lock()
            .map(|captions| captions.clone())
            .map_err(|_| AppError::Persistence("caption store lock poisoned".to_string()))
    }

    fn save(&self, captions: &CaptionMap) -> Result<(), AppError> {
        let mut stored = self
            .captions
            .lock()
            .map_err(|_| AppError::Persistence("caption store lock poisoned".to_string()))?;
        *stored = captions.clone();
        Ok(())
    }
}
