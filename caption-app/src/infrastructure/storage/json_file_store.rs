use super::CaptionStore;
use crate::domain::CaptionMap;
use caption_errors::AppError;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// The whole history as one pretty-printed JSON object, rewritten on every save.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl CaptionStore for JsonFileStore {
    /// A missing file is an empty history. So is a corrupt one: the bad file is
    /// left in place and overwritten by the next save.
    fn load(&self) -> Result<CaptionMap, AppError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(CaptionMap::new()),
            Err(e) => {
                tracing::error!("Failed to read {}: {}", self.path.display(), e);
                return Err(AppError::Persistence(format!(
                    "reading {}: {}",
                    self.path.display(),
                    e
                )));
            }
        };

        if raw.trim().is_empty() {
            return Ok(CaptionMap::new());
        }

        match serde_json::from_str(&raw) {
            Ok(captions) => Ok(captions),
            Err(e) => {
                tracing::warn!(
                    "Caption history {} is corrupt, starting empty: {}",
                    self.path.display(),
                    e
                );
                Ok(CaptionMap::new())
            }
        }
    }

    fn save(&self, captions: &CaptionMap) -> Result<(), AppError> {
        let persistence = |action: &str, e: &dyn std::fmt::Display| {
            tracing::error!("Failed {} {}: {}", action, self.path.display(), e);
            AppError::Persistence(format!("{} {}: {}", action, self.path.display(), e))
        };

        let json = serde_json::to_string_pretty(captions)
            .map_err(|e| persistence("serializing", &e))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| persistence("creating directory for", &e))?;
        }

        let temp = self.temp_path();
        fs::write(&temp, json).map_err(|e| persistence("writing", &e))?;
        fs::rename(&temp, &self.path).map_err(|e| persistence("replacing", &e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UsedCaptionRecord;
    use chrono::{TimeZone, Utc};

    fn sample() -> CaptionMap {
        let used_at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let mut captions = CaptionMap::new();
        captions.insert(
            "abc".to_string(),
            UsedCaptionRecord::new("Hello world".to_string(), "Acme".to_string(), used_at),
        );
        captions
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("used_captions.json"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("nested").join("used_captions.json"));

        store.save(&sample()).unwrap();

        assert_eq!(store.load().unwrap(), sample());
        assert!(!store.temp_path().exists());
    }

    #[test]
    fn test_records_keep_first_use_order_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("used_captions.json"));
        let used_at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();

        let mut captions = CaptionMap::new();
        for (hash, text) in [("zz", "first"), ("aa", "second"), ("mm", "third")] {
            captions.insert(
                hash.to_string(),
                UsedCaptionRecord::new(text.to_string(), String::new(), used_at),
            );
        }
        store.save(&captions).unwrap();

        let keys: Vec<String> = store.load().unwrap().into_keys().collect();
        assert_eq!(keys, vec!["zz", "aa", "mm"]);
    }

    #[test]
    fn test_corrupt_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("used_captions.json");
        fs::write(&path, "{ not json").unwrap();

        let store = JsonFileStore::new(&path);
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_unwritable_location_is_a_persistence_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, "").unwrap();

        let store = JsonFileStore::new(blocker.join("used_captions.json"));
        let err = store.save(&sample()).unwrap_err();
        assert!(matches!(err, AppError::Persistence(_)));
    }
}
