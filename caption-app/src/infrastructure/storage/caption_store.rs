use crate::domain::CaptionMap;
use caption_errors::AppError;

/// Whole-map load/save persistence for the used-caption history.
///
/// Implementations do not coordinate writers; callers that share a store
/// across threads serialize their read-modify-write cycles themselves.
pub trait CaptionStore: Send + Sync {
    fn load(&self) -> Result<CaptionMap, AppError>;

    fn save(&self, captions: &CaptionMap) -> Result<(), AppError>;
}
