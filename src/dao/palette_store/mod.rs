/// Process-local store.
pub mod memory;
/// MongoDB-backed store.
#[cfg(feature = "mongo-store")]
pub mod mongodb;

use crate::dao::models::{FeedbackEntity, NewFeedback, NewPalette, PaletteEntity};
use crate::dao::storage::StorageResult;
use futures::future::BoxFuture;

/// Abstraction over the persistence layer for palettes and the feedback corpus.
pub trait PaletteStore: Send + Sync {
    /// Store a palette and return it with its assigned id.
    fn create_palette(&self, palette: NewPalette) -> BoxFuture<'static, StorageResult<PaletteEntity>>;
    /// Look a palette up by id.
    fn find_palette(&self, id: u64) -> BoxFuture<'static, StorageResult<Option<PaletteEntity>>>;
    /// Bump the palette's like or dislike counter and append the feedback record.
    ///
    /// Resolves to `None` when the palette does not exist; nothing is written then.
    fn record_feedback(
        &self,
        feedback: NewFeedback,
    ) -> BoxFuture<'static, StorageResult<Option<FeedbackEntity>>>;
    /// Every feedback record, oldest first.
    fn list_feedback(&self) -> BoxFuture<'static, StorageResult<Vec<FeedbackEntity>>>;
    /// Palettes with at least one like, by ascending id.
    fn list_liked_palettes(&self) -> BoxFuture<'static, StorageResult<Vec<PaletteEntity>>>;
    /// Cheap round trip proving the backend answers.
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
    /// Re-establish the backend connection in place.
    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>>;
}
