//! Process-local store used by default and by the service tests.

use std::{
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::SystemTime,
};

use dashmap::DashMap;
use futures::future::BoxFuture;
use tokio::sync::RwLock;

use crate::dao::{
    models::{FeedbackEntity, NewFeedback, NewPalette, PaletteEntity},
    palette_store::PaletteStore,
    storage::StorageResult,
};

/// In-memory [`PaletteStore`]; contents are lost on restart.
#[derive(Clone, Default)]
pub struct MemoryPaletteStore {
    inner: Arc<MemoryInner>,
}

#[derive(Default)]
struct MemoryInner {
    palettes: DashMap<u64, PaletteEntity>,
    last_palette_id: AtomicU64,
    // Also serialises counter updates so a vote and its record land together.
    feedback: RwLock<Vec<FeedbackEntity>>,
}

impl MemoryPaletteStore {
    /// Empty store; ids start at 1.
    pub fn new() -> Self {
        Self::default()
    }

    fn create_palette(&self, palette: NewPalette) -> PaletteEntity {
        let id = self.inner.last_palette_id.fetch_add(1, Ordering::Relaxed) + 1;
        let entity = PaletteEntity {
            id,
            colors: palette.slots(),
            source: palette.source,
            image_path: palette.image_path,
            likes: 0,
            dislikes: 0,
            created_at: SystemTime::now(),
        };
        self.inner.palettes.insert(id, entity.clone());
        entity
    }

    async fn record_feedback(&self, feedback: NewFeedback) -> Option<FeedbackEntity> {
        let mut records = self.inner.feedback.write().await;

        {
            let mut palette = self.inner.palettes.get_mut(&feedback.palette_id)?;
            if feedback.liked {
                palette.likes += 1;
            } else {
                palette.dislikes += 1;
            }
        }

        let entity = FeedbackEntity {
            id: records.len() as u64 + 1,
            palette_id: feedback.palette_id,
            liked: feedback.liked,
            features: feedback.features,
            created_at: SystemTime::now(),
        };
        records.push(entity.clone());
        Some(entity)
    }

    fn list_liked_palettes(&self) -> Vec<PaletteEntity> {
        let mut liked: Vec<PaletteEntity> = self
            .inner
            .palettes
            .iter()
            .filter(|entry| entry.likes > 0)
            .map(|entry| entry.value().clone())
            .collect();
        liked.sort_by_key(|palette| palette.id);
        liked
    }
}

impl PaletteStore for MemoryPaletteStore {
    fn create_palette(&self, palette: NewPalette) -> BoxFuture<'static, StorageResult<PaletteEntity>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.create_palette(palette)) })
    }

    fn find_palette(&self, id: u64) -> BoxFuture<'static, StorageResult<Option<PaletteEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            Ok(store
                .inner
                .palettes
                .get(&id)
                .map(|entry| entry.value().clone()))
        })
    }

    fn record_feedback(
        &self,
        feedback: NewFeedback,
    ) -> BoxFuture<'static, StorageResult<Option<FeedbackEntity>>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.record_feedback(feedback).await) })
    }

    fn list_feedback(&self) -> BoxFuture<'static, StorageResult<Vec<FeedbackEntity>>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.inner.feedback.read().await.clone()) })
    }

    fn list_liked_palettes(&self) -> BoxFuture<'static, StorageResult<Vec<PaletteEntity>>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.list_liked_palettes()) })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{dao::models::PaletteSource, engine::color::HexColor};

    fn new_palette(colors: &[&str]) -> NewPalette {
        NewPalette {
            colors: colors.iter().map(|c| HexColor::parse(c).unwrap()).collect(),
            source: PaletteSource::Random,
            image_path: None,
        }
    }

    fn vote(palette_id: u64, liked: bool) -> NewFeedback {
        NewFeedback {
            palette_id,
            liked,
            features: vec![0.0; 15],
        }
    }

    #[tokio::test]
    async fn ids_start_at_one_and_increase() {
        let store = MemoryPaletteStore::new();
        let first = PaletteStore::create_palette(&store, new_palette(&["#000000"]))
            .await
            .unwrap();
        let second = PaletteStore::create_palette(&store, new_palette(&["#FFFFFF"]))
            .await
            .unwrap();
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(first.colors().count(), 1);
    }

    #[tokio::test]
    async fn feedback_bumps_counter_and_appends_record() {
        let store = MemoryPaletteStore::new();
        let palette = PaletteStore::create_palette(&store, new_palette(&["#102030"]))
            .await
            .unwrap();

        let record = PaletteStore::record_feedback(&store, vote(palette.id, true))
            .await
            .unwrap()
            .unwrap();
        PaletteStore::record_feedback(&store, vote(palette.id, false))
            .await
            .unwrap()
            .unwrap();

        let stored = store.find_palette(palette.id).await.unwrap().unwrap();
        assert_eq!((stored.likes, stored.dislikes), (1, 1));
        assert_eq!(record.id, 1);
        assert_eq!(store.list_feedback().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn feedback_for_missing_palette_writes_nothing() {
        let store = MemoryPaletteStore::new();
        let outcome = PaletteStore::record_feedback(&store, vote(42, true))
            .await
            .unwrap();
        assert!(outcome.is_none());
        assert!(store.list_feedback().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn liked_palettes_are_sorted_and_filtered() {
        let store = MemoryPaletteStore::new();
        for color in ["#010101", "#020202", "#030303"] {
            PaletteStore::create_palette(&store, new_palette(&[color]))
                .await
                .unwrap();
        }
        for (id, liked) in [(3, true), (2, false), (1, true), (3, true)] {
            PaletteStore::record_feedback(&store, vote(id, liked))
                .await
                .unwrap();
        }

        let liked = PaletteStore::list_liked_palettes(&store).await.unwrap();
        let ids: Vec<u64> = liked.iter().map(|p| p.id).collect();
        assert_eq!(ids, [1, 3]);
        assert_eq!(liked[1].likes, 2);
    }
}
