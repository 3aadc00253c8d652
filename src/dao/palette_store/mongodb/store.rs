use std::sync::Arc;

use futures::{TryStreamExt, future::BoxFuture};
use mongodb::{
    Client, Collection, Database,
    bson::{Document, doc},
    options::ReturnDocument,
};
use tokio::sync::RwLock;
use tracing::warn;

use super::{
    config::MongoConfig,
    connection::{
        COUNTER_COLLECTION, FEEDBACK_COLLECTION, PALETTE_COLLECTION, open_palette_database,
    },
    error::{MongoDaoError, MongoResult},
    models::{CounterDocument, MongoFeedbackDocument, MongoPaletteDocument, doc_id},
};
use crate::dao::{
    models::{FeedbackEntity, NewFeedback, NewPalette, PaletteEntity},
    palette_store::PaletteStore,
    storage::StorageResult,
};

/// [`PaletteStore`] backed by MongoDB, reconnectable in place.
#[derive(Clone)]
pub struct MongoPaletteStore {
    inner: Arc<MongoInner>,
}

struct MongoInner {
    state: RwLock<MongoState>,
    config: MongoConfig,
}

struct MongoState {
    #[allow(dead_code)]
    client: Client,
    database: Database,
}

impl MongoInner {
    async fn ping(&self) -> MongoResult<()> {
        let database = {
            let guard = self.state.read().await;
            guard.database.clone()
        };

        database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|source| MongoDaoError::HealthPing { source })?;
        Ok(())
    }

    async fn reconnect(&self) -> MongoResult<()> {
        let (client, database) = open_palette_database(&self.config).await?;
        let mut guard = self.state.write().await;
        guard.client = client;
        guard.database = database;
        Ok(())
    }
}

impl MongoPaletteStore {
    /// Open the palette database; fails once the ping retries are exhausted.
    pub async fn connect(config: MongoConfig) -> MongoResult<Self> {
        let (client, database) = open_palette_database(&config).await?;
        Ok(Self {
            inner: Arc::new(MongoInner {
                state: RwLock::new(MongoState { client, database }),
                config,
            }),
        })
    }

    async fn database(&self) -> Database {
        let guard = self.inner.state.read().await;
        guard.database.clone()
    }

    async fn palettes(&self) -> Collection<MongoPaletteDocument> {
        self.database()
            .await
            .collection::<MongoPaletteDocument>(PALETTE_COLLECTION)
    }

    async fn feedback(&self) -> Collection<MongoFeedbackDocument> {
        self.database()
            .await
            .collection::<MongoFeedbackDocument>(FEEDBACK_COLLECTION)
    }

    /// Atomically bump the named counter and return its new value.
    async fn next_id(&self, counter: &'static str) -> MongoResult<i64> {
        let counters = self
            .database()
            .await
            .collection::<CounterDocument>(COUNTER_COLLECTION);

        let updated = counters
            .find_one_and_update(doc_id_str(counter), doc! {"$inc": {"seq": 1_i64}})
            .upsert(true)
            .return_document(ReturnDocument::After)
            .await
            .map_err(|source| MongoDaoError::NextId { counter, source })?;

        Ok(updated.map_or(1, |doc| doc.seq))
    }

    async fn create_palette(&self, palette: NewPalette) -> MongoResult<PaletteEntity> {
        let id = self.next_id(PALETTE_COLLECTION).await?;
        let document = MongoPaletteDocument::new(id, palette);
        self.palettes()
            .await
            .insert_one(&document)
            .await
            .map_err(|source| MongoDaoError::SavePalette {
                id: id as u64,
                source,
            })?;
        document.try_into()
    }

    async fn find_palette(&self, id: u64) -> MongoResult<Option<PaletteEntity>> {
        let Ok(key) = i64::try_from(id) else {
            return Ok(None);
        };
        let document = self
            .palettes()
            .await
            .find_one(doc_id(key))
            .await
            .map_err(|source| MongoDaoError::LoadPalette { id, source })?;

        document.map(PaletteEntity::try_from).transpose()
    }

    /// Append the feedback record, then bump the palette counter.
    ///
    /// The record is removed again when the counter update does not land, so a failed
    /// vote never leaves a counter without its record.
    async fn record_feedback(&self, feedback: NewFeedback) -> MongoResult<Option<FeedbackEntity>> {
        let palette_id = feedback.palette_id;
        let Ok(key) = i64::try_from(palette_id) else {
            return Ok(None);
        };
        if self.find_palette(palette_id).await?.is_none() {
            return Ok(None);
        }

        let id = self.next_id(FEEDBACK_COLLECTION).await?;
        let mut increment = Document::new();
        increment.insert(if feedback.liked { "likes" } else { "dislikes" }, 1_i64);
        let document = MongoFeedbackDocument::new(id, feedback);

        let feedback_records = self.feedback().await;
        feedback_records
            .insert_one(&document)
            .await
            .map_err(|source| MongoDaoError::SaveFeedback { palette_id, source })?;

        let bumped = self
            .palettes()
            .await
            .update_one(doc_id(key), doc! {"$inc": increment})
            .await;
        match bumped {
            Ok(result) if result.matched_count > 0 => document.try_into().map(Some),
            Ok(_) => {
                self.discard_feedback(&feedback_records, id).await;
                Ok(None)
            }
            Err(source) => {
                self.discard_feedback(&feedback_records, id).await;
                Err(MongoDaoError::SaveFeedback { palette_id, source })
            }
        }
    }

    async fn discard_feedback(&self, records: &Collection<MongoFeedbackDocument>, id: i64) {
        if let Err(err) = records.delete_one(doc_id(id)).await {
            warn!(
                feedback_id = id,
                error = %err,
                "could not remove feedback record after failed counter update"
            );
        }
    }

    async fn list_feedback(&self) -> MongoResult<Vec<FeedbackEntity>> {
        let documents: Vec<MongoFeedbackDocument> = self
            .feedback()
            .await
            .find(doc! {})
            .sort(doc! {"_id": 1})
            .await
            .map_err(|source| MongoDaoError::ListFeedback { source })?
            .try_collect()
            .await
            .map_err(|source| MongoDaoError::ListFeedback { source })?;

        // A single bad row must not block retraining from the rest.
        Ok(documents
            .into_iter()
            .filter_map(|doc| {
                FeedbackEntity::try_from(doc)
                    .inspect_err(|err| warn!(error = %err, "skipping feedback record"))
                    .ok()
            })
            .collect())
    }

    async fn list_liked_palettes(&self) -> MongoResult<Vec<PaletteEntity>> {
        let documents: Vec<MongoPaletteDocument> = self
            .palettes()
            .await
            .find(doc! {"likes": {"$gt": 0}})
            .sort(doc! {"_id": 1})
            .await
            .map_err(|source| MongoDaoError::ListPalettes { source })?
            .try_collect()
            .await
            .map_err(|source| MongoDaoError::ListPalettes { source })?;

        documents.into_iter().map(PaletteEntity::try_from).collect()
    }
}

fn doc_id_str(id: &str) -> Document {
    doc! {"_id": id}
}

impl PaletteStore for MongoPaletteStore {
    fn create_palette(&self, palette: NewPalette) -> BoxFuture<'static, StorageResult<PaletteEntity>> {
        let store = self.clone();
        Box::pin(async move { store.create_palette(palette).await.map_err(Into::into) })
    }

    fn find_palette(&self, id: u64) -> BoxFuture<'static, StorageResult<Option<PaletteEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.find_palette(id).await.map_err(Into::into) })
    }

    fn record_feedback(
        &self,
        feedback: NewFeedback,
    ) -> BoxFuture<'static, StorageResult<Option<FeedbackEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.record_feedback(feedback).await.map_err(Into::into) })
    }

    fn list_feedback(&self) -> BoxFuture<'static, StorageResult<Vec<FeedbackEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.list_feedback().await.map_err(Into::into) })
    }

    fn list_liked_palettes(&self) -> BoxFuture<'static, StorageResult<Vec<PaletteEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.list_liked_palettes().await.map_err(Into::into) })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.inner.ping().await.map_err(Into::into) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.inner.reconnect().await.map_err(Into::into) })
    }
}
