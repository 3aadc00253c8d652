//! Opens the palette database and prepares its collections.

use mongodb::{
    Client, Database, IndexModel,
    bson::{Document, doc},
    options::IndexOptions,
};
use tokio::time::sleep;
use tracing::{debug, info};

use super::{
    config::MongoConfig,
    error::{MongoDaoError, MongoResult},
};

pub(super) const PALETTE_COLLECTION: &str = "palettes";
pub(super) const FEEDBACK_COLLECTION: &str = "feedback";
pub(super) const COUNTER_COLLECTION: &str = "counters";

/// `(collection, field, index name)`: liked-palette listing and per-palette feedback lookups.
const INDEXES: [(&str, &str, &str); 2] = [
    (PALETTE_COLLECTION, "likes", "palette_likes_idx"),
    (FEEDBACK_COLLECTION, "palette_id", "feedback_palette_idx"),
];

/// Connect, wait for the server to answer and make sure the collections are indexed.
///
/// Used both on startup and by reconnect attempts, so index creation must stay idempotent.
pub(super) async fn open_palette_database(config: &MongoConfig) -> MongoResult<(Client, Database)> {
    let client = Client::with_options(config.options.clone())
        .map_err(|source| MongoDaoError::ClientConstruction { source })?;
    let database = client.database(config.database_name());

    wait_for_ping(&database, config).await?;
    ensure_indexes(&database).await?;

    info!(database = config.database_name(), "palette database ready");
    Ok((client, database))
}

async fn wait_for_ping(database: &Database, config: &MongoConfig) -> MongoResult<()> {
    let retry = config.retry;
    let mut delays = retry.delays();
    let mut attempts = 0;

    loop {
        attempts += 1;
        let Err(source) = database.run_command(doc! { "ping": 1 }).await else {
            return Ok(());
        };
        if attempts >= retry.max_attempts {
            return Err(MongoDaoError::InitialPing { attempts, source });
        }

        let delay = delays.next().unwrap_or(retry.max_delay);
        debug!(
            attempts,
            delay_ms = delay.as_millis() as u64,
            "palette database not answering yet"
        );
        sleep(delay).await;
    }
}

async fn ensure_indexes(database: &Database) -> MongoResult<()> {
    for (collection, field, name) in INDEXES {
        let mut keys = Document::new();
        keys.insert(field, 1_i32);
        let model = IndexModel::builder()
            .keys(keys)
            .options(IndexOptions::builder().name(Some(name.to_owned())).build())
            .build();

        database
            .collection::<Document>(collection)
            .create_index(model)
            .await
            .map_err(|source| MongoDaoError::EnsureIndex {
                collection,
                index: name,
                source,
            })?;
    }
    Ok(())
}
