use mongodb::error::Error as MongoError;
use thiserror::Error;

/// Result alias for MongoDB store internals.
pub type MongoResult<T> = std::result::Result<T, MongoDaoError>;

/// Failures of the MongoDB palette store.
#[derive(Debug, Error)]
pub enum MongoDaoError {
    /// Connection string could not be parsed.
    #[error("failed to parse MongoDB connection URI `{uri}`")]
    InvalidUri {
        /// Offending connection string.
        uri: String,
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// Driver rejected the parsed options.
    #[error("failed to build MongoDB client from options")]
    ClientConstruction {
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// Server never answered while connecting.
    #[error("MongoDB ping failed during initial connection after {attempts} attempt(s)")]
    InitialPing {
        /// Pings attempted.
        attempts: u32,
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// Periodic health ping failed.
    #[error("MongoDB ping health check failed")]
    HealthPing {
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// Index creation failed.
    #[error("failed to ensure index `{index}` on collection `{collection}`")]
    EnsureIndex {
        /// Collection being indexed.
        collection: &'static str,
        /// Index name.
        index: &'static str,
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// Counter increment failed.
    #[error("failed to allocate next id from counter `{counter}`")]
    NextId {
        /// Counter document key.
        counter: &'static str,
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// Palette insert failed.
    #[error("failed to save palette `{id}`")]
    SavePalette {
        /// Palette id.
        id: u64,
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// Palette lookup failed.
    #[error("failed to load palette `{id}`")]
    LoadPalette {
        /// Palette id.
        id: u64,
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// Feedback insert or counter bump failed.
    #[error("failed to record feedback for palette `{palette_id}`")]
    SaveFeedback {
        /// Palette the vote was for.
        palette_id: u64,
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// Feedback scan failed.
    #[error("failed to list feedback")]
    ListFeedback {
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// Liked palette scan failed.
    #[error("failed to list liked palettes")]
    ListPalettes {
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// Document does not map back to an entity.
    #[error("stored {record} document `{id}` is invalid: {reason}")]
    Corrupted {
        /// Kind of record.
        record: &'static str,
        /// Raw `_id` of the document.
        id: i64,
        /// Failed check.
        reason: String,
    },
}
