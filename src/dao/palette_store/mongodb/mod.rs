mod config;
mod connection;
mod error;
mod models;
/// Store implementation over the palettes, feedback and counters collections.
pub mod store;

pub use config::{DEFAULT_DATABASE, MongoConfig};
pub use error::MongoDaoError;
pub use store::MongoPaletteStore;

use crate::dao::storage::StorageError;

impl From<MongoDaoError> for StorageError {
    fn from(err: MongoDaoError) -> Self {
        match err {
            MongoDaoError::Corrupted { record, id, reason } => StorageError::Corrupted {
                record,
                id: id.to_string(),
                reason,
            },
            other => StorageError::unavailable(other.to_string(), other),
        }
    }
}
