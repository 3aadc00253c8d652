//! Errors shared by every palette store backend.

use std::error::Error;
use thiserror::Error;

/// Result alias for palette store operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Failure reported by a [`PaletteStore`](crate::dao::palette_store::PaletteStore).
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backend could not be reached or rejected the operation.
    #[error("palette storage unavailable: {message}")]
    Unavailable {
        /// What the store was doing when it failed.
        message: String,
        /// Backend error that caused the failure.
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
    /// A stored palette or feedback record cannot be mapped back to an entity.
    #[error("corrupted {record} record `{id}`: {reason}")]
    Corrupted {
        /// Kind of record, e.g. `palette` or `feedback`.
        record: &'static str,
        /// Backend key of the offending record.
        id: String,
        /// Which check the record failed.
        reason: String,
    },
}

impl StorageError {
    /// Wrap a backend failure as an outage.
    pub fn unavailable(
        message: impl Into<String>,
        source: impl Error + Send + Sync + 'static,
    ) -> Self {
        StorageError::Unavailable {
            message: message.into(),
            source: Box::new(source),
        }
    }

    /// Whether retrying later may succeed.
    pub fn is_outage(&self) -> bool {
        matches!(self, StorageError::Unavailable { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corrupted_records_are_not_outages() {
        let corrupted = StorageError::Corrupted {
            record: "palette",
            id: "-1".into(),
            reason: "negative id".into(),
        };
        assert!(!corrupted.is_outage());
        assert_eq!(
            corrupted.to_string(),
            "corrupted palette record `-1`: negative id"
        );

        let outage = StorageError::unavailable("ping", std::io::Error::other("refused"));
        assert!(outage.is_outage());
    }
}
