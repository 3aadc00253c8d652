//! Connection settings for the MongoDB palette store.

use std::time::Duration;

use mongodb::options::ClientOptions;

use super::error::{MongoDaoError, MongoResult};

/// Database used when none is named explicitly.
pub const DEFAULT_DATABASE: &str = "swatchwise";

const APP_NAME: &str = "swatchwise";

/// Backoff applied while waiting for the first ping after connecting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectRetry {
    /// Pings attempted before the connection is given up.
    pub max_attempts: u32,
    /// Pause after the first failed ping; doubled after every further failure.
    pub initial_delay: Duration,
    /// Ceiling for the doubled pause.
    pub max_delay: Duration,
}

impl Default for ConnectRetry {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            initial_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(5),
        }
    }
}

impl ConnectRetry {
    /// Pauses to sleep between consecutive failed pings.
    pub(super) fn delays(&self) -> impl Iterator<Item = Duration> {
        let max = self.max_delay;
        std::iter::successors(Some(self.initial_delay.min(max)), move |delay| {
            Some((*delay * 2).min(max))
        })
    }
}

/// Everything needed to open the palette database.
#[derive(Clone)]
pub struct MongoConfig {
    pub(super) options: ClientOptions,
    pub(super) database_name: String,
    pub(super) retry: ConnectRetry,
}

impl MongoConfig {
    /// Parse `uri`; `database` falls back to [`DEFAULT_DATABASE`].
    pub async fn from_uri(uri: &str, database: Option<&str>) -> MongoResult<Self> {
        let mut options =
            ClientOptions::parse(uri)
                .await
                .map_err(|source| MongoDaoError::InvalidUri {
                    uri: uri.to_owned(),
                    source,
                })?;
        options.app_name.get_or_insert_with(|| APP_NAME.to_owned());

        Ok(Self {
            options,
            database_name: database.unwrap_or(DEFAULT_DATABASE).to_owned(),
            retry: ConnectRetry::default(),
        })
    }

    /// Name of the database holding palettes, feedback and counters.
    pub fn database_name(&self) -> &str {
        &self.database_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retry_delays_double_up_to_the_ceiling() {
        let retry = ConnectRetry {
            max_attempts: 6,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(5),
        };
        let delays: Vec<u64> = retry.delays().take(5).map(|d| d.as_secs()).collect();
        assert_eq!(delays, vec![1, 2, 4, 5, 5]);
    }

    #[tokio::test]
    async fn uri_without_database_uses_default_and_tags_the_client() {
        let config = MongoConfig::from_uri("mongodb://localhost:27017", None)
            .await
            .unwrap();
        assert_eq!(config.database_name(), DEFAULT_DATABASE);
        assert_eq!(config.options.app_name.as_deref(), Some(APP_NAME));
        assert_eq!(config.retry, ConnectRetry::default());

        let named = MongoConfig::from_uri("mongodb://localhost:27017/?appName=ops", Some("palettes_dev"))
            .await
            .unwrap();
        assert_eq!(named.database_name(), "palettes_dev");
        assert_eq!(named.options.app_name.as_deref(), Some("ops"));
    }

    #[tokio::test]
    async fn malformed_uri_is_rejected() {
        let err = MongoConfig::from_uri("postgres://nope", None)
            .await
            .err()
            .unwrap();
        assert!(matches!(err, MongoDaoError::InvalidUri { .. }));
    }
}
