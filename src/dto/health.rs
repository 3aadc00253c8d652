use serde::Serialize;
use utoipa::ToSchema;

/// Body of the `/healthcheck` route.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// `ok` while a palette store is connected, `degraded` otherwise.
    #[schema(example = "ok")]
    pub status: String,
}

impl HealthResponse {
    /// Status derived from the application's degraded flag.
    pub fn from_degraded(degraded: bool) -> Self {
        let status = if degraded { "degraded" } else { "ok" };
        Self {
            status: status.to_owned(),
        }
    }
}
