use std::time::SystemTime;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

/// Feedback submission payloads.
pub mod feedback;
/// Harmony request and response.
pub mod harmony;
/// Health check payload.
pub mod health;
/// Generated and liked palette payloads.
pub mod palette;
/// Image upload payloads.
pub mod upload;
/// Field validators shared by request types.
pub mod validation;

fn format_system_time(time: SystemTime) -> String {
    OffsetDateTime::from(time)
        .format(&Rfc3339)
        .unwrap_or_else(|_| "invalid-timestamp".into())
}
