/// OpenAPI documentation generation.
pub mod documentation;
/// Likes, dislikes and preference model retraining.
pub mod feedback_service;
/// Harmony palettes built from a base color.
pub mod harmony_service;
/// Health check service.
pub mod health_service;
/// Random palette generation and listing.
pub mod palette_service;
/// Storage connection supervisor with reconnect backoff.
pub mod storage_supervisor;
/// Palette extraction from uploaded images.
pub mod upload_service;
