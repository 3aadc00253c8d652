/// Database model definitions.
pub mod models;
/// Palette and feedback persistence.
pub mod palette_store;
/// Storage abstraction layer for database operations.
pub mod storage;
