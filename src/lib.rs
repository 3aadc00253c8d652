//! Library crate for swatchwise, exposing modules for binaries and tests.

/// Runtime configuration.
pub mod config;
/// Persistence of palettes and feedback.
pub mod dao;
/// Request and response payloads.
pub mod dto;
/// Color math, preference model and palette generators.
pub mod engine;
/// Service and HTTP error types.
pub mod error;
/// HTTP routing.
pub mod routes;
/// Business logic behind the routes.
pub mod services;
/// Shared application state.
pub mod state;
