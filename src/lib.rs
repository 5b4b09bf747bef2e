#![deny(missing_docs)]

//! Core library for the student registry HTTP service.

/// HTTP routing and REST handlers.
pub mod api;
/// Environment-driven configuration management.
pub mod config;
/// Structured logging and tracing setup.
pub mod logging;
/// Record store adapters (MongoDB and in-memory).
pub mod store;
/// Student records, validation, and operations.
pub mod students;
