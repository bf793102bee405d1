/*
 * Responsibility
 * - Public surface of the crate (used by the binary and integration tests)
 */
pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod repos;
pub mod services;
pub mod state;
