//! Kassie server library.
//!
//! Exposes the server modules for integration testing; the heavy lifting
//! (bootstrap, middleware wiring, graceful shutdown) lives in dedicated
//! modules so `main.rs` stays a thin orchestrator.

pub mod config;
pub mod middleware;
