//! Client library for the Kassie server API.
//!
//! Wraps the JSON/HTTP surface with typed methods, stores the bearer token
//! pair from login, and transparently refreshes an expired access token:
//! on a 401 carrying the token-expired marker the client refreshes once and
//! retries the original call exactly once, never in a loop.

pub mod auth;
pub mod client;
pub mod error;
pub mod models;

pub use auth::TokenStore;
pub use client::{KassieClient, KassieClientBuilder};
pub use error::{KassieLinkError, Result};
