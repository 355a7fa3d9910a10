//! Request middleware for the Kassie API.

pub mod auth;

pub use auth::AuthMiddleware;
