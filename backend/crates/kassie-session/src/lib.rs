//! Server-held session and cursor state for Kassie.
//!
//! Sessions bind a caller to one shared driver handle and own the cursors of
//! their active scans. Both registries evict by idle TTL: sessions after 7
//! days, cursors after 30 minutes, swept by 5-minute reapers the server
//! lifecycle spawns.

pub mod cursor;
pub mod error;
pub mod store;

pub use cursor::{Cursor, CursorStore, CURSOR_TTL};
pub use error::{StateError, StateResult};
pub use store::{Session, SessionStore, SESSION_TTL};
