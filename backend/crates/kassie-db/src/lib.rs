//! Driver pool and CQL query layer for Kassie.
//!
//! One live driver handle per cluster profile, shared by every session bound
//! to that profile. The pool creates handles lazily under its lock, reuses
//! them across logins, and discards entries that were marked closed. Query
//! helpers return rows in the tagged cell encoding served over the API.

pub mod catalog;
pub mod connection;
pub mod error;
pub mod pool;
pub mod query;
pub mod session;
pub mod values;

pub use catalog::{ColumnMeta, KeyspaceMeta};
pub use connection::{connect, ConnectionConfig};
pub use error::{DbError, DbResult};
pub use pool::{Pool, PoolEntry};
pub use query::QueryBuilder;
pub use session::CqlSession;
pub use values::{CellValue, DataRow};
