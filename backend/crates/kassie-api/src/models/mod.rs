//! Request and response bodies for the three services.
//!
//! Field names follow the JSON conventions of the web client: camelCase on
//! the wire, tagged cells for row data.

pub mod data;
pub mod schema;
pub mod session;

pub use data::{FilterRowsRequest, NextPageRequest, QueryRowsRequest, RowsResponse};
pub use schema::{ColumnInfo, KeyspaceInfo, KeyspacesResponse, TableSchemaResponse, TablesResponse};
pub use session::{
    LoginRequest, LoginResponse, LogoutResponse, ProfileInfo, ProfilesResponse, RefreshRequest,
    RefreshResponse,
};
