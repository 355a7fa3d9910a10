// Data service request/response bodies

use kassie_db::DataRow;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRowsRequest {
    #[serde(default)]
    pub keyspace: String,
    #[serde(default)]
    pub table: String,
    #[serde(default)]
    pub page_size: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NextPageRequest {
    #[serde(default)]
    pub cursor_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterRowsRequest {
    #[serde(default)]
    pub keyspace: String,
    #[serde(default)]
    pub table: String,
    #[serde(default)]
    pub where_clause: String,
    #[serde(default)]
    pub page_size: i32,
}

/// One page of rows. `cursor_id` names the cursor for the next page and is
/// empty when the scan is exhausted; every page invalidates the previous id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowsResponse {
    pub rows: Vec<DataRow>,
    pub cursor_id: String,
    pub has_more: bool,
    pub total_fetched: i64,
}
