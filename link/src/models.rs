//! Wire types for the Kassie API.
//!
//! Mirrors the server's JSON bodies. Row cells stay as raw JSON values so
//! callers can render them without depending on server crates.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub profile: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: i64,
    pub profile: ProfileInfo,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub access_token: String,
    pub expires_at: i64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileInfo {
    pub name: String,
    pub hosts: Vec<String>,
    pub port: u16,
    #[serde(default)]
    pub keyspace: String,
    pub ssl_enabled: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProfilesResponse {
    pub profiles: Vec<ProfileInfo>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyspaceInfo {
    pub name: String,
    #[serde(default)]
    pub replication_strategy: String,
    #[serde(default)]
    pub replication: HashMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct KeyspacesResponse {
    pub keyspaces: Vec<KeyspaceInfo>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TablesResponse {
    pub keyspace: String,
    pub tables: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: String,
    pub is_partition_key: bool,
    pub is_clustering_key: bool,
    pub position: i32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableSchemaResponse {
    pub keyspace: String,
    pub table: String,
    pub columns: Vec<ColumnInfo>,
    pub partition_keys: Vec<String>,
    pub clustering_keys: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRowsRequest {
    pub keyspace: String,
    pub table: String,
    pub page_size: i32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NextPageRequest {
    pub cursor_id: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterRowsRequest {
    pub keyspace: String,
    pub table: String,
    pub where_clause: String,
    pub page_size: i32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowsResponse {
    pub rows: Vec<serde_json::Value>,
    #[serde(default)]
    pub cursor_id: String,
    pub has_more: bool,
    #[serde(default)]
    pub total_fetched: i64,
}

/// Error body the server attaches to every non-2xx status.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: String,
    #[serde(default)]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_response_decodes() {
        let json = r#"{
            "accessToken": "a",
            "refreshToken": "r",
            "expiresAt": 1700000900,
            "profile": {"name": "local", "hosts": ["h"], "port": 9042, "keyspace": "", "sslEnabled": false}
        }"#;
        let resp: LoginResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.access_token, "a");
        assert_eq!(resp.profile.name, "local");
    }

    #[test]
    fn test_rows_response_decodes() {
        let json = r#"{
            "rows": [{"cells": [["id", {"type": "int", "value": 1}]]}],
            "cursorId": "c1",
            "hasMore": true,
            "totalFetched": 1
        }"#;
        let resp: RowsResponse = serde_json::from_str(json).unwrap();
        assert!(resp.has_more);
        assert_eq!(resp.cursor_id, "c1");
        assert_eq!(resp.rows.len(), 1);
    }

    #[test]
    fn test_table_schema_decodes() {
        let json = r#"{
            "keyspace": "ks",
            "table": "t",
            "columns": [
                {"name": "pk", "type": "uuid", "isPartitionKey": true, "isClusteringKey": false, "position": 0}
            ],
            "partitionKeys": ["pk"],
            "clusteringKeys": []
        }"#;
        let resp: TableSchemaResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.partition_keys, vec!["pk"]);
        assert!(resp.columns[0].is_partition_key);
    }
}
