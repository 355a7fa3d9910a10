// Schema service response bodies

use kassie_db::{ColumnMeta, KeyspaceMeta};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyspaceInfo {
    pub name: String,
    pub replication_strategy: String,
    pub replication: HashMap<String, String>,
}

impl From<KeyspaceMeta> for KeyspaceInfo {
    fn from(meta: KeyspaceMeta) -> Self {
        Self {
            name: meta.name,
            replication_strategy: meta.replication_strategy,
            replication: meta.replication,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyspacesResponse {
    pub keyspaces: Vec<KeyspaceInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TablesResponse {
    pub keyspace: String,
    pub tables: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: String,
    pub is_partition_key: bool,
    pub is_clustering_key: bool,
    pub position: i32,
}

impl From<&ColumnMeta> for ColumnInfo {
    fn from(meta: &ColumnMeta) -> Self {
        Self {
            name: meta.name.clone(),
            column_type: meta.column_type.clone(),
            is_partition_key: meta.is_partition_key(),
            is_clustering_key: meta.is_clustering_key(),
            position: meta.position,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableSchemaResponse {
    pub keyspace: String,
    pub table: String,
    pub columns: Vec<ColumnInfo>,
    pub partition_keys: Vec<String>,
    pub clustering_keys: Vec<String>,
}
