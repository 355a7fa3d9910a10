// system_schema catalog reads
//
// One query per operation, no caching. system_schema is the driver-neutral
// catalog shared by Cassandra and ScyllaDB.

use crate::error::{DbError, DbResult};
use crate::session::CqlSession;
use serde::Serialize;
use std::collections::HashMap;

/// A keyspace with its replication settings.
#[derive(Debug, Clone, Serialize)]
pub struct KeyspaceMeta {
    pub name: String,
    pub replication_strategy: String,
    pub replication: HashMap<String, String>,
}

/// One column of a table as described by system_schema.columns.
#[derive(Debug, Clone, Serialize)]
pub struct ColumnMeta {
    pub name: String,
    pub column_type: String,
    pub kind: String,
    pub position: i32,
}

impl ColumnMeta {
    pub fn is_partition_key(&self) -> bool {
        self.kind == "partition_key"
    }

    pub fn is_clustering_key(&self) -> bool {
        self.kind == "clustering"
    }
}

impl CqlSession {
    /// All keyspaces, sorted by name.
    pub async fn list_keyspaces(&self) -> DbResult<Vec<KeyspaceMeta>> {
        let result = self
            .bounded(self.raw().query_unpaged(
                "SELECT keyspace_name, replication FROM system_schema.keyspaces",
                (),
            ))
            .await?;

        let mut keyspaces = Vec::new();
        let rows = result
            .rows_typed::<(String, HashMap<String, String>)>()
            .map_err(|e| DbError::Decode(e.to_string()))?;
        for row in rows {
            let (name, replication) = row.map_err(|e| DbError::Decode(e.to_string()))?;
            if name.is_empty() {
                continue;
            }
            let replication_strategy = replication.get("class").cloned().unwrap_or_default();
            keyspaces.push(KeyspaceMeta {
                name,
                replication_strategy,
                replication,
            });
        }

        keyspaces.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(keyspaces)
    }

    /// Table names of one keyspace, sorted.
    pub async fn list_tables(&self, keyspace: &str) -> DbResult<Vec<String>> {
        let result = self
            .bounded(self.raw().query_unpaged(
                "SELECT table_name FROM system_schema.tables WHERE keyspace_name = ?",
                (keyspace,),
            ))
            .await?;

        let mut tables = Vec::new();
        let rows = result
            .rows_typed::<(String,)>()
            .map_err(|e| DbError::Decode(e.to_string()))?;
        for row in rows {
            let (name,) = row.map_err(|e| DbError::Decode(e.to_string()))?;
            if !name.is_empty() {
                tables.push(name);
            }
        }

        tables.sort();
        Ok(tables)
    }

    /// Column descriptions of one table, sorted by position.
    ///
    /// Returns an empty vec when the table does not exist; the caller decides
    /// how to surface that.
    pub async fn table_columns(&self, keyspace: &str, table: &str) -> DbResult<Vec<ColumnMeta>> {
        let result = self
            .bounded(self.raw().query_unpaged(
                "SELECT column_name, type, kind, position FROM system_schema.columns \
                 WHERE keyspace_name = ? AND table_name = ?",
                (keyspace, table),
            ))
            .await?;

        let mut columns = Vec::new();
        let rows = result
            .rows_typed::<(String, String, String, i32)>()
            .map_err(|e| DbError::Decode(e.to_string()))?;
        for row in rows {
            let (name, column_type, kind, position) =
                row.map_err(|e| DbError::Decode(e.to_string()))?;
            if name.is_empty() {
                continue;
            }
            columns.push(ColumnMeta {
                name,
                column_type,
                kind,
                position,
            });
        }

        columns.sort_by_key(|c| c.position);
        Ok(columns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_kind_helpers() {
        let pk = ColumnMeta {
            name: "id".to_string(),
            column_type: "uuid".to_string(),
            kind: "partition_key".to_string(),
            position: 0,
        };
        let ck = ColumnMeta {
            name: "ts".to_string(),
            column_type: "timestamp".to_string(),
            kind: "clustering".to_string(),
            position: 0,
        };
        let regular = ColumnMeta {
            name: "body".to_string(),
            column_type: "text".to_string(),
            kind: "regular".to_string(),
            position: -1,
        };

        assert!(pk.is_partition_key() && !pk.is_clustering_key());
        assert!(ck.is_clustering_key() && !ck.is_partition_key());
        assert!(!regular.is_partition_key() && !regular.is_clustering_key());
    }
}
