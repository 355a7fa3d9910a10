// Read-only CQL statement assembly
//
// The gateway never writes to the cluster, so only SELECT shapes are
// assembled here. WHERE clauses arrive pre-screened by the filter deny-list
// in the data service.

/// Builds SELECT statements for one fully qualified table.
pub struct QueryBuilder {
    keyspace: String,
    table: String,
}

impl QueryBuilder {
    pub fn new(keyspace: &str, table: &str) -> Self {
        Self {
            keyspace: keyspace.to_string(),
            table: table.to_string(),
        }
    }

    pub fn select_all(&self, limit: i64) -> String {
        let mut query = format!("SELECT * FROM {}.{}", self.keyspace, self.table);
        if limit > 0 {
            query.push_str(&format!(" LIMIT {}", limit));
        }
        query
    }

    pub fn select_with_where(&self, where_clause: &str, limit: i64) -> String {
        let mut query = format!(
            "SELECT * FROM {}.{} WHERE {}",
            self.keyspace, self.table, where_clause
        );
        if limit > 0 {
            query.push_str(&format!(" LIMIT {}", limit));
        }
        query
    }

    pub fn count(&self) -> String {
        format!("SELECT COUNT(*) FROM {}.{}", self.keyspace, self.table)
    }
}
