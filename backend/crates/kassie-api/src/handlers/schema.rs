//! Schema service: keyspace, table, and column discovery.
//!
//! Every method requires an authenticated session and issues exactly one
//! query against the cluster's system_schema catalog. No caching here;
//! clients cache on their side.

use crate::error::ApiError;
use crate::handlers::current_session;
use crate::models::{ColumnInfo, KeyspacesResponse, TableSchemaResponse, TablesResponse};
use crate::Sessions;
use actix_web::{web, HttpRequest, HttpResponse};
use std::sync::Arc;

/// GET /v1/api/schema/keyspaces
pub async fn list_keyspaces(
    req: HttpRequest,
    sessions: web::Data<Arc<Sessions>>,
) -> Result<HttpResponse, ApiError> {
    let session = current_session(&req, &sessions)?;

    let keyspaces = session.connection.list_keyspaces().await?;

    Ok(HttpResponse::Ok().json(KeyspacesResponse {
        keyspaces: keyspaces.into_iter().map(Into::into).collect(),
    }))
}

/// GET /v1/api/schema/keyspaces/{keyspace}/tables
pub async fn list_tables(
    req: HttpRequest,
    path: web::Path<String>,
    sessions: web::Data<Arc<Sessions>>,
) -> Result<HttpResponse, ApiError> {
    let keyspace = path.into_inner();
    if keyspace.is_empty() {
        return Err(ApiError::InvalidArgument("keyspace is required".to_string()));
    }

    let session = current_session(&req, &sessions)?;
    let tables = session.connection.list_tables(&keyspace).await?;

    Ok(HttpResponse::Ok().json(TablesResponse { keyspace, tables }))
}

/// GET /v1/api/schema/keyspaces/{keyspace}/tables/{table}
///
/// Columns come back sorted by position; the partition and clustering key
/// lists preserve that positional order. An empty catalog result means the
/// table does not exist.
pub async fn get_table_schema(
    req: HttpRequest,
    path: web::Path<(String, String)>,
    sessions: web::Data<Arc<Sessions>>,
) -> Result<HttpResponse, ApiError> {
    let (keyspace, table) = path.into_inner();
    if keyspace.is_empty() || table.is_empty() {
        return Err(ApiError::InvalidArgument(
            "keyspace and table are required".to_string(),
        ));
    }

    let session = current_session(&req, &sessions)?;
    let columns = session.connection.table_columns(&keyspace, &table).await?;

    if columns.is_empty() {
        return Err(ApiError::NotFound(format!("table not found: {}.{}", keyspace, table)));
    }

    let partition_keys = columns
        .iter()
        .filter(|c| c.is_partition_key())
        .map(|c| c.name.clone())
        .collect();
    let clustering_keys = columns
        .iter()
        .filter(|c| c.is_clustering_key())
        .map(|c| c.name.clone())
        .collect();

    Ok(HttpResponse::Ok().json(TableSchemaResponse {
        keyspace,
        table,
        columns: columns.iter().map(ColumnInfo::from).collect(),
        partition_keys,
        clustering_keys,
    }))
}
