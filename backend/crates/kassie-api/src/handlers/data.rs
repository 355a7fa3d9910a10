//! Data service: paged table scans and filtered reads.
//!
//! Pagination state lives server-side: the driver's opaque page token goes
//! into the caller's cursor registry and only a short cursor id crosses the
//! wire. Cursor identity rotates on every fetch: GetNextPage consumes the
//! cursor it was given and mints a successor when more pages remain.

use crate::error::ApiError;
use crate::handlers::current_session;
use crate::models::{FilterRowsRequest, NextPageRequest, QueryRowsRequest, RowsResponse};
use crate::Sessions;
use actix_web::{web, HttpRequest, HttpResponse};
use kassie_db::QueryBuilder;
use log::debug;
use std::sync::Arc;

const MAX_PAGE_SIZE: i32 = 10_000;
const DEFAULT_PAGE_SIZE: i32 = 100;

const DANGEROUS_KEYWORDS: &[&str] = &[
    "drop", "delete", "insert", "update", "alter", "create", "truncate",
];

/// POST /v1/api/data/query: first page of a full table scan.
pub async fn query_rows(
    req: HttpRequest,
    body: web::Json<QueryRowsRequest>,
    sessions: web::Data<Arc<Sessions>>,
) -> Result<HttpResponse, ApiError> {
    if body.keyspace.is_empty() || body.table.is_empty() {
        return Err(ApiError::InvalidArgument(
            "keyspace and table are required".to_string(),
        ));
    }

    let session = current_session(&req, &sessions)?;
    let page_size = clamp_page_size(body.page_size);

    let query = QueryBuilder::new(&body.keyspace, &body.table).select_all(0);
    let (rows, next_state) = session.connection.fetch_page(&query, page_size, None).await?;

    let (cursor_id, has_more) = match next_state {
        Some(state) => {
            let id = session
                .cursors
                .create(state, &body.keyspace, &body.table, "", page_size);
            (id, true)
        }
        None => (String::new(), false),
    };

    let total_fetched = rows.len() as i64;
    Ok(HttpResponse::Ok().json(RowsResponse {
        rows,
        cursor_id,
        has_more,
        total_fetched,
    }))
}

/// POST /v1/api/data/page: continue a scan from a cursor.
///
/// The consumed cursor is deleted only after a successful fetch, so a
/// transient driver failure leaves it usable for a retry. Two concurrent
/// fetches on the same cursor race by design: the loser finds it gone.
pub async fn get_next_page(
    req: HttpRequest,
    body: web::Json<NextPageRequest>,
    sessions: web::Data<Arc<Sessions>>,
) -> Result<HttpResponse, ApiError> {
    if body.cursor_id.is_empty() {
        return Err(ApiError::InvalidArgument("cursor ID is required".to_string()));
    }

    let session = current_session(&req, &sessions)?;

    let cursor = session
        .cursors
        .get(&body.cursor_id)
        .map_err(|e| ApiError::NotFound(format!("cursor not found or expired: {}", e)))?;

    let builder = QueryBuilder::new(&cursor.keyspace, &cursor.table);
    let query = if cursor.filter.is_empty() {
        builder.select_all(0)
    } else {
        builder.select_with_where(&cursor.filter, 0)
    };

    let (rows, next_state) = session
        .connection
        .fetch_page(&query, cursor.page_size, Some(&cursor.page_state))
        .await?;

    let (cursor_id, has_more) = match next_state {
        Some(state) => {
            let id = session.cursors.create(
                state,
                &cursor.keyspace,
                &cursor.table,
                &cursor.filter,
                cursor.page_size,
            );
            (id, true)
        }
        None => (String::new(), false),
    };

    session.cursors.delete(&body.cursor_id);
    debug!(
        "cursor {} consumed, successor {:?}",
        body.cursor_id,
        if has_more { Some(&cursor_id) } else { None }
    );

    let total_fetched = rows.len() as i64;
    Ok(HttpResponse::Ok().json(RowsResponse {
        rows,
        cursor_id,
        has_more,
        total_fetched,
    }))
}

/// POST /v1/api/data/filter: first page of a filtered scan.
///
/// The WHERE clause is screened by the deny-list before any CQL is issued.
pub async fn filter_rows(
    req: HttpRequest,
    body: web::Json<FilterRowsRequest>,
    sessions: web::Data<Arc<Sessions>>,
) -> Result<HttpResponse, ApiError> {
    if body.keyspace.is_empty() || body.table.is_empty() {
        return Err(ApiError::InvalidArgument(
            "keyspace and table are required".to_string(),
        ));
    }
    if body.where_clause.is_empty() {
        return Err(ApiError::InvalidArgument(
            "where clause is required for filtering".to_string(),
        ));
    }

    validate_where_clause(&body.where_clause)?;

    let session = current_session(&req, &sessions)?;
    let page_size = clamp_page_size(body.page_size);

    let query =
        QueryBuilder::new(&body.keyspace, &body.table).select_with_where(&body.where_clause, 0);
    let (rows, next_state) = session.connection.fetch_page(&query, page_size, None).await?;

    let (cursor_id, has_more) = match next_state {
        Some(state) => {
            let id = session.cursors.create(
                state,
                &body.keyspace,
                &body.table,
                &body.where_clause,
                page_size,
            );
            (id, true)
        }
        None => (String::new(), false),
    };

    let total_fetched = rows.len() as i64;
    Ok(HttpResponse::Ok().json(RowsResponse {
        rows,
        cursor_id,
        has_more,
        total_fetched,
    }))
}

/// Requests outside [1, 10000] fall back to the 100-row default.
fn clamp_page_size(requested: i32) -> i32 {
    if requested <= 0 || requested > MAX_PAGE_SIZE {
        DEFAULT_PAGE_SIZE
    } else {
        requested
    }
}

/// Minimal rejection-only screen for user-supplied WHERE clauses.
///
/// This is intentionally coarser than the client-side validator: the
/// contract here is rejection of mutating verbs, not syntactic validation.
/// Driver-side parameter binding and the read-only query builder are the
/// other layers.
fn validate_where_clause(where_clause: &str) -> Result<(), ApiError> {
    let normalized = where_clause.trim().to_lowercase();

    if normalized.is_empty() {
        return Err(ApiError::InvalidArgument("empty WHERE clause".to_string()));
    }

    for keyword in DANGEROUS_KEYWORDS {
        if normalized.contains(keyword) {
            return Err(ApiError::InvalidArgument(format!(
                "dangerous keyword detected: {}",
                keyword
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_page_size() {
        assert_eq!(clamp_page_size(-1), DEFAULT_PAGE_SIZE);
        assert_eq!(clamp_page_size(0), DEFAULT_PAGE_SIZE);
        assert_eq!(clamp_page_size(1), 1);
        assert_eq!(clamp_page_size(500), 500);
        assert_eq!(clamp_page_size(MAX_PAGE_SIZE), MAX_PAGE_SIZE);
        assert_eq!(clamp_page_size(20_000), DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_where_clause_accepts_comparisons() {
        for clause in [
            "age > 21",
            "name = 'alice' AND city = 'oslo'",
            "id IN (1, 2, 3)",
            "tags CONTAINS 'rust'",
        ] {
            assert!(validate_where_clause(clause).is_ok(), "clause {clause:?} must pass");
        }
    }

    #[test]
    fn test_where_clause_rejects_dangerous_keywords() {
        for clause in [
            "; DROP TABLE users",
            "1=1; delete from t",
            "x = 'y' AND INSERT",
            "UPDATE t SET a = 1",
            "alter table t",
            "CREATE TABLE evil (id int)",
            "truncate t",
        ] {
            let err = validate_where_clause(clause).unwrap_err();
            assert!(
                matches!(err, ApiError::InvalidArgument(_)),
                "clause {clause:?} must be rejected"
            );
        }
    }

    #[test]
    fn test_where_clause_rejects_empty() {
        for clause in ["", "   ", "\t\n"] {
            let err = validate_where_clause(clause).unwrap_err();
            assert!(matches!(err, ApiError::InvalidArgument(_)));
        }
    }

    #[test]
    fn test_keyword_check_is_case_insensitive() {
        for clause in ["DROP x", "DrOp x", "drop x"] {
            assert!(validate_where_clause(clause).is_err());
        }
    }
}
