// Shared driver session wrapper
//
// Wraps one scylla session with the request timeout from its profile and a
// close marker owned by the pool. The Rust driver releases its resources on
// drop, so "close" here only flips the marker; the pool discards marked
// entries on the next access and the last Arc drop tears the session down.

use crate::error::{DbError, DbResult};
use crate::pool::PoolEntry;
use crate::values::DataRow;
use scylla::query::Query;
use scylla::statement::{PagingState, PagingStateResponse};
use scylla::transport::errors::QueryError;
use scylla::QueryResult;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

pub struct CqlSession {
    session: scylla::Session,
    timeout: Duration,
    closed: AtomicBool,
}

impl CqlSession {
    pub fn new(session: scylla::Session, timeout: Duration) -> Self {
        Self {
            session,
            timeout,
            closed: AtomicBool::new(false),
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Run every unpaged rows of `stmt` through the tagged row encoding.
    pub async fn fetch_all(&self, stmt: &str) -> DbResult<Vec<DataRow>> {
        let result = self
            .bounded(self.session.query_unpaged(stmt, ()))
            .await?;
        Ok(rows_from_result(result))
    }

    /// Fetch one page of `stmt`.
    ///
    /// `page_state` carries the opaque driver token from a previous page, or
    /// `None` to start the scan. Returns the page rows plus the token for the
    /// next page when more remain.
    pub async fn fetch_page(
        &self,
        stmt: &str,
        page_size: i32,
        page_state: Option<&[u8]>,
    ) -> DbResult<(Vec<DataRow>, Option<Vec<u8>>)> {
        let query = Query::new(stmt).with_page_size(page_size);
        let prepared = self.bounded(self.session.prepare(query)).await?;

        let paging_state = match page_state {
            Some(bytes) => PagingState::new_from_raw_bytes(bytes.to_vec()),
            None => PagingState::start(),
        };

        let (result, paging_response) = self
            .bounded(self.session.execute_single_page(&prepared, (), paging_state))
            .await?;

        let rows = rows_from_result(result);

        let next_state = match paging_response {
            PagingStateResponse::HasMorePages { state } => state
                .as_bytes_slice()
                .map(|bytes| bytes.as_ref().to_vec()),
            PagingStateResponse::NoMorePages => None,
        };

        Ok((rows, next_state))
    }

    /// Apply the request timeout to a driver future.
    pub(crate) async fn bounded<T, E>(
        &self,
        fut: impl Future<Output = Result<T, E>>,
    ) -> DbResult<T>
    where
        E: Into<DriverError>,
    {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(e.into().0),
            Err(_) => Err(DbError::Timeout),
        }
    }

    pub(crate) fn raw(&self) -> &scylla::Session {
        &self.session
    }
}

impl PoolEntry for CqlSession {
    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    fn close(&self) {
        self.closed.store(true, Ordering::Release);
    }
}

/// Newtype so `bounded` can accept the driver's different error types.
pub(crate) struct DriverError(pub DbError);

impl From<QueryError> for DriverError {
    fn from(e: QueryError) -> Self {
        DriverError(DbError::QueryFailed(e.to_string()))
    }
}

fn rows_from_result(result: QueryResult) -> Vec<DataRow> {
    let specs = result.col_specs().to_owned();
    result
        .rows_or_empty()
        .iter()
        .map(|row| DataRow::from_driver(&specs, row))
        .collect()
}
