//! Read-only access to the missing-person tables

use async_trait::async_trait;
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection, MySqlRow};
use sqlx::{Connection, FromRow};
use tracing::{debug, warn};

use crate::config::DatabaseConfig;
use crate::error::{DbError, Result};
use crate::types::{MirrorRecord, PrimaryRecord};

pub const LATEST_PRIMARY_SQL: &str =
    "SELECT * FROM missing_persons ORDER BY created_at DESC LIMIT 1";

pub const LATEST_MIRROR_SQL: &str =
    "SELECT * FROM mirror_missing_persons ORDER BY id DESC LIMIT 1";

/// Source of the newest record from each table
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Newest row of `missing_persons`, if any
    async fn latest_primary(&self) -> Result<Option<PrimaryRecord>>;

    /// Newest row of `mirror_missing_persons`, if any
    async fn latest_mirror(&self) -> Result<Option<MirrorRecord>>;
}

/// MySQL-backed record store
///
/// Holds only connection options. Every fetch opens its own connection and
/// closes it before returning, whether or not the query succeeded.
#[derive(Clone)]
pub struct MySqlRecordStore {
    options: MySqlConnectOptions,
}

impl MySqlRecordStore {
    pub fn new(options: MySqlConnectOptions) -> Self {
        Self { options }
    }

    pub fn from_config(config: &DatabaseConfig) -> Self {
        Self::new(config.connect_options())
    }

    async fn fetch_latest<T>(&self, sql: &'static str) -> Result<Option<T>>
    where
        T: for<'r> FromRow<'r, MySqlRow> + Send + Unpin,
    {
        let conn = MySqlConnection::connect_with(&self.options)
            .await
            .map_err(DbError::SqlxError)?;

        fetch_then_close(conn, sql).await
    }
}

/// A connection that serves one query and is then closed
#[async_trait]
pub(crate) trait OneShotConnection: Send + Sized {
    async fn fetch_optional<T>(&mut self, sql: &'static str) -> sqlx::Result<Option<T>>
    where
        T: for<'r> FromRow<'r, MySqlRow> + Send + Unpin;

    async fn close(self) -> sqlx::Result<()>;
}

#[async_trait]
impl OneShotConnection for MySqlConnection {
    async fn fetch_optional<T>(&mut self, sql: &'static str) -> sqlx::Result<Option<T>>
    where
        T: for<'r> FromRow<'r, MySqlRow> + Send + Unpin,
    {
        sqlx::query_as::<_, T>(sql).fetch_optional(self).await
    }

    async fn close(self) -> sqlx::Result<()> {
        Connection::close(self).await
    }
}

/// Run `sql` on `conn`, then close `conn` whether or not the query succeeded
pub(crate) async fn fetch_then_close<C, T>(mut conn: C, sql: &'static str) -> Result<Option<T>>
where
    C: OneShotConnection,
    T: for<'r> FromRow<'r, MySqlRow> + Send + Unpin,
{
    debug!(sql, "Running latest-row query");
    let result = conn.fetch_optional::<T>(sql).await;

    if let Err(e) = conn.close().await {
        warn!(error = %e, "Failed to close database connection cleanly");
    }

    Ok(result.map_err(DbError::SqlxError)?)
}

#[async_trait]
impl RecordStore for MySqlRecordStore {
    async fn latest_primary(&self) -> Result<Option<PrimaryRecord>> {
        self.fetch_latest(LATEST_PRIMARY_SQL).await
    }

    async fn latest_mirror(&self) -> Result<Option<MirrorRecord>> {
        self.fetch_latest(LATEST_MIRROR_SQL).await
    }
}
