//! Embedded SQLite store: connection pool plus a write gate serializing write transactions.

use crate::error::AppError;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use sqlx::{Sqlite, SqliteConnection, Transaction};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, MutexGuard};

/// Process-wide store handle. Cheap to clone; clones share the pool and the write gate.
#[derive(Clone, Debug)]
pub struct Store {
    pool: SqlitePool,
    write_gate: Arc<Mutex<()>>,
}

/// A scoped write transaction. Commit explicitly; dropping it rolls back and releases the gate.
pub struct WriteTxn<'a> {
    tx: Transaction<'static, Sqlite>,
    _gate: MutexGuard<'a, ()>,
}

impl Store {
    /// Open (creating if missing) the database at `url`, e.g. `sqlite://schemarest.db`.
    pub async fn connect(url: &str) -> Result<Self, AppError> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5));
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;
        tracing::info!(url = %url, "store opened");
        Ok(Self::from_pool(pool))
    }

    /// Private in-memory database. A single connection that never expires keeps it alive.
    pub async fn in_memory() -> Result<Self, AppError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;
        Ok(Self::from_pool(pool))
    }

    pub fn from_pool(pool: SqlitePool) -> Self {
        Store {
            pool,
            write_gate: Arc::new(Mutex::new(())),
        }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Wait for the write gate, then begin a transaction.
    pub async fn begin_write(&self) -> Result<WriteTxn<'_>, AppError> {
        let gate = self.write_gate.lock().await;
        let tx = self.pool.begin().await?;
        Ok(WriteTxn { tx, _gate: gate })
    }

    pub async fn ping(&self) -> bool {
        sqlx::query("SELECT 1").fetch_optional(&self.pool).await.is_ok()
    }
}

impl WriteTxn<'_> {
    pub fn conn(&mut self) -> &mut SqliteConnection {
        &mut self.tx
    }

    pub async fn commit(self) -> Result<(), AppError> {
        self.tx.commit().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn uncommitted_write_rolls_back() {
        let store = Store::in_memory().await.unwrap();
        sqlx::query("CREATE TABLE t (x INTEGER)")
            .execute(store.pool())
            .await
            .unwrap();

        {
            let mut txn = store.begin_write().await.unwrap();
            sqlx::query("INSERT INTO t (x) VALUES (1)")
                .execute(txn.conn())
                .await
                .unwrap();
        }

        let mut txn = store.begin_write().await.unwrap();
        sqlx::query("INSERT INTO t (x) VALUES (2)")
            .execute(txn.conn())
            .await
            .unwrap();
        txn.commit().await.unwrap();

        let rows: Vec<(i64,)> = sqlx::query_as("SELECT x FROM t")
            .fetch_all(store.pool())
            .await
            .unwrap();
        assert_eq!(rows, vec![(2,)]);
    }

    #[tokio::test]
    async fn ping_reports_live_store() {
        let store = Store::in_memory().await.unwrap();
        assert!(store.ping().await);
    }
}
