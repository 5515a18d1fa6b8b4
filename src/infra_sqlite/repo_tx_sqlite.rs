use crate::domain_port::{StorageTx, TxManager};
use crate::logger::*;
use anyhow::Context;
use sqlx::{Sqlite, SqliteConnection, SqlitePool, Transaction};

// A deferred `BEGIN` takes a read lock first and must upgrade it on the first
// write; SQLite fails that upgrade with SQLITE_BUSY straight away instead of
// waiting out the busy timeout.
const BEGIN_WRITE: &str = "BEGIN IMMEDIATE";

pub struct SqliteTxManager {
    pool: SqlitePool,
}

impl SqliteTxManager {
    pub fn new(pool: SqlitePool) -> Self {
        SqliteTxManager { pool }
    }
}

#[async_trait::async_trait]
impl TxManager for SqliteTxManager {
    async fn begin_write<'t>(&'t self) -> anyhow::Result<Box<dyn StorageTx<'t> + 't>> {
        let tx = self
            .pool
            .begin_with(BEGIN_WRITE)
            .await
            .context("begin write transaction")?;
        trace!("write transaction opened");
        Ok(Box::new(SqliteTx { inner: tx }))
    }
}

/// A sqlx transaction on the SQLite pool.
pub struct SqliteTx<'t> {
    inner: Transaction<'t, Sqlite>,
}

impl<'t> SqliteTx<'t> {
    pub const STORE: &'static str = "sqlite";

    pub fn conn(&mut self) -> &mut SqliteConnection {
        &mut self.inner
    }
}

#[async_trait::async_trait]
impl<'t> StorageTx<'t> for SqliteTx<'t> {
    fn store(&self) -> &'static str {
        Self::STORE
    }

    async fn commit(self: Box<Self>) -> anyhow::Result<()> {
        self.inner.commit().await.context("commit transaction")
    }

    async fn rollback(self: Box<Self>) -> anyhow::Result<()> {
        self.inner.rollback().await.context("roll back transaction")
    }
}
