//! Request-scoped database session.
//!
//! A [`DbSession`] borrows nothing from the pool until its first
//! [`DbSession::handle`] call, which opens a transaction that is reused for
//! the rest of the request. The transaction ends exactly once: by
//! [`DbSession::commit`], [`DbSession::rollback`], or by being dropped, in
//! which case `SeaORM` rolls it back and returns the connection to the pool.
//!
//! SQLite begins these transactions deferred. Callers that write must issue
//! a write as the first statement; a read followed by a write fails with
//! `SQLITE_BUSY` instead of waiting when another writer is active.

use sea_orm::{DatabaseConnection, DatabaseTransaction, DbErr, TransactionTrait};

pub struct DbSession {
    conn: DatabaseConnection,
    txn: Option<DatabaseTransaction>,
}

impl DbSession {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn, txn: None }
    }

    /// Whether a transaction has been opened on this session.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.txn.is_some()
    }

    /// The session's transaction, begun on first use. Blocks while the pool
    /// has no free connection.
    pub async fn handle(&mut self) -> Result<&DatabaseTransaction, DbErr> {
        let txn = match self.txn.take() {
            Some(txn) => txn,
            None => self.conn.begin().await?,
        };
        let txn: &DatabaseTransaction = self.txn.insert(txn);
        Ok(txn)
    }

    /// Commits the open transaction, if any.
    pub async fn commit(mut self) -> Result<(), DbErr> {
        if let Some(txn) = self.txn.take() {
            txn.commit().await?;
        }
        Ok(())
    }

    /// Discards the open transaction, if any.
    pub async fn rollback(mut self) -> Result<(), DbErr> {
        if let Some(txn) = self.txn.take() {
            txn.rollback().await?;
        }
        Ok(())
    }
}

impl Drop for DbSession {
    fn drop(&mut self) {
        if self.txn.is_some() {
            tracing::debug!("Request ended with an open transaction; rolling back");
        }
    }
}
