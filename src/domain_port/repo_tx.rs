/// Opens transactions on the store behind the repositories.
#[async_trait::async_trait]
pub trait TxManager: Send + Sync {
    /// Opens a transaction that holds the store's write lock from its first
    /// statement. Every user write reads the UUID mapping before writing, and a
    /// lock taken up front is waited for instead of failing mid-transaction.
    async fn begin_write<'t>(&'t self) -> anyhow::Result<Box<dyn StorageTx<'t> + 't>>;
}

/// An open store transaction. Dropping it without `commit` rolls it back.
#[async_trait::async_trait]
pub trait StorageTx<'t>: Send {
    /// Name of the store driving this transaction. Repositories check it before
    /// reaching for the driver connection underneath.
    fn store(&self) -> &'static str;

    async fn commit(self: Box<Self>) -> anyhow::Result<()>;
    async fn rollback(self: Box<Self>) -> anyhow::Result<()>;
}
