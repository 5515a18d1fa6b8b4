use super::util::{downcast, store_error};
use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;

/// Holds no pool: every mapping statement runs inside a caller-owned transaction.
#[derive(Debug, Default)]
pub struct SqliteUuidMapRepo;

impl SqliteUuidMapRepo {
    pub fn new() -> Self {
        SqliteUuidMapRepo
    }
}

#[async_trait::async_trait]
impl UuidMapRepo for SqliteUuidMapRepo {
    async fn bind_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        uuid: UserUuid,
        key: UserKey,
    ) -> Result<(), UserError> {
        let tx = downcast(tx)?;

        sqlx::query("INSERT INTO uuid_map (user_id, uuid) VALUES (?, ?)")
            .bind(key.0)
            .bind(uuid.to_string())
            .execute(tx.conn())
            .await
            .map_err(store_error("insert uuid mapping"))?;

        Ok(())
    }

    async fn resolve_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        uuid: UserUuid,
    ) -> Result<Option<UserKey>, UserError> {
        let tx = downcast(tx)?;

        let key: Option<i64> = sqlx::query_scalar("SELECT user_id FROM uuid_map WHERE uuid = ?")
            .bind(uuid.to_string())
            .fetch_optional(tx.conn())
            .await
            .map_err(store_error("resolve uuid"))?;

        Ok(key.map(UserKey))
    }

    async fn unbind_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        uuid: UserUuid,
    ) -> Result<u64, UserError> {
        let tx = downcast(tx)?;

        let result = sqlx::query("DELETE FROM uuid_map WHERE uuid = ?")
            .bind(uuid.to_string())
            .execute(tx.conn())
            .await
            .map_err(store_error("delete uuid mapping"))?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra_sqlite::{SqliteTxManager, connect};
    use crate::settings::Store;

    #[tokio::test]
    async fn bind_resolve_unbind() {
        let pool = connect(&Store {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
        })
        .await
        .unwrap();
        let repo = SqliteUuidMapRepo::new();
        let tx_manager = SqliteTxManager::new(pool.clone());
        let uuid = UserUuid::new();

        let mut tx = tx_manager.begin_write().await.unwrap();
        assert_eq!(repo.resolve_in_tx(&mut *tx, uuid).await.unwrap(), None);
        repo.bind_in_tx(&mut *tx, uuid, UserKey(7)).await.unwrap();
        assert_eq!(
            repo.resolve_in_tx(&mut *tx, uuid).await.unwrap(),
            Some(UserKey(7))
        );
        assert!(repo.bind_in_tx(&mut *tx, uuid, UserKey(8)).await.is_err());
        assert_eq!(repo.unbind_in_tx(&mut *tx, uuid).await.unwrap(), 1);
        assert_eq!(repo.unbind_in_tx(&mut *tx, uuid).await.unwrap(), 0);
        tx.commit().await.unwrap();
    }

    #[tokio::test]
    async fn rolled_back_binding_is_gone() {
        let pool = connect(&Store {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
        })
        .await
        .unwrap();
        let repo = SqliteUuidMapRepo::new();
        let tx_manager = SqliteTxManager::new(pool.clone());
        let uuid = UserUuid::new();

        let mut tx = tx_manager.begin_write().await.unwrap();
        repo.bind_in_tx(&mut *tx, uuid, UserKey(1)).await.unwrap();
        tx.rollback().await.unwrap();

        let mut tx = tx_manager.begin_write().await.unwrap();
        assert_eq!(repo.resolve_in_tx(&mut *tx, uuid).await.unwrap(), None);
        tx.commit().await.unwrap();
    }
}
