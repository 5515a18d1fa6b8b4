use super::util::{downcast, store_error};
use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

const SELECT_JOINED: &str = r#"
SELECT u.id, m.uuid, u.username, u.age, u.email, u.phone, u.createAt
FROM users u
JOIN uuid_map m ON u.id = m.user_id
"#;

pub struct SqliteUserRepo {
    pool: SqlitePool,
}

impl SqliteUserRepo {
    pub fn new(pool: SqlitePool) -> Self {
        SqliteUserRepo { pool }
    }

    fn by_uuid_sql() -> String {
        format!("{SELECT_JOINED}WHERE m.uuid = ?")
    }

    fn row_to_record(row: SqliteRow) -> Result<UserRecord, UserError> {
        let key: i64 = row.try_get("id").map_err(store_error("decode id"))?;

        let uuid: String = row.try_get("uuid").map_err(store_error("decode uuid"))?;
        let uuid = uuid
            .parse::<UserUuid>()
            .map_err(|e| UserError::Store(format!("decode uuid {uuid:?}: {e}")))?;

        let username: String = row
            .try_get("username")
            .map_err(store_error("decode username"))?;
        let age: i64 = row.try_get("age").map_err(store_error("decode age"))?;
        let age = u32::try_from(age)
            .map_err(|e| UserError::Store(format!("decode age {age}: {e}")))?;
        let email: String = row.try_get("email").map_err(store_error("decode email"))?;
        let phone: String = row.try_get("phone").map_err(store_error("decode phone"))?;

        let created_at: String = row
            .try_get("createAt")
            .map_err(store_error("decode createAt"))?;
        let created_at = DateTime::parse_from_rfc3339(&created_at)
            .map_err(|e| UserError::Store(format!("decode createAt {created_at:?}: {e}")))?
            .with_timezone(&Utc);

        Ok(UserRecord {
            key: UserKey(key),
            uuid,
            profile: UserProfile {
                username,
                age,
                email,
                phone,
            },
            created_at,
        })
    }
}

#[async_trait::async_trait]
impl UserRepo for SqliteUserRepo {
    async fn insert_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        profile: &UserProfile,
        created_at: DateTime<Utc>,
    ) -> Result<UserKey, UserError> {
        let tx = downcast(tx)?;

        let result = sqlx::query(
            r#"
INSERT INTO users (username, age, email, phone, createAt)
VALUES (?, ?, ?, ?, ?)
"#,
        )
        .bind(&profile.username)
        .bind(i64::from(profile.age))
        .bind(&profile.email)
        .bind(&profile.phone)
        .bind(created_at.to_rfc3339_opts(SecondsFormat::Secs, true))
        .execute(tx.conn())
        .await
        .map_err(store_error("insert user"))?;

        Ok(UserKey(result.last_insert_rowid()))
    }

    async fn find_by_uuid(&self, uuid: UserUuid) -> Result<Option<UserRecord>, UserError> {
        let row_opt: Option<SqliteRow> = sqlx::query(&Self::by_uuid_sql())
            .bind(uuid.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(store_error("query user"))?;

        row_opt.map(Self::row_to_record).transpose()
    }

    async fn find_by_uuid_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        uuid: UserUuid,
    ) -> Result<Option<UserRecord>, UserError> {
        let tx = downcast(tx)?;

        let row_opt: Option<SqliteRow> = sqlx::query(&Self::by_uuid_sql())
            .bind(uuid.to_string())
            .fetch_optional(tx.conn())
            .await
            .map_err(store_error("query user"))?;

        row_opt.map(Self::row_to_record).transpose()
    }

    async fn update_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        key: UserKey,
        profile: &UserProfile,
    ) -> Result<u64, UserError> {
        let tx = downcast(tx)?;

        let result = sqlx::query(
            r#"
UPDATE users SET username = ?, age = ?, email = ?, phone = ?
WHERE id = ?
"#,
        )
        .bind(&profile.username)
        .bind(i64::from(profile.age))
        .bind(&profile.email)
        .bind(&profile.phone)
        .bind(key.0)
        .execute(tx.conn())
        .await
        .map_err(store_error("update user"))?;

        Ok(result.rows_affected())
    }

    async fn delete_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        key: UserKey,
    ) -> Result<u64, UserError> {
        let tx = downcast(tx)?;

        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(key.0)
            .execute(tx.conn())
            .await
            .map_err(store_error("delete user"))?;

        Ok(result.rows_affected())
    }

    async fn list(&self) -> Result<Vec<UserRecord>, UserError> {
        let rows = sqlx::query(&format!("{SELECT_JOINED}ORDER BY u.id"))
            .fetch_all(&self.pool)
            .await
            .map_err(store_error("list users"))?;

        rows.into_iter().map(Self::row_to_record).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra_sqlite::{SqliteTxManager, SqliteUuidMapRepo, connect};
    use crate::settings::Store;
    use chrono::TimeZone;

    async fn pool() -> SqlitePool {
        connect(&Store {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
        })
        .await
        .unwrap()
    }

    fn profile() -> UserProfile {
        UserProfile {
            username: "alice".to_string(),
            age: 30,
            email: "a@x.com".to_string(),
            phone: "555".to_string(),
        }
    }

    #[tokio::test]
    async fn unmapped_rows_are_invisible() {
        let pool = pool().await;
        let repo = SqliteUserRepo::new(pool.clone());
        let tx_manager = SqliteTxManager::new(pool.clone());
        let created_at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();

        let mut tx = tx_manager.begin_write().await.unwrap();
        let key = repo
            .insert_in_tx(&mut *tx, &profile(), created_at)
            .await
            .unwrap();
        tx.commit().await.unwrap();

        assert_eq!(key, UserKey(1));
        assert!(repo.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn joined_read_carries_uuid_and_timestamp() {
        let pool = pool().await;
        let repo = SqliteUserRepo::new(pool.clone());
        let uuid_map = SqliteUuidMapRepo::new();
        let tx_manager = SqliteTxManager::new(pool.clone());
        let created_at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let uuid = UserUuid::new();

        let mut tx = tx_manager.begin_write().await.unwrap();
        let key = repo
            .insert_in_tx(&mut *tx, &profile(), created_at)
            .await
            .unwrap();
        uuid_map.bind_in_tx(&mut *tx, uuid, key).await.unwrap();
        tx.commit().await.unwrap();

        let stored: String = sqlx::query_scalar("SELECT createAt FROM users WHERE id = ?")
            .bind(key.0)
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(stored, "2024-05-01T12:00:00Z");

        let record = repo.find_by_uuid(uuid).await.unwrap().unwrap();
        assert_eq!(record.key, key);
        assert_eq!(record.uuid, uuid);
        assert_eq!(record.profile, profile());
        assert_eq!(record.created_at, created_at);
    }

    #[tokio::test]
    async fn update_and_delete_report_affected_rows() {
        let pool = pool().await;
        let repo = SqliteUserRepo::new(pool.clone());
        let tx_manager = SqliteTxManager::new(pool.clone());

        let mut tx = tx_manager.begin_write().await.unwrap();
        let key = repo
            .insert_in_tx(&mut *tx, &profile(), Utc::now())
            .await
            .unwrap();
        let changed = UserProfile {
            age: 31,
            ..profile()
        };
        assert_eq!(repo.update_in_tx(&mut *tx, key, &changed).await.unwrap(), 1);
        assert_eq!(repo.delete_in_tx(&mut *tx, key).await.unwrap(), 1);
        assert_eq!(repo.delete_in_tx(&mut *tx, key).await.unwrap(), 0);
        tx.commit().await.unwrap();
    }
}
