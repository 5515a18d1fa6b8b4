use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::repo_tx::StorageTx;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone)]
pub struct UserRecord {
    pub key: UserKey,
    pub uuid: UserUuid,
    pub profile: UserProfile,
    pub created_at: DateTime<Utc>,
}

impl From<UserRecord> for User {
    fn from(record: UserRecord) -> Self {
        User {
            uuid: record.uuid,
            profile: record.profile,
            created_at: record.created_at,
        }
    }
}

/// The `users` table. Reads join `uuid_map` so every record carries its external id.
#[async_trait::async_trait]
pub trait UserRepo: Send + Sync {
    async fn insert_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        profile: &UserProfile,
        created_at: DateTime<Utc>,
    ) -> Result<UserKey, UserError>;

    async fn find_by_uuid(&self, uuid: UserUuid) -> Result<Option<UserRecord>, UserError>;

    async fn find_by_uuid_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        uuid: UserUuid,
    ) -> Result<Option<UserRecord>, UserError>;

    /// Returns the number of rows changed.
    async fn update_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        key: UserKey,
        profile: &UserProfile,
    ) -> Result<u64, UserError>;

    /// Returns the number of rows removed.
    async fn delete_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        key: UserKey,
    ) -> Result<u64, UserError>;

    async fn list(&self) -> Result<Vec<UserRecord>, UserError>;
}
