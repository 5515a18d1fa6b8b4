use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::repo_tx::StorageTx;

/// The `uuid_map` table: external identifier to internal key.
#[async_trait::async_trait]
pub trait UuidMapRepo: Send + Sync {
    async fn bind_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        uuid: UserUuid,
        key: UserKey,
    ) -> Result<(), UserError>;

    async fn resolve_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        uuid: UserUuid,
    ) -> Result<Option<UserKey>, UserError>;

    /// Returns the number of mapping rows removed.
    async fn unbind_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        uuid: UserUuid,
    ) -> Result<u64, UserError>;
}
