use crate::application_port::{UserError, UserService};
use crate::domain_model::*;
use crate::domain_port::{TxManager, UserRepo, UuidMapRepo};
use crate::logger::*;
use chrono::{SubsecRound, Utc};
use std::sync::Arc;

pub struct RealUserService {
    user_repo: Arc<dyn UserRepo>,
    uuid_map_repo: Arc<dyn UuidMapRepo>,
    tx_manager: Arc<dyn TxManager>,
}

impl RealUserService {
    pub fn new(
        user_repo: Arc<dyn UserRepo>,
        uuid_map_repo: Arc<dyn UuidMapRepo>,
        tx_manager: Arc<dyn TxManager>,
    ) -> RealUserService {
        RealUserService {
            user_repo,
            uuid_map_repo,
            tx_manager,
        }
    }
}

fn store_error(e: anyhow::Error) -> UserError {
    UserError::Store(format!("{e:#}"))
}

// Each write opens one transaction; returning early with `?` drops it uncommitted,
// which rolls back every statement issued so far.
#[async_trait::async_trait]
impl UserService for RealUserService {
    async fn create(&self, profile: UserProfile) -> Result<User, UserError> {
        profile.validate()?;

        let uuid = UserUuid::new();
        let created_at = Utc::now().trunc_subsecs(0);

        let mut tx = self.tx_manager.begin_write().await.map_err(store_error)?;

        let key = self
            .user_repo
            .insert_in_tx(&mut *tx, &profile, created_at)
            .await?;
        self.uuid_map_repo.bind_in_tx(&mut *tx, uuid, key).await?;

        tx.commit().await.map_err(store_error)?;

        debug!(%uuid, %key, "user created");
        Ok(User {
            uuid,
            profile,
            created_at,
        })
    }

    async fn lookup(&self, uuid: UserUuid) -> Result<User, UserError> {
        self.user_repo
            .find_by_uuid(uuid)
            .await?
            .map(User::from)
            .ok_or(UserError::NotFound(uuid))
    }

    async fn update(&self, uuid: UserUuid, profile: UserProfile) -> Result<User, UserError> {
        profile.validate()?;

        let mut tx = self.tx_manager.begin_write().await.map_err(store_error)?;

        let key = self
            .uuid_map_repo
            .resolve_in_tx(&mut *tx, uuid)
            .await?
            .ok_or(UserError::NotFound(uuid))?;
        self.user_repo.update_in_tx(&mut *tx, key, &profile).await?;
        let record = self
            .user_repo
            .find_by_uuid_in_tx(&mut *tx, uuid)
            .await?
            .ok_or(UserError::NotFound(uuid))?;

        tx.commit().await.map_err(store_error)?;

        debug!(%uuid, %key, "user updated");
        Ok(record.into())
    }

    async fn delete(&self, uuid: UserUuid) -> Result<(), UserError> {
        let mut tx = self.tx_manager.begin_write().await.map_err(store_error)?;

        match self.uuid_map_repo.resolve_in_tx(&mut *tx, uuid).await? {
            Some(key) => {
                self.user_repo.delete_in_tx(&mut *tx, key).await?;
                self.uuid_map_repo.unbind_in_tx(&mut *tx, uuid).await?;
                tx.commit().await.map_err(store_error)?;
                debug!(%uuid, %key, "user deleted");
            }
            None => {
                tx.rollback().await.map_err(store_error)?;
                debug!(%uuid, "delete of unknown user ignored");
            }
        }

        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<User>, UserError> {
        let records = self.user_repo.list().await?;
        Ok(records.into_iter().map(User::from).collect())
    }
}
