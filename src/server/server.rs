use crate::application_impl::*;
use crate::application_port::*;
use crate::domain_port::*;
use crate::infra_sqlite::*;
use crate::logger::*;
use crate::settings::Settings;
use sqlx::SqlitePool;
use std::sync::Arc;

/// Composition root: built once at start-up and handed to every route.
pub struct Server {
    pub user_service: Arc<dyn UserService>,
    pool: Option<SqlitePool>,
}

impl Server {
    pub async fn try_new(settings: &Settings) -> anyhow::Result<Self> {
        let (user_service, pool): (Arc<dyn UserService>, Option<SqlitePool>) =
            match settings.user.backend.as_str() {
                "fake" => (Arc::new(FakeUserService::new()), None),
                "real" => {
                    let pool = connect(&settings.store).await?;
                    let tx_manager: Arc<dyn TxManager> =
                        Arc::new(SqliteTxManager::new(pool.clone()));
                    let user_repo: Arc<dyn UserRepo> = Arc::new(SqliteUserRepo::new(pool.clone()));
                    let uuid_map_repo: Arc<dyn UuidMapRepo> = Arc::new(SqliteUuidMapRepo::new());

                    let service = RealUserService::new(user_repo, uuid_map_repo, tx_manager);
                    (Arc::new(service), Some(pool))
                }
                other => return Err(anyhow::anyhow!("Unknown user backend: {}", other)),
            };

        info!(backend = %settings.user.backend, "server started");

        Ok(Self { user_service, pool })
    }

    pub async fn shutdown(&self) {
        info!("server shutting down...");

        if let Some(pool) = &self.pool {
            pool.close().await;
        }
    }
}
