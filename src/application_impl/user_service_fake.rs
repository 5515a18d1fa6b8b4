use crate::application_port::{UserError, UserService};
use crate::domain_model::*;
use chrono::{SubsecRound, Utc};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
struct Tables {
    next_key: i64,
    users: BTreeMap<UserKey, User>,
    uuid_map: HashMap<UserUuid, UserKey>,
}

// In-memory stand-in for the SQLite backend, selected with `user.backend = "fake"`.
// Keeps the same key indirection so the HTTP layer can be exercised without a store.
#[derive(Debug, Default)]
pub struct FakeUserService {
    tables: Mutex<Tables>,
}

impl FakeUserService {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> Result<MutexGuard<'_, Tables>, UserError> {
        self.tables
            .lock()
            .map_err(|e| UserError::Store(format!("fake tables poisoned: {e}")))
    }
}

#[async_trait::async_trait]
impl UserService for FakeUserService {
    async fn create(&self, profile: UserProfile) -> Result<User, UserError> {
        profile.validate()?;

        let mut tables = self.tables()?;
        tables.next_key += 1;
        let key = UserKey(tables.next_key);
        let user = User {
            uuid: UserUuid::new(),
            profile,
            created_at: Utc::now().trunc_subsecs(0),
        };
        tables.users.insert(key, user.clone());
        tables.uuid_map.insert(user.uuid, key);
        Ok(user)
    }

    async fn lookup(&self, uuid: UserUuid) -> Result<User, UserError> {
        let tables = self.tables()?;
        tables
            .uuid_map
            .get(&uuid)
            .and_then(|key| tables.users.get(key))
            .cloned()
            .ok_or(UserError::NotFound(uuid))
    }

    async fn update(&self, uuid: UserUuid, profile: UserProfile) -> Result<User, UserError> {
        profile.validate()?;

        let mut tables = self.tables()?;
        let key = *tables
            .uuid_map
            .get(&uuid)
            .ok_or(UserError::NotFound(uuid))?;
        let user = tables
            .users
            .get_mut(&key)
            .ok_or(UserError::NotFound(uuid))?;
        user.profile = profile;
        Ok(user.clone())
    }

    async fn delete(&self, uuid: UserUuid) -> Result<(), UserError> {
        let mut tables = self.tables()?;
        if let Some(key) = tables.uuid_map.remove(&uuid) {
            tables.users.remove(&key);
        }
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<User>, UserError> {
        Ok(self.tables()?.users.values().cloned().collect())
    }
}
