use crate::domain_model::*;

#[derive(Debug, thiserror::Error)]
pub enum UserError {
    #[error("invalid user: {0}")]
    Validation(#[from] ProfileError),
    #[error("user with ID {0} not found")]
    NotFound(UserUuid),
    #[error("store error: {0}")]
    Store(String),
}

/// Record access layer: every operation addresses users by their external id.
#[async_trait::async_trait]
pub trait UserService: Send + Sync {
    async fn create(&self, profile: UserProfile) -> Result<User, UserError>;
    async fn lookup(&self, uuid: UserUuid) -> Result<User, UserError>;
    async fn update(&self, uuid: UserUuid, profile: UserProfile) -> Result<User, UserError>;
    /// Unknown ids are not an error.
    async fn delete(&self, uuid: UserUuid) -> Result<(), UserError>;
    async fn list_all(&self) -> Result<Vec<User>, UserError>;
}
