use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Client-facing identifier of a user. Never reused.
#[derive(Debug, Clone, Copy, Ord, PartialOrd, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserUuid(pub uuid::Uuid);

impl UserUuid {
    pub fn new() -> Self {
        UserUuid(uuid::Uuid::new_v4())
    }
}

impl Default for UserUuid {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserUuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for UserUuid {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        uuid::Uuid::from_str(s).map(UserUuid)
    }
}

/// Store-assigned row key. Stays inside the storage layer and is never serialized.
#[derive(Debug, Clone, Copy, Ord, PartialOrd, Eq, PartialEq, Hash)]
pub struct UserKey(pub i64);

impl fmt::Display for UserKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub const MAX_USERNAME_CHARS: usize = 64;
pub const MAX_AGE: u32 = 150;
pub const MAX_EMAIL_CHARS: usize = 254;
pub const MAX_PHONE_CHARS: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProfileError {
    #[error("username must not be blank")]
    BlankUsername,
    #[error("username is longer than 64 characters")]
    UsernameTooLong,
    #[error("age {0} is out of range (0..=150)")]
    AgeOutOfRange(u32),
    #[error("invalid email address: {0:?}")]
    InvalidEmail(String),
    #[error("invalid phone number: {0:?}")]
    InvalidPhone(String),
}

/// The mutable part of a user record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub username: String,
    pub age: u32,
    pub email: String,
    pub phone: String,
}

impl UserProfile {
    pub fn validate(&self) -> Result<(), ProfileError> {
        if self.username.trim().is_empty() {
            return Err(ProfileError::BlankUsername);
        }
        if self.username.chars().count() > MAX_USERNAME_CHARS {
            return Err(ProfileError::UsernameTooLong);
        }
        if self.age > MAX_AGE {
            return Err(ProfileError::AgeOutOfRange(self.age));
        }
        if !is_valid_email(&self.email) {
            return Err(ProfileError::InvalidEmail(self.email.clone()));
        }
        if !is_valid_phone(&self.phone) {
            return Err(ProfileError::InvalidPhone(self.phone.clone()));
        }
        Ok(())
    }
}

fn is_valid_email(email: &str) -> bool {
    if email.chars().count() > MAX_EMAIL_CHARS || email.chars().any(char::is_whitespace) {
        return false;
    }
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !domain.contains('@'),
        None => false,
    }
}

fn is_valid_phone(phone: &str) -> bool {
    let len = phone.chars().count();
    (1..=MAX_PHONE_CHARS).contains(&len)
        && phone
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '+' | '-' | '(' | ')' | '.'))
        && phone.chars().any(|c| c.is_ascii_digit())
}

/// A user as seen from outside the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub uuid: UserUuid,
    pub profile: UserProfile,
    pub created_at: DateTime<Utc>,
}
