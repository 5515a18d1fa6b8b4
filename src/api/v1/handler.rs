use super::error::*;
use crate::application_port::UserService;
use crate::domain_model::{User, UserProfile, UserUuid};
use crate::logger::*;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize, Serializer};
use std::sync::Arc;
use warp::{self, reject};

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub uuid: UserUuid,
    pub username: String,
    pub age: u32,
    pub email: String,
    pub phone: String,
    #[serde(rename = "createAt", serialize_with = "rfc3339_seconds")]
    pub create_at: DateTime<Utc>,
}

fn rfc3339_seconds<S: Serializer>(at: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&at.to_rfc3339_opts(SecondsFormat::Secs, true))
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        UserResponse {
            uuid: user.uuid,
            username: user.profile.username,
            age: user.profile.age,
            email: user.profile.email,
            phone: user.profile.phone,
            create_at: user.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AddUserRequest {
    pub username: String,
    pub age: u32,
    pub email: String,
    pub phone: String,
}

impl From<AddUserRequest> for UserProfile {
    fn from(body: AddUserRequest) -> Self {
        UserProfile {
            username: body.username,
            age: body.age,
            email: body.email,
            phone: body.phone,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub uuid: String,
    pub username: String,
    pub age: u32,
    pub email: String,
    pub phone: String,
}

impl UpdateUserRequest {
    /// Splits the body into the raw id and the replacement profile.
    pub fn into_parts(self) -> (String, UserProfile) {
        let profile = UserProfile {
            username: self.username,
            age: self.age,
            email: self.email,
            phone: self.phone,
        };
        (self.uuid, profile)
    }
}

#[derive(Debug, Deserialize)]
pub struct IdQuery {
    pub id: Option<String>,
}

fn parse_uuid(raw: &str) -> Result<UserUuid, warp::Rejection> {
    raw.parse::<UserUuid>()
        .map_err(|e| ApiError::BadRequest(format!("invalid user ID {raw:?}: {e}")))
        .map_err(reject::custom)
}

fn required_id(query: IdQuery) -> Result<UserUuid, warp::Rejection> {
    match query.id.as_deref() {
        None | Some("") => Err(reject::custom(ApiError::BadRequest(
            "ID is required".to_string(),
        ))),
        Some(raw) => parse_uuid(raw),
    }
}

pub async fn add_user(
    body: AddUserRequest,
    user_service: Arc<dyn UserService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let user = user_service
        .create(body.into())
        .await
        .map_err(ApiError::from)
        .map_err(reject::custom)?;

    info!(uuid = %user.uuid, "user added");
    Ok(warp::reply::json(&UserResponse::from(user)))
}

pub async fn get_user(
    query: IdQuery,
    user_service: Arc<dyn UserService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let uuid = required_id(query)?;

    let user = user_service
        .lookup(uuid)
        .await
        .map_err(ApiError::from)
        .map_err(reject::custom)?;

    Ok(warp::reply::json(&UserResponse::from(user)))
}

pub async fn list_users(
    user_service: Arc<dyn UserService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let users: Vec<UserResponse> = user_service
        .list_all()
        .await
        .map_err(ApiError::from)
        .map_err(reject::custom)?
        .into_iter()
        .map(UserResponse::from)
        .collect();

    Ok(warp::reply::json(&users))
}

pub async fn update_user(
    body: UpdateUserRequest,
    user_service: Arc<dyn UserService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let (raw_uuid, profile) = body.into_parts();
    let uuid = parse_uuid(&raw_uuid)?;

    let user = user_service
        .update(uuid, profile)
        .await
        .map_err(ApiError::from)
        .map_err(reject::custom)?;

    info!(%uuid, "user updated");
    Ok(warp::reply::json(&UserResponse::from(user)))
}

pub async fn delete_user(
    query: IdQuery,
    user_service: Arc<dyn UserService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let uuid = required_id(query)?;

    user_service
        .delete(uuid)
        .await
        .map_err(ApiError::from)
        .map_err(reject::custom)?;

    info!(%uuid, "user deleted");
    Ok(warp::reply())
}
