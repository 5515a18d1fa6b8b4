use crate::application_port::*;
use std::convert::Infallible;
use thiserror::Error;
use tracing::warn;
use warp::body::BodyDeserializeError;
use warp::http::StatusCode;
use warp::reject::{
    InvalidQuery, LengthRequired, MethodNotAllowed, PayloadTooLarge, UnsupportedMediaType,
};
use warp::{Rejection, reject};

/// Turns every rejection into a status code with the error text as a plain body.
///
/// A request that reached a route's body or query filter has matched that route's
/// method, so those rejections outrank a `MethodNotAllowed` collected from a sibling
/// filter further down the `or` chain.
pub async fn recover_error(err: Rejection) -> Result<impl warp::Reply, Infallible> {
    let (status, message) = if let Some(err) = err.find::<ApiError>() {
        (err.status(), err.to_string())
    } else if let Some(err) = err.find::<BodyDeserializeError>() {
        (StatusCode::BAD_REQUEST, err.to_string())
    } else if let Some(err) = err.find::<InvalidQuery>() {
        (StatusCode::BAD_REQUEST, err.to_string())
    } else if let Some(err) = err.find::<LengthRequired>() {
        (StatusCode::LENGTH_REQUIRED, err.to_string())
    } else if let Some(err) = err.find::<PayloadTooLarge>() {
        (StatusCode::PAYLOAD_TOO_LARGE, err.to_string())
    } else if let Some(err) = err.find::<UnsupportedMediaType>() {
        (StatusCode::UNSUPPORTED_MEDIA_TYPE, err.to_string())
    } else if err.find::<MethodNotAllowed>().is_some() {
        (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed".to_string())
    } else if err.is_not_found() {
        (StatusCode::NOT_FOUND, "Not found".to_string())
    } else {
        warn!("Unhandled rejection: {:?}", err);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Unhandled error: {:?}", err),
        )
    };

    Ok(warp::reply::with_status(message, status))
}

#[derive(Debug, Clone, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn internal<E: std::fmt::Display>(error: E) -> ApiError {
        warn!("Internal error: {}", error);
        ApiError::Internal(error.to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl reject::Reject for ApiError {}

impl From<UserError> for ApiError {
    fn from(error: UserError) -> Self {
        match error {
            e @ UserError::Validation(_) => ApiError::BadRequest(e.to_string()),
            e @ UserError::NotFound(_) => ApiError::NotFound(e.to_string()),
            e @ UserError::Store(_) => ApiError::internal(e),
        }
    }
}
