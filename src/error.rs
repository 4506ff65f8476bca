//! Crate-wide error type and its HTTP mapping.
//!
//! Cell- and row-level scraping problems are not errors: they are logged
//! warnings and the affected value or row is dropped. Only transport-level
//! failures, caller mistakes, and storage faults surface here.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The upstream report site timed out, refused the connection, or
    /// answered with a non-success status. Distinct from "no data".
    #[error("upstream unavailable: {0}")]
    UpstreamUnavailable(#[from] reqwest::Error),

    /// The requested category or subtype path is not in the fixed map.
    #[error("unknown category: {0}")]
    UnknownCategory(String),

    /// `ano` outside the supported range.
    #[error("ano must be between {min} and {max}, got {got}")]
    InvalidYear { got: i32, min: i32, max: i32 },

    /// Username/password pair rejected, or the account is disabled.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Bearer token missing, malformed, expired, or with a bad signature.
    #[error("could not validate credentials")]
    InvalidToken,

    #[error("cache error: {0}")]
    Cache(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match &self {
            Error::UpstreamUnavailable(_) => StatusCode::BAD_GATEWAY,
            Error::UnknownCategory(_) => StatusCode::NOT_FOUND,
            Error::InvalidYear { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Error::InvalidCredentials | Error::InvalidToken => StatusCode::UNAUTHORIZED,
            Error::Cache(_) | Error::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({ "detail": self.to_string() }));

        if status == StatusCode::UNAUTHORIZED {
            // Token endpoints advertise the bearer scheme, like any OAuth2 surface.
            (status, [(header::WWW_AUTHENTICATE, "Bearer")], body).into_response()
        } else {
            (status, body).into_response()
        }
    }
}
