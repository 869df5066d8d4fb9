//! Unified error types.

use thiserror::Error as ThisError;
use tracing::{error, warn};

use crate::config::ConfigError;
use crate::response::{IntoResponse, Response};
use crate::status::Status;
use crate::store::StoreError;

/// The error type returned by wares' fallible startup operations.
///
/// Request-level failures are [`ApiError`] values and always become HTTP
/// responses. This type surfaces infrastructure failures: reading
/// configuration, opening the backing file, binding to a port.
#[derive(Debug, ThisError)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("config: {0}")]
    Config(#[from] ConfigError),

    #[error("store: {0}")]
    Store(#[from] StoreError),
}

/// Every way a request can fail.
///
/// Handlers return `Result<_, ApiError>`; the conversion below is the single
/// place that decides what the client sees. Client mistakes map to 4xx with a
/// `{"message": …}` body. Faults inside the service are logged and answered
/// with a 500 rather than leaving the request hanging.
#[derive(Debug, ThisError)]
pub enum ApiError {
    /// A product id with no match.
    #[error("{0}")]
    NotFound(&'static str),

    /// A create whose id is already taken.
    #[error("{0}")]
    Conflict(&'static str),

    /// No route matched; carries the request target as sent.
    #[error("Not Found - {0}")]
    RouteNotFound(String),

    /// The body could not be read or is not the expected JSON shape.
    #[error("invalid request body: {0}")]
    BadRequest(String),

    /// A handler failed in a way the client could not have caused.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        Self::BadRequest(e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::NotFound(msg) => Response::message(Status::NotFound, msg),
            Self::Conflict(msg) => Response::message(Status::Conflict, msg),
            Self::RouteNotFound(target) => {
                Response::message(Status::NotFound, format!("Not Found - {target}"))
            }
            Self::BadRequest(reason) => {
                warn!(%reason, "rejected request body");
                Response::message(Status::BadRequest, "Invalid request body")
            }
            Self::Internal(reason) => {
                error!(%reason, "handler fault");
                Response::message(Status::InternalServerError, "Internal Server Error")
            }
        }
    }
}
