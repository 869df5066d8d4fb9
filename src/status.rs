//! HTTP status codes as a typed enum.
//!
//! Use [`Status`] anywhere a status code is accepted: `Response::status()`,
//! `Response::builder().status()`, or as a bare handler return value.
//!
//! ```rust
//! use wares::{Response, Status};
//!
//! Response::builder()
//!     .status(Status::Created)
//!     .json(br#"{"id":5}"#.to_vec());
//! ```

/// The status codes the product API produces.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Status {
    // ── 2xx Success ───────────────────────────────────────────────────────────
    Ok,                  // 200
    Created,             // 201

    // ── 4xx Client errors ─────────────────────────────────────────────────────
    BadRequest,          // 400
    NotFound,            // 404
    Conflict,            // 409

    // ── 5xx Server errors ─────────────────────────────────────────────────────
    InternalServerError, // 500
}

impl From<Status> for u16 {
    fn from(s: Status) -> u16 {
        match s {
            Status::Ok                  => 200,
            Status::Created             => 201,
            Status::BadRequest          => 400,
            Status::NotFound            => 404,
            Status::Conflict            => 409,
            Status::InternalServerError => 500,
        }
    }
}

impl From<Status> for http::StatusCode {
    fn from(s: Status) -> Self {
        match s {
            Status::Ok                  => Self::OK,
            Status::Created             => Self::CREATED,
            Status::BadRequest          => Self::BAD_REQUEST,
            Status::NotFound            => Self::NOT_FOUND,
            Status::Conflict            => Self::CONFLICT,
            Status::InternalServerError => Self::INTERNAL_SERVER_ERROR,
        }
    }
}
