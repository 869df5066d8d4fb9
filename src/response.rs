//! Outgoing HTTP response type and the [`IntoResponse`] conversion trait.
//!
//! Every response this service produces carries a JSON body. Handlers build a
//! [`Response`] directly, or return a [`Json`] value and let the conversion
//! serialize it.

use bytes::Bytes;
use http_body_util::Full;
use serde::Serialize;
use tracing::error;

use crate::status::Status;

const JSON: &str = "application/json";

// ── Response ─────────────────────────────────────────────────────────────────

/// An outgoing HTTP response.
///
/// ```rust
/// use wares::{Response, Status};
///
/// Response::builder()
///     .status(Status::Created)
///     .json(br#"{"id":42}"#.to_vec());
/// ```
#[derive(Debug)]
pub struct Response {
    pub(crate) body: Vec<u8>,
    pub(crate) headers: Vec<(String, String)>,
    pub(crate) status: Status,
}

impl Response {
    /// Builder for responses that need a custom status.
    pub fn builder() -> ResponseBuilder {
        ResponseBuilder { status: Status::Ok }
    }

    /// `{"message": …}` with the given status. The shape every error and
    /// acknowledgement body in the API uses.
    pub fn message(status: Status, message: impl Into<String>) -> Self {
        (status, Json(Message { message: message.into() })).into_response()
    }

    pub fn status(&self) -> Status { self.status }
    pub fn body(&self) -> &[u8] { &self.body }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Converts into the `http` response hyper writes to the wire.
    pub(crate) fn into_inner(self) -> http::Response<Full<Bytes>> {
        let mut builder = http::Response::builder().status(http::StatusCode::from(self.status));
        for (name, value) in &self.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder
            .body(Full::new(Bytes::from(self.body)))
            .unwrap_or_else(|e| {
                error!("invalid response header: {e}");
                let mut fallback = http::Response::new(Full::new(Bytes::new()));
                *fallback.status_mut() = http::StatusCode::INTERNAL_SERVER_ERROR;
                fallback
            })
    }
}

// ── ResponseBuilder ───────────────────────────────────────────────────────────

/// Fluent builder for [`Response`].
///
/// Obtain via [`Response::builder()`]. Defaults to `Status::Ok` (200).
pub struct ResponseBuilder {
    status: Status,
}

impl ResponseBuilder {
    pub fn status(mut self, code: Status) -> Self {
        self.status = code;
        self
    }

    /// Terminate with a JSON body (`application/json`).
    pub fn json(self, body: Vec<u8>) -> Response {
        let headers = vec![("content-type".to_owned(), JSON.to_owned())];
        Response { body, headers, status: self.status }
    }
}

// ── Json ──────────────────────────────────────────────────────────────────────

/// A serializable value returned as a `200 OK` JSON response.
///
/// Pair it with a [`Status`] to pick a different code: `(Status::Created, Json(p))`.
pub struct Json<T>(pub T);

#[derive(Serialize)]
struct Message {
    message: String,
}

fn serialize<T: Serialize>(status: Status, value: &T) -> Response {
    match serde_json::to_vec(value) {
        Ok(bytes) => Response::builder().status(status).json(bytes),
        Err(e) => {
            error!("failed to serialize response body: {e}");
            Response::builder()
                .status(Status::InternalServerError)
                .json(br#"{"message":"Internal Server Error"}"#.to_vec())
        }
    }
}

// ── IntoResponse ──────────────────────────────────────────────────────────────

/// Conversion into an HTTP [`Response`].
///
/// Handlers may return anything implementing this trait. `Result` is covered
/// when both arms are, which is how [`ApiError`](crate::ApiError) reaches the
/// client.
pub trait IntoResponse {
    fn into_response(self) -> Response;
}

impl IntoResponse for Response {
    fn into_response(self) -> Response { self }
}

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response { serialize(Status::Ok, &self.0) }
}

impl<T: Serialize> IntoResponse for (Status, Json<T>) {
    fn into_response(self) -> Response { serialize(self.0, &self.1.0) }
}

impl<T: IntoResponse, E: IntoResponse> IntoResponse for Result<T, E> {
    fn into_response(self) -> Response {
        match self {
            Ok(ok) => ok.into_response(),
            Err(err) => err.into_response(),
        }
    }
}
