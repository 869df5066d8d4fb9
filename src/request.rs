//! Incoming HTTP request type.

use std::collections::HashMap;

use serde::de::DeserializeOwned;

/// An incoming HTTP request with its body already buffered.
pub struct Request {
    pub(crate) method: String,
    pub(crate) target: String,
    pub(crate) body: Vec<u8>,
    pub(crate) params: HashMap<String, String>,
}

impl Request {
    /// Builds a request from its method, request target (path plus optional
    /// query string) and fully buffered body.
    pub fn new(method: impl Into<String>, target: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        Self {
            method: method.into(),
            target: target.into(),
            body: body.into(),
            params: HashMap::new(),
        }
    }

    pub fn method(&self) -> &str { &self.method }
    pub fn body(&self) -> &[u8] { &self.body }

    /// The request target exactly as the client sent it, query string included.
    pub fn target(&self) -> &str { &self.target }

    /// The path component of the request target.
    pub fn path(&self) -> &str {
        self.target.split_once('?').map_or(&self.target, |(path, _)| path)
    }

    /// Returns a named path parameter.
    ///
    /// For a route `/api/products/{id}`, `req.param("id")` on `/api/products/42`
    /// returns `Some("42")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Deserializes the buffered body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }

    pub(crate) fn with_params(mut self, params: HashMap<String, String>) -> Self {
        self.params = params;
        self
    }
}
