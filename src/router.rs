//! Radix-tree request router.
//!
//! One tree per HTTP method. O(path-length) lookup. A request that matches no
//! tree becomes `404 {"message": "Not Found - <target>"}`.

use std::collections::HashMap;
use std::sync::Arc;

use matchit::Router as MatchitRouter;
use tracing::debug;

use crate::error::ApiError;
use crate::handler::{BoxedHandler, Handler};
use crate::method::Method;
use crate::middleware;
use crate::request::Request;
use crate::response::{IntoResponse, Response};
use crate::store::Store;

/// The application router.
///
/// Build it once at startup with the [`Store`] every handler receives, then
/// pass it to [`Server::serve`](crate::Server::serve). Each [`Router::on`] call
/// returns `self` so registrations chain naturally.
pub struct Router {
    routes: HashMap<Method, MatchitRouter<BoxedHandler>>,
    store: Store,
}

impl Router {
    pub fn new(store: Store) -> Self {
        Self { routes: HashMap::new(), store }
    }

    /// Register a handler for a method + path pair. Returns `self` for chaining.
    ///
    /// Path parameters use `{name}` syntax; `req.param("name")` retrieves them.
    ///
    /// # Panics
    ///
    /// Panics if `path` is not a valid route or collides with one already
    /// registered for `method`.
    pub fn on(mut self, method: Method, path: &str, handler: impl Handler) -> Self {
        self.routes
            .entry(method)
            .or_default()
            .insert(path, handler.into_boxed_handler())
            .unwrap_or_else(|e| panic!("invalid route `{path}`: {e}"));
        self
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Routes one request and produces one response.
    ///
    /// The handler runs on its own task so a panic inside it is contained and
    /// answered with a 500 instead of dropping the connection.
    pub async fn handle(&self, req: Request) -> Response {
        let method = req.method.clone();
        let target = req.target.clone();

        middleware::trace(&method, &target, async {
            let Some((handler, params)) = self.lookup(&req) else {
                debug!("no route matched");
                return ApiError::RouteNotFound(target.clone()).into_response();
            };

            let fut = handler.call(req.with_params(params), self.store.clone());
            match tokio::spawn(fut).await {
                Ok(response) => response,
                Err(e) => ApiError::Internal(e.to_string()).into_response(),
            }
        })
        .await
    }

    fn lookup(&self, req: &Request) -> Option<(BoxedHandler, HashMap<String, String>)> {
        let method: Method = req.method().parse().ok()?;
        let tree = self.routes.get(&method)?;
        let matched = tree.at(req.path()).ok()?;
        let handler = Arc::clone(matched.value);
        let params = matched.params.iter()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect();
        Some((handler, params))
    }
}
