//! # wares
//!
//! A product catalogue served as JSON over HTTP. The catalogue lives in memory
//! and is mirrored to a single JSON file that is rewritten after every change.
//!
//! ## Endpoints
//!
//! ```text
//! GET    /api/products/       200  all products
//! GET    /api/products/{id}   200  one product, or null
//! POST   /api/products/       201  created product | 409 id taken
//! PUT    /api/products/{id}   200  updated product | 404
//! DELETE /api/products/{id}   200  confirmation    | 404
//! ```
//!
//! Anything else answers `404 {"message": "Not Found - <target>"}`.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use wares::{Config, Server, Store, products};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), wares::Error> {
//!     let config = Config::from_env()?;
//!     let store = Store::open(&config.products_file).await?;
//!
//!     Server::bind(config.socket_addr())
//!         .serve(products::routes(store))
//!         .await
//! }
//! ```

mod config;
mod error;
mod handler;
mod method;
mod product;
mod request;
mod response;
mod router;
mod server;
mod status;
mod store;

mod middleware;
pub mod products;

pub use config::{Config, ConfigError};
pub use error::{ApiError, Error};
pub use handler::Handler;
pub use method::Method;
pub use product::{Product, ProductPatch};
pub use request::Request;
pub use response::{IntoResponse, Json, Response, ResponseBuilder};
pub use router::Router;
pub use server::Server;
pub use status::Status;
pub use store::{Store, StoreError};
