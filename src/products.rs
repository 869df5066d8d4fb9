//! The `/api/products/` resource.
//!
//! | Method | Path | Handler |
//! |---|---|---|
//! | `GET` | `/api/products/` | [`list`] |
//! | `GET` | `/api/products/{id}` | [`get_one`] |
//! | `POST` | `/api/products/` | [`create`] |
//! | `PUT` | `/api/products/{id}` | [`update`] |
//! | `DELETE` | `/api/products/{id}` | [`delete`] |
//!
//! Item routes also answer with a trailing slash (`/api/products/5/`). `{id}`
//! must be all ASCII digits and fit an `i64`; anything else, including further
//! path segments after the id, is treated as an unmatched route.
//!
//! Every mutation is persisted before the response is returned.

use tracing::info;

use crate::error::ApiError;
use crate::method::Method;
use crate::product::{Product, ProductPatch};
use crate::request::Request;
use crate::response::{Json, Response};
use crate::router::Router;
use crate::status::Status;
use crate::store::Store;

const COLLECTION: &str = "/api/products/";
const ITEM: &str = "/api/products/{id}";
const ITEM_SLASH: &str = "/api/products/{id}/";

const PRODUCT_NOT_FOUND: &str = "Product not found";

/// Registers the product routes on a router backed by `store`.
pub fn routes(store: Store) -> Router {
    Router::new(store)
        .on(Method::Get, COLLECTION, list)
        .on(Method::Get, ITEM, get_one)
        .on(Method::Post, COLLECTION, create)
        .on(Method::Put, ITEM, update)
        .on(Method::Delete, ITEM, delete)
        .on(Method::Get, ITEM_SLASH, get_one)
        .on(Method::Put, ITEM_SLASH, update)
        .on(Method::Delete, ITEM_SLASH, delete)
}

/// `GET /api/products/` — every product in store order.
pub async fn list(_req: Request, store: Store) -> Json<Vec<Product>> {
    Json(store.list().await)
}

/// `GET /api/products/{id}` — the product, or `null` with a 200 when no
/// product has that id.
pub async fn get_one(req: Request, store: Store) -> Result<Json<Option<Product>>, ApiError> {
    let id = product_id(&req)?;
    Ok(Json(store.find_by_id(id).await))
}

/// `POST /api/products/` — stores the body as a new product.
pub async fn create(req: Request, store: Store) -> Result<(Status, Json<Product>), ApiError> {
    let product: Product = req.json()?;

    if !store.insert(product.clone()).await {
        return Err(ApiError::Conflict("Product already exists"));
    }
    store.persist().await;

    info!(id = product.id, "product created");
    Ok((Status::Created, Json(product)))
}

/// `PUT /api/products/{id}` — replaces the provided, truthy fields.
pub async fn update(req: Request, store: Store) -> Result<Json<Product>, ApiError> {
    let id = product_id(&req)?;

    if store.find_by_id(id).await.is_none() {
        return Err(ApiError::NotFound(PRODUCT_NOT_FOUND));
    }
    let patch: ProductPatch = req.json()?;

    // The product can vanish between the check and here if a delete lands
    // while the body is parsed.
    let updated = store
        .update(id, |current| patch.apply(current))
        .await
        .ok_or(ApiError::NotFound(PRODUCT_NOT_FOUND))?;
    store.persist().await;

    info!(id, "product updated");
    Ok(Json(updated))
}

/// `DELETE /api/products/{id}`
pub async fn delete(req: Request, store: Store) -> Result<Response, ApiError> {
    let id = product_id(&req)?;

    if !store.remove(id).await {
        return Err(ApiError::NotFound(PRODUCT_NOT_FOUND));
    }
    store.persist().await;

    info!(id, "product deleted");
    Ok(Response::message(Status::Ok, "Product deleted successfully"))
}

fn product_id(req: &Request) -> Result<i64, ApiError> {
    req.param("id")
        .filter(|raw| raw.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|raw| raw.parse().ok())
        .ok_or_else(|| ApiError::RouteNotFound(req.target().to_owned()))
}
