//! In-memory product sequence mirrored to a JSON file.
//!
//! The sequence in memory is authoritative for the life of the process. The
//! backing file is read once by [`Store::open`] and rewritten in full after
//! every mutation by [`Store::persist`].

use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, error, warn};

use crate::product::Product;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}: malformed product list: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Shared handle to the product sequence. Cloning is cheap.
#[derive(Clone)]
pub struct Store {
    inner: Arc<Inner>,
}

struct Inner {
    path: PathBuf,
    products: RwLock<Vec<Product>>,
    // Held for the whole write so file contents never go backwards.
    write: Mutex<()>,
}

impl Store {
    /// Creates a store holding `products`, mirrored to `path`. Nothing is read
    /// from or written to disk until the first [`persist`](Store::persist).
    pub fn new(path: impl Into<PathBuf>, products: Vec<Product>) -> Self {
        Self {
            inner: Arc::new(Inner {
                path: path.into(),
                products: RwLock::new(products),
                write: Mutex::new(()),
            }),
        }
    }

    /// Loads the backing file. A missing file starts an empty store; a file
    /// that is not a JSON array of products is an error.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let products = load_initial(&path).await?;
        Ok(Self::new(path, products))
    }

    /// Every product, in sequence order.
    pub async fn list(&self) -> Vec<Product> {
        self.inner.products.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.inner.products.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Linear scan for the first product with `id`.
    pub async fn find_by_id(&self, id: i64) -> Option<Product> {
        self.inner.products.read().await.iter().find(|p| p.id == id).cloned()
    }

    /// Appends `product` unless one with the same id already exists.
    ///
    /// The check and the append happen under one write lock, so two
    /// concurrent inserts of the same id cannot both succeed. Returns `false`
    /// on conflict, leaving the sequence untouched.
    pub async fn insert(&self, product: Product) -> bool {
        let mut products = self.inner.products.write().await;
        if products.iter().any(|p| p.id == product.id) {
            return false;
        }
        products.push(product);
        true
    }

    /// Replaces the product with `id` by `f(current)`, keeping its position.
    /// Returns the stored replacement, or `None` if no product matched.
    pub async fn update(&self, id: i64, f: impl FnOnce(&Product) -> Product) -> Option<Product> {
        let mut products = self.inner.products.write().await;
        let slot = products.iter_mut().find(|p| p.id == id)?;
        *slot = f(slot);
        Some(slot.clone())
    }

    /// Drops every product with `id`. Returns `false` if none matched.
    pub async fn remove(&self, id: i64) -> bool {
        let mut products = self.inner.products.write().await;
        let before = products.len();
        products.retain(|p| p.id != id);
        products.len() != before
    }

    /// Writes the current sequence to the backing file, logging any failure.
    ///
    /// A failed write never reaches the caller: the in-memory sequence stays
    /// authoritative and the next successful persist catches the file up.
    pub async fn persist(&self) {
        if let Err(e) = self.try_persist().await {
            error!(error = %e, "failed to persist products");
        }
    }

    /// Writes the current sequence to a sibling temp file and renames it over
    /// the backing file.
    pub async fn try_persist(&self) -> Result<(), StoreError> {
        let _guard = self.inner.write.lock().await;

        let bytes = {
            let products = self.inner.products.read().await;
            serde_json::to_vec(&*products).map_err(|source| StoreError::Json {
                path: self.inner.path.clone(),
                source,
            })?
        };

        let tmp = temp_path(&self.inner.path);
        tokio::fs::write(&tmp, &bytes)
            .await
            .map_err(|source| StoreError::Io { path: tmp.clone(), source })?;
        tokio::fs::rename(&tmp, &self.inner.path)
            .await
            .map_err(|source| StoreError::Io { path: self.inner.path.clone(), source })?;

        debug!(path = %self.inner.path.display(), bytes = bytes.len(), "products persisted");
        Ok(())
    }
}

async fn load_initial(path: &Path) -> Result<Vec<Product>, StoreError> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!(path = %path.display(), "backing file not found, starting with no products");
            return Ok(Vec::new());
        }
        Err(source) => return Err(StoreError::Io { path: path.to_owned(), source }),
    };

    serde_json::from_slice(&bytes).map_err(|source| StoreError::Json { path: path.to_owned(), source })
}

fn temp_path(path: &Path) -> PathBuf {
    let mut tmp = OsString::from(path.as_os_str());
    tmp.push(".tmp");
    PathBuf::from(tmp)
}
