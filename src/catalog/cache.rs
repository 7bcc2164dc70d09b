//! Application-level catalog cache
//!
//! Holds the one catalog instance for the process. It is built explicitly at
//! startup with [`CatalogCache::init`] and rebuilt only through
//! [`CatalogCache::reload`] or after [`CatalogCache::invalidate`].

use super::loader::{CatalogLoader, LoadWarning};
use super::Catalog;
use crate::error::{CatalogError, Result};
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use tokio::sync::RwLock;
use tracing::{debug, info};

static GLOBAL: OnceLock<CatalogCache> = OnceLock::new();

pub struct CatalogCache {
    loader: CatalogLoader,
    data_file: PathBuf,
    current: RwLock<Option<Arc<Catalog>>>,
    warnings: RwLock<Vec<LoadWarning>>,
}

impl CatalogCache {
    pub fn new(loader: CatalogLoader, data_file: PathBuf) -> Self {
        Self {
            loader,
            data_file,
            current: RwLock::new(None),
            warnings: RwLock::new(Vec::new()),
        }
    }

    /// Register `cache` as the process-wide instance. Fails if one is
    /// already installed.
    pub fn install(cache: CatalogCache) -> Result<&'static CatalogCache> {
        GLOBAL
            .set(cache)
            .map_err(|_| CatalogError::InvalidConfig("catalog cache already installed".to_string()))?;
        GLOBAL
            .get()
            .ok_or_else(|| CatalogError::InvalidConfig("catalog cache not installed".to_string()))
    }

    /// The process-wide instance, if installed
    pub fn global() -> Option<&'static CatalogCache> {
        GLOBAL.get()
    }

    pub fn data_file(&self) -> &Path {
        &self.data_file
    }

    /// Build the catalog at startup
    pub async fn init(&self) -> Arc<Catalog> {
        self.reload().await
    }

    /// Currently cached catalog without triggering a load
    pub async fn current(&self) -> Option<Arc<Catalog>> {
        self.current.read().await.clone()
    }

    /// Cached catalog, loading it first if the cache is empty
    pub async fn get_or_load(&self) -> Arc<Catalog> {
        if let Some(catalog) = self.current().await {
            debug!("📋 Using cached catalog ({} videos)", catalog.len());
            return catalog;
        }
        self.reload().await
    }

    /// Rebuild the catalog from the data file and replace the cached one.
    /// Readers holding the previous `Arc` keep their snapshot.
    pub async fn reload(&self) -> Arc<Catalog> {
        let report = self.loader.load_file(&self.data_file).await;
        let catalog = Arc::new(report.catalog);

        *self.warnings.write().await = report.warnings;
        *self.current.write().await = Some(catalog.clone());

        info!("🔄 Catalog reloaded: {} videos", catalog.len());
        catalog
    }

    /// Drop the cached catalog; the next [`get_or_load`](Self::get_or_load)
    /// rebuilds it
    pub async fn invalidate(&self) {
        *self.current.write().await = None;
        self.warnings.write().await.clear();
        info!("🗑️ Catalog cache invalidated");
    }

    /// Warnings from the most recent load
    pub async fn warnings(&self) -> Vec<LoadWarning> {
        self.warnings.read().await.clone()
    }
}
