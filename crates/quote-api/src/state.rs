//! # Application State
//!
//! Shared state for the Axum application.
//! Contains the live catalog, the archive store and configuration.

use quote_core::{BoxedArchiveStore, Catalog, MemoryArchive, QuoteError, VatRate};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{info, warn};

/// Catalog locations tried when `CATALOG_PATH` is not set
const CATALOG_SEARCH_PATHS: [&str; 3] = [
    "config/catalog.toml",
    "../config/catalog.toml",
    "../../config/catalog.toml",
];

/// Startup failures
#[derive(Debug, Error)]
pub enum StateError {
    #[error("Invalid socket address {0}")]
    InvalidAddress(String),

    #[error("Failed to read catalog {path}: {source}")]
    CatalogRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to load catalog {path}: {source}")]
    CatalogInvalid {
        path: PathBuf,
        #[source]
        source: QuoteError,
    },
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Environment (development, staging, production)
    pub environment: String,
    /// Explicit catalog file; searched for when unset
    pub catalog_path: Option<PathBuf>,
    /// VAT rate used for proposals
    pub vat: VatRate,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let vat = match std::env::var("VAT_BPS") {
            Ok(raw) => match raw.trim().parse::<u32>() {
                Ok(bps) => VatRate::from_bps(bps),
                Err(_) => {
                    warn!("Ignoring invalid VAT_BPS={:?}, using default", raw);
                    VatRate::default()
                }
            },
            Err(_) => VatRate::default(),
        };

        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            catalog_path: std::env::var("CATALOG_PATH").ok().map(PathBuf::from),
            vat,
        }
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> Result<SocketAddr, StateError> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse().map_err(|_| StateError::InvalidAddress(addr))
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Live catalog; price edits take the write lock
    pub catalog: Arc<RwLock<Catalog>>,
    /// Saved projects, templates and the draft
    pub store: BoxedArchiveStore,
    /// Application config
    pub config: AppConfig,
}

impl AppState {
    /// Create state from the environment with an in-memory archive
    pub fn new() -> Result<Self, StateError> {
        let config = AppConfig::from_env();
        let catalog = load_catalog(config.catalog_path.as_deref())?;
        Ok(Self::with_catalog(config, catalog))
    }

    /// Create state around an already loaded catalog
    pub fn with_catalog(config: AppConfig, catalog: Catalog) -> Self {
        Self {
            catalog: Arc::new(RwLock::new(catalog)),
            store: MemoryArchive::shared(),
            config,
        }
    }

    /// Builder: replace the archive backend
    pub fn with_store(mut self, store: BoxedArchiveStore) -> Self {
        self.store = store;
        self
    }
}

/// Load the catalog from `explicit`, or from the first search path that exists
fn load_catalog(explicit: Option<&std::path::Path>) -> Result<Catalog, StateError> {
    if let Some(path) = explicit {
        return read_catalog(path);
    }

    for path in CATALOG_SEARCH_PATHS {
        let path = std::path::Path::new(path);
        if path.exists() {
            return read_catalog(path);
        }
    }

    // Return empty catalog if no config found
    warn!("No catalog found, using empty catalog");
    Ok(Catalog::new())
}

fn read_catalog(path: &std::path::Path) -> Result<Catalog, StateError> {
    let content = std::fs::read_to_string(path).map_err(|source| StateError::CatalogRead {
        path: path.to_path_buf(),
        source,
    })?;
    let catalog = Catalog::from_toml(&content).map_err(|source| StateError::CatalogInvalid {
        path: path.to_path_buf(),
        source,
    })?;
    info!(
        "Loaded {} catalog items from {} (version {})",
        catalog.len(),
        path.display(),
        catalog.version
    );
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> AppConfig {
        AppConfig {
            host: "0.0.0.0".to_string(),
            port: 3000,
            environment: "test".to_string(),
            catalog_path: None,
            vat: VatRate::default(),
        }
    }

    #[test]
    fn test_app_config_defaults() {
        // Clear env vars for test
        std::env::remove_var("HOST");
        std::env::remove_var("PORT");
        std::env::remove_var("VAT_BPS");

        let config = AppConfig::from_env();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.vat.bps(), 2000);
    }

    #[test]
    fn test_socket_addr() {
        let addr = config().socket_addr().unwrap();
        assert_eq!(addr.to_string(), "0.0.0.0:3000");

        let bad = AppConfig {
            host: "not a host".to_string(),
            ..config()
        };
        assert!(matches!(bad.socket_addr(), Err(StateError::InvalidAddress(_))));
    }

    #[test]
    fn test_missing_explicit_catalog() {
        let err = load_catalog(Some(std::path::Path::new("/nonexistent/catalog.toml"))).unwrap_err();
        assert!(matches!(err, StateError::CatalogRead { .. }));
    }

    #[test]
    fn test_bundled_catalog_loads() {
        // Tests run from the crate directory
        let catalog = load_catalog(Some(std::path::Path::new("../../config/catalog.toml"))).unwrap();
        assert!(catalog.get("l1_ral_base").is_some());
        assert_eq!(catalog.get("f1_mdf_wrap").map(|f| f.price), Some(18022));
    }

    #[tokio::test]
    async fn test_state_shares_catalog() {
        let state = AppState::with_catalog(config(), Catalog::new());
        let clone = state.clone();
        clone.catalog.write().await.version = 7;
        assert_eq!(state.catalog.read().await.version, 7);
        assert_eq!(state.store.backend_name(), "memory");
    }
}
