//! # Quote Error Types
//!
//! Typed error handling for door-quote.
//! Catalog, project and storage operations return `Result<T, QuoteError>`.
//! The pricing functions are total and never produce one.

use thiserror::Error;

/// Core error type for catalog, project and archive operations
#[derive(Debug, Error)]
pub enum QuoteError {
    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Catalog item not found
    #[error("Catalog item not found: {item_id}")]
    ItemNotFound { item_id: String },

    /// Negative or otherwise unusable price
    #[error("Invalid price: {message}")]
    InvalidPrice { message: String },

    /// Leaf or frame missing when committing a configuration
    #[error("Configuration is incomplete: {missing} not selected")]
    IncompleteConfiguration { missing: &'static str },

    /// Configuration line not found in the project
    #[error("Configuration not found: {config_id}")]
    ConfigurationNotFound { config_id: String },

    /// Saved project not found in the archive
    #[error("Project not found: {project_id}")]
    ProjectNotFound { project_id: String },

    /// Template not found in the library
    #[error("Template not found: {template_id}")]
    TemplateNotFound { template_id: String },

    /// Attempt to archive a project without configurations
    #[error("Project is empty")]
    EmptyProject,

    /// Catalog file could not be parsed
    #[error("Catalog parse error: {0}")]
    CatalogParse(String),

    /// Storage backend failure
    #[error("Storage error: {0}")]
    Storage(String),
}

impl QuoteError {
    /// Returns true if the caller can fix this error by changing the request
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code())
    }

    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            QuoteError::InvalidRequest(_) => 400,
            QuoteError::ItemNotFound { .. } => 404,
            QuoteError::InvalidPrice { .. } => 400,
            QuoteError::IncompleteConfiguration { .. } => 422,
            QuoteError::ConfigurationNotFound { .. } => 404,
            QuoteError::ProjectNotFound { .. } => 404,
            QuoteError::TemplateNotFound { .. } => 404,
            QuoteError::EmptyProject => 409,
            QuoteError::CatalogParse(_) => 500,
            QuoteError::Storage(_) => 500,
        }
    }
}

impl From<toml::de::Error> for QuoteError {
    fn from(err: toml::de::Error) -> Self {
        QuoteError::CatalogParse(err.to_string())
    }
}

/// Result type alias for quote operations
pub type QuoteResult<T> = Result<T, QuoteError>;
