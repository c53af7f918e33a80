//! # Routes
//!
//! Axum router configuration for the quoting API.

use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Create the main application router
///
/// Routes:
/// - Catalog:
///   - GET  /api/v1/catalog - Full catalog with version
///   - GET  /api/v1/catalog/{door_type} - Items usable for a door type
///   - PUT  /api/v1/catalog/items/{item_id}/price - Single price edit
///   - POST /api/v1/catalog/adjust - Bulk adjustment
///
/// - Quoting:
///   - POST /api/v1/quote/item - Price a door by catalog ids
///   - POST /api/v1/quote/project - Project total and order table
///   - POST /api/v1/quote/recalculate - Re-resolve a project
///   - POST /api/v1/proposal - Proposal data
///
/// - Archive:
///   - GET/POST /api/v1/projects, GET/DELETE /api/v1/projects/{id}
///   - GET/POST /api/v1/templates, PUT/DELETE /api/v1/templates/{id}
///   - GET/PUT/DELETE /api/v1/draft
pub fn create_router(state: AppState) -> Router {
    // The configurator front end may be served from anywhere
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let catalog_routes = Router::new()
        .route("/catalog", get(handlers::get_catalog))
        .route("/catalog/{door_type}", get(handlers::catalog_for_door_type))
        .route("/catalog/items/{item_id}/price", put(handlers::set_item_price))
        .route("/catalog/adjust", post(handlers::adjust_prices));

    let quote_routes = Router::new()
        .route("/item", post(handlers::quote_item))
        .route("/project", post(handlers::quote_project))
        .route("/recalculate", post(handlers::recalculate_project));

    let archive_routes = Router::new()
        .route(
            "/projects",
            get(handlers::list_projects).post(handlers::save_project),
        )
        .route(
            "/projects/{project_id}",
            get(handlers::get_project).delete(handlers::delete_project),
        )
        .route(
            "/templates",
            get(handlers::list_templates).post(handlers::save_template),
        )
        .route(
            "/templates/{template_id}",
            put(handlers::rename_template).delete(handlers::delete_template),
        )
        .route(
            "/draft",
            get(handlers::get_draft)
                .put(handlers::save_draft)
                .delete(handlers::clear_draft),
        );

    let api_routes = Router::new()
        .merge(catalog_routes)
        .nest("/quote", quote_routes)
        .route("/proposal", post(handlers::build_proposal))
        .merge(archive_routes);

    Router::new()
        // Health check at root
        .route("/health", get(handlers::health))
        .route("/", get(handlers::health))
        // API v1
        .nest("/api/v1", api_routes)
        // Middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        // State
        .with_state(state)
}
