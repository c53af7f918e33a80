//! # quote-api
//!
//! HTTP API layer for door-quote.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - REST endpoints for the catalog, quoting and proposals
//! - Archive endpoints for projects, templates and the draft
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | GET | `/api/v1/catalog` | Full catalog |
//! | GET | `/api/v1/catalog/{door_type}` | Items for a door type |
//! | PUT | `/api/v1/catalog/items/{item_id}/price` | Set one price |
//! | POST | `/api/v1/catalog/adjust` | Bulk price adjustment |
//! | POST | `/api/v1/quote/item` | Price one door |
//! | POST | `/api/v1/quote/project` | Project total |
//! | POST | `/api/v1/quote/recalculate` | Refresh project prices |
//! | POST | `/api/v1/proposal` | Proposal data |
//! | GET/POST | `/api/v1/projects` | Archived projects (`?utc_offset_minutes=` names the save) |
//! | GET/DELETE | `/api/v1/projects/{id}` | One archived project |
//! | GET/POST | `/api/v1/templates` | Templates |
//! | PUT/DELETE | `/api/v1/templates/{id}` | Rename / delete template |
//! | GET/PUT/DELETE | `/api/v1/draft` | Draft slot |

pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::{AppConfig, AppState, StateError};
