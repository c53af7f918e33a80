//! # quote-core
//!
//! Core types for the door-quote configurator and pricing engine.
//!
//! This crate provides:
//! - `Catalog` and `CatalogItem` for the door catalog and price editing
//! - `compute_item_total` and `compute_project_total`, the pricing engine
//! - `Selection` and `DoorConfiguration` for assembling doors
//! - `Project` and `SavedProject` for the order and its archive snapshots
//! - `DoorTemplate` and `TemplateLibrary` for reusable assemblies
//! - `Proposal` for commercial proposal data
//! - `ArchiveStore` trait for persistence
//! - `QuoteError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use quote_core::{Catalog, DoorType, Project, Selection};
//!
//! let catalog = Catalog::from_toml(&std::fs::read_to_string("config/catalog.toml")?)?;
//!
//! let mut selection = Selection::new(DoorType::Single);
//! selection.select_leaf(catalog.get("l1_ral_base").unwrap().clone());
//! selection.select_frame(catalog.get("f1_mdf_wrap").unwrap().clone());
//! selection.set_quantity(2);
//!
//! let mut project = Project::new().with_name("Clinic");
//! project.commit(&mut selection)?;
//! println!("{}", catalog.currency.format_amount(project.total()));
//! ```

pub mod catalog;
pub mod configuration;
pub mod error;
pub mod pricing;
pub mod project;
pub mod proposal;
pub mod store;
pub mod template;

// Re-exports for convenience
pub use catalog::{
    AdjustOperation, AdjustUnit, Catalog, CatalogIndex, CatalogItem, Category, Currency,
    DoorType, PerDoorType, PriceAdjustment, PriceChange,
};
pub use configuration::{DoorConfiguration, Selection};
pub use error::{QuoteError, QuoteResult};
pub use pricing::{
    compute_item_total, compute_project_total, parse_discount_value, unit_price, Discount,
    DiscountType, VatRate,
};
pub use project::{
    Project, ProjectGroup, SavedProject, SortConfig, SortDirection, SortKey, NOT_SPECIFIED,
};
pub use proposal::{Proposal, ProposalRow, ProposalSection};
pub use store::{ArchiveStore, BoxedArchiveStore, MemoryArchive};
pub use template::{DoorTemplate, TemplateConfig, TemplateLibrary};
