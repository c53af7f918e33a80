//! # Request Handlers
//!
//! Axum request handlers for the quoting API.
//! Catalog edits take the catalog write lock; everything else reads.

use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{FixedOffset, NaiveDate, Utc};
use quote_core::{
    compute_item_total, Catalog, CatalogIndex, CatalogItem, Category, Currency, DiscountType,
    DoorTemplate, DoorType, PriceAdjustment, PriceChange, Project, Proposal, QuoteError,
    SavedProject, Selection, SortConfig, VatRate,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{error, info, instrument, warn};

// =============================================================================
// Request/Response Types
// =============================================================================

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: u16) -> Self {
        Self {
            error: error.into(),
            code,
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

pub type ApiResult<T> = Result<T, (StatusCode, Json<ErrorResponse>)>;

fn quote_error_to_response(err: QuoteError) -> (StatusCode, Json<ErrorResponse>) {
    let code = err.status_code();
    if err.is_client_error() {
        warn!("Request rejected: {}", err);
    } else {
        error!("Request failed: {}", err);
    }
    let response = ErrorResponse::new(err.to_string(), code);
    (StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR), Json(response))
}

/// Catalog slice usable for one door type
#[derive(Debug, Serialize, Deserialize)]
pub struct DoorCatalogResponse {
    pub door_type: DoorType,
    pub label: String,
    pub version: u64,
    pub currency: Currency,
    pub leaves: Vec<CatalogItem>,
    pub frames: Vec<CatalogItem>,
    pub options: Vec<CatalogItem>,
    pub hardware: Vec<CatalogItem>,
    pub accessories: Vec<CatalogItem>,
}

/// Single price edit
#[derive(Debug, Deserialize)]
pub struct SetPriceRequest {
    pub category: Category,
    /// Required for leaves and frames
    #[serde(default)]
    pub door_type: Option<DoorType>,
    pub price: i64,
    /// In-progress selection to update with the new price
    #[serde(default)]
    pub selection: Option<Selection>,
}

/// Bulk price adjustment
#[derive(Debug, Deserialize)]
pub struct AdjustPricesRequest {
    pub category: Category,
    #[serde(default)]
    pub door_type: Option<DoorType>,
    pub item_ids: HashSet<String>,
    pub adjustment: PriceAdjustment,
    #[serde(default)]
    pub selection: Option<Selection>,
}

/// Result of a catalog price edit
#[derive(Debug, Serialize, Deserialize)]
pub struct PriceUpdateResponse {
    pub changes: Vec<PriceChange>,
    pub version: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selection: Option<Selection>,
}

/// Price a door given by catalog ids
#[derive(Debug, Deserialize)]
pub struct QuoteItemRequest {
    #[serde(default)]
    pub door_type: DoorType,
    #[serde(default)]
    pub leaf_id: Option<String>,
    #[serde(default)]
    pub frame_id: Option<String>,
    #[serde(default)]
    pub option_ids: Vec<String>,
    #[serde(default)]
    pub hardware_ids: Vec<String>,
    #[serde(default)]
    pub accessory_ids: Vec<String>,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default)]
    pub discount_value: Option<String>,
    #[serde(default)]
    pub discount_type: Option<DiscountType>,
}

fn default_quantity() -> u32 {
    1
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ItemQuoteResponse {
    pub unit_price: i64,
    pub quantity: u32,
    pub total: i64,
    pub formatted_total: String,
    /// Leaf and frame both given
    pub complete: bool,
}

#[derive(Debug, Deserialize)]
pub struct ProjectQuoteRequest {
    pub project: Project,
    #[serde(default)]
    pub sort: Option<SortConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LineTotal {
    pub id: String,
    pub leaf: Option<String>,
    pub quantity: u32,
    pub unit_price: i64,
    pub total: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GroupSummary {
    pub door_type: DoorType,
    pub label: String,
    pub total: i64,
    pub lines: Vec<LineTotal>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProjectQuoteResponse {
    pub groups: Vec<GroupSummary>,
    pub door_count: u32,
    pub total: i64,
    pub formatted_total: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RecalculateResponse {
    pub project: Project,
    pub changed: usize,
    pub catalog_version: u64,
    pub total: i64,
}

#[derive(Debug, Deserialize)]
pub struct ProposalRequest {
    pub project: Project,
    /// Defaults to today (UTC)
    #[serde(default)]
    pub date: Option<NaiveDate>,
    /// Overrides the configured VAT rate
    #[serde(default)]
    pub vat_bps: Option<u32>,
}

/// Query of `POST /projects`
#[derive(Debug, Default, Deserialize)]
pub struct SaveProjectParams {
    /// Caller's offset from UTC, used for the default project name
    #[serde(default)]
    pub utc_offset_minutes: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct SaveTemplateRequest {
    pub name: String,
    pub selection: Selection,
}

#[derive(Debug, Deserialize)]
pub struct RenameTemplateRequest {
    pub name: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "door-quote",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Full catalog with its version
pub async fn get_catalog(State(state): State<AppState>) -> Json<Catalog> {
    Json(state.catalog.read().await.clone())
}

/// Items usable for one door type
pub async fn catalog_for_door_type(
    State(state): State<AppState>,
    Path(door_type): Path<DoorType>,
) -> Json<DoorCatalogResponse> {
    let catalog = state.catalog.read().await;
    Json(DoorCatalogResponse {
        door_type,
        label: door_type.label().to_string(),
        version: catalog.version,
        currency: catalog.currency,
        leaves: catalog.leaves_for(door_type).to_vec(),
        frames: catalog.frames_for(door_type).to_vec(),
        options: catalog.options_for(door_type).cloned().collect(),
        hardware: catalog.hardware_for(door_type).cloned().collect(),
        accessories: catalog.accessories_for(door_type).cloned().collect(),
    })
}

/// Set the price of one catalog item
#[instrument(skip(state, request), fields(category = %request.category))]
pub async fn set_item_price(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
    Json(request): Json<SetPriceRequest>,
) -> ApiResult<Json<PriceUpdateResponse>> {
    let mut catalog = state.catalog.write().await;
    let change = catalog
        .set_price(request.category, request.door_type, &item_id, request.price)
        .map_err(quote_error_to_response)?;

    let changes = vec![change];
    let selection = request.selection.map(|mut s| {
        s.apply_price_changes(&changes);
        s
    });

    info!(
        "Price of {} set to {} (catalog version {})",
        item_id, request.price, catalog.version
    );

    Ok(Json(PriceUpdateResponse {
        changes,
        version: catalog.version,
        selection,
    }))
}

/// Apply a bulk adjustment to selected items
#[instrument(skip(state, request), fields(category = %request.category, items = request.item_ids.len()))]
pub async fn adjust_prices(
    State(state): State<AppState>,
    Json(request): Json<AdjustPricesRequest>,
) -> ApiResult<Json<PriceUpdateResponse>> {
    let mut catalog = state.catalog.write().await;
    let changes = catalog
        .adjust_prices(
            request.category,
            request.door_type,
            &request.item_ids,
            &request.adjustment,
        )
        .map_err(quote_error_to_response)?;

    let selection = request.selection.map(|mut s| {
        s.apply_price_changes(&changes);
        s
    });

    info!(
        "Adjusted {} prices (catalog version {})",
        changes.len(),
        catalog.version
    );

    Ok(Json(PriceUpdateResponse {
        changes,
        version: catalog.version,
        selection,
    }))
}

/// Price a configuration given by catalog ids
#[instrument(skip(state, request), fields(door_type = %request.door_type, quantity = request.quantity))]
pub async fn quote_item(
    State(state): State<AppState>,
    Json(request): Json<QuoteItemRequest>,
) -> ApiResult<Json<ItemQuoteResponse>> {
    if request.quantity == 0 {
        return Err(quote_error_to_response(QuoteError::InvalidRequest(
            "quantity must be at least 1".to_string(),
        )));
    }

    let catalog = state.catalog.read().await;
    let index = catalog.index();
    let scope = DoorScope {
        catalog: &catalog,
        index: &index,
        door_type: request.door_type,
    };

    let leaf = request
        .leaf_id
        .as_deref()
        .map(|id| scope.resolve(id, Category::Leaf))
        .transpose()
        .map_err(quote_error_to_response)?;
    let frame = request
        .frame_id
        .as_deref()
        .map(|id| scope.resolve(id, Category::Frame))
        .transpose()
        .map_err(quote_error_to_response)?;
    let options = scope
        .resolve_all(&request.option_ids, Category::Option)
        .map_err(quote_error_to_response)?;
    let hardware = scope
        .resolve_all(&request.hardware_ids, Category::Hardware)
        .map_err(quote_error_to_response)?;
    let accessories = scope
        .resolve_all(&request.accessory_ids, Category::Accessory)
        .map_err(quote_error_to_response)?;

    let unit_price = quote_core::unit_price(leaf, frame, &options, &hardware, &accessories);
    let total = compute_item_total(
        leaf,
        frame,
        &options,
        &hardware,
        &accessories,
        request.quantity,
        request.discount_value.as_deref(),
        request.discount_type,
    );

    Ok(Json(ItemQuoteResponse {
        unit_price,
        quantity: request.quantity,
        total,
        formatted_total: catalog.currency.format_amount(total),
        complete: leaf.is_some() && frame.is_some(),
    }))
}

fn resolve<'a>(
    index: &CatalogIndex<'a>,
    id: &str,
    expected: Category,
) -> Result<&'a CatalogItem, QuoteError> {
    let item = index.get(id).ok_or_else(|| QuoteError::ItemNotFound {
        item_id: id.to_string(),
    })?;
    if item.category != expected {
        return Err(QuoteError::InvalidRequest(format!(
            "item {} is a {}, expected a {}",
            id, item.category, expected
        )));
    }
    Ok(item)
}

/// Catalog lookups for one door type
struct DoorScope<'c, 'i> {
    catalog: &'c Catalog,
    index: &'i CatalogIndex<'c>,
    door_type: DoorType,
}

impl<'c> DoorScope<'c, '_> {
    /// Leaves and frames must be listed under the door type. Other items
    /// must be compatible with it.
    fn resolve(&self, id: &str, expected: Category) -> Result<&'c CatalogItem, QuoteError> {
        let item = resolve(self.index, id, expected)?;
        if expected.is_per_door_type() {
            let listed = self
                .catalog
                .items(expected, Some(self.door_type))?
                .iter()
                .any(|i| i.id == id);
            if !listed {
                return Err(QuoteError::ItemNotFound {
                    item_id: id.to_string(),
                });
            }
        } else if !item.is_compatible_with(self.door_type) {
            return Err(QuoteError::InvalidRequest(format!(
                "item {} does not fit a {} door",
                id, self.door_type
            )));
        }
        Ok(item)
    }

    fn resolve_all(&self, ids: &[String], expected: Category) -> Result<Vec<CatalogItem>, QuoteError> {
        ids.iter()
            .map(|id| self.resolve(id, expected).cloned())
            .collect()
    }
}

/// Project total with the grouped order table
#[instrument(skip(state, request), fields(items = request.project.len()))]
pub async fn quote_project(
    State(state): State<AppState>,
    Json(request): Json<ProjectQuoteRequest>,
) -> Json<ProjectQuoteResponse> {
    let currency = state.catalog.read().await.currency;
    let project = &request.project;

    let groups = project
        .grouped(request.sort)
        .into_iter()
        .map(|group| GroupSummary {
            door_type: group.door_type,
            label: group.label().to_string(),
            total: group.total(),
            lines: group
                .items
                .iter()
                .map(|c| LineTotal {
                    id: c.id.clone(),
                    leaf: c.leaf.as_ref().map(|l| l.name.clone()),
                    quantity: c.quantity,
                    unit_price: c.unit_price(),
                    total: c.total(),
                })
                .collect(),
        })
        .collect();

    let total = project.total();
    Json(ProjectQuoteResponse {
        groups,
        door_count: project.door_count(),
        total,
        formatted_total: currency.format_amount(total),
    })
}

/// Re-resolve a project against the live catalog
#[instrument(skip(state, project), fields(items = project.len()))]
pub async fn recalculate_project(
    State(state): State<AppState>,
    Json(project): Json<Project>,
) -> Json<RecalculateResponse> {
    let mut project = project;
    let catalog = state.catalog.read().await;
    let changed = project.recalculate(&catalog);
    let total = project.total();

    Json(RecalculateResponse {
        project,
        changed,
        catalog_version: catalog.version,
        total,
    })
}

/// Proposal data for a project
#[instrument(skip(state, request), fields(items = request.project.len()))]
pub async fn build_proposal(
    State(state): State<AppState>,
    Json(request): Json<ProposalRequest>,
) -> ApiResult<Json<Proposal>> {
    if request.project.is_empty() {
        return Err(quote_error_to_response(QuoteError::EmptyProject));
    }

    let currency = state.catalog.read().await.currency;
    let vat = request
        .vat_bps
        .map(VatRate::from_bps)
        .unwrap_or(state.config.vat);
    let date = request.date.unwrap_or_else(|| Utc::now().date_naive());

    Ok(Json(Proposal::build(&request.project, vat, date, currency)))
}

/// List archived projects, newest first
pub async fn list_projects(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let projects = state
        .store
        .list_projects()
        .await
        .map_err(quote_error_to_response)?;
    Ok(Json(serde_json::json!({
        "count": projects.len(),
        "projects": projects,
    })))
}

/// Archive a snapshot of the working project
#[instrument(skip(state, project), fields(items = project.len()))]
pub async fn save_project(
    State(state): State<AppState>,
    Query(params): Query<SaveProjectParams>,
    Json(project): Json<Project>,
) -> ApiResult<(StatusCode, Json<SavedProject>)> {
    let offset_minutes = params.utc_offset_minutes.unwrap_or(0);
    let offset = FixedOffset::east_opt(offset_minutes.saturating_mul(60)).ok_or_else(|| {
        quote_error_to_response(QuoteError::InvalidRequest(format!(
            "utc offset of {} minutes is out of range",
            offset_minutes
        )))
    })?;
    let snapshot = project
        .snapshot(Utc::now().with_timezone(&offset))
        .map_err(quote_error_to_response)?;
    let saved = state
        .store
        .save_project(snapshot)
        .await
        .map_err(quote_error_to_response)?;

    info!("Archived project {} ({})", saved.id, saved.name);
    Ok((StatusCode::CREATED, Json(saved)))
}

pub async fn get_project(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
) -> ApiResult<Json<SavedProject>> {
    state
        .store
        .get_project(&project_id)
        .await
        .map(Json)
        .map_err(quote_error_to_response)
}

pub async fn delete_project(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
) -> ApiResult<StatusCode> {
    state
        .store
        .delete_project(&project_id)
        .await
        .map_err(quote_error_to_response)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_templates(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let templates = state
        .store
        .list_templates()
        .await
        .map_err(quote_error_to_response)?;
    Ok(Json(serde_json::json!({
        "count": templates.len(),
        "templates": templates,
    })))
}

#[instrument(skip(state, request), fields(name = %request.name))]
pub async fn save_template(
    State(state): State<AppState>,
    Json(request): Json<SaveTemplateRequest>,
) -> ApiResult<(StatusCode, Json<DoorTemplate>)> {
    let template = DoorTemplate::from_selection(&request.name, &request.selection)
        .map_err(quote_error_to_response)?;
    let saved = state
        .store
        .save_template(template)
        .await
        .map_err(quote_error_to_response)?;
    Ok((StatusCode::CREATED, Json(saved)))
}

pub async fn rename_template(
    State(state): State<AppState>,
    Path(template_id): Path<String>,
    Json(request): Json<RenameTemplateRequest>,
) -> ApiResult<Json<DoorTemplate>> {
    state
        .store
        .rename_template(&template_id, &request.name)
        .await
        .map(Json)
        .map_err(quote_error_to_response)
}

pub async fn delete_template(
    State(state): State<AppState>,
    Path(template_id): Path<String>,
) -> ApiResult<StatusCode> {
    state
        .store
        .delete_template(&template_id)
        .await
        .map_err(quote_error_to_response)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_draft(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let draft = state
        .store
        .load_draft()
        .await
        .map_err(quote_error_to_response)?;
    Ok(Json(serde_json::json!({ "draft": draft })))
}

pub async fn save_draft(
    State(state): State<AppState>,
    Json(draft): Json<Selection>,
) -> ApiResult<StatusCode> {
    state
        .store
        .save_draft(draft)
        .await
        .map_err(quote_error_to_response)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn clear_draft(State(state): State<AppState>) -> ApiResult<StatusCode> {
    state
        .store
        .clear_draft()
        .await
        .map_err(quote_error_to_response)?;
    Ok(StatusCode::NO_CONTENT)
}
