//! Marketplace catalog.
//!
//! Reads come from the in-memory catalog. Supplier edits are written to the
//! database first and applied in memory only once that succeeds, holding the
//! write lock throughout so concurrent edits cannot hand out the same id.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use sheti_core::{Product, ProductDraft, ProductId};
use tracing::instrument;

use crate::db::ProductRepository;
use crate::error::Result;
use crate::middleware::{Lang, RequireSupplier};
use crate::state::AppState;

/// Products in the request language.
pub async fn index(State(state): State<AppState>, Lang(lang): Lang) -> Json<Vec<Product>> {
    let catalog = state.catalog().read().await;
    Json(catalog.products(lang).to_vec())
}

/// List a new product in every language.
#[instrument(skip(state, supplier, draft), fields(supplier = %supplier.name))]
pub async fn create(
    State(state): State<AppState>,
    RequireSupplier(supplier): RequireSupplier,
    Json(draft): Json<ProductDraft>,
) -> Result<(StatusCode, Json<Product>)> {
    let mut catalog = state.catalog().write().await;

    let mut updated = catalog.clone();
    let product = updated.add(draft, &supplier.name)?;
    ProductRepository::new(state.pool()).insert(&product).await?;
    *catalog = updated;

    tracing::info!(product_id = %product.id, "Product listed");
    Ok((StatusCode::CREATED, Json(product)))
}

/// Edit a product's text, price and image in every language.
#[instrument(skip(state, supplier, draft), fields(supplier = %supplier.name))]
pub async fn update(
    State(state): State<AppState>,
    RequireSupplier(supplier): RequireSupplier,
    Lang(lang): Lang,
    Path(id): Path<i32>,
    Json(draft): Json<ProductDraft>,
) -> Result<Json<Product>> {
    let id = ProductId::new(id);
    let draft = draft.validated()?;
    let mut catalog = state.catalog().write().await;

    let mut updated = catalog.clone();
    updated.update(id, draft.clone())?;
    ProductRepository::new(state.pool()).update(id, &draft).await?;
    *catalog = updated;

    let product = catalog
        .find(lang, id)
        .cloned()
        .ok_or(sheti_core::CatalogError::NotFound(id))?;
    Ok(Json(product))
}

/// Remove a product from the marketplace.
#[instrument(skip(state, supplier), fields(supplier = %supplier.name))]
pub async fn delete(
    State(state): State<AppState>,
    RequireSupplier(supplier): RequireSupplier,
    Path(id): Path<i32>,
) -> Result<StatusCode> {
    let id = ProductId::new(id);
    let mut catalog = state.catalog().write().await;

    let mut updated = catalog.clone();
    updated.remove(id)?;
    ProductRepository::new(state.pool()).delete(id).await?;
    *catalog = updated;

    tracing::info!(product_id = %id, "Product removed");
    Ok(StatusCode::NO_CONTENT)
}
