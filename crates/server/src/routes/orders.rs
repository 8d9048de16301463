//! Checkout and order tracking.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use serde::Deserialize;
use sheti_core::{Order, OrderStatus, ShippingInfo};
use tower_sessions::Session;
use tracing::instrument;

use super::cart::{load_cart, save_cart};
use crate::db::OrderRepository;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::{RequireSupplier, RequireUser};
use crate::state::AppState;

/// Turn the session cart into a pending order.
///
/// The cart is emptied only after the order is stored.
#[instrument(skip(state, session, user, shipping), fields(user_id = %user.id))]
pub async fn checkout(
    State(state): State<AppState>,
    session: Session,
    RequireUser(user): RequireUser,
    Json(shipping): Json<ShippingInfo>,
) -> Result<(StatusCode, Json<Order>)> {
    let mut cart = load_cart(&session).await?;
    let order = Order::place(&cart, &shipping, user.owner_key(), Utc::now())?;

    OrderRepository::new(state.pool()).insert(&order).await?;
    cart.clear();
    save_cart(&session, &cart).await?;

    add_breadcrumb("orders", "Order placed", Some(&[("order_id", order.id.as_str())]));
    tracing::info!(order_id = %order.id, total = %order.total, "Order placed");
    Ok((StatusCode::CREATED, Json(order)))
}

/// A customer's own orders; suppliers see every order.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn index(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<Json<Vec<Order>>> {
    let repo = OrderRepository::new(state.pool());
    let orders = if user.is_supplier() {
        repo.list_all().await?
    } else {
        repo.list_for_user(user.owner_key()).await?
    };
    Ok(Json(orders))
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: OrderStatus,
}

/// Move an order forward in fulfillment.
#[instrument(skip(state, supplier), fields(supplier = %supplier.name))]
pub async fn update_status(
    State(state): State<AppState>,
    RequireSupplier(supplier): RequireSupplier,
    Path(id): Path<String>,
    Json(update): Json<StatusUpdate>,
) -> Result<Json<Order>> {
    let repo = OrderRepository::new(state.pool());
    let mut order = repo
        .get(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("order {id}")))?;

    let previous = order.status;
    order.advance_status(update.status)?;
    repo.update_status(&order.id, previous, order.status).await?;

    tracing::info!(order_id = %order.id, status = %order.status, "Order status changed");
    Ok(Json(order))
}
