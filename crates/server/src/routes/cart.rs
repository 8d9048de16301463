//! Shopping cart handlers.
//!
//! The cart is kept in the session, so it survives page reloads without a
//! database round trip and disappears at logout.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use sheti_core::{Cart, CartItem, Money, ProductId};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::middleware::Lang;
use crate::models::session_keys;
use crate::state::AppState;

/// Cart contents with derived totals.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub items: Vec<CartItem>,
    pub total: Money,
    pub item_count: u64,
}

impl From<Cart> for CartView {
    fn from(cart: Cart) -> Self {
        Self {
            total: cart.total(),
            item_count: cart.item_count(),
            items: cart.items,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCart {
    pub product_id: ProductId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCart {
    pub product_id: ProductId,
    pub quantity: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveFromCart {
    pub product_id: ProductId,
}

/// Get the cart from the session.
pub(crate) async fn load_cart(session: &Session) -> Result<Cart> {
    Ok(session
        .get::<Cart>(session_keys::CART)
        .await?
        .unwrap_or_default())
}

/// Store the cart in the session.
pub(crate) async fn save_cart(session: &Session, cart: &Cart) -> Result<()> {
    session.insert(session_keys::CART, cart).await?;
    Ok(())
}

fn not_in_cart(id: ProductId) -> AppError {
    AppError::NotFound(format!("product {id} is not in the cart"))
}

/// Current cart.
pub async fn show(session: Session) -> Result<Json<CartView>> {
    Ok(Json(load_cart(&session).await?.into()))
}

/// Add one unit of a product, as listed in the request language.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Lang(lang): Lang,
    Json(form): Json<AddToCart>,
) -> Result<Json<CartView>> {
    let product = state
        .catalog()
        .read()
        .await
        .find(lang, form.product_id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("product {}", form.product_id)))?;

    let mut cart = load_cart(&session).await?;
    cart.add(product);
    save_cart(&session, &cart).await?;
    Ok(Json(cart.into()))
}

/// Set a line's quantity; zero or less removes it.
#[instrument(skip(session))]
pub async fn update(session: Session, Json(form): Json<UpdateCart>) -> Result<Json<CartView>> {
    let mut cart = load_cart(&session).await?;
    if !cart.set_quantity(form.product_id, form.quantity) {
        return Err(not_in_cart(form.product_id));
    }
    save_cart(&session, &cart).await?;
    Ok(Json(cart.into()))
}

/// Remove a line.
#[instrument(skip(session))]
pub async fn remove(
    session: Session,
    Json(form): Json<RemoveFromCart>,
) -> Result<Json<CartView>> {
    let mut cart = load_cart(&session).await?;
    if !cart.remove(form.product_id) {
        return Err(not_in_cart(form.product_id));
    }
    save_cart(&session, &cart).await?;
    Ok(Json(cart.into()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use sheti_core::{Catalog, Language};

    use super::*;

    #[test]
    fn test_cart_view_totals() {
        let catalog = Catalog::seeded();
        let mut cart = Cart::new();
        let first = catalog.products(Language::En)[0].clone();
        cart.add(first.clone());
        cart.add(first.clone());

        let view = CartView::from(cart);
        assert_eq!(view.item_count, 2);
        assert_eq!(view.total, first.price.times(2));
    }
}
