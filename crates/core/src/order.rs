//! Checkout and order tracking.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cart::{Cart, CartItem};
use crate::types::{Money, OrderStatus};

/// Errors placing or updating an order.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum OrderError {
    #[error("cannot place an order with an empty cart")]
    EmptyCart,
    #[error("shipping field `{0}` is required")]
    MissingField(&'static str),
    #[error("order total is too large")]
    TotalTooLarge,
    #[error("order cannot move from {from} to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },
}

/// Shipping details collected at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingInfo {
    pub name: String,
    pub address: String,
    pub city: String,
    pub pincode: String,
}

impl ShippingInfo {
    /// Ensure every field has a value.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::MissingField`] naming the first blank field.
    pub fn validate(&self) -> Result<(), OrderError> {
        [
            ("name", &self.name),
            ("address", &self.address),
            ("city", &self.city),
            ("pincode", &self.pincode),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty())
        .map_or(Ok(()), |(field, _)| Err(OrderError::MissingField(field)))
    }

    /// Single-line address stored on the order.
    #[must_use]
    pub fn formatted_address(&self) -> String {
        format!(
            "{}, {}, {}",
            self.address.trim(),
            self.city.trim(),
            self.pincode.trim()
        )
    }
}

/// A placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub items: Vec<CartItem>,
    pub total: Money,
    pub customer_name: String,
    pub shipping_address: String,
    pub status: OrderStatus,
    pub order_date: DateTime<Utc>,
    /// Owner key of the customer who placed it.
    pub user_id: String,
}

impl Order {
    /// Turn the cart into a pending order.
    ///
    /// The cart itself is left untouched; callers clear it once the order
    /// has been stored. The id is `AGRI-<unix millis>-<random suffix>`.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart is empty, shipping info is incomplete,
    /// or the total does not fit the orders table.
    pub fn place(
        cart: &Cart,
        shipping: &ShippingInfo,
        user_id: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Result<Self, OrderError> {
        if cart.is_empty() {
            return Err(OrderError::EmptyCart);
        }
        shipping.validate()?;
        let total = cart.total();
        if !total.fits_storage() {
            return Err(OrderError::TotalTooLarge);
        }

        let suffix: u16 = rand::random();
        Ok(Self {
            id: format!("AGRI-{}-{suffix:04x}", now.timestamp_millis()),
            items: cart.items.clone(),
            total,
            customer_name: shipping.name.trim().to_owned(),
            shipping_address: shipping.formatted_address(),
            status: OrderStatus::Pending,
            order_date: now,
            user_id: user_id.into(),
        })
    }

    /// Move the order forward in fulfillment.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::InvalidTransition`] for backward or repeated
    /// transitions.
    pub fn advance_status(&mut self, next: OrderStatus) -> Result<(), OrderError> {
        if !self.status.can_transition_to(next) {
            return Err(OrderError::InvalidTransition {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::types::{Language, ProductId};

    fn shipping() -> ShippingInfo {
        ShippingInfo {
            name: "Sunil Jadhav".to_owned(),
            address: "Gat No. 12, Shirur Road".to_owned(),
            city: "Pune".to_owned(),
            pincode: "412208".to_owned(),
        }
    }

    fn cart() -> Cart {
        let catalog = Catalog::seeded();
        let mut cart = Cart::new();
        cart.add(catalog.find(Language::En, ProductId::new(2)).cloned().unwrap());
        cart.add(catalog.find(Language::En, ProductId::new(2)).cloned().unwrap());
        cart
    }

    #[test]
    fn test_place_copies_cart() {
        let now = DateTime::from_timestamp_millis(1_718_000_000_000).unwrap();
        let order = Order::place(&cart(), &shipping(), "sunil@example.in", now).unwrap();
        assert!(order.id.starts_with("AGRI-1718000000000-"));
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.total, Money::from_rupees(3740));
        assert_eq!(order.shipping_address, "Gat No. 12, Shirur Road, Pune, 412208");
        assert_eq!(order.items.len(), 1);
    }

    #[test]
    fn test_same_millisecond_orders_get_distinct_ids() {
        let now = DateTime::from_timestamp_millis(1_718_000_000_000).unwrap();
        let ids: std::collections::HashSet<String> = (0..8)
            .map(|i| {
                Order::place(&cart(), &shipping(), format!("farmer-{i}"), now)
                    .unwrap()
                    .id
            })
            .collect();
        assert!(ids.len() > 1);
    }

    #[test]
    fn test_place_rejects_total_beyond_storage() {
        let mut product = Catalog::seeded()
            .find(Language::En, ProductId::new(1))
            .cloned()
            .unwrap();
        product.price = Money::from_rupees(9_000_000_000);
        let mut cart = Cart::new();
        cart.add(product.clone());
        cart.add(product);
        assert_eq!(
            Order::place(&cart, &shipping(), "x", Utc::now()),
            Err(OrderError::TotalTooLarge)
        );
    }

    #[test]
    fn test_place_rejects_empty_cart_and_blank_fields() {
        let now = Utc::now();
        assert_eq!(
            Order::place(&Cart::new(), &shipping(), "x", now),
            Err(OrderError::EmptyCart)
        );
        let mut info = shipping();
        info.city = "  ".to_owned();
        assert_eq!(
            Order::place(&cart(), &info, "x", now),
            Err(OrderError::MissingField("city"))
        );
    }

    #[test]
    fn test_advance_status_forward_only() {
        let mut order = Order::place(&cart(), &shipping(), "x", Utc::now()).unwrap();
        order.advance_status(OrderStatus::Shipped).unwrap();
        assert!(order.advance_status(OrderStatus::Pending).is_err());
        order.advance_status(OrderStatus::Delivered).unwrap();
        assert_eq!(order.status, OrderStatus::Delivered);
    }
}
