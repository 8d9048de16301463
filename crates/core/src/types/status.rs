//! Role and status enums.
//!
//! Both are stored as `TEXT` columns and converted through
//! `Display`/`FromStr`, which keeps the migrations free of custom enum types.

use serde::{Deserialize, Serialize};

/// What a signed-in user is allowed to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Uses the advisory tools, tasks and marketplace.
    #[default]
    Farmer,
    /// Can also manage the product catalog and fulfil orders.
    Supplier,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Farmer => write!(f, "farmer"),
            Self::Supplier => write!(f, "supplier"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "farmer" => Ok(Self::Farmer),
            "supplier" => Ok(Self::Supplier),
            _ => Err(format!("Invalid role: {s}")),
        }
    }
}

/// Order fulfillment status.
///
/// Serialized exactly as the client shows it (`Pending`, `Shipped`,
/// `Delivered`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OrderStatus {
    #[default]
    Pending,
    Shipped,
    Delivered,
}

impl OrderStatus {
    const fn rank(self) -> u8 {
        match self {
            Self::Pending => 0,
            Self::Shipped => 1,
            Self::Delivered => 2,
        }
    }

    /// Whether an order may move from this status to `next`.
    ///
    /// Fulfillment only moves forward; skipping `Shipped` is allowed.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        next.rank() > self.rank()
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "Pending"),
            Self::Shipped => write!(f, "Shipped"),
            Self::Delivered => write!(f, "Delivered"),
        }
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(Self::Pending),
            "Shipped" => Ok(Self::Shipped),
            "Delivered" => Ok(Self::Delivered),
            _ => Err(format!("Invalid order status: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trips_through_text() {
        for role in [Role::Farmer, Role::Supplier] {
            assert_eq!(role.to_string().parse::<Role>(), Ok(role));
        }
        assert!("admin".parse::<Role>().is_err());
    }

    #[test]
    fn test_order_status_only_moves_forward() {
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Shipped));
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Delivered));
        assert!(OrderStatus::Shipped.can_transition_to(OrderStatus::Delivered));
        assert!(!OrderStatus::Delivered.can_transition_to(OrderStatus::Pending));
        assert!(!OrderStatus::Shipped.can_transition_to(OrderStatus::Shipped));
    }

    #[test]
    fn test_order_status_serializes_as_display() {
        let json = serde_json::to_string(&OrderStatus::Shipped).unwrap_or_default();
        assert_eq!(json, "\"Shipped\"");
    }
}
