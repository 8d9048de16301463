//! Order storage.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::types::Json;

use sheti_core::{CartItem, Money, Order, OrderStatus};

use super::RepositoryError;

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: String,
    user_id: String,
    items: Json<Vec<CartItem>>,
    total: Money,
    customer_name: String,
    shipping_address: String,
    status: String,
    order_date: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
    type Error = RepositoryError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let status: OrderStatus = row.status.parse().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid status on order {}: {e}", row.id))
        })?;

        Ok(Self {
            id: row.id,
            items: row.items.0,
            total: row.total,
            customer_name: row.customer_name,
            shipping_address: row.shipping_address,
            status,
            order_date: row.order_date,
            user_id: row.user_id,
        })
    }
}

const ORDER_COLUMNS: &str =
    "id, user_id, items, total, customer_name, shipping_address, status, order_date";

/// Repository for marketplace orders.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Orders placed by a user, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored status is unknown.
    pub async fn list_for_user(&self, user_id: &str) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE user_id = $1 ORDER BY order_date DESC"
        ))
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Order::try_from).collect()
    }

    /// Every order, newest first, for suppliers fulfilling them.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored status is unknown.
    pub async fn list_all(&self) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders ORDER BY order_date DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Order::try_from).collect()
    }

    /// Get an order by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: &str) -> Result<Option<Order>, RepositoryError> {
        sqlx::query_as::<_, OrderRow>(&format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"))
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .map(Order::try_from)
            .transpose()
    }

    /// Store a newly placed order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the id is already taken.
    pub async fn insert(&self, order: &Order) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO orders
                (id, user_id, items, total, customer_name, shipping_address, status, order_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ",
        )
        .bind(&order.id)
        .bind(&order.user_id)
        .bind(Json(&order.items))
        .bind(order.total)
        .bind(&order.customer_name)
        .bind(&order.shipping_address)
        .bind(order.status.to_string())
        .bind(order.order_date)
        .execute(self.pool)
        .await
        .map_err(|e| RepositoryError::from_insert(e, "order"))?;

        Ok(())
    }

    /// Move an order from `from` to `to`.
    ///
    /// Transition rules are checked by the caller with
    /// [`Order::advance_status`]; the write only lands if the stored status
    /// is still `from`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the order is missing or its
    /// status changed since it was read.
    pub async fn update_status(
        &self,
        id: &str,
        from: OrderStatus,
        to: OrderStatus,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(UPDATE_STATUS)
            .bind(id)
            .bind(to.to_string())
            .bind(from.to_string())
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::Conflict(format!(
                "order {id} is no longer {from}"
            )));
        }
        Ok(())
    }
}

/// Compare-and-set on the status column.
const UPDATE_STATUS: &str = "UPDATE orders SET status = $2 WHERE id = $1 AND status = $3";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_write_is_guarded_by_previous_status() {
        assert!(UPDATE_STATUS.ends_with("WHERE id = $1 AND status = $3"));
    }
}
