//! Orders and their detail lines (one-to-many)

use serde::{Deserialize, Serialize};

use super::sql;
use crate::backends::{DatabasePool, DatabaseRow, DatabaseRowExt, DatabaseValue};
use crate::error::{OrmError, OrmResult};
use crate::loading::{group_by_key, BatchLoader, OrderedGroups};
use crate::models::{FromDatabaseRow, Order, OrderDetail, OrderWithDetails};

/// Orders placed within the last `days` days
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderFilter {
    pub days: i32,
}

impl OrderFilter {
    pub fn last_days(days: i32) -> OrmResult<Self> {
        if days < 0 {
            return Err(OrmError::Configuration(format!(
                "days must be zero or positive, got {}",
                days
            )));
        }
        Ok(Self { days })
    }
}

impl Default for OrderFilter {
    fn default() -> Self {
        Self { days: 30 }
    }
}

impl std::fmt::Display for OrderFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "orders from the last {} days", self.days)
    }
}

/// Order repository over an injected pool
pub struct OrderRepository<'a> {
    pool: &'a dyn DatabasePool,
    batch_loader: BatchLoader,
}

impl<'a> OrderRepository<'a> {
    pub fn new(pool: &'a dyn DatabasePool) -> Self {
        Self::with_batch_loader(pool, BatchLoader::new())
    }

    pub fn with_batch_loader(pool: &'a dyn DatabasePool, batch_loader: BatchLoader) -> Self {
        Self { pool, batch_loader }
    }

    /// Orders matching `filter`, ordered by `order_id`
    pub async fn orders(&self, filter: &OrderFilter) -> OrmResult<Vec<Order>> {
        let rows = self
            .pool
            .fetch_all(sql::ORDERS_BY_DAYS, &[DatabaseValue::Int32(filter.days)])
            .await
            .map_err(|e| e.context("failed to execute orders query"))?;

        rows.iter()
            .map(|row| Order::from_row(row.as_ref()).map_err(|e| e.context("failed to scan order row")))
            .collect()
    }

    /// Detail lines of one order, ordered by `detail_id`
    pub async fn details_for_order(&self, order_id: i64) -> OrmResult<Vec<OrderDetail>> {
        let rows = self
            .pool
            .fetch_all(sql::DETAILS_BY_ORDER_ID, &[DatabaseValue::Int64(order_id)])
            .await
            .map_err(|e| e.context("failed to execute order details query"))?;

        rows.iter()
            .map(|row| {
                OrderDetail::from_row(row.as_ref()).map_err(|e| e.context("failed to scan order detail row"))
            })
            .collect()
    }

    /// Detail lines of every order in `order_ids`, ordered by (order_id, detail_id)
    pub async fn details_for_orders(&self, order_ids: &[i64]) -> OrmResult<Vec<OrderDetail>> {
        self.batch_loader
            .load(self.pool, &sql::DETAILS_BY_ORDER_IDS, order_ids)
            .await
    }

    /// N+1 retrieval: one query for the orders, then one per order.
    pub async fn fetch_naive(&self, filter: &OrderFilter) -> OrmResult<Vec<OrderWithDetails>> {
        let orders = self
            .orders(filter)
            .await
            .map_err(|e| e.context("failed to get orders"))?;

        let mut result = Vec::with_capacity(orders.len());
        for order in orders {
            let details = self
                .details_for_order(order.order_id)
                .await
                .map_err(|e| e.context(format!("failed to get details for order {}", order.order_id)))?;

            result.push(OrderWithDetails { order, details });
        }

        Ok(result)
    }

    /// Single LEFT JOIN query, grouped client-side.
    pub async fn fetch_join(&self, filter: &OrderFilter) -> OrmResult<Vec<OrderWithDetails>> {
        let rows = self
            .pool
            .fetch_all(sql::ORDERS_WITH_DETAILS_JOIN, &[DatabaseValue::Int32(filter.days)])
            .await
            .map_err(|e| e.context("failed to execute join query"))?;

        let mut groups: OrderedGroups<i64, OrderWithDetails> = OrderedGroups::new();
        for row in &rows {
            let row = row.as_ref();
            let order_id: i64 = row.get("order_id").map_err(|e| e.context("failed to scan join row"))?;

            let aggregate = groups
                .get_or_try_insert_with(order_id, || Order::from_row(row).map(OrderWithDetails::new))
                .map_err(|e| e.context("failed to scan join row"))?;

            if let Some(detail) = detail_from_join_row(row, order_id).map_err(|e| e.context("failed to scan join row"))? {
                aggregate.details.push(detail);
            }
        }

        Ok(groups.into_values())
    }

    /// Two queries: the orders, then all of their details through one IN list.
    pub async fn fetch_batch(&self, filter: &OrderFilter) -> OrmResult<Vec<OrderWithDetails>> {
        let orders = self
            .orders(filter)
            .await
            .map_err(|e| e.context("failed to get orders"))?;

        if orders.is_empty() {
            return Ok(Vec::new());
        }

        // order_id is the primary key, so these are already distinct and ascending
        let order_ids: Vec<i64> = orders.iter().map(|order| order.order_id).collect();

        let details = self
            .details_for_orders(&order_ids)
            .await
            .map_err(|e| e.context("failed to get details"))?;

        let mut details_by_order = group_by_key(details, |detail| detail.order_id);

        Ok(orders
            .into_iter()
            .map(|order| {
                let details = details_by_order.swap_remove(&order.order_id).unwrap_or_default();
                OrderWithDetails { order, details }
            })
            .collect())
    }
}

/// Detail half of a join row; `None` when the outer join found no detail
fn detail_from_join_row(row: &dyn DatabaseRow, order_id: i64) -> OrmResult<Option<OrderDetail>> {
    let Some(detail_id) = row.try_get::<i64>("detail_id")? else {
        return Ok(None);
    };

    Ok(Some(OrderDetail {
        detail_id,
        order_id,
        product_id: row.get("product_id")?,
        quantity: row.get("quantity")?,
        unit_price: row.get("unit_price")?,
    }))
}
