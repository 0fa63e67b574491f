use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Aggregate, FromDatabaseRow};
use crate::backends::{DatabaseRow, DatabaseRowExt};
use crate::error::OrmResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: i64,
    pub customer_id: i64,
    pub order_date: NaiveDate,
    pub total_amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderDetail {
    pub detail_id: i64,
    pub order_id: i64,
    pub product_id: i64,
    pub quantity: i32,
    pub unit_price: f64,
}

impl OrderDetail {
    pub fn line_total(&self) -> f64 {
        f64::from(self.quantity) * self.unit_price
    }
}

/// An order with all of its detail lines, ordered by `detail_id`.
///
/// `details` is empty, never missing, when the order has no lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderWithDetails {
    pub order: Order,
    pub details: Vec<OrderDetail>,
}

impl OrderWithDetails {
    pub fn new(order: Order) -> Self {
        Self {
            order,
            details: Vec::new(),
        }
    }
}

impl Aggregate for OrderWithDetails {
    fn parent_key(&self) -> i64 {
        self.order.order_id
    }

    fn association_count(&self) -> usize {
        self.details.len()
    }
}

// order_id, customer_id, order_date, total_amount
impl FromDatabaseRow for Order {
    fn from_row(row: &dyn DatabaseRow) -> OrmResult<Self> {
        Ok(Order {
            order_id: row.get("order_id")?,
            customer_id: row.get("customer_id")?,
            order_date: row.get("order_date")?,
            total_amount: row.get("total_amount")?,
        })
    }
}

// detail_id, order_id, product_id, quantity, unit_price
impl FromDatabaseRow for OrderDetail {
    fn from_row(row: &dyn DatabaseRow) -> OrmResult<Self> {
        Ok(OrderDetail {
            detail_id: row.get("detail_id")?,
            order_id: row.get("order_id")?,
            product_id: row.get("product_id")?,
            quantity: row.get("quantity")?,
            unit_price: row.get("unit_price")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_total() {
        let detail = OrderDetail {
            detail_id: 1,
            order_id: 1,
            product_id: 9,
            quantity: 3,
            unit_price: 2.5,
        };
        assert_eq!(detail.line_total(), 7.5);
    }

    #[test]
    fn test_empty_details_serialize_as_array() {
        let aggregate = OrderWithDetails::new(Order {
            order_id: 4,
            customer_id: 1,
            order_date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            total_amount: 0.0,
        });

        let json = serde_json::to_value(&aggregate).unwrap();
        assert_eq!(json["details"], serde_json::json!([]));
        assert_eq!(json["order"]["order_date"], "2024-01-02");
        assert_eq!(aggregate.parent_key(), 4);
        assert_eq!(aggregate.association_count(), 0);
    }
}
