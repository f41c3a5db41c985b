//! Sales order and order line models for margin-service.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Line on a sales order.
///
/// `landed_cost` is a manually entered per-unit cost (freight, customs).
/// Derived margin values live in [`LineMargin`], not here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLine {
    pub line_id: Uuid,
    pub order_id: Uuid,
    pub product_id: Option<Uuid>,
    pub quantity: Decimal,
    pub price_unit: Decimal,
    pub price_subtotal: Decimal,
    pub landed_cost: Decimal,
    pub sort_order: i32,
    pub created_utc: DateTime<Utc>,
}

/// Sales order, owning its lines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub order_id: Uuid,
    pub name: String,
    pub lines: Vec<OrderLine>,
    pub created_utc: DateTime<Utc>,
}

/// Input for creating an order.
#[derive(Debug, Clone)]
pub struct CreateOrder {
    pub name: String,
}

/// Input for adding a line to an order.
#[derive(Debug, Clone)]
pub struct CreateOrderLine {
    pub product_id: Option<Uuid>,
    pub quantity: Decimal,
    pub price_unit: Decimal,
    pub price_subtotal: Decimal,
    pub landed_cost: Decimal,
    pub sort_order: i32,
}

/// Input for updating an order line.
#[derive(Debug, Clone, Default)]
pub struct UpdateOrderLine {
    pub product_id: Option<Option<Uuid>>,
    pub quantity: Option<Decimal>,
    pub price_unit: Option<Decimal>,
    pub price_subtotal: Option<Decimal>,
    pub landed_cost: Option<Decimal>,
    pub sort_order: Option<i32>,
}

/// Derived per-unit margin values for a single line.
///
/// A pure function of the line, its product and the overhead configuration;
/// all zeros when the line has no product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineMargin {
    pub cogs_unit: Decimal,
    pub overhead_unit: Decimal,
    pub margin_value: Decimal,
}

impl LineMargin {
    pub const ZERO: LineMargin = LineMargin {
        cogs_unit: Decimal::ZERO,
        overhead_unit: Decimal::ZERO,
        margin_value: Decimal::ZERO,
    };
}

/// Derived order-level totals, summed over line margins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderMargins {
    pub total_cogs: Decimal,
    pub total_overhead: Decimal,
    pub net_margin: Decimal,
}

/// User-facing notification payload returned by actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub message: String,
}

/// Result of the manual "recompute margins" action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecomputeOutcome {
    pub totals: OrderMargins,
    pub notification: Notification,
}
