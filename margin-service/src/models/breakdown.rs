//! Margin breakdown snapshot models for margin-service.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of cost a breakdown detail entry represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostType {
    Cogs,
    Landed,
    Overhead,
}

/// Named cost component on a breakdown line. Zero amounts are omitted
/// from breakdowns rather than shown as zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostDetail {
    pub name: String,
    pub cost_type: CostType,
    pub amount: Decimal,
}

/// Per-line snapshot inside a margin breakdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreakdownLine {
    pub product_id: Option<Uuid>,
    pub product_name: Option<String>,
    pub quantity: Decimal,
    pub price_unit: Decimal,
    pub price_subtotal: Decimal,
    pub cogs_unit: Decimal,
    pub landed_cost: Decimal,
    pub overhead_unit: Decimal,
    pub margin_value: Decimal,
    pub details: Vec<CostDetail>,
}

/// Read-only itemization of an order's margins at the moment it was built.
///
/// A transient value object for presentation; it is not kept in sync with
/// later input changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarginBreakdown {
    pub order_id: Uuid,
    pub order_name: String,
    pub lines: Vec<BreakdownLine>,
    pub total_quantity: Decimal,
    pub total_revenue: Decimal,
    pub total_cogs: Decimal,
    pub total_landed: Decimal,
    pub total_overhead: Decimal,
    pub total_margin: Decimal,
}
