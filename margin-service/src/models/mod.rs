//! Domain models for margin-service.

mod breakdown;
mod order;
mod overhead_rule;
mod product;

pub use breakdown::{BreakdownLine, CostDetail, CostType, MarginBreakdown};
pub use order::{
    CreateOrder, CreateOrderLine, LineMargin, Notification, Order, OrderLine, OrderMargins,
    RecomputeOutcome, UpdateOrderLine,
};
pub use overhead_rule::{CreateOverheadRule, OverheadRule, OverheadType, UpdateOverheadRule};
pub use product::Product;
