//! Product model for margin-service.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Product record supplied by the host catalog. Read-only input to the
/// margin computation; `standard_price` is the unit cost (COGS).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub product_id: Uuid,
    pub name: String,
    pub category_id: Option<Uuid>,
    pub standard_price: Decimal,
}
