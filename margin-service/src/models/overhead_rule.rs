//! Overhead rule model for margin-service.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How an overhead rule turns a base unit cost into an overhead amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverheadType {
    Percentage,
    Fixed,
}

/// Overhead configuration rule, optionally scoped to a product category.
///
/// Created and edited through store configuration operations only; the
/// computation never mutates rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverheadRule {
    pub rule_id: Uuid,
    pub name: String,
    pub category_id: Option<Uuid>,
    pub overhead_type: OverheadType,
    pub percent: Decimal,
    pub fixed_amount: Decimal,
    pub active: bool,
    pub created_utc: DateTime<Utc>,
}

/// Input for creating an overhead rule.
#[derive(Debug, Clone)]
pub struct CreateOverheadRule {
    pub name: String,
    pub category_id: Option<Uuid>,
    pub overhead_type: OverheadType,
    pub percent: Decimal,
    pub fixed_amount: Decimal,
}

/// Input for updating an overhead rule.
#[derive(Debug, Clone, Default)]
pub struct UpdateOverheadRule {
    pub name: Option<String>,
    pub category_id: Option<Option<Uuid>>,
    pub overhead_type: Option<OverheadType>,
    pub percent: Option<Decimal>,
    pub fixed_amount: Option<Decimal>,
    pub active: Option<bool>,
}
