//! Shared fixtures for margin-service integration tests.
#![allow(dead_code)]

use margin_service::models::{
    CreateOrder, CreateOrderLine, CreateOverheadRule, Order, OverheadType, Product,
};
use margin_service::services::{MarginEngine, Settings};
use rust_decimal::Decimal;
use std::sync::Once;
use uuid::Uuid;

static TRACING: Once = Once::new();

/// Engine with the stock 5% global overhead fallback.
pub fn engine() -> MarginEngine {
    engine_with_percent(Decimal::from(5))
}

pub fn engine_with_percent(percent: Decimal) -> MarginEngine {
    TRACING.call_once(|| margin_service::observability::init_tracing("info"));

    let settings = Settings {
        overhead_percent: percent,
        ..Default::default()
    };
    MarginEngine::new(&settings)
}

pub fn seed_product(
    engine: &mut MarginEngine,
    name: &str,
    category_id: Option<Uuid>,
    standard_price: Decimal,
) -> Product {
    engine.upsert_product(Product {
        product_id: Uuid::new_v4(),
        name: name.to_string(),
        category_id,
        standard_price,
    })
}

pub fn seed_order(engine: &mut MarginEngine, name: &str) -> Order {
    engine.create_order(CreateOrder {
        name: name.to_string(),
    })
}

pub fn percentage_rule(name: &str, category_id: Uuid, percent: Decimal) -> CreateOverheadRule {
    CreateOverheadRule {
        name: name.to_string(),
        category_id: Some(category_id),
        overhead_type: OverheadType::Percentage,
        percent,
        fixed_amount: Decimal::ZERO,
    }
}

pub fn fixed_rule(name: &str, category_id: Uuid, amount: Decimal) -> CreateOverheadRule {
    CreateOverheadRule {
        name: name.to_string(),
        category_id: Some(category_id),
        overhead_type: OverheadType::Fixed,
        percent: Decimal::ZERO,
        fixed_amount: amount,
    }
}

/// Line input with `price_subtotal = price_unit * quantity`.
pub fn line(
    product_id: Option<Uuid>,
    quantity: i64,
    price_unit: i64,
    landed_cost: i64,
) -> CreateOrderLine {
    let quantity = Decimal::from(quantity);
    let price_unit = Decimal::from(price_unit);
    CreateOrderLine {
        product_id,
        quantity,
        price_unit,
        price_subtotal: price_unit * quantity,
        landed_cost: Decimal::from(landed_cost),
        sort_order: 0,
    }
}
