//! Margin breakdown snapshot tests for margin-service.

mod common;

use common::{engine, engine_with_percent, line, seed_order, seed_product};
use margin_service::models::CostType;
use rust_decimal::Decimal;

#[test]
fn breakdown_itemizes_all_three_cost_components() {
    let mut engine = engine_with_percent(Decimal::from(5));
    let product = seed_product(&mut engine, "Widget", None, Decimal::from(100));
    let order = seed_order(&mut engine, "SO001");

    engine
        .add_order_line(order.order_id, line(Some(product.product_id), 2, 150, 10))
        .expect("Failed to add line");

    let breakdown = engine
        .margin_breakdown(order.order_id)
        .expect("Failed to build breakdown");

    assert_eq!(breakdown.lines.len(), 1);
    let details = &breakdown.lines[0].details;
    assert_eq!(details.len(), 3);

    assert_eq!(details[0].name, "Base COGS");
    assert_eq!(details[0].cost_type, CostType::Cogs);
    assert_eq!(details[0].amount, Decimal::from(200));

    assert_eq!(details[1].name, "Landed Cost (Freight, Customs, etc.)");
    assert_eq!(details[1].cost_type, CostType::Landed);
    assert_eq!(details[1].amount, Decimal::from(20));

    assert_eq!(details[2].name, "Overhead (Allocated)");
    assert_eq!(details[2].cost_type, CostType::Overhead);
    assert_eq!(details[2].amount, Decimal::from(10));
}

#[test]
fn zero_cost_components_are_omitted() {
    let mut engine = engine_with_percent(Decimal::ZERO);
    let product = seed_product(&mut engine, "Widget", None, Decimal::from(50));
    let order = seed_order(&mut engine, "SO001");

    // No landed cost, zero-percent overhead: only Base COGS remains.
    engine
        .add_order_line(order.order_id, line(Some(product.product_id), 1, 80, 0))
        .expect("Failed to add line");

    let breakdown = engine
        .margin_breakdown(order.order_id)
        .expect("Failed to build breakdown");

    let details = &breakdown.lines[0].details;
    assert_eq!(details.len(), 1);
    assert_eq!(details[0].cost_type, CostType::Cogs);
}

#[test]
fn productless_line_has_no_cogs_or_overhead_details() {
    let mut engine = engine();
    let order = seed_order(&mut engine, "SO001");

    engine
        .add_order_line(order.order_id, line(None, 2, 100, 5))
        .expect("Failed to add line");

    let breakdown = engine
        .margin_breakdown(order.order_id)
        .expect("Failed to build breakdown");

    // Landed cost is entered on the line itself, so it still shows.
    let details = &breakdown.lines[0].details;
    assert_eq!(details.len(), 1);
    assert_eq!(details[0].cost_type, CostType::Landed);
    assert_eq!(details[0].amount, Decimal::from(10));
}

#[test]
fn breakdown_totals_aggregate_across_lines() {
    let mut engine = engine_with_percent(Decimal::from(5));
    let a = seed_product(&mut engine, "A", None, Decimal::from(100));
    let b = seed_product(&mut engine, "B", None, Decimal::from(40));
    let order = seed_order(&mut engine, "SO001");

    engine
        .add_order_line(order.order_id, line(Some(a.product_id), 2, 150, 10))
        .expect("Failed to add line");
    engine
        .add_order_line(order.order_id, line(Some(b.product_id), 3, 60, 0))
        .expect("Failed to add line");

    let breakdown = engine
        .margin_breakdown(order.order_id)
        .expect("Failed to build breakdown");

    assert_eq!(breakdown.order_name, "SO001");
    assert_eq!(breakdown.total_quantity, Decimal::from(5));
    assert_eq!(breakdown.total_revenue, Decimal::from(480));
    assert_eq!(breakdown.total_cogs, Decimal::from(320));
    assert_eq!(breakdown.total_landed, Decimal::from(20));
    assert_eq!(breakdown.total_overhead, Decimal::from(16));
    assert_eq!(breakdown.total_margin, Decimal::from(124));
}

#[test]
fn breakdown_carries_product_names_and_line_values() {
    let mut engine = engine_with_percent(Decimal::from(5));
    let product = seed_product(&mut engine, "Widget", None, Decimal::from(100));
    let order = seed_order(&mut engine, "SO001");

    engine
        .add_order_line(order.order_id, line(Some(product.product_id), 2, 150, 10))
        .expect("Failed to add line");

    let breakdown = engine
        .margin_breakdown(order.order_id)
        .expect("Failed to build breakdown");
    let bline = &breakdown.lines[0];

    assert_eq!(bline.product_name.as_deref(), Some("Widget"));
    assert_eq!(bline.price_unit, Decimal::from(150));
    assert_eq!(bline.price_subtotal, Decimal::from(300));
    assert_eq!(bline.cogs_unit, Decimal::from(100));
    assert_eq!(bline.landed_cost, Decimal::from(10));
    assert_eq!(bline.overhead_unit, Decimal::from(5));
    assert_eq!(bline.margin_value, Decimal::from(70));
}

#[test]
fn breakdown_is_a_snapshot_not_a_view() {
    let mut engine = engine_with_percent(Decimal::from(5));
    let mut product = seed_product(&mut engine, "Widget", None, Decimal::from(100));
    let order = seed_order(&mut engine, "SO001");

    engine
        .add_order_line(order.order_id, line(Some(product.product_id), 2, 150, 10))
        .expect("Failed to add line");

    let snapshot = engine
        .margin_breakdown(order.order_id)
        .expect("Failed to build breakdown");

    product.standard_price = Decimal::from(120);
    engine.upsert_product(product);

    // The earlier snapshot is untouched; a rebuilt one reflects the change.
    assert_eq!(snapshot.lines[0].cogs_unit, Decimal::from(100));
    let rebuilt = engine
        .margin_breakdown(order.order_id)
        .expect("Failed to build breakdown");
    assert_eq!(rebuilt.lines[0].cogs_unit, Decimal::from(120));
}

#[test]
fn breakdown_serializes_for_presentation() {
    let mut engine = engine_with_percent(Decimal::from(5));
    let product = seed_product(&mut engine, "Widget", None, Decimal::from(100));
    let order = seed_order(&mut engine, "SO001");

    engine
        .add_order_line(order.order_id, line(Some(product.product_id), 2, 150, 10))
        .expect("Failed to add line");

    let breakdown = engine
        .margin_breakdown(order.order_id)
        .expect("Failed to build breakdown");

    let json = serde_json::to_value(&breakdown).expect("Failed to serialize breakdown");
    assert_eq!(json["order_name"], "SO001");
    assert_eq!(json["lines"][0]["details"][0]["cost_type"], "cogs");
    assert_eq!(json["lines"][0]["details"][0]["amount"], "200");
}
