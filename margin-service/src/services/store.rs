//! In-memory store for margin-service.
//!
//! Stands in for the host persistence layer: it holds the products, overhead
//! rules and orders the margin computation reads, and exposes the
//! configuration operations that mutate them. Derived margin values are
//! never stored here.

use crate::error::AppError;
use crate::models::{
    CreateOrder, CreateOrderLine, CreateOverheadRule, Order, OrderLine, OverheadRule, Product,
    UpdateOrderLine, UpdateOverheadRule,
};
use chrono::Utc;
use std::collections::HashMap;
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// Container for margin computation inputs.
#[derive(Debug, Default)]
pub struct Store {
    products: HashMap<Uuid, Product>,
    rules: Vec<OverheadRule>,
    rules_by_category: HashMap<Uuid, Vec<Uuid>>,
    orders: HashMap<Uuid, Order>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    // -------------------------------------------------------------------------
    // Product Operations
    // -------------------------------------------------------------------------

    /// Insert or replace a product record.
    #[instrument(skip(self, product), fields(product_id = %product.product_id))]
    pub fn upsert_product(&mut self, product: Product) -> Product {
        info!(name = %product.name, "Product upserted");
        self.products.insert(product.product_id, product.clone());
        product
    }

    pub fn get_product(&self, product_id: Uuid) -> Option<&Product> {
        self.products.get(&product_id)
    }

    /// Line ids across all orders that reference the given product.
    pub fn lines_for_product(&self, product_id: Uuid) -> Vec<Uuid> {
        self.orders
            .values()
            .flat_map(|order| order.lines.iter())
            .filter(|line| line.product_id == Some(product_id))
            .map(|line| line.line_id)
            .collect()
    }

    // -------------------------------------------------------------------------
    // Overhead Rule Operations
    // -------------------------------------------------------------------------

    /// Create a new overhead rule.
    ///
    /// A second active rule for the same category is allowed but flagged;
    /// lookups keep first-found semantics among duplicates.
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub fn create_overhead_rule(&mut self, input: CreateOverheadRule) -> OverheadRule {
        if let Some(category_id) = input.category_id {
            let duplicate = self
                .rules
                .iter()
                .any(|r| r.active && r.category_id == Some(category_id));
            if duplicate {
                warn!(
                    category_id = %category_id,
                    "Duplicate active overhead rule for category"
                );
            }
        }

        let rule = OverheadRule {
            rule_id: Uuid::new_v4(),
            name: input.name,
            category_id: input.category_id,
            overhead_type: input.overhead_type,
            percent: input.percent,
            fixed_amount: input.fixed_amount,
            active: true,
            created_utc: Utc::now(),
        };

        info!(rule_id = %rule.rule_id, name = %rule.name, "Overhead rule created");
        self.rules.push(rule.clone());
        self.rebuild_category_index();
        rule
    }

    pub fn get_overhead_rule(&self, rule_id: Uuid) -> Result<&OverheadRule, AppError> {
        self.rules
            .iter()
            .find(|r| r.rule_id == rule_id)
            .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Overhead rule {} not found", rule_id)))
    }

    pub fn list_overhead_rules(&self) -> &[OverheadRule] {
        &self.rules
    }

    /// Update an overhead rule.
    #[instrument(skip(self, input), fields(rule_id = %rule_id))]
    pub fn update_overhead_rule(
        &mut self,
        rule_id: Uuid,
        input: UpdateOverheadRule,
    ) -> Result<OverheadRule, AppError> {
        let rule = self
            .rules
            .iter_mut()
            .find(|r| r.rule_id == rule_id)
            .ok_or_else(|| {
                AppError::NotFound(anyhow::anyhow!("Overhead rule {} not found", rule_id))
            })?;

        if let Some(name) = input.name {
            rule.name = name;
        }
        if let Some(category_id) = input.category_id {
            rule.category_id = category_id;
        }
        if let Some(overhead_type) = input.overhead_type {
            rule.overhead_type = overhead_type;
        }
        if let Some(percent) = input.percent {
            rule.percent = percent;
        }
        if let Some(fixed_amount) = input.fixed_amount {
            rule.fixed_amount = fixed_amount;
        }
        if let Some(active) = input.active {
            rule.active = active;
        }

        let updated = rule.clone();
        info!(name = %updated.name, "Overhead rule updated");
        self.rebuild_category_index();
        Ok(updated)
    }

    /// Deactivate an overhead rule; lookups skip inactive rules.
    #[instrument(skip(self), fields(rule_id = %rule_id))]
    pub fn deactivate_overhead_rule(&mut self, rule_id: Uuid) -> Result<OverheadRule, AppError> {
        self.update_overhead_rule(
            rule_id,
            UpdateOverheadRule {
                active: Some(false),
                ..Default::default()
            },
        )
    }

    /// Category ids carrying more than one active rule. A configuration
    /// validation surface; duplicates are not rejected at creation.
    pub fn duplicate_rule_categories(&self) -> Vec<Uuid> {
        self.rules_by_category
            .iter()
            .filter(|(_, ids)| ids.len() > 1)
            .map(|(category_id, _)| *category_id)
            .collect()
    }

    /// Find the overhead rule applicable to a product category, if any.
    ///
    /// First match wins; order among duplicate active rules for a category
    /// is their creation order, which callers must not rely on.
    pub fn lookup_rule(&self, category_id: Option<Uuid>) -> Option<&OverheadRule> {
        let category_id = category_id?;
        let rule_id = self.rules_by_category.get(&category_id)?.first()?;
        self.rules.iter().find(|r| r.rule_id == *rule_id)
    }

    fn rebuild_category_index(&mut self) {
        self.rules_by_category.clear();
        for rule in self.rules.iter().filter(|r| r.active) {
            if let Some(category_id) = rule.category_id {
                self.rules_by_category
                    .entry(category_id)
                    .or_default()
                    .push(rule.rule_id);
            }
        }
    }

    // -------------------------------------------------------------------------
    // Order Operations
    // -------------------------------------------------------------------------

    /// Create an empty order.
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub fn create_order(&mut self, input: CreateOrder) -> Order {
        let order = Order {
            order_id: Uuid::new_v4(),
            name: input.name,
            lines: Vec::new(),
            created_utc: Utc::now(),
        };

        info!(order_id = %order.order_id, name = %order.name, "Order created");
        self.orders.insert(order.order_id, order.clone());
        order
    }

    pub fn get_order(&self, order_id: Uuid) -> Result<&Order, AppError> {
        self.orders
            .get(&order_id)
            .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Order {} not found", order_id)))
    }

    /// Add a line to an order.
    #[instrument(skip(self, input), fields(order_id = %order_id))]
    pub fn add_order_line(
        &mut self,
        order_id: Uuid,
        input: CreateOrderLine,
    ) -> Result<OrderLine, AppError> {
        let order = self
            .orders
            .get_mut(&order_id)
            .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Order {} not found", order_id)))?;

        let line = OrderLine {
            line_id: Uuid::new_v4(),
            order_id,
            product_id: input.product_id,
            quantity: input.quantity,
            price_unit: input.price_unit,
            price_subtotal: input.price_subtotal,
            landed_cost: input.landed_cost,
            sort_order: input.sort_order,
            created_utc: Utc::now(),
        };

        info!(line_id = %line.line_id, "Order line added");
        order.lines.push(line.clone());
        Ok(line)
    }

    /// Update fields on an order line.
    #[instrument(skip(self, input), fields(order_id = %order_id, line_id = %line_id))]
    pub fn update_order_line(
        &mut self,
        order_id: Uuid,
        line_id: Uuid,
        input: UpdateOrderLine,
    ) -> Result<OrderLine, AppError> {
        let order = self
            .orders
            .get_mut(&order_id)
            .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Order {} not found", order_id)))?;

        let line = order
            .lines
            .iter_mut()
            .find(|l| l.line_id == line_id)
            .ok_or_else(|| {
                AppError::NotFound(anyhow::anyhow!("Order line {} not found", line_id))
            })?;

        if let Some(product_id) = input.product_id {
            line.product_id = product_id;
        }
        if let Some(quantity) = input.quantity {
            line.quantity = quantity;
        }
        if let Some(price_unit) = input.price_unit {
            line.price_unit = price_unit;
        }
        if let Some(price_subtotal) = input.price_subtotal {
            line.price_subtotal = price_subtotal;
        }
        if let Some(landed_cost) = input.landed_cost {
            line.landed_cost = landed_cost;
        }
        if let Some(sort_order) = input.sort_order {
            line.sort_order = sort_order;
        }

        let updated = line.clone();
        info!("Order line updated");
        Ok(updated)
    }

    /// Remove a line from an order.
    #[instrument(skip(self), fields(order_id = %order_id, line_id = %line_id))]
    pub fn remove_order_line(&mut self, order_id: Uuid, line_id: Uuid) -> Result<(), AppError> {
        let order = self
            .orders
            .get_mut(&order_id)
            .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Order {} not found", order_id)))?;

        let before = order.lines.len();
        order.lines.retain(|l| l.line_id != line_id);
        if order.lines.len() == before {
            return Err(AppError::NotFound(anyhow::anyhow!(
                "Order line {} not found",
                line_id
            )));
        }

        info!("Order line removed");
        Ok(())
    }
}
