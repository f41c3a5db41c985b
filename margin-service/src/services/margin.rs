//! Margin computation engine for margin-service.
//!
//! All derived values are pure functions of the current store contents and
//! settings. The engine keeps a per-line cache of derived margins and
//! invalidates it on every input mutation, so a read after any change always
//! reflects current inputs.

use crate::error::AppError;
use crate::models::{
    BreakdownLine, CostDetail, CostType, CreateOrder, CreateOrderLine, CreateOverheadRule,
    LineMargin, MarginBreakdown, Notification, Order, OrderLine, OrderMargins, OverheadRule,
    OverheadType, Product, RecomputeOutcome, UpdateOrderLine, UpdateOverheadRule,
};
use crate::services::settings::Settings;
use crate::services::store::Store;
use rust_decimal::Decimal;
use std::collections::HashMap;
use tracing::{info, instrument};
use uuid::Uuid;

/// Computes per-line and per-order margins over a [`Store`].
///
/// Mutations go through the engine rather than the store directly so the
/// derived-value cache stays consistent with the inputs.
#[derive(Debug)]
pub struct MarginEngine {
    store: Store,
    default_overhead_percent: Decimal,
    cache: HashMap<Uuid, LineMargin>,
}

impl MarginEngine {
    pub fn new(settings: &Settings) -> Self {
        Self {
            store: Store::new(),
            default_overhead_percent: settings.overhead_percent,
            cache: HashMap::new(),
        }
    }

    /// Read access to the underlying store.
    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn default_overhead_percent(&self) -> Decimal {
        self.default_overhead_percent
    }

    /// Change the global fallback percent. Drops all cached margins.
    pub fn set_default_overhead_percent(&mut self, percent: Decimal) {
        self.default_overhead_percent = percent;
        self.cache.clear();
    }

    // -------------------------------------------------------------------------
    // Input Mutations
    // -------------------------------------------------------------------------

    /// Insert or replace a product, dropping cached margins of lines that
    /// reference it.
    pub fn upsert_product(&mut self, product: Product) -> Product {
        let product = self.store.upsert_product(product);
        for line_id in self.store.lines_for_product(product.product_id) {
            self.cache.remove(&line_id);
        }
        product
    }

    /// Rule changes can affect any line in the rule's category, so all three
    /// rule mutations drop the whole cache.
    pub fn create_overhead_rule(&mut self, input: CreateOverheadRule) -> OverheadRule {
        let rule = self.store.create_overhead_rule(input);
        self.cache.clear();
        rule
    }

    pub fn update_overhead_rule(
        &mut self,
        rule_id: Uuid,
        input: UpdateOverheadRule,
    ) -> Result<OverheadRule, AppError> {
        let rule = self.store.update_overhead_rule(rule_id, input)?;
        self.cache.clear();
        Ok(rule)
    }

    pub fn deactivate_overhead_rule(&mut self, rule_id: Uuid) -> Result<OverheadRule, AppError> {
        let rule = self.store.deactivate_overhead_rule(rule_id)?;
        self.cache.clear();
        Ok(rule)
    }

    pub fn create_order(&mut self, input: CreateOrder) -> Order {
        self.store.create_order(input)
    }

    pub fn add_order_line(
        &mut self,
        order_id: Uuid,
        input: CreateOrderLine,
    ) -> Result<OrderLine, AppError> {
        self.store.add_order_line(order_id, input)
    }

    pub fn update_order_line(
        &mut self,
        order_id: Uuid,
        line_id: Uuid,
        input: UpdateOrderLine,
    ) -> Result<OrderLine, AppError> {
        let line = self.store.update_order_line(order_id, line_id, input)?;
        self.cache.remove(&line_id);
        Ok(line)
    }

    pub fn remove_order_line(&mut self, order_id: Uuid, line_id: Uuid) -> Result<(), AppError> {
        self.store.remove_order_line(order_id, line_id)?;
        self.cache.remove(&line_id);
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Margin Computation
    // -------------------------------------------------------------------------

    /// Overhead amount for one unit with the given base cost.
    ///
    /// A fixed rule ignores the base cost entirely; a percentage rule applies
    /// its own percent; without a rule the global default percent applies.
    pub fn overhead_unit_cost(&self, base_cost: Decimal, rule: Option<&OverheadRule>) -> Decimal {
        match rule {
            Some(rule) if rule.overhead_type == OverheadType::Fixed => rule.fixed_amount,
            Some(rule) => base_cost * rule.percent / Decimal::ONE_HUNDRED,
            None => base_cost * self.default_overhead_percent / Decimal::ONE_HUNDRED,
        }
    }

    /// Derive the margin values for a single line. Pure with respect to the
    /// current store and settings; a line without a product (or with a
    /// product the catalog no longer knows) yields all zeros.
    pub fn compute_line(&self, line: &OrderLine) -> LineMargin {
        let product = line.product_id.and_then(|id| self.store.get_product(id));
        let Some(product) = product else {
            return LineMargin::ZERO;
        };

        let cogs_unit = product.standard_price;
        let rule = self.store.lookup_rule(product.category_id);
        let overhead_unit = self.overhead_unit_cost(cogs_unit, rule);

        let total_unit_cost = cogs_unit + line.landed_cost + overhead_unit;
        let margin_value = line.price_subtotal - total_unit_cost * line.quantity;

        LineMargin {
            cogs_unit,
            overhead_unit,
            margin_value,
        }
    }

    /// Margin values for one line, computed or served from cache.
    pub fn line_margin(&mut self, order_id: Uuid, line_id: Uuid) -> Result<LineMargin, AppError> {
        let line = self
            .store
            .get_order(order_id)?
            .lines
            .iter()
            .find(|l| l.line_id == line_id)
            .cloned()
            .ok_or_else(|| {
                AppError::NotFound(anyhow::anyhow!("Order line {} not found", line_id))
            })?;

        Ok(self.cached_line_margin(&line))
    }

    /// Order-level totals summed over all lines.
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub fn compute_order(&mut self, order_id: Uuid) -> Result<OrderMargins, AppError> {
        let lines = self.store.get_order(order_id)?.lines.clone();

        let mut total_cogs = Decimal::ZERO;
        let mut total_overhead = Decimal::ZERO;
        let mut net_margin = Decimal::ZERO;

        for line in &lines {
            let margin = self.cached_line_margin(line);
            total_cogs += margin.cogs_unit * line.quantity;
            total_overhead += margin.overhead_unit * line.quantity;
            net_margin += margin.margin_value;
        }

        Ok(OrderMargins {
            total_cogs,
            total_overhead,
            net_margin,
        })
    }

    // -------------------------------------------------------------------------
    // Actions
    // -------------------------------------------------------------------------

    /// Manual "recompute margins" action: discard every cached value for the
    /// order's lines, rerun the computation and report fresh totals.
    /// Idempotent for unchanged inputs.
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub fn recompute_margins(&mut self, order_id: Uuid) -> Result<RecomputeOutcome, AppError> {
        let line_ids: Vec<Uuid> = self
            .store
            .get_order(order_id)?
            .lines
            .iter()
            .map(|l| l.line_id)
            .collect();

        for line_id in &line_ids {
            self.cache.remove(line_id);
        }

        let totals = self.compute_order(order_id)?;
        info!(
            lines = line_ids.len(),
            net_margin = %totals.net_margin,
            "Margins recomputed"
        );

        Ok(RecomputeOutcome {
            totals,
            notification: Notification {
                title: "Margins Recomputed".to_string(),
                message: "All margin values have been recalculated based on current product costs."
                    .to_string(),
            },
        })
    }

    /// Build the read-only margin breakdown snapshot for an order.
    ///
    /// Per line, one named detail entry per nonzero cost component; the
    /// snapshot is not kept in sync with later input changes.
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub fn margin_breakdown(&mut self, order_id: Uuid) -> Result<MarginBreakdown, AppError> {
        let order = self.store.get_order(order_id)?;
        let order_name = order.name.clone();
        let lines = order.lines.clone();

        let mut breakdown_lines = Vec::with_capacity(lines.len());
        let mut total_quantity = Decimal::ZERO;
        let mut total_revenue = Decimal::ZERO;
        let mut total_cogs = Decimal::ZERO;
        let mut total_landed = Decimal::ZERO;
        let mut total_overhead = Decimal::ZERO;
        let mut total_margin = Decimal::ZERO;

        for line in &lines {
            let margin = self.cached_line_margin(line);
            let product_name = line
                .product_id
                .and_then(|id| self.store.get_product(id))
                .map(|p| p.name.clone());

            let mut details = Vec::new();
            if margin.cogs_unit != Decimal::ZERO {
                details.push(CostDetail {
                    name: "Base COGS".to_string(),
                    cost_type: CostType::Cogs,
                    amount: margin.cogs_unit * line.quantity,
                });
            }
            if line.landed_cost != Decimal::ZERO {
                details.push(CostDetail {
                    name: "Landed Cost (Freight, Customs, etc.)".to_string(),
                    cost_type: CostType::Landed,
                    amount: line.landed_cost * line.quantity,
                });
            }
            if margin.overhead_unit != Decimal::ZERO {
                details.push(CostDetail {
                    name: "Overhead (Allocated)".to_string(),
                    cost_type: CostType::Overhead,
                    amount: margin.overhead_unit * line.quantity,
                });
            }

            total_quantity += line.quantity;
            total_revenue += line.price_subtotal;
            total_cogs += margin.cogs_unit * line.quantity;
            total_landed += line.landed_cost * line.quantity;
            total_overhead += margin.overhead_unit * line.quantity;
            total_margin += margin.margin_value;

            breakdown_lines.push(BreakdownLine {
                product_id: line.product_id,
                product_name,
                quantity: line.quantity,
                price_unit: line.price_unit,
                price_subtotal: line.price_subtotal,
                cogs_unit: margin.cogs_unit,
                landed_cost: line.landed_cost,
                overhead_unit: margin.overhead_unit,
                margin_value: margin.margin_value,
                details,
            });
        }

        Ok(MarginBreakdown {
            order_id,
            order_name,
            lines: breakdown_lines,
            total_quantity,
            total_revenue,
            total_cogs,
            total_landed,
            total_overhead,
            total_margin,
        })
    }

    fn cached_line_margin(&mut self, line: &OrderLine) -> LineMargin {
        if let Some(margin) = self.cache.get(&line.line_id) {
            return *margin;
        }
        let margin = self.compute_line(line);
        self.cache.insert(line.line_id, margin);
        margin
    }
}
