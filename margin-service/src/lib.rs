//! Margin Service - per-line and per-order profit margins for sales orders.

pub mod error;
pub mod models;
pub mod observability;
pub mod services;
