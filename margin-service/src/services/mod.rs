//! Services module for margin-service.

pub mod margin;
pub mod settings;
pub mod store;

pub use margin::MarginEngine;
pub use settings::Settings;
pub use store::Store;
