//! fanctl Core Library
//!
//! Schema-checked configuration for a fan control daemon.
//!
//! # Features
//!
//! - **Schema Registry**: Draft 2020-12 validation and per-parameter type/bounds lookup
//! - **Strategies**: Named fan curves and polling parameters with defaulting rules
//! - **Configuration Store**: Seeding, validation, strategy resolution, and
//!   revert-on-failure single-parameter edits
//!
//! # Module Structure
//!
//! - `data/` - Strategy value object, coercion, persistence
//! - `schema` - Compiled schema and parameter rules
//! - `store` - The configuration store
//!
//! # Example
//!
//! ```no_run
//! use fanctl_core::{ConfigurationStore, Resources};
//!
//! let mut store = ConfigurationStore::load("/etc/fanctl/config.json", Resources::bundled()?)?;
//! let strategy = store.active_strategy(false)?;
//! println!("{} updates every {}s", strategy.name, strategy.fan_speed_update_frequency);
//!
//! store.update_strategy_param(&strategy.name, "movingAverageInterval", "25")?;
//! # Ok::<(), fanctl_core::FanctlError>(())
//! ```

// Grouped modules
pub mod data;

// Standalone modules
pub mod constants;
pub mod error;
pub mod resources;
pub mod schema;
pub mod store;

// Re-export primary types from data/
pub use data::{ParamType, SpeedCurvePoint, Strategy};

// Re-export persistence helpers from data/
pub use data::{read_document, seed_from_template, to_pretty_json, write_document};

// Re-export error types
pub use error::{FanctlError, Result};

pub use constants::paths::{default_config_path, user_config_dir};
pub use resources::Resources;
pub use schema::{ParamRule, SchemaRegistry};
pub use store::{ConfigurationStore, StrategySelector};
