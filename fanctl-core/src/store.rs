//! Configuration store
//!
//! Owns the configuration document on disk and in memory. All reads of
//! strategies and all edits go through here.
//!
//! # Invariants
//!
//! - The in-memory document always satisfies the schema, including after a
//!   rejected edit.
//! - `defaultStrategy` names an existing strategy, and so does
//!   `strategyOnDischarging` unless it is empty.
//! - Every accepted edit is flushed to disk before the call returns. An edit
//!   that cannot be written is undone in memory as well.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::constants::keys;
use crate::data::{read_document, seed_from_template, write_document, Strategy};
use crate::error::{FanctlError, Result};
use crate::resources::Resources;
use crate::schema::SchemaRegistry;

/// Which strategy to resolve
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StrategySelector {
    /// Whatever `defaultStrategy` names
    Default,
    /// Whatever `strategyOnDischarging` names, or the default when empty
    OnDischarging,
    /// A literal strategy name
    Named(String),
}

impl From<&str> for StrategySelector {
    fn from(s: &str) -> Self {
        match s {
            keys::DEFAULT_STRATEGY => StrategySelector::Default,
            keys::STRATEGY_ON_DISCHARGING => StrategySelector::OnDischarging,
            name => StrategySelector::Named(name.to_string()),
        }
    }
}

impl FromStr for StrategySelector {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl fmt::Display for StrategySelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategySelector::Default => f.write_str(keys::DEFAULT_STRATEGY),
            StrategySelector::OnDischarging => f.write_str(keys::STRATEGY_ON_DISCHARGING),
            StrategySelector::Named(name) => f.write_str(name),
        }
    }
}

/// Persisted, schema-checked configuration
#[derive(Debug)]
pub struct ConfigurationStore {
    path: PathBuf,
    resources: Resources,
    data: Value,
}

impl ConfigurationStore {
    /// Load the configuration at `path`, seeding it from the template first
    /// when no file exists
    pub fn load(path: impl Into<PathBuf>, resources: Resources) -> Result<Self> {
        let path = path.into();
        let data = load_document(&path, &resources)?;
        Ok(Self {
            path,
            resources,
            data,
        })
    }

    /// Re-read the file, keeping the current document if the new one is invalid
    pub fn reload(&mut self) -> Result<()> {
        self.data = load_document(&self.path, &self.resources)?;
        Ok(())
    }

    /// Write the in-memory document to disk
    pub fn save(&self) -> Result<()> {
        write_document(&self.path, &self.data)?;
        info!("Saved configuration to {:?}", self.path);
        Ok(())
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The in-memory document
    pub fn document(&self) -> &Value {
        &self.data
    }

    /// The schema governing the document
    pub fn schema(&self) -> &SchemaRegistry {
        self.resources.schema()
    }

    /// Strategy names in document order
    pub fn list_strategy_names(&self) -> Vec<&str> {
        self.strategies()
            .map(|strategies| strategies.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Raw value of `defaultStrategy`
    pub fn default_strategy_name(&self) -> Option<&str> {
        self.data.get(keys::DEFAULT_STRATEGY).and_then(Value::as_str)
    }

    /// Raw value of `strategyOnDischarging` (may be empty)
    pub fn discharging_strategy_name(&self) -> Option<&str> {
        self.data.get(keys::STRATEGY_ON_DISCHARGING).and_then(Value::as_str)
    }

    /// Resolve a selector to a strategy
    pub fn resolve_strategy(&self, selector: &StrategySelector) -> Result<Strategy> {
        let name = match selector {
            StrategySelector::Named(name) => Some(name.as_str()),
            StrategySelector::Default => self.default_strategy_name(),
            StrategySelector::OnDischarging => match self.discharging_strategy_name() {
                Some("") | Some(keys::DEFAULT_STRATEGY) => {
                    return self.resolve_strategy(&StrategySelector::Default)
                }
                other => other,
            },
        };

        let name = name.ok_or(FanctlError::InvalidStrategy { name: None })?;
        let parameters = self
            .strategy_parameters(name)
            .ok_or_else(|| FanctlError::invalid_strategy(name))?;

        debug!("Resolved {} to strategy '{}'", selector, name);
        Strategy::new(name, parameters)
    }

    /// Strategy by literal name or sentinel string
    pub fn get_strategy(&self, name: &str) -> Result<Strategy> {
        self.resolve_strategy(&StrategySelector::from(name))
    }

    /// Strategy named by `defaultStrategy`
    pub fn get_default_strategy(&self) -> Result<Strategy> {
        self.resolve_strategy(&StrategySelector::Default)
    }

    /// Strategy to use on battery power
    pub fn get_discharging_strategy(&self) -> Result<Strategy> {
        self.resolve_strategy(&StrategySelector::OnDischarging)
    }

    /// Strategy the fan loop should run for the given power state
    pub fn active_strategy(&self, on_battery: bool) -> Result<Strategy> {
        if on_battery {
            self.get_discharging_strategy()
        } else {
            self.get_default_strategy()
        }
    }

    /// Edit one scalar parameter of one strategy and persist the result
    ///
    /// `raw` is coerced to the type the schema declares for `param`. The edit
    /// is undone if the resulting document fails schema validation. Returns
    /// the value that was stored.
    pub fn update_strategy_param(
        &mut self,
        strategy_name: &str,
        param: &str,
        raw: impl Into<Value>,
    ) -> Result<Value> {
        let raw = raw.into();

        if self.strategy_parameters(strategy_name).is_none() {
            return Err(FanctlError::invalid_strategy(strategy_name));
        }

        let rule = self.schema().parameter_rule(param).ok_or_else(|| {
            FanctlError::config_parsing(format!(
                "Unknown parameter '{}' for strategy '{}'",
                param, strategy_name
            ))
        })?;

        let coerced = rule.param_type.coerce(param, &raw).map_err(|e| {
            warn!("Rejected edit of {}.{}: {}", strategy_name, param, e);
            e
        })?;

        let previous = self.set_param(strategy_name, param, Some(coerced.clone()))?;

        if let Err(violation) = self.resources.schema().validate(&self.data) {
            self.set_param(strategy_name, param, previous)?;
            warn!(
                "Reverted {}.{} after schema violation: {}",
                strategy_name, param, violation
            );
            return Err(into_parsing_error(violation));
        }

        if let Err(e) = self.save() {
            self.set_param(strategy_name, param, previous)?;
            warn!("Reverted {}.{} after failed save: {}", strategy_name, param, e);
            return Err(e);
        }

        info!("Set {}.{} = {}", strategy_name, param, coerced);
        Ok(coerced)
    }

    fn strategies(&self) -> Option<&Map<String, Value>> {
        self.data.get(keys::STRATEGIES).and_then(Value::as_object)
    }

    fn strategy_parameters(&self, name: &str) -> Option<&Map<String, Value>> {
        self.strategies()?.get(name)?.as_object()
    }

    /// Set or remove a parameter, returning what was there before
    fn set_param(&mut self, strategy_name: &str, param: &str, value: Option<Value>) -> Result<Option<Value>> {
        let parameters = self
            .data
            .get_mut(keys::STRATEGIES)
            .and_then(|strategies| strategies.get_mut(strategy_name))
            .and_then(Value::as_object_mut)
            .ok_or_else(|| FanctlError::invalid_strategy(strategy_name))?;

        Ok(match value {
            Some(value) => parameters.insert(param.to_string(), value),
            // A key that was absent before the edit is the last one, so
            // removing it keeps the remaining order intact
            None => parameters.remove(param),
        })
    }
}

/// Seed, read, parse, heal, and validate the document at `path`
fn load_document(path: &Path, resources: &Resources) -> Result<Value> {
    seed_from_template(path, resources.template_text())?;
    let raw = read_document(path)?;
    parse_document(&raw, resources)
}

fn parse_document(raw: &str, resources: &Resources) -> Result<Value> {
    let mut data: Value = serde_json::from_str(raw).map_err(|e| {
        FanctlError::config_parsing(format!("Error parsing configuration file: {}", e))
    })?;

    if let Value::Object(map) = &mut data {
        if !map.contains_key(keys::SCHEMA) {
            warn!("Configuration has no $schema, restoring it from the template");
            map.insert(keys::SCHEMA.to_string(), resources.template_schema_uri().clone());
        }
    }

    resources.schema().validate(&data).map_err(into_parsing_error)?;

    check_references(&data)?;
    Ok(data)
}

fn into_parsing_error(error: FanctlError) -> FanctlError {
    match error {
        FanctlError::SchemaViolation(msg) => {
            FanctlError::config_parsing(format!("Schema violation: {}", msg))
        }
        other => other,
    }
}

/// Both strategy references must name existing strategies
fn check_references(data: &Value) -> Result<()> {
    let strategies = data.get(keys::STRATEGIES).and_then(Value::as_object);
    let exists = |name: &str| strategies.map_or(false, |s| s.contains_key(name));

    let default = data.get(keys::DEFAULT_STRATEGY).and_then(Value::as_str).unwrap_or_default();
    if !exists(default) {
        return Err(FanctlError::config_parsing(format!(
            "Default strategy '{}' is not a valid strategy.",
            default
        )));
    }

    let discharging = data
        .get(keys::STRATEGY_ON_DISCHARGING)
        .and_then(Value::as_str)
        .unwrap_or_default();
    if !discharging.is_empty() && !exists(discharging) {
        return Err(FanctlError::config_parsing(format!(
            "Discharging strategy '{}' is not a valid strategy.",
            discharging
        )));
    }

    Ok(())
}
