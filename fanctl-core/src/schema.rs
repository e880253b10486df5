//! Schema registry
//!
//! Wraps the JSON-Schema (Draft 2020-12) document that governs the
//! configuration file. The registry is built once and never mutated.
//!
//! Besides whole-document validation it exposes the declared type and bounds
//! of every strategy parameter, which drive coercion of edited values.

use std::fmt;

use jsonschema::Validator;
use serde_json::Value;
use tracing::debug;

use crate::constants::keys;
use crate::data::ParamType;
use crate::error::{FanctlError, Result};

/// Type and bounds declared for one strategy parameter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamRule {
    pub param_type: ParamType,
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
}

impl ParamRule {
    fn from_definition(name: &str, definition: &Value) -> Result<Self> {
        let param_type = match definition.get("type") {
            None => ParamType::String,
            Some(Value::String(tag)) => tag.parse().map_err(|_| {
                FanctlError::schema(format!(
                    "parameter '{}' declares unsupported type '{}'",
                    name, tag
                ))
            })?,
            Some(other) => {
                return Err(FanctlError::schema(format!(
                    "parameter '{}' has a non-string type declaration: {}",
                    name, other
                )));
            }
        };

        Ok(Self {
            param_type,
            minimum: definition.get("minimum").and_then(Value::as_f64),
            maximum: definition.get("maximum").and_then(Value::as_f64),
        })
    }
}

impl fmt::Display for ParamRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.param_type)?;
        match (self.minimum, self.maximum) {
            (Some(min), Some(max)) => write!(f, " [{}..={}]", min, max),
            (Some(min), None) => write!(f, " [>= {}]", min),
            (None, Some(max)) => write!(f, " [<= {}]", max),
            (None, None) => Ok(()),
        }
    }
}

/// Compiled configuration schema
pub struct SchemaRegistry {
    document: Value,
    validator: Validator,
    rules: Vec<(String, ParamRule)>,
}

impl SchemaRegistry {
    /// Compile a schema document
    pub fn new(document: Value) -> Result<Self> {
        let validator = jsonschema::draft202012::new(&document)
            .map_err(|e| FanctlError::schema(format!("schema does not compile: {}", e)))?;

        let properties = document
            .get(keys::SCHEMA_DEFS)
            .and_then(|defs| defs.get(keys::SCHEMA_STRATEGY_DEF))
            .and_then(|strategy| strategy.get(keys::SCHEMA_PROPERTIES))
            .and_then(Value::as_object)
            .ok_or_else(|| FanctlError::schema("missing $defs.strategy.properties"))?;

        let rules = properties
            .iter()
            .map(|(name, definition)| {
                ParamRule::from_definition(name, definition).map(|rule| (name.clone(), rule))
            })
            .collect::<Result<Vec<_>>>()?;

        debug!("Compiled schema with {} strategy parameters", rules.len());
        Ok(Self {
            document,
            validator,
            rules,
        })
    }

    /// Parse schema text and compile it
    pub fn from_json(text: &str) -> Result<Self> {
        let document: Value = serde_json::from_str(text)
            .map_err(|e| FanctlError::schema(format!("schema is not valid JSON: {}", e)))?;
        Self::new(document)
    }

    /// Validate a whole configuration document
    ///
    /// Reports the first violation found.
    pub fn validate(&self, document: &Value) -> Result<()> {
        match self.validator.iter_errors(document).next() {
            Some(error) => Err(FanctlError::SchemaViolation(error.to_string())),
            None => Ok(()),
        }
    }

    /// Declared rule for a strategy parameter
    pub fn parameter_rule(&self, name: &str) -> Option<ParamRule> {
        self.rules
            .iter()
            .find(|(param, _)| param == name)
            .map(|(_, rule)| *rule)
    }

    /// All strategy parameters in declaration order
    pub fn strategy_parameters(&self) -> impl Iterator<Item = (&str, &ParamRule)> {
        self.rules.iter().map(|(name, rule)| (name.as_str(), rule))
    }

    /// The raw schema document
    pub fn document(&self) -> &Value {
        &self.document
    }
}

impl fmt::Debug for SchemaRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaRegistry")
            .field("id", &self.document.get("$id"))
            .field("parameters", &self.rules.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn small_schema() -> Value {
        json!({
            "$schema": "https://json-schema.org/draft/2020-12/schema",
            "type": "object",
            "properties": {
                "strategies": {
                    "type": "object",
                    "additionalProperties": {"$ref": "#/$defs/strategy"}
                }
            },
            "required": ["strategies"],
            "$defs": {
                "strategy": {
                    "type": "object",
                    "properties": {
                        "level": {"type": "integer", "minimum": 1, "maximum": 5},
                        "ratio": {"type": "number"},
                        "enabled": {"type": "boolean"},
                        "label": {},
                        "points": {"type": "array"}
                    }
                }
            }
        })
    }

    #[test]
    fn test_parameter_rules() {
        let registry = SchemaRegistry::new(small_schema()).unwrap();

        let level = registry.parameter_rule("level").unwrap();
        assert_eq!(level.param_type, ParamType::Integer);
        assert_eq!(level.minimum, Some(1.0));
        assert_eq!(level.maximum, Some(5.0));

        assert_eq!(registry.parameter_rule("label").unwrap().param_type, ParamType::String);
        assert_eq!(registry.parameter_rule("points").unwrap().param_type, ParamType::Array);
        assert!(registry.parameter_rule("unknown").is_none());
    }

    #[test]
    fn test_parameters_keep_declaration_order() {
        let registry = SchemaRegistry::new(small_schema()).unwrap();
        let names: Vec<&str> = registry.strategy_parameters().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["level", "ratio", "enabled", "label", "points"]);
    }

    #[test]
    fn test_validate_enforces_bounds() {
        let registry = SchemaRegistry::new(small_schema()).unwrap();

        assert!(registry.validate(&json!({"strategies": {"a": {"level": 3}}})).is_ok());

        let err = registry
            .validate(&json!({"strategies": {"a": {"level": 9}}}))
            .unwrap_err();
        assert!(matches!(err, FanctlError::SchemaViolation(_)));

        assert!(registry.validate(&json!({})).is_err());
    }

    #[test]
    fn test_unknown_type_tag_is_rejected() {
        let mut schema = small_schema();
        schema["$defs"]["strategy"]["properties"]["level"]["type"] = json!("object");
        let err = SchemaRegistry::new(schema).unwrap_err();
        assert!(matches!(err, FanctlError::Schema(_)));
    }

    #[test]
    fn test_missing_strategy_definitions_is_rejected() {
        let err = SchemaRegistry::new(json!({"type": "object"})).unwrap_err();
        assert!(err.to_string().contains("$defs.strategy.properties"));
    }

    #[test]
    fn test_rule_display() {
        let rule = ParamRule {
            param_type: ParamType::Integer,
            minimum: Some(1.0),
            maximum: Some(10.0),
        };
        assert_eq!(rule.to_string(), "integer [1..=10]");
    }
}
