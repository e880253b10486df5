//! Bundled schema and template
//!
//! The schema and the template configuration ship inside the crate. A
//! resource directory can replace them, e.g. for distribution packaging.

use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::constants::{keys, paths};
use crate::data::read_document;
use crate::error::{FanctlError, Result};
use crate::schema::SchemaRegistry;

const BUNDLED_SCHEMA: &str = include_str!("../resources/config.schema.json");
const BUNDLED_TEMPLATE: &str = include_str!("../resources/config.json");

/// Schema registry plus the template used to seed new configurations
#[derive(Debug)]
pub struct Resources {
    schema: SchemaRegistry,
    template_text: String,
    schema_uri: Value,
}

impl Resources {
    /// Resources compiled into the crate
    pub fn bundled() -> Result<Self> {
        Self::from_parts(BUNDLED_SCHEMA, BUNDLED_TEMPLATE.to_string())
    }

    /// Read `config.schema.json` and `config.json` from a directory
    pub fn from_dir(dir: &Path) -> Result<Self> {
        let schema_text = read_document(&dir.join(paths::SCHEMA_FILE))?;
        let template_text = read_document(&dir.join(paths::TEMPLATE_FILE))?;
        debug!("Loaded resources from {:?}", dir);
        Self::from_parts(&schema_text, template_text)
    }

    fn from_parts(schema_text: &str, template_text: String) -> Result<Self> {
        let schema = SchemaRegistry::from_json(schema_text)?;

        let template: Value = serde_json::from_str(&template_text)
            .map_err(|e| FanctlError::schema(format!("template is not valid JSON: {}", e)))?;

        schema
            .validate(&template)
            .map_err(|e| FanctlError::schema(format!("template does not match schema: {}", e)))?;

        let schema_uri = match template.get(keys::SCHEMA) {
            Some(uri @ Value::String(_)) => uri.clone(),
            _ => return Err(FanctlError::schema("template has no $schema string")),
        };

        Ok(Self {
            schema,
            template_text,
            schema_uri,
        })
    }

    /// The schema registry
    pub fn schema(&self) -> &SchemaRegistry {
        &self.schema
    }

    /// Template text, written verbatim when seeding a configuration
    pub fn template_text(&self) -> &str {
        &self.template_text
    }

    /// `$schema` value injected into documents that lack one
    pub fn template_schema_uri(&self) -> &Value {
        &self.schema_uri
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_bundled_resources_are_consistent() {
        let resources = Resources::bundled().unwrap();
        assert_eq!(resources.template_schema_uri(), "./config.schema.json");
        assert!(resources.schema().parameter_rule("speedCurve").is_some());
        assert!(resources.template_text().contains("\"defaultStrategy\": \"lazy\""));
    }

    #[test]
    fn test_from_dir_reads_both_files() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("config.schema.json"), BUNDLED_SCHEMA).unwrap();
        fs::write(temp_dir.path().join("config.json"), BUNDLED_TEMPLATE).unwrap();

        let resources = Resources::from_dir(temp_dir.path()).unwrap();
        assert_eq!(resources.template_text(), BUNDLED_TEMPLATE);
    }

    #[test]
    fn test_from_dir_missing_schema_fails() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("config.json"), BUNDLED_TEMPLATE).unwrap();
        assert!(matches!(
            Resources::from_dir(temp_dir.path()),
            Err(FanctlError::FileRead { .. })
        ));
    }

    #[test]
    fn test_template_without_schema_key_fails() {
        let mut template: Value = serde_json::from_str(BUNDLED_TEMPLATE).unwrap();
        template.as_object_mut().unwrap().remove("$schema");
        let err = Resources::from_parts(BUNDLED_SCHEMA, template.to_string()).unwrap_err();
        assert!(err.to_string().contains("no $schema"));
    }

    #[test]
    fn test_malformed_schema_fails() {
        let err = Resources::from_parts("{ not json", BUNDLED_TEMPLATE.to_string()).unwrap_err();
        assert!(matches!(err, FanctlError::Schema(_)));
    }
}
