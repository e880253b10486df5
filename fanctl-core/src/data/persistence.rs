//! JSON persistence for the configuration document
//!
//! Seeds missing files from the template and writes atomically.

use std::fs;
use std::io::Write;
use std::path::Path;

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::constants::paths;
use crate::error::{FanctlError, Result};

/// Write `template` to `path` unless a file already exists there
///
/// Returns true when the file was created.
pub fn seed_from_template(path: &Path, template: &str) -> Result<bool> {
    if path.is_file() {
        return Ok(false);
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    write_atomic(path, template.as_bytes())?;
    info!("Seeded configuration at {:?} from template", path);
    Ok(true)
}

/// Read the raw document text
pub fn read_document(path: &Path) -> Result<String> {
    let contents = fs::read_to_string(path).map_err(|e| FanctlError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    debug!("Read {} bytes from {:?}", contents.len(), path);
    Ok(contents)
}

/// Serialize a document with four-space indentation
pub fn to_pretty_json(document: &Value) -> Result<String> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(paths::JSON_INDENT);
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    document.serialize(&mut serializer)?;
    String::from_utf8(buf).map_err(|e| FanctlError::generic(format!("non UTF-8 JSON output: {}", e)))
}

/// Serialize and write the document to `path`
pub fn write_document(path: &Path, document: &Value) -> Result<()> {
    let json = to_pretty_json(document)?;
    write_atomic(path, json.as_bytes())?;
    debug!("Saved configuration to {:?}", path);
    Ok(())
}

/// Write to a temp file then rename over the target
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let temp_path = path.with_extension(paths::TEMP_EXTENSION);

    let mut file = fs::File::create(&temp_path).map_err(|e| FanctlError::FileWrite {
        path: temp_path.clone(),
        source: e,
    })?;

    let written = file
        .write_all(bytes)
        .and_then(|_| file.sync_all())
        .map_err(|e| FanctlError::FileWrite {
            path: temp_path.clone(),
            source: e,
        });
    drop(file);

    let result = written.and_then(|_| {
        fs::rename(&temp_path, path).map_err(|e| FanctlError::FileWrite {
            path: path.to_path_buf(),
            source: e,
        })
    });

    if result.is_err() {
        if let Err(e) = fs::remove_file(&temp_path) {
            warn!("Failed to remove temporary file {:?}: {}", temp_path, e);
        }
    }

    result
}
