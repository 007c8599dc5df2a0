use std::{fs, path::Path};

use log::debug;
use serde_json::{Map, Value};

use crate::error::{Error, Result};

fn load(manifest_path: &Path) -> Result<Map<String, Value>> {
    let raw = fs::read(manifest_path).map_err(|source| Error::ManifestRead {
        path: manifest_path.to_path_buf(),
        source,
    })?;

    let value: Value = serde_json::from_slice(&raw).map_err(|source| Error::ManifestParse {
        path: manifest_path.to_path_buf(),
        source,
    })?;

    match value {
        Value::Object(map) => Ok(map),
        _ => Err(Error::ManifestShape {
            path: manifest_path.to_path_buf(),
        }),
    }
}

/// Rewrite the `name` field of the JSON manifest, creating it when absent.
///
/// Every other field keeps its value and position.
pub fn set_name(manifest_path: &Path, new_name: &str) -> Result<()> {
    let mut manifest = load(manifest_path)?;
    manifest.insert("name".to_string(), Value::String(new_name.to_string()));

    let serialized = serde_json::to_string(&Value::Object(manifest)).map_err(|source| {
        Error::ManifestParse {
            path: manifest_path.to_path_buf(),
            source,
        }
    })?;

    fs::write(manifest_path, serialized).map_err(|source| Error::ManifestWrite {
        path: manifest_path.to_path_buf(),
        source,
    })?;

    debug!("Set name of {} to {}", manifest_path.display(), new_name);
    Ok(())
}

pub fn read_name(manifest_path: &Path) -> Result<Option<String>> {
    let manifest = load(manifest_path)?;
    Ok(manifest
        .get("name")
        .and_then(Value::as_str)
        .map(str::to_string))
}
