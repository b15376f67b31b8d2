//! Loading the nested configuration document.
//!
//! YAML and JSON sources both become a `serde_json::Value` whose maps keep
//! document order. YAML scalar keys (years are usually bare integers) are
//! turned into strings.

use crate::config::DocumentFormat;
use crate::error::{LeadsError, Result};
use serde_json::{Map, Number, Value};
use std::path::Path;

/// Read and parse a document, guessing the syntax from the extension
/// unless `format` is given.
pub fn load_document(path: &Path, format: Option<DocumentFormat>) -> Result<Value> {
    let format = format.unwrap_or_else(|| guess_format(path));
    let content = std::fs::read(path)?;
    match format {
        DocumentFormat::Yaml => {
            let text = String::from_utf8(content)
                .map_err(|e| LeadsError::Document(format!("{}: {e}", path.display())))?;
            parse_yaml(&text)
        }
        DocumentFormat::Json => parse_json(content),
    }
}

fn guess_format(path: &Path) -> DocumentFormat {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => DocumentFormat::Json,
        _ => DocumentFormat::Yaml,
    }
}

pub fn parse_yaml(text: &str) -> Result<Value> {
    let yaml: serde_yaml::Value =
        serde_yaml::from_str(text).map_err(|e| LeadsError::Document(e.to_string()))?;
    yaml_to_json(yaml)
}

/// Parse JSON with simd-json.
pub fn parse_json(mut content: Vec<u8>) -> Result<Value> {
    simd_json::serde::from_slice(&mut content).map_err(|e| LeadsError::Document(e.to_string()))
}

fn yaml_to_json(value: serde_yaml::Value) -> Result<Value> {
    Ok(match value {
        serde_yaml::Value::Null => Value::Null,
        serde_yaml::Value::Bool(b) => Value::Bool(b),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Number(i.into())
            } else if let Some(u) = n.as_u64() {
                Value::Number(u.into())
            } else {
                n.as_f64()
                    .and_then(Number::from_f64)
                    .map(Value::Number)
                    .ok_or_else(|| LeadsError::Document(format!("unrepresentable number {n}")))?
            }
        }
        serde_yaml::Value::String(s) => Value::String(s),
        serde_yaml::Value::Sequence(items) => Value::Array(
            items
                .into_iter()
                .map(yaml_to_json)
                .collect::<Result<Vec<_>>>()?,
        ),
        serde_yaml::Value::Mapping(mapping) => {
            let mut map = Map::with_capacity(mapping.len());
            for (key, value) in mapping {
                map.insert(yaml_key(key)?, yaml_to_json(value)?);
            }
            Value::Object(map)
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_json(tagged.value)?,
    })
}

fn yaml_key(key: serde_yaml::Value) -> Result<String> {
    match key {
        serde_yaml::Value::String(s) => Ok(s),
        serde_yaml::Value::Number(n) => Ok(n.to_string()),
        serde_yaml::Value::Bool(b) => Ok(b.to_string()),
        other => Err(LeadsError::Document(format!(
            "unsupported mapping key {other:?}"
        ))),
    }
}
