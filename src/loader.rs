//! Loading projects and adapter descriptors from disk.
//!
//! TOML and JSON files are both read into `serde_json::Value` so the engine
//! sees a single mapping type. The format is chosen by file extension
//! (`.json` is JSON, anything else TOML).

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use crate::adapter::{AdapterDescriptor, AdapterError};
use crate::project::Project;

/// Errors loading configuration inputs
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Invalid contents in {path}: {source}")]
    Shape {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error(transparent)]
    Adapter(#[from] AdapterError),
}

/// Load a project (`name`, optional `models` and `seeds` trees).
pub fn load_project(path: &Path) -> Result<Project, LoadError> {
    let project: Project = load_file(path)?;
    debug!(path = %path.display(), project = %project.name, "loaded project");
    Ok(project)
}

/// Resolve `--adapter`: a built-in name, or a path to a descriptor file.
pub fn load_adapter(name_or_path: &str) -> Result<AdapterDescriptor, LoadError> {
    if AdapterDescriptor::BUILTIN.contains(&name_or_path) {
        return Ok(AdapterDescriptor::builtin(name_or_path)?);
    }
    let path = Path::new(name_or_path);
    if path.exists() {
        return load_file(path);
    }
    Err(AdapterError(name_or_path.to_string()).into())
}

fn load_file<T: DeserializeOwned>(path: &Path) -> Result<T, LoadError> {
    let value = read_value(path)?;
    serde_json::from_value(value).map_err(|source| LoadError::Shape {
        path: path.to_path_buf(),
        source,
    })
}

/// Read a TOML or JSON file into a JSON value.
pub fn read_value(path: &Path) -> Result<Value, LoadError> {
    let contents = fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        serde_json::from_str(&contents).map_err(|e| LoadError::Parse {
            path: path.to_path_buf(),
            message: format!("JSON parse error: {}", e),
        })
    } else {
        let toml_value: toml::Value = toml::from_str(&contents).map_err(|e| LoadError::Parse {
            path: path.to_path_buf(),
            message: format!("TOML parse error: {}", e),
        })?;
        Ok(toml_to_json(toml_value))
    }
}

/// Convert TOML Value to JSON Value
pub fn toml_to_json(toml: toml::Value) -> Value {
    match toml {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::Number(i.into()),
        toml::Value::Float(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(arr) => Value::Array(arr.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Value::Object(
            table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect(),
        ),
    }
}
