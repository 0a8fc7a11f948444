//! Serialization of the parsed [`Document`] as an OpenAPI 3.0 document.

use crate::model::{Document, PathItem};
use anyhow::{Context, Result};
use log::debug;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// OpenAPI version written to the envelope.
pub const OPENAPI_VERSION: &str = "3.0.0";

/// OpenAPI Info object
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Info {
    pub title: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Default for Info {
    fn default() -> Self {
        Self {
            title: "Generated API".to_string(),
            version: "1.0.0".to_string(),
            description: None,
        }
    }
}

/// Top-level OpenAPI document borrowing the parsed paths.
#[derive(Debug, Serialize)]
pub struct OpenApiDocument<'a> {
    pub openapi: &'static str,
    pub info: &'a Info,
    pub paths: &'a BTreeMap<String, PathItem>,
}

impl<'a> OpenApiDocument<'a> {
    pub fn new(info: &'a Info, document: &'a Document) -> Self {
        Self {
            openapi: OPENAPI_VERSION,
            info,
            paths: &document.paths,
        }
    }
}

pub fn serialize_yaml(doc: &OpenApiDocument<'_>) -> Result<String> {
    debug!("Serializing OpenAPI document to YAML");
    serde_yaml::to_string(doc).context("Failed to serialize OpenAPI document to YAML")
}

/// Pretty-printed JSON.
pub fn serialize_json(doc: &OpenApiDocument<'_>) -> Result<String> {
    debug!("Serializing OpenAPI document to JSON");
    serde_json::to_string_pretty(doc).context("Failed to serialize OpenAPI document to JSON")
}

/// Writes `content` to `path`, creating parent directories as needed.
pub fn write_to_file(content: &str, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    fs::write(path, content)
        .with_context(|| format!("Failed to write to file: {}", path.display()))?;

    debug!("Wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}
