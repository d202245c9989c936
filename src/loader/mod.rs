//! API document loading.
//!
//! Reads an OpenAPI 3 document from JSON or YAML into the [`Document`]
//! model, computes its content hash and records where each operation sits
//! in the source text.
//!
//! ## Usage
//!
//! ```no_run
//! use api_diff::loader::parse_document;
//! use std::path::Path;
//!
//! let loaded = parse_document(Path::new("openapi.yaml")).unwrap();
//! println!("{} operations", loaded.document.operation_count());
//! ```

mod detection;
mod locations;

pub use detection::{detect_format, DocumentFormat};
pub use locations::locate_operations;

use crate::error::{ApiDiffError, ErrorContext, LoadErrorKind, Result};
use crate::model::{Document, LocationMap};
use serde_json::Value;
use std::path::Path;
use tracing::debug;
use xxhash_rust::xxh3::xxh3_64;

/// Maximum document size (64 MB).
const MAX_DOCUMENT_SIZE: u64 = 64 * 1024 * 1024;

/// A parsed document together with its operation positions.
#[derive(Debug, Clone, Default)]
pub struct LoadedDocument {
    pub document: Document,
    pub locations: LocationMap,
    pub format: Option<DocumentFormat>,
}

/// Read and parse a document from disk.
pub fn parse_document(path: &Path) -> Result<LoadedDocument> {
    let metadata = std::fs::metadata(path).map_err(|e| ApiDiffError::io(path, e))?;
    if metadata.len() > MAX_DOCUMENT_SIZE {
        return Err(ApiDiffError::validation(format!(
            "{} is {} MB, exceeding the {} MB limit",
            path.display(),
            metadata.len() / (1024 * 1024),
            MAX_DOCUMENT_SIZE / (1024 * 1024),
        )));
    }
    let content = std::fs::read_to_string(path).map_err(|e| ApiDiffError::io(path, e))?;
    parse_document_str(&content, Some(path))
        .with_context(|| format!("parsing {}", path.display()))
}

/// Parse a document from text. `origin` drives format detection by
/// extension and names the file in source locations.
pub fn parse_document_str(content: &str, origin: Option<&Path>) -> Result<LoadedDocument> {
    let origin_name = origin.map_or_else(|| "<input>".to_string(), |p| p.display().to_string());
    let format = detect_format(content, origin)
        .ok_or_else(|| ApiDiffError::unknown_format(origin_name.clone()))?;

    let value: Value = match format {
        DocumentFormat::Json => serde_json::from_str(content)?,
        DocumentFormat::Yaml => serde_yaml::from_str(content)?,
    };
    let openapi = value.get("openapi").and_then(Value::as_str).unwrap_or_default();
    if !openapi.starts_with('3') {
        return Err(ApiDiffError::load(
            format!("at {origin_name}"),
            LoadErrorKind::NotOpenApi(if openapi.is_empty() {
                "missing 'openapi' version field".to_string()
            } else {
                format!("unsupported version '{openapi}'")
            }),
        ));
    }

    // serde_json maps are ordered by key, so this serialization is canonical.
    let content_hash = xxh3_64(&serde_json::to_vec(&value)?);
    // The model itself is read from the text so its maps keep document order.
    let mut document: Document = match format {
        DocumentFormat::Json => serde_json::from_str(content)?,
        DocumentFormat::Yaml => serde_yaml::from_str(content)?,
    };
    document.content_hash = content_hash;

    let locations = locate_operations(content, &origin_name, &document);
    debug!(
        origin = %origin_name,
        format = %format,
        paths = document.paths.len(),
        operations = document.operation_count(),
        "loaded API document"
    );

    Ok(LoadedDocument {
        document,
        locations,
        format: Some(format),
    })
}
