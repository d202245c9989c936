//! Document loading stage.

use super::PipelineError;
use crate::loader::{parse_document, LoadedDocument};
use anyhow::Result;
use std::path::Path;

/// Load an API document with context for error messages.
pub fn parse_document_with_context(path: &Path, quiet: bool) -> Result<LoadedDocument> {
    if !quiet {
        tracing::info!("Loading API document: {}", path.display());
    }

    let loaded = parse_document(path).map_err(|e| PipelineError::ParseFailed {
        path: path.display().to_string(),
        source: e.into(),
    })?;

    if !quiet {
        tracing::info!(
            "Loaded {} operations across {} paths",
            loaded.document.operation_count(),
            loaded.document.paths.len()
        );
    }
    Ok(loaded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_with_context() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(
            file,
            "openapi: 3.0.3\ninfo: {{title: t, version: '1'}}\npaths:\n  /a:\n    get:\n      responses: {{}}"
        )
        .unwrap();
        let loaded = parse_document_with_context(file.path(), true).unwrap();
        assert_eq!(loaded.document.operation_count(), 1);
    }

    #[test]
    fn test_missing_file_names_path() {
        let err = parse_document_with_context(Path::new("/nonexistent/api.yaml"), true)
            .unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/api.yaml"));
    }
}
