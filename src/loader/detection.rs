//! Document format detection.

use std::fmt;
use std::path::Path;

/// Serialization format of an API document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    /// Get the human-readable name for this format.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Json => "JSON",
            Self::Yaml => "YAML",
        }
    }

    fn from_extension(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Detect the format from the file extension, then from the content.
///
/// Returns `None` for empty content with no recognizable extension.
#[must_use]
pub fn detect_format(content: &str, origin: Option<&Path>) -> Option<DocumentFormat> {
    if let Some(format) = origin.and_then(DocumentFormat::from_extension) {
        return Some(format);
    }
    let first = content
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty() && !line.starts_with('#'))?;
    if first.starts_with('{') {
        Some(DocumentFormat::Json)
    } else if first.contains(':') || first == "---" {
        Some(DocumentFormat::Yaml)
    } else {
        None
    }
}
