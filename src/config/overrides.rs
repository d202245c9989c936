//! Severity override files.
//!
//! One `rule-id LEVEL` pair per line. Blank lines and `#` comments are
//! ignored; `LEVEL` is `ERR`, `WARN`, `INFO` or `NONE` (case-insensitive),
//! where `NONE` disables the rule.

use super::validation::ConfigError;
use crate::changes::Level;
use std::path::Path;

/// A parsed override; `None` disables the rule.
pub type SeverityOverride = (String, Option<Level>);

/// Parse a level token, where `NONE` means disabled.
pub fn parse_level_token(token: &str) -> Result<Option<Level>, String> {
    if token.eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    token
        .parse::<Level>()
        .map(Some)
        .map_err(|_| format!("unknown level '{token}' (expected ERR, WARN, INFO or NONE)"))
}

/// Parse override lines. Errors name the offending line number.
pub fn parse_overrides(content: &str) -> Result<Vec<SeverityOverride>, ConfigError> {
    let mut overrides = Vec::new();
    for (index, raw) in content.lines().enumerate() {
        let line = raw.split('#').next().unwrap_or_default().trim();
        if line.is_empty() {
            continue;
        }
        let field = format!("line {}", index + 1);
        let mut tokens = line.split_whitespace();
        let (Some(id), Some(level), None) = (tokens.next(), tokens.next(), tokens.next()) else {
            return Err(ConfigError::new(
                field,
                format!("expected '<rule-id> <LEVEL>', got '{line}'"),
            ));
        };
        let level = parse_level_token(level).map_err(|message| ConfigError::new(&field, message))?;
        overrides.push((id.to_string(), level));
    }
    Ok(overrides)
}

/// Read and parse an override file.
pub fn load_overrides(path: &Path) -> Result<Vec<SeverityOverride>, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        ConfigError::new(
            path.display().to_string(),
            format!("failed to read severity levels: {e}"),
        )
    })?;
    parse_overrides(&content).map_err(|e| ConfigError {
        field: format!("{}:{}", path.display(), e.field.trim_start_matches("line ")),
        message: e.message,
    })
}
