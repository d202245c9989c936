//! `checks` command handler: lists the rule registry.

use crate::changes::Level;
use crate::checks::{self, RuleInfo};
use crate::reports::ReportFormat;
use anyhow::{Context, Result};
use serde::Serialize;
use std::fmt::Write as _;

#[derive(Debug, Serialize)]
struct CheckListing {
    name: &'static str,
    description: &'static str,
    rules: Vec<RuleListing>,
}

#[derive(Debug, Serialize)]
struct RuleListing {
    id: &'static str,
    level: Level,
}

impl From<&'static RuleInfo> for RuleListing {
    fn from(rule: &'static RuleInfo) -> Self {
        Self {
            id: &rule.id,
            level: rule.level,
        }
    }
}

fn listings() -> Vec<CheckListing> {
    checks::checks()
        .iter()
        .map(|check| CheckListing {
            name: check.name(),
            description: check.description(),
            rules: checks::all_rules()
                .filter(|rule| rule.is_emitted_by(check.name()))
                .map(RuleListing::from)
                .collect(),
        })
        .collect()
}

/// Render every check with the rules it owns and their default levels.
pub fn render_checks(format: ReportFormat) -> Result<String> {
    let listings = listings();
    match format {
        ReportFormat::Text => {
            let mut out = String::new();
            for check in &listings {
                let _ = writeln!(out, "{}: {}", check.name, check.description);
                for rule in &check.rules {
                    let _ = writeln!(out, "    {:<5} {}", rule.level, rule.id);
                }
            }
            Ok(out)
        }
        ReportFormat::Json => {
            let mut json =
                serde_json::to_string_pretty(&listings).context("failed to serialize checks")?;
            json.push('\n');
            Ok(json)
        }
        ReportFormat::Yaml => serde_yaml::to_string(&listings).context("failed to serialize checks"),
    }
}

/// Print the registry listing to stdout.
pub fn run_list_checks(format: ReportFormat) -> Result<()> {
    print!("{}", render_checks(format)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_listing_groups_rules() {
        let text = render_checks(ReportFormat::Text).unwrap();
        assert!(text.starts_with("endpoints: "), "{text}");
        assert!(text.contains("    ERR   api-removed-without-deprecation\n"));
        assert!(text.contains("    INFO  api-path-added\n"));
    }

    #[test]
    fn test_json_listing_covers_registry() {
        let json = render_checks(ReportFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let listed: usize = value
            .as_array()
            .unwrap()
            .iter()
            .flat_map(|check| check["rules"].as_array().unwrap())
            .map(|rule| rule["id"].as_str().unwrap())
            .collect::<std::collections::BTreeSet<_>>()
            .len();
        assert_eq!(listed, checks::all_rules().count());

        let owners: Vec<&str> = value
            .as_array()
            .unwrap()
            .iter()
            .filter(|check| {
                check["rules"]
                    .as_array()
                    .unwrap()
                    .iter()
                    .any(|rule| rule["id"] == "request-property-max-length-decreased")
            })
            .map(|check| check["name"].as_str().unwrap())
            .collect();
        assert_eq!(owners, vec!["request-parameters", "request-body"]);
        assert_eq!(value[0]["name"], "endpoints");
    }
}
