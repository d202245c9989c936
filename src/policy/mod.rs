//! Deprecation and sunset policy.
//!
//! Operations declare a stability tier (`x-stability-level`) and, once
//! deprecated, a sunset date (`x-sunset`). The policy decides which
//! lifecycle transitions between two versions of an operation are allowed
//! and which must be reported, given a minimum notice period per tier and
//! an injected `now`.

mod stability;

pub use stability::Stability;

use crate::model::Operation;
use chrono::{DateTime, Days, NaiveDate};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Minimum notice, in days, between deprecating an operation and its sunset.
/// Zero disables the requirement for that tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct DeprecationPolicy {
    /// Notice required for `beta` operations
    pub beta_days: u32,
    /// Notice required for `stable` operations (and those without a level)
    pub stable_days: u32,
}

impl DeprecationPolicy {
    #[must_use]
    pub const fn new(beta_days: u32, stable_days: u32) -> Self {
        Self {
            beta_days,
            stable_days,
        }
    }

    /// Required notice for a tier, or `None` when no notice is enforced.
    #[must_use]
    pub const fn required_days(&self, stability: Stability) -> Option<u32> {
        let days = match stability {
            Stability::Draft | Stability::Alpha => 0,
            Stability::Beta => self.beta_days,
            Stability::Stable => self.stable_days,
        };
        if days == 0 {
            None
        } else {
            Some(days)
        }
    }
}

/// Parse a sunset date, accepting `YYYY-MM-DD` or an RFC 3339 timestamp.
#[must_use]
pub fn parse_sunset(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

/// Parse an operation's stability level; a missing level means stable.
pub fn operation_stability(operation: &Operation) -> Result<Stability, String> {
    operation
        .stability()
        .map_or(Ok(Stability::Stable), |raw| raw.parse().map_err(|_| raw))
}

/// A lifecycle transition that must be reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleEvent {
    Deprecated,
    Reactivated,
    SunsetDateTooSmall { sunset: NaiveDate, required_days: u32 },
    SunsetDateChangedTooSmall { from: NaiveDate, to: NaiveDate, required_days: u32 },
    SunsetDeleted { from: String },
    DeprecatedSunsetMissing,
    DeprecatedSunsetParse { raw: String },
    InvalidStabilityLevel { raw: String },
    StabilityDecreased { from: Stability, to: Stability },
}

impl LifecycleEvent {
    #[must_use]
    pub const fn rule_id(&self) -> &'static str {
        match self {
            Self::Deprecated => "api-deprecated",
            Self::Reactivated => "api-reactivated",
            Self::SunsetDateTooSmall { .. } => "api-sunset-date-too-small",
            Self::SunsetDateChangedTooSmall { .. } => "api-sunset-date-changed-too-small",
            Self::SunsetDeleted { .. } => "api-sunset-deleted",
            Self::DeprecatedSunsetMissing => "api-deprecated-sunset-missing",
            Self::DeprecatedSunsetParse { .. } => "api-deprecated-sunset-parse",
            Self::InvalidStabilityLevel { .. } => "api-invalid-stability-level",
            Self::StabilityDecreased { .. } => "api-stability-decreased",
        }
    }

    #[must_use]
    pub fn args(&self) -> Vec<Value> {
        match self {
            Self::Deprecated | Self::Reactivated | Self::DeprecatedSunsetMissing => Vec::new(),
            Self::SunsetDateTooSmall {
                sunset,
                required_days,
            } => vec![json!(sunset.to_string()), json!(required_days)],
            Self::SunsetDateChangedTooSmall {
                from,
                to,
                required_days,
            } => vec![
                json!(from.to_string()),
                json!(to.to_string()),
                json!(required_days),
            ],
            Self::SunsetDeleted { from } => vec![json!(from)],
            Self::DeprecatedSunsetParse { raw } | Self::InvalidStabilityLevel { raw } => {
                vec![json!(raw)]
            }
            Self::StabilityDecreased { from, to } => {
                vec![json!(from.as_str()), json!(to.as_str())]
            }
        }
    }
}

/// How an operation's removal is judged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalVerdict {
    /// Removal is permitted and silent.
    Allowed,
    /// The operation was never deprecated.
    WithoutDeprecation,
    /// The operation was deprecated but its sunset has not passed.
    BeforeSunset,
}

/// Latest sunset date that still satisfies `required_days` of notice.
fn notice_deadline(now: NaiveDate, required_days: u32) -> Option<NaiveDate> {
    now.checked_add_days(Days::new(u64::from(required_days)))
}

fn too_small(sunset: NaiveDate, now: NaiveDate, required_days: u32) -> bool {
    notice_deadline(now, required_days).is_some_and(|deadline| sunset < deadline)
}

/// Evaluate the lifecycle transition between two versions of an operation.
#[must_use]
pub fn evaluate_transition(
    base: &Operation,
    revision: &Operation,
    policy: &DeprecationPolicy,
    now: NaiveDate,
) -> Vec<LifecycleEvent> {
    let mut events = Vec::new();

    let base_stability = operation_stability(base).ok();
    let stability = match operation_stability(revision) {
        Ok(stability) => stability,
        Err(raw) => {
            events.push(LifecycleEvent::InvalidStabilityLevel { raw });
            base_stability.unwrap_or(Stability::Stable)
        }
    };

    if let Some(from) = base_stability {
        if revision.stability().is_some() && stability < from {
            events.push(LifecycleEvent::StabilityDecreased {
                from,
                to: stability,
            });
        }
    }

    if stability.is_unstable() {
        return events;
    }
    let required_days = policy.required_days(stability);

    match (base.deprecated, revision.deprecated) {
        (false, true) => events.push(deprecation_event(revision, required_days, now)),
        (true, false) => events.push(LifecycleEvent::Reactivated),
        (true, true) => events.extend(sunset_change_event(base, revision, required_days, now)),
        (false, false) => {}
    }
    events
}

fn deprecation_event(
    revision: &Operation,
    required_days: Option<u32>,
    now: NaiveDate,
) -> LifecycleEvent {
    let Some(required_days) = required_days else {
        return LifecycleEvent::Deprecated;
    };
    let Some(raw) = revision.sunset() else {
        return LifecycleEvent::DeprecatedSunsetMissing;
    };
    match parse_sunset(&raw) {
        None => LifecycleEvent::DeprecatedSunsetParse { raw },
        Some(sunset) if too_small(sunset, now, required_days) => {
            LifecycleEvent::SunsetDateTooSmall {
                sunset,
                required_days,
            }
        }
        Some(_) => LifecycleEvent::Deprecated,
    }
}

fn sunset_change_event(
    base: &Operation,
    revision: &Operation,
    required_days: Option<u32>,
    now: NaiveDate,
) -> Option<LifecycleEvent> {
    let from_raw = base.sunset();
    let to_raw = revision.sunset();
    if from_raw == to_raw {
        return None;
    }
    match (from_raw, to_raw) {
        (Some(from), None) => Some(LifecycleEvent::SunsetDeleted { from }),
        (_, Some(raw)) => {
            let required_days = required_days?;
            let Some(to) = parse_sunset(&raw) else {
                return Some(LifecycleEvent::DeprecatedSunsetParse { raw });
            };
            let from = base.sunset().as_deref().and_then(parse_sunset);
            let moved_earlier = from.map_or(true, |from| to < from);
            if moved_earlier && too_small(to, now, required_days) {
                Some(LifecycleEvent::SunsetDateChangedTooSmall {
                    from: from.unwrap_or(to),
                    to,
                    required_days,
                })
            } else {
                None
            }
        }
        (None, None) => None,
    }
}

/// Judge the removal of an operation from its base version. An invalid
/// stability level is returned alongside and the operation is then treated
/// as stable.
#[must_use]
pub fn evaluate_removal(
    base: &Operation,
    now: NaiveDate,
) -> (RemovalVerdict, Option<LifecycleEvent>) {
    let (stability, invalid) = match operation_stability(base) {
        Ok(stability) => (stability, None),
        Err(raw) => (
            Stability::Stable,
            Some(LifecycleEvent::InvalidStabilityLevel { raw }),
        ),
    };
    if stability.is_unstable() {
        return (RemovalVerdict::Allowed, invalid);
    }
    if !base.deprecated {
        return (RemovalVerdict::WithoutDeprecation, invalid);
    }
    let sunset_passed = base
        .sunset()
        .as_deref()
        .and_then(parse_sunset)
        .is_some_and(|sunset| sunset <= now);
    let verdict = if sunset_passed {
        RemovalVerdict::Allowed
    } else {
        RemovalVerdict::BeforeSunset
    };
    (verdict, invalid)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn operation(deprecated: bool, stability: Option<&str>, sunset: Option<&str>) -> Operation {
        let mut op = Operation {
            deprecated,
            ..Operation::default()
        };
        if let Some(level) = stability {
            op.extensions
                .insert("x-stability-level".to_string(), json!(level));
        }
        if let Some(sunset) = sunset {
            op.extensions.insert("x-sunset".to_string(), json!(sunset));
        }
        op
    }

    const NOW: &str = "2026-03-01";

    #[test]
    fn test_parse_sunset_formats() {
        assert_eq!(parse_sunset("2026-03-11"), Some(date("2026-03-11")));
        assert_eq!(
            parse_sunset("2026-03-11T12:00:00Z"),
            Some(date("2026-03-11"))
        );
        assert_eq!(parse_sunset("next tuesday"), None);
    }

    #[test]
    fn test_deprecation_without_policy() {
        let events = evaluate_transition(
            &operation(false, None, None),
            &operation(true, None, None),
            &DeprecationPolicy::default(),
            date(NOW),
        );
        assert_eq!(events, vec![LifecycleEvent::Deprecated]);
    }

    #[test]
    fn test_sunset_notice_boundary() {
        let policy = DeprecationPolicy::new(0, 10);
        let nine_days = evaluate_transition(
            &operation(false, None, None),
            &operation(true, None, Some("2026-03-10")),
            &policy,
            date(NOW),
        );
        assert_eq!(nine_days[0].rule_id(), "api-sunset-date-too-small");

        let ten_days = evaluate_transition(
            &operation(false, None, None),
            &operation(true, None, Some("2026-03-11")),
            &policy,
            date(NOW),
        );
        assert_eq!(ten_days, vec![LifecycleEvent::Deprecated]);
    }

    #[test]
    fn test_sunset_missing_and_unparseable() {
        let policy = DeprecationPolicy::new(5, 10);
        let missing = evaluate_transition(
            &operation(false, Some("beta"), None),
            &operation(true, Some("beta"), None),
            &policy,
            date(NOW),
        );
        assert_eq!(missing, vec![LifecycleEvent::DeprecatedSunsetMissing]);

        let garbled = evaluate_transition(
            &operation(false, None, None),
            &operation(true, None, Some("soon")),
            &policy,
            date(NOW),
        );
        assert_eq!(garbled[0].rule_id(), "api-deprecated-sunset-parse");
    }

    #[test]
    fn test_reactivated_and_sunset_deleted() {
        let policy = DeprecationPolicy::default();
        let reactivated = evaluate_transition(
            &operation(true, None, Some("2027-01-01")),
            &operation(false, None, None),
            &policy,
            date(NOW),
        );
        assert_eq!(reactivated, vec![LifecycleEvent::Reactivated]);

        let deleted = evaluate_transition(
            &operation(true, None, Some("2027-01-01")),
            &operation(true, None, None),
            &policy,
            date(NOW),
        );
        assert_eq!(deleted[0].rule_id(), "api-sunset-deleted");
    }

    #[test]
    fn test_sunset_moved_earlier() {
        let policy = DeprecationPolicy::new(0, 30);
        let events = evaluate_transition(
            &operation(true, None, Some("2026-06-01")),
            &operation(true, None, Some("2026-03-05")),
            &policy,
            date(NOW),
        );
        assert_eq!(events[0].rule_id(), "api-sunset-date-changed-too-small");

        let later = evaluate_transition(
            &operation(true, None, Some("2026-06-01")),
            &operation(true, None, Some("2026-09-01")),
            &policy,
            date(NOW),
        );
        assert!(later.is_empty());
    }

    #[test]
    fn test_unstable_tiers_are_exempt() {
        let policy = DeprecationPolicy::new(10, 10);
        let events = evaluate_transition(
            &operation(false, Some("alpha"), None),
            &operation(true, Some("alpha"), None),
            &policy,
            date(NOW),
        );
        assert!(events.is_empty());
        let (verdict, _) = evaluate_removal(&operation(false, Some("draft"), None), date(NOW));
        assert_eq!(verdict, RemovalVerdict::Allowed);
    }

    #[test]
    fn test_invalid_and_decreased_stability() {
        let events = evaluate_transition(
            &operation(false, Some("stable"), None),
            &operation(false, Some("experimental"), None),
            &DeprecationPolicy::default(),
            date(NOW),
        );
        assert_eq!(
            events,
            vec![LifecycleEvent::InvalidStabilityLevel {
                raw: "experimental".to_string()
            }]
        );

        let events = evaluate_transition(
            &operation(false, Some("stable"), None),
            &operation(false, Some("beta"), None),
            &DeprecationPolicy::default(),
            date(NOW),
        );
        assert_eq!(events[0].rule_id(), "api-stability-decreased");
    }

    #[test]
    fn test_removal_verdicts() {
        let now = date(NOW);
        assert_eq!(
            evaluate_removal(&operation(false, None, None), now).0,
            RemovalVerdict::WithoutDeprecation
        );
        assert_eq!(
            evaluate_removal(&operation(true, None, Some("2026-02-01")), now).0,
            RemovalVerdict::Allowed
        );
        assert_eq!(
            evaluate_removal(&operation(true, None, Some("2026-03-01")), now).0,
            RemovalVerdict::Allowed
        );
        assert_eq!(
            evaluate_removal(&operation(true, None, Some("2026-04-01")), now).0,
            RemovalVerdict::BeforeSunset
        );
        assert_eq!(
            evaluate_removal(&operation(true, None, None), now).0,
            RemovalVerdict::BeforeSunset
        );
    }
}
