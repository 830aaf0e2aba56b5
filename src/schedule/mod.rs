// Campaign schedule configuration
//
// `ScheduleConfig` is the canonical, typed shape of a campaign's temporal
// settings. Wizard payloads reach it through exactly one normalization
// boundary (`from_value`), which collapses every legacy field name and
// form-typed value; no rule function ever reads a raw map.
//
// Date and timezone strings stay textual here on purpose: whether they parse
// is itself a validation rule, reported through diagnostics rather than a
// deserialization failure.

pub mod validator;

pub use validator::{validate_schedule, ScheduleValidator};

use crate::error::RulesResult;
use crate::serde_util::{lenient_bool, lenient_opt_i64, lenient_opt_string};
use crate::types::{CampaignStatus, RecurrencePattern, RecurrenceUnit};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A calendar date with an optional time-of-day, still textual
///
/// Missing times default to 00:00 for starts and 23:59 for ends when the
/// validator resolves instants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateSpec {
    /// `YYYY-MM-DD`
    pub date: String,
    /// `HH:MM`
    pub time: Option<String>,
}

impl DateSpec {
    pub fn new(date: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            time: None,
        }
    }

    pub fn at(date: impl Into<String>, time: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            time: Some(time.into()),
        }
    }
}

/// Recurrence settings of a cyclical campaign
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecurrenceConfig {
    /// How many units between occurrence starts
    pub interval: Option<i64>,
    pub unit: RecurrenceUnit,
    pub pattern: RecurrencePattern,
    /// Selected weekday names for weekly patterns, canonical Sun..Sat
    pub weekly_days: Vec<String>,
    /// Anchor day for monthly patterns, 1..=31
    pub day_of_month: Option<i64>,
}

/// Product rotation settings within one occurrence
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RotationConfig {
    /// Hours between featured-product changes
    pub interval_hours: Option<i64>,
}

/// Canonical campaign schedule, input to the schedule validator
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Absent for campaigns that have never been saved
    pub campaign_id: Option<Uuid>,
    pub status: CampaignStatus,
    pub start: Option<DateSpec>,
    pub end: Option<DateSpec>,
    /// Named IANA zone or `±HH:MM` offset; empty/absent means system default
    pub timezone: Option<String>,
    /// Explicit per-occurrence duration, used when `end` is open
    pub duration_seconds: Option<i64>,
    pub recurrence: Option<RecurrenceConfig>,
    /// End condition name, one of `never`/`on_date`/`after_occurrences`
    pub end_type: Option<String>,
    /// Last allowed recurrence date for the `on_date` end condition
    pub recurrence_end_date: Option<String>,
    /// Occurrence cap for the `after_occurrences` end condition
    pub occurrence_count: Option<i64>,
    pub rotation: Option<RotationConfig>,
}

impl ScheduleConfig {
    /// Normalize a raw wizard-step payload into the canonical config
    pub fn from_value(value: &serde_json::Value) -> RulesResult<Self> {
        let input: ScheduleInput = serde_json::from_value(value.clone())?;
        Ok(input.into())
    }
}

/// Raw wizard-step schedule payload
///
/// Carries an alias for every historical field name so alias resolution
/// lives here and nowhere else.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScheduleInput {
    #[serde(default, alias = "id")]
    pub campaign_id: Option<Uuid>,

    #[serde(default)]
    pub status: CampaignStatus,

    #[serde(default, alias = "date_from", deserialize_with = "lenient_opt_string")]
    pub start_date: Option<String>,
    #[serde(default, alias = "time_from", deserialize_with = "lenient_opt_string")]
    pub start_time: Option<String>,
    #[serde(default, alias = "date_to", deserialize_with = "lenient_opt_string")]
    pub end_date: Option<String>,
    #[serde(default, alias = "time_to", deserialize_with = "lenient_opt_string")]
    pub end_time: Option<String>,

    #[serde(default, alias = "time_zone", deserialize_with = "lenient_opt_string")]
    pub timezone: Option<String>,

    #[serde(default, deserialize_with = "lenient_opt_i64")]
    pub duration_seconds: Option<i64>,

    #[serde(default, alias = "is_recurring", deserialize_with = "lenient_bool")]
    pub enable_recurring: bool,
    #[serde(default, alias = "interval", deserialize_with = "lenient_opt_i64")]
    pub recurrence_interval: Option<i64>,
    #[serde(default, alias = "interval_unit")]
    pub recurrence_unit: RecurrenceUnit,
    #[serde(default, alias = "schedule_pattern")]
    pub recurrence_pattern: RecurrencePattern,
    #[serde(default, alias = "recurrence_days")]
    pub weekly_days: Vec<String>,
    #[serde(default, alias = "monthly_day", deserialize_with = "lenient_opt_i64")]
    pub day_of_month: Option<i64>,

    #[serde(
        default,
        alias = "recurrence_end_type",
        deserialize_with = "lenient_opt_string"
    )]
    pub end_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub recurrence_end_date: Option<String>,
    #[serde(default, alias = "max_occurrences", deserialize_with = "lenient_opt_i64")]
    pub occurrence_count: Option<i64>,

    #[serde(
        default,
        alias = "enable_product_rotation",
        deserialize_with = "lenient_bool"
    )]
    pub enable_rotation: bool,
    #[serde(
        default,
        alias = "rotation_interval_hours",
        deserialize_with = "lenient_opt_i64"
    )]
    pub rotation_interval: Option<i64>,
}

impl From<ScheduleInput> for ScheduleConfig {
    fn from(input: ScheduleInput) -> Self {
        let start = input.start_date.map(|date| DateSpec {
            date,
            time: input.start_time,
        });
        let end = input.end_date.map(|date| DateSpec {
            date,
            time: input.end_time,
        });
        let recurrence = input.enable_recurring.then(|| RecurrenceConfig {
            interval: input.recurrence_interval,
            unit: input.recurrence_unit,
            pattern: input.recurrence_pattern,
            weekly_days: input.weekly_days,
            day_of_month: input.day_of_month,
        });
        let rotation = input.enable_rotation.then(|| RotationConfig {
            interval_hours: input.rotation_interval,
        });

        Self {
            campaign_id: input.campaign_id,
            status: input.status,
            start,
            end,
            timezone: input.timezone,
            duration_seconds: input.duration_seconds,
            recurrence,
            end_type: input.end_type,
            recurrence_end_date: input.recurrence_end_date,
            occurrence_count: input.occurrence_count,
            rotation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value_minimal() {
        let config = ScheduleConfig::from_value(&json!({
            "start_date": "2025-06-01",
            "end_date": "2025-06-10",
        }))
        .unwrap();

        assert_eq!(config.start, Some(DateSpec::new("2025-06-01")));
        assert_eq!(config.end, Some(DateSpec::new("2025-06-10")));
        assert!(config.recurrence.is_none());
        assert!(config.rotation.is_none());
        assert!(config.campaign_id.is_none());
    }

    #[test]
    fn test_legacy_aliases_collapse() {
        let config = ScheduleConfig::from_value(&json!({
            "date_from": "2025-06-01",
            "date_to": "2025-06-02",
            "is_recurring": "1",
            "interval": "7",
            "recurrence_days": ["monday", "thursday"],
            "recurrence_end_type": "never",
        }))
        .unwrap();

        assert_eq!(config.start.unwrap().date, "2025-06-01");
        let recurrence = config.recurrence.unwrap();
        assert_eq!(recurrence.interval, Some(7));
        assert_eq!(recurrence.weekly_days, vec!["monday", "thursday"]);
        assert_eq!(config.end_type.as_deref(), Some("never"));
    }

    #[test]
    fn test_form_shaped_values() {
        let config = ScheduleConfig::from_value(&json!({
            "start_date": "2025-06-01",
            "start_time": "09:30",
            "end_date": "2025-06-01",
            "end_time": "18:00",
            "enable_rotation": "yes",
            "rotation_interval": "12",
        }))
        .unwrap();

        assert_eq!(config.start, Some(DateSpec::at("2025-06-01", "09:30")));
        assert_eq!(config.end, Some(DateSpec::at("2025-06-01", "18:00")));
        assert_eq!(config.rotation.unwrap().interval_hours, Some(12));
    }

    #[test]
    fn test_recurrence_absent_when_disabled() {
        // Recurrence fields without the enable flag stay out of the config
        let config = ScheduleConfig::from_value(&json!({
            "start_date": "2025-06-01",
            "recurrence_interval": 7,
        }))
        .unwrap();

        assert!(config.recurrence.is_none());
    }

    #[test]
    fn test_empty_strings_become_none() {
        let config = ScheduleConfig::from_value(&json!({
            "start_date": "2025-06-01",
            "end_date": "",
            "timezone": "  ",
        }))
        .unwrap();

        assert!(config.end.is_none());
        assert!(config.timezone.is_none());
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let config = ScheduleConfig::from_value(&json!({
            "start_date": "2025-06-01",
            "wizard_step": 3,
            "nonce": "abc123",
        }));
        assert!(config.is_ok());
    }
}
