// Schedule validator
//
// Pure function over a campaign schedule plus an injected clock, producing
// diagnostics. Rules are additive: one pass runs every applicable group and
// accumulates every triggered finding in a fixed group order. The only
// short-circuit is a recurring campaign with no derivable occurrence
// duration, which aborts the remaining recurrence arithmetic.

use crate::clock::{Clock, TimezoneSpec};
use crate::diagnostics::DiagnosticsCollector;
use crate::limits::ScheduleLimits;
use crate::schedule::{DateSpec, ScheduleConfig};
use crate::types::{CampaignStatus, EndCondition, RecurrencePattern};
use chrono::{DateTime, Duration, Months, NaiveDate, NaiveTime, Utc};
use serde_json::Value;
use std::str::FromStr;

const SECONDS_PER_HOUR: i64 = 3_600;
const SECONDS_PER_DAY: i64 = 86_400;

/// Canonical weekday names, Sunday first
const WEEKDAY_NAMES: [&str; 7] = [
    "sunday",
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
];

/// Validate a raw wizard-step schedule payload, appending to the collector
pub fn validate_schedule(
    value: &Value,
    clock: &dyn Clock,
    limits: &ScheduleLimits,
    diagnostics: &mut DiagnosticsCollector,
) {
    match ScheduleConfig::from_value(value) {
        Ok(config) => ScheduleValidator::new(clock, limits).validate(&config, diagnostics),
        Err(e) => {
            tracing::debug!(error = %e, "schedule payload failed to deserialize");
            diagnostics.critical(
                "schedule_invalid_payload",
                format!("The schedule settings could not be read: {}", e),
            );
        }
    }
}

/// Start and end resolved to absolute instants, where possible
struct ResolvedSchedule {
    timezone: Option<TimezoneSpec>,
    start: Option<DateTime<Utc>>,
    start_date: Option<NaiveDate>,
    end: Option<DateTime<Utc>>,
    end_date: Option<NaiveDate>,
    /// `end - start` in seconds when both instants resolved
    duration_seconds: Option<i64>,
    /// Duration of one occurrence: explicit end, or explicit duration
    occurrence_seconds: Option<i64>,
}

/// Schedule validator
///
/// Stateless apart from the injected clock and configured bounds.
pub struct ScheduleValidator<'a> {
    clock: &'a dyn Clock,
    limits: &'a ScheduleLimits,
}

impl<'a> ScheduleValidator<'a> {
    pub fn new(clock: &'a dyn Clock, limits: &'a ScheduleLimits) -> Self {
        Self { clock, limits }
    }

    /// Run every applicable rule group, appending diagnostics in group order
    pub fn validate(&self, config: &ScheduleConfig, diagnostics: &mut DiagnosticsCollector) {
        let resolved = self.resolve(config, diagnostics);

        self.check_dates(config, &resolved, diagnostics);
        self.check_duration(config, &resolved, diagnostics);
        self.check_recurrence(config, &resolved, diagnostics);
        self.check_rotation(config, &resolved, diagnostics);
        self.check_timezone(config, &resolved, diagnostics);
        self.check_weekly(config, &resolved, diagnostics);
        self.check_monthly(config, &resolved, diagnostics);
        self.check_end_conditions(config, diagnostics);
        self.check_cross_field(config, &resolved, diagnostics);
        self.check_performance(config, &resolved, diagnostics);
    }

    /// Combine date + time-of-day into absolute instants before any
    /// comparison. Comparing dates alone produces false positives whenever
    /// only the time component differs.
    fn resolve(
        &self,
        config: &ScheduleConfig,
        diagnostics: &mut DiagnosticsCollector,
    ) -> ResolvedSchedule {
        let timezone = config
            .timezone
            .as_deref()
            .map_or(Some(TimezoneSpec::default()), TimezoneSpec::parse);
        let zone = timezone.unwrap_or_default();

        let start_parts = config.start.as_ref().and_then(|spec| {
            parse_date_spec(spec, "start", NaiveTime::MIN, &zone, diagnostics)
        });
        let end_parts = config.end.as_ref().and_then(|spec| {
            let end_of_day = NaiveTime::from_hms_opt(23, 59, 0).unwrap_or(NaiveTime::MIN);
            parse_date_spec(spec, "end", end_of_day, &zone, diagnostics)
        });

        let (start, start_date) = match start_parts {
            Some((instant, date)) => (Some(instant), Some(date)),
            None => (None, None),
        };
        let (end, end_date) = match end_parts {
            Some((instant, date)) => (Some(instant), Some(date)),
            None => (None, None),
        };

        let duration_seconds = match (start, end) {
            (Some(s), Some(e)) => Some((e - s).num_seconds()),
            _ => None,
        };
        let occurrence_seconds = duration_seconds
            .filter(|d| *d > 0)
            .or(config.duration_seconds.filter(|d| *d > 0));

        ResolvedSchedule {
            timezone,
            start,
            start_date,
            end,
            end_date,
            duration_seconds,
            occurrence_seconds,
        }
    }

    fn check_dates(
        &self,
        config: &ScheduleConfig,
        resolved: &ResolvedSchedule,
        diagnostics: &mut DiagnosticsCollector,
    ) {
        let now = self.clock.now();

        if let (Some(start), Some(end)) = (resolved.start, resolved.end) {
            if start > end {
                diagnostics.critical(
                    "schedule_inverted_dates",
                    "The campaign end is before its start.",
                );
            } else if start == end {
                diagnostics.critical(
                    "schedule_zero_duration",
                    "The campaign starts and ends at the same instant.",
                );
            }
        }

        if let Some(start) = resolved.start {
            // Editing an already-saved campaign should not re-warn about a
            // start date that was in the future when it was created.
            if config.campaign_id.is_none() && start < now {
                diagnostics.warning(
                    "schedule_past_start_date",
                    "The start date is in the past; the campaign will begin immediately.",
                );
            }
        }

        if let Some(end) = resolved.end {
            let horizon = now + Duration::days(self.limits.far_future_years * 365);
            if end > horizon {
                diagnostics.warning(
                    "schedule_far_future",
                    format!(
                        "The end date is more than {} years away; double-check the year.",
                        self.limits.far_future_years
                    ),
                );
            }
        }
    }

    fn check_duration(
        &self,
        config: &ScheduleConfig,
        resolved: &ResolvedSchedule,
        diagnostics: &mut DiagnosticsCollector,
    ) {
        let Some(duration) = resolved.duration_seconds.filter(|d| *d > 0) else {
            return;
        };

        if duration < SECONDS_PER_HOUR {
            diagnostics.warning(
                "schedule_very_short_duration",
                "The campaign runs for less than one hour; most shoppers will miss it.",
            );
        }

        if duration > self.limits.max_duration_days * SECONDS_PER_DAY {
            diagnostics.critical(
                "schedule_duration_too_long",
                format!(
                    "The campaign duration exceeds the maximum of {} days.",
                    self.limits.max_duration_days
                ),
            );
        }

        if duration <= SECONDS_PER_DAY {
            if let (Some(start_date), Some(end_date)) = (resolved.start_date, resolved.end_date) {
                if start_date != end_date {
                    diagnostics.info(
                        "schedule_crosses_midnight",
                        "The campaign crosses midnight into the next calendar day.",
                    );
                }
            }
        }

        if config.rotation.is_some() && duration < SECONDS_PER_HOUR {
            diagnostics.warning(
                "schedule_rotation_short_duration",
                "Product rotation is enabled but the campaign lasts under an hour.",
            );
        }
    }

    fn check_recurrence(
        &self,
        config: &ScheduleConfig,
        resolved: &ResolvedSchedule,
        diagnostics: &mut DiagnosticsCollector,
    ) {
        let Some(recurrence) = config.recurrence.as_ref() else {
            return;
        };

        // The engine must be able to compute one occurrence's duration; an
        // open-ended occurrence makes every cycle comparison meaningless.
        let Some(occurrence) = resolved.occurrence_seconds else {
            diagnostics.critical(
                "recurring_requires_duration",
                "A recurring campaign needs an end date or an explicit duration.",
            );
            return;
        };

        let interval = recurrence.interval.unwrap_or(0);
        let interval_valid = (self.limits.min_recurrence_interval
            ..=self.limits.max_recurrence_interval)
            .contains(&interval);
        if !interval_valid {
            diagnostics.critical(
                "schedule_invalid_recurrence_interval",
                format!(
                    "The recurrence interval must be between {} and {}.",
                    self.limits.min_recurrence_interval, self.limits.max_recurrence_interval
                ),
            );
        }

        let cycle_seconds = interval.saturating_mul(recurrence.unit.seconds());

        // The next instance starts where the previous one ends plus the
        // interval, so back-to-back instances can never overlap. The only
        // cycle-vs-duration problem is a cycle that outlasts the campaign's
        // own bound, meaning it never actually repeats.
        if interval_valid && cycle_seconds > occurrence {
            diagnostics.warning(
                "schedule_recurrence_exceeds_duration",
                "The recurrence cycle is longer than the campaign itself, so it will never repeat.",
            );
        }

        let end_condition = parse_end_condition(config);

        if interval_valid {
            let span_seconds = match end_condition {
                Some(EndCondition::OnDate) => recurrence_end_instant(config, resolved)
                    .zip(resolved.start)
                    .map(|(rec_end, start)| (rec_end - start).num_seconds()),
                Some(EndCondition::AfterOccurrences) => config
                    .occurrence_count
                    .filter(|c| *c > 0)
                    .map(|count| count.saturating_mul(cycle_seconds)),
                _ => None,
            };
            if let Some(span) = span_seconds {
                if span > self.limits.max_recurring_span_days * SECONDS_PER_DAY {
                    diagnostics.warning(
                        "schedule_long_recurring_span",
                        format!(
                            "The campaign recurs for more than {} days; products, prices and \
                             categories tend to drift over such spans.",
                            self.limits.max_recurring_span_days
                        ),
                    );
                }
            }
        }

        if let Some(count) = config.occurrence_count {
            if count < self.limits.min_occurrences {
                diagnostics.critical(
                    "schedule_occurrences_below_minimum",
                    format!(
                        "At least {} occurrence(s) are required.",
                        self.limits.min_occurrences
                    ),
                );
            } else if count > self.limits.max_occurrences {
                diagnostics.warning(
                    "schedule_occurrences_above_maximum",
                    format!(
                        "More than {} occurrences configured; consider an end date instead.",
                        self.limits.max_occurrences
                    ),
                );
            }
        }

        if end_condition == Some(EndCondition::OnDate) {
            self.check_recurrence_end_date(config, resolved, interval, diagnostics);
        }
    }

    fn check_recurrence_end_date(
        &self,
        config: &ScheduleConfig,
        resolved: &ResolvedSchedule,
        interval: i64,
        diagnostics: &mut DiagnosticsCollector,
    ) {
        let Some(raw) = config.recurrence_end_date.as_deref() else {
            diagnostics.critical(
                "schedule_invalid_date",
                "The recurrence end date is required when the campaign ends on a date.",
            );
            return;
        };
        let Some(rec_end) = recurrence_end_instant(config, resolved) else {
            diagnostics.critical(
                "schedule_invalid_date",
                format!("The recurrence end date \"{}\" is not a valid date.", raw),
            );
            return;
        };

        if rec_end < self.clock.now() {
            diagnostics.critical(
                "schedule_recurrence_end_in_past",
                "The recurrence end date is in the past.",
            );
        }

        let Some(campaign_end) = resolved.end else {
            return;
        };
        let Some(pattern) = config.recurrence.as_ref().map(|r| r.pattern) else {
            return;
        };
        let first_possible = match pattern {
            RecurrencePattern::Daily => Some(campaign_end + Duration::days(interval)),
            RecurrencePattern::Weekly => Some(campaign_end + Duration::weeks(interval)),
            RecurrencePattern::Monthly => u32::try_from(interval)
                .ok()
                .and_then(|months| campaign_end.checked_add_months(Months::new(months))),
        };
        if let Some(first_possible) = first_possible {
            if rec_end < first_possible {
                diagnostics.critical(
                    "schedule_recurrence_end_before_first_cycle",
                    "The recurrence end date falls before the first possible recurrence.",
                );
            }
        }
    }

    fn check_rotation(
        &self,
        config: &ScheduleConfig,
        resolved: &ResolvedSchedule,
        diagnostics: &mut DiagnosticsCollector,
    ) {
        let Some(rotation) = config.rotation.as_ref() else {
            return;
        };

        let interval = rotation.interval_hours.unwrap_or(0);
        if !(self.limits.min_rotation_hours..=self.limits.max_rotation_hours).contains(&interval) {
            diagnostics.critical(
                "schedule_invalid_rotation_interval",
                format!(
                    "The rotation interval must be between {} and {} hours.",
                    self.limits.min_rotation_hours, self.limits.max_rotation_hours
                ),
            );
            return;
        }

        if let Some(duration) = resolved.occurrence_seconds {
            if interval * SECONDS_PER_HOUR >= duration {
                diagnostics.warning(
                    "schedule_rotation_never_triggers",
                    "The rotation interval is at least as long as the campaign; products will never rotate.",
                );
            }
        }

        if interval < self.limits.fast_rotation_hours {
            diagnostics.info(
                "schedule_rotation_high_frequency",
                format!(
                    "Rotating more often than every {} hours increases load on busy stores.",
                    self.limits.fast_rotation_hours
                ),
            );
        }

        if let Some(recurrence) = config.recurrence.as_ref() {
            if let Some(rec_interval) = recurrence.interval.filter(|i| *i > 0) {
                let recurrence_hours =
                    rec_interval.saturating_mul(recurrence.unit.seconds()) / SECONDS_PER_HOUR;
                if interval >= recurrence_hours {
                    diagnostics.warning(
                        "schedule_rotation_exceeds_recurrence",
                        "The rotation interval is at least as long as the recurrence cycle.",
                    );
                }
            }
        }
    }

    fn check_timezone(
        &self,
        config: &ScheduleConfig,
        resolved: &ResolvedSchedule,
        diagnostics: &mut DiagnosticsCollector,
    ) {
        let Some(raw) = config.timezone.as_deref() else {
            return;
        };
        let Some(spec) = resolved.timezone else {
            diagnostics.critical(
                "schedule_invalid_timezone",
                format!(
                    "\"{}\" is not a known timezone; use an IANA name like \
                     \"Europe/Berlin\" or an offset like \"+02:00\".",
                    raw
                ),
            );
            return;
        };

        if let (Some(zone), Some(start), Some(end)) =
            (spec.named(), resolved.start, resolved.end)
        {
            if end > start && self.clock.dst_transitions(zone, start, end) > 1 {
                diagnostics.info(
                    "schedule_multiple_dst_transitions",
                    "The campaign spans more than one daylight-saving transition; \
                     occurrence times will shift with the clock changes.",
                );
            }
        }
    }

    fn check_weekly(
        &self,
        config: &ScheduleConfig,
        resolved: &ResolvedSchedule,
        diagnostics: &mut DiagnosticsCollector,
    ) {
        let Some(recurrence) = config.recurrence.as_ref() else {
            return;
        };
        if recurrence.pattern != RecurrencePattern::Weekly {
            return;
        }

        if recurrence.weekly_days.is_empty() {
            diagnostics.critical(
                "schedule_weekly_no_days",
                "A weekly schedule needs at least one selected weekday.",
            );
            return;
        }

        let mut indices = Vec::new();
        for name in &recurrence.weekly_days {
            match weekday_index(name) {
                Some(index) => indices.push(index),
                None => diagnostics.critical(
                    "schedule_weekly_invalid_day",
                    format!("\"{}\" is not a valid weekday name.", name),
                ),
            }
        }
        indices.sort_unstable();
        indices.dedup();
        if indices.is_empty() {
            return;
        }

        if indices.len() == 7 {
            diagnostics.info(
                "schedule_weekly_all_days",
                "All seven days are selected; a daily pattern expresses this more directly.",
            );
        } else if indices.len() == 1 {
            diagnostics.info(
                "schedule_weekly_single_day",
                "Only one weekday is selected; a single-date schedule may be simpler.",
            );
        }

        if indices.len() >= 2 {
            if let Some(duration) = resolved.occurrence_seconds {
                let duration_days = duration.div_euclid(SECONDS_PER_DAY)
                    + (duration.rem_euclid(SECONDS_PER_DAY) != 0) as i64;
                let mut too_close = Vec::new();
                for (position, &day) in indices.iter().enumerate() {
                    let next = indices[(position + 1) % indices.len()];
                    let gap = if position + 1 == indices.len() {
                        next as i64 + 7 - day as i64
                    } else {
                        next as i64 - day as i64
                    };
                    if gap < duration_days {
                        too_close.push(format!(
                            "{} → {}",
                            WEEKDAY_NAMES[day], WEEKDAY_NAMES[next]
                        ));
                    }
                }
                if !too_close.is_empty() {
                    diagnostics.critical(
                        "schedule_weekly_days_too_close",
                        format!(
                            "With a {}-day duration these selected days would overlap a still-running \
                             occurrence: {}.",
                            duration_days,
                            too_close.join(", ")
                        ),
                    );
                }
            }
        }
    }

    fn check_monthly(
        &self,
        config: &ScheduleConfig,
        resolved: &ResolvedSchedule,
        diagnostics: &mut DiagnosticsCollector,
    ) {
        let Some(recurrence) = config.recurrence.as_ref() else {
            return;
        };
        if recurrence.pattern != RecurrencePattern::Monthly {
            return;
        }

        match recurrence.day_of_month {
            Some(day) if (1..=31).contains(&day) => {
                if day == 29 {
                    diagnostics.warning(
                        "schedule_monthly_day_29",
                        "Day 29 skips February in non-leap years.",
                    );
                } else if day >= 30 {
                    diagnostics.warning(
                        "schedule_monthly_day_30_plus",
                        format!("Day {} is skipped in shorter months.", day),
                    );
                }
            }
            _ => diagnostics.critical(
                "schedule_monthly_invalid_day",
                "A monthly schedule needs a day of month between 1 and 31.",
            ),
        }

        if let Some(end_date) = resolved.end_date {
            use chrono::Datelike;
            if end_date.day() >= 29 {
                diagnostics.info(
                    "schedule_monthly_end_shift",
                    "The campaign ends on day 29 or later; shorter months shift the occurrence \
                     to their last day.",
                );
            }
        }
    }

    fn check_end_conditions(&self, config: &ScheduleConfig, diagnostics: &mut DiagnosticsCollector) {
        let parsed = match config.end_type.as_deref() {
            Some(raw) => match EndCondition::from_str(raw) {
                Ok(condition) => Some(condition),
                Err(_) => {
                    diagnostics.critical(
                        "schedule_invalid_end_condition",
                        format!(
                            "\"{}\" is not a valid end condition; expected never, on_date or \
                             after_occurrences.",
                            raw
                        ),
                    );
                    return;
                }
            },
            None => None,
        };

        let recurring = config.recurrence.is_some();
        match parsed.unwrap_or_default() {
            EndCondition::AfterOccurrences if !recurring => diagnostics.critical(
                "schedule_occurrences_without_recurrence",
                "An occurrence-count end condition requires recurrence to be enabled.",
            ),
            EndCondition::Never if recurring => diagnostics.warning(
                "schedule_indefinite_recurrence",
                "The campaign recurs indefinitely; confirm this is intentional.",
            ),
            _ => {}
        }
    }

    fn check_cross_field(
        &self,
        config: &ScheduleConfig,
        resolved: &ResolvedSchedule,
        diagnostics: &mut DiagnosticsCollector,
    ) {
        let now = self.clock.now();

        if config.campaign_id.is_none() && config.status == CampaignStatus::Active {
            if let (Some(start), Some(end)) = (resolved.start, resolved.end) {
                if start < now && end > now {
                    diagnostics.warning(
                        "schedule_already_running",
                        "This new campaign is marked active and its window has already begun.",
                    );
                }
            }
        }

        if let Some(recurrence) = config.recurrence.as_ref() {
            if let (Some(interval), Some(count)) = (
                recurrence.interval.filter(|i| *i > 0),
                config.occurrence_count.filter(|c| *c > 0),
            ) {
                let total_days = interval
                    .saturating_mul(recurrence.unit.seconds())
                    .saturating_mul(count)
                    / SECONDS_PER_DAY;
                if total_days > self.limits.overflow_guard_days {
                    diagnostics.warning(
                        "schedule_span_overflow_risk",
                        "Interval times occurrence count spans more than ten years; date \
                         arithmetic this far out is unreliable.",
                    );
                }
            }
        }
    }

    fn check_performance(
        &self,
        config: &ScheduleConfig,
        resolved: &ResolvedSchedule,
        diagnostics: &mut DiagnosticsCollector,
    ) {
        if let Some(duration) = resolved.duration_seconds.filter(|d| *d > 0) {
            if duration / SECONDS_PER_DAY > self.limits.long_duration_info_days {
                diagnostics.info(
                    "schedule_long_duration",
                    format!(
                        "The campaign runs longer than {} days; a recurring schedule may \
                         fit better.",
                        self.limits.long_duration_info_days
                    ),
                );
            }
        }

        if let Some(rotation) = config.rotation.as_ref() {
            if let (Some(interval), Some(duration)) = (
                rotation.interval_hours.filter(|i| *i > 0),
                resolved.occurrence_seconds,
            ) {
                let rotations = duration / SECONDS_PER_HOUR / interval;
                if rotations > self.limits.max_rotations_per_occurrence {
                    diagnostics.warning(
                        "schedule_excessive_rotations",
                        format!(
                            "About {} rotations per occurrence; more than {} degrades storefront \
                             caching.",
                            rotations, self.limits.max_rotations_per_occurrence
                        ),
                    );
                }
            }
        }

        if parse_end_condition(config) == Some(EndCondition::AfterOccurrences) {
            if let Some(count) = config.occurrence_count {
                if count > self.limits.performance_max_occurrences {
                    diagnostics.warning(
                        "schedule_excessive_occurrences",
                        format!(
                            "{} occurrences is beyond the recommended {}.",
                            count, self.limits.performance_max_occurrences
                        ),
                    );
                }
            }
        }
    }
}

/// Parse one endpoint, appending `schedule_invalid_date` on bad text
fn parse_date_spec(
    spec: &DateSpec,
    which: &str,
    default_time: NaiveTime,
    zone: &TimezoneSpec,
    diagnostics: &mut DiagnosticsCollector,
) -> Option<(DateTime<Utc>, NaiveDate)> {
    let date = match NaiveDate::parse_from_str(spec.date.trim(), "%Y-%m-%d") {
        Ok(date) => date,
        Err(_) => {
            diagnostics.critical(
                "schedule_invalid_date",
                format!("The {} date \"{}\" is not a valid date.", which, spec.date),
            );
            return None;
        }
    };
    let time = match spec.time.as_deref() {
        None => default_time,
        Some(raw) => match parse_time(raw) {
            Some(time) => time,
            None => {
                diagnostics.critical(
                    "schedule_invalid_date",
                    format!("The {} time \"{}\" is not a valid time.", which, raw),
                );
                return None;
            }
        },
    };
    // A DST gap can swallow the literal wall time; fall back to the date at
    // midnight UTC rather than dropping the endpoint.
    let instant = zone
        .to_instant(date.and_time(time))
        .or_else(|| TimezoneSpec::default().to_instant(date.and_time(time)))?;
    Some((instant, date))
}

fn parse_time(raw: &str) -> Option<NaiveTime> {
    let trimmed = raw.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
        .ok()
}

fn parse_end_condition(config: &ScheduleConfig) -> Option<EndCondition> {
    config
        .end_type
        .as_deref()
        .map_or(Some(EndCondition::Never), |raw| {
            EndCondition::from_str(raw).ok()
        })
}

/// Recurrence end date resolved to the end of that day in the campaign zone
fn recurrence_end_instant(
    config: &ScheduleConfig,
    resolved: &ResolvedSchedule,
) -> Option<DateTime<Utc>> {
    let raw = config.recurrence_end_date.as_deref()?;
    let date = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()?;
    let end_of_day = NaiveTime::from_hms_opt(23, 59, 0)?;
    resolved
        .timezone
        .unwrap_or_default()
        .to_instant(date.and_time(end_of_day))
}

fn weekday_index(name: &str) -> Option<usize> {
    let lowered = name.trim().to_ascii_lowercase();
    WEEKDAY_NAMES.iter().position(|&day| day == lowered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use serde_json::json;

    fn run(clock: &FixedClock, value: serde_json::Value) -> DiagnosticsCollector {
        let mut diagnostics = DiagnosticsCollector::new();
        validate_schedule(&value, clock, &ScheduleLimits::default(), &mut diagnostics);
        diagnostics
    }

    fn may_2025() -> FixedClock {
        FixedClock::at("2025-05-01 12:00").unwrap()
    }

    #[test]
    fn test_single_day_campaign_is_clean() {
        // start 00:00 and end 23:59 on the same day: zero diagnostics
        let diagnostics = run(
            &may_2025(),
            json!({
                "start_date": "2025-06-01", "start_time": "00:00",
                "end_date": "2025-06-01", "end_time": "23:59",
            }),
        );
        assert!(diagnostics.is_empty(), "got {:?}", diagnostics.codes());
    }

    #[test]
    fn test_inverted_dates_single_critical() {
        let diagnostics = run(
            &may_2025(),
            json!({"start_date": "2025-06-10", "end_date": "2025-06-01"}),
        );
        assert_eq!(diagnostics.codes(), vec!["schedule_inverted_dates"]);
        assert!(diagnostics.has_critical());
    }

    #[test]
    fn test_time_component_prevents_false_inversion() {
        // Same date, start 09:00 end 17:00: fine once times are combined
        let diagnostics = run(
            &may_2025(),
            json!({
                "start_date": "2025-06-01", "start_time": "09:00",
                "end_date": "2025-06-01", "end_time": "17:00",
            }),
        );
        assert!(!diagnostics.has_code("schedule_inverted_dates"));
        assert!(!diagnostics.has_code("schedule_zero_duration"));
    }

    #[test]
    fn test_equal_instants_zero_duration() {
        let diagnostics = run(
            &may_2025(),
            json!({
                "start_date": "2025-06-01", "start_time": "12:00",
                "end_date": "2025-06-01", "end_time": "12:00",
            }),
        );
        assert_eq!(diagnostics.codes(), vec!["schedule_zero_duration"]);
    }

    #[test]
    fn test_past_start_warns_only_for_new_campaigns() {
        let payload = json!({
            "start_date": "2025-04-01",
            "end_date": "2025-06-01",
        });
        let diagnostics = run(&may_2025(), payload.clone());
        assert!(diagnostics.has_code("schedule_past_start_date"));

        let mut existing = payload;
        existing["campaign_id"] = json!("7e9b0a62-2f5c-4b4f-9287-9f1e2cc7a111");
        let diagnostics = run(&may_2025(), existing);
        assert!(!diagnostics.has_code("schedule_past_start_date"));
    }

    #[test]
    fn test_far_future_end() {
        let diagnostics = run(
            &may_2025(),
            json!({"start_date": "2025-06-01", "end_date": "2040-06-01"}),
        );
        assert!(diagnostics.has_code("schedule_far_future"));
        // also too long as a single non-recurring run
        assert!(diagnostics.has_code("schedule_duration_too_long"));
    }

    #[test]
    fn test_very_short_duration() {
        let diagnostics = run(
            &may_2025(),
            json!({
                "start_date": "2025-06-01", "start_time": "12:00",
                "end_date": "2025-06-01", "end_time": "12:30",
            }),
        );
        assert!(diagnostics.has_code("schedule_very_short_duration"));
    }

    #[test]
    fn test_overnight_campaign_info() {
        let diagnostics = run(
            &may_2025(),
            json!({
                "start_date": "2025-06-01", "start_time": "20:00",
                "end_date": "2025-06-02", "end_time": "04:00",
            }),
        );
        assert!(diagnostics.has_code("schedule_crosses_midnight"));
        assert!(!diagnostics.has_critical());
    }

    #[test]
    fn test_invalid_date_text() {
        let diagnostics = run(
            &may_2025(),
            json!({"start_date": "June first", "end_date": "2025-06-10"}),
        );
        assert!(diagnostics.has_code("schedule_invalid_date"));
        assert!(diagnostics.has_critical());
    }

    #[test]
    fn test_recurrence_cycle_longer_than_campaign() {
        // 9-day campaign with a 30-day cycle never repeats within its bound
        let diagnostics = run(
            &may_2025(),
            json!({
                "start_date": "2025-06-01",
                "end_date": "2025-06-10",
                "enable_recurring": true,
                "recurrence_interval": 30,
                "recurrence_unit": "days",
            }),
        );
        assert!(diagnostics.has_code("schedule_recurrence_exceeds_duration"));
        assert!(!diagnostics.has_critical());
    }

    #[test]
    fn test_recurring_without_duration() {
        let diagnostics = run(
            &may_2025(),
            json!({
                "start_date": "2025-06-01",
                "enable_recurring": true,
                "recurrence_interval": 7,
            }),
        );
        assert!(diagnostics.has_code("recurring_requires_duration"));
        // recurrence arithmetic is skipped entirely
        assert!(!diagnostics.has_code("schedule_recurrence_exceeds_duration"));
    }

    #[test]
    fn test_explicit_duration_satisfies_recurrence() {
        let diagnostics = run(
            &may_2025(),
            json!({
                "start_date": "2025-06-01",
                "duration_seconds": 2 * 86_400,
                "enable_recurring": true,
                "recurrence_interval": 7,
                "recurrence_unit": "days",
                "end_type": "after_occurrences",
                "occurrence_count": 4,
            }),
        );
        assert!(!diagnostics.has_code("recurring_requires_duration"));
        assert!(!diagnostics.has_critical(), "got {:?}", diagnostics.codes());
    }

    #[test]
    fn test_recurrence_interval_bounds() {
        let diagnostics = run(
            &may_2025(),
            json!({
                "start_date": "2025-06-01",
                "end_date": "2025-06-02",
                "enable_recurring": true,
                "recurrence_interval": 0,
            }),
        );
        assert!(diagnostics.has_code("schedule_invalid_recurrence_interval"));
    }

    #[test]
    fn test_long_recurring_span_via_occurrences() {
        // 52 weekly occurrences span about a year, past the 6-month guardrail
        let diagnostics = run(
            &may_2025(),
            json!({
                "start_date": "2025-06-01",
                "end_date": "2025-06-02",
                "enable_recurring": true,
                "recurrence_interval": 1,
                "recurrence_unit": "weeks",
                "end_type": "after_occurrences",
                "occurrence_count": 52,
            }),
        );
        assert!(diagnostics.has_code("schedule_long_recurring_span"));
        assert!(!diagnostics.has_critical());
    }

    #[test]
    fn test_recurrence_end_date_in_past() {
        let diagnostics = run(
            &may_2025(),
            json!({
                "start_date": "2025-06-01",
                "end_date": "2025-06-02",
                "enable_recurring": true,
                "recurrence_interval": 1,
                "recurrence_unit": "weeks",
                "end_type": "on_date",
                "recurrence_end_date": "2025-01-01",
            }),
        );
        assert!(diagnostics.has_code("schedule_recurrence_end_in_past"));
    }

    #[test]
    fn test_recurrence_end_before_first_cycle() {
        // Campaign ends 2025-06-02; weekly interval 2 puts the first
        // recurrence at 2025-06-16, after the configured end date
        let diagnostics = run(
            &may_2025(),
            json!({
                "start_date": "2025-06-01",
                "end_date": "2025-06-02",
                "enable_recurring": true,
                "recurrence_interval": 2,
                "recurrence_unit": "weeks",
                "recurrence_pattern": "weekly",
                "weekly_days": ["monday"],
                "end_type": "on_date",
                "recurrence_end_date": "2025-06-10",
            }),
        );
        assert!(diagnostics.has_code("schedule_recurrence_end_before_first_cycle"));
    }

    #[test]
    fn test_rotation_interval_bounds() {
        let diagnostics = run(
            &may_2025(),
            json!({
                "start_date": "2025-06-01",
                "end_date": "2025-06-10",
                "enable_rotation": true,
                "rotation_interval": 0,
            }),
        );
        assert!(diagnostics.has_code("schedule_invalid_rotation_interval"));
    }

    #[test]
    fn test_rotation_never_triggers() {
        // 48h rotation inside a 24h campaign
        let diagnostics = run(
            &may_2025(),
            json!({
                "start_date": "2025-06-01",
                "end_date": "2025-06-02",
                "enable_rotation": true,
                "rotation_interval": 48,
            }),
        );
        assert!(diagnostics.has_code("schedule_rotation_never_triggers"));
    }

    #[test]
    fn test_fast_rotation_info() {
        let diagnostics = run(
            &may_2025(),
            json!({
                "start_date": "2025-06-01",
                "end_date": "2025-06-10",
                "enable_rotation": true,
                "rotation_interval": 2,
            }),
        );
        assert!(diagnostics.has_code("schedule_rotation_high_frequency"));
    }

    #[test]
    fn test_rotation_dominates_recurrence() {
        // Daily recurrence (24h) with a 36h rotation interval
        let diagnostics = run(
            &may_2025(),
            json!({
                "start_date": "2025-06-01",
                "end_date": "2025-06-08",
                "enable_recurring": true,
                "recurrence_interval": 1,
                "recurrence_unit": "days",
                "enable_rotation": true,
                "rotation_interval": 36,
            }),
        );
        assert!(diagnostics.has_code("schedule_rotation_exceeds_recurrence"));
    }

    #[test]
    fn test_invalid_timezone() {
        let diagnostics = run(
            &may_2025(),
            json!({
                "start_date": "2025-06-01",
                "end_date": "2025-06-10",
                "timezone": "Middle/Nowhere",
            }),
        );
        assert!(diagnostics.has_code("schedule_invalid_timezone"));
        assert!(diagnostics.has_critical());
    }

    #[test]
    fn test_offset_timezone_accepted() {
        let diagnostics = run(
            &may_2025(),
            json!({
                "start_date": "2025-06-01",
                "end_date": "2025-06-10",
                "timezone": "+05:30",
            }),
        );
        assert!(!diagnostics.has_code("schedule_invalid_timezone"));
    }

    #[test]
    fn test_multiple_dst_transitions_info() {
        // March through November in Berlin crosses both 2025 transitions
        let diagnostics = run(
            &FixedClock::at("2025-01-01 00:00").unwrap(),
            json!({
                "start_date": "2025-03-01",
                "end_date": "2025-11-15",
                "timezone": "Europe/Berlin",
            }),
        );
        assert!(diagnostics.has_code("schedule_multiple_dst_transitions"));
    }

    #[test]
    fn test_weekly_requires_days() {
        let diagnostics = run(
            &may_2025(),
            json!({
                "start_date": "2025-06-01",
                "end_date": "2025-06-02",
                "enable_recurring": true,
                "recurrence_interval": 1,
                "recurrence_unit": "weeks",
                "recurrence_pattern": "weekly",
            }),
        );
        assert!(diagnostics.has_code("schedule_weekly_no_days"));
    }

    #[test]
    fn test_weekly_invalid_day_names() {
        let diagnostics = run(
            &may_2025(),
            json!({
                "start_date": "2025-06-01",
                "end_date": "2025-06-02",
                "enable_recurring": true,
                "recurrence_interval": 1,
                "recurrence_unit": "weeks",
                "recurrence_pattern": "weekly",
                "weekly_days": ["monday", "humpday", "freitag"],
            }),
        );
        let criticals: Vec<_> = diagnostics
            .codes()
            .into_iter()
            .filter(|c| *c == "schedule_weekly_invalid_day")
            .collect();
        assert_eq!(criticals.len(), 2);
    }

    #[test]
    fn test_weekly_all_days_suggests_daily() {
        let diagnostics = run(
            &may_2025(),
            json!({
                "start_date": "2025-06-01",
                "start_time": "09:00",
                "end_date": "2025-06-01",
                "end_time": "18:00",
                "enable_recurring": true,
                "recurrence_interval": 1,
                "recurrence_unit": "weeks",
                "recurrence_pattern": "weekly",
                "weekly_days": [
                    "sunday", "monday", "tuesday", "wednesday",
                    "thursday", "friday", "saturday"
                ],
            }),
        );
        assert!(diagnostics.has_code("schedule_weekly_all_days"));
    }

    #[test]
    fn test_weekly_days_too_close() {
        // 3-day occurrences on Monday and Wednesday: the Mon→Wed gap is 2
        let diagnostics = run(
            &may_2025(),
            json!({
                "start_date": "2025-06-02",
                "end_date": "2025-06-04",
                "enable_recurring": true,
                "recurrence_interval": 1,
                "recurrence_unit": "weeks",
                "recurrence_pattern": "weekly",
                "weekly_days": ["monday", "wednesday"],
            }),
        );
        assert!(diagnostics.has_code("schedule_weekly_days_too_close"));
        assert!(diagnostics.has_critical());
    }

    #[test]
    fn test_weekly_days_far_enough_apart() {
        // 1-day occurrences on Monday and Thursday never overlap
        let diagnostics = run(
            &may_2025(),
            json!({
                "start_date": "2025-06-02",
                "start_time": "09:00",
                "end_date": "2025-06-02",
                "end_time": "18:00",
                "enable_recurring": true,
                "recurrence_interval": 1,
                "recurrence_unit": "weeks",
                "recurrence_pattern": "weekly",
                "weekly_days": ["monday", "thursday"],
            }),
        );
        assert!(!diagnostics.has_code("schedule_weekly_days_too_close"));
    }

    #[test]
    fn test_monthly_day_bounds() {
        let diagnostics = run(
            &may_2025(),
            json!({
                "start_date": "2025-06-01",
                "end_date": "2025-06-02",
                "enable_recurring": true,
                "recurrence_interval": 1,
                "recurrence_unit": "months",
                "recurrence_pattern": "monthly",
                "day_of_month": 32,
            }),
        );
        assert!(diagnostics.has_code("schedule_monthly_invalid_day"));
    }

    #[test]
    fn test_monthly_day_29_and_31_warnings() {
        let base = json!({
            "start_date": "2025-06-01",
            "end_date": "2025-06-02",
            "enable_recurring": true,
            "recurrence_interval": 1,
            "recurrence_unit": "months",
            "recurrence_pattern": "monthly",
        });

        let mut leap = base.clone();
        leap["day_of_month"] = json!(29);
        assert!(run(&may_2025(), leap).has_code("schedule_monthly_day_29"));

        let mut short = base;
        short["day_of_month"] = json!(31);
        assert!(run(&may_2025(), short).has_code("schedule_monthly_day_30_plus"));
    }

    #[test]
    fn test_monthly_end_shift_info() {
        let diagnostics = run(
            &may_2025(),
            json!({
                "start_date": "2025-06-28",
                "end_date": "2025-06-30",
                "enable_recurring": true,
                "recurrence_interval": 1,
                "recurrence_unit": "months",
                "recurrence_pattern": "monthly",
                "day_of_month": 15,
            }),
        );
        assert!(diagnostics.has_code("schedule_monthly_end_shift"));
    }

    #[test]
    fn test_invalid_end_condition() {
        let diagnostics = run(
            &may_2025(),
            json!({
                "start_date": "2025-06-01",
                "end_date": "2025-06-02",
                "end_type": "whenever",
            }),
        );
        assert!(diagnostics.has_code("schedule_invalid_end_condition"));
    }

    #[test]
    fn test_occurrences_without_recurrence() {
        let diagnostics = run(
            &may_2025(),
            json!({
                "start_date": "2025-06-01",
                "end_date": "2025-06-02",
                "end_type": "after_occurrences",
                "occurrence_count": 5,
            }),
        );
        assert!(diagnostics.has_code("schedule_occurrences_without_recurrence"));
    }

    #[test]
    fn test_indefinite_recurrence_warns() {
        let diagnostics = run(
            &may_2025(),
            json!({
                "start_date": "2025-06-01",
                "end_date": "2025-06-02",
                "enable_recurring": true,
                "recurrence_interval": 1,
                "recurrence_unit": "weeks",
                "end_type": "never",
            }),
        );
        assert!(diagnostics.has_code("schedule_indefinite_recurrence"));
    }

    #[test]
    fn test_new_active_campaign_already_running() {
        let diagnostics = run(
            &may_2025(),
            json!({
                "status": "active",
                "start_date": "2025-04-01",
                "end_date": "2025-06-01",
            }),
        );
        assert!(diagnostics.has_code("schedule_already_running"));
    }

    #[test]
    fn test_overflow_guard() {
        // 30-day interval times 200 occurrences is over 16 years
        let diagnostics = run(
            &may_2025(),
            json!({
                "start_date": "2025-06-01",
                "end_date": "2025-06-02",
                "enable_recurring": true,
                "recurrence_interval": 30,
                "recurrence_unit": "days",
                "end_type": "after_occurrences",
                "occurrence_count": 200,
            }),
        );
        assert!(diagnostics.has_code("schedule_span_overflow_risk"));
    }

    #[test]
    fn test_long_duration_info() {
        let diagnostics = run(
            &may_2025(),
            json!({"start_date": "2025-06-01", "end_date": "2025-12-31"}),
        );
        assert!(diagnostics.has_code("schedule_long_duration"));
    }

    #[test]
    fn test_excessive_rotations() {
        // 240h campaign rotating hourly: 240 rotations
        let diagnostics = run(
            &may_2025(),
            json!({
                "start_date": "2025-06-01",
                "end_date": "2025-06-11",
                "enable_rotation": true,
                "rotation_interval": 1,
            }),
        );
        assert!(diagnostics.has_code("schedule_excessive_rotations"));
    }

    #[test]
    fn test_excessive_occurrences() {
        let diagnostics = run(
            &may_2025(),
            json!({
                "start_date": "2025-06-01",
                "end_date": "2025-06-02",
                "enable_recurring": true,
                "recurrence_interval": 1,
                "recurrence_unit": "days",
                "end_type": "after_occurrences",
                "occurrence_count": 600,
            }),
        );
        assert!(diagnostics.has_code("schedule_excessive_occurrences"));
        // also above the configured occurrence maximum
        assert!(diagnostics.has_code("schedule_occurrences_above_maximum"));
    }

    #[test]
    fn test_malformed_payload() {
        let mut diagnostics = DiagnosticsCollector::new();
        validate_schedule(
            &json!({"recurrence_unit": "fortnights"}),
            &may_2025(),
            &ScheduleLimits::default(),
            &mut diagnostics,
        );
        assert!(diagnostics.has_code("schedule_invalid_payload"));
    }
}
