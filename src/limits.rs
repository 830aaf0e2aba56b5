// Configurable validation bounds
//
// Every numeric guardrail in the validators reads from these structs so that
// hosts can tighten or relax limits without code changes.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Bounds applied by the schedule validator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleLimits {
    /// Longest allowed campaign duration in days (critical above)
    pub max_duration_days: i64,

    /// Inclusive bounds for the recurrence interval value
    pub min_recurrence_interval: i64,
    pub max_recurrence_interval: i64,

    /// Soft guardrail on the total span of a recurring campaign, in days.
    /// Exceeding it warns about data staleness but does not block.
    pub max_recurring_span_days: i64,

    /// Inclusive bounds for the occurrence count
    /// Below minimum is critical, above maximum is a warning.
    pub min_occurrences: i64,
    pub max_occurrences: i64,

    /// Occurrence count above which a performance warning fires
    pub performance_max_occurrences: i64,

    /// Inclusive bounds for the rotation interval in hours
    pub min_rotation_hours: i64,
    pub max_rotation_hours: i64,

    /// Rotation intervals shorter than this draw a performance info note
    pub fast_rotation_hours: i64,

    /// Rotations per occurrence above which a performance warning fires
    pub max_rotations_per_occurrence: i64,

    /// End dates further out than this many years draw a warning
    pub far_future_years: i64,

    /// Durations longer than this many days draw a performance info note
    pub long_duration_info_days: i64,

    /// Interval-days total above which date arithmetic overflow is flagged
    pub overflow_guard_days: i64,
}

impl Default for ScheduleLimits {
    fn default() -> Self {
        Self {
            max_duration_days: 365,
            min_recurrence_interval: 1,
            max_recurrence_interval: 365,
            max_recurring_span_days: 183,
            min_occurrences: 1,
            max_occurrences: 365,
            performance_max_occurrences: 500,
            min_rotation_hours: 1,
            max_rotation_hours: 720,
            fast_rotation_hours: 4,
            max_rotations_per_occurrence: 100,
            far_future_years: 10,
            long_duration_info_days: 180,
            overflow_guard_days: 3650,
        }
    }
}

/// Bounds applied by the discount rules validator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscountLimits {
    /// Largest accepted value for any usage limit; 0 means unlimited and is
    /// the supported way to go beyond this
    pub max_usage_limit: u32,

    /// Largest accepted minimum item quantity
    pub max_minimum_quantity: u32,

    /// Largest accepted minimum order amount
    pub max_minimum_order_amount: Decimal,

    /// Largest accepted discount cap
    pub max_discount_cap: Decimal,

    /// Minimum order amounts above this draw only a debug-channel hint
    pub high_minimum_order_hint: Decimal,

    /// Maximum number of tiers or spend thresholds
    pub max_tiers: usize,

    /// Volume discounts start here; the first tier may not require less
    pub min_first_tier_quantity: Decimal,

    /// Largest accepted BOGO buy/get quantity
    pub max_bogo_quantity: i64,

    /// Contrast ratios below this are critical (text nearly invisible)
    pub min_contrast_ratio: f64,

    /// Contrast ratios below this (but above the floor) are advisory
    pub advisory_contrast_ratio: f64,
}

impl Default for DiscountLimits {
    fn default() -> Self {
        Self {
            max_usage_limit: 10_000,
            max_minimum_quantity: 100,
            max_minimum_order_amount: Decimal::from(100_000),
            max_discount_cap: Decimal::from(100_000),
            high_minimum_order_hint: Decimal::from(10_000),
            max_tiers: 20,
            min_first_tier_quantity: Decimal::TWO,
            max_bogo_quantity: 50,
            min_contrast_ratio: 1.5,
            advisory_contrast_ratio: 3.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schedule_limits_defaults_are_consistent() {
        let limits = ScheduleLimits::default();
        assert!(limits.min_recurrence_interval <= limits.max_recurrence_interval);
        assert!(limits.min_occurrences <= limits.max_occurrences);
        assert!(limits.min_rotation_hours <= limits.max_rotation_hours);
        assert!(limits.long_duration_info_days <= limits.max_duration_days);
    }

    #[test]
    fn test_discount_limits_defaults_are_consistent() {
        let limits = DiscountLimits::default();
        assert!(limits.min_contrast_ratio < limits.advisory_contrast_ratio);
        assert!(limits.high_minimum_order_hint <= limits.max_minimum_order_amount);
        assert!(limits.max_tiers > 0);
    }
}
