// Campaign Rules Engine
//
// A data-driven rule engine for discount campaigns. It manages three core
// capabilities:
// - Schedule validation: temporal rules for one-shot, recurring, and
//   rotating campaigns across timezones
// - Discount validation: structural and business rules for every discount
//   type, from usage limits to badge accessibility
// - Discount enforcement: the runtime allow/deny gate evaluated at
//   cart-calculation time, plus the discount cap clamp
//
// Both validators report through an append-only diagnostics collector and
// never fail on expected-invalid input; errors are reserved for malformed
// payloads. All guardrail values are configurable through the limits types.

pub mod clock;
pub mod color;
pub mod diagnostics;
pub mod discount;
pub mod error;
pub mod limits;
pub mod schedule;
pub mod serde_util;
pub mod types;

// Re-export commonly used types for convenience
pub use clock::{Clock, FixedClock, SystemClock, TimezoneSpec};
pub use diagnostics::{Diagnostic, DiagnosticsCollector, Severity};
pub use discount::{
    apply_max_discount_cap, can_apply_discount, validate_discount, AmountFormatter,
    ApplicationContext, Decision, DiscountConfig, DiscountEnforcer, DiscountKind, DiscountValidator,
    PlainFormatter, ProductPricing, UsageCheck, UsageCounterSource,
};
pub use error::{CampaignRulesError, RulesResult};
pub use limits::{DiscountLimits, ScheduleLimits};
pub use schedule::{
    validate_schedule, DateSpec, RecurrenceConfig, RotationConfig, ScheduleConfig,
    ScheduleValidator,
};
pub use types::{
    ApplyTo, BadgePosition, CampaignStatus, DiscountMode, EndCondition, RecurrencePattern,
    RecurrenceUnit,
};

use serde_json::Value;

// Campaign Validator - Orchestrator
//
// Runs both validators over a campaign's wizard payloads and provides the
// save-gate answer in one place.

/// Campaign Validator
///
/// Composes the schedule and discount validators into a single validation
/// run. Every run starts a fresh collector; callers that accumulate across
/// multiple campaigns merge collectors themselves.
pub struct CampaignValidator {
    clock: Box<dyn Clock>,
    schedule_limits: ScheduleLimits,
    discount_limits: DiscountLimits,
}

impl Default for CampaignValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl CampaignValidator {
    /// A validator on the system clock with default limits
    pub fn new() -> Self {
        Self::with_clock(Box::new(SystemClock))
    }

    pub fn with_clock(clock: Box<dyn Clock>) -> Self {
        Self {
            clock,
            schedule_limits: ScheduleLimits::default(),
            discount_limits: DiscountLimits::default(),
        }
    }

    pub fn schedule_limits(mut self, limits: ScheduleLimits) -> Self {
        self.schedule_limits = limits;
        self
    }

    pub fn discount_limits(mut self, limits: DiscountLimits) -> Self {
        self.discount_limits = limits;
        self
    }

    /// Validate a campaign's schedule and discount payloads together.
    ///
    /// Schedule diagnostics always precede discount diagnostics in the
    /// returned collector.
    pub fn validate_campaign(&self, schedule: &Value, discount: &Value) -> DiagnosticsCollector {
        let mut diagnostics = DiagnosticsCollector::new();

        validate_schedule(
            schedule,
            self.clock.as_ref(),
            &self.schedule_limits,
            &mut diagnostics,
        );
        validate_discount(discount, &self.discount_limits, &mut diagnostics);

        tracing::debug!(
            diagnostics = diagnostics.len(),
            critical = diagnostics.has_critical(),
            "campaign validation finished"
        );

        diagnostics
    }

    /// Whether the campaign may be persisted: no critical diagnostics
    pub fn is_saveable(&self, schedule: &Value, discount: &Value) -> bool {
        !self.validate_campaign(schedule, discount).has_critical()
    }
}
