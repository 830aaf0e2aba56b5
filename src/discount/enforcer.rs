// Discount rules enforcer
//
// Runtime gate evaluated once per discount-application attempt against a
// cart/product context. Checks run as an ordered short-circuit chain; the
// first failing check denies with an end-user reason and stops. Reasons are
// checkout copy, deliberately less granular than validator diagnostic codes.
//
// The enforcer only reads usage counters. Atomic increment-and-check under
// concurrent checkouts is the responsibility of the counter store.

use crate::discount::DiscountConfig;
use crate::serde_util::{lenient_bool, lenient_opt_decimal, lenient_opt_i64};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Outcome of one application attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Decision {
    pub allowed: bool,
    pub reason: Option<String>,
}

impl Decision {
    pub fn allow() -> Self {
        Self {
            allowed: true,
            reason: None,
        }
    }

    pub fn deny(reason: impl Into<String>) -> Self {
        Self {
            allowed: false,
            reason: Some(reason.into()),
        }
    }
}

/// Pricing fields of the product a discount is being applied to
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ProductPricing {
    #[serde(default, deserialize_with = "lenient_opt_decimal")]
    pub regular_price: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_opt_decimal")]
    pub sale_price: Option<Decimal>,
}

impl ProductPricing {
    /// A sale price below the regular price (or with no regular price at
    /// all) marks the product as on sale.
    pub fn is_on_sale(&self) -> bool {
        match (self.sale_price, self.regular_price) {
            (Some(sale), Some(regular)) => sale < regular,
            (Some(_), None) => true,
            (None, _) => false,
        }
    }
}

/// Cart/product context for one application attempt
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApplicationContext {
    #[serde(default, alias = "total", deserialize_with = "lenient_opt_decimal")]
    pub cart_total: Option<Decimal>,
    #[serde(default, alias = "item_count", deserialize_with = "lenient_opt_i64")]
    pub quantity: Option<i64>,
    #[serde(default, alias = "is_on_sale", deserialize_with = "lenient_bool")]
    pub on_sale: bool,
    #[serde(default)]
    pub product: Option<ProductPricing>,
}

impl ApplicationContext {
    pub fn from_value(value: &serde_json::Value) -> crate::error::RulesResult<Self> {
        Ok(serde_json::from_value(value.clone())?)
    }

    /// Directly flagged on sale, or derived from the product's prices
    pub fn is_on_sale(&self) -> bool {
        self.on_sale || self.product.map_or(false, |p| p.is_on_sale())
    }
}

/// Result of the usage source's per-customer check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageCheck {
    pub valid: bool,
    pub error: Option<String>,
}

impl UsageCheck {
    pub fn ok() -> Self {
        Self {
            valid: true,
            error: None,
        }
    }

    pub fn exceeded(error: impl Into<String>) -> Self {
        Self {
            valid: false,
            error: Some(error.into()),
        }
    }
}

/// Read-only view of per-campaign usage counters, supplied by the host
pub trait UsageCounterSource {
    fn validate_customer_usage(&self, campaign_id: Uuid, max_uses_per_customer: u32) -> UsageCheck;
    fn get_total_usage(&self, campaign_id: Uuid) -> u64;
    fn get_lifetime_usage(&self, campaign_id: Uuid) -> u64;
}

/// Formats amounts inside denial reasons; never used for business logic
pub trait AmountFormatter {
    fn format_amount(&self, amount: Decimal) -> String;
}

/// Default formatter: two decimal places, no currency symbol
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainFormatter;

impl AmountFormatter for PlainFormatter {
    fn format_amount(&self, amount: Decimal) -> String {
        amount.round_dp(2).to_string()
    }
}

/// Discount rules enforcer
pub struct DiscountEnforcer<'a> {
    usage: Option<&'a dyn UsageCounterSource>,
    formatter: &'a dyn AmountFormatter,
}

impl Default for DiscountEnforcer<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> DiscountEnforcer<'a> {
    pub fn new() -> Self {
        Self {
            usage: None,
            formatter: &PlainFormatter,
        }
    }

    pub fn with_usage_source(mut self, source: &'a dyn UsageCounterSource) -> Self {
        self.usage = Some(source);
        self
    }

    pub fn with_formatter(mut self, formatter: &'a dyn AmountFormatter) -> Self {
        self.formatter = formatter;
        self
    }

    /// Run the short-circuit chain: minimum order, minimum quantity,
    /// sale-item eligibility, then usage limits when a campaign id and a
    /// usage source are both present.
    pub fn can_apply(
        &self,
        config: &DiscountConfig,
        context: &ApplicationContext,
        campaign_id: Option<Uuid>,
    ) -> Decision {
        if let Some(minimum) = config.minimum_order_amount.filter(|m| *m > Decimal::ZERO) {
            let cart_total = context.cart_total.unwrap_or(Decimal::ZERO);
            if cart_total < minimum {
                return self.denied(format!(
                    "A minimum order of {} is required for this discount.",
                    self.formatter.format_amount(minimum)
                ));
            }
        }

        if let Some(minimum) = config.minimum_quantity.filter(|q| *q > 0) {
            let quantity = context.quantity.unwrap_or(0);
            if quantity < minimum {
                let noun = if minimum == 1 { "item" } else { "items" };
                return self.denied(format!(
                    "A minimum of {} {} is required for this discount.",
                    minimum, noun
                ));
            }
        }

        if !config.combination.apply_to_sale_items && context.is_on_sale() {
            return self.denied("This discount cannot be applied to sale items.");
        }

        if let (Some(id), Some(source)) = (campaign_id, self.usage) {
            let limits = config.usage_limits;

            if limits.per_customer > 0 {
                let check = source.validate_customer_usage(id, limits.per_customer);
                if !check.valid {
                    return self.denied(check.error.unwrap_or_else(|| {
                        "You have reached the usage limit for this discount.".to_string()
                    }));
                }
            }
            if limits.total > 0 && source.get_total_usage(id) >= u64::from(limits.total) {
                return self.denied("This discount has reached its usage limit.");
            }
            if limits.lifetime > 0 && source.get_lifetime_usage(id) >= u64::from(limits.lifetime) {
                return self.denied("This discount is no longer available.");
            }
        }

        Decision::allow()
    }

    fn denied(&self, reason: impl Into<String>) -> Decision {
        let decision = Decision::deny(reason);
        if let Some(reason) = decision.reason.as_deref() {
            tracing::debug!(reason, "discount application denied");
        }
        decision
    }
}

/// Map-level enforcement entry point for hosts holding raw payloads
pub fn can_apply_discount(
    rules: &serde_json::Value,
    context: &serde_json::Value,
    campaign_id: Option<Uuid>,
) -> Decision {
    let config = match DiscountConfig::from_value(rules) {
        Ok(config) => config,
        Err(e) => {
            tracing::debug!(error = %e, "discount rules payload failed to deserialize");
            return Decision::deny("This discount is not configured correctly.");
        }
    };
    let context = match ApplicationContext::from_value(context) {
        Ok(context) => context,
        Err(e) => {
            tracing::debug!(error = %e, "application context failed to deserialize");
            return Decision::deny("The cart could not be checked for this discount.");
        }
    };
    DiscountEnforcer::new().can_apply(&config, &context, campaign_id)
}

/// Clamp a computed discount amount to the configured cap.
///
/// A missing or non-positive cap leaves the amount unchanged.
pub fn apply_max_discount_cap(amount: Decimal, config: &DiscountConfig) -> Decimal {
    match config.max_discount_amount {
        Some(cap) if cap > Decimal::ZERO => amount.min(cap),
        _ => amount,
    }
}
