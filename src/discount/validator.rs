// Discount rules validator
//
// Pure function over a discount configuration, producing diagnostics. Rule
// groups run in a fixed order: usage limits, application constraints,
// type-specific structure, badge accessibility, combination policy,
// cross-field interactions, free shipping. Benign-but-unusual combinations
// are logged to the debug channel only and never surface as diagnostics.

use crate::color;
use crate::diagnostics::DiagnosticsCollector;
use crate::discount::{DiscountConfig, DiscountKind, TierEntry};
use crate::limits::DiscountLimits;
use crate::types::{ApplyTo, DiscountMode};
use rust_decimal::Decimal;
use serde_json::Value;
use std::collections::HashSet;

/// Validate a raw wizard-step discount payload, appending to the collector
pub fn validate_discount(
    value: &Value,
    limits: &DiscountLimits,
    diagnostics: &mut DiagnosticsCollector,
) {
    match DiscountConfig::from_value(value) {
        Ok(config) => DiscountValidator::new(limits).validate(&config, diagnostics),
        Err(e) => {
            tracing::debug!(error = %e, "discount payload failed to deserialize");
            diagnostics.critical(
                "discount_invalid_payload",
                format!("The discount settings could not be read: {}", e),
            );
        }
    }
}

/// Code prefix and nouns for the shared tiered/spend-threshold routine
struct SteppedKind {
    prefix: &'static str,
    entry: &'static str,
    noun: &'static str,
    plural: &'static str,
}

const TIERED: SteppedKind = SteppedKind {
    prefix: "tiered",
    entry: "tier",
    noun: "tier",
    plural: "tiers",
};

const THRESHOLD: SteppedKind = SteppedKind {
    prefix: "threshold",
    entry: "threshold",
    noun: "spend threshold",
    plural: "thresholds",
};

/// Discount rules validator
pub struct DiscountValidator<'a> {
    limits: &'a DiscountLimits,
}

impl<'a> DiscountValidator<'a> {
    pub fn new(limits: &'a DiscountLimits) -> Self {
        Self { limits }
    }

    /// Run every applicable rule group, appending diagnostics in group order
    pub fn validate(&self, config: &DiscountConfig, diagnostics: &mut DiagnosticsCollector) {
        self.check_usage_limits(config, diagnostics);
        self.check_application(config, diagnostics);
        self.check_type(config, diagnostics);
        self.check_badge(config, diagnostics);
        self.check_combination(config, diagnostics);
        self.check_cross_field(config, diagnostics);
        self.check_free_shipping(config, diagnostics);
    }

    fn check_usage_limits(&self, config: &DiscountConfig, diagnostics: &mut DiagnosticsCollector) {
        let limits = config.usage_limits;

        if limits.per_customer > 0 && limits.total > 0 && limits.per_customer > limits.total {
            diagnostics.critical(
                "usage_customer_exceeds_total",
                "The per-customer limit is higher than the total limit, so no customer \
                 could ever reach it.",
            );
        }

        if limits.lifetime > 0 && limits.total > 0 && limits.lifetime < limits.total {
            diagnostics.critical(
                "usage_lifetime_below_total",
                "The lifetime cap is below the per-cycle total limit and would be \
                 exhausted in the first cycle.",
            );
        }

        for (name, value) in [
            ("per-customer", limits.per_customer),
            ("total", limits.total),
            ("lifetime", limits.lifetime),
        ] {
            if value > self.limits.max_usage_limit {
                diagnostics.critical(
                    "usage_limit_too_high",
                    format!(
                        "The {} usage limit exceeds {}; use 0 for unlimited instead.",
                        name, self.limits.max_usage_limit
                    ),
                );
            }
        }

        // Unusual but valid; debug channel only.
        if limits.per_customer > 0 && limits.total == 0 && limits.lifetime == 0 {
            tracing::debug!(per_customer = limits.per_customer, "only a per-customer usage limit is set");
        }
        if limits.per_customer == 0 && limits.total > 0 {
            tracing::debug!(total = limits.total, "total usage limit without a per-customer limit");
        }
        if limits.per_customer > 0
            && limits.per_customer == limits.total
            && limits.total == limits.lifetime
        {
            tracing::debug!(limit = limits.per_customer, "all three usage limits are identical");
        }
    }

    fn check_application(&self, config: &DiscountConfig, diagnostics: &mut DiagnosticsCollector) {
        if config.apply_to == ApplyTo::CartTotal {
            if let (Some(cap), Some(minimum)) =
                (config.max_discount_amount, config.minimum_order_amount)
            {
                if cap > Decimal::ZERO && minimum > Decimal::ZERO && cap >= minimum {
                    diagnostics.critical(
                        "application_cap_exceeds_minimum_order",
                        "The discount cap is at least the minimum order amount and could \
                         reduce a qualifying cart to zero.",
                    );
                }
            }
        }

        if let Some(quantity) = config.minimum_quantity {
            if quantity > i64::from(self.limits.max_minimum_quantity) {
                diagnostics.critical(
                    "application_min_quantity_too_high",
                    format!(
                        "The minimum quantity exceeds {}.",
                        self.limits.max_minimum_quantity
                    ),
                );
            }
        }

        if let Some(minimum) = config.minimum_order_amount {
            if minimum > self.limits.max_minimum_order_amount {
                diagnostics.critical(
                    "application_min_order_too_high",
                    format!(
                        "The minimum order amount exceeds {}; contact support for higher limits.",
                        self.limits.max_minimum_order_amount
                    ),
                );
            } else if minimum > self.limits.high_minimum_order_hint {
                tracing::debug!(%minimum, "unusually high minimum order amount");
            }
        }

        if let Some(cap) = config.max_discount_amount {
            if cap > self.limits.max_discount_cap {
                diagnostics.critical(
                    "application_cap_too_high",
                    format!(
                        "The maximum discount amount exceeds {}; contact support for higher limits.",
                        self.limits.max_discount_cap
                    ),
                );
            }
        }

        if config.minimum_quantity.is_some() && config.minimum_order_amount.is_some() {
            tracing::debug!("both a minimum quantity and a minimum order amount are set");
        }
    }

    fn check_type(&self, config: &DiscountConfig, diagnostics: &mut DiagnosticsCollector) {
        match &config.kind {
            DiscountKind::Unknown { raw } => {
                let message = if raw.is_empty() {
                    "No discount type is selected.".to_string()
                } else {
                    format!("\"{}\" is not a known discount type.", raw)
                };
                diagnostics.critical("discount_unknown_type", message);
            }
            DiscountKind::Percentage { value } => {
                let valid = value
                    .map(|v| v > Decimal::ZERO && v <= Decimal::ONE_HUNDRED)
                    .unwrap_or(false);
                if !valid {
                    diagnostics.critical(
                        "percentage_out_of_range",
                        "A percentage discount needs a value above 0 and at most 100.",
                    );
                }
            }
            DiscountKind::Fixed { value } => {
                if !value.map(|v| v > Decimal::ZERO).unwrap_or(false) {
                    diagnostics.critical(
                        "fixed_invalid_value",
                        "A fixed discount needs a value above 0.",
                    );
                }
            }
            DiscountKind::Bogo {
                buy_quantity,
                get_quantity,
                discount_percent,
            } => self.check_bogo(*buy_quantity, *get_quantity, *discount_percent, diagnostics),
            DiscountKind::Tiered { mode, tiers } => {
                self.check_stepped(&TIERED, *mode, tiers, config, diagnostics);
            }
            DiscountKind::SpendThreshold { mode, thresholds } => {
                self.check_stepped(&THRESHOLD, *mode, thresholds, config, diagnostics);
            }
        }
    }

    fn check_bogo(
        &self,
        buy_quantity: Option<i64>,
        get_quantity: Option<i64>,
        discount_percent: Option<Decimal>,
        diagnostics: &mut DiagnosticsCollector,
    ) {
        let buy = buy_quantity.unwrap_or(0);
        let get = get_quantity.unwrap_or(0);

        if buy < 1 {
            diagnostics.critical(
                "bogo_invalid_buy_quantity",
                "The buy quantity must be at least 1.",
            );
        }
        if get < 1 {
            diagnostics.critical(
                "bogo_invalid_get_quantity",
                "The get quantity must be at least 1.",
            );
        }
        for (name, value) in [("buy", buy), ("get", get)] {
            if value > self.limits.max_bogo_quantity {
                diagnostics.critical(
                    "bogo_quantity_too_high",
                    format!(
                        "The {} quantity exceeds {}.",
                        name, self.limits.max_bogo_quantity
                    ),
                );
            }
        }

        let percent_valid = discount_percent
            .map(|p| p >= Decimal::ONE && p <= Decimal::ONE_HUNDRED)
            .unwrap_or(false);
        if !percent_valid {
            diagnostics.critical(
                "bogo_invalid_discount",
                "The get-item discount must be between 1 and 100 percent.",
            );
        }
    }

    /// Shared structural validation for tiered and spend-threshold schedules
    fn check_stepped(
        &self,
        kind: &SteppedKind,
        mode: DiscountMode,
        entries: &[TierEntry],
        config: &DiscountConfig,
        diagnostics: &mut DiagnosticsCollector,
    ) {
        if entries.is_empty() {
            diagnostics.critical(
                format!("{}_no_{}", kind.prefix, kind.plural),
                format!("At least one {} is required.", kind.noun),
            );
            return;
        }

        if entries.len() > self.limits.max_tiers {
            diagnostics.critical(
                format!("{}_too_many_{}", kind.prefix, kind.plural),
                format!(
                    "More than {} {} degrades checkout performance.",
                    self.limits.max_tiers, kind.plural
                ),
            );
        }

        for (index, entry) in entries.iter().enumerate() {
            if entry.threshold.is_none() || entry.discount.is_none() {
                diagnostics.critical(
                    format!("{}_incomplete_{}", kind.prefix, kind.entry),
                    format!(
                        "Entry {} is missing its threshold or discount value.",
                        index + 1
                    ),
                );
            }
        }

        let complete: Vec<(usize, Decimal, Decimal)> = entries
            .iter()
            .enumerate()
            .filter_map(|(index, entry)| Some((index, entry.threshold?, entry.discount?)))
            .collect();

        for window in complete.windows(2) {
            let (_, previous, _) = window[0];
            let (index, current, _) = window[1];
            if current <= previous {
                diagnostics.critical(
                    format!("{}_not_ascending", kind.prefix),
                    format!(
                        "Entry {} does not increase on the previous {}.",
                        index + 1,
                        kind.noun
                    ),
                );
            }
        }

        let mut seen = HashSet::new();
        let mut reported = HashSet::new();
        for (_, threshold, _) in &complete {
            if !seen.insert(*threshold) && reported.insert(*threshold) {
                diagnostics.critical(
                    format!("{}_duplicate_threshold", kind.prefix),
                    format!("The value {} appears more than once.", threshold),
                );
            }
        }

        match mode {
            DiscountMode::Fixed => {
                for (index, threshold, discount) in &complete {
                    if discount >= threshold {
                        diagnostics.critical(
                            format!("{}_fixed_exceeds_threshold", kind.prefix),
                            format!(
                                "Entry {}: a flat discount of {} is not below its threshold of {}.",
                                index + 1,
                                discount,
                                threshold
                            ),
                        );
                    }
                }
            }
            DiscountMode::Percentage => {
                for (index, _, discount) in &complete {
                    if *discount < Decimal::ZERO || *discount > Decimal::ONE_HUNDRED {
                        diagnostics.critical(
                            format!("{}_invalid_percentage", kind.prefix),
                            format!("Entry {}: percentage must be between 0 and 100.", index + 1),
                        );
                    }
                }
            }
        }

        if let Some((_, first_threshold, _)) = complete.first() {
            if kind.prefix == TIERED.prefix {
                if *first_threshold < self.limits.min_first_tier_quantity {
                    diagnostics.critical(
                        "tiered_first_tier_below_minimum",
                        format!(
                            "Volume discounts start at {} items; use a percentage or fixed \
                             discount for single items.",
                            self.limits.min_first_tier_quantity
                        ),
                    );
                }
            } else if let Some(minimum) = config.minimum_order_amount {
                if *first_threshold < minimum {
                    diagnostics.critical(
                        "threshold_below_minimum_order",
                        "The first spend threshold is below the minimum order amount and \
                         could never be reached.",
                    );
                }
            }
        }

        // Later steps granting less than earlier ones is legal, just odd.
        let descending = complete
            .windows(2)
            .any(|window| window[1].2 < window[0].2);
        if descending {
            diagnostics.info(
                format!("{}_discounts_not_ascending", kind.prefix),
                format!(
                    "A later {} grants a smaller discount than an earlier one.",
                    kind.noun
                ),
            );
        }
    }

    fn check_badge(&self, config: &DiscountConfig, diagnostics: &mut DiagnosticsCollector) {
        let Some(badge) = config.badge.as_ref().filter(|b| b.enabled) else {
            return;
        };

        if badge.text.as_deref().map_or(true, |t| t.trim().is_empty()) {
            diagnostics.critical("badge_empty_text", "The badge has no text.");
        }

        let bg = badge.bg_color.as_deref().unwrap_or("");
        let text = badge.text_color.as_deref().unwrap_or("");
        let bg_valid = color::is_valid_hex(bg);
        let text_valid = color::is_valid_hex(text);

        if !bg_valid {
            diagnostics.critical(
                "badge_invalid_bg_color",
                format!("\"{}\" is not a #RRGGBB background color.", bg),
            );
        }
        if !text_valid {
            diagnostics.critical(
                "badge_invalid_text_color",
                format!("\"{}\" is not a #RRGGBB text color.", text),
            );
        }
        if !bg_valid || !text_valid {
            return;
        }

        if bg.eq_ignore_ascii_case(text) {
            diagnostics.critical(
                "badge_identical_colors",
                "The badge text and background colors are identical; the text is invisible.",
            );
            return;
        }

        let Ok(ratio) = color::contrast_ratio_hex(bg, text) else {
            return;
        };
        if ratio < self.limits.min_contrast_ratio {
            diagnostics.critical(
                "badge_extremely_low_contrast",
                format!(
                    "Contrast ratio {:.2}:1 makes the badge text nearly invisible.",
                    ratio
                ),
            );
        } else if ratio < self.limits.advisory_contrast_ratio {
            diagnostics.warning(
                "badge_low_contrast",
                format!(
                    "Contrast ratio {:.2}:1 is below the recommended {:.1}:1.",
                    ratio, self.limits.advisory_contrast_ratio
                ),
            );
        }
    }

    fn check_combination(&self, config: &DiscountConfig, diagnostics: &mut DiagnosticsCollector) {
        let policy = config.combination;

        if !policy.stack_with_others && policy.allow_coupons {
            diagnostics.info(
                "combination_no_stack_with_coupons",
                "Coupons are allowed although the discount does not stack with other \
                 discounts; coupons will still combine.",
            );
        }
        if policy.stack_with_others && policy.apply_to_sale_items {
            diagnostics.info(
                "combination_stacking_sale_items",
                "Stacking on top of sale prices can compound discounts heavily.",
            );
        }
    }

    fn check_cross_field(&self, config: &DiscountConfig, diagnostics: &mut DiagnosticsCollector) {
        match &config.kind {
            DiscountKind::Bogo { .. } if config.apply_to == ApplyTo::CartTotal => {
                diagnostics.critical(
                    "cross_bogo_cart_total",
                    "Buy-X-get-Y is inherently item-based and cannot apply to the cart total.",
                );
            }
            DiscountKind::Tiered { .. } if config.apply_to == ApplyTo::PerItem => {
                diagnostics.info(
                    "cross_tiered_per_item",
                    "Quantity tiers applied per item re-evaluate for every line; confirm \
                     this is intended.",
                );
            }
            DiscountKind::SpendThreshold { .. }
                if config.minimum_quantity.map_or(false, |q| q > 0) =>
            {
                diagnostics.info(
                    "cross_threshold_minimum_quantity",
                    "A spend-threshold discount with a minimum quantity gates twice; \
                     shoppers may find it confusing.",
                );
            }
            DiscountKind::Fixed { .. }
                if config.apply_to == ApplyTo::CartTotal
                    && config.max_discount_amount.is_none() =>
            {
                diagnostics.info(
                    "cross_fixed_cart_no_cap",
                    "A fixed cart discount with no cap applies in full to every qualifying cart.",
                );
            }
            _ => {}
        }

        let policy = config.combination;
        if !policy.stack_with_others && !policy.allow_coupons && !policy.apply_to_sale_items {
            diagnostics.info(
                "cross_all_combinations_disabled",
                "Every combination option is disabled; this discount excludes carts with \
                 any other promotion.",
            );
        }
    }

    fn check_free_shipping(&self, config: &DiscountConfig, diagnostics: &mut DiagnosticsCollector) {
        let Some(shipping) = config.free_shipping.as_ref().filter(|s| s.enabled) else {
            return;
        };
        if let crate::discount::MethodSelection::Selected(methods) = &shipping.methods {
            if methods.is_empty() {
                diagnostics.critical(
                    "shipping_no_methods",
                    "Free shipping is limited to specific methods but none are selected.",
                );
            }
        }
    }
}
