// Discount configuration
//
// `DiscountConfig` is the canonical, typed shape of a discount: a tagged
// union over the discount type plus the fields shared by every type. Wizard
// payloads reach it through one normalization boundary (`from_value`) that
// collapses legacy field names and form-typed values.

pub mod enforcer;
pub mod validator;

pub use enforcer::{
    apply_max_discount_cap, can_apply_discount, AmountFormatter, ApplicationContext, Decision,
    DiscountEnforcer, PlainFormatter, ProductPricing, UsageCheck, UsageCounterSource,
};
pub use validator::{validate_discount, DiscountValidator};

use crate::error::RulesResult;
use crate::serde_util::{lenient_bool, lenient_opt_decimal, lenient_opt_i64, lenient_opt_string};
use crate::types::{ApplyTo, BadgePosition, DiscountMode};
use rust_decimal::Decimal;
use serde::de::{Deserializer, Error as DeError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One step of a stepped discount: a threshold (minimum quantity for tiered,
/// minimum spend for spend-threshold) and the discount granted at it.
///
/// Both fields stay optional so that incomplete wizard rows are reported as
/// diagnostics instead of failing deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierEntry {
    #[serde(
        default,
        alias = "min_quantity",
        alias = "spend_amount",
        alias = "quantity",
        alias = "amount",
        deserialize_with = "lenient_opt_decimal"
    )]
    pub threshold: Option<Decimal>,
    #[serde(
        default,
        alias = "discount_value",
        alias = "discount",
        deserialize_with = "lenient_opt_decimal"
    )]
    pub discount: Option<Decimal>,
}

impl TierEntry {
    pub fn new(threshold: impl Into<Decimal>, discount: impl Into<Decimal>) -> Self {
        Self {
            threshold: Some(threshold.into()),
            discount: Some(discount.into()),
        }
    }
}

/// The discount type and its type-specific settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiscountKind {
    /// Flat percentage off, 0 < value <= 100
    Percentage { value: Option<Decimal> },

    /// Flat amount off, value > 0
    Fixed { value: Option<Decimal> },

    /// Quantity-stepped discount schedule
    Tiered {
        mode: DiscountMode,
        tiers: Vec<TierEntry>,
    },

    /// Spend-stepped discount schedule
    SpendThreshold {
        mode: DiscountMode,
        thresholds: Vec<TierEntry>,
    },

    /// Buy X get Y at a percentage off
    Bogo {
        buy_quantity: Option<i64>,
        get_quantity: Option<i64>,
        discount_percent: Option<Decimal>,
    },

    /// Unrecognized type string from the wizard; always invalid
    Unknown { raw: String },
}

/// Per-campaign usage ceilings; zero means unlimited
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageLimits {
    pub per_customer: u32,
    pub total: u32,
    pub lifetime: u32,
}

/// How the discount combines with other price adjustments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombinationPolicy {
    pub stack_with_others: bool,
    pub allow_coupons: bool,
    pub apply_to_sale_items: bool,
}

impl Default for CombinationPolicy {
    fn default() -> Self {
        Self {
            stack_with_others: false,
            allow_coupons: true,
            apply_to_sale_items: true,
        }
    }
}

/// Storefront badge settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BadgeConfig {
    pub enabled: bool,
    pub text: Option<String>,
    pub bg_color: Option<String>,
    pub text_color: Option<String>,
    pub position: BadgePosition,
}

/// Which shipping methods a free-shipping perk covers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MethodSelection {
    /// Every available method
    All(AllMethods),
    /// An explicit method list
    Selected(Vec<String>),
}

/// Marker deserialized from the literal string `"all"`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllMethods {
    All,
}

impl MethodSelection {
    pub fn all() -> Self {
        MethodSelection::All(AllMethods::All)
    }

    pub fn is_all(&self) -> bool {
        matches!(self, MethodSelection::All(_))
    }
}

impl Default for MethodSelection {
    fn default() -> Self {
        MethodSelection::all()
    }
}

/// Free-shipping perk settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeShipping {
    pub enabled: bool,
    pub methods: MethodSelection,
}

/// Canonical discount configuration, input to the validator and enforcer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscountConfig {
    pub kind: DiscountKind,
    pub apply_to: ApplyTo,
    pub minimum_quantity: Option<i64>,
    pub minimum_order_amount: Option<Decimal>,
    pub max_discount_amount: Option<Decimal>,
    pub usage_limits: UsageLimits,
    pub combination: CombinationPolicy,
    pub badge: Option<BadgeConfig>,
    pub free_shipping: Option<FreeShipping>,
}

impl DiscountConfig {
    /// A configuration of the given kind with every shared field defaulted
    pub fn of_kind(kind: DiscountKind) -> Self {
        Self {
            kind,
            apply_to: ApplyTo::default(),
            minimum_quantity: None,
            minimum_order_amount: None,
            max_discount_amount: None,
            usage_limits: UsageLimits::default(),
            combination: CombinationPolicy::default(),
            badge: None,
            free_shipping: None,
        }
    }

    /// Normalize a raw wizard-step payload into the canonical config
    pub fn from_value(value: &Value) -> RulesResult<Self> {
        let input: DiscountInput = serde_json::from_value(value.clone())?;
        Ok(input.into())
    }
}

fn default_true() -> bool {
    true
}

fn lenient_methods<'de, D>(deserializer: D) -> Result<Option<MethodSelection>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => {
            let lowered = s.trim().to_ascii_lowercase();
            if lowered.is_empty() || lowered == "all" {
                Ok(Some(MethodSelection::all()))
            } else {
                Ok(Some(MethodSelection::Selected(vec![s])))
            }
        }
        Some(Value::Array(items)) => {
            let mut methods = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    Value::String(s) if s.eq_ignore_ascii_case("all") => {
                        return Ok(Some(MethodSelection::all()));
                    }
                    Value::String(s) => methods.push(s),
                    other => {
                        return Err(D::Error::custom(format!(
                            "expected a shipping method name, got {}",
                            other
                        )))
                    }
                }
            }
            Ok(Some(MethodSelection::Selected(methods)))
        }
        Some(other) => Err(D::Error::custom(format!(
            "expected shipping methods, got {}",
            other
        ))),
    }
}

/// Raw wizard-step discount payload with every legacy field name
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DiscountInput {
    #[serde(default, alias = "type", deserialize_with = "lenient_opt_string")]
    pub discount_type: Option<String>,
    #[serde(default, alias = "value", deserialize_with = "lenient_opt_decimal")]
    pub discount_value: Option<Decimal>,
    #[serde(default, alias = "tiered_mode")]
    pub discount_mode: DiscountMode,

    #[serde(default)]
    pub tiers: Vec<TierEntry>,
    #[serde(default, alias = "thresholds")]
    pub spend_thresholds: Vec<TierEntry>,

    #[serde(default, deserialize_with = "lenient_opt_i64")]
    pub buy_quantity: Option<i64>,
    #[serde(default, deserialize_with = "lenient_opt_i64")]
    pub get_quantity: Option<i64>,
    #[serde(default, alias = "bogo_discount", deserialize_with = "lenient_opt_decimal")]
    pub discount_percent: Option<Decimal>,

    #[serde(default)]
    pub apply_to: ApplyTo,
    #[serde(default, deserialize_with = "lenient_opt_i64")]
    pub minimum_quantity: Option<i64>,
    #[serde(
        default,
        alias = "min_order_amount",
        deserialize_with = "lenient_opt_decimal"
    )]
    pub minimum_order_amount: Option<Decimal>,
    #[serde(default, alias = "discount_cap", deserialize_with = "lenient_opt_decimal")]
    pub max_discount_amount: Option<Decimal>,

    #[serde(
        default,
        alias = "per_customer_limit",
        deserialize_with = "lenient_opt_i64"
    )]
    pub usage_limit_per_customer: Option<i64>,
    #[serde(default, alias = "usage_limit", deserialize_with = "lenient_opt_i64")]
    pub total_usage_limit: Option<i64>,
    #[serde(default, alias = "lifetime_limit", deserialize_with = "lenient_opt_i64")]
    pub lifetime_usage_cap: Option<i64>,

    #[serde(default, alias = "stackable", deserialize_with = "lenient_bool")]
    pub stack_with_others: bool,
    #[serde(
        default = "default_true",
        alias = "coupons_allowed",
        deserialize_with = "lenient_bool"
    )]
    pub allow_coupons: bool,
    #[serde(
        default = "default_true",
        alias = "include_sale_items",
        deserialize_with = "lenient_bool"
    )]
    pub apply_to_sale_items: bool,

    #[serde(default, alias = "show_badge", deserialize_with = "lenient_bool")]
    pub badge_enabled: bool,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub badge_text: Option<String>,
    #[serde(
        default,
        alias = "badge_background_color",
        deserialize_with = "lenient_opt_string"
    )]
    pub badge_bg_color: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub badge_text_color: Option<String>,
    #[serde(default)]
    pub badge_position: BadgePosition,

    #[serde(
        default,
        alias = "enable_free_shipping",
        deserialize_with = "lenient_bool"
    )]
    pub free_shipping_enabled: bool,
    #[serde(
        default,
        alias = "shipping_methods",
        deserialize_with = "lenient_methods"
    )]
    pub free_shipping_methods: Option<MethodSelection>,
}

impl From<DiscountInput> for DiscountConfig {
    fn from(input: DiscountInput) -> Self {
        let kind = match input.discount_type.as_deref().unwrap_or("") {
            "percentage" => DiscountKind::Percentage {
                value: input.discount_value,
            },
            "fixed" => DiscountKind::Fixed {
                value: input.discount_value,
            },
            "tiered" => DiscountKind::Tiered {
                mode: input.discount_mode,
                tiers: input.tiers,
            },
            "spend_threshold" | "threshold" => DiscountKind::SpendThreshold {
                mode: input.discount_mode,
                thresholds: input.spend_thresholds,
            },
            "bogo" | "buy_x_get_y" => DiscountKind::Bogo {
                buy_quantity: input.buy_quantity,
                get_quantity: input.get_quantity,
                discount_percent: input.discount_percent,
            },
            other => DiscountKind::Unknown {
                raw: other.to_string(),
            },
        };

        let badge = input.badge_enabled.then(|| BadgeConfig {
            enabled: true,
            text: input.badge_text,
            bg_color: input.badge_bg_color,
            text_color: input.badge_text_color,
            position: input.badge_position,
        });
        let free_shipping = input.free_shipping_enabled.then(|| FreeShipping {
            enabled: true,
            methods: input.free_shipping_methods.unwrap_or_default(),
        });

        // Zero and negative mean unlimited; values beyond u32 saturate,
        // keeping them above the configured maximum.
        let clamp = |value: Option<i64>| {
            value
                .filter(|v| *v > 0)
                .map(|v| u32::try_from(v).unwrap_or(u32::MAX))
                .unwrap_or(0)
        };

        Self {
            kind,
            apply_to: input.apply_to,
            minimum_quantity: input.minimum_quantity,
            minimum_order_amount: input.minimum_order_amount,
            max_discount_amount: input.max_discount_amount,
            usage_limits: UsageLimits {
                per_customer: clamp(input.usage_limit_per_customer),
                total: clamp(input.total_usage_limit),
                lifetime: clamp(input.lifetime_usage_cap),
            },
            combination: CombinationPolicy {
                stack_with_others: input.stack_with_others,
                allow_coupons: input.allow_coupons,
                apply_to_sale_items: input.apply_to_sale_items,
            },
            badge,
            free_shipping,
        }
    }
}
