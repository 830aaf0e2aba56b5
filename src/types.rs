// Domain type definitions shared across the validators and the enforcer

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a campaign configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CampaignStatus {
    /// Being edited in the wizard, never published
    #[default]
    Draft,

    /// Saved and waiting for its start instant
    Scheduled,

    /// Currently running
    Active,

    /// Manually suspended
    Paused,

    /// Past its end instant
    Expired,
}

impl fmt::Display for CampaignStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CampaignStatus::Draft => write!(f, "draft"),
            CampaignStatus::Scheduled => write!(f, "scheduled"),
            CampaignStatus::Active => write!(f, "active"),
            CampaignStatus::Paused => write!(f, "paused"),
            CampaignStatus::Expired => write!(f, "expired"),
        }
    }
}

impl std::str::FromStr for CampaignStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(CampaignStatus::Draft),
            "scheduled" => Ok(CampaignStatus::Scheduled),
            "active" => Ok(CampaignStatus::Active),
            "paused" => Ok(CampaignStatus::Paused),
            "expired" => Ok(CampaignStatus::Expired),
            _ => Err(format!("Invalid campaign status: {}", s)),
        }
    }
}

/// How a tiered or spend-threshold discount value is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DiscountMode {
    /// Discount value is a percentage of the price (e.g. 10 = 10% off)
    #[default]
    Percentage,

    /// Discount value is a flat amount in the store currency
    Fixed,
}

impl fmt::Display for DiscountMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiscountMode::Percentage => write!(f, "percentage"),
            DiscountMode::Fixed => write!(f, "fixed"),
        }
    }
}

/// What a discount applies against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ApplyTo {
    /// Each qualifying line item individually
    #[default]
    PerItem,

    /// The cart total
    CartTotal,
}

impl fmt::Display for ApplyTo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApplyTo::PerItem => write!(f, "per_item"),
            ApplyTo::CartTotal => write!(f, "cart_total"),
        }
    }
}

/// Unit of the recurrence interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RecurrenceUnit {
    Hours,
    #[default]
    Days,
    Weeks,
    /// Approximated as 30 days for cycle arithmetic
    Months,
}

impl RecurrenceUnit {
    /// Seconds in one unit (months approximated as 30 days)
    pub fn seconds(self) -> i64 {
        match self {
            RecurrenceUnit::Hours => 3_600,
            RecurrenceUnit::Days => 86_400,
            RecurrenceUnit::Weeks => 604_800,
            RecurrenceUnit::Months => 30 * 86_400,
        }
    }
}

impl fmt::Display for RecurrenceUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecurrenceUnit::Hours => write!(f, "hours"),
            RecurrenceUnit::Days => write!(f, "days"),
            RecurrenceUnit::Weeks => write!(f, "weeks"),
            RecurrenceUnit::Months => write!(f, "months"),
        }
    }
}

/// Shape of the recurrence pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RecurrencePattern {
    #[default]
    Daily,
    /// Restricted to a set of weekdays
    Weekly,
    /// Anchored to a day of the month
    Monthly,
}

impl fmt::Display for RecurrencePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecurrencePattern::Daily => write!(f, "daily"),
            RecurrencePattern::Weekly => write!(f, "weekly"),
            RecurrencePattern::Monthly => write!(f, "monthly"),
        }
    }
}

/// How a recurring campaign stops
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EndCondition {
    /// Runs until manually stopped
    #[default]
    Never,

    /// Stops on an explicit end date
    OnDate,

    /// Stops after a fixed number of occurrences
    AfterOccurrences,
}

impl fmt::Display for EndCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EndCondition::Never => write!(f, "never"),
            EndCondition::OnDate => write!(f, "on_date"),
            EndCondition::AfterOccurrences => write!(f, "after_occurrences"),
        }
    }
}

impl std::str::FromStr for EndCondition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "never" => Ok(EndCondition::Never),
            "on_date" => Ok(EndCondition::OnDate),
            "after_occurrences" => Ok(EndCondition::AfterOccurrences),
            _ => Err(format!("Invalid end condition: {}", s)),
        }
    }
}

/// Where a discount badge renders on the product card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BadgePosition {
    #[default]
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl fmt::Display for BadgePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BadgePosition::TopLeft => write!(f, "top_left"),
            BadgePosition::TopRight => write!(f, "top_right"),
            BadgePosition::BottomLeft => write!(f, "bottom_left"),
            BadgePosition::BottomRight => write!(f, "bottom_right"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_campaign_status_round_trip() {
        for status in [
            CampaignStatus::Draft,
            CampaignStatus::Scheduled,
            CampaignStatus::Active,
            CampaignStatus::Paused,
            CampaignStatus::Expired,
        ] {
            assert_eq!(CampaignStatus::from_str(&status.to_string()).unwrap(), status);
        }
        assert!(CampaignStatus::from_str("running").is_err());
    }

    #[test]
    fn test_recurrence_unit_seconds() {
        assert_eq!(RecurrenceUnit::Hours.seconds(), 3_600);
        assert_eq!(RecurrenceUnit::Days.seconds(), 86_400);
        assert_eq!(RecurrenceUnit::Weeks.seconds(), 7 * 86_400);
        assert_eq!(RecurrenceUnit::Months.seconds(), 30 * 86_400);
    }

    #[test]
    fn test_end_condition_from_str() {
        assert_eq!(EndCondition::from_str("never").unwrap(), EndCondition::Never);
        assert_eq!(EndCondition::from_str("on_date").unwrap(), EndCondition::OnDate);
        assert_eq!(
            EndCondition::from_str("after_occurrences").unwrap(),
            EndCondition::AfterOccurrences
        );
        assert!(EndCondition::from_str("sometime").is_err());
    }

    #[test]
    fn test_serialization() {
        let mode = DiscountMode::Percentage;
        assert_eq!(serde_json::to_string(&mode).unwrap(), "\"percentage\"");

        let apply: ApplyTo = serde_json::from_str("\"cart_total\"").unwrap();
        assert_eq!(apply, ApplyTo::CartTotal);

        let pattern: RecurrencePattern = serde_json::from_str("\"weekly\"").unwrap();
        assert_eq!(pattern, RecurrencePattern::Weekly);
    }

    #[test]
    fn test_defaults() {
        assert_eq!(ApplyTo::default(), ApplyTo::PerItem);
        assert_eq!(RecurrenceUnit::default(), RecurrenceUnit::Days);
        assert_eq!(EndCondition::default(), EndCondition::Never);
        assert_eq!(CampaignStatus::default(), CampaignStatus::Draft);
    }
}
