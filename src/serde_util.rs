// Lenient deserializers for form-shaped wizard payloads
//
// Admin-form values arrive untyped: booleans as "1"/"yes"/"on", numbers as
// strings, empty strings standing in for "not set". These helpers absorb all
// of those shapes at the normalization boundary so the typed configs never
// see them.

use rust_decimal::Decimal;
use serde::de::{Deserializer, Error as DeError};
use serde::Deserialize;
use serde_json::Value;
use std::str::FromStr;

/// Deserialize a boolean from bool, number, or common form strings.
/// Missing handling is the caller's `#[serde(default)]`.
pub fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::Bool(b) => Ok(b),
        Value::Number(n) => Ok(n.as_i64().unwrap_or(0) != 0),
        Value::String(s) => Ok(matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        )),
        Value::Null => Ok(false),
        other => Err(D::Error::custom(format!(
            "expected a boolean-like value, got {}",
            other
        ))),
    }
}

/// Deserialize an optional integer from a number or numeric string.
/// Empty strings and null become `None`.
pub fn lenient_opt_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_i64()
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("integer out of range: {}", n))),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            trimmed
                .parse::<i64>()
                .map(Some)
                .map_err(|_| D::Error::custom(format!("expected an integer, got \"{}\"", s)))
        }
        Some(other) => Err(D::Error::custom(format!(
            "expected an integer, got {}",
            other
        ))),
    }
}

/// Deserialize an optional decimal amount from a number or numeric string.
/// Empty strings and null become `None`.
pub fn lenient_opt_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => Decimal::from_str(&n.to_string())
            .map(Some)
            .map_err(|_| D::Error::custom(format!("amount out of range: {}", n))),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            Decimal::from_str(trimmed)
                .map(Some)
                .map_err(|_| D::Error::custom(format!("expected an amount, got \"{}\"", s)))
        }
        Some(other) => Err(D::Error::custom(format!(
            "expected an amount, got {}",
            other
        ))),
    }
}

/// Deserialize an optional string, mapping empty/whitespace-only to `None`.
pub fn lenient_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "lenient_bool")]
        flag: bool,
        #[serde(default, deserialize_with = "lenient_opt_i64")]
        count: Option<i64>,
        #[serde(default, deserialize_with = "lenient_opt_decimal")]
        amount: Option<Decimal>,
        #[serde(default, deserialize_with = "lenient_opt_string")]
        text: Option<String>,
    }

    #[test]
    fn test_bool_from_form_strings() {
        for truthy in ["\"1\"", "\"true\"", "\"yes\"", "\"on\"", "true", "1"] {
            let probe: Probe =
                serde_json::from_str(&format!("{{\"flag\": {}}}", truthy)).unwrap();
            assert!(probe.flag, "expected {} to be truthy", truthy);
        }
        for falsy in ["\"0\"", "\"no\"", "\"\"", "false", "0", "null"] {
            let probe: Probe =
                serde_json::from_str(&format!("{{\"flag\": {}}}", falsy)).unwrap();
            assert!(!probe.flag, "expected {} to be falsy", falsy);
        }
    }

    #[test]
    fn test_int_from_string() {
        let probe: Probe = serde_json::from_str("{\"count\": \"30\"}").unwrap();
        assert_eq!(probe.count, Some(30));

        let probe: Probe = serde_json::from_str("{\"count\": 7}").unwrap();
        assert_eq!(probe.count, Some(7));

        let probe: Probe = serde_json::from_str("{\"count\": \"\"}").unwrap();
        assert_eq!(probe.count, None);

        assert!(serde_json::from_str::<Probe>("{\"count\": \"lots\"}").is_err());
    }

    #[test]
    fn test_decimal_from_string() {
        let probe: Probe = serde_json::from_str("{\"amount\": \"49.99\"}").unwrap();
        assert_eq!(probe.amount, Some(Decimal::new(4999, 2)));

        let probe: Probe = serde_json::from_str("{\"amount\": 10}").unwrap();
        assert_eq!(probe.amount, Some(Decimal::from(10)));
    }

    #[test]
    fn test_empty_string_is_none() {
        let probe: Probe = serde_json::from_str("{\"text\": \"  \"}").unwrap();
        assert_eq!(probe.text, None);

        let probe: Probe = serde_json::from_str("{\"text\": \"SUMMER\"}").unwrap();
        assert_eq!(probe.text, Some("SUMMER".to_string()));
    }
}
