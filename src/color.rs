// WCAG colorimetry utility
//
// Shared by the discount validator's badge accessibility checks. Implements
// the WCAG 2.x relative-luminance and contrast-ratio formulas over strict
// `#RRGGBB` hex colors.

use crate::error::{CampaignRulesError, RulesResult};
use regex::Regex;
use std::sync::OnceLock;

/// Strict 6-digit hex color pattern, e.g. `#ff8800`
pub fn hex_color_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^#[0-9a-fA-F]{6}$").expect("valid hex color pattern"))
}

/// True when the string is a strict `#RRGGBB` color
pub fn is_valid_hex(color: &str) -> bool {
    hex_color_pattern().is_match(color)
}

/// An 8-bit-per-channel sRGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Parse a strict `#RRGGBB` string
pub fn parse_hex(color: &str) -> RulesResult<Rgb> {
    if !is_valid_hex(color) {
        return Err(CampaignRulesError::InvalidColor(color.to_string()));
    }
    let parse = |range| {
        u8::from_str_radix(&color[range], 16)
            .map_err(|_| CampaignRulesError::InvalidColor(color.to_string()))
    };
    Ok(Rgb {
        r: parse(1..3)?,
        g: parse(3..5)?,
        b: parse(5..7)?,
    })
}

/// Linearize one sRGB channel per the WCAG formula
fn linearize(channel: u8) -> f64 {
    let c = f64::from(channel) / 255.0;
    if c <= 0.03928 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// WCAG relative luminance of a color, in [0, 1]
pub fn relative_luminance(color: Rgb) -> f64 {
    0.2126 * linearize(color.r) + 0.7152 * linearize(color.g) + 0.0722 * linearize(color.b)
}

/// WCAG contrast ratio between two colors, in [1, 21]
///
/// Symmetric in its arguments; identical colors yield exactly 1.0.
pub fn contrast_ratio(a: Rgb, b: Rgb) -> f64 {
    let la = relative_luminance(a);
    let lb = relative_luminance(b);
    let (lighter, darker) = if la >= lb { (la, lb) } else { (lb, la) };
    (lighter + 0.05) / (darker + 0.05)
}

/// Contrast ratio between two hex strings
pub fn contrast_ratio_hex(a: &str, b: &str) -> RulesResult<f64> {
    Ok(contrast_ratio(parse_hex(a)?, parse_hex(b)?))
}
