// Error types for the campaign rules engine
// Expected-invalid configuration is never an error here: it is reported
// through the diagnostics collector. Errors are reserved for boundary
// failures such as malformed payloads.

use thiserror::Error;

/// Main error type for the campaign rules engine
#[derive(Debug, Error)]
pub enum CampaignRulesError {
    /// A wizard-step payload could not be deserialized at all
    /// Occurs before any rule runs; rule-level problems become diagnostics
    #[error("Invalid payload: {0}")]
    InvalidPayload(#[from] serde_json::Error),

    /// A color string handed to the colorimetry utility was not `#RRGGBB`
    /// The discount validator pre-screens colors, so this surfaces only to
    /// direct callers of the color module
    #[error("Invalid hex color: {0}")]
    InvalidColor(String),
}

/// Result type alias for campaign rules operations
///
/// Instead of writing `Result<T, CampaignRulesError>`, you can write `RulesResult<T>`.
pub type RulesResult<T> = Result<T, CampaignRulesError>;
