//! Invitation and verification codes shown on the overview.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registration invitation code.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InvitationCode {
    pub code: String,
    #[serde(default)]
    pub used: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub used_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl InvitationCode {
    /// Unused and not past its expiry.
    pub fn is_available(&self, now: DateTime<Utc>) -> bool {
        !self.used && self.expires_at.map_or(true, |exp| exp > now)
    }
}

/// An outstanding e-mail verification code.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VerificationCode {
    pub email: String,
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}
