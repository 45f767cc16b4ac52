//! Dashboard statistics reported by the backend.

use serde::{Deserialize, Serialize};

/// Headline numbers for the overview cards.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    #[serde(default)]
    pub total_students: u64,
    #[serde(default)]
    pub total_alumni: u64,
    #[serde(default)]
    pub total_matches: u64,
    #[serde(default)]
    pub pending_approvals: u64,
}
