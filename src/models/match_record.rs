//! Match records pairing one student with one alumnus.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a match.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    Pending,
    Confirmed,
    Accepted,
    Cancelled,
    #[serde(alias = "ended")]
    Completed,
}

impl MatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStatus::Pending => "pending",
            MatchStatus::Confirmed => "confirmed",
            MatchStatus::Accepted => "accepted",
            MatchStatus::Cancelled => "cancelled",
            MatchStatus::Completed => "completed",
        }
    }

    /// Confirmed and accepted matches count as active mentorships.
    pub fn is_active(&self) -> bool {
        matches!(self, MatchStatus::Confirmed | MatchStatus::Accepted)
    }
}

/// A proposed or active mentoring pairing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MatchRecord {
    #[serde(alias = "_id")]
    pub id: String,
    pub student_id: String,
    pub alumni_id: String,
    pub status: MatchStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(default)]
    pub reasons: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_letter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirmed_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirmed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl MatchRecord {
    /// Whether this match references the given person on either side.
    pub fn involves(&self, person_id: &str) -> bool {
        self.student_id == person_id || self.alumni_id == person_id
    }
}

/// Request body for creating a match.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMatchRequest {
    pub student_id: String,
    pub alumni_id: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reasons: Vec<String>,
}

/// Request body for rejecting a match.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectMatchRequest {
    pub reason: String,
}
