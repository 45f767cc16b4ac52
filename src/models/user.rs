//! User records: students, alumni and admin accounts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ProfileEntries;

/// Workflow state of a registered user gating their platform access.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Rejected,
}

/// Which population a user record belongs to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum UserKind {
    Student,
    Alumni,
}

impl UserKind {
    /// Path segment used by the backend for this population.
    pub fn path_segment(&self) -> &'static str {
        match self {
            UserKind::Student => "students",
            UserKind::Alumni => "alumni",
        }
    }

    /// Human-readable label used in notices.
    pub fn label(&self) -> &'static str {
        match self {
            UserKind::Student => "Student",
            UserKind::Alumni => "Alumni",
        }
    }
}

/// Common view over approvable user records.
pub trait UserRecord {
    fn id(&self) -> &str;
    fn approval_status(&self) -> ApprovalStatus;
}

fn default_active() -> bool {
    true
}

/// A registered student looking for a mentor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub approval_status: ApprovalStatus,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub university: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub major: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub graduation_year: Option<i32>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub interests: Vec<String>,
    /// Original file name of the uploaded CV, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cv_file_name: Option<String>,
    #[serde(flatten)]
    pub profile: ProfileEntries,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl UserRecord for Student {
    fn id(&self) -> &str {
        &self.id
    }

    fn approval_status(&self) -> ApprovalStatus {
        self.approval_status
    }
}

/// A graduate who volunteers as a mentor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Alumni {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub approval_status: ApprovalStatus,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub graduation_year: Option<i32>,
    #[serde(default)]
    pub expertise: Vec<String>,
    /// Maximum number of concurrent mentees.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_mentees: Option<u32>,
    #[serde(flatten)]
    pub profile: ProfileEntries,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl UserRecord for Alumni {
    fn id(&self) -> &str {
        &self.id
    }

    fn approval_status(&self) -> ApprovalStatus {
        self.approval_status
    }
}

/// An administrator account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AdminAccount {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Users awaiting approval, as returned by the pending endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PendingUsers {
    #[serde(default)]
    pub students: Vec<Student>,
    #[serde(default)]
    pub alumni: Vec<Alumni>,
}

impl PendingUsers {
    pub fn len(&self) -> usize {
        self.students.len() + self.alumni.len()
    }

    pub fn is_empty(&self) -> bool {
        self.students.is_empty() && self.alumni.is_empty()
    }

    pub fn contains(&self, kind: UserKind, id: &str) -> bool {
        match kind {
            UserKind::Student => self.students.iter().any(|s| s.id == id),
            UserKind::Alumni => self.alumni.iter().any(|a| a.id == id),
        }
    }
}

/// Request body for rejecting a user registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectUserRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Request body for creating a new admin account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAdminRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}
