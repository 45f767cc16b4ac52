//! View modes, sub-filters and the current selection.

use serde::{Deserialize, Serialize};

use crate::models::{ApprovalStatus, MatchStatus, UserKind};

/// The active top-level screen of the admin console.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "camelCase")]
pub enum ViewMode {
    #[default]
    Overview,
    Students,
    StudentDetail,
    Alumni,
    AlumniDetail,
    Matches,
    MatchDetail,
    Pending,
    PendingDetail,
    Admins,
}

impl ViewMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewMode::Overview => "overview",
            ViewMode::Students => "students",
            ViewMode::StudentDetail => "studentDetail",
            ViewMode::Alumni => "alumni",
            ViewMode::AlumniDetail => "alumniDetail",
            ViewMode::Matches => "matches",
            ViewMode::MatchDetail => "matchDetail",
            ViewMode::Pending => "pending",
            ViewMode::PendingDetail => "pendingDetail",
            ViewMode::Admins => "admins",
        }
    }

    /// Initial view from the `view` query parameter.
    ///
    /// Detail views need a selection, so a deep link to one lands on its list instead.
    /// Anything unrecognised lands on the overview.
    pub fn from_query(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("students") | Some("studentDetail") => ViewMode::Students,
            Some("alumni") | Some("alumniDetail") => ViewMode::Alumni,
            Some("matches") | Some("matchDetail") => ViewMode::Matches,
            Some("pending") | Some("pendingDetail") => ViewMode::Pending,
            Some("admins") => ViewMode::Admins,
            _ => ViewMode::Overview,
        }
    }

    /// The list view backing this view, if any.
    pub fn list(&self) -> Option<ListView> {
        match self {
            ViewMode::Overview => None,
            ViewMode::Students | ViewMode::StudentDetail => Some(ListView::Students),
            ViewMode::Alumni | ViewMode::AlumniDetail => Some(ListView::Alumni),
            ViewMode::Matches | ViewMode::MatchDetail => Some(ListView::Matches),
            ViewMode::Pending | ViewMode::PendingDetail => Some(ListView::Pending),
            ViewMode::Admins => Some(ListView::Admins),
        }
    }

    pub fn is_detail(&self) -> bool {
        matches!(
            self,
            ViewMode::StudentDetail
                | ViewMode::AlumniDetail
                | ViewMode::MatchDetail
                | ViewMode::PendingDetail
        )
    }
}

/// Screens that display a fetched collection.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum ListView {
    Students,
    Alumni,
    Matches,
    Pending,
    Admins,
}

impl ListView {
    pub fn view(&self) -> ViewMode {
        match self {
            ListView::Students => ViewMode::Students,
            ListView::Alumni => ViewMode::Alumni,
            ListView::Matches => ViewMode::Matches,
            ListView::Pending => ViewMode::Pending,
            ListView::Admins => ViewMode::Admins,
        }
    }

    pub fn dataset(&self) -> Dataset {
        match self {
            ListView::Students => Dataset::Students,
            ListView::Alumni => Dataset::Alumni,
            ListView::Matches => Dataset::Matches,
            ListView::Pending => Dataset::Pending,
            ListView::Admins => Dataset::Admins,
        }
    }
}

/// Every collection the console keeps in sync with the backend.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum Dataset {
    Stats,
    Students,
    Alumni,
    Matches,
    Pending,
    Admins,
    InvitationCodes,
    VerificationCodes,
}

impl Dataset {
    pub fn as_str(&self) -> &'static str {
        match self {
            Dataset::Stats => "stats",
            Dataset::Students => "students",
            Dataset::Alumni => "alumni",
            Dataset::Matches => "matches",
            Dataset::Pending => "pending",
            Dataset::Admins => "admins",
            Dataset::InvitationCodes => "invitationCodes",
            Dataset::VerificationCodes => "verificationCodes",
        }
    }

    pub fn for_user(kind: UserKind) -> Self {
        match kind {
            UserKind::Student => Dataset::Students,
            UserKind::Alumni => Dataset::Alumni,
        }
    }
}

/// Sub-filter for the student and alumni lists.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum ApprovalFilter {
    #[default]
    All,
    Approved,
    Pending,
}

impl ApprovalFilter {
    pub fn accepts(&self, status: ApprovalStatus) -> bool {
        match self {
            ApprovalFilter::All => true,
            ApprovalFilter::Approved => status == ApprovalStatus::Approved,
            ApprovalFilter::Pending => status == ApprovalStatus::Pending,
        }
    }
}

/// Sub-filter for the match list, bucketing statuses.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum MatchFilter {
    #[default]
    All,
    Pending,
    Active,
    Cancelled,
    Completed,
}

impl MatchFilter {
    pub fn accepts(&self, status: MatchStatus) -> bool {
        match self {
            MatchFilter::All => true,
            MatchFilter::Pending => status == MatchStatus::Pending,
            MatchFilter::Active => status.is_active(),
            MatchFilter::Cancelled => status == MatchStatus::Cancelled,
            MatchFilter::Completed => status == MatchStatus::Completed,
        }
    }
}

/// Sub-filter for the pending approvals list.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum PendingFilter {
    #[default]
    All,
    Students,
    Alumni,
}

impl PendingFilter {
    pub fn accepts(&self, kind: UserKind) -> bool {
        match self {
            PendingFilter::All => true,
            PendingFilter::Students => kind == UserKind::Student,
            PendingFilter::Alumni => kind == UserKind::Alumni,
        }
    }
}

/// Per-screen sub-filter selections.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct SubFilters {
    pub students: ApprovalFilter,
    pub alumni: ApprovalFilter,
    pub matches: MatchFilter,
    pub pending: PendingFilter,
}

/// The entity shown by a detail view.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Selection {
    Student {
        id: String,
    },
    Alumni {
        id: String,
    },
    Match {
        id: String,
    },
    /// A user awaiting approval; `origin` is the list the admin came from.
    #[serde(rename_all = "camelCase")]
    Pending {
        kind: UserKind,
        id: String,
        origin: ListView,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_query() {
        assert_eq!(ViewMode::from_query(None), ViewMode::Overview);
        assert_eq!(ViewMode::from_query(Some("students")), ViewMode::Students);
        assert_eq!(ViewMode::from_query(Some(" admins ")), ViewMode::Admins);
        assert_eq!(ViewMode::from_query(Some("matchDetail")), ViewMode::Matches);
        assert_eq!(ViewMode::from_query(Some("settings")), ViewMode::Overview);
        assert_eq!(ViewMode::from_query(Some("")), ViewMode::Overview);
    }

    #[test]
    fn test_view_round_trips_through_query() {
        for list in [
            ListView::Students,
            ListView::Alumni,
            ListView::Matches,
            ListView::Pending,
            ListView::Admins,
        ] {
            let view = list.view();
            assert_eq!(ViewMode::from_query(Some(view.as_str())), view);
            assert_eq!(view.list(), Some(list));
        }
    }

    #[test]
    fn test_match_filter_buckets() {
        assert!(MatchFilter::Active.accepts(MatchStatus::Accepted));
        assert!(MatchFilter::Active.accepts(MatchStatus::Confirmed));
        assert!(!MatchFilter::Active.accepts(MatchStatus::Pending));
        assert!(MatchFilter::Completed.accepts(MatchStatus::Completed));
        assert!(MatchFilter::All.accepts(MatchStatus::Cancelled));
    }

    #[test]
    fn test_approval_filter_hides_rejected_unless_all() {
        assert!(ApprovalFilter::All.accepts(ApprovalStatus::Rejected));
        assert!(!ApprovalFilter::Approved.accepts(ApprovalStatus::Rejected));
        assert!(!ApprovalFilter::Pending.accepts(ApprovalStatus::Rejected));
    }
}
