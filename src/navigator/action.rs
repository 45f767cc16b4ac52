//! Named transitions of the console state machine.

use serde::{Deserialize, Serialize};

use super::view::{ApprovalFilter, MatchFilter, PendingFilter};
use crate::models::UserKind;

/// Everything an admin can do on the console, as one tagged union.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Action {
    Refresh,
    OpenStudents,
    OpenAlumni,
    OpenMatches,
    OpenPending,
    OpenAdmins,
    SelectStudent {
        id: String,
    },
    SelectAlumni {
        id: String,
    },
    SelectMatch {
        id: String,
    },
    SelectPending {
        kind: UserKind,
        id: String,
    },
    Back,
    GoOverview,
    SetStudentFilter {
        filter: ApprovalFilter,
    },
    SetAlumniFilter {
        filter: ApprovalFilter,
    },
    SetMatchFilter {
        filter: MatchFilter,
    },
    SetPendingFilter {
        filter: PendingFilter,
    },
    ApproveUser {
        kind: UserKind,
        id: String,
    },
    RejectUser {
        kind: UserKind,
        id: String,
        #[serde(default)]
        reason: Option<String>,
    },
    DeactivateUser {
        kind: UserKind,
        id: String,
    },
    ReactivateUser {
        kind: UserKind,
        id: String,
    },
    ApproveMatch {
        id: String,
    },
    RejectMatch {
        id: String,
        #[serde(default)]
        reason: String,
    },
    CancelMatch {
        id: String,
    },
    CreateMatch {
        student_id: String,
        alumni_id: String,
        #[serde(default)]
        reasons: Vec<String>,
    },
    CreateAdmin {
        name: String,
        email: String,
        password: String,
    },
    DeleteAdmin {
        id: String,
    },
    GenerateInvitationCode,
    DismissError,
}

impl Action {
    /// Actions still accepted while the dashboard is blocked by a failed statistics load.
    pub fn allowed_while_blocked(&self) -> bool {
        matches!(
            self,
            Action::Refresh | Action::DismissError | Action::GoOverview
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            Action::Refresh => "refresh",
            Action::OpenStudents => "openStudents",
            Action::OpenAlumni => "openAlumni",
            Action::OpenMatches => "openMatches",
            Action::OpenPending => "openPending",
            Action::OpenAdmins => "openAdmins",
            Action::SelectStudent { .. } => "selectStudent",
            Action::SelectAlumni { .. } => "selectAlumni",
            Action::SelectMatch { .. } => "selectMatch",
            Action::SelectPending { .. } => "selectPending",
            Action::Back => "back",
            Action::GoOverview => "goOverview",
            Action::SetStudentFilter { .. } => "setStudentFilter",
            Action::SetAlumniFilter { .. } => "setAlumniFilter",
            Action::SetMatchFilter { .. } => "setMatchFilter",
            Action::SetPendingFilter { .. } => "setPendingFilter",
            Action::ApproveUser { .. } => "approveUser",
            Action::RejectUser { .. } => "rejectUser",
            Action::DeactivateUser { .. } => "deactivateUser",
            Action::ReactivateUser { .. } => "reactivateUser",
            Action::ApproveMatch { .. } => "approveMatch",
            Action::RejectMatch { .. } => "rejectMatch",
            Action::CancelMatch { .. } => "cancelMatch",
            Action::CreateMatch { .. } => "createMatch",
            Action::CreateAdmin { .. } => "createAdmin",
            Action::DeleteAdmin { .. } => "deleteAdmin",
            Action::GenerateInvitationCode => "generateInvitationCode",
            Action::DismissError => "dismissError",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_tagged_actions() {
        let action: Action = serde_json::from_value(serde_json::json!({
            "type": "createMatch",
            "studentId": "s1",
            "alumniId": "a1"
        }))
        .unwrap();
        assert_eq!(
            action,
            Action::CreateMatch {
                student_id: "s1".to_string(),
                alumni_id: "a1".to_string(),
                reasons: vec![],
            }
        );

        let action: Action = serde_json::from_value(serde_json::json!({
            "type": "setMatchFilter",
            "filter": "active"
        }))
        .unwrap();
        assert_eq!(
            action,
            Action::SetMatchFilter {
                filter: MatchFilter::Active
            }
        );

        let action: Action =
            serde_json::from_value(serde_json::json!({ "type": "openStudents" })).unwrap();
        assert_eq!(action.name(), "openStudents");
    }

    #[test]
    fn test_reject_match_reason_defaults_to_empty() {
        let action: Action = serde_json::from_value(serde_json::json!({
            "type": "rejectMatch",
            "id": "m1"
        }))
        .unwrap();
        assert_eq!(
            action,
            Action::RejectMatch {
                id: "m1".to_string(),
                reason: String::new()
            }
        );
    }
}
