//! Paths of the platform backend's admin API.

use std::borrow::Cow;

use crate::errors::ConsoleError;
use crate::models::UserKind;

pub const STATS: &str = "/api/admin/stats";
pub const STUDENTS: &str = "/api/admin/students";
pub const ALUMNI: &str = "/api/admin/alumni";
pub const MATCHES: &str = "/api/admin/matches";
pub const PENDING: &str = "/api/admin/pending";
pub const ADMINS: &str = "/api/admin/admins";
pub const INVITATION_CODES: &str = "/api/admin/invitation-codes";
pub const VERIFICATION_CODES: &str = "/api/admin/verification-codes";

/// Workflow operations on a student or alumni record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserAction {
    Approve,
    Reject,
    Deactivate,
    Reactivate,
}

impl UserAction {
    fn as_str(&self) -> &'static str {
        match self {
            UserAction::Approve => "approve",
            UserAction::Reject => "reject",
            UserAction::Deactivate => "deactivate",
            UserAction::Reactivate => "reactivate",
        }
    }
}

/// Workflow operations on a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchAction {
    Approve,
    Reject,
    Cancel,
}

impl MatchAction {
    fn as_str(&self) -> &'static str {
        match self {
            MatchAction::Approve => "approve",
            MatchAction::Reject => "reject",
            MatchAction::Cancel => "cancel",
        }
    }
}

/// Percent-encode an id for use as one path segment.
///
/// Dot segments survive encoding and would be collapsed by URL normalisation, so they are
/// refused along with empty ids.
fn segment(id: &str) -> Result<Cow<'_, str>, ConsoleError> {
    if id.is_empty() || id == "." || id == ".." {
        return Err(ConsoleError::Validation(format!("Invalid record id {:?}", id)));
    }
    Ok(urlencoding::encode(id))
}

/// `POST /api/admin/{students|alumni}/{id}/{action}`
pub fn user_action(kind: UserKind, id: &str, action: UserAction) -> Result<String, ConsoleError> {
    Ok(format!(
        "/api/admin/{}/{}/{}",
        kind.path_segment(),
        segment(id)?,
        action.as_str()
    ))
}

/// `POST /api/admin/matches/{id}/{action}`
pub fn match_action(id: &str, action: MatchAction) -> Result<String, ConsoleError> {
    Ok(format!("{}/{}/{}", MATCHES, segment(id)?, action.as_str()))
}

/// `DELETE /api/admin/admins/{id}`
pub fn admin(id: &str) -> Result<String, ConsoleError> {
    Ok(format!("{}/{}", ADMINS, segment(id)?))
}

/// `GET /api/admin/students/{id}/cv`
pub fn student_cv(id: &str) -> Result<String, ConsoleError> {
    Ok(format!("{}/{}/cv", STUDENTS, segment(id)?))
}
