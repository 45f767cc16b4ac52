//! Platform backend access.
//!
//! The console never talks HTTP to the platform directly: everything goes through the
//! [`AdminBackend`] trait so the navigator can be driven against an in-memory backend in tests.

pub mod endpoints;
mod http;
#[cfg(test)]
pub mod stub;

pub use http::HttpBackend;

use async_trait::async_trait;

use crate::errors::ConsoleError;
use crate::models::{
    AdminAccount, Alumni, CreateAdminRequest, CreateMatchRequest, DashboardStats, InvitationCode,
    MatchRecord, PendingUsers, Student, UserKind, VerificationCode,
};

/// A CV file fetched as a binary blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CvBlob {
    pub content_type: String,
    pub file_name: Option<String>,
    pub bytes: Vec<u8>,
}

/// Named operations the admin console performs against the platform backend.
#[async_trait]
pub trait AdminBackend: Send + Sync {
    async fn fetch_stats(&self) -> Result<DashboardStats, ConsoleError>;
    async fn list_students(&self) -> Result<Vec<Student>, ConsoleError>;
    async fn list_alumni(&self) -> Result<Vec<Alumni>, ConsoleError>;
    async fn list_matches(&self) -> Result<Vec<MatchRecord>, ConsoleError>;
    async fn list_pending(&self) -> Result<PendingUsers, ConsoleError>;
    async fn list_admins(&self) -> Result<Vec<AdminAccount>, ConsoleError>;
    async fn list_invitation_codes(&self) -> Result<Vec<InvitationCode>, ConsoleError>;
    async fn list_verification_codes(&self) -> Result<Vec<VerificationCode>, ConsoleError>;

    async fn approve_user(&self, kind: UserKind, id: &str) -> Result<(), ConsoleError>;
    async fn reject_user(
        &self,
        kind: UserKind,
        id: &str,
        reason: Option<&str>,
    ) -> Result<(), ConsoleError>;
    /// Deactivate (`active == false`) or reactivate a user.
    async fn set_user_active(
        &self,
        kind: UserKind,
        id: &str,
        active: bool,
    ) -> Result<(), ConsoleError>;

    async fn create_match(&self, request: &CreateMatchRequest)
        -> Result<MatchRecord, ConsoleError>;
    async fn approve_match(&self, id: &str) -> Result<(), ConsoleError>;
    async fn reject_match(&self, id: &str, reason: &str) -> Result<(), ConsoleError>;
    async fn cancel_match(&self, id: &str) -> Result<(), ConsoleError>;

    async fn create_admin(&self, request: &CreateAdminRequest)
        -> Result<AdminAccount, ConsoleError>;
    async fn delete_admin(&self, id: &str) -> Result<(), ConsoleError>;

    async fn generate_invitation_code(&self) -> Result<InvitationCode, ConsoleError>;

    async fn download_cv(&self, student_id: &str) -> Result<CvBlob, ConsoleError>;
}
