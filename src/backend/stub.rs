//! In-memory [`AdminBackend`] used by the test suites.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Notify;

use super::{AdminBackend, CvBlob};
use crate::errors::ConsoleError;
use crate::models::{
    AdminAccount, Alumni, ApprovalStatus, CreateAdminRequest, CreateMatchRequest, DashboardStats,
    InvitationCode, MatchRecord, MatchStatus, PendingUsers, ProfileEntries, Student, UserKind,
    VerificationCode,
};

#[derive(Default)]
struct Data {
    students: Vec<Student>,
    alumni: Vec<Alumni>,
    matches: Vec<MatchRecord>,
    admins: Vec<AdminAccount>,
    invitation_codes: Vec<InvitationCode>,
    verification_codes: Vec<VerificationCode>,
    cvs: HashMap<String, CvBlob>,
}

/// Backend double with injectable failures, a call log and an optional gate on reads.
#[derive(Default)]
pub struct StubBackend {
    data: Mutex<Data>,
    failures: Mutex<HashMap<&'static str, ConsoleError>>,
    gated: Mutex<HashSet<&'static str>>,
    gate: Arc<Notify>,
    calls: Mutex<Vec<String>>,
}

pub fn student(id: &str, status: ApprovalStatus) -> Student {
    Student {
        id: id.to_string(),
        name: format!("Student {}", id),
        email: format!("{}@students.example.com", id),
        approval_status: status,
        is_active: true,
        university: Some("State University".to_string()),
        major: Some("Computer Science".to_string()),
        graduation_year: Some(2026),
        skills: vec!["rust".to_string()],
        interests: vec![],
        cv_file_name: None,
        profile: ProfileEntries::default(),
        created_at: None,
    }
}

pub fn alumni(id: &str, status: ApprovalStatus) -> Alumni {
    Alumni {
        id: id.to_string(),
        name: format!("Alumni {}", id),
        email: format!("{}@alumni.example.com", id),
        approval_status: status,
        is_active: true,
        company: Some("Initech".to_string()),
        job_title: Some("Engineer".to_string()),
        graduation_year: Some(2015),
        expertise: vec!["systems".to_string()],
        max_mentees: Some(3),
        profile: ProfileEntries::default(),
        created_at: None,
    }
}

pub fn match_record(id: &str, student_id: &str, alumni_id: &str, status: MatchStatus) -> MatchRecord {
    MatchRecord {
        id: id.to_string(),
        student_id: student_id.to_string(),
        alumni_id: alumni_id.to_string(),
        status,
        score: Some(0.8),
        reasons: vec![],
        cover_letter: None,
        confirmed_by: None,
        confirmed_at: None,
        created_at: None,
    }
}

impl StubBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_students(self, students: Vec<Student>) -> Self {
        self.lock_data().students = students;
        self
    }

    pub fn with_alumni(self, alumni: Vec<Alumni>) -> Self {
        self.lock_data().alumni = alumni;
        self
    }

    pub fn with_matches(self, matches: Vec<MatchRecord>) -> Self {
        self.lock_data().matches = matches;
        self
    }

    pub fn with_cv(self, student_id: &str, blob: CvBlob) -> Self {
        self.lock_data().cvs.insert(student_id.to_string(), blob);
        self
    }

    /// Make every call to `endpoint` fail with `error` until cleared.
    pub fn fail(&self, endpoint: &'static str, error: ConsoleError) {
        self.lock(&self.failures).insert(endpoint, error);
    }

    pub fn clear_failure(&self, endpoint: &'static str) {
        self.lock(&self.failures).remove(endpoint);
    }

    /// Hold calls to `endpoint` until [`StubBackend::release`] is called.
    pub fn hold(&self, endpoint: &'static str) {
        self.lock(&self.gated).insert(endpoint);
    }

    pub fn release(&self) {
        self.lock(&self.gated).clear();
        self.gate.notify_waiters();
        self.gate.notify_one();
    }

    pub fn calls(&self) -> Vec<String> {
        self.lock(&self.calls).clone()
    }

    pub fn student(&self, id: &str) -> Option<Student> {
        self.lock_data().students.iter().find(|s| s.id == id).cloned()
    }

    pub fn match_by_id(&self, id: &str) -> Option<MatchRecord> {
        self.lock_data().matches.iter().find(|m| m.id == id).cloned()
    }

    fn lock<'a, T>(&self, mutex: &'a Mutex<T>) -> std::sync::MutexGuard<'a, T> {
        mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lock_data(&self) -> std::sync::MutexGuard<'_, Data> {
        self.lock(&self.data)
    }

    async fn enter(&self, endpoint: &'static str) -> Result<(), ConsoleError> {
        self.lock(&self.calls).push(endpoint.to_string());
        let held = self.lock(&self.gated).contains(endpoint);
        if held {
            self.gate.notified().await;
        }
        match self.lock(&self.failures).get(endpoint) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn set_status(&self, kind: UserKind, id: &str, status: ApprovalStatus) -> Result<(), ConsoleError> {
        let mut data = self.lock_data();
        let found = match kind {
            UserKind::Student => data.students.iter_mut().find(|s| s.id == id).map(|s| {
                s.approval_status = status;
            }),
            UserKind::Alumni => data.alumni.iter_mut().find(|a| a.id == id).map(|a| {
                a.approval_status = status;
            }),
        };
        found.ok_or_else(|| not_found(kind.label(), id))
    }

    fn set_match_status(&self, id: &str, status: MatchStatus) -> Result<(), ConsoleError> {
        let mut data = self.lock_data();
        let record = data
            .matches
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| not_found("Match", id))?;
        record.status = status;
        if status == MatchStatus::Confirmed {
            record.confirmed_by = Some("admin".to_string());
            record.confirmed_at = Some(Utc::now());
        }
        Ok(())
    }
}

fn not_found(what: &str, id: &str) -> ConsoleError {
    ConsoleError::Backend {
        status: 404,
        message: format!("{} {} not found", what, id),
    }
}

#[async_trait]
impl AdminBackend for StubBackend {
    async fn fetch_stats(&self) -> Result<DashboardStats, ConsoleError> {
        self.enter("stats").await?;
        let data = self.lock_data();
        let pending = data
            .students
            .iter()
            .filter(|s| s.approval_status == ApprovalStatus::Pending)
            .count()
            + data
                .alumni
                .iter()
                .filter(|a| a.approval_status == ApprovalStatus::Pending)
                .count();
        Ok(DashboardStats {
            total_students: data.students.len() as u64,
            total_alumni: data.alumni.len() as u64,
            total_matches: data.matches.len() as u64,
            pending_approvals: pending as u64,
        })
    }

    async fn list_students(&self) -> Result<Vec<Student>, ConsoleError> {
        self.enter("students").await?;
        Ok(self.lock_data().students.clone())
    }

    async fn list_alumni(&self) -> Result<Vec<Alumni>, ConsoleError> {
        self.enter("alumni").await?;
        Ok(self.lock_data().alumni.clone())
    }

    async fn list_matches(&self) -> Result<Vec<MatchRecord>, ConsoleError> {
        self.enter("matches").await?;
        Ok(self.lock_data().matches.clone())
    }

    async fn list_pending(&self) -> Result<PendingUsers, ConsoleError> {
        self.enter("pending").await?;
        let data = self.lock_data();
        Ok(PendingUsers {
            students: data
                .students
                .iter()
                .filter(|s| s.approval_status == ApprovalStatus::Pending)
                .cloned()
                .collect(),
            alumni: data
                .alumni
                .iter()
                .filter(|a| a.approval_status == ApprovalStatus::Pending)
                .cloned()
                .collect(),
        })
    }

    async fn list_admins(&self) -> Result<Vec<AdminAccount>, ConsoleError> {
        self.enter("admins").await?;
        Ok(self.lock_data().admins.clone())
    }

    async fn list_invitation_codes(&self) -> Result<Vec<InvitationCode>, ConsoleError> {
        self.enter("invitation_codes").await?;
        Ok(self.lock_data().invitation_codes.clone())
    }

    async fn list_verification_codes(&self) -> Result<Vec<VerificationCode>, ConsoleError> {
        self.enter("verification_codes").await?;
        Ok(self.lock_data().verification_codes.clone())
    }

    async fn approve_user(&self, kind: UserKind, id: &str) -> Result<(), ConsoleError> {
        self.enter("approve_user").await?;
        self.set_status(kind, id, ApprovalStatus::Approved)
    }

    async fn reject_user(
        &self,
        kind: UserKind,
        id: &str,
        _reason: Option<&str>,
    ) -> Result<(), ConsoleError> {
        self.enter("reject_user").await?;
        self.set_status(kind, id, ApprovalStatus::Rejected)
    }

    async fn set_user_active(
        &self,
        kind: UserKind,
        id: &str,
        active: bool,
    ) -> Result<(), ConsoleError> {
        self.enter("set_user_active").await?;
        let mut data = self.lock_data();
        let found = match kind {
            UserKind::Student => data.students.iter_mut().find(|s| s.id == id).map(|s| {
                s.is_active = active;
            }),
            UserKind::Alumni => data.alumni.iter_mut().find(|a| a.id == id).map(|a| {
                a.is_active = active;
            }),
        };
        found.ok_or_else(|| not_found(kind.label(), id))
    }

    async fn create_match(
        &self,
        request: &CreateMatchRequest,
    ) -> Result<MatchRecord, ConsoleError> {
        self.enter("create_match").await?;
        let mut data = self.lock_data();
        let id = format!("m{}", data.matches.len() + 1);
        let mut record = match_record(
            &id,
            &request.student_id,
            &request.alumni_id,
            MatchStatus::Pending,
        );
        record.reasons = request.reasons.clone();
        data.matches.push(record.clone());
        Ok(record)
    }

    async fn approve_match(&self, id: &str) -> Result<(), ConsoleError> {
        self.enter("approve_match").await?;
        self.set_match_status(id, MatchStatus::Confirmed)
    }

    async fn reject_match(&self, id: &str, _reason: &str) -> Result<(), ConsoleError> {
        self.enter("reject_match").await?;
        self.set_match_status(id, MatchStatus::Cancelled)
    }

    async fn cancel_match(&self, id: &str) -> Result<(), ConsoleError> {
        self.enter("cancel_match").await?;
        self.set_match_status(id, MatchStatus::Cancelled)
    }

    async fn create_admin(
        &self,
        request: &CreateAdminRequest,
    ) -> Result<AdminAccount, ConsoleError> {
        self.enter("create_admin").await?;
        let mut data = self.lock_data();
        let account = AdminAccount {
            id: format!("admin-{}", data.admins.len() + 1),
            name: request.name.clone(),
            email: request.email.clone(),
            role: Some("admin".to_string()),
            created_at: Some(Utc::now()),
        };
        data.admins.push(account.clone());
        Ok(account)
    }

    async fn delete_admin(&self, id: &str) -> Result<(), ConsoleError> {
        self.enter("delete_admin").await?;
        let mut data = self.lock_data();
        let before = data.admins.len();
        data.admins.retain(|a| a.id != id);
        if data.admins.len() == before {
            return Err(not_found("Admin", id));
        }
        Ok(())
    }

    async fn generate_invitation_code(&self) -> Result<InvitationCode, ConsoleError> {
        self.enter("generate_invitation_code").await?;
        let mut data = self.lock_data();
        let code = InvitationCode {
            code: format!("INV{:04}", data.invitation_codes.len() + 1),
            used: false,
            used_by: None,
            expires_at: None,
        };
        data.invitation_codes.push(code.clone());
        Ok(code)
    }

    async fn download_cv(&self, student_id: &str) -> Result<CvBlob, ConsoleError> {
        self.enter("cv").await?;
        self.lock_data()
            .cvs
            .get(student_id)
            .cloned()
            .ok_or_else(|| not_found("CV for student", student_id))
    }
}
