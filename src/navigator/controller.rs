//! Async side of the navigator: guarded fetches, fan-out loads and remote mutations.
//!
//! The session lock is taken to begin a transition and again to resolve it, never across a
//! backend call. Results carry the ticket they were started under and are dropped if another
//! transition has happened since.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::Mutex;

use super::action::Action;
use super::state::{ConsoleState, Fetched};
use super::view::{Dataset, ListView, ViewMode};
use crate::backend::AdminBackend;
use crate::errors::ConsoleError;
use crate::models::{CreateAdminRequest, CreateMatchRequest, UserKind};

const MIN_PASSWORD_LEN: usize = 8;

/// Where the console goes after a mutation and its refetch succeed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Landing {
    /// Keep the current view, falling back to its list if the selection vanished.
    Stay,
    List(ListView),
    /// The pending list, or the overview once nobody is left to approve.
    PendingOrOverview,
}

/// Server-confirmed follow-up of a mutation.
#[derive(Debug, Clone)]
struct Followup {
    refetch: Dataset,
    landing: Landing,
    /// Collections the mutation touched that are not refetched.
    invalidates: Vec<Dataset>,
    notice: String,
}

/// Drives console sessions against a platform backend.
#[derive(Clone)]
pub struct Navigator {
    backend: Arc<dyn AdminBackend>,
}

impl Navigator {
    pub fn new(backend: Arc<dyn AdminBackend>) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &Arc<dyn AdminBackend> {
        &self.backend
    }

    /// Load the dashboard, then deep-link to `initial` if it names a list.
    pub async fn initialize(&self, state: &Mutex<ConsoleState>, initial: ViewMode) {
        if let Err(err) = self.load_overview(state).await {
            tracing::warn!("Console opened without statistics: {}", err);
            return;
        }
        if let Some(list) = initial.list() {
            if let Err(err) = self.open_list(state, list).await {
                tracing::warn!(view = initial.as_str(), "Deep link failed: {}", err);
            }
        }
    }

    /// Apply one admin action. Failures are also recorded on the state for display.
    pub async fn dispatch(
        &self,
        state: &Mutex<ConsoleState>,
        action: Action,
    ) -> Result<(), ConsoleError> {
        tracing::debug!(action = action.name(), "Dispatching console action");

        {
            let mut s = state.lock().await;
            if s.blocked.is_some() && !action.allowed_while_blocked() {
                let err = ConsoleError::Validation(
                    "The dashboard failed to load. Refresh to retry.".to_string(),
                );
                s.report(&err);
                return Err(err);
            }
            s.error = None;
            s.notice = None;
        }

        match action {
            Action::Refresh => self.load_overview(state).await,
            Action::OpenStudents => self.open_list(state, ListView::Students).await,
            Action::OpenAlumni => self.open_list(state, ListView::Alumni).await,
            Action::OpenMatches => self.open_list(state, ListView::Matches).await,
            Action::OpenPending => self.open_list(state, ListView::Pending).await,
            Action::OpenAdmins => self.open_list(state, ListView::Admins).await,

            Action::SelectStudent { id } => apply(state, |s| s.select_student(&id)).await,
            Action::SelectAlumni { id } => apply(state, |s| s.select_alumni(&id)).await,
            Action::SelectMatch { id } => apply(state, |s| s.select_match(&id)).await,
            Action::SelectPending { kind, id } => {
                apply(state, |s| s.select_pending(kind, &id)).await
            }
            Action::Back => {
                state.lock().await.back();
                Ok(())
            }
            Action::GoOverview => {
                state.lock().await.go_overview();
                Ok(())
            }

            Action::SetStudentFilter { filter } => {
                state.lock().await.filters.students = filter;
                Ok(())
            }
            Action::SetAlumniFilter { filter } => {
                state.lock().await.filters.alumni = filter;
                Ok(())
            }
            Action::SetMatchFilter { filter } => {
                state.lock().await.filters.matches = filter;
                Ok(())
            }
            Action::SetPendingFilter { filter } => {
                state.lock().await.filters.pending = filter;
                Ok(())
            }

            Action::ApproveUser { kind, id } => {
                let followup = user_review_followup(state, kind, "approved").await;
                self.mutate(state, self.backend.approve_user(kind, &id), followup)
                    .await
            }
            Action::RejectUser { kind, id, reason } => {
                let followup = user_review_followup(state, kind, "rejected").await;
                let reason = reason.as_deref().map(str::trim).filter(|r| !r.is_empty());
                self.mutate(state, self.backend.reject_user(kind, &id, reason), followup)
                    .await
            }
            Action::DeactivateUser { kind, id } => {
                let followup = activation_followup(kind, "deactivated");
                self.mutate(state, self.backend.set_user_active(kind, &id, false), followup)
                    .await
            }
            Action::ReactivateUser { kind, id } => {
                let followup = activation_followup(kind, "reactivated");
                self.mutate(state, self.backend.set_user_active(kind, &id, true), followup)
                    .await
            }

            Action::ApproveMatch { id } => {
                let followup = match_followup(state, "Match approved").await;
                self.mutate(state, self.backend.approve_match(&id), followup)
                    .await
            }
            Action::RejectMatch { id, reason } => {
                let reason = reason.trim();
                if reason.is_empty() {
                    return refuse(
                        state,
                        ConsoleError::Validation(
                            "A reason is required to reject a match".to_string(),
                        ),
                    )
                    .await;
                }
                let followup = match_followup(state, "Match rejected").await;
                self.mutate(state, self.backend.reject_match(&id, reason), followup)
                    .await
            }
            Action::CancelMatch { id } => {
                let followup = match_followup(state, "Match cancelled").await;
                self.mutate(state, self.backend.cancel_match(&id), followup)
                    .await
            }
            Action::CreateMatch {
                student_id,
                alumni_id,
                reasons,
            } => {
                let request = match validate_match_request(student_id, alumni_id, reasons) {
                    Ok(request) => request,
                    Err(err) => return refuse(state, err).await,
                };
                let followup = Followup {
                    refetch: Dataset::Matches,
                    landing: Landing::List(ListView::Matches),
                    invalidates: vec![Dataset::Stats],
                    notice: "Match created".to_string(),
                };
                let op = async {
                    self.backend.create_match(&request).await.map(|_| ())
                };
                self.mutate(state, op, followup).await
            }

            Action::CreateAdmin {
                name,
                email,
                password,
            } => {
                let request = match validate_admin_request(name, email, password) {
                    Ok(request) => request,
                    Err(err) => return refuse(state, err).await,
                };
                let followup = Followup {
                    refetch: Dataset::Admins,
                    landing: Landing::List(ListView::Admins),
                    invalidates: vec![],
                    notice: format!("Admin {} created", request.email),
                };
                let op = async {
                    self.backend.create_admin(&request).await.map(|_| ())
                };
                self.mutate(state, op, followup).await
            }
            Action::DeleteAdmin { id } => {
                let followup = Followup {
                    refetch: Dataset::Admins,
                    landing: Landing::List(ListView::Admins),
                    invalidates: vec![],
                    notice: "Admin deleted".to_string(),
                };
                self.mutate(state, self.backend.delete_admin(&id), followup)
                    .await
            }
            Action::GenerateInvitationCode => {
                let followup = Followup {
                    refetch: Dataset::InvitationCodes,
                    landing: Landing::Stay,
                    invalidates: vec![],
                    notice: "Invitation code generated".to_string(),
                };
                let op = async {
                    self.backend.generate_invitation_code().await.map(|_| ())
                };
                self.mutate(state, op, followup).await
            }

            Action::DismissError => Ok(()),
        }
    }

    /// Fan out every overview fetch and settle each independently.
    ///
    /// Only the statistics are required; the rest fall back to empty collections.
    async fn load_overview(&self, state: &Mutex<ConsoleState>) -> Result<(), ConsoleError> {
        let ticket = state.lock().await.begin();
        let backend = &self.backend;

        let (stats, students, alumni, matches, invitation_codes, verification_codes) = tokio::join!(
            backend.fetch_stats(),
            backend.list_students(),
            backend.list_alumni(),
            backend.list_matches(),
            backend.list_invitation_codes(),
            backend.list_verification_codes(),
        );

        let mut s = state.lock().await;
        if !s.is_current(ticket) {
            tracing::debug!("Discarding stale overview load");
            return Ok(());
        }

        if let Some(v) = settle(&mut s, Dataset::Students, students) {
            s.store(Fetched::Students(v));
        }
        if let Some(v) = settle(&mut s, Dataset::Alumni, alumni) {
            s.store(Fetched::Alumni(v));
        }
        if let Some(v) = settle(&mut s, Dataset::Matches, matches) {
            s.store(Fetched::Matches(v));
        }
        if let Some(v) = settle(&mut s, Dataset::InvitationCodes, invitation_codes) {
            s.store(Fetched::InvitationCodes(v));
        }
        if let Some(v) = settle(&mut s, Dataset::VerificationCodes, verification_codes) {
            s.store(Fetched::VerificationCodes(v));
        }

        let outcome = match stats {
            Ok(stats) => {
                s.store(Fetched::Stats(stats));
                Ok(())
            }
            Err(err) => {
                tracing::error!("Failed to load dashboard statistics: {}", err);
                if err.is_auth_failure() {
                    s.report(&err);
                } else {
                    s.blocked = Some(err.message());
                }
                Err(err)
            }
        };
        s.finish(ticket);
        outcome
    }

    /// Fetch a list's collection and enter it; the view is untouched if the fetch fails.
    async fn open_list(
        &self,
        state: &Mutex<ConsoleState>,
        list: ListView,
    ) -> Result<(), ConsoleError> {
        let ticket = state.lock().await.begin();
        let result = self.fetch(list.dataset()).await;

        let mut s = state.lock().await;
        match result {
            Ok(fetched) => {
                if !s.is_current(ticket) {
                    tracing::debug!(dataset = list.dataset().as_str(), "Discarding stale response");
                    return Ok(());
                }
                s.store(fetched);
                s.enter_list(list);
                s.finish(ticket);
                Ok(())
            }
            Err(err) => {
                s.fail(ticket, &err);
                Err(err)
            }
        }
    }

    async fn fetch(&self, dataset: Dataset) -> Result<Fetched, ConsoleError> {
        let backend = &self.backend;
        let fetched = match dataset {
            Dataset::Stats => Fetched::Stats(backend.fetch_stats().await?),
            Dataset::Students => Fetched::Students(backend.list_students().await?),
            Dataset::Alumni => Fetched::Alumni(backend.list_alumni().await?),
            Dataset::Matches => Fetched::Matches(backend.list_matches().await?),
            Dataset::Pending => Fetched::Pending(backend.list_pending().await?),
            Dataset::Admins => Fetched::Admins(backend.list_admins().await?),
            Dataset::InvitationCodes => {
                Fetched::InvitationCodes(backend.list_invitation_codes().await?)
            }
            Dataset::VerificationCodes => {
                Fetched::VerificationCodes(backend.list_verification_codes().await?)
            }
        };
        Ok(fetched)
    }

    /// Run a remote mutation, then refetch what it changed from the server.
    async fn mutate<F>(
        &self,
        state: &Mutex<ConsoleState>,
        op: F,
        followup: Followup,
    ) -> Result<(), ConsoleError>
    where
        F: Future<Output = Result<(), ConsoleError>>,
    {
        let ticket = state.lock().await.begin();

        if let Err(err) = op.await {
            state.lock().await.fail(ticket, &err);
            return Err(err);
        }

        let refreshed = self.fetch(followup.refetch).await;

        let mut s = state.lock().await;
        for dataset in &followup.invalidates {
            s.mark_stale(*dataset);
        }
        if !s.is_current(ticket) {
            tracing::debug!(
                dataset = followup.refetch.as_str(),
                "Mutation completed after navigation; marking stale"
            );
            s.mark_stale(followup.refetch);
            return Ok(());
        }

        match refreshed {
            Ok(fetched) => {
                s.store(fetched);
                land(&mut s, followup.landing);
                s.notice = Some(followup.notice);
                s.finish(ticket);
                Ok(())
            }
            Err(err) => {
                s.mark_stale(followup.refetch);
                s.fail(ticket, &err);
                Err(err)
            }
        }
    }
}

async fn apply<F>(state: &Mutex<ConsoleState>, f: F) -> Result<(), ConsoleError>
where
    F: FnOnce(&mut ConsoleState) -> Result<(), ConsoleError>,
{
    let mut s = state.lock().await;
    f(&mut *s).inspect_err(|err| s.report(err))
}

/// Reject an action client-side; nothing is sent and the view is unchanged.
async fn refuse(state: &Mutex<ConsoleState>, err: ConsoleError) -> Result<(), ConsoleError> {
    state.lock().await.report(&err);
    Err(err)
}

/// Unwrap a secondary load. On failure the collection is degraded instead of failing the
/// whole refresh; the banner is only raised if the active view is drawn from it.
fn settle<T>(s: &mut ConsoleState, dataset: Dataset, result: Result<T, ConsoleError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::warn!(
                dataset = dataset.as_str(),
                "Secondary load failed, keeping previous data: {}",
                err
            );
            if err.is_auth_failure() || s.active_dataset() == Some(dataset) {
                s.report(&err);
            }
            s.degrade(dataset);
            None
        }
    }
}

fn land(s: &mut ConsoleState, landing: Landing) {
    match landing {
        Landing::Stay => s.reconcile_selection(),
        Landing::List(list) => s.enter_list(list),
        Landing::PendingOrOverview => {
            let none_left = s.pending.get().map_or(true, |p| p.is_empty());
            if none_left {
                s.enter_overview();
            } else {
                s.enter_list(ListView::Pending);
            }
        }
    }
}

/// Approval and rejection return to the list the admin is working through.
async fn user_review_followup(
    state: &Mutex<ConsoleState>,
    kind: UserKind,
    verb: &str,
) -> Followup {
    let from = state.lock().await.view;
    let (refetch, landing) = match (from, kind) {
        (ViewMode::PendingDetail, _) => (Dataset::Pending, Landing::PendingOrOverview),
        (ViewMode::StudentDetail, UserKind::Student) => {
            (Dataset::Students, Landing::List(ListView::Students))
        }
        (ViewMode::AlumniDetail, UserKind::Alumni) => {
            (Dataset::Alumni, Landing::List(ListView::Alumni))
        }
        (ViewMode::Pending, _) => (Dataset::Pending, Landing::Stay),
        _ => (Dataset::for_user(kind), Landing::Stay),
    };

    let invalidates = [Dataset::for_user(kind), Dataset::Pending, Dataset::Stats]
        .into_iter()
        .filter(|d| *d != refetch)
        .collect();

    Followup {
        refetch,
        landing,
        invalidates,
        notice: format!("{} {}", kind.label(), verb),
    }
}

fn activation_followup(kind: UserKind, verb: &str) -> Followup {
    Followup {
        refetch: Dataset::for_user(kind),
        landing: Landing::Stay,
        invalidates: vec![Dataset::Stats],
        notice: format!("{} {}", kind.label(), verb),
    }
}

/// Match workflow actions leave the detail view for the refreshed list.
async fn match_followup(state: &Mutex<ConsoleState>, notice: &str) -> Followup {
    let from = state.lock().await.view;
    let landing = if from == ViewMode::MatchDetail {
        Landing::List(ListView::Matches)
    } else {
        Landing::Stay
    };
    Followup {
        refetch: Dataset::Matches,
        landing,
        invalidates: vec![Dataset::Stats],
        notice: notice.to_string(),
    }
}

fn validate_match_request(
    student_id: String,
    alumni_id: String,
    reasons: Vec<String>,
) -> Result<CreateMatchRequest, ConsoleError> {
    let student_id = student_id.trim().to_string();
    let alumni_id = alumni_id.trim().to_string();
    if student_id.is_empty() || alumni_id.is_empty() {
        return Err(ConsoleError::Validation(
            "Select both a student and an alumni to create a match".to_string(),
        ));
    }
    Ok(CreateMatchRequest {
        student_id,
        alumni_id,
        reasons: reasons
            .into_iter()
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty())
            .collect(),
    })
}

fn validate_admin_request(
    name: String,
    email: String,
    password: String,
) -> Result<CreateAdminRequest, ConsoleError> {
    let name = name.trim().to_string();
    let email = email.trim().to_string();
    if name.is_empty() {
        return Err(ConsoleError::Validation("Name is required".to_string()));
    }
    if !email.contains('@') {
        return Err(ConsoleError::Validation(
            "A valid email is required".to_string(),
        ));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ConsoleError::Validation(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(CreateAdminRequest {
        name,
        email,
        password,
    })
}
