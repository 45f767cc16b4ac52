//! The console state struct and its synchronous transitions.
//!
//! Async work lives in the controller; everything here runs under the session lock and never
//! awaits.

use super::view::{Dataset, ListView, Selection, SubFilters, ViewMode};
use crate::errors::ConsoleError;
use crate::models::{
    AdminAccount, Alumni, ApprovalStatus, DashboardStats, InvitationCode, MatchRecord,
    PendingUsers, Student, UserKind, VerificationCode,
};

/// A collection mirrored from the backend.
#[derive(Debug, Clone, PartialEq)]
pub enum Loaded<T> {
    NotLoaded,
    Ready(T),
    /// Last fetched value, known to be out of date after a mutation.
    Stale(T),
}

impl<T> Default for Loaded<T> {
    fn default() -> Self {
        Loaded::NotLoaded
    }
}

impl<T> Loaded<T> {
    pub fn get(&self) -> Option<&T> {
        match self {
            Loaded::NotLoaded => None,
            Loaded::Ready(value) | Loaded::Stale(value) => Some(value),
        }
    }

    pub fn is_stale(&self) -> bool {
        matches!(self, Loaded::Stale(_))
    }

    pub fn mark_stale(&mut self) {
        *self = match std::mem::take(self) {
            Loaded::Ready(value) => Loaded::Stale(value),
            other => other,
        };
    }
}

impl<U> Loaded<Vec<U>> {
    pub fn items(&self) -> &[U] {
        self.get().map(Vec::as_slice).unwrap_or(&[])
    }
}

/// A payload fetched for one dataset.
#[derive(Debug, Clone)]
pub enum Fetched {
    Stats(DashboardStats),
    Students(Vec<Student>),
    Alumni(Vec<Alumni>),
    Matches(Vec<MatchRecord>),
    Pending(PendingUsers),
    Admins(Vec<AdminAccount>),
    InvitationCodes(Vec<InvitationCode>),
    VerificationCodes(Vec<VerificationCode>),
}

impl Fetched {
    /// An empty payload, shown when a collection that was never loaded fails to load.
    pub fn empty(dataset: Dataset) -> Self {
        match dataset {
            Dataset::Stats => Fetched::Stats(DashboardStats::default()),
            Dataset::Students => Fetched::Students(Vec::new()),
            Dataset::Alumni => Fetched::Alumni(Vec::new()),
            Dataset::Matches => Fetched::Matches(Vec::new()),
            Dataset::Pending => Fetched::Pending(PendingUsers::default()),
            Dataset::Admins => Fetched::Admins(Vec::new()),
            Dataset::InvitationCodes => Fetched::InvitationCodes(Vec::new()),
            Dataset::VerificationCodes => Fetched::VerificationCodes(Vec::new()),
        }
    }
}

/// Identifies the transition a fetch was started under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// Everything the admin console shows, in one place.
#[derive(Debug, Clone, Default)]
pub struct ConsoleState {
    pub view: ViewMode,
    pub filters: SubFilters,
    pub selection: Option<Selection>,

    pub stats: Loaded<DashboardStats>,
    pub students: Loaded<Vec<Student>>,
    pub alumni: Loaded<Vec<Alumni>>,
    pub matches: Loaded<Vec<MatchRecord>>,
    pub pending: Loaded<PendingUsers>,
    pub admins: Loaded<Vec<AdminAccount>>,
    pub invitation_codes: Loaded<Vec<InvitationCode>>,
    pub verification_codes: Loaded<Vec<VerificationCode>>,

    pub loading: bool,
    /// Set when the statistics load failed; the dashboard cannot render.
    pub blocked: Option<String>,
    /// Inline error banner.
    pub error: Option<String>,
    /// Confirmation of the last successful action.
    pub notice: Option<String>,
    /// The backend rejected our credentials; the token owner has to step in.
    pub session_expired: bool,

    generation: u64,
}

impl ConsoleState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Start an async transition. Any transition still in flight becomes stale.
    pub fn begin(&mut self) -> Ticket {
        self.generation += 1;
        self.loading = true;
        Ticket(self.generation)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.generation
    }

    /// Clear the loading flag if `ticket` is still current.
    pub fn finish(&mut self, ticket: Ticket) {
        if self.is_current(ticket) {
            self.loading = false;
        }
    }

    /// Synchronous navigation: supersede anything in flight.
    fn interrupt(&mut self) {
        self.generation += 1;
        self.loading = false;
    }

    /// Record a failure for the admin. Authentication failures raise the expiry flag instead of
    /// the banner.
    pub fn report(&mut self, err: &ConsoleError) {
        if err.is_auth_failure() {
            tracing::info!("Backend session expired: {}", err.message());
            self.session_expired = true;
        } else {
            self.error = Some(err.message());
        }
        self.notice = None;
    }

    /// Apply a failed transition. Returns false if the ticket was superseded.
    pub fn fail(&mut self, ticket: Ticket, err: &ConsoleError) -> bool {
        if !self.is_current(ticket) {
            tracing::debug!("Discarding stale failure: {}", err);
            return false;
        }
        self.loading = false;
        self.report(err);
        true
    }

    pub fn store(&mut self, fetched: Fetched) {
        match fetched {
            Fetched::Stats(stats) => {
                self.stats = Loaded::Ready(stats);
                self.blocked = None;
            }
            Fetched::Students(v) => self.students = Loaded::Ready(v),
            Fetched::Alumni(v) => self.alumni = Loaded::Ready(v),
            Fetched::Matches(v) => self.matches = Loaded::Ready(v),
            Fetched::Pending(v) => self.pending = Loaded::Ready(v),
            Fetched::Admins(v) => self.admins = Loaded::Ready(v),
            Fetched::InvitationCodes(v) => self.invitation_codes = Loaded::Ready(v),
            Fetched::VerificationCodes(v) => self.verification_codes = Loaded::Ready(v),
        }
    }

    pub fn mark_stale(&mut self, dataset: Dataset) {
        match dataset {
            Dataset::Stats => self.stats.mark_stale(),
            Dataset::Students => self.students.mark_stale(),
            Dataset::Alumni => self.alumni.mark_stale(),
            Dataset::Matches => self.matches.mark_stale(),
            Dataset::Pending => self.pending.mark_stale(),
            Dataset::Admins => self.admins.mark_stale(),
            Dataset::InvitationCodes => self.invitation_codes.mark_stale(),
            Dataset::VerificationCodes => self.verification_codes.mark_stale(),
        }
    }

    pub fn is_loaded(&self, dataset: Dataset) -> bool {
        match dataset {
            Dataset::Stats => self.stats.get().is_some(),
            Dataset::Students => self.students.get().is_some(),
            Dataset::Alumni => self.alumni.get().is_some(),
            Dataset::Matches => self.matches.get().is_some(),
            Dataset::Pending => self.pending.get().is_some(),
            Dataset::Admins => self.admins.get().is_some(),
            Dataset::InvitationCodes => self.invitation_codes.get().is_some(),
            Dataset::VerificationCodes => self.verification_codes.get().is_some(),
        }
    }

    /// A refresh of `dataset` failed: keep what was loaded and flag it stale, or show an
    /// empty collection if nothing was loaded yet.
    pub fn degrade(&mut self, dataset: Dataset) {
        if self.is_loaded(dataset) {
            self.mark_stale(dataset);
        } else {
            self.store(Fetched::empty(dataset));
        }
    }

    /// The dataset the active list or detail view is drawn from.
    pub fn active_dataset(&self) -> Option<Dataset> {
        self.view.list().map(|list| list.dataset())
    }

    pub fn stale_datasets(&self) -> Vec<Dataset> {
        let flags = [
            (Dataset::Stats, self.stats.is_stale()),
            (Dataset::Students, self.students.is_stale()),
            (Dataset::Alumni, self.alumni.is_stale()),
            (Dataset::Matches, self.matches.is_stale()),
            (Dataset::Pending, self.pending.is_stale()),
            (Dataset::Admins, self.admins.is_stale()),
            (Dataset::InvitationCodes, self.invitation_codes.is_stale()),
            (Dataset::VerificationCodes, self.verification_codes.is_stale()),
        ];
        flags
            .into_iter()
            .filter_map(|(dataset, stale)| stale.then_some(dataset))
            .collect()
    }

    /// Show a list whose collection has just been stored.
    pub fn enter_list(&mut self, list: ListView) {
        self.view = list.view();
        self.selection = None;
    }

    /// Return home: clear the selection and reset every sub-filter.
    pub fn go_overview(&mut self) {
        self.interrupt();
        self.enter_overview();
    }

    pub(crate) fn enter_overview(&mut self) {
        self.view = ViewMode::Overview;
        self.selection = None;
        self.filters = SubFilters::default();
    }

    /// Detail views return to the list they were opened from; lists return to the overview.
    pub fn back(&mut self) {
        if self.view == ViewMode::Overview {
            return;
        }
        if !self.view.is_detail() {
            self.go_overview();
            return;
        }

        let origin = match &self.selection {
            Some(Selection::Pending { origin, .. }) => Some(*origin),
            _ => self.view.list(),
        };
        self.interrupt();
        match origin {
            Some(list) => self.enter_list(list),
            None => self.enter_overview(),
        }
    }

    /// Pending students get the approval workflow instead of the plain detail view.
    pub fn select_student(&mut self, id: &str) -> Result<(), ConsoleError> {
        let student = self
            .students
            .items()
            .iter()
            .find(|s| s.id == id)
            .ok_or_else(|| ConsoleError::NotFound(format!("Student {} not found", id)))?;

        let pending = student.approval_status == ApprovalStatus::Pending;
        self.interrupt();
        if pending {
            self.view = ViewMode::PendingDetail;
            self.selection = Some(Selection::Pending {
                kind: UserKind::Student,
                id: id.to_string(),
                origin: ListView::Students,
            });
        } else {
            self.view = ViewMode::StudentDetail;
            self.selection = Some(Selection::Student { id: id.to_string() });
        }
        Ok(())
    }

    pub fn select_alumni(&mut self, id: &str) -> Result<(), ConsoleError> {
        let alumni = self
            .alumni
            .items()
            .iter()
            .find(|a| a.id == id)
            .ok_or_else(|| ConsoleError::NotFound(format!("Alumni {} not found", id)))?;

        let pending = alumni.approval_status == ApprovalStatus::Pending;
        self.interrupt();
        if pending {
            self.view = ViewMode::PendingDetail;
            self.selection = Some(Selection::Pending {
                kind: UserKind::Alumni,
                id: id.to_string(),
                origin: ListView::Alumni,
            });
        } else {
            self.view = ViewMode::AlumniDetail;
            self.selection = Some(Selection::Alumni { id: id.to_string() });
        }
        Ok(())
    }

    pub fn select_match(&mut self, id: &str) -> Result<(), ConsoleError> {
        if !self.matches.items().iter().any(|m| m.id == id) {
            return Err(ConsoleError::NotFound(format!("Match {} not found", id)));
        }
        self.interrupt();
        self.view = ViewMode::MatchDetail;
        self.selection = Some(Selection::Match { id: id.to_string() });
        Ok(())
    }

    pub fn select_pending(&mut self, kind: UserKind, id: &str) -> Result<(), ConsoleError> {
        let known = self.pending.get().is_some_and(|p| p.contains(kind, id));
        if !known {
            return Err(ConsoleError::NotFound(format!(
                "{} {} is not awaiting approval",
                kind.label(),
                id
            )));
        }
        self.interrupt();
        self.view = ViewMode::PendingDetail;
        self.selection = Some(Selection::Pending {
            kind,
            id: id.to_string(),
            origin: ListView::Pending,
        });
        Ok(())
    }

    /// Whether the selected entity is still present in its collection.
    fn selection_present(&self) -> bool {
        match &self.selection {
            None => true,
            Some(Selection::Student { id }) => self.students.items().iter().any(|s| &s.id == id),
            Some(Selection::Alumni { id }) => self.alumni.items().iter().any(|a| &a.id == id),
            Some(Selection::Match { id }) => self.matches.items().iter().any(|m| &m.id == id),
            Some(Selection::Pending { kind, id, origin }) => match origin {
                ListView::Pending => self.pending.get().is_some_and(|p| p.contains(*kind, id)),
                ListView::Alumni => self.alumni.items().iter().any(|a| &a.id == id),
                _ => self.students.items().iter().any(|s| &s.id == id),
            },
        }
    }

    /// Drop back to the list if the detail view's entity disappeared after a refetch.
    pub fn reconcile_selection(&mut self) {
        if !self.view.is_detail() || self.selection_present() {
            return;
        }
        match self.view.list() {
            Some(list) => self.enter_list(list),
            None => self.enter_overview(),
        }
    }

    pub fn find_student(&self, id: &str) -> Option<&Student> {
        self.students
            .items()
            .iter()
            .chain(self.pending.get().into_iter().flat_map(|p| p.students.iter()))
            .find(|s| s.id == id)
    }

    pub fn find_alumni(&self, id: &str) -> Option<&Alumni> {
        self.alumni
            .items()
            .iter()
            .chain(self.pending.get().into_iter().flat_map(|p| p.alumni.iter()))
            .find(|a| a.id == id)
    }
}
