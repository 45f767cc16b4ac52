//! Render-ready projection of the console state.

use chrono::Utc;
use serde::Serialize;

use super::aggregate::{effective_match_status, Aggregates, EffectiveMatchStatus, MatchIndex};
use super::state::ConsoleState;
use super::view::{Dataset, Selection, SubFilters, ViewMode};
use crate::models::{
    AdminAccount, Alumni, DashboardStats, InvitationCode, MatchRecord, ProfileEntry, Student,
    UserKind, UserRecord, VerificationCode,
};

/// A person in a list, with their match badge.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonRow<T> {
    #[serde(flatten)]
    pub person: T,
    pub match_status: EffectiveMatchStatus,
    pub badge: &'static str,
}

impl<T> PersonRow<T> {
    fn new(person: T, match_status: EffectiveMatchStatus) -> Self {
        Self {
            person,
            match_status,
            badge: match_status.label(),
        }
    }
}

/// A row in the pending approvals list.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingRow {
    pub kind: UserKind,
    pub id: String,
    pub name: String,
    pub email: String,
}

/// Overview extras besides the stat cards.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewContent {
    pub invitation_codes: Vec<InvitationCode>,
    pub verification_codes: Vec<VerificationCode>,
}

/// The collection shown by the active list view, after sub-filtering.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", content = "items", rename_all = "camelCase")]
pub enum ListContent {
    Students(Vec<PersonRow<Student>>),
    Alumni(Vec<PersonRow<Alumni>>),
    Matches(Vec<MatchRecord>),
    Pending(Vec<PendingRow>),
    Admins(Vec<AdminAccount>),
}

/// The entity shown by the active detail view.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum DetailContent {
    Student {
        student: Student,
        match_status: EffectiveMatchStatus,
        badge: &'static str,
        matches: Vec<MatchRecord>,
        profile: Vec<ProfileEntry>,
    },
    Alumni {
        alumni: Alumni,
        match_status: EffectiveMatchStatus,
        badge: &'static str,
        matches: Vec<MatchRecord>,
        profile: Vec<ProfileEntry>,
    },
    Match {
        record: MatchRecord,
        student: Option<Student>,
        alumni: Option<Alumni>,
    },
    PendingStudent {
        student: Student,
        profile: Vec<ProfileEntry>,
    },
    PendingAlumni {
        alumni: Alumni,
        profile: Vec<ProfileEntry>,
    },
}

/// What a front end needs to draw the console.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub view: ViewMode,
    pub filters: SubFilters,
    pub selection: Option<Selection>,
    pub loading: bool,
    pub blocked: Option<String>,
    pub error: Option<String>,
    pub notice: Option<String>,
    pub session_expired: bool,
    pub generation: u64,
    pub stats: Option<DashboardStats>,
    pub aggregates: Aggregates,
    pub stale: Vec<Dataset>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overview: Option<OverviewContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list: Option<ListContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<DetailContent>,
}

impl Snapshot {
    pub fn of(state: &ConsoleState) -> Self {
        let aggregates = Aggregates::derive(
            state.matches.items(),
            state.students.items(),
            state.alumni.items(),
            state.pending.get().map(|p| p.len()),
            state.invitation_codes.items(),
            Utc::now(),
        );

        let overview = (state.view == ViewMode::Overview).then(|| OverviewContent {
            invitation_codes: state.invitation_codes.items().to_vec(),
            verification_codes: state.verification_codes.items().to_vec(),
        });

        Self {
            view: state.view,
            filters: state.filters,
            selection: state.selection.clone(),
            loading: state.loading,
            blocked: state.blocked.clone(),
            error: state.error.clone(),
            notice: state.notice.clone(),
            session_expired: state.session_expired,
            generation: state.generation(),
            stats: state.stats.get().cloned(),
            aggregates,
            stale: state.stale_datasets(),
            overview,
            list: list_content(state),
            detail: detail_content(state),
        }
    }
}

fn people<T: UserRecord + Clone>(
    items: &[T],
    accept: impl Fn(&T) -> bool,
    index: &MatchIndex<'_>,
) -> Vec<PersonRow<T>> {
    items
        .iter()
        .filter(|p| accept(p))
        .map(|p| PersonRow::new(p.clone(), index.status(p.id())))
        .collect()
}

fn list_content(state: &ConsoleState) -> Option<ListContent> {
    let index = MatchIndex::build(state.matches.items());
    let filters = &state.filters;

    let content = match state.view {
        ViewMode::Students => ListContent::Students(people(
            state.students.items(),
            |s| filters.students.accepts(s.approval_status),
            &index,
        )),
        ViewMode::Alumni => ListContent::Alumni(people(
            state.alumni.items(),
            |a| filters.alumni.accepts(a.approval_status),
            &index,
        )),
        ViewMode::Matches => ListContent::Matches(
            state
                .matches
                .items()
                .iter()
                .filter(|m| filters.matches.accepts(m.status))
                .cloned()
                .collect(),
        ),
        ViewMode::Pending => {
            let pending = state.pending.get();
            let students = pending.into_iter().flat_map(|p| {
                p.students.iter().map(|s| PendingRow {
                    kind: UserKind::Student,
                    id: s.id.clone(),
                    name: s.name.clone(),
                    email: s.email.clone(),
                })
            });
            let alumni = pending.into_iter().flat_map(|p| {
                p.alumni.iter().map(|a| PendingRow {
                    kind: UserKind::Alumni,
                    id: a.id.clone(),
                    name: a.name.clone(),
                    email: a.email.clone(),
                })
            });
            ListContent::Pending(
                students
                    .chain(alumni)
                    .filter(|row| filters.pending.accepts(row.kind))
                    .collect(),
            )
        }
        ViewMode::Admins => ListContent::Admins(state.admins.items().to_vec()),
        _ => return None,
    };
    Some(content)
}

fn matches_of(person_id: &str, matches: &[MatchRecord]) -> Vec<MatchRecord> {
    matches
        .iter()
        .filter(|m| m.involves(person_id))
        .cloned()
        .collect()
}

fn detail_content(state: &ConsoleState) -> Option<DetailContent> {
    let matches = state.matches.items();

    match state.selection.as_ref()? {
        Selection::Student { id } => {
            let student = state.find_student(id)?.clone();
            let match_status = effective_match_status(id, matches);
            Some(DetailContent::Student {
                profile: student.profile.entries(),
                student,
                match_status,
                badge: match_status.label(),
                matches: matches_of(id, matches),
            })
        }
        Selection::Alumni { id } => {
            let alumni = state.find_alumni(id)?.clone();
            let match_status = effective_match_status(id, matches);
            Some(DetailContent::Alumni {
                profile: alumni.profile.entries(),
                alumni,
                match_status,
                badge: match_status.label(),
                matches: matches_of(id, matches),
            })
        }
        Selection::Match { id } => {
            let record = matches.iter().find(|m| &m.id == id)?.clone();
            Some(DetailContent::Match {
                student: state.find_student(&record.student_id).cloned(),
                alumni: state.find_alumni(&record.alumni_id).cloned(),
                record,
            })
        }
        Selection::Pending {
            kind: UserKind::Student,
            id,
            ..
        } => {
            let student = state.find_student(id)?.clone();
            Some(DetailContent::PendingStudent {
                profile: student.profile.entries(),
                student,
            })
        }
        Selection::Pending {
            kind: UserKind::Alumni,
            id,
            ..
        } => {
            let alumni = state.find_alumni(id)?.clone();
            Some(DetailContent::PendingAlumni {
                profile: alumni.profile.entries(),
                alumni,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::stub::{alumni, match_record, student};
    use crate::models::{ApprovalStatus, MatchStatus};
    use crate::navigator::state::Fetched;
    use crate::navigator::view::{ApprovalFilter, ListView};

    #[test]
    fn test_student_list_is_filtered_and_badged() {
        let mut state = ConsoleState::new();
        state.store(Fetched::Students(vec![
            student("s1", ApprovalStatus::Approved),
            student("s2", ApprovalStatus::Pending),
        ]));
        state.store(Fetched::Matches(vec![
            match_record("m1", "s1", "a1", MatchStatus::Pending),
            match_record("m2", "s1", "a2", MatchStatus::Accepted),
        ]));
        state.enter_list(ListView::Students);
        state.filters.students = ApprovalFilter::Approved;

        let snapshot = Snapshot::of(&state);
        let Some(ListContent::Students(rows)) = snapshot.list else {
            panic!("expected student list");
        };

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].person.id, "s1");
        assert_eq!(rows[0].badge, "Matched");
        assert!(snapshot.overview.is_none());
    }

    #[test]
    fn test_match_detail_resolves_people() {
        let mut state = ConsoleState::new();
        state.store(Fetched::Students(vec![student("s1", ApprovalStatus::Approved)]));
        state.store(Fetched::Alumni(vec![alumni("a1", ApprovalStatus::Approved)]));
        state.store(Fetched::Matches(vec![match_record(
            "m1",
            "s1",
            "a1",
            MatchStatus::Confirmed,
        )]));
        state.select_match("m1").unwrap();

        let value = serde_json::to_value(Snapshot::of(&state)).unwrap();

        assert_eq!(value["view"], "matchDetail");
        assert_eq!(value["detail"]["kind"], "match");
        assert_eq!(value["detail"]["record"]["status"], "confirmed");
        assert_eq!(value["detail"]["student"]["id"], "s1");
        assert_eq!(value["detail"]["alumni"]["id"], "a1");
    }

    #[test]
    fn test_overview_snapshot_serializes_camel_case() {
        let state = ConsoleState::new();
        let value = serde_json::to_value(Snapshot::of(&state)).unwrap();

        assert_eq!(value["view"], "overview");
        assert_eq!(value["sessionExpired"], false);
        assert_eq!(value["aggregates"]["activeMatches"], 0);
        assert_eq!(value["filters"]["students"], "all");
        assert!(value["overview"]["invitationCodes"].is_array());
        assert!(value.get("list").is_none());
    }
}
