//! Summary counts and match badges derived from the loaded collections.
//!
//! Nothing here is stored on the console state: every value is recomputed from the source
//! collections when a snapshot is taken.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{ApprovalStatus, InvitationCode, MatchRecord, MatchStatus, UserRecord};

/// A person's match badge. Variant order is badge priority.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "camelCase")]
pub enum EffectiveMatchStatus {
    NotInMatch,
    Pending,
    Confirmed,
    Matched,
}

impl EffectiveMatchStatus {
    /// Statuses outside the pending/confirmed/accepted path do not contribute a badge.
    fn from_status(status: MatchStatus) -> Option<Self> {
        match status {
            MatchStatus::Accepted => Some(EffectiveMatchStatus::Matched),
            MatchStatus::Confirmed => Some(EffectiveMatchStatus::Confirmed),
            MatchStatus::Pending => Some(EffectiveMatchStatus::Pending),
            MatchStatus::Cancelled | MatchStatus::Completed => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EffectiveMatchStatus::Matched => "Matched",
            EffectiveMatchStatus::Confirmed => "Confirmed",
            EffectiveMatchStatus::Pending => "Pending match",
            EffectiveMatchStatus::NotInMatch => "Not in match",
        }
    }
}

/// Highest-priority status among the matches referencing `person_id`.
pub fn effective_match_status(person_id: &str, matches: &[MatchRecord]) -> EffectiveMatchStatus {
    matches
        .iter()
        .filter(|m| m.involves(person_id))
        .filter_map(|m| EffectiveMatchStatus::from_status(m.status))
        .max()
        .unwrap_or(EffectiveMatchStatus::NotInMatch)
}

/// Badge lookup for a whole list, built in one pass over the matches.
pub struct MatchIndex<'a> {
    best: HashMap<&'a str, EffectiveMatchStatus>,
}

impl<'a> MatchIndex<'a> {
    pub fn build(matches: &'a [MatchRecord]) -> Self {
        let mut best: HashMap<&'a str, EffectiveMatchStatus> = HashMap::new();
        for record in matches {
            let Some(status) = EffectiveMatchStatus::from_status(record.status) else {
                continue;
            };
            for person in [record.student_id.as_str(), record.alumni_id.as_str()] {
                let entry = best.entry(person).or_insert(status);
                *entry = (*entry).max(status);
            }
        }
        Self { best }
    }

    pub fn status(&self, person_id: &str) -> EffectiveMatchStatus {
        self.best
            .get(person_id)
            .copied()
            .unwrap_or(EffectiveMatchStatus::NotInMatch)
    }
}

/// Counts shown on the overview cards that depend on loaded collections.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Aggregates {
    pub active_matches: usize,
    pub pending_matches: usize,
    pub cancelled_matches: usize,
    pub completed_matches: usize,
    pub pending_approvals: usize,
    pub available_invitation_codes: usize,
}

impl Aggregates {
    /// `pending_users` is the size of the pending collection when it is loaded; otherwise
    /// pending approvals are counted from the student and alumni lists.
    pub fn derive<S: UserRecord, A: UserRecord>(
        matches: &[MatchRecord],
        students: &[S],
        alumni: &[A],
        pending_users: Option<usize>,
        invitation_codes: &[InvitationCode],
        now: DateTime<Utc>,
    ) -> Self {
        let count = |pred: fn(MatchStatus) -> bool| {
            matches.iter().filter(|m| pred(m.status)).count()
        };

        let pending_approvals = pending_users.unwrap_or_else(|| {
            students
                .iter()
                .filter(|s| s.approval_status() == ApprovalStatus::Pending)
                .count()
                + alumni
                    .iter()
                    .filter(|a| a.approval_status() == ApprovalStatus::Pending)
                    .count()
        });

        Self {
            active_matches: count(|s: MatchStatus| s.is_active()),
            pending_matches: count(|s: MatchStatus| s == MatchStatus::Pending),
            cancelled_matches: count(|s: MatchStatus| s == MatchStatus::Cancelled),
            completed_matches: count(|s: MatchStatus| s == MatchStatus::Completed),
            pending_approvals,
            available_invitation_codes: invitation_codes
                .iter()
                .filter(|c| c.is_available(now))
                .count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::stub::{match_record, student};
    use crate::models::Student;

    #[test]
    fn test_accepted_wins_over_pending() {
        let matches = vec![
            match_record("m1", "a", "x", MatchStatus::Pending),
            match_record("m2", "a", "y", MatchStatus::Accepted),
        ];

        let status = effective_match_status("a", &matches);
        assert_eq!(status, EffectiveMatchStatus::Matched);
        assert_eq!(status.label(), "Matched");
    }

    #[test]
    fn test_confirmed_wins_over_pending() {
        let matches = vec![
            match_record("m1", "s", "a", MatchStatus::Confirmed),
            match_record("m2", "s", "b", MatchStatus::Pending),
        ];

        assert_eq!(
            effective_match_status("s", &matches),
            EffectiveMatchStatus::Confirmed
        );
    }

    #[test]
    fn test_no_match_or_only_closed_matches() {
        let matches = vec![
            match_record("m1", "s", "a", MatchStatus::Cancelled),
            match_record("m2", "s", "b", MatchStatus::Completed),
        ];

        assert_eq!(
            effective_match_status("s", &matches),
            EffectiveMatchStatus::NotInMatch
        );
        assert_eq!(
            effective_match_status("nobody", &matches),
            EffectiveMatchStatus::NotInMatch
        );
    }

    #[test]
    fn test_index_agrees_with_scan() {
        let matches = vec![
            match_record("m1", "s1", "a1", MatchStatus::Pending),
            match_record("m2", "s1", "a2", MatchStatus::Accepted),
            match_record("m3", "s2", "a1", MatchStatus::Confirmed),
            match_record("m4", "s3", "a3", MatchStatus::Cancelled),
        ];
        let index = MatchIndex::build(&matches);

        for person in ["s1", "s2", "s3", "a1", "a2", "a3", "zz"] {
            assert_eq!(
                index.status(person),
                effective_match_status(person, &matches),
                "badge mismatch for {}",
                person
            );
        }
    }

    #[test]
    fn test_aggregates_from_collections() {
        let matches = vec![
            match_record("m1", "s1", "a1", MatchStatus::Pending),
            match_record("m2", "s2", "a1", MatchStatus::Accepted),
            match_record("m3", "s3", "a2", MatchStatus::Confirmed),
            match_record("m4", "s4", "a2", MatchStatus::Cancelled),
        ];
        let students = vec![
            student("s1", ApprovalStatus::Pending),
            student("s2", ApprovalStatus::Approved),
        ];
        let alumni: Vec<Student> = vec![student("a1", ApprovalStatus::Pending)];

        let agg = Aggregates::derive(&matches, &students, &alumni, None, &[], Utc::now());

        assert_eq!(agg.active_matches, 2);
        assert_eq!(agg.pending_matches, 1);
        assert_eq!(agg.cancelled_matches, 1);
        assert_eq!(agg.completed_matches, 0);
        assert_eq!(agg.pending_approvals, 2);

        let agg = Aggregates::derive(&matches, &students, &alumni, Some(5), &[], Utc::now());
        assert_eq!(agg.pending_approvals, 5);
    }

    #[test]
    fn test_aggregates_empty_when_matches_missing() {
        let agg = Aggregates::derive::<Student, Student>(&[], &[], &[], None, &[], Utc::now());
        assert_eq!(agg, Aggregates::default());
    }
}
