//! Typed profile entries attached to student and alumni records.
//!
//! The backend stores these as free-form JSON arrays. They are decoded into concrete
//! records here so that malformed entries fail at the boundary instead of at render time.

use serde::{Deserialize, Serialize};

/// A position held by the user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WorkExperience {
    pub company: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A project the user worked on.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// A certification earned by the user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Certification {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issued_at: Option<String>,
}

/// The profile sections as they appear on a user record.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProfileEntries {
    #[serde(default)]
    pub work_experience: Vec<WorkExperience>,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub certifications: Vec<Certification>,
}

/// A single profile entry, tagged by kind.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ProfileEntry {
    WorkExperience(WorkExperience),
    Project(Project),
    Certification(Certification),
}

impl ProfileEntries {
    /// All entries in display order: work experience, then projects, then certifications.
    pub fn entries(&self) -> Vec<ProfileEntry> {
        self.work_experience
            .iter()
            .cloned()
            .map(ProfileEntry::WorkExperience)
            .chain(self.projects.iter().cloned().map(ProfileEntry::Project))
            .chain(
                self.certifications
                    .iter()
                    .cloned()
                    .map(ProfileEntry::Certification),
            )
            .collect()
    }
}
