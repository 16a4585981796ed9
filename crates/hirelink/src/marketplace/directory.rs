//! Collaborator contracts. Job postings, employer accounts, and seeker
//! preference profiles are owned elsewhere; the lifecycle core consumes
//! them through these narrow read-only seams.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Identifier wrapper for job postings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(pub String);

/// Identifier wrapper for user accounts (employers and job seekers alike).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub String);

/// Publication state of a job posting as reported by the job collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Draft,
    Open,
    Closed,
}

impl JobStatus {
    pub const fn is_open(self) -> bool {
        matches!(self, JobStatus::Open)
    }

    pub const fn label(self) -> &'static str {
        match self {
            JobStatus::Draft => "draft",
            JobStatus::Open => "open",
            JobStatus::Closed => "closed",
        }
    }
}

/// Read-model of a job posting: enough to check openness, resolve the
/// owning employer, and synthesize alert text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSnapshot {
    pub id: JobId,
    pub employer_id: UserId,
    pub title: String,
    pub category: Option<String>,
    pub location: Option<String>,
    pub status: JobStatus,
}

/// A job seeker's stored matching preferences. Owned by the user
/// collaborator; consumed read-only during fan-out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferenceProfile {
    pub preferred_categories: BTreeSet<String>,
    pub preferred_locations: BTreeSet<String>,
}

/// One row of the seeker scan fed to the preference matcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeekerProfile {
    pub user_id: UserId,
    pub preferences: PreferenceProfile,
}

/// Collaborator failure. Primary operations surface it; side effects
/// degrade and log instead.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("collaborator lookup unavailable: {0}")]
    Unavailable(String),
}

/// Job collaborator: posting lookup and employer-ownership resolution.
pub trait JobDirectory: Send + Sync {
    fn job(&self, id: &JobId) -> Result<Option<JobSnapshot>, DirectoryError>;
}

/// User collaborator: scan of job seekers with their preference profiles.
pub trait SeekerDirectory: Send + Sync {
    fn job_seekers(&self) -> Result<Vec<SeekerProfile>, DirectoryError>;
}
