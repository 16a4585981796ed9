use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::marketplace::directory::{JobId, UserId};

/// Identifier wrapper for submitted applications.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApplicationId(pub String);

/// Identifier wrapper for provisioned chat channels.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChannelId(pub String);

/// Status tracked through the application lifecycle. `Submitted` is the
/// initial state; `Accepted` and `Rejected` are terminal for this core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Submitted,
    Shortlisted,
    Accepted,
    Rejected,
}

impl ApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Submitted => "submitted",
            ApplicationStatus::Shortlisted => "shortlisted",
            ApplicationStatus::Accepted => "accepted",
            ApplicationStatus::Rejected => "rejected",
        }
    }

    /// An engaged status signals the employer intends further interaction
    /// and triggers chat provisioning.
    pub const fn is_engaged(self) -> bool {
        matches!(
            self,
            ApplicationStatus::Shortlisted | ApplicationStatus::Accepted
        )
    }

    /// Applicant-facing wording for the status-change notification.
    pub const fn applicant_message(self) -> &'static str {
        match self {
            ApplicationStatus::Submitted => "your application has been received",
            ApplicationStatus::Shortlisted => "you have been shortlisted",
            ApplicationStatus::Accepted => "your application has been accepted",
            ApplicationStatus::Rejected => "you were not selected this time",
        }
    }
}

/// Status values an employer may request through `transition`. The initial
/// `submitted` state is reachable only via submission, so it is excluded
/// by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestedStatus {
    Shortlisted,
    Accepted,
    Rejected,
}

impl From<RequestedStatus> for ApplicationStatus {
    fn from(value: RequestedStatus) -> Self {
        match value {
            RequestedStatus::Shortlisted => ApplicationStatus::Shortlisted,
            RequestedStatus::Accepted => ApplicationStatus::Accepted,
            RequestedStatus::Rejected => ApplicationStatus::Rejected,
        }
    }
}

/// Durable record of one (job, applicant) submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationRecord {
    pub id: ApplicationId,
    pub job_id: JobId,
    pub applicant_id: UserId,
    pub cover_letter: Option<String>,
    pub resume_ref: Option<String>,
    pub status: ApplicationStatus,
    pub submitted_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ApplicationRecord {
    pub fn status_view(&self) -> ApplicationStatusView {
        ApplicationStatusView {
            application_id: self.id.clone(),
            job_id: self.job_id.clone(),
            applicant_id: self.applicant_id.clone(),
            status: self.status.label(),
            submitted_at: self.submitted_at,
            updated_at: self.updated_at,
        }
    }
}

/// A private two-party conversation derived from an engaged application.
/// At most one channel exists per application; once created it is never
/// retracted, even if the status later leaves the engaged set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatChannel {
    pub id: ChannelId,
    pub application_id: ApplicationId,
    pub employer_id: UserId,
    pub applicant_id: UserId,
    pub created_at: DateTime<Utc>,
}

/// Sanitized representation of an application's exposed status.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationStatusView {
    pub application_id: ApplicationId,
    pub job_id: JobId,
    pub applicant_id: UserId,
    pub status: &'static str,
    pub submitted_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
