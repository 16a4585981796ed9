use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::warn;

use super::domain::{ApplicationId, ApplicationRecord, ApplicationStatus, RequestedStatus};
use super::events::{ApplicationEvent, ApplicationEventHandler};
use super::repository::{ApplicationStore, StoreError};
use crate::marketplace::directory::{DirectoryError, JobDirectory, JobId, UserId};

static APPLICATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_application_id() -> ApplicationId {
    let id = APPLICATION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ApplicationId(format!("app-{id:06}"))
}

/// Applicant-supplied input for a new submission.
#[derive(Debug, Clone)]
pub struct SubmissionRequest {
    pub job_id: JobId,
    pub applicant_id: UserId,
    pub cover_letter: Option<String>,
    pub resume_ref: Option<String>,
}

/// Error raised by the lifecycle's primary operations. Side-effect
/// failures never appear here.
#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    #[error("application not found")]
    NotFound,
    #[error("job posting not found")]
    JobNotFound,
    #[error("job is not open for applications")]
    JobNotOpen,
    #[error("acting employer does not own this job")]
    Forbidden,
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Directory(#[from] DirectoryError),
}

/// State machine governing an application from submission to a terminal
/// outcome. Emits `ApplicationEvent`s consumed by independent side-effect
/// handlers (chat provisioning, applicant notification).
pub struct ApplicationLifecycle<S, J> {
    applications: Arc<S>,
    jobs: Arc<J>,
    handlers: Vec<Arc<dyn ApplicationEventHandler>>,
}

impl<S, J> ApplicationLifecycle<S, J>
where
    S: ApplicationStore,
    J: JobDirectory,
{
    pub fn new(
        applications: Arc<S>,
        jobs: Arc<J>,
        handlers: Vec<Arc<dyn ApplicationEventHandler>>,
    ) -> Self {
        Self {
            applications,
            jobs,
            handlers,
        }
    }

    /// Create an application with status `submitted`. The job must exist
    /// and be publicly open; a duplicate (job, applicant) pair surfaces
    /// the store's Conflict untouched. No side effects fire at submission.
    pub fn submit(&self, request: SubmissionRequest) -> Result<ApplicationRecord, LifecycleError> {
        let job = self
            .jobs
            .job(&request.job_id)?
            .ok_or(LifecycleError::JobNotFound)?;
        if !job.status.is_open() {
            return Err(LifecycleError::JobNotOpen);
        }

        let now = Utc::now();
        let record = ApplicationRecord {
            id: next_application_id(),
            job_id: request.job_id,
            applicant_id: request.applicant_id,
            cover_letter: request.cover_letter,
            resume_ref: request.resume_ref,
            status: ApplicationStatus::Submitted,
            submitted_at: now,
            updated_at: now,
        };

        let stored = self.applications.insert(record)?;
        Ok(stored)
    }

    /// Apply an employer-requested status change. Ownership is resolved
    /// through the job collaborator; a non-owning employer is rejected
    /// with no change. The status graph is deliberately permissive: any
    /// of the three requested values may overwrite the current status.
    pub fn transition(
        &self,
        application_id: &ApplicationId,
        requested: RequestedStatus,
        acting_employer: &UserId,
    ) -> Result<ApplicationRecord, LifecycleError> {
        let application = self
            .applications
            .fetch(application_id)?
            .ok_or(LifecycleError::NotFound)?;
        let job = self
            .jobs
            .job(&application.job_id)?
            .ok_or(LifecycleError::JobNotFound)?;
        if job.employer_id != *acting_employer {
            return Err(LifecycleError::Forbidden);
        }

        let previous = application.status;
        let updated = self
            .applications
            .update_status(application_id, requested.into(), Utc::now())?;

        self.emit(ApplicationEvent::StatusChanged {
            application: updated.clone(),
            previous,
        });

        Ok(updated)
    }

    pub fn get(&self, application_id: &ApplicationId) -> Result<ApplicationRecord, LifecycleError> {
        self.applications
            .fetch(application_id)?
            .ok_or(LifecycleError::NotFound)
    }

    /// Best-effort fan-out to the registered handlers. Failures are logged
    /// and swallowed; `ensure_channel` idempotency makes re-invocation the
    /// retry path.
    fn emit(&self, event: ApplicationEvent) {
        for handler in &self.handlers {
            if let Err(err) = handler.handle(&event) {
                let ApplicationEvent::StatusChanged { application, .. } = &event;
                warn!(
                    handler = handler.name(),
                    application_id = %application.id.0,
                    "lifecycle side effect failed: {err}"
                );
            }
        }
    }
}
