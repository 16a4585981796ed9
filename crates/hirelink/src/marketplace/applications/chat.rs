use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;

use super::domain::{ApplicationId, ChannelId, ChatChannel};
use super::repository::{ApplicationStore, ChatChannelStore, StoreError};
use crate::marketplace::directory::{DirectoryError, JobDirectory};

static CHANNEL_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_channel_id() -> ChannelId {
    let id = CHANNEL_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ChannelId(format!("chat-{id:06}"))
}

/// Error raised when a channel cannot be provisioned. The lifecycle treats
/// this as a logged, retryable side-effect failure, never as its own.
#[derive(Debug, thiserror::Error)]
pub enum ProvisionError {
    #[error("application not found")]
    ApplicationNotFound,
    #[error("job posting not found")]
    JobNotFound,
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Directory(#[from] DirectoryError),
}

/// Idempotent creator of the private employer/applicant conversation tied
/// to an application.
pub struct ChatProvisioner<S, C, J> {
    applications: Arc<S>,
    channels: Arc<C>,
    jobs: Arc<J>,
}

impl<S, C, J> ChatProvisioner<S, C, J>
where
    S: ApplicationStore,
    C: ChatChannelStore,
    J: JobDirectory,
{
    pub fn new(applications: Arc<S>, channels: Arc<C>, jobs: Arc<J>) -> Self {
        Self {
            applications,
            channels,
            jobs,
        }
    }

    /// Create-if-absent. Safe to call repeatedly for the same application;
    /// the store's uniqueness constraint on application_id is the source
    /// of truth, so a lost create race resolves by re-fetching the winner.
    pub fn ensure_channel(
        &self,
        application_id: &ApplicationId,
    ) -> Result<ChatChannel, ProvisionError> {
        if let Some(existing) = self.channels.fetch_by_application(application_id)? {
            return Ok(existing);
        }

        let application = self
            .applications
            .fetch(application_id)?
            .ok_or(ProvisionError::ApplicationNotFound)?;
        let job = self
            .jobs
            .job(&application.job_id)?
            .ok_or(ProvisionError::JobNotFound)?;

        let channel = ChatChannel {
            id: next_channel_id(),
            application_id: application_id.clone(),
            employer_id: job.employer_id,
            applicant_id: application.applicant_id,
            created_at: Utc::now(),
        };

        match self.channels.create(channel) {
            Ok(created) => Ok(created),
            Err(StoreError::Conflict) => {
                // Another caller won the create race; their row is the channel.
                self.channels
                    .fetch_by_application(application_id)?
                    .ok_or(ProvisionError::Store(StoreError::NotFound))
            }
            Err(other) => Err(other.into()),
        }
    }
}
