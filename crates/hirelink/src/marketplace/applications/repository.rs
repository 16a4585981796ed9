use chrono::{DateTime, Utc};

use super::domain::{ApplicationId, ApplicationRecord, ApplicationStatus, ChatChannel};
use crate::marketplace::directory::{JobId, UserId};

/// Error enumeration for storage failures. `Conflict` doubles as the
/// optimistic-uniqueness signal: duplicate (job, applicant) submissions
/// and duplicate channel creates both surface through it.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Durable application storage. Implementations must enforce uniqueness on
/// (job_id, applicant_id) at insert time and serialize concurrent status
/// updates for the same application.
pub trait ApplicationStore: Send + Sync {
    fn insert(&self, record: ApplicationRecord) -> Result<ApplicationRecord, StoreError>;

    /// The only mutation path: overwrites status and bumps `updated_at`.
    fn update_status(
        &self,
        id: &ApplicationId,
        status: ApplicationStatus,
        updated_at: DateTime<Utc>,
    ) -> Result<ApplicationRecord, StoreError>;

    fn fetch(&self, id: &ApplicationId) -> Result<Option<ApplicationRecord>, StoreError>;

    fn find_by_job_and_applicant(
        &self,
        job_id: &JobId,
        applicant_id: &UserId,
    ) -> Result<Option<ApplicationRecord>, StoreError>;
}

/// Chat channel storage, unique on application_id. A create racing against
/// another create must resolve to one winner; the loser sees `Conflict`
/// and re-fetches.
pub trait ChatChannelStore: Send + Sync {
    fn create(&self, channel: ChatChannel) -> Result<ChatChannel, StoreError>;

    fn fetch_by_application(
        &self,
        application_id: &ApplicationId,
    ) -> Result<Option<ChatChannel>, StoreError>;

    /// Channels where the user is either party, newest first.
    fn list_for_user(&self, user_id: &UserId) -> Result<Vec<ChatChannel>, StoreError>;
}
