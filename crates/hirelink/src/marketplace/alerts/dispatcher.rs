use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::debug;

use super::domain::{NotificationCategory, NotificationId, NotificationRecord, RelatedEntity};
use super::repository::NotificationStore;
use crate::marketplace::applications::domain::{ApplicationRecord, ApplicationStatus};
use crate::marketplace::applications::repository::StoreError;
use crate::marketplace::directory::{JobSnapshot, UserId};

static NOTIFICATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_notification_id() -> NotificationId {
    let id = NOTIFICATION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    NotificationId(format!("ntf-{id:06}"))
}

/// Error raised by dispatch and read-flag operations.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("notification not found")]
    NotFound,
    #[error("acting user is not the recipient")]
    Forbidden,
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Persists notification records for matched seekers and for lifecycle
/// transitions, and owns the recipient-gated read-flag mutations.
pub struct NotificationDispatcher<N> {
    store: Arc<N>,
}

impl<N> NotificationDispatcher<N>
where
    N: NotificationStore,
{
    pub fn new(store: Arc<N>) -> Self {
        Self { store }
    }

    /// One `job_alert` record per matched recipient, written as a single
    /// batch so the fan-out is all-or-nothing. An empty recipient set is
    /// a successful no-op.
    pub fn dispatch_job_alerts(
        &self,
        job: &JobSnapshot,
        recipients: &[UserId],
    ) -> Result<usize, DispatchError> {
        if recipients.is_empty() {
            return Ok(0);
        }

        let created_at = Utc::now();
        let records = recipients
            .iter()
            .map(|recipient| NotificationRecord {
                id: next_notification_id(),
                recipient_id: recipient.clone(),
                category: NotificationCategory::JobAlert,
                subject: format!("New job: {}", job.title),
                body: job_alert_body(job),
                related: RelatedEntity::Job(job.id.clone()),
                read: false,
                created_at,
            })
            .collect();

        Ok(self.store.insert_batch(records)?)
    }

    /// Exactly one `application_update` record for the applicant. The
    /// employer side is never notified through this path.
    pub fn dispatch_status_change(
        &self,
        application: &ApplicationRecord,
        previous: ApplicationStatus,
    ) -> Result<NotificationRecord, DispatchError> {
        debug!(
            application_id = %application.id.0,
            from = previous.label(),
            to = application.status.label(),
            "recording status-change notification"
        );

        let record = NotificationRecord {
            id: next_notification_id(),
            recipient_id: application.applicant_id.clone(),
            category: NotificationCategory::ApplicationUpdate,
            subject: format!("Application {}", application.status.label()),
            body: format!(
                "Update on your application: {}.",
                application.status.applicant_message()
            ),
            related: RelatedEntity::Application(application.id.clone()),
            read: false,
            created_at: Utc::now(),
        };

        self.store.insert_batch(vec![record.clone()])?;
        Ok(record)
    }

    /// Recipient-gated, idempotent read-flag flip.
    pub fn mark_read(
        &self,
        id: &NotificationId,
        acting_user: &UserId,
    ) -> Result<NotificationRecord, DispatchError> {
        let record = self.store.fetch(id)?.ok_or(DispatchError::NotFound)?;
        if record.recipient_id != *acting_user {
            return Err(DispatchError::Forbidden);
        }
        if record.read {
            return Ok(record);
        }

        Ok(self.store.mark_read(id)?)
    }

    /// Flips every unread record for the recipient; returns the count.
    pub fn mark_all_read(&self, acting_user: &UserId) -> Result<usize, DispatchError> {
        Ok(self.store.mark_all_read(acting_user)?)
    }
}

fn job_alert_body(job: &JobSnapshot) -> String {
    match job.location.as_deref() {
        Some(location) => format!("{} is now open in {}.", job.title, location),
        None => format!("{} is now accepting applications.", job.title),
    }
}
