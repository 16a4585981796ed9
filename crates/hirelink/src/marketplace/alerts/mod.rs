//! Job-alert fan-out and notification persistence.
//!
//! `JobAlertService` ties the preference matcher to the dispatcher for the
//! publish hook; the dispatcher is also reused by the application
//! lifecycle's status-change handler.

pub mod dispatcher;
pub mod domain;
pub mod matcher;
pub mod repository;
pub mod router;


use std::sync::Arc;

use serde::Serialize;
use tracing::warn;

use crate::marketplace::directory::{JobSnapshot, SeekerDirectory};

pub use dispatcher::{DispatchError, NotificationDispatcher};
pub use domain::{NotificationCategory, NotificationId, NotificationRecord, RelatedEntity};
pub use matcher::PreferenceMatcher;
pub use repository::NotificationStore;
pub use router::{alert_router, AlertRouterState};

/// Observable outcome of one publish announcement. A degraded report means
/// the fan-out was skipped or rolled back; publication itself succeeded.
#[derive(Debug, Clone, Serialize)]
pub struct JobAlertReport {
    pub matched: usize,
    pub dispatched: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub degraded: Option<String>,
}

/// Orchestrates match-then-dispatch for a newly published job.
pub struct JobAlertService<D, N> {
    matcher: PreferenceMatcher<D>,
    dispatcher: Arc<NotificationDispatcher<N>>,
}

impl<D, N> JobAlertService<D, N>
where
    D: SeekerDirectory,
    N: NotificationStore,
{
    pub fn new(seekers: Arc<D>, dispatcher: Arc<NotificationDispatcher<N>>) -> Self {
        Self {
            matcher: PreferenceMatcher::new(seekers),
            dispatcher,
        }
    }

    /// Never fails: a collaborator or batch failure degrades to zero
    /// dispatched notifications with a logged reason, so job publication
    /// does not depend on fan-out completing.
    pub fn announce(&self, job: &JobSnapshot) -> JobAlertReport {
        let matched = match self.matcher.match_seekers(job) {
            Ok(matched) => matched,
            Err(err) => {
                warn!(job_id = %job.id.0, "job alert matching degraded: {err}");
                return JobAlertReport {
                    matched: 0,
                    dispatched: 0,
                    degraded: Some(err.to_string()),
                };
            }
        };

        match self.dispatcher.dispatch_job_alerts(job, &matched) {
            Ok(dispatched) => JobAlertReport {
                matched: matched.len(),
                dispatched,
                degraded: None,
            },
            Err(err) => {
                warn!(job_id = %job.id.0, "job alert dispatch degraded: {err}");
                JobAlertReport {
                    matched: matched.len(),
                    dispatched: 0,
                    degraded: Some(err.to_string()),
                }
            }
        }
    }
}
