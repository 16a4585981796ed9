use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

use crate::marketplace::alerts::dispatcher::NotificationDispatcher;
use crate::marketplace::alerts::domain::{NotificationId, NotificationRecord};
use crate::marketplace::alerts::repository::NotificationStore;
use crate::marketplace::alerts::router::{alert_router, AlertRouterState};
use crate::marketplace::alerts::JobAlertService;
use crate::marketplace::applications::repository::StoreError;
use crate::marketplace::directory::{
    DirectoryError, JobId, JobSnapshot, JobStatus, PreferenceProfile, SeekerDirectory,
    SeekerProfile, UserId,
};

pub(super) fn published_job() -> JobSnapshot {
    JobSnapshot {
        id: JobId("job-002".to_string()),
        employer_id: UserId("emp-002".to_string()),
        title: "Product Designer".to_string(),
        category: Some("design".to_string()),
        location: Some("Addis Ababa".to_string()),
        status: JobStatus::Open,
    }
}

fn preferences(categories: &[&str], locations: &[&str]) -> PreferenceProfile {
    PreferenceProfile {
        preferred_categories: categories.iter().map(|s| s.to_string()).collect(),
        preferred_locations: locations.iter().map(|s| s.to_string()).collect(),
    }
}

pub(super) fn seeker(id: &str, categories: &[&str], locations: &[&str]) -> SeekerProfile {
    SeekerProfile {
        user_id: UserId(id.to_string()),
        preferences: preferences(categories, locations),
    }
}

/// The three-seeker fixture: S1 matches on category, S2 on location, S3 on
/// neither.
pub(super) fn seekers() -> Vec<SeekerProfile> {
    vec![
        seeker("seeker-1", &["design"], &["Hawassa"]),
        seeker("seeker-2", &["finance"], &["Addis Ababa"]),
        seeker("seeker-3", &["finance"], &["Hawassa"]),
    ]
}

#[derive(Clone)]
pub(super) struct StaticSeekers {
    profiles: Arc<Vec<SeekerProfile>>,
}

impl StaticSeekers {
    pub(super) fn with_profiles(profiles: Vec<SeekerProfile>) -> Self {
        Self {
            profiles: Arc::new(profiles),
        }
    }
}

impl SeekerDirectory for StaticSeekers {
    fn job_seekers(&self) -> Result<Vec<SeekerProfile>, DirectoryError> {
        Ok(self.profiles.as_ref().clone())
    }
}

pub(super) struct UnavailableSeekers;

impl SeekerDirectory for UnavailableSeekers {
    fn job_seekers(&self) -> Result<Vec<SeekerProfile>, DirectoryError> {
        Err(DirectoryError::Unavailable(
            "user collaborator offline".to_string(),
        ))
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryNotifications {
    records: Arc<Mutex<Vec<NotificationRecord>>>,
}

impl MemoryNotifications {
    pub(super) fn records(&self) -> Vec<NotificationRecord> {
        self.records
            .lock()
            .expect("notification mutex poisoned")
            .clone()
    }
}

impl NotificationStore for MemoryNotifications {
    fn insert_batch(&self, records: Vec<NotificationRecord>) -> Result<usize, StoreError> {
        let mut guard = self.records.lock().expect("notification mutex poisoned");
        let count = records.len();
        guard.extend(records);
        Ok(count)
    }

    fn fetch(&self, id: &NotificationId) -> Result<Option<NotificationRecord>, StoreError> {
        let guard = self.records.lock().expect("notification mutex poisoned");
        Ok(guard.iter().find(|record| record.id == *id).cloned())
    }

    fn list_for_recipient(
        &self,
        recipient: &UserId,
        only_unread: bool,
    ) -> Result<Vec<NotificationRecord>, StoreError> {
        let guard = self.records.lock().expect("notification mutex poisoned");
        let mut records: Vec<NotificationRecord> = guard
            .iter()
            .filter(|record| record.recipient_id == *recipient)
            .filter(|record| !only_unread || !record.read)
            .cloned()
            .collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }

    fn unread_count(&self, recipient: &UserId) -> Result<usize, StoreError> {
        let guard = self.records.lock().expect("notification mutex poisoned");
        Ok(guard
            .iter()
            .filter(|record| record.recipient_id == *recipient && !record.read)
            .count())
    }

    fn mark_read(&self, id: &NotificationId) -> Result<NotificationRecord, StoreError> {
        let mut guard = self.records.lock().expect("notification mutex poisoned");
        let record = guard
            .iter_mut()
            .find(|record| record.id == *id)
            .ok_or(StoreError::NotFound)?;
        record.read = true;
        Ok(record.clone())
    }

    fn mark_all_read(&self, recipient: &UserId) -> Result<usize, StoreError> {
        let mut guard = self.records.lock().expect("notification mutex poisoned");
        let mut updated = 0;
        for record in guard
            .iter_mut()
            .filter(|record| record.recipient_id == *recipient && !record.read)
        {
            record.read = true;
            updated += 1;
        }
        Ok(updated)
    }
}

/// Notification store whose batch insert always fails, leaving nothing
/// behind.
#[derive(Default)]
pub(super) struct FailingNotifications;

impl NotificationStore for FailingNotifications {
    fn insert_batch(&self, _records: Vec<NotificationRecord>) -> Result<usize, StoreError> {
        Err(StoreError::Unavailable(
            "notification store offline".to_string(),
        ))
    }

    fn fetch(&self, _id: &NotificationId) -> Result<Option<NotificationRecord>, StoreError> {
        Ok(None)
    }

    fn list_for_recipient(
        &self,
        _recipient: &UserId,
        _only_unread: bool,
    ) -> Result<Vec<NotificationRecord>, StoreError> {
        Ok(Vec::new())
    }

    fn unread_count(&self, _recipient: &UserId) -> Result<usize, StoreError> {
        Ok(0)
    }

    fn mark_read(&self, _id: &NotificationId) -> Result<NotificationRecord, StoreError> {
        Err(StoreError::Unavailable(
            "notification store offline".to_string(),
        ))
    }

    fn mark_all_read(&self, _recipient: &UserId) -> Result<usize, StoreError> {
        Err(StoreError::Unavailable(
            "notification store offline".to_string(),
        ))
    }
}

pub(super) struct AlertFixture<D: SeekerDirectory + 'static, N: NotificationStore + 'static> {
    pub(super) alerts: Arc<JobAlertService<D, N>>,
    pub(super) dispatcher: Arc<NotificationDispatcher<N>>,
    pub(super) notifications: Arc<N>,
}

pub(super) fn build_alerts() -> AlertFixture<StaticSeekers, MemoryNotifications> {
    build_alerts_with(
        StaticSeekers::with_profiles(seekers()),
        MemoryNotifications::default(),
    )
}

pub(super) fn build_alerts_with<D, N>(seekers: D, notifications: N) -> AlertFixture<D, N>
where
    D: SeekerDirectory + 'static,
    N: NotificationStore + 'static,
{
    let notifications = Arc::new(notifications);
    let dispatcher = Arc::new(NotificationDispatcher::new(notifications.clone()));
    let alerts = Arc::new(JobAlertService::new(Arc::new(seekers), dispatcher.clone()));

    AlertFixture {
        alerts,
        dispatcher,
        notifications,
    }
}

pub(super) fn build_alert_router<D, N>(fixture: &AlertFixture<D, N>) -> axum::Router
where
    D: SeekerDirectory + 'static,
    N: NotificationStore + 'static,
{
    alert_router(AlertRouterState {
        alerts: fixture.alerts.clone(),
        dispatcher: fixture.dispatcher.clone(),
        notifications: fixture.notifications.clone(),
    })
}

pub(super) fn empty_set() -> BTreeSet<String> {
    BTreeSet::new()
}
