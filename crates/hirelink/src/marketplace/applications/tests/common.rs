use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};

use crate::marketplace::alerts::dispatcher::NotificationDispatcher;
use crate::marketplace::alerts::domain::{NotificationId, NotificationRecord};
use crate::marketplace::alerts::repository::NotificationStore;
use crate::marketplace::applications::chat::ChatProvisioner;
use crate::marketplace::applications::domain::{
    ApplicationId, ApplicationRecord, ApplicationStatus, ChatChannel,
};
use crate::marketplace::applications::events::{
    ApplicationEventHandler, ChatProvisioningHandler, StatusNotificationHandler,
};
use crate::marketplace::applications::lifecycle::{ApplicationLifecycle, SubmissionRequest};
use crate::marketplace::applications::repository::{
    ApplicationStore, ChatChannelStore, StoreError,
};
use crate::marketplace::applications::router::{application_router, ApplicationRouterState};
use crate::marketplace::directory::{
    DirectoryError, JobDirectory, JobId, JobSnapshot, JobStatus, UserId,
};

pub(super) fn employer() -> UserId {
    UserId("emp-001".to_string())
}

pub(super) fn applicant() -> UserId {
    UserId("seeker-001".to_string())
}

pub(super) fn open_job() -> JobSnapshot {
    JobSnapshot {
        id: JobId("job-001".to_string()),
        employer_id: employer(),
        title: "Senior Graphic Designer".to_string(),
        category: Some("design".to_string()),
        location: Some("Addis Ababa".to_string()),
        status: JobStatus::Open,
    }
}

pub(super) fn closed_job() -> JobSnapshot {
    JobSnapshot {
        id: JobId("job-closed".to_string()),
        employer_id: employer(),
        title: "Archived Role".to_string(),
        category: Some("design".to_string()),
        location: None,
        status: JobStatus::Closed,
    }
}

pub(super) fn submission() -> SubmissionRequest {
    SubmissionRequest {
        job_id: open_job().id,
        applicant_id: applicant(),
        cover_letter: Some("I have five years of brand design experience.".to_string()),
        resume_ref: Some("resumes/seeker-001.pdf".to_string()),
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryApplications {
    records: Arc<Mutex<HashMap<ApplicationId, ApplicationRecord>>>,
}

impl ApplicationStore for MemoryApplications {
    fn insert(&self, record: ApplicationRecord) -> Result<ApplicationRecord, StoreError> {
        let mut guard = self.records.lock().expect("application mutex poisoned");
        let duplicate = guard.values().any(|existing| {
            existing.job_id == record.job_id && existing.applicant_id == record.applicant_id
        });
        if duplicate || guard.contains_key(&record.id) {
            return Err(StoreError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn update_status(
        &self,
        id: &ApplicationId,
        status: ApplicationStatus,
        updated_at: DateTime<Utc>,
    ) -> Result<ApplicationRecord, StoreError> {
        let mut guard = self.records.lock().expect("application mutex poisoned");
        let record = guard.get_mut(id).ok_or(StoreError::NotFound)?;
        record.status = status;
        record.updated_at = updated_at;
        Ok(record.clone())
    }

    fn fetch(&self, id: &ApplicationId) -> Result<Option<ApplicationRecord>, StoreError> {
        let guard = self.records.lock().expect("application mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn find_by_job_and_applicant(
        &self,
        job_id: &JobId,
        applicant_id: &UserId,
    ) -> Result<Option<ApplicationRecord>, StoreError> {
        let guard = self.records.lock().expect("application mutex poisoned");
        Ok(guard
            .values()
            .find(|record| record.job_id == *job_id && record.applicant_id == *applicant_id)
            .cloned())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryChannels {
    channels: Arc<Mutex<HashMap<ApplicationId, ChatChannel>>>,
}

impl MemoryChannels {
    pub(super) fn channel_count(&self) -> usize {
        self.channels.lock().expect("channel mutex poisoned").len()
    }
}

impl ChatChannelStore for MemoryChannels {
    fn create(&self, channel: ChatChannel) -> Result<ChatChannel, StoreError> {
        let mut guard = self.channels.lock().expect("channel mutex poisoned");
        if guard.contains_key(&channel.application_id) {
            return Err(StoreError::Conflict);
        }
        guard.insert(channel.application_id.clone(), channel.clone());
        Ok(channel)
    }

    fn fetch_by_application(
        &self,
        application_id: &ApplicationId,
    ) -> Result<Option<ChatChannel>, StoreError> {
        let guard = self.channels.lock().expect("channel mutex poisoned");
        Ok(guard.get(application_id).cloned())
    }

    fn list_for_user(&self, user_id: &UserId) -> Result<Vec<ChatChannel>, StoreError> {
        let guard = self.channels.lock().expect("channel mutex poisoned");
        let mut channels: Vec<ChatChannel> = guard
            .values()
            .filter(|channel| {
                channel.employer_id == *user_id || channel.applicant_id == *user_id
            })
            .cloned()
            .collect();
        channels.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(channels)
    }
}

/// Channel store whose `create` fails a fixed number of times before
/// delegating, for exercising side-effect retry behavior.
#[derive(Clone)]
pub(super) struct FlakyChannels {
    pub(super) inner: MemoryChannels,
    failures_left: Arc<AtomicUsize>,
}

impl FlakyChannels {
    pub(super) fn failing(times: usize) -> Self {
        Self {
            inner: MemoryChannels::default(),
            failures_left: Arc::new(AtomicUsize::new(times)),
        }
    }
}

impl ChatChannelStore for FlakyChannels {
    fn create(&self, channel: ChatChannel) -> Result<ChatChannel, StoreError> {
        let remaining = self.failures_left.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failures_left.store(remaining - 1, Ordering::SeqCst);
            return Err(StoreError::Unavailable("chat backend offline".to_string()));
        }
        self.inner.create(channel)
    }

    fn fetch_by_application(
        &self,
        application_id: &ApplicationId,
    ) -> Result<Option<ChatChannel>, StoreError> {
        self.inner.fetch_by_application(application_id)
    }

    fn list_for_user(&self, user_id: &UserId) -> Result<Vec<ChatChannel>, StoreError> {
        self.inner.list_for_user(user_id)
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

#[derive(Clone)]
pub(super) struct StaticJobs {
    jobs: Arc<HashMap<JobId, JobSnapshot>>,
}

impl StaticJobs {
    pub(super) fn with_jobs(jobs: Vec<JobSnapshot>) -> Self {
        Self {
            jobs: Arc::new(jobs.into_iter().map(|job| (job.id.clone(), job)).collect()),
        }
    }
}

impl JobDirectory for StaticJobs {
    fn job(&self, id: &JobId) -> Result<Option<JobSnapshot>, DirectoryError> {
        Ok(self.jobs.get(id).cloned())
    }
}

pub(super) struct UnavailableJobs;

impl JobDirectory for UnavailableJobs {
    fn job(&self, _id: &JobId) -> Result<Option<JobSnapshot>, DirectoryError> {
        Err(DirectoryError::Unavailable(
            "job collaborator offline".to_string(),
        ))
    }
}

pub(super) struct LifecycleFixture<C: ChatChannelStore + 'static> {
    pub(super) lifecycle: Arc<ApplicationLifecycle<MemoryApplications, StaticJobs>>,
    pub(super) provisioner: Arc<ChatProvisioner<MemoryApplications, C, StaticJobs>>,
    pub(super) applications: Arc<MemoryApplications>,
    pub(super) channels: Arc<C>,
    pub(super) notifications: Arc<MemoryNotifications>,
}

pub(super) fn build_lifecycle() -> LifecycleFixture<MemoryChannels> {
    build_lifecycle_with_channels(MemoryChannels::default())
}

pub(super) fn build_lifecycle_with_channels<C>(channels: C) -> LifecycleFixture<C>
where
    C: ChatChannelStore + 'static,
{
    let applications = Arc::new(MemoryApplications::default());
    let channels = Arc::new(channels);
    let notifications = Arc::new(MemoryNotifications::default());
    let jobs = Arc::new(StaticJobs::with_jobs(vec![open_job(), closed_job()]));

    let provisioner = Arc::new(ChatProvisioner::new(
        applications.clone(),
        channels.clone(),
        jobs.clone(),
    ));
    let dispatcher = Arc::new(NotificationDispatcher::new(notifications.clone()));

    let handlers: Vec<Arc<dyn ApplicationEventHandler>> = vec![
        Arc::new(ChatProvisioningHandler::new(provisioner.clone())),
        Arc::new(StatusNotificationHandler::new(dispatcher)),
    ];
    let lifecycle = Arc::new(ApplicationLifecycle::new(
        applications.clone(),
        jobs,
        handlers,
    ));

    LifecycleFixture {
        lifecycle,
        provisioner,
        applications,
        channels,
        notifications,
    }
}

pub(super) fn build_router(
    fixture: &LifecycleFixture<MemoryChannels>,
) -> axum::Router {
    application_router(ApplicationRouterState {
        lifecycle: fixture.lifecycle.clone(),
        provisioner: fixture.provisioner.clone(),
        channels: fixture.channels.clone(),
    })
}
