use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use metrics_exporter_prometheus::PrometheusHandle;

use hirelink::marketplace::alerts::{NotificationId, NotificationRecord, NotificationStore};
use hirelink::marketplace::applications::{
    ApplicationId, ApplicationRecord, ApplicationStatus, ApplicationStore, ChatChannel,
    ChatChannelStore, StoreError,
};
use hirelink::marketplace::directory::{
    DirectoryError, JobDirectory, JobId, JobSnapshot, JobStatus, PreferenceProfile,
    SeekerDirectory, SeekerProfile, UserId,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryApplicationStore {
    records: Arc<Mutex<HashMap<ApplicationId, ApplicationRecord>>>,
}

impl ApplicationStore for InMemoryApplicationStore {
    fn insert(&self, record: ApplicationRecord) -> Result<ApplicationRecord, StoreError> {
        let mut guard = self.records.lock().expect("application mutex poisoned");
        let duplicate = guard.values().any(|existing| {
            existing.job_id == record.job_id && existing.applicant_id == record.applicant_id
        });
        if duplicate {
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

/// One channel per application, enforced as the store's uniqueness
/// constraint. A lost create race surfaces as Conflict.
#[derive(Default, Clone)]
pub(crate) struct InMemoryChatChannelStore {
    channels: Arc<Mutex<HashMap<ApplicationId, ChatChannel>>>,
}

impl ChatChannelStore for InMemoryChatChannelStore {
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
            .filter(|channel| channel.employer_id == *user_id || channel.applicant_id == *user_id)
            .cloned()
            .collect();
        channels.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(channels)
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryNotificationStore {
    records: Arc<Mutex<Vec<NotificationRecord>>>,
}

impl NotificationStore for InMemoryNotificationStore {
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

/// Seeded read model standing in for the job and user collaborators. A
/// production deployment would back these traits with service clients.
#[derive(Clone)]
pub(crate) struct SeededDirectory {
    jobs: Arc<HashMap<JobId, JobSnapshot>>,
    seekers: Arc<Vec<SeekerProfile>>,
}

impl SeededDirectory {
    pub(crate) fn new(jobs: Vec<JobSnapshot>, seekers: Vec<SeekerProfile>) -> Self {
        Self {
            jobs: Arc::new(jobs.into_iter().map(|job| (job.id.clone(), job)).collect()),
            seekers: Arc::new(seekers),
        }
    }
}

impl JobDirectory for SeededDirectory {
    fn job(&self, id: &JobId) -> Result<Option<JobSnapshot>, DirectoryError> {
        Ok(self.jobs.get(id).cloned())
    }
}

impl SeekerDirectory for SeededDirectory {
    fn job_seekers(&self) -> Result<Vec<SeekerProfile>, DirectoryError> {
        Ok(self.seekers.as_ref().clone())
    }
}

fn preferences(categories: &[&str], locations: &[&str]) -> PreferenceProfile {
    PreferenceProfile {
        preferred_categories: categories.iter().map(|s| s.to_string()).collect(),
        preferred_locations: locations.iter().map(|s| s.to_string()).collect(),
    }
}

/// Demo dataset: two open postings and three seekers with overlapping
/// preferences.
pub(crate) fn seeded_directory() -> SeededDirectory {
    let jobs = vec![
        JobSnapshot {
            id: JobId("job-001".to_string()),
            employer_id: UserId("emp-001".to_string()),
            title: "Senior Product Designer".to_string(),
            category: Some("design".to_string()),
            location: Some("Addis Ababa".to_string()),
            status: JobStatus::Open,
        },
        JobSnapshot {
            id: JobId("job-002".to_string()),
            employer_id: UserId("emp-002".to_string()),
            title: "Financial Analyst".to_string(),
            category: Some("finance".to_string()),
            location: Some("Hawassa".to_string()),
            status: JobStatus::Open,
        },
    ];

    let seekers = vec![
        SeekerProfile {
            user_id: UserId("seeker-001".to_string()),
            preferences: preferences(&["design"], &["Bahir Dar"]),
        },
        SeekerProfile {
            user_id: UserId("seeker-002".to_string()),
            preferences: preferences(&["finance"], &["Addis Ababa"]),
        },
        SeekerProfile {
            user_id: UserId("seeker-003".to_string()),
            preferences: preferences(&["engineering"], &["Dire Dawa"]),
        },
    ];

    SeededDirectory::new(jobs, seekers)
}
