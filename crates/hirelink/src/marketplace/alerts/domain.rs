use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::marketplace::applications::domain::ApplicationId;
use crate::marketplace::directory::{JobId, UserId};

/// Identifier wrapper for persisted notifications.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NotificationId(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationCategory {
    JobAlert,
    ApplicationUpdate,
}

impl NotificationCategory {
    pub const fn label(self) -> &'static str {
        match self {
            NotificationCategory::JobAlert => "job_alert",
            NotificationCategory::ApplicationUpdate => "application_update",
        }
    }
}

/// The entity a notification points back at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum RelatedEntity {
    Job(JobId),
    Application(ApplicationId),
}

/// Fan-out artifact persisted for later polling by the recipient. Only the
/// recipient may flip the read flag; no other mutation exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationRecord {
    pub id: NotificationId,
    pub recipient_id: UserId,
    pub category: NotificationCategory,
    pub subject: String,
    pub body: String,
    pub related: RelatedEntity,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}
