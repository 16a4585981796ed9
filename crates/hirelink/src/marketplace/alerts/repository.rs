use super::domain::{NotificationId, NotificationRecord};
use crate::marketplace::applications::repository::StoreError;
use crate::marketplace::directory::UserId;

/// Notification storage, indexed by (recipient, read flag, created_at) for
/// unread counts and listing.
pub trait NotificationStore: Send + Sync {
    /// Persists the whole batch or nothing; a partial fan-out must never
    /// be left behind silently.
    fn insert_batch(&self, records: Vec<NotificationRecord>) -> Result<usize, StoreError>;

    fn fetch(&self, id: &NotificationId) -> Result<Option<NotificationRecord>, StoreError>;

    /// Newest first; `only_unread` restricts to unread records.
    fn list_for_recipient(
        &self,
        recipient: &UserId,
        only_unread: bool,
    ) -> Result<Vec<NotificationRecord>, StoreError>;

    fn unread_count(&self, recipient: &UserId) -> Result<usize, StoreError>;

    fn mark_read(&self, id: &NotificationId) -> Result<NotificationRecord, StoreError>;

    fn mark_all_read(&self, recipient: &UserId) -> Result<usize, StoreError>;
}
