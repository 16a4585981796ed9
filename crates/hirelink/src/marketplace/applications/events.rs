//! Lifecycle event emission. Status changes are published to a list of
//! independent handlers so the primary mutation's success never depends
//! on chat provisioning or notification delivery.

use std::fmt;
use std::sync::Arc;

use super::chat::ChatProvisioner;
use super::domain::{ApplicationRecord, ApplicationStatus};
use super::repository::{ApplicationStore, ChatChannelStore};
use crate::marketplace::alerts::dispatcher::NotificationDispatcher;
use crate::marketplace::alerts::repository::NotificationStore;
use crate::marketplace::directory::JobDirectory;

/// Domain event emitted by the lifecycle after a successful mutation.
#[derive(Debug, Clone)]
pub enum ApplicationEvent {
    StatusChanged {
        application: ApplicationRecord,
        previous: ApplicationStatus,
    },
}

/// Failure of a best-effort side effect. Logged by the emitter, never
/// propagated to the triggering operation.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct SideEffectError {
    message: String,
}

impl SideEffectError {
    pub fn new(source: impl fmt::Display) -> Self {
        Self {
            message: source.to_string(),
        }
    }
}

/// A consumer of lifecycle events. Handlers run inline after the primary
/// mutation commits; re-invoking the triggering operation (or the
/// handler's own idempotent entry point) is the retry path.
pub trait ApplicationEventHandler: Send + Sync {
    fn name(&self) -> &'static str;

    fn handle(&self, event: &ApplicationEvent) -> Result<(), SideEffectError>;
}

/// Provisions the chat channel the first time an application enters an
/// engaged status. Later engaged transitions are no-ops thanks to
/// `ensure_channel` idempotency.
pub struct ChatProvisioningHandler<S, C, J> {
    provisioner: Arc<ChatProvisioner<S, C, J>>,
}

impl<S, C, J> ChatProvisioningHandler<S, C, J> {
    pub fn new(provisioner: Arc<ChatProvisioner<S, C, J>>) -> Self {
        Self { provisioner }
    }
}

impl<S, C, J> ApplicationEventHandler for ChatProvisioningHandler<S, C, J>
where
    S: ApplicationStore,
    C: ChatChannelStore,
    J: JobDirectory,
{
    fn name(&self) -> &'static str {
        "chat-provisioner"
    }

    fn handle(&self, event: &ApplicationEvent) -> Result<(), SideEffectError> {
        let ApplicationEvent::StatusChanged { application, .. } = event;
        if !application.status.is_engaged() {
            return Ok(());
        }

        self.provisioner
            .ensure_channel(&application.id)
            .map(|_| ())
            .map_err(SideEffectError::new)
    }
}

/// Records an applicant-facing notification for every status change.
pub struct StatusNotificationHandler<N> {
    dispatcher: Arc<NotificationDispatcher<N>>,
}

impl<N> StatusNotificationHandler<N> {
    pub fn new(dispatcher: Arc<NotificationDispatcher<N>>) -> Self {
        Self { dispatcher }
    }
}

impl<N> ApplicationEventHandler for StatusNotificationHandler<N>
where
    N: NotificationStore,
{
    fn name(&self) -> &'static str {
        "status-notifier"
    }

    fn handle(&self, event: &ApplicationEvent) -> Result<(), SideEffectError> {
        let ApplicationEvent::StatusChanged {
            application,
            previous,
        } = event;

        self.dispatcher
            .dispatch_status_change(application, *previous)
            .map(|_| ())
            .map_err(SideEffectError::new)
    }
}
