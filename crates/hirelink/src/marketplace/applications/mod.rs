//! Application lifecycle: submission, employer-driven status transitions,
//! and the chat provisioning that follows an engaged status.

pub mod chat;
pub mod domain;
pub mod events;
pub mod lifecycle;
pub mod repository;
pub mod router;


pub use chat::{ChatProvisioner, ProvisionError};
pub use domain::{
    ApplicationId, ApplicationRecord, ApplicationStatus, ApplicationStatusView, ChannelId,
    ChatChannel, RequestedStatus,
};
pub use events::{
    ApplicationEvent, ApplicationEventHandler, ChatProvisioningHandler, SideEffectError,
    StatusNotificationHandler,
};
pub use lifecycle::{ApplicationLifecycle, LifecycleError, SubmissionRequest};
pub use repository::{ApplicationStore, ChatChannelStore, StoreError};
pub use router::{application_router, ApplicationRouterState};
