use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::chat::{ChatProvisioner, ProvisionError};
use super::domain::{ApplicationId, RequestedStatus};
use super::lifecycle::{ApplicationLifecycle, LifecycleError, SubmissionRequest};
use super::repository::{ApplicationStore, ChatChannelStore, StoreError};
use crate::marketplace::directory::{JobDirectory, JobId, UserId};

/// Shared state for the application routes: the lifecycle facade, the
/// provisioner for explicit "ensure chat exists" retries, and the channel
/// store for reads.
pub struct ApplicationRouterState<S, C, J> {
    pub lifecycle: Arc<ApplicationLifecycle<S, J>>,
    pub provisioner: Arc<ChatProvisioner<S, C, J>>,
    pub channels: Arc<C>,
}

impl<S, C, J> Clone for ApplicationRouterState<S, C, J> {
    fn clone(&self) -> Self {
        Self {
            lifecycle: self.lifecycle.clone(),
            provisioner: self.provisioner.clone(),
            channels: self.channels.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct SubmitRequestBody {
    pub(crate) applicant_id: String,
    #[serde(default)]
    pub(crate) cover_letter: Option<String>,
    #[serde(default)]
    pub(crate) resume_ref: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TransitionRequestBody {
    pub(crate) status: RequestedStatus,
    pub(crate) employer_id: String,
}

/// Router builder exposing HTTP endpoints for submission, status
/// transitions, and chat reads.
pub fn application_router<S, C, J>(state: ApplicationRouterState<S, C, J>) -> Router
where
    S: ApplicationStore + 'static,
    C: ChatChannelStore + 'static,
    J: JobDirectory + 'static,
{
    Router::new()
        .route(
            "/api/v1/jobs/:job_id/applications",
            post(submit_handler::<S, C, J>),
        )
        .route(
            "/api/v1/applications/:application_id",
            get(status_handler::<S, C, J>),
        )
        .route(
            "/api/v1/applications/:application_id/status",
            post(transition_handler::<S, C, J>),
        )
        .route(
            "/api/v1/applications/:application_id/chat",
            get(chat_handler::<S, C, J>).post(ensure_chat_handler::<S, C, J>),
        )
        .route(
            "/api/v1/users/:user_id/chats",
            get(user_chats_handler::<S, C, J>),
        )
        .with_state(state)
}

pub(crate) async fn submit_handler<S, C, J>(
    State(state): State<ApplicationRouterState<S, C, J>>,
    Path(job_id): Path<String>,
    axum::Json(body): axum::Json<SubmitRequestBody>,
) -> Response
where
    S: ApplicationStore + 'static,
    C: ChatChannelStore + 'static,
    J: JobDirectory + 'static,
{
    let request = SubmissionRequest {
        job_id: JobId(job_id),
        applicant_id: UserId(body.applicant_id),
        cover_letter: body.cover_letter,
        resume_ref: body.resume_ref,
    };

    match state.lifecycle.submit(request) {
        Ok(record) => (StatusCode::CREATED, axum::Json(record.status_view())).into_response(),
        Err(LifecycleError::Store(StoreError::Conflict)) => {
            let payload = json!({
                "error": "an application for this job by this applicant already exists",
            });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        Err(err) => lifecycle_error_response(&err),
    }
}

pub(crate) async fn status_handler<S, C, J>(
    State(state): State<ApplicationRouterState<S, C, J>>,
    Path(application_id): Path<String>,
) -> Response
where
    S: ApplicationStore + 'static,
    C: ChatChannelStore + 'static,
    J: JobDirectory + 'static,
{
    match state.lifecycle.get(&ApplicationId(application_id)) {
        Ok(record) => (StatusCode::OK, axum::Json(record.status_view())).into_response(),
        Err(err) => lifecycle_error_response(&err),
    }
}

pub(crate) async fn transition_handler<S, C, J>(
    State(state): State<ApplicationRouterState<S, C, J>>,
    Path(application_id): Path<String>,
    axum::Json(body): axum::Json<TransitionRequestBody>,
) -> Response
where
    S: ApplicationStore + 'static,
    C: ChatChannelStore + 'static,
    J: JobDirectory + 'static,
{
    let acting_employer = UserId(body.employer_id);
    match state
        .lifecycle
        .transition(&ApplicationId(application_id), body.status, &acting_employer)
    {
        Ok(record) => (StatusCode::OK, axum::Json(record.status_view())).into_response(),
        Err(err) => lifecycle_error_response(&err),
    }
}

pub(crate) async fn chat_handler<S, C, J>(
    State(state): State<ApplicationRouterState<S, C, J>>,
    Path(application_id): Path<String>,
) -> Response
where
    S: ApplicationStore + 'static,
    C: ChatChannelStore + 'static,
    J: JobDirectory + 'static,
{
    match state
        .channels
        .fetch_by_application(&ApplicationId(application_id))
    {
        Ok(Some(channel)) => (StatusCode::OK, axum::Json(channel)).into_response(),
        Ok(None) => {
            let payload = json!({ "error": "no chat channel exists for this application" });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(err) => internal_error_response(&err),
    }
}

/// Explicit re-invocation of the idempotent provisioner, the retry path
/// for a side effect that failed during the original transition.
pub(crate) async fn ensure_chat_handler<S, C, J>(
    State(state): State<ApplicationRouterState<S, C, J>>,
    Path(application_id): Path<String>,
) -> Response
where
    S: ApplicationStore + 'static,
    C: ChatChannelStore + 'static,
    J: JobDirectory + 'static,
{
    let application_id = ApplicationId(application_id);

    // An already-provisioned channel is returned regardless of the current
    // status; channels are never retracted.
    if let Ok(Some(channel)) = state.channels.fetch_by_application(&application_id) {
        return (StatusCode::OK, axum::Json(channel)).into_response();
    }

    match state.lifecycle.get(&application_id) {
        Ok(record) if !record.status.is_engaged() => {
            let payload = json!({ "error": "application has not reached an engaged status" });
            return (StatusCode::CONFLICT, axum::Json(payload)).into_response();
        }
        Ok(_) => {}
        Err(err) => return lifecycle_error_response(&err),
    }

    match state.provisioner.ensure_channel(&application_id) {
        Ok(channel) => (StatusCode::OK, axum::Json(channel)).into_response(),
        Err(ProvisionError::ApplicationNotFound | ProvisionError::JobNotFound) => {
            let payload = json!({ "error": "application not found" });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(err) => internal_error_response(&err),
    }
}

pub(crate) async fn user_chats_handler<S, C, J>(
    State(state): State<ApplicationRouterState<S, C, J>>,
    Path(user_id): Path<String>,
) -> Response
where
    S: ApplicationStore + 'static,
    C: ChatChannelStore + 'static,
    J: JobDirectory + 'static,
{
    match state.channels.list_for_user(&UserId(user_id)) {
        Ok(channels) => (StatusCode::OK, axum::Json(channels)).into_response(),
        Err(err) => internal_error_response(&err),
    }
}

fn lifecycle_error_response(err: &LifecycleError) -> Response {
    let (status, message) = match err {
        LifecycleError::NotFound | LifecycleError::JobNotFound => {
            (StatusCode::NOT_FOUND, err.to_string())
        }
        LifecycleError::JobNotOpen => (StatusCode::CONFLICT, err.to_string()),
        LifecycleError::Forbidden => (StatusCode::FORBIDDEN, err.to_string()),
        LifecycleError::Store(StoreError::Conflict) => (StatusCode::CONFLICT, err.to_string()),
        LifecycleError::Store(_) | LifecycleError::Directory(_) => {
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
    };

    let payload = json!({ "error": message });
    (status, axum::Json(payload)).into_response()
}

fn internal_error_response(err: &dyn std::fmt::Display) -> Response {
    let payload = json!({ "error": err.to_string() });
    (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
}
