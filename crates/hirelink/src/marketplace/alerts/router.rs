use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::dispatcher::{DispatchError, NotificationDispatcher};
use super::domain::NotificationId;
use super::repository::NotificationStore;
use super::JobAlertService;
use crate::marketplace::directory::{JobSnapshot, SeekerDirectory, UserId};

/// Shared state for the alert routes: the publish-hook service, the
/// dispatcher for read-flag mutations, and the store for listing reads.
pub struct AlertRouterState<D, N> {
    pub alerts: Arc<JobAlertService<D, N>>,
    pub dispatcher: Arc<NotificationDispatcher<N>>,
    pub notifications: Arc<N>,
}

impl<D, N> Clone for AlertRouterState<D, N> {
    fn clone(&self) -> Self {
        Self {
            alerts: self.alerts.clone(),
            dispatcher: self.dispatcher.clone(),
            notifications: self.notifications.clone(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct NotificationListQuery {
    #[serde(default)]
    pub(crate) unread: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MarkReadBody {
    pub(crate) user_id: String,
}

/// Router builder exposing the publish hook and notification reads.
pub fn alert_router<D, N>(state: AlertRouterState<D, N>) -> Router
where
    D: SeekerDirectory + 'static,
    N: NotificationStore + 'static,
{
    Router::new()
        .route("/api/v1/jobs/published", post(publish_handler::<D, N>))
        .route(
            "/api/v1/users/:user_id/notifications",
            get(list_handler::<D, N>),
        )
        .route(
            "/api/v1/users/:user_id/notifications/unread-count",
            get(unread_count_handler::<D, N>),
        )
        .route(
            "/api/v1/users/:user_id/notifications/read-all",
            post(mark_all_read_handler::<D, N>),
        )
        .route(
            "/api/v1/notifications/:notification_id/read",
            post(mark_read_handler::<D, N>),
        )
        .with_state(state)
}

/// Publish hook. Always accepted: fan-out failure degrades inside the
/// service and is reported in the body, never as a request failure.
pub(crate) async fn publish_handler<D, N>(
    State(state): State<AlertRouterState<D, N>>,
    axum::Json(job): axum::Json<JobSnapshot>,
) -> Response
where
    D: SeekerDirectory + 'static,
    N: NotificationStore + 'static,
{
    let report = state.alerts.announce(&job);
    (StatusCode::ACCEPTED, axum::Json(report)).into_response()
}

pub(crate) async fn list_handler<D, N>(
    State(state): State<AlertRouterState<D, N>>,
    Path(user_id): Path<String>,
    Query(query): Query<NotificationListQuery>,
) -> Response
where
    D: SeekerDirectory + 'static,
    N: NotificationStore + 'static,
{
    match state
        .notifications
        .list_for_recipient(&UserId(user_id), query.unread)
    {
        Ok(records) => (StatusCode::OK, axum::Json(records)).into_response(),
        Err(err) => internal_error_response(&err),
    }
}

pub(crate) async fn unread_count_handler<D, N>(
    State(state): State<AlertRouterState<D, N>>,
    Path(user_id): Path<String>,
) -> Response
where
    D: SeekerDirectory + 'static,
    N: NotificationStore + 'static,
{
    match state.notifications.unread_count(&UserId(user_id)) {
        Ok(count) => (StatusCode::OK, axum::Json(json!({ "unread": count }))).into_response(),
        Err(err) => internal_error_response(&err),
    }
}

pub(crate) async fn mark_read_handler<D, N>(
    State(state): State<AlertRouterState<D, N>>,
    Path(notification_id): Path<String>,
    axum::Json(body): axum::Json<MarkReadBody>,
) -> Response
where
    D: SeekerDirectory + 'static,
    N: NotificationStore + 'static,
{
    let acting_user = UserId(body.user_id);
    match state
        .dispatcher
        .mark_read(&NotificationId(notification_id), &acting_user)
    {
        Ok(record) => (StatusCode::OK, axum::Json(record)).into_response(),
        Err(DispatchError::NotFound) => {
            let payload = json!({ "error": "notification not found" });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(DispatchError::Forbidden) => {
            let payload = json!({ "error": "only the recipient may mark a notification read" });
            (StatusCode::FORBIDDEN, axum::Json(payload)).into_response()
        }
        Err(err) => internal_error_response(&err),
    }
}

pub(crate) async fn mark_all_read_handler<D, N>(
    State(state): State<AlertRouterState<D, N>>,
    Path(user_id): Path<String>,
) -> Response
where
    D: SeekerDirectory + 'static,
    N: NotificationStore + 'static,
{
    match state.dispatcher.mark_all_read(&UserId(user_id)) {
        Ok(updated) => (StatusCode::OK, axum::Json(json!({ "updated": updated }))).into_response(),
        Err(err) => internal_error_response(&err),
    }
}

fn internal_error_response(err: &dyn std::fmt::Display) -> Response {
    let payload = json!({ "error": err.to_string() });
    (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
}
