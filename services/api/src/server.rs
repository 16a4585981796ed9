use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use tracing::info;

use hirelink::config::AppConfig;
use hirelink::error::AppError;
use hirelink::marketplace::alerts::{
    alert_router, AlertRouterState, JobAlertService, NotificationDispatcher,
};
use hirelink::marketplace::applications::{
    application_router, ApplicationEventHandler, ApplicationLifecycle, ApplicationRouterState,
    ChatProvisioner, ChatProvisioningHandler, StatusNotificationHandler,
};
use hirelink::telemetry;

use crate::cli::ServeArgs;
use crate::infra::{
    seeded_directory, AppState, InMemoryApplicationStore, InMemoryChatChannelStore,
    InMemoryNotificationStore,
};
use crate::routes::with_marketplace_routes;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let applications = Arc::new(InMemoryApplicationStore::default());
    let channels = Arc::new(InMemoryChatChannelStore::default());
    let notifications = Arc::new(InMemoryNotificationStore::default());
    let directory = Arc::new(seeded_directory());

    let provisioner = Arc::new(ChatProvisioner::new(
        applications.clone(),
        channels.clone(),
        directory.clone(),
    ));
    let dispatcher = Arc::new(NotificationDispatcher::new(notifications.clone()));
    let handlers: Vec<Arc<dyn ApplicationEventHandler>> = vec![
        Arc::new(ChatProvisioningHandler::new(provisioner.clone())),
        Arc::new(StatusNotificationHandler::new(dispatcher.clone())),
    ];
    let lifecycle = Arc::new(ApplicationLifecycle::new(
        applications,
        directory.clone(),
        handlers,
    ));
    let alerts = Arc::new(JobAlertService::new(directory, dispatcher.clone()));

    let application_routes = application_router(ApplicationRouterState {
        lifecycle,
        provisioner,
        channels,
    });
    let alert_routes = alert_router(AlertRouterState {
        alerts,
        dispatcher,
        notifications,
    });

    let app = with_marketplace_routes(application_routes, alert_routes)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "hirelink marketplace api ready");

    axum::serve(listener, app).await?;
    Ok(())
}
