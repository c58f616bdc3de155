use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use domain::services::RequestNotifier;
use persistence::WorkbookStore;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::Config;
use crate::middleware::{
    metrics_handler, metrics_middleware, require_technician, security_headers_middleware,
    trace_id,
};
use crate::routes::{health, intake, ledger};
use crate::services::MaintenanceService;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub requests: MaintenanceService,
}

pub fn create_app(config: Config, notifier: Arc<dyn RequestNotifier>) -> Router {
    let config = Arc::new(config);

    let store = WorkbookStore::new(&config.store.path);
    let state = AppState {
        config: config.clone(),
        requests: MaintenanceService::new(store, notifier),
    };

    // Technician routes (HTTP Basic)
    let protected_routes = Router::new()
        .route("/registros", get(ledger::list_requests))
        .route("/concluir/:id", post(ledger::complete_request))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_technician,
        ));

    // Public routes (no auth)
    let public_routes = Router::new()
        .route("/", get(intake::show_form))
        .route("/nova", post(intake::submit_request))
        .route("/health", get(health::health_check))
        .route("/metrics", get(metrics_handler));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .with_state(state)
}
