use axum::{
    Router,
    http::HeaderValue,
    middleware,
    routing::{delete, get, post, put},
};
use std::path::Path;
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::config::Config;
use crate::state::SharedState;

pub mod auth;
mod coach;
mod error;
mod feedback;
mod foods;
mod logs;
mod observability;
mod prs;
mod room;
mod stats;
mod types;
mod validation;
mod weight;

pub use auth::CurrentUser;
pub use error::ApiError;
pub use types::*;

use tokio::sync::RwLock;

use crate::services::{
    AuthService, CoachService, FeedbackService, LogService, RecordService, RoomHub, StatsService,
    WeightService,
};
use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,

    pub start_time: std::time::Instant,

    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Arc<RwLock<Config>> {
        &self.shared.config
    }

    #[must_use]
    pub fn store(&self) -> &crate::db::Store {
        &self.shared.store
    }

    #[must_use]
    pub fn auth_service(&self) -> &Arc<dyn AuthService> {
        &self.shared.auth_service
    }

    #[must_use]
    pub fn log_service(&self) -> &Arc<dyn LogService> {
        &self.shared.log_service
    }

    #[must_use]
    pub fn stats_service(&self) -> &Arc<dyn StatsService> {
        &self.shared.stats_service
    }

    #[must_use]
    pub fn record_service(&self) -> &Arc<dyn RecordService> {
        &self.shared.record_service
    }

    #[must_use]
    pub fn weight_service(&self) -> &Arc<dyn WeightService> {
        &self.shared.weight_service
    }

    #[must_use]
    pub fn feedback_service(&self) -> &Arc<dyn FeedbackService> {
        &self.shared.feedback_service
    }

    #[must_use]
    pub fn coach_service(&self) -> &Arc<dyn CoachService> {
        &self.shared.coach_service
    }

    #[must_use]
    pub fn room(&self) -> &RoomHub {
        &self.shared.room
    }
}

#[must_use]
pub fn create_app_state(
    shared: Arc<SharedState>,
    prometheus_handle: Option<PrometheusHandle>,
) -> Arc<AppState> {
    Arc::new(AppState {
        shared,
        start_time: std::time::Instant::now(),
        prometheus_handle,
    })
}

pub async fn create_app_state_from_config(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::new(config).await?);
    Ok(create_app_state(shared, prometheus_handle))
}

pub async fn router(state: Arc<AppState>) -> Router {
    let (frontend_path, cors_origins, secure_cookies, inactivity_minutes) = {
        let config = state.config().read().await;
        (
            config.general.frontend_path.clone(),
            config.server.cors_allowed_origins.clone(),
            config.server.secure_cookies,
            config.server.session_inactivity_minutes,
        )
    };

    let protected_routes = create_protected_router(state.clone());

    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(secure_cookies)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::minutes(
            inactivity_minutes,
        )));

    let api_router = Router::new()
        .merge(protected_routes)
        .route(
            "/room/ws",
            get(room::room_ws_handler).route_layer(middleware::from_fn_with_state(
                state.clone(),
                auth::optional_auth_middleware,
            )),
        )
        .route(
            "/leaderboard",
            get(stats::get_leaderboard).route_layer(middleware::from_fn_with_state(
                state.clone(),
                auth::optional_auth_middleware,
            )),
        )
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/otp/request", post(auth::request_code))
        .route("/auth/otp/verify", post(auth::verify_code))
        .route("/auth/password/reset", post(auth::reset_password))
        .route("/foods", get(foods::search_foods))
        .route("/foods/resolve", get(foods::resolve_food))
        .route("/health", get(observability::health))
        .layer(session_layer)
        .with_state(state.clone());

    let cors_layer = if cors_origins.contains(&"*".to_string()) {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    let mut app = Router::new().nest("/api", api_router);

    if !frontend_path.is_empty() && Path::new(&frontend_path).is_dir() {
        let index = Path::new(&frontend_path).join("index.html");
        app = app.fallback_service(ServeDir::new(&frontend_path).fallback(ServeFile::new(index)));
    }

    app.layer(CatchPanicLayer::custom(observability::handle_panic))
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(observability::security_headers_middleware))
        .layer(middleware::from_fn(observability::logging_middleware))
}

fn create_protected_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/me", get(auth::get_current_user))
        .route("/auth/avatar", put(auth::update_avatar))
        .route("/history", get(logs::get_history))
        .route("/log", post(logs::upsert_log))
        .route("/log/{date}", get(logs::get_log))
        .route(
            "/weight",
            get(weight::list_weight).post(weight::record_weight),
        )
        .route("/prs", get(prs::list_records).post(prs::record_pr))
        .route("/prs/{exercise}", delete(prs::delete_record))
        .route("/stats/streak", get(stats::get_streak))
        .route("/stats/consistency", get(stats::get_consistency))
        .route("/room/messages", get(room::recent_messages))
        .route("/coach/chat", post(coach::chat))
        .route("/feedback", post(feedback::submit_feedback))
        .route("/admin/feedback", get(feedback::list_feedback))
        .route("/metrics", get(observability::get_metrics))
        .route_layer(middleware::from_fn_with_state(state, auth::auth_middleware))
}
