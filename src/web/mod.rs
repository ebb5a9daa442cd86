// Web server: Axum JSON API for analyses, readiness scores and media kits.
//
// Routes fall into three groups:
//   protected: bearer token required, rate limited per user
//   owner-or-public: token optional, private kits only for their owner
//   public: media kit pages and view tracking, plus /health
//
// Auth: stateless HMAC-SHA256 bearer tokens. No session table in the DB.

use std::sync::Arc;

use anyhow::Result;
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use tower_governor::governor::GovernorConfigBuilder;
use tower_governor::GovernorLayer;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::db::Database;
use crate::engagement::{EngagementAnalyzer, ValidationError};

pub mod auth;
pub mod handlers;
pub mod rate_limit;

/// Shared application state threaded through all Axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<dyn Database>,
    pub config: Arc<Config>,
    pub analyzer: Arc<EngagementAnalyzer>,
}

impl AppState {
    pub fn new(config: Config, db: Arc<dyn Database>) -> Self {
        let analyzer = EngagementAnalyzer::new(config.benchmarks.clone());
        Self {
            db,
            config: Arc::new(config),
            analyzer: Arc::new(analyzer),
        }
    }
}

/// Start the Axum web server and block until it exits.
pub async fn run_server(config: Config, db: Arc<dyn Database>, port: u16, bind: &str) -> Result<()> {
    config.require_session_secret()?;

    let app = build_router(AppState::new(config, db));

    let addr = format!("{bind}:{port}");
    info!("mediakit API listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    let protected_api = Router::new()
        .route("/api/v1/analyze", post(handlers::analyze::analyze))
        .route("/api/v1/analyze/{id}", get(handlers::analyze::get_analysis))
        .route(
            "/api/v1/brand-readiness-score",
            post(handlers::readiness::brand_readiness_score),
        )
        .route("/api/v1/media-kit", post(handlers::media_kit::create_media_kit))
        .route("/api/v1/media-kits/{id}", get(handlers::media_kit::get_owned_media_kit));

    let governor = GovernorConfigBuilder::default()
        .key_extractor(rate_limit::UserKeyExtractor)
        .period(rate_limit::replenish_period(
            state.config.rate_limit_requests,
            state.config.rate_limit_window_secs,
        ))
        .burst_size(state.config.rate_limit_requests.max(1))
        .finish();

    let protected_api = match governor {
        Some(governor) => {
            let limiter = governor.limiter().clone();
            if let Ok(runtime) = tokio::runtime::Handle::try_current() {
                runtime.spawn(async move {
                    let mut interval = tokio::time::interval(rate_limit::CLEANUP_INTERVAL);
                    loop {
                        interval.tick().await;
                        limiter.retain_recent();
                    }
                });
            }
            protected_api.layer(GovernorLayer::new(governor))
        }
        None => {
            warn!("Invalid rate limit settings; authenticated routes are not rate limited");
            protected_api
        }
    };

    // Layers run outermost-last: auth, then the JSON rejection, then the governor
    let protected_api = protected_api
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            rate_limit::reject_as_json,
        ))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            auth::require_auth,
        ));

    let documents = Router::new()
        .route("/api/v1/media-kits/{id}/html", get(handlers::media_kit::media_kit_html))
        .route("/api/v1/media-kits/{id}/pdf", get(handlers::media_kit::media_kit_pdf))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            auth::optional_auth,
        ));

    let public_api = Router::new()
        .route("/health", get(health))
        .route(
            "/api/v1/media-kit/{username}",
            get(handlers::media_kit::get_public_media_kit),
        )
        .route(
            "/api/v1/media-kit/{username}/view",
            post(handlers::media_kit::track_view),
        );

    Router::new()
        .merge(protected_api)
        .merge(documents)
        .merge(public_api)
        .fallback(not_found)
        .layer(cors_layer(&state.config.cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    if origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(allowed))
}

/// Liveness plus a database round trip.
async fn health(axum::extract::State(state): axum::extract::State<AppState>) -> impl IntoResponse {
    let database = match state.db.table_count().await {
        Ok(_) => "connected",
        Err(e) => {
            error!(error = %e, "Health check could not reach the database");
            "unavailable"
        }
    };
    (
        StatusCode::OK,
        axum::Json(serde_json::json!({
            "status": "ok",
            "version": env!("CARGO_PKG_VERSION"),
            "database": database,
        })),
    )
}

async fn not_found() -> Response {
    api_error(StatusCode::NOT_FOUND, "Not found")
}

/// Typed JSON error response helper.
pub fn api_error(status: StatusCode, message: &str) -> Response {
    (status, axum::Json(serde_json::json!({ "error": message }))).into_response()
}

/// 422 for a rejected input.
pub fn validation_error(err: &ValidationError) -> Response {
    api_error(StatusCode::UNPROCESSABLE_ENTITY, &err.to_string())
}

/// Map an application error to a response: validation failures become 422,
/// everything else is logged and reported as a 500 with `message`.
pub fn internal_error(err: &anyhow::Error, message: &str) -> Response {
    if let Some(validation) = err.downcast_ref::<ValidationError>() {
        return validation_error(validation);
    }
    error!(error = %format!("{err:#}"), "{message}");
    api_error(StatusCode::INTERNAL_SERVER_ERROR, message)
}

/// The authenticated caller. Inserted into request extensions by the auth
/// middleware.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
}
