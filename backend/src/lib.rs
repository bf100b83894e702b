use axum::{
    Router,
    extract::FromRef,
    http::HeaderName,
    middleware,
};
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

// Shared role/permission types.
pub mod error;
pub mod role;

// The two decision components.
pub mod gate;
pub mod navigation;

// Collaborators and the HTTP surface.
pub mod auth;
pub mod auth_service;
pub mod config;
pub mod handlers;
pub mod models;

// Routes grouped by access class (Public, Auth-only, Protected).
pub mod routes;
use routes::{auth_only, protected, public};

// --- Public Re-exports ---

pub use auth::{JwtSessionProvider, SessionState};
pub use auth_service::{AuthServiceState, ConsoleAuthService};
pub use config::AppConfig;
pub use error::{AppError, InvalidRoleError};
pub use role::Role;

/// ApiDoc
///
/// OpenAPI document for the portal, served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::home, handlers::about, handlers::faq, handlers::how_it_works,
        handlers::contact_page, handlers::submit_contact, handlers::hello,
        handlers::get_navigation, handlers::login_page, handlers::signup_page,
        handlers::forgot_password_page, handlers::login, handlers::signup,
        handlers::forgot_password, handlers::logout, handlers::dashboard_shell
    ),
    components(
        schemas(
            models::LoginRequest, models::SignupRequest, models::ForgotPasswordRequest,
            models::ContactRequest, models::FormAck, models::PageDescriptor,
            models::DashboardShell, models::HelloResponse, navigation::NavigationModel,
            navigation::NavItem, navigation::UtilityItem, navigation::UtilityAction,
            navigation::IconRef, gate::RouteClass, role::Role,
        )
    ),
    tags(
        (name = "greenverse", description = "GreenVerse portal edge API")
    )
)]
struct ApiDoc;

/// AppState
///
/// Single, immutable container shared by every request: the session
/// provider consulted by the route gate, the form submission sink, and the
/// loaded configuration.
#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionState,
    pub auth: AuthServiceState,
    pub config: AppConfig,
}

impl AppState {
    /// Wires the shipped collaborators: JWT sessions and the logging auth service.
    pub fn from_config(config: AppConfig) -> Self {
        Self {
            sessions: Arc::new(JwtSessionProvider::new(&config)),
            auth: Arc::new(ConsoleAuthService),
            config,
        }
    }
}

// --- Axum FromRef Extractor Implementations ---

impl FromRef<AppState> for SessionState {
    fn from_ref(app_state: &AppState) -> SessionState {
        app_state.sessions.clone()
    }
}

impl FromRef<AppState> for AuthServiceState {
    fn from_ref(app_state: &AppState) -> AuthServiceState {
        app_state.auth.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// create_router
///
/// Assembles the routing structure, the route gate and the observability
/// layers, and registers the application state.
pub fn create_router(state: AppState) -> Router {
    // 1. CORS Configuration
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    let x_request_id = HeaderName::from_static("x-request-id");

    // 2. Base Router Assembly
    let base_router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(public::public_routes())
        .merge(auth_only::auth_only_routes())
        .merge(protected::protected_routes())
        // The fallback is registered before the gate layer so unknown
        // dashboard paths are still gated before they 404.
        .fallback(handlers::not_found)
        // 3. Route Gate: classifies every request path and allows or redirects.
        .layer(middleware::from_fn_with_state(state.clone(), gate::route_gate))
        .with_state(state);

    // 4. Observability and Correlation Layers (outermost)
    base_router
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        .layer(cors)
}

/// trace_span_logger
///
/// Span factory for `TraceLayer`: every log line of a request carries its
/// method, URI and `x-request-id`.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
