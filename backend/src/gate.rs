use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use ts_rs::TS;
use utoipa::ToSchema;

use crate::{AppState, auth::Session};

pub const LOGIN_PATH: &str = "/auth/login";
/// Query parameter carrying the page a bounced visitor was headed for.
pub const RETURN_TO_PARAM: &str = "redirectTo";

const PROTECTED_PREFIX: &str = "/dashboard";
const AUTH_ONLY_PREFIXES: &[&str] = &["/auth/login", "/auth/signup", "/auth/forgot-password"];

/// RouteClass
///
/// Access category of a request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "kebab-case")]
#[ts(export)]
pub enum RouteClass {
    /// Requires a valid session.
    Protected,
    /// Login/signup flows; signed-in visitors are sent to their dashboard.
    AuthOnly,
    Public,
}

/// classify
///
/// Rules are checked protected, then auth-only, then public; the prefixes do
/// not overlap so the first match is the only match.
pub fn classify(path: &str) -> RouteClass {
    if path.starts_with(PROTECTED_PREFIX) {
        RouteClass::Protected
    } else if AUTH_ONLY_PREFIXES.iter().any(|prefix| path.starts_with(prefix)) {
        RouteClass::AuthOnly
    } else {
        RouteClass::Public
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Allow,
    Redirect(String),
}

/// `/auth/login?redirectTo=<original>`, the original path and query
/// percent-encoded.
pub fn login_redirect(original: &str) -> String {
    format!(
        "{LOGIN_PATH}?{RETURN_TO_PARAM}={}",
        urlencoding::encode(original)
    )
}

/// decide
///
/// Pure decision over a classified path. `session` must already be filtered
/// to valid sessions; anything else is passed as `None`.
pub fn decide(class: RouteClass, original: &str, session: Option<&Session>) -> GateDecision {
    match (class, session) {
        (RouteClass::Protected, None) => GateDecision::Redirect(login_redirect(original)),
        (RouteClass::AuthOnly, Some(session)) => {
            GateDecision::Redirect(session.role.dashboard_path())
        }
        (RouteClass::Protected, Some(_))
        | (RouteClass::AuthOnly, None)
        | (RouteClass::Public, _) => GateDecision::Allow,
    }
}

/// Asks the session provider once, bounded by the configured timeout.
/// Timeouts and invalid sessions both come back as `None`.
async fn lookup_session(state: &AppState, headers: &HeaderMap) -> Option<Session> {
    let limit = Duration::from_millis(state.config.session_lookup_timeout_ms);
    match tokio::time::timeout(limit, state.sessions.get_session(headers)).await {
        Ok(session) => session.filter(|session| session.valid),
        Err(_) => {
            tracing::warn!(
                timeout_ms = state.config.session_lookup_timeout_ms,
                "session lookup timed out, treating request as signed out"
            );
            None
        }
    }
}

/// route_gate
///
/// Edge middleware wrapped around every route and the fallback, so it runs
/// before any handler or 404. Public paths pass without touching the
/// session provider. A resolved session is stored in the request extensions
/// for the `AuthUser` extractor.
pub async fn route_gate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    let class = classify(&path);

    if class == RouteClass::Public {
        return next.run(request).await;
    }

    let session = lookup_session(&state, request.headers()).await;
    let original = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| path.clone());

    match decide(class, &original, session.as_ref()) {
        GateDecision::Allow => {
            tracing::debug!(path = %path, class = ?class, "route gate: allow");
            if let Some(session) = session {
                request.extensions_mut().insert(session);
            }
            next.run(request).await
        }
        GateDecision::Redirect(location) => {
            tracing::info!(
                path = %path,
                class = ?class,
                location = %location,
                "route gate: redirect"
            );
            Redirect::temporary(&location).into_response()
        }
    }
}
