use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Public Router Module
///
/// Endpoints reachable by anyone, signed in or not. The route gate never
/// consults the session provider for these paths.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Load balancer probe.
        .route("/health", get(|| async { "ok" }))
        // --- Marketing pages ---
        .route("/", get(handlers::home))
        .route("/about", get(handlers::about))
        .route("/faq", get(handlers::faq))
        .route("/how-it-works", get(handlers::how_it_works))
        // GET renders the page, POST submits the enquiry form.
        .route(
            "/contact",
            get(handlers::contact_page).post(handlers::submit_contact),
        )
        // --- API ---
        .route("/api/hello", get(handlers::hello))
        // GET /api/navigation?role=...&path=...
        .route("/api/navigation", get(handlers::get_navigation))
        // POST /auth/logout
        // Lives under /auth but is not an auth-only path: a signed-in user
        // must be able to reach it.
        .route("/auth/logout", post(handlers::logout))
}
