use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Auth-only Router Module
///
/// The sign-in flows. Each path serves its form descriptor on GET and takes
/// the submission on POST; submissions go to the configured `AuthService`.
pub fn auth_only_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/auth/login",
            get(handlers::login_page).post(handlers::login),
        )
        .route(
            "/auth/signup",
            get(handlers::signup_page).post(handlers::signup),
        )
        .route(
            "/auth/forgot-password",
            get(handlers::forgot_password_page).post(handlers::forgot_password),
        )
}
