use crate::{AppState, handlers, navigation, role::Role};
use axum::{Router, routing::get};

/// Protected Router Module
///
/// The dashboard surface is generated from the navigation sets, so every
/// sidebar entry has a page behind it and nothing outside the sets is served.
/// Section pages also take sub-paths (`/dashboard/admin/users/42`); the base
/// Dashboard entry does not, so unknown sections fall through to 404.
pub fn protected_routes() -> Router<AppState> {
    let mut router = Router::new()
        // GET /dashboard
        // Redirects to the session role's own dashboard.
        .route("/dashboard", get(handlers::dashboard_root));

    for role in Role::ALL {
        let base = role.dashboard_path();
        for item in navigation::navigation_set(role) {
            router = router.route(&item.path, get(handlers::dashboard_shell));
            if item.path != base {
                router = router.route(
                    &format!("{}/{{*rest}}", item.path),
                    get(handlers::dashboard_shell),
                );
            }
        }
    }

    router
}
