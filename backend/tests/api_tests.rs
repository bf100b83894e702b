use async_trait::async_trait;
use axum::{
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
    response::Response,
};
use greenverse_portal::{
    AppConfig, AppError, AppState, Role,
    auth::issue_session_token,
    auth_service::AuthService,
    config::Env,
    create_router,
    models::{DashboardShell, ForgotPasswordRequest, LoginRequest, SignupRequest},
    navigation::{NavigationModel, UnknownRolePolicy},
};
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use tower::util::ServiceExt;
use uuid::Uuid;

// --- Recording Auth Service ---

#[derive(Default)]
struct RecordingAuthService {
    submissions: Mutex<Vec<String>>,
}

#[async_trait]
impl AuthService for RecordingAuthService {
    async fn login(&self, req: &LoginRequest) -> Result<(), AppError> {
        self.submissions.lock().unwrap().push(format!("login:{}", req.email));
        Ok(())
    }
    async fn signup(&self, req: &SignupRequest) -> Result<(), AppError> {
        self.submissions.lock().unwrap().push(format!("signup:{}", req.email));
        Ok(())
    }
    async fn forgot_password(&self, req: &ForgotPasswordRequest) -> Result<(), AppError> {
        self.submissions.lock().unwrap().push(format!("forgot:{}", req.email));
        Ok(())
    }
}

// --- Helpers ---

const SECRET: &str = "api-test-secret";
const USER_ID: Uuid = Uuid::from_u128(42);

fn test_config() -> AppConfig {
    AppConfig {
        env: Env::Production,
        jwt_secret: SECRET.to_string(),
        ..AppConfig::default()
    }
}

fn app() -> axum::Router {
    create_router(AppState::from_config(test_config()))
}

fn app_with_auth(auth: Arc<RecordingAuthService>) -> axum::Router {
    let mut state = AppState::from_config(test_config());
    state.auth = auth as Arc<dyn AuthService>;
    create_router(state)
}

fn session_cookie(role: Role) -> String {
    let token = issue_session_token(USER_ID, role, SECRET, 3600).unwrap();
    format!("gv_session={token}")
}

async fn send(router: axum::Router, request: Request<Body>) -> Response {
    router.oneshot(request).await.unwrap()
}

fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn json_body<T: serde::de::DeserializeOwned>(response: Response) -> T {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn location(response: &Response) -> &str {
    response.headers()[header::LOCATION].to_str().unwrap()
}

// --- Public Surface ---

#[tokio::test]
async fn test_health_check() {
    let response = send(app(), get("/health", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"ok");
}

#[tokio::test]
async fn test_marketing_pages_are_public() {
    for (path, title) in [
        ("/", "GreenVerse"),
        ("/about", "About Us"),
        ("/faq", "Frequently Asked Questions"),
        ("/how-it-works", "How It Works"),
        ("/contact", "Contact Us"),
    ] {
        let response = send(app(), get(path, None)).await;
        assert_eq!(response.status(), StatusCode::OK, "{path}");
        let body: Value = json_body(response).await;
        assert_eq!(body["path"], path);
        assert_eq!(body["title"], title);
    }
}

#[tokio::test]
async fn test_hello_returns_fixed_payload() {
    let response = send(app(), get("/api/hello", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = json_body(response).await;
    assert_eq!(body, json!({ "name": "John Doe" }));
}

#[tokio::test]
async fn test_request_id_is_propagated() {
    let response = send(app(), get("/health", None)).await;
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn test_contact_form_validation() {
    let ok = send(
        app(),
        post_json(
            "/contact",
            json!({ "name": "Ada", "email": "ada@greenverse.io", "message": "Pickup?" }),
            None,
        ),
    )
    .await;
    assert_eq!(ok.status(), StatusCode::ACCEPTED);
    let body: Value = json_body(ok).await;
    assert_eq!(body["form"], "contact");
    assert_eq!(body["status"], "received");

    let bad = send(
        app(),
        post_json(
            "/contact",
            json!({ "name": "Ada", "email": "not-an-email", "message": "Pickup?" }),
            None,
        ),
    )
    .await;
    assert_eq!(bad.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = json_body(bad).await;
    assert!(body["error"].as_str().unwrap().contains("email: Valid email is required"));
}

// --- Navigation API ---

#[tokio::test]
async fn test_navigation_api_resolves_active_item() {
    let response = send(
        app(),
        get("/api/navigation?role=admin&path=/dashboard/admin/users/42", None),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let model: NavigationModel = json_body(response).await;
    assert_eq!(model.role, Role::Admin);
    assert_eq!(model.active_path.as_deref(), Some("/dashboard/admin/users"));
}

#[tokio::test]
async fn test_navigation_api_defaults_path_to_dashboard() {
    let response = send(app(), get("/api/navigation?role=cluster", None)).await;
    let model: NavigationModel = json_body(response).await;
    assert_eq!(model.active_path.as_deref(), Some("/dashboard/cluster"));
}

#[tokio::test]
async fn test_navigation_api_rejects_unknown_role() {
    let response = send(app(), get("/api/navigation?role=superadmin", None)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = json_body(response).await;
    assert!(body["error"].as_str().unwrap().contains("superadmin"));
}

#[tokio::test]
async fn test_navigation_api_fallback_policy() {
    let config = AppConfig {
        unknown_role_policy: UnknownRolePolicy::DefaultClient,
        ..test_config()
    };
    let router = create_router(AppState::from_config(config));
    let response = send(router, get("/api/navigation?role=superadmin", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let model: NavigationModel = json_body(response).await;
    assert_eq!(model.role, Role::Client);
}

// --- Route Gate ---

#[tokio::test]
async fn test_dashboard_redirects_to_login_when_signed_out() {
    let response = send(app(), get("/dashboard/client/submissions?page=2", None)).await;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        location(&response),
        "/auth/login?redirectTo=%2Fdashboard%2Fclient%2Fsubmissions%3Fpage%3D2"
    );
}

#[tokio::test]
async fn test_signed_in_visitor_is_sent_away_from_login() {
    let cookie = session_cookie(Role::Cluster);
    for path in ["/auth/login", "/auth/signup", "/auth/forgot-password"] {
        let response = send(app(), get(path, Some(&cookie))).await;
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT, "{path}");
        assert_eq!(location(&response), "/dashboard/cluster");
    }
}

#[tokio::test]
async fn test_auth_pages_render_when_signed_out() {
    let response = send(app(), get("/auth/login", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = json_body(response).await;
    assert_eq!(body["title"], "Log In");
}

#[tokio::test]
async fn test_role_header_ignored_with_default_config() {
    let state = AppState::from_config(AppConfig::default());
    let request = Request::builder()
        .uri("/dashboard/admin")
        .header("x-user-role", "admin")
        .body(Body::empty())
        .unwrap();

    let response = send(create_router(state), request).await;

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert!(location(&response).starts_with("/auth/login?redirectTo="));
}

#[tokio::test]
async fn test_expired_cookie_counts_as_signed_out() {
    let token = issue_session_token(USER_ID, Role::Admin, SECRET, -3600).unwrap();
    let cookie = format!("gv_session={token}");
    let response = send(app(), get("/dashboard/admin", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
}

// --- Dashboard Shell ---

#[tokio::test]
async fn test_dashboard_shell_for_own_role() {
    let cookie = session_cookie(Role::Admin);
    let response = send(app(), get("/dashboard/admin/users/42", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);

    let shell: DashboardShell = json_body(response).await;
    assert_eq!(shell.user_id, USER_ID);
    assert_eq!(shell.role, Role::Admin);
    assert_eq!(shell.page, "/dashboard/admin/users/42");
    let labels: Vec<_> = shell.navigation.items.iter().map(|i| i.label.as_str()).collect();
    assert_eq!(labels, ["Dashboard", "Users", "Clusters"]);
    assert_eq!(
        shell.navigation.active_item().map(|i| i.label.as_str()),
        Some("Users")
    );
}

#[tokio::test]
async fn test_every_navigation_entry_has_a_page() {
    for role in Role::ALL {
        let cookie = session_cookie(role);
        for item in greenverse_portal::navigation::navigation_set(role) {
            let response = send(app(), get(&item.path, Some(&cookie))).await;
            assert_eq!(response.status(), StatusCode::OK, "{}", item.path);
            let shell: DashboardShell = json_body(response).await;
            assert_eq!(shell.navigation.active_path.as_deref(), Some(item.path.as_str()));
        }
    }
}

#[tokio::test]
async fn test_other_roles_dashboard_is_forbidden() {
    let cookie = session_cookie(Role::Client);
    let response = send(app(), get("/dashboard/admin/users", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_dashboard_root_redirects_to_role_dashboard() {
    let cookie = session_cookie(Role::Cluster);
    let response = send(app(), get("/dashboard", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response), "/dashboard/cluster");
}

#[tokio::test]
async fn test_unknown_dashboard_section_is_not_found() {
    let cookie = session_cookie(Role::Client);
    let response = send(app(), get("/dashboard/client/billing", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// --- Auth Forms ---

#[tokio::test]
async fn test_login_submission_is_delegated() {
    let auth = Arc::new(RecordingAuthService::default());
    let response = send(
        app_with_auth(auth.clone()),
        post_json(
            "/auth/login",
            json!({ "email": "ops@greenverse.io", "password": "s3cret", "remember_me": true }),
            None,
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::ACCEPTED);
    assert_eq!(*auth.submissions.lock().unwrap(), ["login:ops@greenverse.io"]);
}

#[tokio::test]
async fn test_signup_requires_terms() {
    let auth = Arc::new(RecordingAuthService::default());
    let response = send(
        app_with_auth(auth.clone()),
        post_json(
            "/auth/signup",
            json!({
                "full_name": "Ada Green",
                "email": "ada@greenverse.io",
                "password": "compost",
                "confirm_password": "compost"
            }),
            None,
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(auth.submissions.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_signup_rejects_mismatched_passwords() {
    let auth = Arc::new(RecordingAuthService::default());
    let response = send(
        app_with_auth(auth.clone()),
        post_json(
            "/auth/signup",
            json!({
                "full_name": "Ada Green",
                "email": "ada@greenverse.io",
                "password": "compost",
                "confirm_password": "landfill",
                "accept_terms": true
            }),
            None,
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = json_body(response).await;
    assert_eq!(
        body["error"],
        "validation failed: confirm_password: Passwords do not match"
    );
    assert!(auth.submissions.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_forgot_password_submission() {
    let auth = Arc::new(RecordingAuthService::default());
    let response = send(
        app_with_auth(auth.clone()),
        post_json(
            "/auth/forgot-password",
            json!({ "email": "ada@greenverse.io" }),
            None,
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let body: Value = json_body(response).await;
    assert_eq!(body["form"], "forgot-password");
    assert_eq!(*auth.submissions.lock().unwrap(), ["forgot:ada@greenverse.io"]);
}

#[tokio::test]
async fn test_signed_in_login_post_is_redirected_not_submitted() {
    let auth = Arc::new(RecordingAuthService::default());
    let cookie = session_cookie(Role::Client);
    let response = send(
        app_with_auth(auth.clone()),
        post_json(
            "/auth/login",
            json!({ "email": "ops@greenverse.io", "password": "s3cret" }),
            Some(&cookie),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert!(auth.submissions.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_logout_clears_cookie_for_signed_in_user() {
    let cookie = session_cookie(Role::Admin);
    let request = Request::builder()
        .method(Method::POST)
        .uri("/auth/logout")
        .header(header::COOKIE, &cookie)
        .body(Body::empty())
        .unwrap();
    let response = send(app(), request).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/auth/login");
    let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
    assert!(set_cookie.starts_with("gv_session="));
    assert!(set_cookie.contains("Max-Age=0"));
}
