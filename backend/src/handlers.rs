use axum::{
    Json,
    extract::{Query, State},
    http::{StatusCode, Uri, header},
    response::{IntoResponse, Redirect},
};
use serde::Deserialize;
use validator::Validate;

use crate::{
    auth::{self, AuthUser},
    auth_service::AuthServiceState,
    config::AppConfig,
    error::AppError,
    gate::LOGIN_PATH,
    models::{
        ContactRequest, DashboardShell, ForgotPasswordRequest, FormAck, HelloResponse,
        LoginRequest, PageDescriptor, SignupRequest,
    },
    navigation::{self, NavigationModel},
    role::Role,
};

// --- Query Structs ---

/// NavigationQuery
///
/// Parameters of `GET /api/navigation`. `path` defaults to the role's dashboard.
#[derive(Deserialize, utoipa::IntoParams)]
pub struct NavigationQuery {
    pub role: String,
    pub path: Option<String>,
}

fn page(path: &str, title: &str) -> Json<PageDescriptor> {
    Json(PageDescriptor {
        path: path.to_string(),
        title: title.to_string(),
    })
}

// --- Marketing Pages ---

#[utoipa::path(get, path = "/", responses((status = 200, body = PageDescriptor)))]
pub async fn home() -> Json<PageDescriptor> {
    page("/", "GreenVerse")
}

#[utoipa::path(get, path = "/about", responses((status = 200, body = PageDescriptor)))]
pub async fn about() -> Json<PageDescriptor> {
    page("/about", "About Us")
}

#[utoipa::path(get, path = "/faq", responses((status = 200, body = PageDescriptor)))]
pub async fn faq() -> Json<PageDescriptor> {
    page("/faq", "Frequently Asked Questions")
}

#[utoipa::path(get, path = "/how-it-works", responses((status = 200, body = PageDescriptor)))]
pub async fn how_it_works() -> Json<PageDescriptor> {
    page("/how-it-works", "How It Works")
}

#[utoipa::path(get, path = "/contact", responses((status = 200, body = PageDescriptor)))]
pub async fn contact_page() -> Json<PageDescriptor> {
    page("/contact", "Contact Us")
}

/// submit_contact
///
/// [Public Route] Accepts an enquiry from the contact form. Enquiries are
/// only logged; there is no mailbox behind the form.
#[utoipa::path(
    post,
    path = "/contact",
    request_body = ContactRequest,
    responses(
        (status = 202, description = "Enquiry received", body = FormAck),
        (status = 422, description = "Invalid enquiry")
    )
)]
pub async fn submit_contact(
    Json(payload): Json<ContactRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    tracing::info!(
        name = %payload.name,
        email = %payload.email,
        subject = payload.subject.as_deref().unwrap_or(""),
        "contact enquiry submitted"
    );
    Ok((StatusCode::ACCEPTED, Json(FormAck::received("contact"))))
}

// --- API ---

/// hello
///
/// [Public Route] Fixed sample payload kept for the frontend's API smoke check.
#[utoipa::path(get, path = "/api/hello", responses((status = 200, body = HelloResponse)))]
pub async fn hello() -> Json<HelloResponse> {
    Json(HelloResponse {
        name: "John Doe".to_string(),
    })
}

/// get_navigation
///
/// [Public Route] Resolves the sidebar for an arbitrary role and path so the
/// frontend can render navigation without a dashboard round trip. Unknown
/// roles follow the configured `UnknownRolePolicy`.
#[utoipa::path(
    get,
    path = "/api/navigation",
    params(NavigationQuery),
    responses(
        (status = 200, description = "Navigation model", body = NavigationModel),
        (status = 400, description = "Unknown role")
    )
)]
pub async fn get_navigation(
    State(config): State<AppConfig>,
    Query(query): Query<NavigationQuery>,
) -> Result<Json<NavigationModel>, AppError> {
    let current = match query.path {
        Some(path) => path,
        None => format!("/dashboard/{}", query.role),
    };
    let model = navigation::resolve_str(&query.role, &current, config.unknown_role_policy)?;
    Ok(Json(model))
}

// --- Auth-only Forms ---

#[utoipa::path(get, path = "/auth/login", responses((status = 200, body = PageDescriptor)))]
pub async fn login_page() -> Json<PageDescriptor> {
    page("/auth/login", "Log In")
}

#[utoipa::path(get, path = "/auth/signup", responses((status = 200, body = PageDescriptor)))]
pub async fn signup_page() -> Json<PageDescriptor> {
    page("/auth/signup", "Create Account")
}

#[utoipa::path(
    get,
    path = "/auth/forgot-password",
    responses((status = 200, body = PageDescriptor))
)]
pub async fn forgot_password_page() -> Json<PageDescriptor> {
    page("/auth/forgot-password", "Reset Password")
}

/// login
///
/// [Auth-only Route] Hands the login form to the `AuthService`. No session is
/// issued here; tokens come from the identity provider.
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 202, description = "Submission received", body = FormAck),
        (status = 422, description = "Invalid submission")
    )
)]
pub async fn login(
    State(auth): State<AuthServiceState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    auth.login(&payload).await?;
    Ok((StatusCode::ACCEPTED, Json(FormAck::received("login"))))
}

#[utoipa::path(
    post,
    path = "/auth/signup",
    request_body = SignupRequest,
    responses(
        (status = 202, description = "Submission received", body = FormAck),
        (status = 422, description = "Invalid submission")
    )
)]
pub async fn signup(
    State(auth): State<AuthServiceState>,
    Json(payload): Json<SignupRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    auth.signup(&payload).await?;
    Ok((StatusCode::ACCEPTED, Json(FormAck::received("signup"))))
}

#[utoipa::path(
    post,
    path = "/auth/forgot-password",
    request_body = ForgotPasswordRequest,
    responses(
        (status = 202, description = "Submission received", body = FormAck),
        (status = 422, description = "Invalid submission")
    )
)]
pub async fn forgot_password(
    State(auth): State<AuthServiceState>,
    Json(payload): Json<ForgotPasswordRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    auth.forgot_password(&payload).await?;
    Ok((StatusCode::ACCEPTED, Json(FormAck::received("forgot-password"))))
}

/// logout
///
/// [Public Route] Backs the Log Out utility: expires the session cookie and
/// sends the browser to the login page.
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses((status = 303, description = "Session cleared, redirect to login"))
)]
pub async fn logout(State(config): State<AppConfig>) -> Result<impl IntoResponse, AppError> {
    let cleared = auth::clear_session_cookie(&config.session_cookie_name)?;
    Ok(([(header::SET_COOKIE, cleared)], Redirect::to(LOGIN_PATH)))
}

// --- Dashboard ---

/// dashboard_root
///
/// [Protected Route] `/dashboard` has no page of its own; send the user to
/// their role's dashboard.
pub async fn dashboard_root(user: AuthUser) -> Redirect {
    Redirect::temporary(&user.role.dashboard_path())
}

/// dashboard_shell
///
/// [Protected Route] Serves every page of the dashboard surface. The role
/// segment of the path must match the session's role.
#[utoipa::path(
    get,
    path = "/dashboard/{role}",
    params(("role" = String, Path, description = "client, admin or cluster")),
    responses(
        (status = 200, description = "Dashboard shell", body = DashboardShell),
        (status = 403, description = "Dashboard belongs to another role"),
        (status = 307, description = "Not signed in, redirect to login")
    )
)]
pub async fn dashboard_shell(user: AuthUser, uri: Uri) -> Result<Json<DashboardShell>, AppError> {
    let current = uri.path();
    let segment = current.split('/').nth(2).unwrap_or_default();
    let requested: Role = segment.parse()?;

    if requested != user.role {
        tracing::warn!(
            user_id = %user.id,
            role = %user.role,
            requested = %requested,
            "dashboard access denied"
        );
        return Err(AppError::Forbidden(format!(
            "the {requested} dashboard is not available to {} accounts",
            user.role
        )));
    }

    Ok(Json(DashboardShell {
        user_id: user.id,
        role: user.role,
        page: current.to_string(),
        navigation: navigation::resolve(user.role, current),
    }))
}

pub async fn not_found(uri: Uri) -> AppError {
    tracing::debug!(path = %uri.path(), "no route");
    AppError::NotFound(uri.path().to_string())
}
