use async_trait::async_trait;
use axum::{
    extract::{FromRef, FromRequestParts},
    http::{HeaderMap, HeaderValue, header, request::Parts},
};
use chrono::Utc;
use cookie::{Cookie, SameSite};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    config::{AppConfig, Env},
    error::AppError,
    role::Role,
};

/// Header honoured in `Env::Local` to impersonate a role without a token.
pub const ROLE_BYPASS_HEADER: &str = "x-user-role";
/// Optional companion to the bypass header, pinning the user id.
pub const USER_ID_BYPASS_HEADER: &str = "x-user-id";

/// Claims
///
/// Payload of the session token signed by the identity provider.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user's id.
    pub sub: Uuid,
    /// Role the account was registered with. A token carrying an unknown
    /// role fails to decode and is treated as no session at all.
    pub role: Role,
    pub exp: usize,
    pub iat: usize,
}

/// Session
///
/// What the route gate learns about the caller. `valid` lets a provider report
/// a recognised but unusable session (revoked, suspended) without hiding it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: Uuid,
    pub role: Role,
    pub valid: bool,
}

/// SessionProvider
///
/// The authentication collaborator queried once per request by the route gate.
/// Implementations must not fail loudly: anything unreadable is `None`.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    async fn get_session(&self, headers: &HeaderMap) -> Option<Session>;
}

pub type SessionState = Arc<dyn SessionProvider>;

/// JwtSessionProvider
///
/// Verifies HS256 session tokens. The session cookie is tried first; when it
/// is missing or fails verification the `Authorization: Bearer` header is
/// tried next. The `x-user-role` bypass is honoured only in `Env::Local`.
#[derive(Clone)]
pub struct JwtSessionProvider {
    decoding_key: DecodingKey,
    cookie_name: String,
    env: Env,
}

impl JwtSessionProvider {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            cookie_name: config.session_cookie_name.clone(),
            env: config.env.clone(),
        }
    }

    fn local_bypass(&self, headers: &HeaderMap) -> Option<Session> {
        let role = headers
            .get(ROLE_BYPASS_HEADER)?
            .to_str()
            .ok()?
            .parse::<Role>()
            .ok()?;
        let user_id = headers
            .get(USER_ID_BYPASS_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| Uuid::parse_str(value).ok())
            .unwrap_or(Uuid::nil());
        Some(Session {
            user_id,
            role,
            valid: true,
        })
    }

    fn bearer_token(headers: &HeaderMap) -> Option<String> {
        headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::to_string)
    }

    fn verify(&self, token: &str) -> Option<Session> {
        let mut validation = Validation::default();
        validation.validate_exp = true;

        match decode::<Claims>(token, &self.decoding_key, &validation) {
            Ok(data) => Some(Session {
                user_id: data.claims.sub,
                role: data.claims.role,
                valid: true,
            }),
            Err(e) => {
                tracing::debug!(error = %e, "session token rejected");
                None
            }
        }
    }
}

#[async_trait]
impl SessionProvider for JwtSessionProvider {
    async fn get_session(&self, headers: &HeaderMap) -> Option<Session> {
        if self.env == Env::Local {
            if let Some(session) = self.local_bypass(headers) {
                return Some(session);
            }
        }

        // Cookie first; a stale cookie must not hide a valid bearer token.
        cookie_value(headers, &self.cookie_name)
            .and_then(|token| self.verify(&token))
            .or_else(|| Self::bearer_token(headers).and_then(|token| self.verify(&token)))
    }
}

/// Reads cookie `name` from every `Cookie` header on the request.
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == name)
        .map(|cookie| cookie.value().to_string())
}

/// Signs a session token for `user_id`. Used by identity providers sharing
/// the secret and by tests.
pub fn issue_session_token(
    user_id: Uuid,
    role: Role,
    secret: &str,
    ttl_secs: i64,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: user_id,
        role,
        iat: now.max(0) as usize,
        exp: (now + ttl_secs).max(0) as usize,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// `Set-Cookie` value that expires the session cookie immediately.
pub fn clear_session_cookie(cookie_name: &str) -> Result<HeaderValue, AppError> {
    let cookie = Cookie::build((cookie_name, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(cookie::time::Duration::ZERO)
        .build();
    HeaderValue::from_str(&cookie.to_string())
        .map_err(|e| AppError::Internal(format!("session cookie header: {e}")))
}

/// AuthUser
///
/// The resolved identity of a dashboard request.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub role: Role,
}

impl From<Session> for AuthUser {
    fn from(session: Session) -> Self {
        AuthUser {
            id: session.user_id,
            role: session.role,
        }
    }
}

/// AuthUser Extractor Implementation
///
/// Reuses the session the route gate stored in the request extensions. When
/// the handler is reached without the gate (tests, future routers) the
/// session provider is asked directly.
///
/// Rejection: `AppError::Unauthorized` (401) when no valid session exists.
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    SessionState: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(session) = parts.extensions.get::<Session>() {
            if session.valid {
                return Ok(AuthUser::from(session.clone()));
            }
        }

        let sessions = SessionState::from_ref(state);
        sessions
            .get_session(&parts.headers)
            .await
            .filter(|session| session.valid)
            .map(AuthUser::from)
            .ok_or(AppError::Unauthorized)
    }
}
