use std::env;

use crate::navigation::UnknownRolePolicy;

const LOCAL_SESSION_SECRET: &str = "greenverse-local-session-secret";
const DEFAULT_COOKIE_NAME: &str = "gv_session";
const DEFAULT_LOOKUP_TIMEOUT_MS: u64 = 250;
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

/// AppConfig
///
/// Holds the portal's entire configuration. Loaded once at startup and
/// immutable afterwards; handlers and the route gate pull it out of the
/// shared state via `FromRef`.
#[derive(Clone, Debug)]
pub struct AppConfig {
    // Runtime environment marker. Controls the local role-header bypass.
    pub env: Env,
    // HS256 secret shared with the identity provider that signs session tokens.
    pub jwt_secret: String,
    // Cookie carrying the session token.
    pub session_cookie_name: String,
    // Upper bound on the session lookup performed by the route gate.
    pub session_lookup_timeout_ms: u64,
    // What the navigation API does with roles it does not know.
    pub unknown_role_policy: UnknownRolePolicy,
    pub bind_addr: String,
}

/// Env
///
/// `Local` enables developer conveniences (the `x-user-role` header bypass);
/// `Production` requires every secret to be set explicitly.
#[derive(Clone, PartialEq, Debug)]
pub enum Env {
    Local,
    Production,
}

impl Env {
    /// Only an explicit `APP_ENV=local` selects `Local`. Unset, misspelt or
    /// differently cased values all resolve to `Production`.
    pub fn from_env_value(value: Option<&str>) -> Self {
        match value {
            Some("local") => Env::Local,
            _ => Env::Production,
        }
    }
}

impl Default for AppConfig {
    /// Safe, non-panicking values for tests. The role-header bypass stays off
    /// unless a test opts into `Env::Local`.
    fn default() -> Self {
        Self {
            env: Env::Production,
            jwt_secret: LOCAL_SESSION_SECRET.to_string(),
            session_cookie_name: DEFAULT_COOKIE_NAME.to_string(),
            session_lookup_timeout_ms: DEFAULT_LOOKUP_TIMEOUT_MS,
            unknown_role_policy: UnknownRolePolicy::Reject,
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
        }
    }
}

impl AppConfig {
    /// load
    ///
    /// Reads the configuration from environment variables.
    ///
    /// # Panics
    /// Panics in production (including an unset or unrecognised `APP_ENV`)
    /// when `SESSION_JWT_SECRET` is missing, so the service never starts with
    /// a guessable signing key.
    pub fn load() -> Self {
        let env = Env::from_env_value(env::var("APP_ENV").ok().as_deref());

        let jwt_secret = match env {
            Env::Production => env::var("SESSION_JWT_SECRET")
                .expect("FATAL: SESSION_JWT_SECRET must be set in production."),
            Env::Local => env::var("SESSION_JWT_SECRET")
                .unwrap_or_else(|_| LOCAL_SESSION_SECRET.to_string()),
        };

        let session_lookup_timeout_ms = env::var("SESSION_LOOKUP_TIMEOUT_MS")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(DEFAULT_LOOKUP_TIMEOUT_MS);

        let unknown_role_policy = env::var("UNKNOWN_ROLE_POLICY")
            .map(|value| UnknownRolePolicy::from_env_value(&value))
            .unwrap_or_default();

        Self {
            env,
            jwt_secret,
            session_cookie_name: env::var("SESSION_COOKIE_NAME")
                .ok()
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| DEFAULT_COOKIE_NAME.to_string()),
            session_lookup_timeout_ms,
            unknown_role_policy,
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string()),
        }
    }
}
