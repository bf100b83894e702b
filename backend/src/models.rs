use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::{navigation::NavigationModel, role::Role};

// --- Form Payloads (Input Schemas) ---

/// LoginRequest
///
/// Body of `POST /auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Validate, Default)]
#[ts(export)]
pub struct LoginRequest {
    #[validate(email(message = "Valid email is required"))]
    pub email: String,
    #[validate(custom(function = "not_blank", message = "Password is required"))]
    pub password: String,
    /// Accepted and logged; it does not change session lifetime.
    #[serde(default)]
    pub remember_me: bool,
}

/// SignupRequest
///
/// Body of `POST /auth/signup`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Validate, Default)]
#[ts(export)]
pub struct SignupRequest {
    #[validate(custom(function = "not_blank", message = "Full name is required"))]
    pub full_name: String,
    #[validate(email(message = "Valid email is required"))]
    pub email: String,
    #[validate(custom(function = "not_blank", message = "Password is required"))]
    pub password: String,
    #[validate(must_match(other = "password", message = "Passwords do not match"))]
    pub confirm_password: String,
    #[serde(default)]
    #[validate(custom(
        function = "accepted",
        message = "Terms and conditions must be accepted"
    ))]
    pub accept_terms: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Validate, Default)]
#[ts(export)]
pub struct ForgotPasswordRequest {
    #[validate(email(message = "Valid email is required"))]
    pub email: String,
}

/// ContactRequest
///
/// Body of `POST /contact`, the enquiry form on the marketing site.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Validate, Default)]
#[ts(export)]
pub struct ContactRequest {
    #[validate(custom(function = "not_blank", message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Valid email is required"))]
    pub email: String,
    #[serde(default)]
    pub subject: Option<String>,
    #[validate(custom(function = "not_blank", message = "Message is required"))]
    pub message: String,
}

// Whitespace-only input counts as missing.
fn not_blank(value: &String) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

fn accepted(value: &bool) -> Result<(), ValidationError> {
    if *value {
        Ok(())
    } else {
        Err(ValidationError::new("not_accepted"))
    }
}

// --- Response Payloads (Output Schemas) ---

/// FormAck
///
/// Returned with `202 Accepted` once a form submission has been handed off.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct FormAck {
    pub form: String,
    pub status: String,
    #[ts(type = "string")]
    pub submitted_at: DateTime<Utc>,
}

impl FormAck {
    pub fn received(form: &str) -> Self {
        Self {
            form: form.to_string(),
            status: "received".to_string(),
            submitted_at: Utc::now(),
        }
    }
}

/// PageDescriptor
///
/// Identity of a statically rendered page. The frontend owns the markup.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct PageDescriptor {
    pub path: String,
    pub title: String,
}

/// DashboardShell
///
/// Everything the dashboard layout needs for one render: who is looking,
/// which page, and the sidebar.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct DashboardShell {
    pub user_id: Uuid,
    pub role: Role,
    pub page: String,
    pub navigation: NavigationModel,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HelloResponse {
    pub name: String,
}
