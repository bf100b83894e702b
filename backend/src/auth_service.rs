use async_trait::async_trait;
use std::sync::Arc;

use crate::{
    error::AppError,
    models::{ForgotPasswordRequest, LoginRequest, SignupRequest},
};

// 1. AuthService Contract
/// AuthService
///
/// Receives the submissions of the login, signup and forgot-password forms.
/// Credential checks and account creation belong to the external identity
/// provider; this trait is the seam where it plugs in.
#[async_trait]
pub trait AuthService: Send + Sync {
    async fn login(&self, req: &LoginRequest) -> Result<(), AppError>;
    async fn signup(&self, req: &SignupRequest) -> Result<(), AppError>;
    async fn forgot_password(&self, req: &ForgotPasswordRequest) -> Result<(), AppError>;
}

pub type AuthServiceState = Arc<dyn AuthService>;

// 2. The Shipped Implementation
/// ConsoleAuthService
///
/// Logs each submission and accepts it. Passwords are never logged.
#[derive(Clone, Default)]
pub struct ConsoleAuthService;

#[async_trait]
impl AuthService for ConsoleAuthService {
    async fn login(&self, req: &LoginRequest) -> Result<(), AppError> {
        tracing::info!(
            email = %req.email,
            remember_me = req.remember_me,
            "login form submitted"
        );
        Ok(())
    }

    async fn signup(&self, req: &SignupRequest) -> Result<(), AppError> {
        tracing::info!(
            email = %req.email,
            full_name = %req.full_name,
            accept_terms = req.accept_terms,
            "signup form submitted"
        );
        Ok(())
    }

    async fn forgot_password(&self, req: &ForgotPasswordRequest) -> Result<(), AppError> {
        tracing::info!(email = %req.email, "password reset requested");
        Ok(())
    }
}
