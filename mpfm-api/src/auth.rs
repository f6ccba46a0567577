/// `/auth/*` endpoints
use crate::client::ApiClient;
use crate::error::{ApiError, Result};
use mpfm_model::auth::{
    AuthPayload, ForgotPasswordRequest, LoginRequest, ResetPasswordRequest, SignupRequest, User,
};
use reqwest::Method;
use serde::Deserialize;

/// `/auth/me` answers either the user itself or `{ user }`.
#[derive(Deserialize)]
#[serde(untagged)]
enum MeResponse {
    Wrapped { user: User },
    Bare(User),
}

impl ApiClient {
    /// Sign in. The returned token is not attached to `self`; callers store
    /// it and build an authenticated client from it.
    pub async fn login(&self, request: &LoginRequest) -> Result<AuthPayload> {
        let payload: AuthPayload = self.send(Method::POST, &["auth", "login"], request).await?;
        log::info!("Signed in as {}", request.email);
        Ok(payload)
    }

    /// Register a new account. Returns the server's confirmation message.
    pub async fn signup(&self, request: &SignupRequest) -> Result<String> {
        self.send_for_message(Method::POST, &["auth", "signup"], request)
            .await
    }

    pub async fn forgot_password(&self, email: &str) -> Result<String> {
        let request = ForgotPasswordRequest {
            email: email.to_string(),
        };
        self.send_for_message(Method::POST, &["auth", "forgot-password"], &request)
            .await
    }

    pub async fn reset_password(&self, request: &ResetPasswordRequest) -> Result<String> {
        self.send_for_message(Method::POST, &["auth", "reset-password"], request)
            .await
    }

    /// The signed-in user. Fails with [`ApiError::NotAuthenticated`] before
    /// any request when no token is set.
    pub async fn current_user(&self) -> Result<User> {
        if self.token().is_none() {
            return Err(ApiError::NotAuthenticated);
        }
        let me: MeResponse = self.get(&["auth", "me"], &[]).await?;
        Ok(match me {
            MeResponse::Wrapped { user } | MeResponse::Bare(user) => user,
        })
    }
}
