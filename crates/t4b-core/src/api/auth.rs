//! One-time-code authentication endpoints (`/auth`).

use serde::Serialize;

use super::types::TokenResponse;
use super::{ApiClient, ApiResult};

#[derive(Serialize)]
struct RequestCodeBody<'a> {
    email: &'a str,
}

#[derive(Serialize)]
struct VerifyCodeBody<'a> {
    email: &'a str,
    code: &'a str,
}

pub struct AuthApi<'a> {
    client: &'a ApiClient,
}

impl<'a> AuthApi<'a> {
    pub(super) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Asks the backend to send a one-time code to `email`.
    ///
    /// # Errors
    /// Propagates the transport error unchanged.
    pub async fn request_code(&self, email: &str) -> ApiResult<()> {
        self.client
            .post_empty("/auth/request-code", &RequestCodeBody { email })
            .await
    }

    /// Exchanges `(email, code)` for a bearer token.
    ///
    /// # Errors
    /// Propagates the transport error unchanged.
    pub async fn verify_code(&self, email: &str, code: &str) -> ApiResult<TokenResponse> {
        self.client
            .post("/auth/verify-code", &VerifyCodeBody { email, code })
            .await
    }
}
