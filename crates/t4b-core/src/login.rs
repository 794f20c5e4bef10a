//! Two-step one-time-code login.
//!
//! ```text
//! AwaitingCode --submit_email ok--> AwaitingVerification --submit_code ok--> Authenticated
//!      ^                                   |
//!      +--------------- back --------------+
//! ```
//!
//! Failures never change the step. There is no client-side retry limit, no
//! code expiry timer and no resend throttling; the server owns all of that.

use anyhow::Result;

use crate::api::{ApiError, AuthApi};
use crate::session::Session;

/// Number of digits in a one-time code.
pub const CODE_LENGTH: usize = 6;

/// Fallback shown when requesting a code fails without a server message.
pub const REQUEST_CODE_FAILED: &str = "Erro ao enviar código";

/// Fallback shown when verification fails without a server message.
pub const INVALID_CODE: &str = "Código inválido ou expirado";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoginStep {
    #[default]
    AwaitingCode,
    AwaitingVerification,
}

/// Result of a successful verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    /// Token installed in the session; caller moves on to the app.
    Authenticated,
}

/// Keeps ASCII digits only and truncates to [`CODE_LENGTH`].
pub fn sanitize_code(raw: &str) -> String {
    raw.chars()
        .filter(char::is_ascii_digit)
        .take(CODE_LENGTH)
        .collect()
}

/// Transient login attempt; never persisted.
#[derive(Debug, Clone, Default)]
pub struct LoginFlow {
    email: String,
    step: LoginStep,
    code: String,
    error: Option<String>,
}

impl LoginFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> LoginStep {
        self.step
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    /// Message from the last failed submission, cleared on success or `back`.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn set_email(&mut self, email: &str) {
        self.email = email.trim().to_string();
    }

    /// Stores `raw` as the code after stripping non-digits and truncating.
    pub fn input_code(&mut self, raw: &str) {
        self.code = sanitize_code(raw);
    }

    /// True when the stored code has exactly [`CODE_LENGTH`] digits.
    pub fn can_verify(&self) -> bool {
        self.code.len() == CODE_LENGTH
    }

    /// Requests a code for the current email.
    ///
    /// On success moves to [`LoginStep::AwaitingVerification`] keeping the
    /// email. On failure stays put and records the server's `detail` (or a
    /// generic fallback) as the error; the returned error is the same message.
    ///
    /// # Errors
    /// Fails without a request when not in [`LoginStep::AwaitingCode`] or the
    /// email is blank; fails with the recorded message when the call fails.
    pub async fn submit_email(&mut self, auth: &AuthApi<'_>) -> Result<()> {
        if self.step != LoginStep::AwaitingCode {
            anyhow::bail!("A code was already requested; verify it or go back first");
        }
        if self.email.is_empty() {
            anyhow::bail!("Email cannot be empty");
        }

        self.error = None;
        match auth.request_code(&self.email).await {
            Ok(()) => {
                tracing::info!("login code requested");
                self.step = LoginStep::AwaitingVerification;
                Ok(())
            }
            Err(e) => {
                tracing::debug!(error = %e, "request-code failed");
                let message = failure_message(&e, REQUEST_CODE_FAILED);
                self.error = Some(message.clone());
                Err(anyhow::anyhow!(message))
            }
        }
    }

    /// Verifies the stored code and installs the returned token in `session`.
    ///
    /// On failure stays in [`LoginStep::AwaitingVerification`] without
    /// clearing the email or code.
    ///
    /// # Errors
    /// Fails without a request when not awaiting verification or when the
    /// code is not exactly six digits; fails with the recorded message when
    /// verification is rejected; fails if the token cannot be persisted.
    pub async fn submit_code(
        &mut self,
        auth: &AuthApi<'_>,
        session: &Session,
    ) -> Result<LoginOutcome> {
        if self.step != LoginStep::AwaitingVerification {
            anyhow::bail!("Request a code before verifying");
        }
        if !self.can_verify() {
            anyhow::bail!("O código deve ter {CODE_LENGTH} dígitos");
        }

        self.error = None;
        match auth.verify_code(&self.email, &self.code).await {
            Ok(response) => {
                session.set(&response.token)?;
                Ok(LoginOutcome::Authenticated)
            }
            Err(e) => {
                tracing::debug!(error = %e, "verify-code failed");
                let message = failure_message(&e, INVALID_CODE);
                self.error = Some(message.clone());
                Err(anyhow::anyhow!(message))
            }
        }
    }

    /// Returns to [`LoginStep::AwaitingCode`], discarding the code and any
    /// error. The email is kept.
    pub fn back(&mut self) {
        self.step = LoginStep::AwaitingCode;
        self.code.clear();
        self.error = None;
    }
}

/// A 401 during login means the credentials were rejected, not that a
/// session expired.
fn failure_message(err: &ApiError, fallback: &str) -> String {
    if err.is_unauthorized() {
        err.detail().unwrap_or_else(|| fallback.to_string())
    } else {
        err.user_message(fallback)
    }
}
