//! CLI command handlers.

use t4b_core::api::ApiError;

pub mod address;
pub mod auth;
pub mod bikes;
pub mod config;
pub mod dashboard;
pub mod maintenances;
pub mod weather;

/// Turns a failed API call into the message shown to the user.
///
/// Unauthorized errors are passed through untouched so `main` can recognize
/// them; everything else becomes the server's `detail` or `fallback`.
pub(crate) fn api_failure(err: ApiError, fallback: &str) -> anyhow::Error {
    if err.is_unauthorized() {
        return err.into();
    }
    tracing::debug!(kind = %err.kind, status = ?err.status, body = ?err.body, "api call failed");
    anyhow::anyhow!(err.user_message(fallback))
}
