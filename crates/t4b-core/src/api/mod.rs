//! HTTP transport and per-resource façades for the Tech4Bike REST API.
//!
//! Every request goes through [`ApiClient`], which attaches the session's
//! bearer token when one is present and tears the session down on any 401.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::session::Session;

mod address;
mod auth;
mod bikes;
pub mod error;
mod maintenances;
pub mod types;
mod weather;

pub use address::{AddressApi, CepLookup};
pub use auth::AuthApi;
pub use bikes::BikesApi;
pub use error::{ApiError, ApiErrorKind, ApiResult};
pub use maintenances::MaintenancesApi;
pub use types::{
    Address, Bike, BikeCreate, BikeUpdate, GoodCyclingDays, Maintenance, MaintenanceCreate,
    MaintenanceUpdate, TokenResponse, WeatherDay, WeatherForecast,
};
pub use weather::{Forecast, WeatherApi};

/// Standard User-Agent header for t4b API requests.
pub const USER_AGENT: &str = concat!("t4b/", env!("CARGO_PKG_VERSION"));

/// Transport settings resolved from config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Base URL without trailing slash, e.g. `http://localhost:8000/api/v1`
    pub base_url: String,
    /// Per-request timeout (`None` waits indefinitely)
    pub timeout: Option<Duration>,
}

/// HTTP client bound to one base URL and one session.
#[derive(Debug, Clone)]
pub struct ApiClient {
    config: ApiConfig,
    http: reqwest::Client,
    session: Arc<Session>,
}

impl ApiClient {
    /// Creates a client with JSON default headers.
    ///
    /// # Errors
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: ApiConfig, session: Arc<Session>) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut builder = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build HTTP client: {e}"))?;

        Ok(Self {
            config,
            http,
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    pub fn bikes(&self) -> BikesApi<'_> {
        BikesApi::new(self)
    }

    pub fn maintenances(&self) -> MaintenancesApi<'_> {
        MaintenancesApi::new(self)
    }

    pub fn address(&self) -> AddressApi<'_> {
        AddressApi::new(self)
    }

    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi::new(self)
    }

    pub fn weather(&self) -> WeatherApi<'_> {
        WeatherApi::new(self)
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let response = self.dispatch(self.request(Method::GET, path)).await?;
        decode(response).await
    }

    pub(crate) async fn get_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> ApiResult<T> {
        let response = self
            .dispatch(self.request(Method::GET, path).query(query))
            .await?;
        decode(response).await
    }

    pub(crate) async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        let response = self
            .dispatch(self.request(Method::POST, path).json(body))
            .await?;
        decode(response).await
    }

    /// POST whose response body is ignored.
    pub(crate) async fn post_empty<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<()> {
        self.dispatch(self.request(Method::POST, path).json(body))
            .await?;
        Ok(())
    }

    pub(crate) async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        let response = self
            .dispatch(self.request(Method::PUT, path).json(body))
            .await?;
        decode(response).await
    }

    pub(crate) async fn delete(&self, path: &str) -> ApiResult<()> {
        self.dispatch(self.request(Method::DELETE, path)).await?;
        Ok(())
    }

    /// Builds a request, attaching `Authorization: Bearer <token>` when the
    /// session holds a token. Anonymous requests carry no such header.
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.config.base_url, path);
        let builder = self.http.request(method, url);
        match self.session.get() {
            Some(token) => builder.header(AUTHORIZATION, format!("Bearer {token}")),
            None => builder,
        }
    }

    /// Sends a request and applies the response rules: transport failures and
    /// non-success statuses become [`ApiError`]s, and a 401 from any endpoint
    /// clears the session before the error is returned.
    async fn dispatch(&self, builder: RequestBuilder) -> ApiResult<Response> {
        let request = builder.build().map_err(|e| ApiError::transport(&e))?;
        let method = request.method().clone();
        let path = request.url().path().to_string();

        let response = self.http.execute(request).await.map_err(|e| {
            tracing::debug!(%method, %path, error = %e, "request failed");
            ApiError::transport(&e)
        })?;

        let status = response.status();
        tracing::debug!(%method, %path, status = status.as_u16(), "response");

        if status == StatusCode::UNAUTHORIZED {
            tracing::warn!(%method, %path, "authentication rejected, clearing session");
            if let Err(e) = self.session.clear() {
                tracing::warn!(error = %e, "failed to remove persisted session");
            }
            return Err(ApiError::unauthorized());
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::http_status(status.as_u16(), &body));
        }

        Ok(response)
    }
}


async fn decode<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
    let bytes = response
        .bytes()
        .await
        .map_err(|e| ApiError::transport(&e))?;
    serde_json::from_slice(&bytes)
        .map_err(|e| ApiError::parse(format!("Failed to parse response: {e}")))
}
