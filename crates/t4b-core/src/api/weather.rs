//! Weather forecast (`/weather`).
//!
//! The backend answers 503 when it has no weather provider configured; that
//! is reported as [`Forecast::Unavailable`] instead of an error.

use super::types::{GoodCyclingDays, WeatherForecast};
use super::{ApiClient, ApiError, ApiErrorKind, ApiResult};

#[derive(Debug, Clone, PartialEq)]
pub enum Forecast<T> {
    Available(T),
    Unavailable,
}

pub struct WeatherApi<'a> {
    client: &'a ApiClient,
}

impl<'a> WeatherApi<'a> {
    pub(super) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Multi-day forecast for `city`.
    ///
    /// # Errors
    /// Propagates every failure other than 503.
    pub async fn forecast(&self, city: &str) -> ApiResult<Forecast<WeatherForecast>> {
        unavailable_on_503(
            self.client
                .get_query("/weather/forecast", &[("city", city)])
                .await,
        )
    }

    /// Forecast days the server flagged as good for cycling.
    ///
    /// # Errors
    /// Propagates every failure other than 503.
    pub async fn good_days(&self, city: &str) -> ApiResult<Forecast<GoodCyclingDays>> {
        unavailable_on_503(
            self.client
                .get_query("/weather/good-days", &[("city", city)])
                .await,
        )
    }
}

fn unavailable_on_503<T>(result: Result<T, ApiError>) -> ApiResult<Forecast<T>> {
    match result {
        Ok(value) => Ok(Forecast::Available(value)),
        Err(e) if e.kind == ApiErrorKind::Status && e.has_status(503) => {
            tracing::info!("weather service unavailable");
            Ok(Forecast::Unavailable)
        }
        Err(e) => Err(e),
    }
}
