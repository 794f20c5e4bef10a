//! Wire types for the REST API.
//!
//! Optional request fields are omitted from the JSON body when absent.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bike {
    pub id: i64,
    pub brand: String,
    pub model: String,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl Bike {
    /// "Brand Model" label used in listings and pickers.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.brand, self.model)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BikeCreate {
    pub brand: String,
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BikeUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl BikeUpdate {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Maintenance {
    pub id: i64,
    pub bike_id: i64,
    pub service_type: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub cost: Option<f64>,
    #[serde(default)]
    pub workshop_name: Option<String>,
    #[serde(default)]
    pub workshop_cep: Option<String>,
    #[serde(default)]
    pub workshop_address: Option<String>,
    /// ISO-8601 timestamp as sent by the backend.
    pub service_date: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub bike: Option<Bike>,
}

impl Maintenance {
    /// Cost with missing values counted as zero.
    pub fn cost_or_zero(&self) -> f64 {
        self.cost.unwrap_or(0.0)
    }

    pub fn service_datetime(&self) -> Option<NaiveDateTime> {
        parse_service_date(&self.service_date)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceCreate {
    pub bike_id: i64,
    pub service_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workshop_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workshop_cep: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workshop_address: Option<String>,
    pub service_date: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workshop_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workshop_cep: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workshop_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_date: Option<String>,
}

impl MaintenanceUpdate {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Postal address as returned by the CEP lookup (ViaCEP field names).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub cep: String,
    #[serde(default)]
    pub logradouro: Option<String>,
    #[serde(default)]
    pub complemento: Option<String>,
    #[serde(default)]
    pub bairro: Option<String>,
    #[serde(default)]
    pub localidade: Option<String>,
    #[serde(default)]
    pub uf: Option<String>,
    #[serde(default)]
    pub ibge: Option<String>,
    #[serde(default)]
    pub gia: Option<String>,
    #[serde(default)]
    pub ddd: Option<String>,
    #[serde(default)]
    pub siafi: Option<String>,
    /// Set by the lookup service when the CEP does not exist.
    #[serde(default)]
    pub erro: Option<bool>,
}

impl Address {
    pub fn is_not_found(&self) -> bool {
        self.erro.unwrap_or(false)
    }

    /// Single-line form used to fill a workshop address:
    /// `logradouro, bairro, localidade - uf`.
    pub fn one_line(&self) -> String {
        let part = |value: &Option<String>| value.as_deref().unwrap_or("").trim().to_string();
        format!(
            "{}, {}, {} - {}",
            part(&self.logradouro),
            part(&self.bairro),
            part(&self.localidade),
            part(&self.uf)
        )
        .trim()
        .to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherDay {
    pub date: String,
    pub temperature: f64,
    pub min_temp: f64,
    pub max_temp: f64,
    pub humidity: f64,
    pub wind_speed: f64,
    pub precipitation: f64,
    pub description: String,
    pub icon: String,
    /// Computed by the server; only displayed here.
    pub is_good_for_cycling: bool,
}

impl WeatherDay {
    pub fn day(&self) -> Option<NaiveDate> {
        parse_service_date(&self.date).map(|dt| dt.date())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherForecast {
    pub city: String,
    #[serde(default)]
    pub days: Vec<WeatherDay>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoodCyclingDays {
    pub city: String,
    #[serde(default)]
    pub good_days: Vec<WeatherDay>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Parses a backend timestamp.
///
/// Accepts RFC 3339 (`2024-03-01T10:00:00Z`), naive date-times with optional
/// fractional seconds (`2024-03-01T10:00:00.123`) and plain dates (`2024-03-01`).
/// Offsets are normalized to UTC.
pub fn parse_service_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f") {
        return Some(dt);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Converts a calendar date to the ISO-8601 timestamp the backend expects
/// (`YYYY-MM-DDT00:00:00Z`).
pub fn service_date_from(date: NaiveDate) -> String {
    format!("{}T00:00:00Z", date.format("%Y-%m-%d"))
}
