use serde::{Deserialize, Serialize};

use crate::error::FetchError;

/// Current conditions for one city, as last received from the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub location: String,
    pub temperature_c: f64,
    pub condition: String,
    pub emoji: String,
    pub wind_kmh: f64,
    pub humidity_pct: f64,
    pub feels_like_c: f64,
    pub dramatic_message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDay {
    pub date: String,
    pub emoji: String,
    pub high_c: f64,
    pub low_c: f64,
    pub condition: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Forecast {
    pub days: Vec<ForecastDay>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ApiCurrent {
    location: String,
    temperature: f64,
    condition: String,
    emoji: String,
    wind_speed: f64,
    humidity: f64,
    feels_like: f64,
    #[serde(default)]
    dramatic_message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ApiForecastDay {
    date: String,
    emoji: String,
    high: f64,
    low: f64,
    #[serde(default)]
    condition: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ApiForecastResponse {
    forecast: Vec<ApiForecastDay>,
}

impl From<ApiCurrent> for WeatherSnapshot {
    fn from(raw: ApiCurrent) -> Self {
        Self {
            location: raw.location,
            temperature_c: raw.temperature,
            condition: raw.condition,
            emoji: raw.emoji,
            wind_kmh: raw.wind_speed,
            humidity_pct: raw.humidity,
            feels_like_c: raw.feels_like,
            dramatic_message: raw.dramatic_message.filter(|m| !m.trim().is_empty()),
        }
    }
}

impl From<ApiForecastDay> for ForecastDay {
    fn from(raw: ApiForecastDay) -> Self {
        Self {
            date: raw.date,
            emoji: raw.emoji,
            high_c: raw.high,
            low_c: raw.low,
            condition: raw.condition.filter(|c| !c.trim().is_empty()),
        }
    }
}

/// Decode a `/api/weather/{city}` body.
///
/// The backend nests the snapshot under `Current`; older builds sent the
/// fields at the top level. Both are accepted.
pub fn decode_current(body: &str) -> Result<WeatherSnapshot, FetchError> {
    let mut value: serde_json::Value = serde_json::from_str(body)?;

    let payload = if value.get("Current").is_some_and(serde_json::Value::is_object) {
        value["Current"].take()
    } else {
        value
    };

    let raw: ApiCurrent = serde_json::from_value(payload)?;
    Ok(raw.into())
}

/// Decode a `/api/forecast/{city}` body.
pub fn decode_forecast(body: &str) -> Result<Forecast, FetchError> {
    let raw: ApiForecastResponse = serde_json::from_str(body)?;

    Ok(Forecast {
        days: raw.forecast.into_iter().map(ForecastDay::from).collect(),
    })
}
