//! Weather widget client (OpenWeatherMap)
//!
//! Strictly a best-effort collaborator: any failure here degrades to a
//! "weather unavailable" message at the CLI and never blocks planner
//! commands.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

/// Client for the current-weather endpoint.
#[derive(Debug, Clone)]
pub struct WeatherClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    units: String,
}

/// What the CLI renders: rounded temperature, short description, icon code,
/// and the city name the service resolved.
#[derive(Debug, Clone, Serialize)]
pub struct WeatherReport {
    pub temp: i64,
    pub description: String,
    pub icon: String,
    pub city: String,
}

#[derive(Debug, Deserialize)]
struct WeatherResponse {
    main: WeatherMain,
    weather: Vec<WeatherEntry>,
    name: String,
}

#[derive(Debug, Deserialize)]
struct WeatherMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct WeatherEntry {
    description: String,
    icon: String,
}

impl WeatherClient {
    pub fn new(api_key: impl Into<String>, units: impl Into<String>) -> Result<Self> {
        Self::with_base_url(DEFAULT_BASE_URL, api_key, units)
    }

    pub fn with_base_url(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        units: impl Into<String>,
    ) -> Result<Self> {
        Ok(Self {
            http: reqwest::Client::builder().build()?,
            base_url: base_url.into(),
            api_key: api_key.into(),
            units: units.into(),
        })
    }

    /// Current weather for a city. All failure paths collapse into
    /// `WeatherUnavailable`.
    pub async fn current(&self, city: &str) -> Result<WeatherReport> {
        let response = self
            .http
            .get(&self.base_url)
            .query(&[
                ("q", city),
                ("appid", &self.api_key),
                ("units", &self.units),
            ])
            .send()
            .await
            .map_err(|err| Error::WeatherUnavailable(err.to_string()))?;

        if !response.status().is_success() {
            return Err(Error::WeatherUnavailable(format!(
                "city '{city}' not found ({})",
                response.status().as_u16()
            )));
        }

        let data: WeatherResponse = response
            .json()
            .await
            .map_err(|err| Error::WeatherUnavailable(err.to_string()))?;

        let entry = data
            .weather
            .first()
            .ok_or_else(|| Error::WeatherUnavailable("empty weather report".to_string()))?;

        Ok(WeatherReport {
            temp: data.main.temp.round() as i64,
            description: entry.description.clone(),
            icon: entry.icon.clone(),
            city: data.name,
        })
    }
}
