use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chrono::DateTime;
use reqwest::Client;
use serde::Deserialize;

use crate::{
    model::{Location, WeatherRecord, lenient_temperature},
    provider::truncate_body,
};

use super::WeatherProvider;

const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";

#[derive(Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl std::fmt::Debug for OpenWeatherProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenWeatherProvider").field("base_url", &self.base_url).finish_non_exhaustive()
    }
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(api_key: String, base_url: &str) -> Self {
        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    #[serde(default, deserialize_with = "lenient_temperature")]
    temp: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    sunrise: i64,
    sunset: i64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    main: OwMain,
    weather: Vec<OwWeather>,
    sys: OwSys,
    /// Shift from UTC in seconds.
    #[serde(default)]
    timezone: i64,
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current(&self, location: &Location) -> Result<WeatherRecord> {
        let url = format!("{}/data/2.5/weather", self.base_url);
        let lat = location.latitude.to_string();
        let lon = location.longitude.to_string();

        tracing::debug!(location = %location.label, "requesting OpenWeather current conditions");

        let res = self
            .http
            .get(&url)
            .query(&[
                ("lat", lat.as_str()),
                ("lon", lon.as_str()),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
            ])
            .send()
            .await
            .with_context(|| format!("Failed to send request to OpenWeather for {}", location.label))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .context("Failed to read OpenWeather current response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "OpenWeather request for {} failed with status {}: {}",
                location.label,
                status,
                truncate_body(&body),
            ));
        }

        let parsed: OwCurrentResponse =
            serde_json::from_str(&body).context("Failed to parse OpenWeather current JSON")?;

        let condition = parsed
            .weather
            .first()
            .map(|w| w.description.clone())
            .unwrap_or_else(|| "Unknown".to_string());

        // empty for points away from any known city
        let city_name = if parsed.name.is_empty() { location.label.clone() } else { parsed.name };

        Ok(WeatherRecord {
            city_name,
            temperature_celsius: parsed.main.temp,
            condition_description: condition,
            sunrise: local_hh_mm(parsed.sys.sunrise, parsed.timezone)?,
            sunset: local_hh_mm(parsed.sys.sunset, parsed.timezone)?,
        })
    }
}

/// Unix seconds plus a UTC offset, rendered as `HH:MM`.
fn local_hh_mm(ts: i64, offset_secs: i64) -> Result<String> {
    let local = DateTime::from_timestamp(ts + offset_secs, 0)
        .ok_or_else(|| anyhow!("OpenWeather timestamp {ts} is out of range"))?;
    Ok(local.format("%H:%M").to_string())
}
