use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Utc};
use chrono_tz::Tz;
use reqwest::Client;
use serde::Deserialize;

use crate::{
    error::DashboardError,
    model::{Location, WeatherRecord, lenient_temperature},
    provider::truncate_body,
};

use super::WeatherProvider;

const DEFAULT_BASE_URL: &str = "https://api.weatherbit.io/v2.0";

/// Weatherbit.io current-conditions API.
#[derive(Clone)]
pub struct WeatherbitProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl std::fmt::Debug for WeatherbitProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherbitProvider").field("base_url", &self.base_url).finish_non_exhaustive()
    }
}

impl WeatherbitProvider {
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
struct WbWeather {
    description: String,
}

#[derive(Debug, Deserialize)]
struct WbObservation {
    city_name: String,
    #[serde(default, deserialize_with = "lenient_temperature")]
    temp: Option<f64>,
    weather: WbWeather,
    /// UTC, `HH:MM`.
    sunrise: String,
    /// UTC, `HH:MM`.
    sunset: String,
    /// IANA zone name, e.g. `Europe/London`.
    #[serde(default)]
    timezone: Option<String>,
    /// UTC, `YYYY-MM-DD HH:MM`.
    #[serde(default)]
    ob_time: Option<String>,
}

impl WbObservation {
    fn zone(&self) -> Option<Tz> {
        let name = self.timezone.as_deref()?;
        match name.parse::<Tz>() {
            Ok(tz) => Some(tz),
            Err(_) => {
                tracing::warn!(city = %self.city_name, zone = %name, "unknown time zone from Weatherbit");
                None
            }
        }
    }

    fn observation_date(&self) -> NaiveDate {
        self.ob_time
            .as_deref()
            .and_then(|s| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").ok())
            .map(|dt| dt.date())
            .unwrap_or_else(|| Utc::now().date_naive())
    }

    /// Sun time in the city's own zone; left as UTC when the zone is unknown.
    fn local_sun_time(&self, utc_hh_mm: &str, zone: Option<Tz>) -> String {
        let Some(tz) = zone else {
            return utc_hh_mm.to_string();
        };
        match utc_to_zone(utc_hh_mm, self.observation_date(), tz) {
            Some(local) => local,
            None => {
                tracing::warn!(city = %self.city_name, time = %utc_hh_mm, "unparsable sun time from Weatherbit");
                utc_hh_mm.to_string()
            }
        }
    }
}

fn utc_to_zone(hh_mm: &str, date: NaiveDate, tz: Tz) -> Option<String> {
    let time = NaiveTime::parse_from_str(hh_mm.trim(), "%H:%M").ok()?;
    let utc = date.and_time(time).and_utc();
    Some(utc.with_timezone(&tz).format("%H:%M").to_string())
}

#[derive(Debug, Deserialize)]
struct WbCurrentResponse {
    #[serde(default)]
    data: Vec<WbObservation>,
}

#[async_trait]
impl WeatherProvider for WeatherbitProvider {
    async fn current(&self, location: &Location) -> Result<WeatherRecord> {
        let url = format!("{}/current", self.base_url);
        let lat = location.latitude.to_string();
        let lon = location.longitude.to_string();

        tracing::debug!(location = %location.label, "requesting Weatherbit current conditions");

        let res = self
            .http
            .get(&url)
            .query(&[("lat", lat.as_str()), ("lon", lon.as_str()), ("key", self.api_key.as_str())])
            .send()
            .await
            .with_context(|| format!("Failed to send request to Weatherbit for {}", location.label))?;

        let status = res.status();
        let body = res.text().await.context("Failed to read Weatherbit response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "Weatherbit request for {} failed with status {}: {}",
                location.label,
                status,
                truncate_body(&body),
            ));
        }

        let parsed: WbCurrentResponse =
            serde_json::from_str(&body).context("Failed to parse Weatherbit current JSON")?;

        let observation = parsed.data.into_iter().next().ok_or_else(|| DashboardError::EmptyResponse {
            provider: "weatherbit".to_string(),
            location: location.label.clone(),
        })?;

        if observation.temp.is_none() {
            tracing::warn!(city = %observation.city_name, "non-numeric temperature from Weatherbit");
        }

        let zone = observation.zone();
        let sunrise = observation.local_sun_time(&observation.sunrise, zone);
        let sunset = observation.local_sun_time(&observation.sunset, zone);

        Ok(WeatherRecord {
            city_name: observation.city_name,
            temperature_celsius: observation.temp,
            condition_description: observation.weather.description,
            sunrise,
            sunset,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn london() -> Location {
        Location::new("London", 51.5072, -0.1276)
    }

    #[tokio::test]
    async fn parses_current_observation() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/current"))
            .and(query_param("lat", "51.5072"))
            .and(query_param("lon", "-0.1276"))
            .and(query_param("key", "test_key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "count": 1,
                "data": [{
                    "city_name": "London",
                    "temp": 11.4,
                    "weather": {"description": "Overcast clouds", "code": 804},
                    "sunrise": "04:43",
                    "sunset": "20:59",
                    "timezone": "Europe/London",
                    "ob_time": "2024-06-01 12:00"
                }]
            })))
            .mount(&mock_server)
            .await;

        let provider = WeatherbitProvider::with_base_url("test_key".to_string(), &mock_server.uri());
        let record = provider.current(&london()).await.unwrap();

        assert_eq!(record.city_name, "London");
        assert_eq!(record.temperature_celsius, Some(11.4));
        assert_eq!(record.condition_description, "Overcast clouds");
        // BST is UTC+1
        assert_eq!(record.sunrise, "05:43");
        assert_eq!(record.sunset, "21:59");
    }

    #[tokio::test]
    async fn sun_times_shift_to_southern_hemisphere_zone() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/current"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [{
                    "city_name": "Melbourne",
                    "temp": 9.8,
                    "weather": {"description": "Light rain"},
                    "sunrise": "21:33",
                    "sunset": "07:10",
                    "timezone": "Australia/Melbourne",
                    "ob_time": "2024-06-01 22:00"
                }]
            })))
            .mount(&mock_server)
            .await;

        let provider = WeatherbitProvider::with_base_url("k".to_string(), &mock_server.uri());
        let record = provider
            .current(&Location::new("Melbourne", -37.8136, 144.9631))
            .await
            .unwrap();

        // AEST is UTC+10 in June
        assert_eq!(record.sunrise, "07:33");
        assert_eq!(record.sunset, "17:10");
    }

    #[tokio::test]
    async fn sun_times_stay_utc_without_known_zone() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/current"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [{
                    "city_name": "Nowhere",
                    "temp": 1.0,
                    "weather": {"description": "Clear sky"},
                    "sunrise": "05:00",
                    "sunset": "19:00",
                    "timezone": "Mars/Olympus_Mons"
                }]
            })))
            .mount(&mock_server)
            .await;

        let provider = WeatherbitProvider::with_base_url("k".to_string(), &mock_server.uri());
        let record = provider.current(&london()).await.unwrap();

        assert_eq!(record.sunrise, "05:00");
        assert_eq!(record.sunset, "19:00");
    }

    #[test]
    fn utc_to_zone_respects_daylight_saving() {
        let tz: Tz = "America/New_York".parse().unwrap();
        let winter = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let summer = NaiveDate::from_ymd_opt(2024, 7, 15).unwrap();

        assert_eq!(utc_to_zone("12:07", winter, tz).as_deref(), Some("07:07"));
        assert_eq!(utc_to_zone("09:30", summer, tz).as_deref(), Some("05:30"));
        assert_eq!(utc_to_zone("late", summer, tz), None);
    }

    #[tokio::test]
    async fn non_numeric_temperature_becomes_absent() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/current"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [{
                    "city_name": "London",
                    "temp": "n/a",
                    "weather": {"description": "Fog"},
                    "sunrise": "06:21",
                    "sunset": "18:02"
                }]
            })))
            .mount(&mock_server)
            .await;

        let provider = WeatherbitProvider::with_base_url("k".to_string(), &mock_server.uri());
        let record = provider.current(&london()).await.unwrap();

        assert_eq!(record.temperature_celsius, None);
    }

    #[tokio::test]
    async fn error_status_is_reported() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/current"))
            .respond_with(ResponseTemplate::new(403).set_body_string("API key not valid"))
            .mount(&mock_server)
            .await;

        let provider = WeatherbitProvider::with_base_url("bad".to_string(), &mock_server.uri());
        let err = provider.current(&london()).await.unwrap_err();

        let msg = err.to_string();
        assert!(msg.contains("403"));
        assert!(msg.contains("API key not valid"));
    }

    #[tokio::test]
    async fn empty_data_is_an_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/current"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"data": []})))
            .mount(&mock_server)
            .await;

        let provider = WeatherbitProvider::with_base_url("k".to_string(), &mock_server.uri());
        let err = provider.current(&london()).await.unwrap_err();

        assert_eq!(
            err.downcast_ref::<DashboardError>(),
            Some(&DashboardError::EmptyResponse {
                provider: "weatherbit".to_string(),
                location: "London".to_string(),
            })
        );
    }

    #[test]
    fn debug_output_hides_api_key() {
        let provider = WeatherbitProvider::new("secret".to_string());
        assert!(!format!("{provider:?}").contains("secret"));
    }
}
