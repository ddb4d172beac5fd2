use crate::{
    Config,
    model::{Location, WeatherRecord},
    provider::{openweather::OpenWeatherProvider, weatherbit::WeatherbitProvider},
};
use async_trait::async_trait;
use futures_util::future::{join_all, try_join_all};
use std::{convert::TryFrom, fmt::Debug};

pub mod openweather;
pub mod weatherbit;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    Weatherbit,
    OpenWeather,
}

impl ProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::Weatherbit => "weatherbit",
            ProviderId::OpenWeather => "openweather",
        }
    }

    pub const fn all() -> &'static [ProviderId] {
        &[ProviderId::Weatherbit, ProviderId::OpenWeather]
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ProviderId {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "weatherbit" => Ok(ProviderId::Weatherbit),
            "openweather" => Ok(ProviderId::OpenWeather),
            _ => Err(anyhow::anyhow!(
                "Unknown provider '{value}'. Supported providers: weatherbit, openweather."
            )),
        }
    }
}

/// A source of current conditions for a single coordinate.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current(&self, location: &Location) -> anyhow::Result<WeatherRecord>;
}

/// Query every location concurrently. The first failure aborts the whole batch.
pub async fn fetch_all(
    provider: &dyn WeatherProvider,
    locations: &[Location],
) -> anyhow::Result<Vec<WeatherRecord>> {
    tracing::debug!(count = locations.len(), "fetching batch");

    let records = try_join_all(locations.iter().map(|loc| provider.current(loc))).await?;

    tracing::info!(count = records.len(), "weather batch complete");
    Ok(records)
}

/// Outcome of a batch where each location succeeds or fails on its own.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub records: Vec<WeatherRecord>,
    pub failures: Vec<(Location, anyhow::Error)>,
}

/// Query every location concurrently, keeping whatever succeeded.
pub async fn fetch_each(provider: &dyn WeatherProvider, locations: &[Location]) -> BatchOutcome {
    let results = join_all(locations.iter().map(|loc| provider.current(loc))).await;

    let mut outcome = BatchOutcome::default();
    for (location, result) in locations.iter().zip(results) {
        match result {
            Ok(record) => outcome.records.push(record),
            Err(err) => {
                tracing::warn!(location = %location.label, "fetch failed: {err:#}");
                outcome.failures.push((location.clone(), err));
            }
        }
    }

    tracing::info!(
        ok = outcome.records.len(),
        failed = outcome.failures.len(),
        "weather batch complete"
    );
    outcome
}

/// Construct a provider from config and explicit ProviderId.
pub fn provider_from_config(
    id: ProviderId,
    config: &Config,
) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let api_key = config.provider_api_key(id).ok_or_else(|| {
        anyhow::anyhow!(
            "No API key configured for provider '{id}'.\n\
                 Hint: run `weather-dashboard configure {id}` and enter your API key."
        )
    })?;

    let boxed: Box<dyn WeatherProvider> = match id {
        ProviderId::Weatherbit => Box::new(WeatherbitProvider::new(api_key.to_owned())),
        ProviderId::OpenWeather => Box::new(OpenWeatherProvider::new(api_key.to_owned())),
    };

    Ok(boxed)
}

/// Construct the default provider from config, using `default_provider` field.
pub fn default_provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let id = config.default_provider_id()?;
    provider_from_config(id, config)
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
