use crate::{
    Config,
    model::{CitySuggestion, CurrentConditions, Forecast},
    provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// Source of raw weather data for a city query.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Current conditions plus sunrise/sunset for `city`.
    async fn current(&self, city: &str) -> anyhow::Result<CurrentConditions>;

    /// The multi-day page of 3-hour samples for `city`.
    async fn forecast(&self, city: &str) -> anyhow::Result<Forecast>;

    /// Up to five cities whose name matches `query`.
    async fn search_cities(&self, query: &str) -> anyhow::Result<Vec<CitySuggestion>>;
}

/// Construct the OpenWeather provider using the configured API key.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    provider_from_key(config.resolved_api_key())
}

fn provider_from_key(api_key: Option<String>) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let api_key = api_key.ok_or_else(|| {
        anyhow::anyhow!(
            "No API key configured.\n\
             Hint: run `weather configure` and enter your OpenWeather API key, \
             or set {}.",
            crate::config::API_KEY_ENV
        )
    })?;

    Ok(Box::new(OpenWeatherProvider::new(api_key)?))
}
