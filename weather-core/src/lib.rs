//! Core library for the `weather` dashboard.
//!
//! This crate defines:
//! - Shared domain models (samples, daily summaries, dashboard views)
//! - The daily forecast aggregator and hourly strip
//! - Abstraction over the weather provider, with an OpenWeather client
//! - Configuration & credentials handling
//!
//! It is used by `weather-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod dashboard;
pub mod error;
pub mod forecast;
pub mod format;
pub mod model;
pub mod provider;

pub use config::Config;
pub use dashboard::{fetch_dashboard, suggest_cities, weather_details};
pub use error::DashboardError;
pub use forecast::{MAX_FORECAST_DAYS, aggregate_daily, hourly_points};
pub use model::{
    CitySuggestion, CurrentConditions, Dashboard, DaySummary, Forecast, HourlyPoint, Sample,
    WeatherDetails,
};
pub use provider::{WeatherProvider, provider_from_config};
