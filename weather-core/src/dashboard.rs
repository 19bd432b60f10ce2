//! Assembling everything the dashboard shows for one city query.

use chrono::{DateTime, FixedOffset, Offset, TimeZone, Utc};
use chrono_tz::Tz;
use std::fmt::Display;
use tracing::{debug, warn};

use crate::{
    error::DashboardError,
    forecast::{aggregate_daily, hourly_points},
    format::{format_pressure, time_label_12h},
    model::{CitySuggestion, CurrentConditions, Dashboard, Forecast, WeatherDetails},
    provider::WeatherProvider,
};

/// Queries shorter than this never reach the provider.
pub const MIN_SEARCH_LEN: usize = 2;

/// Fetch current conditions and the forecast concurrently and shape them into
/// a [`Dashboard`].
///
/// Any failed request discards the whole result. Days are bucketed in
/// `tz_override` when given, otherwise in the forecast city's own UTC offset;
/// `now` decides which day is labelled "Today".
pub async fn fetch_dashboard(
    provider: &dyn WeatherProvider,
    city: &str,
    tz_override: Option<Tz>,
    now: DateTime<Utc>,
) -> Result<Dashboard, DashboardError> {
    let city = city.trim();
    if city.is_empty() {
        return Err(DashboardError::EmptyCity);
    }

    debug!(city, "fetching dashboard");
    let (current, forecast) = tokio::try_join!(provider.current(city), provider.forecast(city))
        .map_err(|source| DashboardError::FetchFailed {
            city: city.to_string(),
            source,
        })?;

    let dashboard = match tz_override {
        Some(tz) => assemble(current, forecast, &tz, now),
        None => {
            let offset = FixedOffset::east_opt(forecast.utc_offset_secs).unwrap_or_else(|| {
                warn!(
                    offset = forecast.utc_offset_secs,
                    "forecast offset out of range, using UTC"
                );
                Utc.fix()
            });
            assemble(current, forecast, &offset, now)
        }
    };

    Ok(dashboard)
}

fn assemble<Z>(
    current: CurrentConditions,
    forecast: Forecast,
    tz: &Z,
    now: DateTime<Utc>,
) -> Dashboard
where
    Z: TimeZone,
    Z::Offset: Display,
{
    let today = now.with_timezone(tz).date_naive();

    Dashboard {
        hourly: hourly_points(&forecast.samples, tz),
        daily: aggregate_daily(&forecast.samples, tz, today),
        details: weather_details(&current, tz),
        current,
    }
}

/// Shape the details panel, with sunrise and sunset shown in `tz`.
pub fn weather_details<Z>(current: &CurrentConditions, tz: &Z) -> WeatherDetails
where
    Z: TimeZone,
    Z::Offset: Display,
{
    WeatherDetails {
        updated: time_label_12h(&current.observation_time.with_timezone(tz)),
        sunrise: time_label_12h(&current.sunrise.with_timezone(tz)),
        sunset: time_label_12h(&current.sunset.with_timezone(tz)),
        wind_direction: current
            .wind_direction_deg
            .map(|deg| format!("{}°", deg.round() as i64))
            .unwrap_or_else(|| "N/A".to_string()),
        pressure: format_pressure(current.pressure_hpa),
        feels_like_c: current.feels_like_c.round() as i32,
        visibility: current
            .visibility_km
            .map(|km| format!("{km} km"))
            .unwrap_or_else(|| "N/A".to_string()),
        uv_index: 0,
    }
}

/// City suggestions for a partially typed query.
///
/// Short queries and provider failures both yield an empty list; a failed
/// lookup only costs the user the suggestions.
pub async fn suggest_cities(provider: &dyn WeatherProvider, query: &str) -> Vec<CitySuggestion> {
    let query = query.trim();
    if query.chars().count() < MIN_SEARCH_LEN {
        return Vec::new();
    }

    match provider.search_cities(query).await {
        Ok(cities) => cities,
        Err(err) => {
            warn!(query, error = %err, "city search failed");
            Vec::new()
        }
    }
}
