use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};
use std::time::Duration;
use tracing::debug;

use crate::model::{CitySuggestion, CurrentConditions, Forecast, Sample};

use super::WeatherProvider;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const SEARCH_LIMIT: &str = "5";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Result<Self> {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Point the provider at another host, e.g. a local mock server.
    pub fn with_base_url(api_key: String, base_url: impl Into<String>) -> Result<Self> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        what: &str,
        params: &[(&str, &str)],
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, what, "requesting OpenWeather");

        let res = self
            .http
            .get(&url)
            .query(params)
            .query(&[("appid", self.api_key.as_str())])
            .send()
            .await
            .with_context(|| format!("Failed to send request to OpenWeather ({what})"))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .with_context(|| format!("Failed to read OpenWeather {what} response body"))?;

        if !status.is_success() {
            return Err(anyhow!(
                "OpenWeather {} request failed with status {}: {}",
                what,
                status,
                error_message(&body),
            ));
        }

        serde_json::from_str(&body)
            .with_context(|| format!("Failed to parse OpenWeather {what} JSON"))
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current(&self, city: &str) -> Result<CurrentConditions> {
        let parsed: OwCurrentResponse = self
            .get_json(
                "/data/2.5/weather",
                "current weather",
                &[("q", city), ("units", "metric")],
            )
            .await?;

        current_from_response(parsed)
    }

    async fn forecast(&self, city: &str) -> Result<Forecast> {
        let parsed: OwForecastResponse = self
            .get_json(
                "/data/2.5/forecast",
                "5-day forecast",
                &[("q", city), ("units", "metric")],
            )
            .await?;

        Ok(forecast_from_response(parsed))
    }

    async fn search_cities(&self, query: &str) -> Result<Vec<CitySuggestion>> {
        let parsed: Vec<OwGeoEntry> = self
            .get_json(
                "/geo/1.0/direct",
                "city search",
                &[("q", query), ("limit", SEARCH_LIMIT)],
            )
            .await?;

        Ok(parsed
            .into_iter()
            .map(|g| CitySuggestion {
                name: g.name,
                country: g.country,
                state: g.state,
            })
            .collect())
    }
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentMain {
    temp: f64,
    feels_like: f64,
    humidity: u8,
    pressure: u32,
}

#[derive(Debug, Deserialize)]
struct OwCurrentWind {
    speed: f64,
    deg: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    #[serde(default)]
    country: String,
    sunrise: i64,
    sunset: i64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    dt: i64,
    main: OwCurrentMain,
    weather: Vec<OwWeather>,
    wind: OwCurrentWind,
    visibility: Option<u32>,
    sys: OwSys,
}

// Forecast entries are read leniently: a missing number only drops that
// sample from the matching daily aggregate.
#[derive(Debug, Default, Deserialize)]
struct OwForecastMain {
    temp: Option<f64>,
    humidity: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct OwForecastWind {
    speed: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    #[serde(default)]
    main: OwForecastMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
    #[serde(default)]
    wind: OwForecastWind,
    pop: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwCity {
    name: String,
    #[serde(default)]
    country: String,
    #[serde(default)]
    timezone: i32,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    city: OwCity,
    list: Vec<OwForecastEntry>,
}

#[derive(Debug, Deserialize)]
struct OwGeoEntry {
    name: String,
    country: String,
    state: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwErrorBody {
    message: String,
}

fn current_from_response(parsed: OwCurrentResponse) -> Result<CurrentConditions> {
    let (condition, icon) = first_weather(parsed.weather);

    Ok(CurrentConditions {
        location_name: parsed.name,
        country: parsed.sys.country,
        temperature_c: parsed.main.temp,
        feels_like_c: parsed.main.feels_like,
        humidity_pct: parsed.main.humidity,
        wind_kph: (parsed.wind.speed * 3.6).round().max(0.0) as u32,
        wind_direction_deg: parsed.wind.deg,
        pressure_hpa: parsed.main.pressure,
        visibility_km: parsed
            .visibility
            .map(|m| (f64::from(m) / 1000.0).round() as u32),
        condition,
        icon,
        sunrise: unix_to_utc(parsed.sys.sunrise)
            .ok_or_else(|| anyhow!("OpenWeather returned an invalid sunrise time"))?,
        sunset: unix_to_utc(parsed.sys.sunset)
            .ok_or_else(|| anyhow!("OpenWeather returned an invalid sunset time"))?,
        observation_time: unix_to_utc(parsed.dt)
            .ok_or_else(|| anyhow!("OpenWeather returned an invalid observation time"))?,
    })
}

fn forecast_from_response(parsed: OwForecastResponse) -> Forecast {
    let samples = parsed
        .list
        .into_iter()
        .map(|entry| {
            let (condition, icon) = first_weather(entry.weather);
            Sample {
                timestamp: entry.dt,
                temperature_c: entry.main.temp,
                condition,
                icon,
                wind_speed_mps: entry.wind.speed,
                humidity_pct: entry.main.humidity,
                precip_probability: entry.pop,
            }
        })
        .collect();

    Forecast {
        city: parsed.city.name,
        country: parsed.city.country,
        utc_offset_secs: parsed.city.timezone,
        samples,
    }
}

fn first_weather(weather: Vec<OwWeather>) -> (String, String) {
    weather
        .into_iter()
        .next()
        .map(|w| (w.description, w.icon))
        .unwrap_or_else(|| ("Unknown".to_string(), String::new()))
}

fn unix_to_utc(ts: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(ts, 0)
}

/// OpenWeather's `message` field when present, otherwise the raw body.
fn error_message(body: &str) -> String {
    match serde_json::from_str::<OwErrorBody>(body) {
        Ok(err) => err.message,
        Err(_) => truncate_body(body),
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
