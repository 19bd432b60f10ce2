use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One 3-hour forecast sample as received from the upstream provider.
///
/// Numeric fields are optional: upstream pages occasionally omit them, and a
/// missing value only excludes this sample from the matching aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Unix timestamp, seconds.
    pub timestamp: i64,
    pub temperature_c: Option<f64>,
    pub condition: String,
    pub icon: String,
    pub wind_speed_mps: Option<f64>,
    pub humidity_pct: Option<f64>,
    /// Probability of precipitation, 0.0..=1.0.
    pub precip_probability: Option<f64>,
}

/// Display-ready summary of all samples sharing one local calendar date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaySummary {
    pub date: NaiveDate,
    /// "Today" or the full weekday name.
    pub day_label: String,
    /// Short form, e.g. "Mon, Jan 5".
    pub date_label: String,
    pub condition: String,
    pub icon: String,
    pub wind_kph: Option<u32>,
    pub humidity_pct: Option<u8>,
    pub max_temp_c: Option<f64>,
    pub min_temp_c: Option<f64>,
    pub precipitation_pct: Option<u8>,
}

/// A raw forecast page: location metadata plus time-ordered samples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub city: String,
    pub country: String,
    /// Offset of the city's local time from UTC, seconds.
    pub utc_offset_secs: i32,
    pub samples: Vec<Sample>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub location_name: String,
    pub country: String,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub humidity_pct: u8,
    pub wind_kph: u32,
    pub wind_direction_deg: Option<f64>,
    pub pressure_hpa: u32,
    pub visibility_km: Option<u32>,
    pub condition: String,
    pub icon: String,
    pub sunrise: DateTime<Utc>,
    pub sunset: DateTime<Utc>,
    pub observation_time: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyPoint {
    /// 12-hour label without a space, e.g. "3PM".
    pub time: String,
    pub temperature_c: i32,
    pub icon: String,
    pub precipitation_pct: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherDetails {
    /// Local time of the observation, e.g. "2:50 PM".
    pub updated: String,
    pub sunrise: String,
    pub sunset: String,
    pub wind_direction: String,
    pub pressure: String,
    pub feels_like_c: i32,
    pub visibility: String,
    /// Not available on the free OpenWeather tier; always 0.
    pub uv_index: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CitySuggestion {
    pub name: String,
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

impl CitySuggestion {
    /// "Name, Country", the form shown in suggestion lists.
    pub fn display_name(&self) -> String {
        format!("{}, {}", self.name, self.country)
    }
}

/// Everything the dashboard renders for one city query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    pub current: CurrentConditions,
    pub hourly: Vec<HourlyPoint>,
    pub daily: Vec<DaySummary>,
    pub details: WeatherDetails,
}
