//! Small display helpers shared by the dashboard and the CLI renderer.

use chrono::{DateTime, TimeZone};
use std::fmt::Display;

pub fn format_temperature(temp_c: f64) -> String {
    // as i64 so -0.4 doesn't show up as -0
    format!("{}°", temp_c.round() as i64)
}

pub fn format_wind_speed(kph: u32) -> String {
    format!("{kph} km/h")
}

pub fn format_humidity(pct: u8) -> String {
    format!("{pct}%")
}

pub fn format_pressure(hpa: u32) -> String {
    format!("{hpa} hPa")
}

pub fn celsius_to_fahrenheit(temp_c: f64) -> f64 {
    temp_c * 9.0 / 5.0 + 32.0
}

/// Upper-case the first character, leave the rest untouched.
pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// "6:42 AM"
pub fn time_label_12h<Tz>(dt: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    dt.format("%-I:%M %p").to_string()
}

/// "3PM", used for the hourly strip.
pub fn hour_label<Tz>(dt: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    dt.format("%-I%p").to_string()
}
