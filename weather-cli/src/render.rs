//! Plain-text rendering of the dashboard.

use weather_core::{
    CitySuggestion, Dashboard, DaySummary, HourlyPoint,
    format::{
        capitalize_first, celsius_to_fahrenheit, format_humidity, format_pressure,
        format_temperature, format_wind_speed,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TempUnit {
    Celsius,
    Fahrenheit,
}

impl TempUnit {
    fn temp(self, celsius: f64) -> String {
        match self {
            TempUnit::Celsius => format_temperature(celsius),
            TempUnit::Fahrenheit => format_temperature(celsius_to_fahrenheit(celsius)),
        }
    }

    fn opt_temp(self, celsius: Option<f64>) -> String {
        celsius.map_or_else(|| "-".to_string(), |c| self.temp(c))
    }
}

pub fn dashboard(d: &Dashboard, unit: TempUnit) -> String {
    let c = &d.current;
    let mut lines = vec![
        format!("{}, {}", c.location_name, c.country),
        format!(
            "  {} {} (feels like {})",
            unit.temp(c.temperature_c),
            capitalize_first(&c.condition),
            unit.temp(c.feels_like_c),
        ),
        format!(
            "  Humidity {}   Wind {}   Pressure {}",
            format_humidity(c.humidity_pct),
            format_wind_speed(c.wind_kph),
            format_pressure(c.pressure_hpa),
        ),
        String::new(),
    ];

    if !d.hourly.is_empty() {
        lines.push("Next 24 hours".to_string());
        lines.extend(hourly(&d.hourly, unit));
        lines.push(String::new());
    }

    if !d.daily.is_empty() {
        lines.push("Forecast".to_string());
        lines.extend(d.daily.iter().map(|day| daily_row(day, unit)));
        lines.push(String::new());
    }

    let det = &d.details;
    lines.push(format!("Details (updated {})", det.updated));
    lines.push(format!("  Sunrise {}   Sunset {}", det.sunrise, det.sunset));
    lines.push(format!(
        "  Wind direction {}   Visibility {}   UV index {}",
        det.wind_direction, det.visibility, det.uv_index
    ));

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn hourly(points: &[HourlyPoint], unit: TempUnit) -> [String; 3] {
    let row = |cell: &dyn Fn(&HourlyPoint) -> String| {
        let cells: Vec<String> = points.iter().map(|p| format!("{:<6}", cell(p))).collect();
        format!("  {}", cells.concat().trim_end())
    };

    [
        row(&|p: &HourlyPoint| p.time.clone()),
        row(&|p: &HourlyPoint| unit.temp(f64::from(p.temperature_c))),
        row(&|p: &HourlyPoint| format_humidity(p.precipitation_pct)),
    ]
}

fn daily_row(day: &DaySummary, unit: TempUnit) -> String {
    let opt = |v: Option<String>| v.unwrap_or_else(|| "-".to_string());

    format!(
        "  {:<10} {:<12} {:<20} {:>4} / {:<4}  rain {:<4}  wind {:<9}  humidity {}",
        day.day_label,
        day.date_label,
        capitalize_first(&day.condition),
        unit.opt_temp(day.max_temp_c),
        unit.opt_temp(day.min_temp_c),
        opt(day.precipitation_pct.map(format_humidity)),
        opt(day.wind_kph.map(format_wind_speed)),
        opt(day.humidity_pct.map(format_humidity)),
    )
}

pub fn suggestions(cities: &[CitySuggestion]) -> String {
    if cities.is_empty() {
        return "No matching cities.\n".to_string();
    }

    cities
        .iter()
        .map(|c| match &c.state {
            Some(state) => format!("{} ({state})\n", c.display_name()),
            None => format!("{}\n", c.display_name()),
        })
        .collect()
}
