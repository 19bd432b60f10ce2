//! Turning raw 3-hour forecast samples into the daily and hourly views.
//!
//! Both functions are pure: the timezone used for calendar bucketing and the
//! current local date are passed in by the caller.

use chrono::{DateTime, NaiveDate, TimeZone};
use std::fmt::Display;
use tracing::debug;

use crate::format::hour_label;
use crate::model::{DaySummary, HourlyPoint, Sample};

/// Upper bound on the number of daily summaries emitted.
pub const MAX_FORECAST_DAYS: usize = 7;

/// Number of 3-hour samples shown in the hourly strip (24 hours).
pub const HOURLY_POINTS: usize = 8;

const MPS_TO_KPH: f64 = 3.6;

/// Group `samples` by local calendar date in `tz` and summarize each day.
///
/// Days appear in the order their first sample appears in the input, and at
/// most [`MAX_FORECAST_DAYS`] are returned. The day whose date equals `today`
/// is labelled "Today".
///
/// For the representative condition and icon, ties between equally frequent
/// values go to the one seen first in the bucket.
pub fn aggregate_daily<Tz: TimeZone>(
    samples: &[Sample],
    tz: &Tz,
    today: NaiveDate,
) -> Vec<DaySummary> {
    let mut buckets: Vec<(NaiveDate, Vec<&Sample>)> = Vec::new();

    for sample in samples {
        let Some(date) = local_date(sample.timestamp, tz) else {
            debug!(timestamp = sample.timestamp, "skipping sample with out-of-range timestamp");
            continue;
        };

        match buckets.iter_mut().find(|(d, _)| *d == date) {
            Some((_, bucket)) => bucket.push(sample),
            None => buckets.push((date, vec![sample])),
        }
    }

    buckets
        .into_iter()
        .take(MAX_FORECAST_DAYS)
        .map(|(date, bucket)| summarize_day(date, &bucket, today))
        .collect()
}

/// The first [`HOURLY_POINTS`] samples as chart points, labelled in `tz`.
///
/// Samples without a usable temperature are left out of the strip.
pub fn hourly_points<Tz>(samples: &[Sample], tz: &Tz) -> Vec<HourlyPoint>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    samples
        .iter()
        .take(HOURLY_POINTS)
        .filter_map(|s| {
            let temp = s.temperature_c.filter(|t| t.is_finite())?;
            let local = DateTime::from_timestamp(s.timestamp, 0)?.with_timezone(tz);
            let pop = s.precip_probability.filter(|p| p.is_finite()).unwrap_or(0.0);

            Some(HourlyPoint {
                time: hour_label(&local),
                temperature_c: temp.round() as i32,
                icon: s.icon.clone(),
                precipitation_pct: to_percent(pop * 100.0),
            })
        })
        .collect()
}

fn local_date<Tz: TimeZone>(timestamp: i64, tz: &Tz) -> Option<NaiveDate> {
    DateTime::from_timestamp(timestamp, 0).map(|utc| utc.with_timezone(tz).date_naive())
}

fn summarize_day(date: NaiveDate, bucket: &[&Sample], today: NaiveDate) -> DaySummary {
    let temps = || usable(bucket.iter().map(|s| s.temperature_c));

    let condition = most_frequent(bucket.iter().map(|s| s.condition.as_str()))
        .unwrap_or("Unknown")
        .to_string();
    let icon = most_frequent(bucket.iter().map(|s| s.icon.as_str()))
        .unwrap_or_default()
        .to_string();

    let day_label = if date == today {
        "Today".to_string()
    } else {
        date.format("%A").to_string()
    };

    DaySummary {
        date,
        day_label,
        date_label: date.format("%a, %b %-d").to_string(),
        condition,
        icon,
        wind_kph: mean(usable(bucket.iter().map(|s| s.wind_speed_mps)))
            .map(|mps| (mps * MPS_TO_KPH).round().max(0.0) as u32),
        humidity_pct: mean(usable(bucket.iter().map(|s| s.humidity_pct))).map(to_percent),
        max_temp_c: temps().reduce(f64::max),
        min_temp_c: temps().reduce(f64::min),
        precipitation_pct: mean(usable(bucket.iter().map(|s| s.precip_probability)))
            .map(|p| to_percent(p * 100.0)),
    }
}

/// Present, finite values only.
fn usable(values: impl Iterator<Item = Option<f64>>) -> impl Iterator<Item = f64> {
    values.flatten().filter(|v| v.is_finite())
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    (count > 0).then(|| sum / count as f64)
}

fn to_percent(value: f64) -> u8 {
    value.round().clamp(0.0, 100.0) as u8
}

/// Most frequent value; the first one to reach the highest count wins ties.
fn most_frequent<'a>(values: impl Iterator<Item = &'a str>) -> Option<&'a str> {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for value in values {
        match counts.iter_mut().find(|(v, _)| *v == value) {
            Some((_, n)) => *n += 1,
            None => counts.push((value, 1)),
        }
    }

    let mut best: Option<(&str, usize)> = None;
    for (value, n) in counts {
        if best.is_none_or(|(_, best_n)| n > best_n) {
            best = Some((value, n));
        }
    }
    best.map(|(value, _)| value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    // 2024-01-05 00:00:00 UTC, a Friday.
    const JAN_5: i64 = 1_704_412_800;
    const HOUR: i64 = 3_600;
    const DAY: i64 = 86_400;

    fn sample(timestamp: i64, temp: f64, condition: &str) -> Sample {
        Sample {
            timestamp,
            temperature_c: Some(temp),
            condition: condition.to_string(),
            icon: "01d".to_string(),
            wind_speed_mps: Some(1.0),
            humidity_pct: Some(50.0),
            precip_probability: Some(0.0),
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn empty_input_gives_empty_output() {
        assert!(aggregate_daily(&[], &Utc, date(2024, 1, 5)).is_empty());
    }

    #[test]
    fn single_day_of_clear_samples() {
        let temps = [10.0, 12.0, 15.0, 14.0, 11.0, 9.0, 8.0, 10.0];
        let winds = [1.0, 2.0, 1.0, 3.0, 2.0, 1.0, 2.0, 1.0];
        let samples: Vec<Sample> = temps
            .iter()
            .zip(winds)
            .enumerate()
            .map(|(i, (&t, w))| Sample {
                wind_speed_mps: Some(w),
                ..sample(JAN_5 + i as i64 * 3 * HOUR, t, "clear")
            })
            .collect();

        let days = aggregate_daily(&samples, &Utc, date(2024, 1, 1));

        assert_eq!(days.len(), 1);
        let day = &days[0];
        assert_eq!(day.date, date(2024, 1, 5));
        assert_eq!(day.max_temp_c, Some(15.0));
        assert_eq!(day.min_temp_c, Some(8.0));
        assert_eq!(day.wind_kph, Some(6));
        assert_eq!(day.humidity_pct, Some(50));
        assert_eq!(day.precipitation_pct, Some(0));
        assert_eq!(day.condition, "clear");
        assert_eq!(day.icon, "01d");
        assert_eq!(day.day_label, "Friday");
        assert_eq!(day.date_label, "Fri, Jan 5");
    }

    #[test]
    fn ten_days_truncate_to_first_seven() {
        let samples: Vec<Sample> = (0..10)
            .map(|d| sample(JAN_5 + d * DAY + 12 * HOUR, 20.0, "clear"))
            .collect();

        let days = aggregate_daily(&samples, &Utc, date(2024, 1, 5));

        assert_eq!(days.len(), MAX_FORECAST_DAYS);
        let dates: Vec<NaiveDate> = days.iter().map(|d| d.date).collect();
        let expected: Vec<NaiveDate> = (5..12).map(|d| date(2024, 1, d)).collect();
        assert_eq!(dates, expected);
    }

    #[test]
    fn strict_majority_condition_wins() {
        let samples = vec![
            sample(JAN_5, 5.0, "rain"),
            sample(JAN_5 + 3 * HOUR, 6.0, "rain"),
            sample(JAN_5 + 6 * HOUR, 7.0, "cloudy"),
        ];

        let days = aggregate_daily(&samples, &Utc, date(2024, 1, 5));
        assert_eq!(days[0].condition, "rain");
    }

    #[test]
    fn tie_goes_to_first_seen_value() {
        let mut samples = vec![
            sample(JAN_5, 5.0, "cloudy"),
            sample(JAN_5 + 3 * HOUR, 6.0, "rain"),
            sample(JAN_5 + 6 * HOUR, 7.0, "rain"),
            sample(JAN_5 + 9 * HOUR, 7.0, "cloudy"),
        ];
        samples[1].icon = "10d".to_string();
        samples[2].icon = "10d".to_string();

        let days = aggregate_daily(&samples, &Utc, date(2024, 1, 5));
        assert_eq!(days[0].condition, "cloudy");
        assert_eq!(days[0].icon, "01d");
    }

    #[test]
    fn today_label_uses_injected_date() {
        let samples = vec![
            sample(JAN_5 + 12 * HOUR, 5.0, "clear"),
            sample(JAN_5 + DAY + 12 * HOUR, 5.0, "clear"),
        ];

        let days = aggregate_daily(&samples, &Utc, date(2024, 1, 5));
        assert_eq!(days[0].day_label, "Today");
        assert_eq!(days[1].day_label, "Saturday");
        assert_eq!(days[1].date_label, "Sat, Jan 6");
    }

    #[test]
    fn missing_and_non_finite_values_are_excluded() {
        let mut samples = vec![
            sample(JAN_5, 10.0, "clear"),
            sample(JAN_5 + 3 * HOUR, 0.0, "clear"),
            sample(JAN_5 + 6 * HOUR, 0.0, "clear"),
            sample(JAN_5 + 9 * HOUR, 14.0, "clear"),
        ];
        samples[1].temperature_c = None;
        samples[2].temperature_c = Some(f64::NAN);
        samples[1].humidity_pct = Some(f64::INFINITY);
        samples[2].humidity_pct = Some(70.0);
        for s in &mut samples {
            s.wind_speed_mps = None;
        }

        let days = aggregate_daily(&samples, &Utc, date(2024, 1, 5));
        let day = &days[0];
        assert_eq!(day.max_temp_c, Some(14.0));
        assert_eq!(day.min_temp_c, Some(10.0));
        // (50 + 70 + 50) / 3
        assert_eq!(day.humidity_pct, Some(57));
        assert_eq!(day.wind_kph, None);
    }

    #[test]
    fn unrepresentable_timestamps_are_skipped() {
        let mut bad = sample(i64::MAX, 99.0, "storm");
        bad.wind_speed_mps = Some(50.0);
        let samples = vec![
            sample(JAN_5, 4.0, "clear"),
            bad,
            sample(JAN_5 + 3 * HOUR, 6.0, "clear"),
        ];

        let days = aggregate_daily(&samples, &Utc, date(2024, 1, 5));

        assert_eq!(days.len(), 1);
        let day = &days[0];
        assert_eq!(day.date, date(2024, 1, 5));
        assert_eq!(day.max_temp_c, Some(6.0));
        assert_eq!(day.min_temp_c, Some(4.0));
        assert_eq!(day.wind_kph, Some(4));
        assert_eq!(day.condition, "clear");

        let points = hourly_points(&samples, &Utc);
        assert_eq!(points.len(), 2);
    }

    #[test]
    fn precipitation_is_mean_probability_as_percent() {
        let mut samples = vec![sample(JAN_5, 1.0, "rain"), sample(JAN_5 + 3 * HOUR, 1.0, "rain")];
        samples[0].precip_probability = Some(0.2);
        samples[1].precip_probability = Some(0.4);

        let days = aggregate_daily(&samples, &Utc, date(2024, 1, 5));
        assert_eq!(days[0].precipitation_pct, Some(30));
    }

    #[test]
    fn bucketing_follows_given_timezone() {
        let samples = vec![
            sample(JAN_5 + 22 * HOUR, 1.0, "clear"),
            sample(JAN_5 + DAY + HOUR, 2.0, "clear"),
        ];

        let utc_days = aggregate_daily(&samples, &Utc, date(2024, 1, 5));
        assert_eq!(utc_days.len(), 2);

        let plus_three = FixedOffset::east_opt(3 * 3600).unwrap();
        let local_days = aggregate_daily(&samples, &plus_three, date(2024, 1, 5));
        assert_eq!(local_days.len(), 1);
        assert_eq!(local_days[0].date, date(2024, 1, 6));
        assert_eq!(local_days[0].min_temp_c, Some(1.0));
        assert_eq!(local_days[0].max_temp_c, Some(2.0));
    }

    #[test]
    fn order_follows_first_appearance() {
        let samples = vec![
            sample(JAN_5 + 2 * DAY, 1.0, "clear"),
            sample(JAN_5, 1.0, "clear"),
            sample(JAN_5 + 2 * DAY + 3 * HOUR, 3.0, "clear"),
        ];

        let days = aggregate_daily(&samples, &Utc, date(2024, 1, 1));
        let dates: Vec<NaiveDate> = days.iter().map(|d| d.date).collect();
        assert_eq!(dates, vec![date(2024, 1, 7), date(2024, 1, 5)]);
        assert_eq!(days[0].max_temp_c, Some(3.0));
    }

    #[test]
    fn summaries_stay_within_bounds() {
        // Five days of samples at a 3-hour cadence with varied values.
        let samples: Vec<Sample> = (0..40)
            .map(|i| {
                let i = i as i64;
                Sample {
                    wind_speed_mps: Some((i % 7) as f64),
                    humidity_pct: Some(((i * 13) % 101) as f64),
                    precip_probability: Some(((i * 17) % 101) as f64 / 100.0),
                    ..sample(JAN_5 + i * 3 * HOUR + HOUR, ((i * 7) % 23) as f64 - 5.0, "clear")
                }
            })
            .collect();

        let days = aggregate_daily(&samples, &Utc, date(2024, 1, 5));
        assert_eq!(days.len(), 5);

        for day in &days {
            let bucket: Vec<f64> = samples
                .iter()
                .filter(|s| local_date(s.timestamp, &Utc) == Some(day.date))
                .filter_map(|s| s.temperature_c)
                .collect();
            let lo = bucket.iter().copied().fold(f64::INFINITY, f64::min);
            let hi = bucket.iter().copied().fold(f64::NEG_INFINITY, f64::max);

            let (min, max) = (day.min_temp_c.unwrap(), day.max_temp_c.unwrap());
            assert!(min <= max);
            assert!((lo..=hi).contains(&min));
            assert!((lo..=hi).contains(&max));
            assert!(day.humidity_pct.unwrap() <= 100);
            assert!(day.precipitation_pct.unwrap() <= 100);
        }
    }

    #[test]
    fn hourly_strip_takes_first_eight_samples() {
        let samples: Vec<Sample> = (0..10)
            .map(|i| Sample {
                precip_probability: Some(0.25),
                ..sample(JAN_5 + i * 3 * HOUR, 10.4 + i as f64, "clear")
            })
            .collect();

        let points = hourly_points(&samples, &Utc);

        assert_eq!(points.len(), HOURLY_POINTS);
        assert_eq!(points[0].time, "12AM");
        assert_eq!(points[1].time, "3AM");
        assert_eq!(points[5].time, "3PM");
        assert_eq!(points[0].temperature_c, 10);
        assert_eq!(points[0].precipitation_pct, 25);
    }

    #[test]
    fn hourly_strip_skips_samples_without_temperature() {
        let mut samples = vec![sample(JAN_5, 1.0, "clear"), sample(JAN_5 + 3 * HOUR, 2.0, "clear")];
        samples[0].temperature_c = None;
        samples[1].precip_probability = None;

        let points = hourly_points(&samples, &Utc);
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].time, "3AM");
        assert_eq!(points[0].precipitation_pct, 0);
    }
}
