//! Collapses 3-hourly forecast samples into one summary per calendar day.

use chrono::{DateTime, NaiveDate};

use crate::{
    model::{ForecastDay, RawSample},
    units::round_temperature,
};

/// Maximum number of days kept in a forecast.
pub const MAX_FORECAST_DAYS: usize = 7;

/// Group `samples` by calendar date in the provider's reporting offset.
///
/// The first sample seen for a date supplies `temp`, `description`, `icon_id`
/// and `humidity`; later samples of the same date only widen `temp_min` and
/// `temp_max`. Days keep first-seen order and the result is cut to
/// [`MAX_FORECAST_DAYS`].
pub fn aggregate(samples: &[RawSample], utc_offset_seconds: Option<i32>) -> Vec<ForecastDay> {
    let offset = i64::from(utc_offset_seconds.unwrap_or(0));
    let mut days: Vec<ForecastDay> = Vec::new();

    for sample in samples {
        let Some(date) = calendar_date(sample.timestamp, offset) else {
            tracing::warn!(timestamp = sample.timestamp, "skipping out-of-range forecast sample");
            continue;
        };

        let sample_min = round_temperature(sample.temp_min);
        let sample_max = round_temperature(sample.temp_max);

        // Samples arrive sorted, so the open day is almost always the last one.
        match days.iter_mut().rev().find(|d| d.date == date) {
            Some(day) => {
                day.temp_min = day.temp_min.min(sample_min);
                day.temp_max = day.temp_max.max(sample_max);
            }
            None => days.push(ForecastDay {
                date,
                temp: round_temperature(sample.temp),
                temp_min: sample_min,
                temp_max: sample_max,
                description: sample.description.clone(),
                icon_id: sample.icon_id.clone(),
                humidity: sample.humidity,
            }),
        }
    }

    days.truncate(MAX_FORECAST_DAYS);
    days
}

fn calendar_date(timestamp: i64, offset_seconds: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp(timestamp.checked_add(offset_seconds)?, 0).map(|dt| dt.date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY: i64 = 86_400;
    // 2024-06-01T00:00:00Z
    const JUNE_1: i64 = 1_717_200_000;

    fn sample(timestamp: i64, min: f64, max: f64, description: &str) -> RawSample {
        RawSample {
            timestamp,
            temp: (min + max) / 2.0,
            temp_min: min,
            temp_max: max,
            humidity: 60,
            description: description.to_string(),
            icon_id: format!("{description}-icon"),
        }
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn groups_eight_samples_into_three_days() {
        let h = 3 * 3600;
        let samples = vec![
            sample(JUNE_1 + 15 * 3600, 14.0, 18.0, "clouds"),
            sample(JUNE_1 + 18 * 3600, 12.0, 16.0, "rain"),
            sample(JUNE_1 + 21 * 3600, 10.2, 13.0, "clear"),
            sample(JUNE_1 + DAY, 9.0, 11.0, "mist"),
            sample(JUNE_1 + DAY + h, 8.4, 12.0, "clear"),
            sample(JUNE_1 + DAY + 4 * h, 15.0, 22.6, "sun"),
            sample(JUNE_1 + 2 * DAY + h, 11.0, 14.0, "drizzle"),
            sample(JUNE_1 + 2 * DAY + 5 * h, 13.0, 19.0, "clouds"),
        ];

        let days = aggregate(&samples, None);

        assert_eq!(days.len(), 3);
        assert_eq!(days[0].date, date("2024-06-01"));
        assert_eq!(days[1].date, date("2024-06-02"));
        assert_eq!(days[2].date, date("2024-06-03"));

        assert_eq!((days[0].temp_min, days[0].temp_max), (10, 18));
        assert_eq!((days[1].temp_min, days[1].temp_max), (8, 23));
        assert_eq!((days[2].temp_min, days[2].temp_max), (11, 19));

        assert_eq!(days[0].description, "clouds");
        assert_eq!(days[0].icon_id, "clouds-icon");
        assert_eq!(days[1].description, "mist");
        assert_eq!(days[2].description, "drizzle");
        assert_eq!(days[1].temp, 10);
    }

    #[test]
    fn truncates_to_seven_days() {
        let samples: Vec<_> =
            (0..10).map(|i| sample(JUNE_1 + i * DAY + 3600, 10.0, 20.0, "clear")).collect();

        let days = aggregate(&samples, None);

        assert_eq!(days.len(), MAX_FORECAST_DAYS);
        assert_eq!(days[0].date, date("2024-06-01"));
        assert_eq!(days[6].date, date("2024-06-07"));
    }

    #[test]
    fn fewer_dates_are_not_padded() {
        let samples =
            vec![sample(JUNE_1, 1.0, 2.0, "snow"), sample(JUNE_1 + DAY, 1.0, 2.0, "snow")];
        assert_eq!(aggregate(&samples, None).len(), 2);
        assert!(aggregate(&[], None).is_empty());
    }

    #[test]
    fn day_boundary_follows_reporting_offset() {
        // 22:00Z on June 1 is already June 2 in UTC+3.
        let samples = vec![
            sample(JUNE_1 + 20 * 3600, 5.0, 6.0, "first"),
            sample(JUNE_1 + 22 * 3600, 7.0, 8.0, "second"),
        ];

        let utc = aggregate(&samples, None);
        assert_eq!(utc.len(), 1);

        let shifted = aggregate(&samples, Some(3 * 3600));
        assert_eq!(shifted.len(), 2);
        assert_eq!(shifted[1].date, date("2024-06-02"));
        assert_eq!(shifted[1].description, "second");
    }

    #[test]
    fn later_samples_never_overwrite_representative_fields() {
        let mut warm = sample(JUNE_1 + 3600, 20.0, 30.0, "hot");
        warm.humidity = 90;
        let samples = vec![sample(JUNE_1, 10.0, 12.0, "cool"), warm];

        let days = aggregate(&samples, None);

        assert_eq!(days[0].humidity, 60);
        assert_eq!(days[0].temp, 11);
        assert_eq!(days[0].temp_max, 30);
    }
}
