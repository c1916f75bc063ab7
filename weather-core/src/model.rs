use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// What to ask the provider for when fetching current conditions.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationQuery {
    City(String),
    Coordinates(Coordinates),
}

/// Point-in-time weather reading for one city, temperatures in whole degrees Celsius.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub temperature: i32,
    pub feels_like: i32,
    pub temp_min: i32,
    pub temp_max: i32,
    pub humidity: u8,
    pub pressure: f64,
    pub description: String,
    pub icon_id: String,
    pub wind_speed: f64,
    pub city_name: String,
    pub country_code: String,
    pub captured_at_ms: i64,
    /// Seconds east of UTC. Missing on snapshots written by older versions.
    #[serde(default)]
    pub utc_offset_seconds: Option<i32>,
}

impl WeatherSnapshot {
    /// The capture instant in the city's own clock.
    pub fn local_time(&self) -> Option<DateTime<FixedOffset>> {
        let offset = FixedOffset::east_opt(self.utc_offset_seconds?)?;
        let captured = DateTime::from_timestamp_millis(self.captured_at_ms)?;
        Some(captured.with_timezone(&offset))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDay {
    pub date: NaiveDate,
    pub temp: i32,
    pub temp_min: i32,
    pub temp_max: i32,
    pub description: String,
    pub icon_id: String,
    pub humidity: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastBundle {
    pub city_name: String,
    pub days: Vec<ForecastDay>,
    pub captured_at_ms: i64,
    #[serde(default)]
    pub utc_offset_seconds: Option<i32>,
}

/// A city in the user's saved list. Identity is the exact, case-sensitive name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedCity {
    pub name: String,
    pub country_code: String,
    #[serde(default)]
    pub is_primary: bool,
}

impl SavedCity {
    pub fn new(name: impl Into<String>, country_code: impl Into<String>) -> Self {
        Self { name: name.into(), country_code: country_code.into(), is_primary: false }
    }
}

/// Geocoding search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityCandidate {
    pub name: String,
    pub country_code: String,
    pub lat: f64,
    pub lon: f64,
}

impl From<&CityCandidate> for SavedCity {
    fn from(candidate: &CityCandidate) -> Self {
        SavedCity::new(candidate.name.clone(), candidate.country_code.clone())
    }
}

/// Current conditions as reported by the provider, before rounding.
#[derive(Debug, Clone, PartialEq)]
pub struct RawCurrent {
    pub temp: f64,
    pub feels_like: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub humidity: u8,
    pub pressure: f64,
    pub description: String,
    pub icon_id: String,
    pub wind_speed: f64,
    pub city_name: String,
    pub country_code: String,
    pub utc_offset_seconds: Option<i32>,
}

/// One 3-hourly forecast reading.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSample {
    /// Unix seconds, UTC.
    pub timestamp: i64,
    pub temp: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub humidity: u8,
    pub description: String,
    pub icon_id: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawForecast {
    pub city_name: String,
    pub utc_offset_seconds: Option<i32>,
    pub samples: Vec<RawSample>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn snapshot(offset: Option<i32>) -> WeatherSnapshot {
        WeatherSnapshot {
            temperature: 12,
            feels_like: 10,
            temp_min: 9,
            temp_max: 14,
            humidity: 70,
            pressure: 1012.0,
            description: "light rain".into(),
            icon_id: "10d".into(),
            wind_speed: 4.1,
            city_name: "Paris".into(),
            country_code: "FR".into(),
            // 2024-03-01T10:00:00Z
            captured_at_ms: 1_709_287_200_000,
            utc_offset_seconds: offset,
        }
    }

    #[test]
    fn local_time_applies_offset() {
        let local = snapshot(Some(3600)).local_time().expect("offset present");
        assert_eq!(local.hour(), 11);
        assert_eq!(local.offset().local_minus_utc(), 3600);
    }

    #[test]
    fn local_time_requires_offset() {
        assert!(snapshot(None).local_time().is_none());
    }

    #[test]
    fn snapshot_without_offset_field_still_deserializes() {
        let mut value = serde_json::to_value(snapshot(Some(0))).unwrap();
        value.as_object_mut().unwrap().remove("utc_offset_seconds");
        let parsed: WeatherSnapshot = serde_json::from_value(value).unwrap();
        assert_eq!(parsed.utc_offset_seconds, None);
    }

    #[test]
    fn saved_city_primary_defaults_to_false() {
        let city: SavedCity =
            serde_json::from_str(r#"{"name":"Oslo","country_code":"NO"}"#).unwrap();
        assert!(!city.is_primary);
    }
}
