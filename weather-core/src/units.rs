//! Temperature conversion.
//!
//! All temperatures enter the data model in whole degrees Celsius and are
//! converted only at display time. Both steps go through [`round_temperature`]
//! so that every screen rounds the same value the same way.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TemperatureUnit {
    #[default]
    #[serde(rename = "C")]
    Celsius,
    #[serde(rename = "F")]
    Fahrenheit,
}

impl TemperatureUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "C",
            TemperatureUnit::Fahrenheit => "F",
        }
    }

    /// Parse a persisted preference. Anything that is not `F` falls back to Celsius.
    pub fn from_stored(value: Option<&str>) -> Self {
        match value {
            Some("F") => TemperatureUnit::Fahrenheit,
            _ => TemperatureUnit::Celsius,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            TemperatureUnit::Celsius => TemperatureUnit::Fahrenheit,
            TemperatureUnit::Fahrenheit => TemperatureUnit::Celsius,
        }
    }
}

impl std::fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TemperatureUnit {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_ascii_uppercase().as_str() {
            "C" | "CELSIUS" => Ok(TemperatureUnit::Celsius),
            "F" | "FAHRENHEIT" => Ok(TemperatureUnit::Fahrenheit),
            _ => Err(anyhow::anyhow!("Unknown temperature unit '{value}'. Use 'C' or 'F'.")),
        }
    }
}

/// Round half away from zero to a whole degree.
pub fn round_temperature(value: f64) -> i32 {
    value.round() as i32
}

pub fn to_display_temperature(celsius: i32, unit: TemperatureUnit) -> i32 {
    match unit {
        TemperatureUnit::Celsius => celsius,
        TemperatureUnit::Fahrenheit => round_temperature(f64::from(celsius) * 9.0 / 5.0 + 32.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_to_fahrenheit() {
        assert_eq!(to_display_temperature(20, TemperatureUnit::Fahrenheit), 68);
        assert_eq!(to_display_temperature(0, TemperatureUnit::Fahrenheit), 32);
        assert_eq!(to_display_temperature(-40, TemperatureUnit::Fahrenheit), -40);
        // 21 * 1.8 + 32 = 69.8
        assert_eq!(to_display_temperature(21, TemperatureUnit::Fahrenheit), 70);
    }

    #[test]
    fn celsius_is_identity() {
        assert_eq!(to_display_temperature(-5, TemperatureUnit::Celsius), -5);
        assert_eq!(to_display_temperature(31, TemperatureUnit::Celsius), 31);
    }

    #[test]
    fn rounds_half_away_from_zero() {
        assert_eq!(round_temperature(2.5), 3);
        assert_eq!(round_temperature(-2.5), -3);
        assert_eq!(round_temperature(-0.4), 0);
    }

    #[test]
    fn stored_preference_defaults_to_celsius() {
        assert_eq!(TemperatureUnit::from_stored(None), TemperatureUnit::Celsius);
        assert_eq!(TemperatureUnit::from_stored(Some("K")), TemperatureUnit::Celsius);
        assert_eq!(TemperatureUnit::from_stored(Some("F")), TemperatureUnit::Fahrenheit);
    }

    #[test]
    fn parses_user_input() {
        assert_eq!(TemperatureUnit::try_from("f").unwrap(), TemperatureUnit::Fahrenheit);
        assert_eq!(TemperatureUnit::try_from("Celsius").unwrap(), TemperatureUnit::Celsius);
        let err = TemperatureUnit::try_from("kelvin").unwrap_err();
        assert!(err.to_string().contains("Unknown temperature unit"));
    }
}
