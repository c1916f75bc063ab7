//! Plain-text rendering of core types.

use std::fmt::Write;

use weather_core::{
    CityCandidate, ForecastBundle, SavedCity, TemperatureUnit, WeatherSnapshot,
    to_display_temperature,
};

fn temp(celsius: i32, unit: TemperatureUnit) -> String {
    format!("{}°{}", to_display_temperature(celsius, unit), unit)
}

pub fn snapshot(s: &WeatherSnapshot, unit: TemperatureUnit) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}, {}", s.city_name, s.country_code);
    if let Some(local) = s.local_time() {
        let _ = writeln!(out, "Local time: {}", local.format("%a %H:%M"));
    }
    let _ = writeln!(out, "{}  {}", temp(s.temperature, unit), s.description);
    let _ = writeln!(out, "Feels like: {}", temp(s.feels_like, unit));
    let _ = writeln!(
        out,
        "H: {}° L: {}°",
        to_display_temperature(s.temp_max, unit),
        to_display_temperature(s.temp_min, unit)
    );
    let _ = writeln!(out, "Humidity: {}%", s.humidity);
    let _ = writeln!(out, "Wind: {} m/s", s.wind_speed);
    let _ = writeln!(out, "Pressure: {} hPa", s.pressure);
    out
}

pub fn forecast(bundle: &ForecastBundle, unit: TemperatureUnit) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}-day forecast for {}", bundle.days.len(), bundle.city_name);
    for day in &bundle.days {
        let _ = writeln!(
            out,
            "{}  {:>6} / {:<6}  {:<20} humidity {}%",
            day.date.format("%a %b %e"),
            temp(day.temp_max, unit),
            temp(day.temp_min, unit),
            day.description,
            day.humidity
        );
    }
    out
}

pub fn candidate(c: &CityCandidate) -> String {
    format!("{}, {} ({:.2}, {:.2})", c.name, c.country_code, c.lat, c.lon)
}

pub fn saved_city(city: &SavedCity, is_active: bool) -> String {
    let marker = if is_active { ">" } else { " " };
    let primary = if city.is_primary { " ★ Primary" } else { "" };
    format!("{marker} {}, {}{primary}", city.name, city.country_code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use weather_core::ForecastDay;

    #[test]
    fn forecast_lines_use_display_unit() {
        let bundle = ForecastBundle {
            city_name: "Oslo".into(),
            days: vec![ForecastDay {
                date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
                temp: 15,
                temp_min: 10,
                temp_max: 20,
                description: "light rain".into(),
                icon_id: "10d".into(),
                humidity: 80,
            }],
            captured_at_ms: 0,
            utc_offset_seconds: None,
        };

        let text = forecast(&bundle, TemperatureUnit::Fahrenheit);
        assert!(text.starts_with("1-day forecast for Oslo"));
        assert!(text.contains("68°F"));
        assert!(text.contains("50°F"));
    }

    #[test]
    fn saved_city_marks_active_and_primary() {
        let mut city = SavedCity::new("Paris", "FR");
        city.is_primary = true;
        assert_eq!(saved_city(&city, true), "> Paris, FR ★ Primary");
        assert_eq!(saved_city(&SavedCity::new("Lyon", "FR"), false), "  Lyon, FR");
    }
}
