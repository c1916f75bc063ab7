use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, de::DeserializeOwned};

use crate::{
    error::FetchError,
    model::{CityCandidate, LocationQuery, RawCurrent, RawForecast, RawSample},
};

use super::WeatherApi;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";
pub const DEFAULT_GEO_URL: &str = "https://api.openweathermap.org/geo/1.0";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    geo_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Self {
        Self::with_base_urls(api_key, DEFAULT_BASE_URL.to_string(), DEFAULT_GEO_URL.to_string())
    }

    /// Point the client somewhere other than api.openweathermap.org.
    pub fn with_base_urls(api_key: String, base_url: String, geo_url: String) -> Self {
        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            geo_url: geo_url.trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        mut query: Vec<(&str, String)>,
        what: &str,
    ) -> Result<T, FetchError> {
        query.push(("appid", self.api_key.clone()));

        tracing::info!(%url, what, "requesting OpenWeather");

        let res = self.http.get(url).query(&query).send().await?;

        let status = res.status();
        let body = res.text().await?;

        if status == StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound(what.to_string()));
        }
        if !status.is_success() {
            return Err(FetchError::Status { status: status.as_u16(), body: truncate_body(&body) });
        }

        serde_json::from_str(&body).map_err(|e| {
            FetchError::Parse(format!("OpenWeather response for {what} is malformed: {e}"))
        })
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    temp_min: f64,
    temp_max: f64,
    humidity: u8,
    pressure: f64,
}

#[derive(Debug, Deserialize)]
struct OwForecastMain {
    temp: f64,
    temp_min: f64,
    temp_max: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    country: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
    sys: OwSys,
    timezone: Option<i32>,
}

#[derive(Debug, Deserialize)]
struct OwCity {
    name: String,
    timezone: Option<i32>,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    main: OwForecastMain,
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    city: OwCity,
    list: Vec<OwForecastEntry>,
}

#[derive(Debug, Deserialize)]
struct OwGeoItem {
    name: String,
    country: String,
    lat: f64,
    lon: f64,
}

fn first_condition(weather: Vec<OwWeather>, what: &str) -> Result<OwWeather, FetchError> {
    weather
        .into_iter()
        .next()
        .ok_or_else(|| {
            FetchError::Parse(format!("OpenWeather response for {what} has no weather conditions"))
        })
}

#[async_trait]
impl WeatherApi for OpenWeatherProvider {
    async fn fetch_current(&self, query: &LocationQuery) -> Result<RawCurrent, FetchError> {
        let (mut params, what) = match query {
            LocationQuery::City(name) => (vec![("q", name.clone())], name.clone()),
            LocationQuery::Coordinates(c) => (
                vec![("lat", c.lat.to_string()), ("lon", c.lon.to_string())],
                format!("{:.4},{:.4}", c.lat, c.lon),
            ),
        };
        params.push(("units", "metric".to_string()));

        let url = format!("{}/weather", self.base_url);
        let parsed: OwCurrentResponse = self.get_json(&url, params, &what).await?;
        let condition = first_condition(parsed.weather, &what)?;

        Ok(RawCurrent {
            temp: parsed.main.temp,
            feels_like: parsed.main.feels_like,
            temp_min: parsed.main.temp_min,
            temp_max: parsed.main.temp_max,
            humidity: parsed.main.humidity,
            pressure: parsed.main.pressure,
            description: condition.description,
            icon_id: condition.icon,
            wind_speed: parsed.wind.speed,
            city_name: parsed.name,
            country_code: parsed.sys.country,
            utc_offset_seconds: parsed.timezone,
        })
    }

    async fn fetch_forecast(&self, city: &str) -> Result<RawForecast, FetchError> {
        let url = format!("{}/forecast", self.base_url);
        let params = vec![("q", city.to_string()), ("units", "metric".to_string())];
        let parsed: OwForecastResponse = self.get_json(&url, params, city).await?;

        let samples = parsed
            .list
            .into_iter()
            .map(|entry| -> Result<RawSample, FetchError> {
                let condition = first_condition(entry.weather, city)?;
                Ok(RawSample {
                    timestamp: entry.dt,
                    temp: entry.main.temp,
                    temp_min: entry.main.temp_min,
                    temp_max: entry.main.temp_max,
                    humidity: entry.main.humidity,
                    description: condition.description,
                    icon_id: condition.icon,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(RawForecast {
            city_name: parsed.city.name,
            utc_offset_seconds: parsed.city.timezone,
            samples,
        })
    }

    async fn search_cities(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<CityCandidate>, FetchError> {
        let url = format!("{}/direct", self.geo_url);
        let params = vec![("q", query.to_string()), ("limit", limit.to_string())];
        let items: Vec<OwGeoItem> = self.get_json(&url, params, query).await?;

        Ok(items
            .into_iter()
            .take(limit)
            .map(|item| CityCandidate {
                name: item.name,
                country_code: item.country,
                lat: item.lat,
                lon: item.lon,
            })
            .collect())
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        format!("{}...", body.chars().take(MAX).collect::<String>())
    } else {
        body.to_string()
    }
}
