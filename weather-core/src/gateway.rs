//! Cache-first access to current weather, forecasts and city search.

use std::sync::Arc;

use crate::{
    cache::CacheStore,
    clock::Clock,
    error::Result,
    forecast,
    model::{
        CityCandidate, Coordinates, ForecastBundle, LocationQuery, RawCurrent, WeatherSnapshot,
    },
    provider::WeatherApi,
    units::round_temperature,
};

/// Queries shorter than this never reach the geocoder.
pub const MIN_SEARCH_QUERY_CHARS: usize = 2;
pub const MAX_SEARCH_RESULTS: usize = 5;

#[derive(Debug, Clone)]
pub struct WeatherGateway {
    api: Arc<dyn WeatherApi>,
    weather_cache: CacheStore<WeatherSnapshot>,
    forecast_cache: CacheStore<ForecastBundle>,
    clock: Arc<dyn Clock>,
}

impl WeatherGateway {
    pub fn new(
        api: Arc<dyn WeatherApi>,
        weather_cache: CacheStore<WeatherSnapshot>,
        forecast_cache: CacheStore<ForecastBundle>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self { api, weather_cache, forecast_cache, clock }
    }

    /// Current conditions for `name`, served from cache when possible.
    ///
    /// Cached snapshots without a UTC offset were written by an older schema
    /// and are refetched even when fresh.
    pub async fn current_weather_for_city(&self, name: &str) -> Result<WeatherSnapshot> {
        if let Some(cached) = self.weather_cache.read(name).await? {
            if cached.utc_offset_seconds.is_some() {
                return Ok(cached);
            }
            tracing::warn!(city = %name, "cached snapshot has no UTC offset; refetching");
        }

        let raw = self.api.fetch_current(&LocationQuery::City(name.to_string())).await?;
        self.store_snapshot(raw).await
    }

    /// Current conditions at `coords`. Always remote; the result is cached
    /// under the city name the provider resolved.
    pub async fn current_weather_for_coordinates(
        &self,
        coords: Coordinates,
    ) -> Result<WeatherSnapshot> {
        let raw = self.api.fetch_current(&LocationQuery::Coordinates(coords)).await?;
        self.store_snapshot(raw).await
    }

    pub async fn forecast_for_city(&self, name: &str) -> Result<ForecastBundle> {
        if let Some(cached) = self.forecast_cache.read(name).await? {
            return Ok(cached);
        }

        let raw = self.api.fetch_forecast(name).await?;
        let bundle = ForecastBundle {
            days: forecast::aggregate(&raw.samples, raw.utc_offset_seconds),
            city_name: raw.city_name,
            captured_at_ms: self.clock.now_ms(),
            utc_offset_seconds: raw.utc_offset_seconds,
        };
        tracing::debug!(city = %bundle.city_name, days = bundle.days.len(), "aggregated forecast");

        self.forecast_cache.write(&bundle.city_name, &bundle).await?;
        Ok(bundle)
    }

    pub async fn search_cities(&self, query: &str) -> Result<Vec<CityCandidate>> {
        if query.chars().count() < MIN_SEARCH_QUERY_CHARS {
            return Ok(Vec::new());
        }

        let mut candidates = self.api.search_cities(query, MAX_SEARCH_RESULTS).await?;
        candidates.truncate(MAX_SEARCH_RESULTS);
        Ok(candidates)
    }

    async fn store_snapshot(&self, raw: RawCurrent) -> Result<WeatherSnapshot> {
        let snapshot = self.normalize(raw);
        self.weather_cache.write(&snapshot.city_name, &snapshot).await?;
        Ok(snapshot)
    }

    fn normalize(&self, raw: RawCurrent) -> WeatherSnapshot {
        WeatherSnapshot {
            temperature: round_temperature(raw.temp),
            feels_like: round_temperature(raw.feels_like),
            temp_min: round_temperature(raw.temp_min),
            temp_max: round_temperature(raw.temp_max),
            humidity: raw.humidity,
            pressure: raw.pressure,
            description: raw.description,
            icon_id: raw.icon_id,
            wind_speed: raw.wind_speed,
            city_name: raw.city_name,
            country_code: raw.country_code,
            captured_at_ms: self.clock.now_ms(),
            utc_offset_seconds: raw.utc_offset_seconds,
        }
    }
}
