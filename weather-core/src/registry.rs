use std::sync::Arc;

use crate::{
    cache::CacheStore,
    error::{Result, StorageError},
    model::{ForecastBundle, SavedCity, WeatherSnapshot},
    storage::{KeyValueStore, keys},
};

/// The user's saved cities plus the "active city" pointer.
///
/// Saved cities are kept in insertion order and are unique by exact name.
/// The active pointer is a plain name: it may name a city that was never
/// saved, or one that has since been removed.
#[derive(Debug, Clone)]
pub struct CityRegistry {
    store: Arc<dyn KeyValueStore>,
    weather_cache: CacheStore<WeatherSnapshot>,
    forecast_cache: CacheStore<ForecastBundle>,
}

impl CityRegistry {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        weather_cache: CacheStore<WeatherSnapshot>,
        forecast_cache: CacheStore<ForecastBundle>,
    ) -> Self {
        Self { store, weather_cache, forecast_cache }
    }

    pub async fn list(&self) -> Result<Vec<SavedCity>> {
        let Some(raw) = self.store.get(keys::SAVED_CITIES).await? else {
            return Ok(Vec::new());
        };

        let cities = serde_json::from_str(&raw).map_err(|source| StorageError::Corrupt {
            key: keys::SAVED_CITIES.to_string(),
            source,
        })?;
        Ok(cities)
    }

    pub async fn contains(&self, name: &str) -> Result<bool> {
        Ok(self.list().await?.iter().any(|c| c.name == name))
    }

    /// Append `city`. Returns `false` without touching storage if the name is taken.
    pub async fn add(&self, city: SavedCity) -> Result<bool> {
        let mut cities = self.list().await?;
        if cities.iter().any(|c| c.name == city.name) {
            tracing::debug!(city = %city.name, "city already saved");
            return Ok(false);
        }

        tracing::info!(city = %city.name, "saving city");
        cities.push(city);
        self.save(&cities).await?;
        Ok(true)
    }

    /// Remove by exact name and drop everything cached for it.
    pub async fn remove(&self, name: &str) -> Result<()> {
        let mut cities = self.list().await?;
        cities.retain(|c| c.name != name);
        self.save(&cities).await?;

        self.weather_cache.invalidate(name).await?;
        self.forecast_cache.invalidate(name).await?;
        tracing::info!(city = %name, "removed city and purged cached data");
        Ok(())
    }

    /// Mark `name` as the only primary city. Returns `false` if it is not saved.
    pub async fn set_primary(&self, name: &str) -> Result<bool> {
        let mut cities = self.list().await?;
        if !cities.iter().any(|c| c.name == name) {
            return Ok(false);
        }

        for city in &mut cities {
            city.is_primary = city.name == name;
        }
        self.save(&cities).await?;
        Ok(true)
    }

    pub async fn set_active(&self, name: &str) -> Result<()> {
        self.store.set(keys::LAST_CITY, name.to_string()).await?;
        Ok(())
    }

    pub async fn active(&self) -> Result<Option<String>> {
        Ok(self.store.get(keys::LAST_CITY).await?)
    }

    async fn save(&self, cities: &[SavedCity]) -> Result<()> {
        let json = serde_json::to_string(cities).map_err(|source| StorageError::Serialize {
            key: keys::SAVED_CITIES.to_string(),
            source,
        })?;
        self.store.set(keys::SAVED_CITIES, json).await?;
        Ok(())
    }
}
