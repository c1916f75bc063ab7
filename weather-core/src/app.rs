use std::sync::Arc;

use crate::{
    cache::CacheStore,
    clock::Clock,
    error::Result,
    gateway::WeatherGateway,
    location::LocationProvider,
    model::{ForecastBundle, SavedCity, WeatherSnapshot},
    preferences::Preferences,
    provider::WeatherApi,
    registry::CityRegistry,
    storage::{KeyValueStore, keys},
};

/// Result of resolving "what weather should the home view show".
#[derive(Debug, Clone, PartialEq)]
pub struct HomeWeather {
    pub snapshot: WeatherSnapshot,
    /// Set when the weather came from geolocation and that city is not saved yet.
    pub suggestion: Option<SavedCity>,
}

/// Everything a front end needs, wired against one store and one provider.
#[derive(Debug, Clone)]
pub struct WeatherApp {
    pub gateway: WeatherGateway,
    pub registry: CityRegistry,
    pub preferences: Preferences,
    location: Arc<dyn LocationProvider>,
}

impl WeatherApp {
    pub fn new(
        api: Arc<dyn WeatherApi>,
        store: Arc<dyn KeyValueStore>,
        location: Arc<dyn LocationProvider>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let weather_cache = CacheStore::new(keys::WEATHER_PREFIX, store.clone(), clock.clone());
        let forecast_cache = CacheStore::new(keys::FORECAST_PREFIX, store.clone(), clock.clone());

        Self {
            gateway: WeatherGateway::new(api, weather_cache.clone(), forecast_cache.clone(), clock),
            registry: CityRegistry::new(store.clone(), weather_cache, forecast_cache),
            preferences: Preferences::new(store),
            location,
        }
    }

    /// Weather for the active city, falling back to the device position.
    ///
    /// `Ok(None)` means there is no active city and no position either.
    pub async fn home_weather(&self) -> Result<Option<HomeWeather>> {
        if let Some(active) = self.registry.active().await? {
            let snapshot = self.gateway.current_weather_for_city(&active).await?;
            return Ok(Some(HomeWeather { snapshot, suggestion: None }));
        }

        let Some(coords) = self.location.current_coordinates().await else {
            tracing::info!("no active city and location unavailable");
            return Ok(None);
        };

        let snapshot = self.gateway.current_weather_for_coordinates(coords).await?;
        self.registry.set_active(&snapshot.city_name).await?;

        let suggestion = if self.registry.contains(&snapshot.city_name).await? {
            None
        } else {
            Some(SavedCity::new(snapshot.city_name.clone(), snapshot.country_code.clone()))
        };

        Ok(Some(HomeWeather { snapshot, suggestion }))
    }

    /// Save a suggested city and switch to it. Returns whether it was newly added.
    pub async fn accept_suggestion(&self, city: SavedCity) -> Result<bool> {
        let name = city.name.clone();
        let added = self.registry.add(city).await?;
        self.registry.set_active(&name).await?;
        Ok(added)
    }

    pub async fn select_city(&self, name: &str) -> Result<()> {
        self.registry.set_active(name).await
    }

    /// Current weather for a typed-in city name.
    ///
    /// The active city only changes once the lookup succeeds, and it is set to
    /// the name the provider resolved, so later reads hit the cache.
    pub async fn view_city(&self, name: &str) -> Result<WeatherSnapshot> {
        let snapshot = self.gateway.current_weather_for_city(name).await?;
        self.registry.set_active(&snapshot.city_name).await?;
        Ok(snapshot)
    }

    /// Forecast counterpart of [`WeatherApp::view_city`].
    pub async fn view_forecast(&self, name: &str) -> Result<ForecastBundle> {
        let bundle = self.gateway.forecast_for_city(name).await?;
        self.registry.set_active(&bundle.city_name).await?;
        Ok(bundle)
    }

    pub async fn active_forecast(&self) -> Result<Option<ForecastBundle>> {
        match self.registry.active().await? {
            Some(active) => Ok(Some(self.gateway.forecast_for_city(&active).await?)),
            None => Ok(None),
        }
    }
}
