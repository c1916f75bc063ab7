//! Core library for the `weather` CLI.
//!
//! This crate defines:
//! - Temperature conversion and forecast aggregation
//! - An expiring write-through cache over a pluggable key-value store
//! - The saved-city registry and the active-city pointer
//! - A cache-first gateway in front of the remote weather provider
//! - Configuration handling
//!
//! It is used by `weather-cli`, but can also be reused by other front ends.

pub mod app;
pub mod cache;
pub mod clock;
pub mod config;
pub mod error;
pub mod forecast;
pub mod gateway;
pub mod location;
pub mod model;
pub mod preferences;
pub mod provider;
pub mod registry;
pub mod storage;
pub mod units;

pub use app::{HomeWeather, WeatherApp};
pub use cache::{CACHE_TTL_MS, CacheEntry, CacheStore};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::Config;
pub use error::{FetchError, StorageError, WeatherError};
pub use gateway::WeatherGateway;
pub use location::{FixedLocation, LocationProvider, NoLocation};
pub use model::{
    CityCandidate, Coordinates, ForecastBundle, ForecastDay, LocationQuery, SavedCity,
    WeatherSnapshot,
};
pub use preferences::Preferences;
pub use provider::{WeatherApi, openweather::OpenWeatherProvider, provider_from_config};
pub use registry::CityRegistry;
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use units::{TemperatureUnit, to_display_temperature};
