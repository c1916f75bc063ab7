use crate::{
    Config,
    error::FetchError,
    model::{CityCandidate, LocationQuery, RawCurrent, RawForecast},
    provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};

pub mod openweather;

/// Remote weather service. Implementations return provider values as-is;
/// rounding and timestamping happen in the gateway.
#[async_trait]
pub trait WeatherApi: Send + Sync + Debug {
    async fn fetch_current(&self, query: &LocationQuery) -> Result<RawCurrent, FetchError>;

    /// 3-hourly samples for `city`, oldest first.
    async fn fetch_forecast(&self, city: &str) -> Result<RawForecast, FetchError>;

    async fn search_cities(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<CityCandidate>, FetchError>;
}

/// Construct the provider described by `config`.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Arc<dyn WeatherApi>> {
    let api_key = config.api_key()?;

    let provider = OpenWeatherProvider::with_base_urls(
        api_key.to_owned(),
        config.base_url().to_owned(),
        config.geo_url().to_owned(),
    );

    Ok(Arc::new(provider))
}
