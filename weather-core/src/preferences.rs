use std::sync::Arc;

use crate::{
    error::Result,
    storage::{KeyValueStore, keys},
    units::TemperatureUnit,
};

/// User display preferences persisted next to the saved cities.
#[derive(Debug, Clone)]
pub struct Preferences {
    store: Arc<dyn KeyValueStore>,
}

impl Preferences {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub async fn temperature_unit(&self) -> Result<TemperatureUnit> {
        let stored = self.store.get(keys::TEMP_UNIT).await?;
        Ok(TemperatureUnit::from_stored(stored.as_deref()))
    }

    pub async fn set_temperature_unit(&self, unit: TemperatureUnit) -> Result<()> {
        self.store.set(keys::TEMP_UNIT, unit.as_str().to_string()).await?;
        Ok(())
    }

    /// Flip between Celsius and Fahrenheit and return the unit now in effect.
    pub async fn toggle_temperature_unit(&self) -> Result<TemperatureUnit> {
        let next = self.temperature_unit().await?.toggled();
        self.set_temperature_unit(next).await?;
        Ok(next)
    }
}
