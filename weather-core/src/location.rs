use async_trait::async_trait;

use crate::model::Coordinates;

/// Device position. Permission refusal and missing hardware both come back as `None`.
#[async_trait]
pub trait LocationProvider: Send + Sync + std::fmt::Debug {
    async fn current_coordinates(&self) -> Option<Coordinates>;
}

/// Always reports the same position, e.g. a configured home location.
#[derive(Debug, Clone, Copy)]
pub struct FixedLocation(pub Coordinates);

#[async_trait]
impl LocationProvider for FixedLocation {
    async fn current_coordinates(&self) -> Option<Coordinates> {
        Some(self.0)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoLocation;

#[async_trait]
impl LocationProvider for NoLocation {
    async fn current_coordinates(&self) -> Option<Coordinates> {
        None
    }
}
