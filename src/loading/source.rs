//! Read-only collaborator that supplies the persisted transit records

use super::records::{RouteRecord, StopRecord, ZoneRecord};
use crate::error::Error;

/// External transit data store.
///
/// The core never treats a failing source as fatal: any error here degrades
/// the graph to empty, and trip calculation reports "no route" instead of
/// crashing.
pub trait TransitDataSource: Sync {
    fn stops(&self) -> Result<Vec<StopRecord>, Error>;
    fn routes(&self) -> Result<Vec<RouteRecord>, Error>;
    fn zones(&self) -> Result<Vec<ZoneRecord>, Error>;
}

/// In-memory source seeded from record vectors.
///
/// Backs pilot deployments with hand-curated data and all of the test
/// fixtures in this crate.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    stops: Vec<StopRecord>,
    routes: Vec<RouteRecord>,
    zones: Vec<ZoneRecord>,
}

impl StaticSource {
    pub fn new(stops: Vec<StopRecord>, routes: Vec<RouteRecord>, zones: Vec<ZoneRecord>) -> Self {
        Self {
            stops,
            routes,
            zones,
        }
    }
}

impl TransitDataSource for StaticSource {
    fn stops(&self) -> Result<Vec<StopRecord>, Error> {
        Ok(self.stops.clone())
    }

    fn routes(&self) -> Result<Vec<RouteRecord>, Error> {
        Ok(self.routes.clone())
    }

    fn zones(&self) -> Result<Vec<ZoneRecord>, Error> {
        Ok(self.zones.clone())
    }
}
