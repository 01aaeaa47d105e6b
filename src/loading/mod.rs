//! Loading and validation of external transit records, and construction of
//! the routable graph.

mod builder;
pub mod config;
mod records;
mod source;

pub use builder::build_graph;
pub use config::{NetworkConfig, SpeedProfile, TrackerConfig, ZoneConfig};
pub use records::{RouteRecord, StopRecord, ZoneRecord};
pub use source::{StaticSource, TransitDataSource};
