use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("No transit node found near ({lat}, {lng})")]
    NoNearbyNode { lat: f64, lng: f64 },
    #[error("Walking directions unavailable: {0}")]
    WalkingLegUnavailable(String),
    #[error("No transit path found between node {from} and node {to}")]
    NoPathFound { from: u64, to: u64 },
    #[error("A trip calculation is already in progress")]
    CalculationInProgress,
    #[error("Transit data unavailable: {0}")]
    DataUnavailable(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
}
