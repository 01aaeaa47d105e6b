//! Live navigation against a selected itinerary

mod tracker;

pub use tracker::{
    ActiveNavigationState, Clock, NavigationTracker, PositionFix, SystemClock, TrackingPhase,
};
