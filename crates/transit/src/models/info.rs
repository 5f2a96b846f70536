//! Query answers handed to the response formatter.

use std::collections::BTreeSet;

use crate::identifiers::*;

/// Statistics of a single bus line.
#[derive(Clone, Debug, PartialEq)]
pub struct BusInfo {
    pub name: BusName,
    pub stop_count: usize,
    pub unique_stop_count: usize,
    pub route_length: u64,
    pub geo_length: f64,
}

impl BusInfo {
    /// Ratio of road length to great-circle length. Infinite when every stop
    /// of the walk shares one location, since the great-circle length is 0.
    pub fn curvature(&self) -> f64 {
        self.route_length as f64 / self.geo_length
    }
}

/// Buses serving a stop, sorted by name. Empty for a stop no bus visits.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StopInfo {
    pub name: StopName,
    pub buses: BTreeSet<BusName>,
}

/// One leg of a journey, in minutes.
#[derive(Clone, Debug, PartialEq)]
pub enum RouteItem {
    Wait {
        stop: StopName,
        time: f64,
    },
    Ride {
        bus: BusName,
        time: f64,
        span_count: usize,
    },
}

impl RouteItem {
    pub fn is_wait(&self) -> bool {
        matches!(self, Self::Wait { .. })
    }

    pub fn time(&self) -> f64 {
        match self {
            Self::Wait { time, .. } | Self::Ride { time, .. } => *time,
        }
    }

    /// Stop name for a wait, bus name for a ride
    pub fn name(&self) -> &str {
        match self {
            Self::Wait { stop, .. } => stop.as_str(),
            Self::Ride { bus, .. } => bus.as_str(),
        }
    }
}

/// Fastest journey between two stops.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RouteInfo {
    pub total_time: f64,
    pub items: Vec<RouteItem>,
}
