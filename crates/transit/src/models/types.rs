//! Core data types for the catalogue.

use std::collections::BTreeMap;

use geo::Point;

use crate::graph::GraphError;
use crate::identifiers::*;

// ============================================================================
// Loader Records
// ============================================================================

/// A stop as handed over by the loader, with its outgoing road distances.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StopRecord {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Road distance in meters from this stop to each named neighbour
    #[cfg_attr(feature = "serde", serde(default))]
    pub road_distances: BTreeMap<String, u32>,
}

/// A bus line as handed over by the loader.
///
/// `stops` is the outbound stop list. For a line that is not a round trip the
/// catalogue appends the way back itself.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BusRecord {
    pub name: String,
    pub stops: Vec<String>,
    pub is_roundtrip: bool,
}

// ============================================================================
// Stored Entities
// ============================================================================

#[derive(Clone, Debug, PartialEq)]
pub struct Stop {
    pub id: StopId,
    pub name: StopName,
    /// x = longitude, y = latitude
    pub location: Point,
}

impl Stop {
    pub fn latitude(&self) -> f64 {
        self.location.y()
    }

    pub fn longitude(&self) -> f64 {
        self.location.x()
    }
}

/// A bus line with its precomputed statistics.
///
/// `stops` is the full walk the bus drives. For a line that is not a round
/// trip it has the shape `outbound + reverse(outbound[..k-1])`, so its length
/// is always odd and the turnaround stop sits in the middle.
#[derive(Clone, Debug, PartialEq)]
pub struct Bus {
    pub id: BusId,
    pub name: BusName,
    pub stops: Vec<StopId>,
    pub is_roundtrip: bool,
    pub unique_stop_count: usize,
    /// Sum of road distances along the walk, in meters
    pub route_length: u64,
    /// Sum of great-circle distances along the walk, in meters
    pub geo_length: f64,
}

impl Bus {
    /// Infinite when `geo_length` is 0, see [`BusInfo::curvature`](crate::models::info::BusInfo::curvature).
    pub fn curvature(&self) -> f64 {
        self.route_length as f64 / self.geo_length
    }

    /// Index of the last stop of the outbound half of the walk.
    pub fn turnaround_index(&self) -> usize {
        if self.is_roundtrip {
            self.stops.len().saturating_sub(1)
        } else {
            self.stops.len() / 2
        }
    }

    /// First stop, plus the turnaround stop when the bus goes there and back
    /// and the two differ.
    pub fn terminals(&self) -> (Option<StopId>, Option<StopId>) {
        let first = self.stops.first().copied();
        if self.is_roundtrip {
            return (first, None);
        }
        let last = self.stops.get(self.turnaround_index()).copied();
        match (first, last) {
            (Some(a), Some(b)) if a != b => (first, Some(b)),
            _ => (first, None),
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum TransitError {
    #[error("Stop not found: {0}")]
    StopNotFound(StopName),

    #[error("Bus not found: {0}")]
    BusNotFound(BusName),

    #[error("Duplicate stop: {0}")]
    DuplicateStop(StopName),

    #[error("Duplicate bus: {0}")]
    DuplicateBus(BusName),

    #[error("Bus {bus} references unknown stop {stop}")]
    UnknownStopInBus { bus: BusName, stop: StopName },

    #[error("Road distance between {from} and {to} is not set in either direction")]
    MissingDistance { from: StopName, to: StopName },

    #[error("Malformed route for bus {bus}: {reason}")]
    MalformedRoute { bus: BusName, reason: String },

    #[error("No route from {from} to {to}")]
    NoRoute { from: StopName, to: StopName },

    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl TransitError {
    /// True for the errors a query answers with "not found".
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::StopNotFound(_) | Self::BusNotFound(_) | Self::NoRoute { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, TransitError>;
