//! Catalogue data models, query answers and errors.

pub mod info;
pub mod types;

// Re-exports for convenience
pub use info::{BusInfo, RouteInfo, RouteItem, StopInfo};
pub use types::{Bus, BusRecord, Result, Stop, StopRecord, TransitError};
