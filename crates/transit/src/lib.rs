//! # transit-catalogue
//!
//! In-memory transport catalogue with fastest-route search, SVG map
//! rendering and a binary snapshot format.
//!
//! ## Features
//!
//! - **Catalogue**: stops, bus lines and measured road distances
//! - **Routing**: time-weighted graph with waits and rides, Dijkstra search
//! - **Rendering**: layered schematic SVG map of all lines
//! - **Snapshots**: save a built database once, answer queries from it later
//! - **serde** (optional): deserialize input records and settings
//!
//! ## Example
//!
//! ```
//! use transit_catalogue::prelude::*;
//!
//! let mut catalogue = TransportCatalogue::new();
//! catalogue.add_stop("A", point_from_lat_lng(55.611087, 37.20829)).unwrap();
//! catalogue.add_stop("B", point_from_lat_lng(55.595884, 37.209755)).unwrap();
//! catalogue.set_distance("A", "B", 1000).unwrap();
//! catalogue.add_bus("750", &["A", "B"], false).unwrap();
//!
//! let info = catalogue.bus_info("750").unwrap();
//! assert_eq!(info.stop_count, 3);
//! assert_eq!(info.route_length, 2000);
//!
//! let settings = RoutingSettings { bus_wait_time: 6, bus_velocity: 40.0 };
//! let router = TransportRouter::build(&catalogue, settings).unwrap();
//! let route = router.build_route("A", "B").unwrap();
//! assert!((route.total_time - 7.5).abs() < 1e-9);
//! ```

pub mod catalogue;
pub mod graph;
pub mod handler;
pub mod identifiers;
pub mod models;
pub mod render;
pub mod router;
pub mod snapshot;
pub mod spatial;

// Re-exports for convenience
pub mod prelude {
    pub use crate::catalogue::TransportCatalogue;
    pub use crate::handler::{Info, Query, RequestHandler};
    pub use crate::identifiers::*;
    pub use crate::models::{info::*, types::*};
    pub use crate::render::{Color, MapRenderer, RenderSettings};
    pub use crate::router::{RoutingSettings, TransportRouter};
    pub use crate::snapshot::{SnapshotError, TransitDatabase};
    pub use crate::spatial::point_from_lat_lng;
}

pub use prelude::*;
