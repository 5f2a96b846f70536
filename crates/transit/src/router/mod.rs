//! Journey planning over the catalogue.

pub mod transport_router;

pub use transport_router::{EdgeKind, RouteGraph, RoutingSettings, StopVertices, TransportRouter};
