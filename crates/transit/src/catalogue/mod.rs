//! The transport catalogue.

pub mod transport_catalogue;

pub use transport_catalogue::TransportCatalogue;
