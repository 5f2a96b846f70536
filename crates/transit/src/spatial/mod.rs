//! Geographic distance utilities.

pub mod queries;

pub use queries::{haversine_distance, path_length, point_from_lat_lng};
