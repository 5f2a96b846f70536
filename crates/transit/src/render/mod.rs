//! SVG map rendering.

pub mod map_renderer;
pub mod projector;
pub mod svg;

pub use map_renderer::{MapRenderer, RenderSettings};
pub use projector::SphereProjector;
pub use svg::{Color, Point};
