//! Projection of geographic coordinates onto the canvas.

use geo::Point as GeoPoint;

use super::svg::Point;

const EPSILON: f64 = 1e-6;

fn is_zero(value: f64) -> bool {
    value.abs() < EPSILON
}

/// Linear lat/lng projection that fits every given location into a
/// `width x height` canvas with `padding` on each side.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SphereProjector {
    padding: f64,
    min_lon: f64,
    max_lat: f64,
    zoom_coeff: f64,
}

impl SphereProjector {
    pub fn new<I>(locations: I, width: f64, height: f64, padding: f64) -> Self
    where
        I: IntoIterator<Item = GeoPoint>,
    {
        let mut locations = locations.into_iter().peekable();
        if locations.peek().is_none() {
            return Self {
                padding,
                min_lon: 0.0,
                max_lat: 0.0,
                zoom_coeff: 0.0,
            };
        }

        let (mut min_lon, mut max_lon) = (f64::INFINITY, f64::NEG_INFINITY);
        let (mut min_lat, mut max_lat) = (f64::INFINITY, f64::NEG_INFINITY);
        for location in locations {
            min_lon = min_lon.min(location.x());
            max_lon = max_lon.max(location.x());
            min_lat = min_lat.min(location.y());
            max_lat = max_lat.max(location.y());
        }

        let width_zoom = (!is_zero(max_lon - min_lon)).then(|| (width - 2.0 * padding) / (max_lon - min_lon));
        let height_zoom = (!is_zero(max_lat - min_lat)).then(|| (height - 2.0 * padding) / (max_lat - min_lat));

        let zoom_coeff = match (width_zoom, height_zoom) {
            (Some(w), Some(h)) => w.min(h),
            (Some(w), None) => w,
            (None, Some(h)) => h,
            (None, None) => 0.0,
        };

        Self {
            padding,
            min_lon,
            max_lat,
            zoom_coeff,
        }
    }

    pub fn project(&self, location: GeoPoint) -> Point {
        Point {
            x: (location.x() - self.min_lon) * self.zoom_coeff + self.padding,
            y: (self.max_lat - location.y()) * self.zoom_coeff + self.padding,
        }
    }
}
