//! Great-circle distance calculations.
//!
//! Uses the Haversine formula for distances on Earth's surface.

use geo::{HaversineDistance, Point};

/// Build a point from latitude/longitude degrees (x = longitude, y = latitude)
pub fn point_from_lat_lng(latitude: f64, longitude: f64) -> Point {
    Point::new(longitude, latitude)
}

/// Calculate Haversine distance between two points in meters
pub fn haversine_distance(p1: Point, p2: Point) -> f64 {
    p1.haversine_distance(&p2)
}

/// Sum of Haversine distances between consecutive points of a walk
pub fn path_length<I>(points: I) -> f64
where
    I: IntoIterator<Item = Point>,
{
    let mut points = points.into_iter();
    let Some(mut prev) = points.next() else {
        return 0.0;
    };

    let mut total = 0.0;
    for point in points {
        total += haversine_distance(prev, point);
        prev = point;
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haversine_distance() {
        // Distance from NYC to LA is approximately 3,936 km
        let nyc = point_from_lat_lng(40.7128, -74.0060);
        let la = point_from_lat_lng(34.0522, -118.2437);

        let dist = haversine_distance(nyc, la);
        assert!((dist - 3_936_000.0).abs() < 50_000.0); // Within 50km
    }

    #[test]
    fn test_same_point_is_zero() {
        let p = point_from_lat_lng(55.611087, 37.20829);
        assert_eq!(haversine_distance(p, p), 0.0);
    }

    #[test]
    fn test_path_length() {
        let a = point_from_lat_lng(55.611087, 37.20829);
        let b = point_from_lat_lng(55.595884, 37.209755);

        let there_and_back = path_length([a, b, a]);
        assert!((there_and_back - 2.0 * haversine_distance(a, b)).abs() < 1e-6);
        assert_eq!(path_length([a]), 0.0);
        assert_eq!(path_length(Vec::new()), 0.0);
    }
}
