use std::fs;
use std::path::Path;

use crate::catalogue::TransportCatalogue;
use crate::handler::RequestHandler;
use crate::models::types::{BusRecord, Result, StopRecord};
use crate::render::{MapRenderer, RenderSettings};
use crate::router::{RoutingSettings, TransportRouter};

use super::records::{CatalogueSnapshot, DatabaseSnapshot, RouterSnapshot};
use super::{unwrap_header, wrap_with_header, SnapshotError};

/// Everything needed to answer queries: the catalogue, the render settings
/// and a router built over the catalogue.
#[derive(Debug)]
pub struct TransitDatabase {
    pub catalogue: TransportCatalogue,
    pub renderer: MapRenderer,
    pub router: TransportRouter,
}

impl TransitDatabase {
    pub fn build(
        stops: &[StopRecord],
        buses: &[BusRecord],
        routing: RoutingSettings,
        render: RenderSettings,
    ) -> Result<Self> {
        let catalogue = TransportCatalogue::from_records(stops, buses)?;
        let router = TransportRouter::build(&catalogue, routing)?;
        Ok(Self {
            catalogue,
            renderer: MapRenderer::new(render),
            router,
        })
    }

    pub fn handler(&self) -> RequestHandler<'_> {
        RequestHandler::new(&self.catalogue, &self.router, &self.renderer)
    }

    pub fn snapshot(&self) -> DatabaseSnapshot {
        DatabaseSnapshot {
            catalogue: CatalogueSnapshot::capture(&self.catalogue),
            render_settings: self.renderer.settings().clone(),
            router: RouterSnapshot::capture(&self.router),
        }
    }

    pub fn from_snapshot(snapshot: DatabaseSnapshot) -> std::result::Result<Self, SnapshotError> {
        let catalogue = snapshot.catalogue.restore()?;
        let router = snapshot.router.restore(&catalogue)?;
        Ok(Self {
            catalogue,
            renderer: MapRenderer::new(snapshot.render_settings),
            router,
        })
    }

    pub fn encode(&self) -> Vec<u8> {
        wrap_with_header(&bitcode::encode(&self.snapshot()))
    }

    pub fn decode(bytes: &[u8]) -> std::result::Result<Self, SnapshotError> {
        let payload = unwrap_header(bytes)?;
        let snapshot: DatabaseSnapshot = bitcode::decode(payload)?;
        Self::from_snapshot(snapshot)
    }

    pub fn save_to(&self, path: impl AsRef<Path>) -> std::result::Result<(), SnapshotError> {
        let path = path.as_ref();
        let bytes = self.encode();
        fs::write(path, &bytes)?;
        log::info!("Saved {} bytes to {}", bytes.len(), path.display());
        Ok(())
    }

    pub fn load_from(path: impl AsRef<Path>) -> std::result::Result<Self, SnapshotError> {
        let path = path.as_ref();
        let bytes = fs::read(path)?;
        let database = Self::decode(&bytes)?;
        log::info!(
            "Loaded {} stops and {} buses from {}",
            database.catalogue.stops().len(),
            database.catalogue.buses().len(),
            path.display()
        );
        Ok(database)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::{Info, Query};
    use crate::render::Color;
    use approx::assert_relative_eq;
    use std::collections::BTreeMap;

    fn stop(name: &str, lat: f64, lng: f64, distances: &[(&str, u32)]) -> StopRecord {
        StopRecord {
            name: name.into(),
            latitude: lat,
            longitude: lng,
            road_distances: distances
                .iter()
                .map(|(to, m)| (to.to_string(), *m))
                .collect::<BTreeMap<_, _>>(),
        }
    }

    fn bus(name: &str, stops: &[&str], is_roundtrip: bool) -> BusRecord {
        BusRecord {
            name: name.into(),
            stops: stops.iter().map(|s| s.to_string()).collect(),
            is_roundtrip,
        }
    }

    fn render_settings() -> RenderSettings {
        RenderSettings {
            width: 200.0,
            height: 200.0,
            padding: 10.0,
            line_width: 4.0,
            stop_radius: 3.0,
            color_palette: vec![Color::named("red")],
            ..RenderSettings::default()
        }
    }

    fn small_database() -> TransitDatabase {
        TransitDatabase::build(
            &[stop("A", 0.0, 0.0, &[("B", 100)]), stop("B", 0.0, 1.0, &[])],
            &[bus("1", &["A", "B"], true)],
            RoutingSettings {
                bus_wait_time: 6,
                bus_velocity: 40.0,
            },
            render_settings(),
        )
        .unwrap()
    }

    fn assert_same_answers(a: &TransitDatabase, b: &TransitDatabase) {
        let queries = [
            Query::Bus { name: "1".into() },
            Query::Stop { name: "A".into() },
            Query::Stop { name: "B".into() },
            Query::Route { from: "A".into(), to: "B".into() },
            Query::Route { from: "B".into(), to: "A".into() },
            Query::Map,
        ];
        for query in &queries {
            assert_eq!(a.handler().handle(query), b.handler().handle(query), "{:?}", query);
        }
    }

    #[test]
    fn test_roundtrip_small_database() {
        let original = small_database();
        let restored = TransitDatabase::decode(&original.encode()).unwrap();

        let info = restored.catalogue.bus_info("1").unwrap();
        assert_eq!(info.stop_count, 2);
        assert_eq!(info.unique_stop_count, 2);
        assert_eq!(info.route_length, 100);

        let route = restored.router.build_route("A", "B").unwrap();
        assert_relative_eq!(route.total_time, 6.15, epsilon = 1e-9);

        assert_eq!(restored.catalogue.distance("A", "B").unwrap(), 100);
        assert_eq!(restored.catalogue.distance("B", "A").unwrap(), 100);
        assert_eq!(restored.router.graph().incidence_lists(), original.router.graph().incidence_lists());
        assert_same_answers(&original, &restored);
    }

    #[test]
    fn test_encoding_is_stable() {
        let original = small_database();
        let bytes = original.encode();
        let restored = TransitDatabase::decode(&bytes).unwrap();
        assert_eq!(restored.encode(), bytes);
    }

    #[test]
    fn test_roundtrip_linear_routes() {
        let database = TransitDatabase::build(
            &[
                stop("Tolstopaltsevo", 55.611087, 37.20829, &[("Marushkino", 3900)]),
                stop("Marushkino", 55.595884, 37.209755, &[("Rasskazovka", 9900)]),
                stop("Rasskazovka", 55.632761, 37.333324, &[]),
                stop("Biryulyovo", 55.574371, 37.6517, &[]),
            ],
            &[bus("750", &["Tolstopaltsevo", "Marushkino", "Rasskazovka"], false)],
            RoutingSettings {
                bus_wait_time: 2,
                bus_velocity: 30.0,
            },
            render_settings(),
        )
        .unwrap();

        let restored = TransitDatabase::decode(&database.encode()).unwrap();
        assert_eq!(restored.catalogue.stops().len(), 4);
        assert_eq!(
            restored.router.graph().edge_count(),
            database.router.graph().edge_count()
        );
        assert_eq!(
            restored.handler().handle(&Query::Stop { name: "Biryulyovo".into() }),
            database.handler().handle(&Query::Stop { name: "Biryulyovo".into() })
        );
        assert_same_answers(&database, &restored);
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = std::env::temp_dir().join(format!("transit-snapshot-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("base.db");

        let original = small_database();
        original.save_to(&path).unwrap();
        let restored = TransitDatabase::load_from(&path).unwrap();
        assert_same_answers(&original, &restored);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_missing_file() {
        let err = TransitDatabase::load_from("/nonexistent/transit/base.db").unwrap_err();
        assert!(matches!(err, SnapshotError::Io(_)));
    }

    #[test]
    fn test_truncated_payload() {
        let bytes = small_database().encode();
        let err = TransitDatabase::decode(&bytes[..bytes.len() / 2]).unwrap_err();
        assert!(matches!(err, SnapshotError::Decode(_)));
    }

    fn encode_snapshot(snapshot: &DatabaseSnapshot) -> Vec<u8> {
        wrap_with_header(&bitcode::encode(snapshot))
    }

    #[test]
    fn test_rejects_unknown_stop_id() {
        let mut snapshot = small_database().snapshot();
        snapshot.catalogue.buses[0].stops[1] = 99;
        let err = TransitDatabase::decode(&encode_snapshot(&snapshot)).unwrap_err();
        assert!(matches!(err, SnapshotError::Corrupt(_)));
    }

    #[test]
    fn test_rejects_edge_out_of_range() {
        let mut snapshot = small_database().snapshot();
        snapshot.router.edges[0].to = 1000;
        let err = TransitDatabase::decode(&encode_snapshot(&snapshot)).unwrap_err();
        assert!(matches!(err, SnapshotError::Corrupt(_)));
    }

    #[test]
    fn test_rejects_mismatched_incidence_lists() {
        let mut snapshot = small_database().snapshot();
        snapshot.router.incidence_lists[0].clear();
        let err = TransitDatabase::decode(&encode_snapshot(&snapshot)).unwrap_err();
        assert!(matches!(err, SnapshotError::Corrupt(_)));
    }

    #[test]
    fn test_rejects_unknown_bus_in_router() {
        let mut snapshot = small_database().snapshot();
        let ride = snapshot
            .router
            .edges
            .iter_mut()
            .find(|e| !e.is_wait)
            .unwrap();
        ride.bus = Some("ghost".into());
        let err = TransitDatabase::decode(&encode_snapshot(&snapshot)).unwrap_err();
        assert!(matches!(err, SnapshotError::Corrupt(_)));
    }
}
