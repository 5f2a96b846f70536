use anyhow::{Context, Result};
use serde_json::{json, Value};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use transit_catalogue::{BusInfo, Info, RouteItem};

const NOT_FOUND: &str = "not found";

/// JSON answer for one stat request
pub fn response(request_id: i64, info: &Info) -> Value {
    match info {
        Info::Bus(bus) => json!({
            "request_id": request_id,
            "curvature": curvature(bus),
            "route_length": bus.route_length,
            "stop_count": bus.stop_count,
            "unique_stop_count": bus.unique_stop_count,
        }),
        Info::Stop(stop) => json!({
            "request_id": request_id,
            "buses": stop.buses.iter().map(|b| b.as_str()).collect::<Vec<_>>(),
        }),
        Info::Route(route) => json!({
            "request_id": request_id,
            "total_time": route.total_time,
            "items": route.items.iter().map(route_item).collect::<Vec<_>>(),
        }),
        Info::Map(svg) => json!({
            "request_id": request_id,
            "map": svg,
        }),
        Info::NotFound => json!({
            "request_id": request_id,
            "error_message": NOT_FOUND,
        }),
    }
}

/// `null` when the bus has no great-circle extent, as JSON has no infinity.
fn curvature(bus: &BusInfo) -> Option<f64> {
    let curvature = bus.curvature();
    if curvature.is_finite() {
        return Some(curvature);
    }
    log::warn!("Bus {} has zero great-circle length, curvature is undefined", bus.name);
    None
}

fn route_item(item: &RouteItem) -> Value {
    match item {
        RouteItem::Wait { stop, time } => json!({
            "type": "Wait",
            "stop_name": stop.as_str(),
            "time": time,
        }),
        RouteItem::Ride {
            bus,
            time,
            span_count,
        } => json!({
            "type": "Bus",
            "bus": bus.as_str(),
            "span_count": span_count,
            "time": time,
        }),
    }
}

/// Write the answers as a pretty-printed JSON array to a file, or to stdout.
pub fn write_responses(responses: &[Value], path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            write_json(responses, BufWriter::new(file))
        }
        None => write_json(responses, std::io::stdout().lock()),
    }
}

fn write_json<W: Write>(responses: &[Value], mut out: W) -> Result<()> {
    serde_json::to_writer_pretty(&mut out, responses).context("Failed to write responses")?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use transit_catalogue::{BusName, RouteInfo, StopInfo, StopName};

    #[test]
    fn test_bus_response() {
        let info = Info::Bus(BusInfo {
            name: BusName::new("256"),
            stop_count: 6,
            unique_stop_count: 5,
            route_length: 5950,
            geo_length: 5950.0 / 1.25,
        });
        let value = response(7, &info);
        assert_eq!(value["request_id"], 7);
        assert_eq!(value["route_length"], 5950);
        assert_eq!(value["stop_count"], 6);
        assert_eq!(value["unique_stop_count"], 5);
        assert_eq!(value["curvature"].as_f64(), Some(1.25));
    }

    #[test]
    fn test_bus_response_without_extent() {
        let info = Info::Bus(BusInfo {
            name: BusName::new("shuttle"),
            stop_count: 2,
            unique_stop_count: 2,
            route_length: 100,
            geo_length: 0.0,
        });
        let value = response(8, &info);
        assert!(value["curvature"].is_null());
        assert_eq!(value["route_length"], 100);
    }

    #[test]
    fn test_stop_response_lists_buses_in_order() {
        let info = Info::Stop(StopInfo {
            name: StopName::new("Universam"),
            buses: ["828", "256"].into_iter().map(BusName::new).collect::<BTreeSet<_>>(),
        });
        assert_eq!(
            response(1, &info),
            json!({ "request_id": 1, "buses": ["256", "828"] })
        );
    }

    #[test]
    fn test_route_response() {
        let info = Info::Route(RouteInfo {
            total_time: 9.5,
            items: vec![
                RouteItem::Wait {
                    stop: StopName::new("A"),
                    time: 6.0,
                },
                RouteItem::Ride {
                    bus: BusName::new("14"),
                    time: 3.5,
                    span_count: 2,
                },
            ],
        });
        assert_eq!(
            response(3, &info),
            json!({
                "request_id": 3,
                "total_time": 9.5,
                "items": [
                    { "type": "Wait", "stop_name": "A", "time": 6.0 },
                    { "type": "Bus", "bus": "14", "span_count": 2, "time": 3.5 },
                ],
            })
        );
    }

    #[test]
    fn test_not_found_response() {
        assert_eq!(
            response(42, &Info::NotFound),
            json!({ "request_id": 42, "error_message": "not found" })
        );
    }

    #[test]
    fn test_write_json_is_an_array() {
        let mut out = Vec::new();
        write_json(&[response(1, &Info::NotFound)], &mut out).unwrap();
        let parsed: Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed.as_array().map(|a| a.len()), Some(1));
    }
}
