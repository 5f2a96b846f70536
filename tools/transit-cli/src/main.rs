use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;
use std::path::PathBuf;
use transit_catalogue::TransitDatabase;

mod requests;
mod responses;

use requests::{parse_base, parse_stat, read_input, BaseDocument, StatDocument};
use responses::{response, write_responses};

#[derive(Parser, Debug)]
#[command(
    name = "transit-cli",
    author,
    version,
    about = "Build a transport catalogue snapshot and answer queries from it",
    long_about = "Two-phase transport catalogue pipeline.\n\n\
                  make_base reads stops, buses, routing and render settings from a JSON \
                  document, builds the catalogue and the route graph and saves them to \
                  the snapshot file named in serialization_settings.\n\n\
                  process_requests loads that snapshot and answers the stat_requests of \
                  a second JSON document with a JSON array."
)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Verbose output (show debug messages)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build the database and write the snapshot file
    #[command(name = "make_base")]
    MakeBase {
        /// Input JSON document (stdin when omitted)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Load the snapshot file and answer stat requests
    #[command(name = "process_requests")]
    ProcessRequests {
        /// Input JSON document (stdin when omitted)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output JSON file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Logs go to stderr; stdout carries the answers only
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if args.verbose { "debug" } else { "info" }),
    )
    .format_timestamp(None)
    .init();

    match args.command {
        Command::MakeBase { input } => {
            let doc = parse_base(&read_input(input.as_deref())?)?;
            make_base(&doc)
        }
        Command::ProcessRequests { input, output } => {
            let doc = parse_stat(&read_input(input.as_deref())?)?;
            let answers = process_requests(&doc)?;
            write_responses(&answers, output.as_deref())
        }
    }
}

fn make_base(doc: &BaseDocument) -> Result<()> {
    let (stops, buses) = doc.records();
    log::info!("Building database from {} stops and {} buses", stops.len(), buses.len());

    let database = TransitDatabase::build(
        &stops,
        &buses,
        doc.routing_settings,
        doc.render_settings.clone(),
    )
    .context("Failed to build the transport catalogue")?;
    log::debug!(
        "Route graph: {} vertices, {} edges",
        database.router.graph().vertex_count(),
        database.router.graph().edge_count()
    );

    let path = &doc.serialization_settings.file;
    database
        .save_to(path)
        .with_context(|| format!("Failed to save snapshot to {}", path.display()))
}

fn process_requests(doc: &StatDocument) -> Result<Vec<Value>> {
    let path = &doc.serialization_settings.file;
    let database = TransitDatabase::load_from(path)
        .with_context(|| format!("Failed to load snapshot from {}", path.display()))?;

    let handler = database.handler();
    let answers = doc
        .stat_requests
        .iter()
        .map(|request| response(request.id, &handler.handle(&request.query)))
        .collect::<Vec<_>>();
    log::info!("Answered {} requests", answers.len());
    Ok(answers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("transit-cli-{}-{}", name, std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn base_json(db: &str) -> String {
        format!(
            r#"{{
                "serialization_settings": {{ "file": {db:?} }},
                "routing_settings": {{ "bus_wait_time": 6, "bus_velocity": 40 }},
                "render_settings": {{
                    "width": 600, "height": 400, "padding": 50,
                    "stop_radius": 5, "line_width": 14,
                    "bus_label_font_size": 20, "bus_label_offset": [7, 15],
                    "stop_label_font_size": 20, "stop_label_offset": [7, -3],
                    "underlayer_color": [255, 255, 255, 0.85], "underlayer_width": 3,
                    "color_palette": ["green", [255, 160, 0], "red"]
                }},
                "base_requests": [
                    {{ "type": "Bus", "name": "297", "stops": ["Biryulyovo Zapadnoye", "Universam"], "is_roundtrip": false }},
                    {{ "type": "Stop", "name": "Biryulyovo Zapadnoye", "latitude": 55.574371, "longitude": 37.6517,
                       "road_distances": {{ "Universam": 2400 }} }},
                    {{ "type": "Stop", "name": "Universam", "latitude": 55.587655, "longitude": 37.645687 }},
                    {{ "type": "Stop", "name": "Prazhskaya", "latitude": 55.611678, "longitude": 37.603831 }}
                ]
            }}"#
        )
    }

    fn stat_json(db: &str) -> String {
        format!(
            r#"{{
                "serialization_settings": {{ "file": {db:?} }},
                "stat_requests": [
                    {{ "id": 1, "type": "Bus", "name": "297" }},
                    {{ "id": 2, "type": "Stop", "name": "Prazhskaya" }},
                    {{ "id": 3, "type": "Route", "from": "Biryulyovo Zapadnoye", "to": "Universam" }},
                    {{ "id": 4, "type": "Bus", "name": "751" }},
                    {{ "id": 5, "type": "Map" }}
                ]
            }}"#
        )
    }

    #[test]
    fn test_make_base_then_process_requests() {
        let dir = scratch_dir("pipeline");
        let db = dir.join("base.db");
        let db = db.to_str().unwrap();

        make_base(&parse_base(&base_json(db)).unwrap()).unwrap();
        let answers = process_requests(&parse_stat(&stat_json(db)).unwrap()).unwrap();
        assert_eq!(answers.len(), 5);

        assert_eq!(answers[0]["request_id"], 1);
        assert_eq!(answers[0]["stop_count"], 3);
        assert_eq!(answers[0]["unique_stop_count"], 2);
        assert_eq!(answers[0]["route_length"], 4800);

        assert_eq!(answers[1]["buses"], serde_json::json!([]));

        let total = answers[2]["total_time"].as_f64().unwrap();
        assert!((total - 9.6).abs() < 1e-9);
        assert_eq!(answers[2]["items"][0]["type"], "Wait");
        assert_eq!(answers[2]["items"][1]["bus"], "297");

        assert_eq!(answers[3]["error_message"], "not found");

        let map = answers[4]["map"].as_str().unwrap();
        assert!(map.starts_with("<?xml"));
        assert!(map.contains("Universam"));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_process_requests_without_snapshot() {
        let dir = scratch_dir("missing");
        let db = dir.join("absent.db");
        let err = process_requests(&parse_stat(&stat_json(db.to_str().unwrap())).unwrap()).unwrap_err();
        assert!(err.to_string().contains("Failed to load snapshot"));
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_make_base_rejects_unknown_stop() {
        let dir = scratch_dir("unknown-stop");
        let db = dir.join("base.db");
        let mut doc = parse_base(&base_json(db.to_str().unwrap())).unwrap();
        doc.base_requests.push(requests::BaseRequest::Bus(transit_catalogue::BusRecord {
            name: "9".into(),
            stops: vec!["Universam".into(), "Nowhere".into()],
            is_roundtrip: false,
        }));
        assert!(make_base(&doc).is_err());
        assert!(!db.exists());
        fs::remove_dir_all(&dir).unwrap();
    }
}
