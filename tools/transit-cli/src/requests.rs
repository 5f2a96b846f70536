use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use transit_catalogue::{BusRecord, Query, RenderSettings, RoutingSettings, StopRecord};

#[derive(Debug, Deserialize)]
pub struct SerializationSettings {
    pub file: PathBuf,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
pub enum BaseRequest {
    Stop(StopRecord),
    Bus(BusRecord),
}

/// Input of the `make_base` phase
#[derive(Debug, Deserialize)]
pub struct BaseDocument {
    pub serialization_settings: SerializationSettings,
    pub routing_settings: RoutingSettings,
    pub render_settings: RenderSettings,
    #[serde(default)]
    pub base_requests: Vec<BaseRequest>,
}

impl BaseDocument {
    /// Split the mixed request list into stop and bus records, keeping input order.
    pub fn records(&self) -> (Vec<StopRecord>, Vec<BusRecord>) {
        let mut stops = Vec::new();
        let mut buses = Vec::new();
        for request in &self.base_requests {
            match request {
                BaseRequest::Stop(stop) => stops.push(stop.clone()),
                BaseRequest::Bus(bus) => buses.push(bus.clone()),
            }
        }
        (stops, buses)
    }
}

#[derive(Debug, Deserialize)]
pub struct StatRequest {
    pub id: i64,
    #[serde(flatten)]
    pub query: Query,
}

/// Input of the `process_requests` phase
#[derive(Debug, Deserialize)]
pub struct StatDocument {
    pub serialization_settings: SerializationSettings,
    #[serde(default)]
    pub stat_requests: Vec<StatRequest>,
}

/// Read the whole input from a file, or from stdin when no path is given.
pub fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read stdin")?;
            Ok(text)
        }
    }
}

pub fn parse_base(text: &str) -> Result<BaseDocument> {
    serde_json::from_str(text).context("Invalid make_base document")
}

pub fn parse_stat(text: &str) -> Result<StatDocument> {
    serde_json::from_str(text).context("Invalid process_requests document")
}
