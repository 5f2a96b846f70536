//! Schematic SVG map of every bus line.

use std::collections::BTreeMap;

use crate::catalogue::TransportCatalogue;
use crate::models::types::{Bus, Stop};

use super::projector::SphereProjector;
use super::svg::*;

const FONT_FAMILY: &str = "Verdana";

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(bitcode::Encode, bitcode::Decode)]
pub struct RenderSettings {
    pub width: f64,
    pub height: f64,
    pub padding: f64,
    pub line_width: f64,
    pub stop_radius: f64,

    pub bus_label_font_size: u32,
    pub bus_label_offset: Point,

    pub stop_label_font_size: u32,
    pub stop_label_offset: Point,

    pub underlayer_color: Color,
    pub underlayer_width: f64,

    pub color_palette: Vec<Color>,
}

#[derive(Clone, Debug)]
pub struct MapRenderer {
    settings: RenderSettings,
}

impl MapRenderer {
    pub fn new(settings: RenderSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    pub fn render(&self, catalogue: &TransportCatalogue) -> String {
        self.build_document(catalogue).render()
    }

    /// Layers, bottom to top: route lines, bus labels, stop circles, stop
    /// labels. Buses and stops are drawn in name order; stops no bus visits
    /// are left out.
    pub fn build_document(&self, catalogue: &TransportCatalogue) -> Document {
        let mut buses: Vec<&Bus> = catalogue
            .buses()
            .iter()
            .filter(|bus| !bus.stops.is_empty())
            .collect();
        buses.sort_by(|a, b| a.name.cmp(&b.name));

        let stops: BTreeMap<&str, &Stop> = buses
            .iter()
            .flat_map(|bus| catalogue.bus_stops(bus))
            .map(|stop| (stop.name.as_str(), stop))
            .collect();

        let s = &self.settings;
        let projector = SphereProjector::new(
            stops.values().map(|stop| stop.location),
            s.width,
            s.height,
            s.padding,
        );

        let mut doc = Document::new();

        for (i, bus) in buses.iter().enumerate() {
            let line = Polyline::new()
                .points(catalogue.bus_stops(bus).map(|stop| projector.project(stop.location)))
                .fill(Color::None)
                .stroke(self.palette_color(i))
                .stroke_width(s.line_width)
                .line_cap(StrokeLineCap::Round)
                .line_join(StrokeLineJoin::Round);
            doc.add(line);
        }

        for (i, bus) in buses.iter().enumerate() {
            let (first, turnaround) = bus.terminals();
            for stop in [first, turnaround]
                .into_iter()
                .flatten()
                .filter_map(|id| catalogue.stop_by_id(id))
            {
                let label = Text::new(bus.name.as_str())
                    .position(projector.project(stop.location))
                    .offset(s.bus_label_offset)
                    .font_size(s.bus_label_font_size)
                    .font_family(FONT_FAMILY)
                    .font_weight("bold");
                doc.add(self.underlayer(label.clone()));
                doc.add(label.fill(self.palette_color(i)));
            }
        }

        for stop in stops.values() {
            doc.add(
                Circle::new(projector.project(stop.location), s.stop_radius)
                    .fill(Color::named("white")),
            );
        }

        for stop in stops.values() {
            let label = Text::new(stop.name.as_str())
                .position(projector.project(stop.location))
                .offset(s.stop_label_offset)
                .font_size(s.stop_label_font_size)
                .font_family(FONT_FAMILY);
            doc.add(self.underlayer(label.clone()));
            doc.add(label.fill(Color::named("black")));
        }

        doc
    }

    fn palette_color(&self, index: usize) -> Color {
        let palette = &self.settings.color_palette;
        if palette.is_empty() {
            return Color::None;
        }
        palette[index % palette.len()].clone()
    }

    fn underlayer(&self, text: Text) -> Text {
        text.fill(self.settings.underlayer_color.clone())
            .stroke(self.settings.underlayer_color.clone())
            .stroke_width(self.settings.underlayer_width)
            .line_cap(StrokeLineCap::Round)
            .line_join(StrokeLineJoin::Round)
    }
}
