//! Query dispatch over a built database.

use crate::catalogue::TransportCatalogue;
use crate::models::info::{BusInfo, RouteInfo, StopInfo};
use crate::models::types::{Result, TransitError};
use crate::render::MapRenderer;
use crate::router::TransportRouter;

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type"))]
pub enum Query {
    Bus { name: String },
    Stop { name: String },
    Route { from: String, to: String },
    Map,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Info {
    Bus(BusInfo),
    Stop(StopInfo),
    Route(RouteInfo),
    /// Rendered SVG document
    Map(String),
    NotFound,
}

/// Read-only view answering [`Query`] values. Never fails: unknown names and
/// unreachable destinations come back as [`Info::NotFound`].
#[derive(Clone, Copy, Debug)]
pub struct RequestHandler<'a> {
    catalogue: &'a TransportCatalogue,
    router: &'a TransportRouter,
    renderer: &'a MapRenderer,
}

impl<'a> RequestHandler<'a> {
    pub fn new(
        catalogue: &'a TransportCatalogue,
        router: &'a TransportRouter,
        renderer: &'a MapRenderer,
    ) -> Self {
        Self {
            catalogue,
            router,
            renderer,
        }
    }

    pub fn handle(&self, query: &Query) -> Info {
        let answer: Result<Info> = match query {
            Query::Bus { name } => self.catalogue.bus_info(name).map(Info::Bus),
            Query::Stop { name } => self.catalogue.stop_info(name).map(Info::Stop),
            Query::Route { from, to } => self.router.build_route(from, to).map(Info::Route),
            Query::Map => Ok(Info::Map(self.renderer.render(self.catalogue))),
        };
        answer.unwrap_or_else(|err| not_found(query, err))
    }

    pub fn handle_all<'q, I>(&self, queries: I) -> Vec<Info>
    where
        I: IntoIterator<Item = &'q Query>,
    {
        queries.into_iter().map(|q| self.handle(q)).collect()
    }
}

fn not_found(query: &Query, err: TransitError) -> Info {
    if err.is_not_found() {
        log::debug!("{:?}: {}", query, err);
    } else {
        log::warn!("{:?} failed: {}", query, err);
    }
    Info::NotFound
}
