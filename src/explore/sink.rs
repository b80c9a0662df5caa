//! Destinations for accepted routes.
//!
//! The explorer hands every accepted route to a [`RouteSink`]. Turning a route
//! into a track file is up to the sink; the ones here keep routes in memory or
//! write one JSON object per line.

use std::io::Write;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::graph::Coordinate;

/// A route ready to be persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedRoute {
    /// 1-based position of this route in the run.
    pub index: usize,
    /// Node indices in travel order.
    pub nodes: Vec<usize>,
    /// External ids of `nodes`, in the same order.
    pub external_ids: Vec<u64>,
    /// Position of each node, `None` where the graph has no coordinate.
    pub coordinates: Vec<Option<Coordinate>>,
    /// Total length in metres.
    pub length_m: f64,
    /// Radius of the neighborhood the route was planned in.
    pub radius_m: f64,
    /// Edges this route added to the ledger.
    pub new_edges: usize,
}

impl PlannedRoute {
    /// Returns the length in miles.
    pub fn length_miles(&self) -> f64 {
        self.length_m / super::config::METERS_PER_MILE
    }

    /// Returns the coordinates that are known, in travel order.
    pub fn track(&self) -> Vec<Coordinate> {
        self.coordinates.iter().flatten().copied().collect()
    }
}

/// Receives accepted routes.
pub trait RouteSink {
    /// Consumes one route.
    fn emit(&mut self, route: &PlannedRoute) -> Result<()>;
}

impl<F> RouteSink for F
where
    F: FnMut(&PlannedRoute) -> Result<()>,
{
    fn emit(&mut self, route: &PlannedRoute) -> Result<()> {
        self(route)
    }
}

/// Keeps every route in memory.
#[derive(Debug, Default, Clone)]
pub struct VecSink {
    routes: Vec<PlannedRoute>,
}

impl VecSink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the routes received so far.
    pub fn routes(&self) -> &[PlannedRoute] {
        &self.routes
    }

    /// Consumes the sink, returning its routes.
    pub fn into_routes(self) -> Vec<PlannedRoute> {
        self.routes
    }
}

impl RouteSink for VecSink {
    fn emit(&mut self, route: &PlannedRoute) -> Result<()> {
        self.routes.push(route.clone());
        Ok(())
    }
}

/// Writes each route as a single line of JSON.
#[derive(Debug)]
pub struct JsonLinesSink<W> {
    writer: W,
}

impl<W: Write> JsonLinesSink<W> {
    /// Wraps a writer.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Flushes and returns the writer.
    pub fn into_inner(mut self) -> Result<W> {
        self.writer.flush().context("failed to flush route output")?;
        Ok(self.writer)
    }
}

impl<W: Write> RouteSink for JsonLinesSink<W> {
    fn emit(&mut self, route: &PlannedRoute) -> Result<()> {
        serde_json::to_writer(&mut self.writer, route)
            .with_context(|| format!("failed to serialize route {}", route.index))?;
        self.writer
            .write_all(b"\n")
            .with_context(|| format!("failed to write route {}", route.index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route(index: usize) -> PlannedRoute {
        PlannedRoute {
            index,
            nodes: vec![0, 1],
            external_ids: vec![10, 11],
            coordinates: vec![Some(Coordinate::new(1.0, 2.0)), None],
            length_m: 3218.0,
            radius_m: 2500.0,
            new_edges: 1,
        }
    }

    #[test]
    fn planned_route_helpers() {
        let r = route(1);
        assert!((r.length_miles() - 2.0).abs() < 1e-12);
        assert_eq!(r.track(), vec![Coordinate::new(1.0, 2.0)]);
    }

    #[test]
    fn json_lines_sink_writes_one_line_per_route() {
        let mut sink = JsonLinesSink::new(Vec::new());
        sink.emit(&route(1)).unwrap();
        sink.emit(&route(2)).unwrap();
        let bytes = sink.into_inner().unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        let back: PlannedRoute = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(back, route(2));
    }

    #[test]
    fn closures_are_sinks() {
        let mut seen = Vec::new();
        {
            let mut sink = |r: &PlannedRoute| -> Result<()> {
                seen.push(r.index);
                Ok(())
            };
            sink.emit(&route(4)).unwrap();
        }
        assert_eq!(seen, vec![4]);
    }

    #[test]
    fn vec_sink_collects() {
        let mut sink = VecSink::new();
        sink.emit(&route(1)).unwrap();
        assert_eq!(sink.routes().len(), 1);
        assert_eq!(sink.into_routes()[0].index, 1);
    }
}
