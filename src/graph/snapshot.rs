//! JSON snapshots of road graphs.
//!
//! Downloading and simplifying map data is left to external tooling; this
//! module reads the result of that tooling in a small, explicit format:
//!
//! ```json
//! {
//!   "nodes": [{ "id": 65281, "lat": 37.33, "lon": -121.89 }],
//!   "edges": [{ "from": 65281, "to": 65290, "length": 112.4 }]
//! }
//! ```
//!
//! `lat`/`lon` are optional. Edges are undirected.

use std::fs;
use std::io::{Read, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::road_graph::{Coordinate, RoadGraph};
use super::traits::RoadNetwork;

/// Serialized form of a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSnapshot {
    /// External node id.
    pub id: u64,
    /// Latitude, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    /// Longitude, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lon: Option<f64>,
}

/// Serialized form of an edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeSnapshot {
    /// External id of one endpoint.
    pub from: u64,
    /// External id of the other endpoint.
    pub to: u64,
    /// Edge length in metres.
    pub length: f64,
}

/// Serialized form of a whole graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    /// All nodes.
    pub nodes: Vec<NodeSnapshot>,
    /// All undirected edges.
    pub edges: Vec<EdgeSnapshot>,
}

impl GraphSnapshot {
    /// Captures a graph.
    pub fn from_graph(graph: &RoadGraph) -> Self {
        let nodes = (0..graph.node_count())
            .map(|n| {
                let coord = graph.coordinate(n);
                NodeSnapshot {
                    id: graph.external_id(n),
                    lat: coord.map(|c| c.lat),
                    lon: coord.map(|c| c.lon),
                }
            })
            .collect();
        let edges = graph
            .edges()
            .map(|(a, b, length)| EdgeSnapshot {
                from: graph.external_id(a),
                to: graph.external_id(b),
                length,
            })
            .collect();
        Self { nodes, edges }
    }

    /// Builds the graph described by this snapshot.
    pub fn into_graph(self) -> Result<RoadGraph> {
        let mut builder = RoadGraph::builder();
        for (i, node) in self.nodes.into_iter().enumerate() {
            let coordinate = match (node.lat, node.lon) {
                (Some(lat), Some(lon)) => Some(Coordinate::new(lat, lon)),
                _ => None,
            };
            builder
                .add_node(node.id, coordinate)
                .with_context(|| format!("invalid node #{i}"))?;
        }
        for (i, edge) in self.edges.into_iter().enumerate() {
            builder
                .add_edge(edge.from, edge.to, edge.length)
                .with_context(|| format!("invalid edge #{i}"))?;
        }
        Ok(builder.build())
    }
}

/// Parses a graph from a JSON string.
pub fn from_json_str(json: &str) -> Result<RoadGraph> {
    let snapshot: GraphSnapshot =
        serde_json::from_str(json).context("failed to parse graph snapshot")?;
    snapshot.into_graph()
}

/// Reads a graph from any JSON reader.
pub fn from_reader<R: Read>(reader: R) -> Result<RoadGraph> {
    let snapshot: GraphSnapshot =
        serde_json::from_reader(reader).context("failed to parse graph snapshot")?;
    snapshot.into_graph()
}

/// Loads a graph from a JSON file.
pub fn load(path: impl AsRef<Path>) -> Result<RoadGraph> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read graph snapshot {}", path.display()))?;
    let graph = from_json_str(&content)
        .with_context(|| format!("failed to load graph snapshot {}", path.display()))?;
    info!(
        path = %path.display(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "loaded road graph"
    );
    Ok(graph)
}

/// Writes a graph as JSON.
pub fn to_writer<W: Write>(graph: &RoadGraph, writer: W) -> Result<()> {
    serde_json::to_writer(writer, &GraphSnapshot::from_graph(graph))
        .context("failed to write graph snapshot")
}

/// Saves a graph to a JSON file.
pub fn save(graph: &RoadGraph, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let json = serde_json::to_string_pretty(&GraphSnapshot::from_graph(graph))
        .context("failed to serialize graph snapshot")?;
    fs::write(path, json)
        .with_context(|| format!("failed to write graph snapshot {}", path.display()))
}
