//! The exploration loop as an explicit state machine.
//!
//! ```text
//!             Found                      commit + emit
//!  Searching ───────▶ Advancing ───────────────────────▶ Searching
//!      │
//!      │ NoRoute
//!      ▼            node found
//!  Relocating ───────────────────▶ Searching
//!      │
//!      │ no candidate
//!      ▼
//!    Done
//! ```
//!
//! Each call to [`Explorer::step`] performs exactly one transition. There is
//! no route limit inside the machine: it stops only when relocation finds no
//! mostly-unexplored node. Callers that want fewer routes stop stepping.

use std::fmt;

use anyhow::Result;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::config::{ConfigError, ExplorerConfig};
use super::sink::{PlannedRoute, RouteSink};
use crate::graph::{GraphError, RoadNetwork};
use crate::ledger::{CoverageStats, EdgeLedger};
use crate::planner::{find_route, pick_unexplored_node, RouteSearch, Walk};

/// Named states of the exploration loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExplorationState {
    /// Looking for a route around the current node.
    Searching,
    /// A route was found and is about to be committed.
    Advancing,
    /// No route fits around the current node; looking for a new start.
    Relocating,
    /// Nothing left to explore.
    Done,
}

impl fmt::Display for ExplorationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Searching => "searching",
            Self::Advancing => "advancing",
            Self::Relocating => "relocating",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

/// What a single [`Explorer::step`] did.
#[derive(Debug, Clone, PartialEq)]
pub enum ExplorationEvent {
    /// Searching → Advancing.
    RouteFound {
        /// Node the route starts at.
        from: usize,
        /// Neighborhood radius the route was found in.
        radius: f64,
        /// Route length in metres.
        length: f64,
    },
    /// Advancing → Searching: the route was committed and emitted.
    RouteCommitted {
        /// 1-based route number.
        index: usize,
        /// New current node (the route's last node).
        end: usize,
        /// Edges added to the ledger.
        new_edges: usize,
    },
    /// Searching → Relocating.
    Stuck {
        /// Node no route could be found around.
        node: usize,
    },
    /// Relocating → Searching.
    Relocated {
        /// Previous current node.
        from: usize,
        /// New current node.
        to: usize,
    },
    /// Relocating → Done, or any step taken once done.
    Finished,
}

/// Totals for a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExplorationSummary {
    /// Routes committed.
    pub routes: usize,
    /// Relocations performed.
    pub relocations: usize,
    /// Ledger coverage of the full graph.
    pub coverage: CoverageStats,
    /// `true` if the explorer reached [`ExplorationState::Done`].
    pub finished: bool,
}

/// Drives repeated route planning over one graph.
///
/// The explorer owns the ledger, the current node and the random source; the
/// planners it calls only read them.
pub struct Explorer<'g, G: ?Sized, R = ChaCha8Rng> {
    graph: &'g G,
    config: ExplorerConfig,
    ledger: EdgeLedger,
    current: Option<usize>,
    state: ExplorationState,
    pending: Option<(Walk, f64)>,
    route_count: usize,
    relocations: usize,
    rng: R,
}

impl<'g, G: RoadNetwork + ?Sized> Explorer<'g, G, ChaCha8Rng> {
    /// Creates an explorer seeded from `config.seed`, or from OS entropy when
    /// no seed is set. The start node is drawn uniformly from the graph.
    pub fn new(graph: &'g G, config: ExplorerConfig) -> Result<Self, ConfigError> {
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self::with_rng(graph, config, rng)
    }
}

impl<'g, G: RoadNetwork + ?Sized, R: Rng> Explorer<'g, G, R> {
    /// Creates an explorer with an explicit random source.
    pub fn with_rng(graph: &'g G, config: ExplorerConfig, mut rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        let current = graph.nodes().choose(&mut rng).copied();
        let state = if current.is_some() {
            ExplorationState::Searching
        } else {
            ExplorationState::Done
        };
        Ok(Self {
            graph,
            config,
            ledger: EdgeLedger::new(),
            current,
            state,
            pending: None,
            route_count: 0,
            relocations: 0,
            rng,
        })
    }

    /// Moves the current node to `node` and resumes searching.
    pub fn start_at(mut self, node: usize) -> Result<Self, GraphError> {
        if !self.graph.contains(node) {
            return Err(GraphError::NodeOutOfBounds {
                index: node,
                count: self.graph.node_count(),
            });
        }
        self.current = Some(node);
        self.pending = None;
        self.state = ExplorationState::Searching;
        Ok(self)
    }

    /// Returns the current state.
    pub fn state(&self) -> ExplorationState {
        self.state
    }

    /// Returns the current node, or `None` for an empty graph.
    pub fn current(&self) -> Option<usize> {
        self.current
    }

    /// Returns the edges traversed so far.
    pub fn ledger(&self) -> &EdgeLedger {
        &self.ledger
    }

    /// Returns the number of committed routes.
    pub fn route_count(&self) -> usize {
        self.route_count
    }

    /// Returns the configuration in use.
    pub fn config(&self) -> &ExplorerConfig {
        &self.config
    }

    /// Returns `true` once the explorer has reached [`ExplorationState::Done`].
    pub fn is_done(&self) -> bool {
        self.state == ExplorationState::Done
    }

    /// Performs one state transition.
    ///
    /// Only a failing sink produces an error. The route is committed to the
    /// ledger before it is emitted, so exploration state survives the error.
    pub fn step<S: RouteSink + ?Sized>(&mut self, sink: &mut S) -> Result<ExplorationEvent> {
        match self.state {
            ExplorationState::Searching => Ok(self.search()),
            ExplorationState::Advancing => self.advance(sink),
            ExplorationState::Relocating => Ok(self.relocate()),
            ExplorationState::Done => Ok(ExplorationEvent::Finished),
        }
    }

    /// Steps until [`ExplorationState::Done`].
    ///
    /// On a graph where routes can always be found this never returns; use
    /// [`run_routes`](Self::run_routes) to bound the run.
    pub fn run<S: RouteSink + ?Sized>(&mut self, sink: &mut S) -> Result<ExplorationSummary> {
        while !self.is_done() {
            self.step(sink)?;
        }
        Ok(self.summary())
    }

    /// Steps until [`ExplorationState::Done`] or until `max_routes` routes
    /// have been committed in total.
    pub fn run_routes<S: RouteSink + ?Sized>(
        &mut self,
        sink: &mut S,
        max_routes: usize,
    ) -> Result<ExplorationSummary> {
        while !self.is_done() && self.route_count < max_routes {
            self.step(sink)?;
        }
        Ok(self.summary())
    }

    /// Returns totals for the run so far.
    pub fn summary(&self) -> ExplorationSummary {
        ExplorationSummary {
            routes: self.route_count,
            relocations: self.relocations,
            coverage: self.ledger.coverage(self.graph),
            finished: self.is_done(),
        }
    }

    fn search(&mut self) -> ExplorationEvent {
        let Some(node) = self.current else {
            self.state = ExplorationState::Done;
            return ExplorationEvent::Finished;
        };

        let search = find_route(
            self.graph,
            node,
            &self.ledger,
            &self.config.radius_schedule(),
            &self.config.walk_params(),
            &mut self.rng,
        );

        match search {
            RouteSearch::Found { walk, radius } => {
                let length = walk.length();
                self.pending = Some((walk, radius));
                self.state = ExplorationState::Advancing;
                ExplorationEvent::RouteFound {
                    from: node,
                    radius,
                    length,
                }
            }
            RouteSearch::NoRoute => {
                info!(node, "stuck, looking for an unexplored start node");
                self.state = ExplorationState::Relocating;
                ExplorationEvent::Stuck { node }
            }
        }
    }

    fn advance<S: RouteSink + ?Sized>(&mut self, sink: &mut S) -> Result<ExplorationEvent> {
        let Some((walk, radius)) = self.pending.take() else {
            // Only reachable through a search that stored a walk.
            self.state = ExplorationState::Searching;
            return Ok(self.search());
        };

        let new_edges = self.ledger.commit(walk.edges().iter().copied());
        self.route_count += 1;
        let end = walk.end();
        self.current = Some(end);
        self.state = ExplorationState::Searching;

        let route = self.planned_route(&walk, radius, new_edges);
        info!(
            index = route.index,
            miles = route.length_miles(),
            new_edges,
            ledger = self.ledger.len(),
            "route committed"
        );

        if let Err(err) = sink.emit(&route) {
            warn!(index = route.index, error = %err, "route sink failed");
            return Err(err);
        }

        Ok(ExplorationEvent::RouteCommitted {
            index: route.index,
            end,
            new_edges,
        })
    }

    fn relocate(&mut self) -> ExplorationEvent {
        let picked = pick_unexplored_node(
            self.graph,
            &self.ledger,
            self.config.selector_tries,
            self.config.unexplored_threshold,
            &mut self.rng,
        );

        match (picked, self.current) {
            (Some(to), Some(from)) => {
                debug!(from, to, "relocated");
                self.current = Some(to);
                self.relocations += 1;
                self.state = ExplorationState::Searching;
                ExplorationEvent::Relocated { from, to }
            }
            _ => {
                info!(
                    routes = self.route_count,
                    edges = self.ledger.len(),
                    "no unexplored area left, exploration complete"
                );
                self.state = ExplorationState::Done;
                ExplorationEvent::Finished
            }
        }
    }

    fn planned_route(&self, walk: &Walk, radius: f64, new_edges: usize) -> PlannedRoute {
        let nodes = walk.nodes().to_vec();
        PlannedRoute {
            index: self.route_count,
            external_ids: nodes.iter().map(|&n| self.graph.external_id(n)).collect(),
            coordinates: nodes.iter().map(|&n| self.graph.coordinate(n)).collect(),
            nodes,
            length_m: walk.length(),
            radius_m: radius,
            new_edges,
        }
    }
}
