//! The exploration run: configuration, the state machine, and route output.

pub mod config;
pub mod explorer;
pub mod sink;

pub use config::{ConfigError, ExplorerConfig, METERS_PER_MILE};
pub use explorer::{ExplorationEvent, ExplorationState, ExplorationSummary, Explorer};
pub use sink::{JsonLinesSink, PlannedRoute, RouteSink, VecSink};
