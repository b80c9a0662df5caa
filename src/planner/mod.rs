//! Route planning algorithms.
//!
//! Planning is split into three independent pieces, leaves first:
//! - `walk`: one constrained random walk inside a given (sub)graph
//! - `radius`: widening neighborhoods around a node until a walk fits
//! - `selector`: picking a mostly unexplored node to restart from
//!
//! None of these mutate the [`EdgeLedger`](crate::EdgeLedger); they read it to
//! steer toward new roads and leave committing to the caller.

pub mod radius;
pub mod selector;
pub mod walk;

pub use radius::{find_route, RadiusSchedule, RouteSearch};
pub use selector::{pick_unexplored_node, unexplored_fraction, DEFAULT_UNEXPLORED_THRESHOLD};
pub use walk::{attempt_walk, prioritize_neighbors, Walk, WalkFailure, WalkParams};
