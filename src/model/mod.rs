//! Problem data supplied by the surrounding environment.
//!
//! Tasks and vehicles are plain values owned by the caller. The city
//! graph is reached through the [`CityGraph`] trait, so any precomputed
//! shortest-path oracle can back the planner; [`Topology`] is the
//! matrix-based implementation shipped with the crate.

mod graph;
mod task;
mod vehicle;

pub use graph::{CityGraph, Topology};
pub use task::{CityId, Task, TaskId};
pub use vehicle::Vehicle;

pub(crate) use vehicle::largest_vehicle;
