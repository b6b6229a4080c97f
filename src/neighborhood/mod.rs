//! Neighbor generation for the schedule search.
//!
//! Two move families:
//!
//! - **Relocate**: take the first task of one vehicle and put its pickup
//!   and delivery at the head of another vehicle's chain.
//! - **Reorder**: move one task's pickup and delivery to new positions
//!   within its own chain.
//!
//! Moves run on clones and are re-validated; infeasible results are
//! dropped, never raised as errors.

mod config;
mod generator;
mod moves;

pub use config::NeighborhoodConfig;
pub use generator::NeighborhoodGenerator;
pub use moves::{relocate_first_task, reorder_task, MoveOutcome};
