//! Per-vehicle action chains and the schedule set built from them.
//!
//! An [`ActionChain`] is an arena-backed doubly linked list of pickup and
//! delivery [`Action`]s behind a sentinel head. A [`Schedule`] holds one
//! chain per vehicle. Feasibility means:
//!
//! - every task in a chain has exactly one pickup and one delivery, pickup first;
//! - the load never exceeds the vehicle capacity;
//! - the load after the last action is zero;
//! - positions are contiguous from 1 after the sentinel.
//!
//! Mutators never reject an infeasible result themselves; they report it
//! through [`ActionChain::recompute_and_validate`] and the caller discards it.

mod action;
mod chain;
mod set;

pub use action::{Action, ActionKind};
pub use chain::{ActionChain, ActionNode, Iter, NodeId};
pub use set::Schedule;

pub use crate::error::ScheduleViolation;
