//! Pickup-and-delivery schedule optimization for a capacitated fleet.
//!
//! Provides:
//!
//! - **Schedule**: per-vehicle chains of pickup/delivery actions with
//!   capacity and ordering validation, stored in index-based arenas so
//!   cloning a candidate is one copy per chain.
//! - **Insertion**: cheapest placement of one new task into a frozen
//!   schedule, for marginal-cost bidding.
//! - **Neighborhood**: relocate and reorder moves, enumerated around a
//!   random focus or sampled one at a time.
//! - **Annealing**: time-boxed simulated annealing with restarts from the
//!   best solution, generic over the problem.
//! - **Planner**: full re-planning, seeded re-planning, route translation
//!   and a ledger of committed tasks.
//!
//! # Architecture
//!
//! Distances and paths come from a [`model::CityGraph`] oracle supplied by
//! the caller; [`model::Topology`] is a ready-made all-pairs table. All
//! randomness flows from an explicit seed through `u-numflow`, and elapsed
//! time through an [`anneal::Clock`], so runs can be reproduced exactly.

pub mod anneal;
pub mod cost;
pub mod error;
pub mod insertion;
pub mod model;
pub mod neighborhood;
pub mod planner;
pub mod schedule;

#[cfg(test)]
mod test_support;
