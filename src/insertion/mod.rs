//! Cheapest insertion of one new task into a committed schedule.
//!
//! Used for marginal-cost bidding: the committed schedule is treated as
//! frozen, every feasible pickup/delivery slot pair on every vehicle is
//! tried on a clone, and the cheapest result is handed back to the caller
//! as an explicit candidate. Nothing is committed here.

mod config;
mod evaluator;

pub use config::{InsertionConfig, SlotBound};
pub use evaluator::{InsertionEvaluator, InsertionOutcome, InsertionSlot};
