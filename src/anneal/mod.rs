//! Time-boxed simulated annealing.
//!
//! A single-solution stochastic local search whose temperature and move
//! mix are driven by elapsed time rather than an iteration count, with
//! periodic restarts from the best solution found so far.
//!
//! # References
//!
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"

mod clock;
mod config;
mod runner;
mod types;

pub use clock::{Clock, StepClock, WallClock};
pub use config::AnnealConfig;
pub use runner::{AnnealResult, Annealer};
pub use types::AnnealingProblem;
