//! Planning entry points.
//!
//! - [`CentralizedPlanner`] plans a whole task set with the annealer and
//!   turns the result into per-vehicle routes.
//! - [`TaskLedger`] keeps the schedule of tasks already won and quotes the
//!   marginal cost of new ones for bidding.

mod centralized;
mod ledger;
mod report;
mod route;
mod search;

pub use centralized::{CentralizedPlanner, PlanOutcome};
pub use ledger::{Quote, TaskLedger};
pub use report::PlanReport;
pub use route::{build_routes, RouteStep, VehicleRoute};
pub use search::ScheduleSearch;
