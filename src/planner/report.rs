//! Plan summary figures.

use std::fmt;

use super::route::VehicleRoute;
use crate::schedule::Schedule;

/// Reward, distance and cost of a finished plan.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlanReport {
    pub tasks: usize,
    pub reward: f64,
    pub total_distance: f64,
    pub total_cost: f64,
    /// Reward minus cost.
    pub profit: f64,
    /// Largest single-route cost.
    pub max_route_cost: f64,
}

impl PlanReport {
    pub fn new(schedule: &Schedule, routes: &[VehicleRoute]) -> Self {
        let reward: f64 = schedule.tasks().iter().map(|t| t.reward).sum();
        let total_distance: f64 = routes.iter().map(|r| r.total_distance).sum();
        let total_cost: f64 = routes.iter().map(|r| r.cost).sum();
        Self {
            tasks: schedule.task_count(),
            reward,
            total_distance,
            total_cost,
            profit: reward - total_cost,
            max_route_cost: routes.iter().map(|r| r.cost).fold(0.0, f64::max),
        }
    }
}

impl fmt::Display for PlanReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} tasks, reward {:.2}, distance {:.2}, cost {:.2}, profit {:.2}",
            self.tasks, self.reward, self.total_distance, self.total_cost, self.profit
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Task, Vehicle};
    use crate::planner::build_routes;
    use crate::test_support::line_topology;
    use std::sync::Arc;

    #[test]
    fn test_report_profit() {
        let graph = line_topology(6);
        let vehicles = vec![Vehicle::new(0, 10, 0, 3.0)];
        let tasks = vec![
            Arc::new(Task::new(0, 1, 3, 2).with_reward(20.0)),
            Arc::new(Task::new(1, 3, 5, 2).with_reward(15.0)),
        ];
        let schedule = Schedule::largest_vehicle_first(&vehicles, &tasks).expect("feasible");
        let routes = build_routes(&schedule, &vehicles, &graph);

        let report = PlanReport::new(&schedule, &routes);
        assert_eq!(report.tasks, 2);
        assert!((report.reward - 35.0).abs() < 1e-10);
        assert!((report.total_distance - 5.0).abs() < 1e-10);
        assert!((report.total_cost - 15.0).abs() < 1e-10);
        assert!((report.profit - 20.0).abs() < 1e-10);
        assert!(report.to_string().starts_with("2 tasks"));
    }
}
