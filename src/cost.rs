//! Monetary cost of a schedule.

use crate::model::{CityGraph, Vehicle};
use crate::schedule::Schedule;

/// Per-vehicle and aggregate cost figures.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CostBreakdown {
    /// Sum of all vehicle costs.
    pub total: f64,
    /// Largest single-vehicle cost.
    pub max_vehicle: f64,
    /// Cost of each vehicle, by schedule index.
    pub per_vehicle: Vec<f64>,
}

/// Prices schedules for one fleet on one city graph.
///
/// The cost of a vehicle is the distance from its home city through each
/// action city in order, times its cost per distance. Vehicles do not
/// return home.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use u_pdp::cost::CostModel;
/// use u_pdp::model::{Task, Topology, Vehicle};
/// use u_pdp::schedule::Schedule;
///
/// let graph = Topology::from_edges(3, &[(0, 1, 2.0), (1, 2, 2.0)]).unwrap();
/// let vehicles = vec![Vehicle::new(0, 10, 0, 3.0)];
/// let tasks = vec![Arc::new(Task::new(0, 1, 2, 1))];
/// let schedule = Schedule::largest_vehicle_first(&vehicles, &tasks).unwrap();
///
/// let costs = CostModel::new(&vehicles, &graph);
/// assert!((costs.total(&schedule) - 12.0).abs() < 1e-10);
/// ```
#[derive(Debug)]
pub struct CostModel<'a, G> {
    vehicles: &'a [Vehicle],
    graph: &'a G,
}

impl<G> Clone for CostModel<'_, G> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<G> Copy for CostModel<'_, G> {}

impl<'a, G: CityGraph> CostModel<'a, G> {
    pub fn new(vehicles: &'a [Vehicle], graph: &'a G) -> Self {
        Self { vehicles, graph }
    }

    pub fn vehicles(&self) -> &'a [Vehicle] {
        self.vehicles
    }

    pub fn graph(&self) -> &'a G {
        self.graph
    }

    /// Cost of one vehicle's chain.
    pub fn vehicle_cost(&self, schedule: &Schedule, vehicle: usize) -> f64 {
        match (schedule.chain(vehicle), self.vehicles.get(vehicle)) {
            (Some(chain), Some(v)) => chain.total_cost(v.home_city, v.cost_per_distance, self.graph),
            _ => 0.0,
        }
    }

    /// Cost of every chain, by schedule index.
    pub fn vehicle_costs(&self, schedule: &Schedule) -> Vec<f64> {
        schedule
            .chains()
            .iter()
            .zip(self.vehicles)
            .map(|(chain, v)| chain.total_cost(v.home_city, v.cost_per_distance, self.graph))
            .collect()
    }

    /// Sum of all vehicle costs. This is the objective minimized by the search.
    pub fn total(&self, schedule: &Schedule) -> f64 {
        self.vehicle_costs(schedule).iter().sum()
    }

    /// Largest single-vehicle cost. Diagnostic only.
    pub fn max_vehicle_cost(&self, schedule: &Schedule) -> f64 {
        self.vehicle_costs(schedule).into_iter().fold(0.0, f64::max)
    }

    pub fn breakdown(&self, schedule: &Schedule) -> CostBreakdown {
        let per_vehicle = self.vehicle_costs(schedule);
        CostBreakdown {
            total: per_vehicle.iter().sum(),
            max_vehicle: per_vehicle.iter().copied().fold(0.0, f64::max),
            per_vehicle,
        }
    }
}
