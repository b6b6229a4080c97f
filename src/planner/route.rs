//! Translation of schedules into step-by-step routes.

use crate::model::{CityGraph, CityId, TaskId, Vehicle};
use crate::schedule::{ActionKind, Schedule};

/// One step of a vehicle route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RouteStep {
    /// Drive to an adjacent city.
    Move(CityId),
    /// Load a task at the current city.
    Pickup(TaskId),
    /// Unload a task at the current city.
    Delivery(TaskId),
}

/// The route of one vehicle.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VehicleRoute {
    /// Identifier of the vehicle as known to the environment.
    pub vehicle_id: usize,
    pub start_city: CityId,
    pub steps: Vec<RouteStep>,
    pub total_distance: f64,
    pub cost: f64,
}

impl VehicleRoute {
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Task ids in pickup order.
    pub fn pickups(&self) -> Vec<TaskId> {
        self.steps
            .iter()
            .filter_map(|s| match s {
                RouteStep::Pickup(id) => Some(*id),
                _ => None,
            })
            .collect()
    }
}

/// Expands every chain into moves along shortest paths plus the pickup and
/// delivery steps, one route per vehicle in fleet order.
pub fn build_routes<G: CityGraph>(schedule: &Schedule, vehicles: &[Vehicle], graph: &G) -> Vec<VehicleRoute> {
    schedule
        .chains()
        .iter()
        .zip(vehicles)
        .map(|(chain, vehicle)| {
            let mut steps = Vec::with_capacity(chain.len() * 2);
            let mut at = vehicle.home_city;
            for action in chain.actions() {
                let city = action.city();
                steps.extend(graph.path(at, city).into_iter().map(RouteStep::Move));
                steps.push(match action.kind() {
                    ActionKind::Pickup => RouteStep::Pickup(action.task_id()),
                    ActionKind::Delivery => RouteStep::Delivery(action.task_id()),
                });
                at = city;
            }
            let total_distance = chain.total_distance(vehicle.home_city, graph);
            VehicleRoute {
                vehicle_id: vehicle.id,
                start_city: vehicle.home_city,
                steps,
                total_distance,
                cost: total_distance * vehicle.cost_per_distance,
            }
        })
        .collect()
}
