//! Vehicles of the fleet.

use super::CityId;

/// A vehicle with a fixed capacity and a per-distance operating cost.
///
/// A vehicle's index in the fleet slice is its schedule index: chain `i`
/// of a [`Schedule`](crate::schedule::Schedule) belongs to `vehicles[i]`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vehicle {
    /// Vehicle identifier as known to the environment.
    pub id: usize,
    /// Maximum load carried at any time.
    pub capacity: u32,
    /// City where the vehicle starts.
    pub home_city: CityId,
    /// Monetary cost per unit of distance travelled.
    pub cost_per_distance: f64,
}

impl Vehicle {
    pub fn new(id: usize, capacity: u32, home_city: CityId, cost_per_distance: f64) -> Self {
        Self {
            id,
            capacity,
            home_city,
            cost_per_distance,
        }
    }
}

/// Returns the index of the first vehicle with the largest capacity.
pub(crate) fn largest_vehicle(vehicles: &[Vehicle]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, v) in vehicles.iter().enumerate() {
        if best.is_none_or(|b| v.capacity > vehicles[b].capacity) {
            best = Some(i);
        }
    }
    best
}
