//! Shared fixtures for unit tests.

use std::sync::Arc;

use crate::model::{CityId, Task, TaskId, Topology, Vehicle};

/// Cities `0..n` on a line, unit distance between neighbours.
pub(crate) fn line_topology(n: usize) -> Topology {
    let edges: Vec<(CityId, CityId, f64)> = (1..n).map(|c| (c - 1, c, 1.0)).collect();
    Topology::from_edges(n, &edges).expect("line edges are valid")
}

/// A `w x h` grid, unit distance between orthogonal neighbours.
pub(crate) fn grid_topology(w: usize, h: usize) -> Topology {
    let mut edges = Vec::new();
    for y in 0..h {
        for x in 0..w {
            let c = y * w + x;
            if x + 1 < w {
                edges.push((c, c + 1, 1.0));
            }
            if y + 1 < h {
                edges.push((c, c + w, 1.0));
            }
        }
    }
    Topology::from_edges(w * h, &edges).expect("grid edges are valid")
}

pub(crate) fn task(id: TaskId, pickup: CityId, delivery: CityId, weight: u32) -> Arc<Task> {
    Arc::new(Task::new(id, pickup, delivery, weight))
}

/// Two vehicles of capacity 10 and 6 starting at opposite ends of a line of `n` cities.
pub(crate) fn two_vehicle_fleet(n: usize) -> Vec<Vehicle> {
    vec![Vehicle::new(0, 10, 0, 1.0), Vehicle::new(1, 6, n - 1, 1.5)]
}
