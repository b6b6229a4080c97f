//! Exhaustive and sampled neighborhoods of a schedule.

use rand::Rng;

use super::config::NeighborhoodConfig;
use super::moves::{relocate_first_task, reorder_task, MoveOutcome};
use crate::model::{TaskId, Vehicle};
use crate::schedule::{ActionChain, Schedule};

/// Produces feasible neighbors of a schedule.
///
/// Only the chains a move touches are cloned while it is tried; a full
/// schedule copy is made for each neighbor that is kept. The input
/// schedule is never modified.
#[derive(Debug, Clone)]
pub struct NeighborhoodGenerator<'a> {
    vehicles: &'a [Vehicle],
    config: NeighborhoodConfig,
}

impl<'a> NeighborhoodGenerator<'a> {
    pub fn new(vehicles: &'a [Vehicle]) -> Self {
        Self::with_config(vehicles, NeighborhoodConfig::default())
    }

    pub fn with_config(vehicles: &'a [Vehicle], config: NeighborhoodConfig) -> Self {
        Self { vehicles, config }
    }

    pub fn config(&self) -> &NeighborhoodConfig {
        &self.config
    }

    /// Every feasible neighbor around one random focus.
    ///
    /// A random vehicle with at least one task is chosen. Its first task is
    /// relocated to every other vehicle, then one random task of the chain
    /// is tried at every other `(pickup, delivery)` placement. Returns an
    /// empty list when the schedule has no tasks or nothing is feasible.
    pub fn exhaustive<R: Rng>(&self, schedule: &Schedule, rng: &mut R) -> Vec<Schedule> {
        let busy = busy_vehicles(schedule);
        if busy.is_empty() {
            return Vec::new();
        }
        let focus = busy[rng.random_range(0..busy.len())];
        let mut neighbors = Vec::new();

        for target in 0..schedule.num_vehicles() {
            if target == focus {
                continue;
            }
            if let Some(neighbor) = self.try_relocate(schedule, focus, target) {
                neighbors.push(neighbor);
            }
        }

        let Some(chain) = schedule.chain(focus) else {
            return neighbors;
        };
        let Some(task_id) = random_task(chain, rng) else {
            return neighbors;
        };
        let capacity = self.vehicles[focus].capacity;
        let len = chain.len();
        for p in 1..len {
            for d in (p + 1)..=len {
                let mut trial = chain.clone();
                match reorder_task(&mut trial, task_id, p, d, capacity) {
                    MoveOutcome::Applied => neighbors.push(with_chain(schedule, focus, trial)),
                    MoveOutcome::Unchanged => continue,
                    // Later deliveries only carry the task further.
                    MoveOutcome::Infeasible => break,
                }
            }
        }

        neighbors
    }

    /// One random feasible neighbor, or a clone of the input if none is
    /// found within the attempt budget.
    ///
    /// With probability `relocate_probability` the sample is a relocate
    /// move, otherwise a reorder move on a chain of at least four actions.
    pub fn random_neighbor<R: Rng>(&self, schedule: &Schedule, rng: &mut R) -> Schedule {
        let found = if rng.random_range(0.0..1.0) < self.config.relocate_probability {
            self.random_relocate(schedule, rng)
        } else {
            self.random_reorder(schedule, rng)
        };
        found.unwrap_or_else(|| schedule.clone())
    }

    fn random_relocate<R: Rng>(&self, schedule: &Schedule, rng: &mut R) -> Option<Schedule> {
        let busy = busy_vehicles(schedule);
        if busy.is_empty() || schedule.num_vehicles() < 2 {
            return None;
        }

        let mut attempts = 0;
        while attempts < self.config.relocate_attempts {
            let from = busy[rng.random_range(0..busy.len())];
            let mut targets: Vec<usize> = (0..schedule.num_vehicles()).filter(|&v| v != from).collect();
            u_numflow::random::shuffle(&mut targets, rng);
            for to in targets {
                if attempts >= self.config.relocate_attempts {
                    break;
                }
                attempts += 1;
                if let Some(neighbor) = self.try_relocate(schedule, from, to) {
                    return Some(neighbor);
                }
            }
        }
        None
    }

    fn random_reorder<R: Rng>(&self, schedule: &Schedule, rng: &mut R) -> Option<Schedule> {
        let candidates: Vec<usize> = schedule
            .chains()
            .iter()
            .filter(|c| c.len() >= 4)
            .map(ActionChain::vehicle)
            .collect();
        if candidates.is_empty() {
            return None;
        }

        for _ in 0..self.config.reorder_attempts {
            let v = candidates[rng.random_range(0..candidates.len())];
            let chain = schedule.chain(v)?;
            let task_id = random_task(chain, rng)?;
            let len = chain.len();
            let p = rng.random_range(1..len);
            let d = rng.random_range((p + 1)..=len);

            let mut trial = chain.clone();
            if reorder_task(&mut trial, task_id, p, d, self.vehicles[v].capacity) == MoveOutcome::Applied {
                return Some(with_chain(schedule, v, trial));
            }
        }
        None
    }

    fn try_relocate(&self, schedule: &Schedule, from: usize, to: usize) -> Option<Schedule> {
        let mut source = schedule.chain(from)?.clone();
        let mut target = schedule.chain(to)?.clone();
        if !relocate_first_task(
            &mut source,
            &mut target,
            self.vehicles[from].capacity,
            self.vehicles[to].capacity,
        ) {
            return None;
        }
        let mut neighbor = schedule.clone();
        neighbor.replace_chain(from, source);
        neighbor.replace_chain(to, target);
        Some(neighbor)
    }
}

fn busy_vehicles(schedule: &Schedule) -> Vec<usize> {
    schedule
        .chains()
        .iter()
        .filter(|c| !c.is_empty())
        .map(ActionChain::vehicle)
        .collect()
}

/// Task of a uniformly chosen action.
fn random_task<R: Rng>(chain: &ActionChain, rng: &mut R) -> Option<TaskId> {
    if chain.is_empty() {
        return None;
    }
    let position = rng.random_range(1..=chain.len());
    let node = chain.node_at(position)?;
    chain.node(node)?.action().map(|a| a.task_id())
}

fn with_chain(schedule: &Schedule, vehicle: usize, chain: ActionChain) -> Schedule {
    let mut neighbor = schedule.clone();
    neighbor.replace_chain(vehicle, chain);
    neighbor
}
