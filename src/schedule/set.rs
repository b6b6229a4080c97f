//! Schedule set: one action chain per vehicle.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use super::action::{Action, ActionKind};
use super::chain::ActionChain;
use crate::error::{PlanError, ScheduleViolation};
use crate::model::{largest_vehicle, Task, TaskId, Vehicle};

/// A full plan: chain `i` belongs to vehicle `i` of the fleet slice.
///
/// `Clone` is a deep copy of every chain arena; tasks stay shared. Every
/// speculative move works on a clone so that a rejected candidate can
/// never corrupt the incumbent.
///
/// Equality compares the action sequences, not arena layout.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use u_pdp::model::{Task, Vehicle};
/// use u_pdp::schedule::{Action, Schedule};
///
/// let vehicles = vec![Vehicle::new(0, 10, 0, 1.0)];
/// let task = Arc::new(Task::new(0, 1, 2, 4));
///
/// let mut schedule = Schedule::new(vehicles.len());
/// let chain = schedule.chain_mut(0).unwrap();
/// chain.push_back(Action::pickup(task.clone()));
/// chain.push_back(Action::delivery(task));
/// assert!(schedule.recompute_and_validate(&vehicles));
/// assert_eq!(schedule.task_count(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct Schedule {
    chains: Vec<ActionChain>,
}

impl Schedule {
    /// Creates a schedule with one empty chain per vehicle.
    pub fn new(num_vehicles: usize) -> Self {
        Self {
            chains: (0..num_vehicles).map(ActionChain::new).collect(),
        }
    }

    /// Builds the starting solution: every task, in input order, appended
    /// as pickup then delivery to the first vehicle of largest capacity.
    ///
    /// Fails with [`PlanError::InfeasibleInstance`] if some task is heavier
    /// than every vehicle's capacity, and [`PlanError::NoVehicles`] if the
    /// fleet is empty.
    pub fn largest_vehicle_first(vehicles: &[Vehicle], tasks: &[Arc<Task>]) -> Result<Self, PlanError> {
        let target = largest_vehicle(vehicles).ok_or(PlanError::NoVehicles)?;
        let max_capacity = vehicles[target].capacity;

        let mut schedule = Self::new(vehicles.len());
        let mut seen = HashSet::with_capacity(tasks.len());
        let chain = &mut schedule.chains[target];
        let mut anchor = chain.tail();
        for task in tasks {
            if task.weight > max_capacity {
                return Err(PlanError::InfeasibleInstance {
                    task_id: task.id,
                    weight: task.weight,
                    max_capacity,
                });
            }
            if !seen.insert(task.id) {
                return Err(PlanError::DuplicateTask(task.id));
            }
            anchor = chain.insert_after(anchor, Action::pickup(Arc::clone(task)));
            anchor = chain.insert_after(anchor, Action::delivery(Arc::clone(task)));
        }

        let valid = schedule.recompute_and_validate(vehicles);
        debug_assert!(valid, "sequential pickup/delivery never exceeds the largest capacity");
        Ok(schedule)
    }

    /// Number of chains.
    pub fn num_vehicles(&self) -> usize {
        self.chains.len()
    }

    pub fn chains(&self) -> &[ActionChain] {
        &self.chains
    }

    pub fn chain(&self, vehicle: usize) -> Option<&ActionChain> {
        self.chains.get(vehicle)
    }

    pub fn chain_mut(&mut self, vehicle: usize) -> Option<&mut ActionChain> {
        self.chains.get_mut(vehicle)
    }

    /// Replaces one chain, returning the previous one.
    pub(crate) fn replace_chain(&mut self, vehicle: usize, chain: ActionChain) -> ActionChain {
        std::mem::replace(&mut self.chains[vehicle], chain)
    }

    /// Total number of scheduled tasks.
    pub fn task_count(&self) -> usize {
        self.chains.iter().map(ActionChain::task_count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.chains.iter().all(ActionChain::is_empty)
    }

    /// Whether any chain holds an action of the task.
    pub fn contains_task(&self, task_id: TaskId) -> bool {
        self.chains.iter().any(|c| c.contains_task(task_id))
    }

    /// Distinct tasks in the schedule, in chain order (vehicle by vehicle).
    pub fn tasks(&self) -> Vec<Arc<Task>> {
        self.chains
            .iter()
            .flat_map(|c| c.actions())
            .filter(|a| a.kind() == ActionKind::Pickup)
            .map(|a| Arc::clone(a.task()))
            .collect()
    }

    /// Recomputes every chain against its vehicle's capacity.
    ///
    /// All chains are recomputed even after the first failure.
    pub fn recompute_and_validate(&mut self, vehicles: &[Vehicle]) -> bool {
        debug_assert_eq!(self.chains.len(), vehicles.len());
        let mut valid = true;
        for (chain, vehicle) in self.chains.iter_mut().zip(vehicles) {
            valid &= chain.recompute_and_validate(vehicle.capacity);
        }
        valid
    }

    /// Audits every chain and checks that no task is split across vehicles.
    pub fn audit(&self, vehicles: &[Vehicle]) -> Result<(), ScheduleViolation> {
        let mut owners: HashMap<TaskId, usize> = HashMap::new();
        for (chain, vehicle) in self.chains.iter().zip(vehicles) {
            chain.audit(vehicle.capacity)?;
            for action in chain.actions() {
                let owner = *owners.entry(action.task_id()).or_insert(chain.vehicle());
                if owner != chain.vehicle() {
                    return Err(ScheduleViolation::SharedTask {
                        task_id: action.task_id(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Copy with fresh bookkeeping, checked against every structural
    /// invariant. Admits schedules assembled outside the planner.
    ///
    /// Fails with [`PlanError::InvalidConfig`] on a chain count that does
    /// not match the fleet and with [`PlanError::InvalidSchedule`] on the
    /// first broken invariant.
    pub fn validated(&self, vehicles: &[Vehicle]) -> Result<Schedule, PlanError> {
        if self.chains.len() != vehicles.len() {
            return Err(PlanError::InvalidConfig(format!(
                "schedule has {} chains for {} vehicles",
                self.chains.len(),
                vehicles.len()
            )));
        }
        let mut copy = self.clone();
        let within_capacity = copy.recompute_and_validate(vehicles);
        copy.audit(vehicles)?;
        if !within_capacity {
            return Err(PlanError::InvalidConfig("schedule violates vehicle capacities".into()));
        }
        Ok(copy)
    }

    /// Action sequence of every chain, for structural comparison.
    pub fn signature(&self) -> Vec<Vec<(TaskId, ActionKind)>> {
        self.chains.iter().map(ActionChain::signature).collect()
    }

    /// Points every action at the task with the same id in `tasks`.
    ///
    /// Used when the final task set carries updated data (such as rewards
    /// settled at auction) for tasks already planned. Fails with
    /// [`PlanError::UnknownTask`] if a scheduled task is not in `tasks`.
    pub fn rebind_tasks(&mut self, tasks: &[Arc<Task>]) -> Result<(), PlanError> {
        let lookup: HashMap<TaskId, Arc<Task>> = tasks.iter().map(|t| (t.id, Arc::clone(t))).collect();
        for chain in &mut self.chains {
            chain.rebind_tasks(&lookup).map_err(PlanError::UnknownTask)?;
        }
        Ok(())
    }
}

impl PartialEq for Schedule {
    fn eq(&self, other: &Self) -> bool {
        self.chains.len() == other.chains.len()
            && self.chains.iter().zip(&other.chains).all(|(a, b)| {
                a.len() == b.len()
                    && a
                        .actions()
                        .zip(b.actions())
                        .all(|(x, y)| x.task_id() == y.task_id() && x.kind() == y.kind())
            })
    }
}
