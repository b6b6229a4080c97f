//! Exhaustive insertion enumeration.

use std::sync::Arc;

use super::config::InsertionConfig;
use crate::cost::CostModel;
use crate::error::PlanError;
use crate::model::{CityGraph, Task, TaskId};
use crate::schedule::{Action, ActionChain, Schedule};

/// Where the winning insertion placed the task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsertionSlot {
    /// Schedule index of the vehicle.
    pub vehicle: usize,
    /// Position of the pickup in the resulting chain (1-based).
    pub pickup_position: usize,
    /// Position of the delivery in the resulting chain (1-based).
    pub delivery_position: usize,
}

/// Result of probing one task against a frozen schedule.
///
/// When no vehicle can carry the task, `cost` is `f64::INFINITY` and
/// there is no candidate; this is a normal outcome ("cannot bid").
#[derive(Debug, Clone)]
pub struct InsertionOutcome {
    /// The probed task.
    pub task_id: TaskId,
    /// Cost of the frozen schedule.
    pub base_cost: f64,
    /// Cost of the cheapest schedule containing the task.
    pub cost: f64,
    /// The cheapest placement, if any.
    pub slot: Option<InsertionSlot>,
    /// The cheapest schedule, if any. Independent of the frozen input.
    pub candidate: Option<Schedule>,
}

impl InsertionOutcome {
    fn infeasible(task_id: TaskId, base_cost: f64) -> Self {
        Self {
            task_id,
            base_cost,
            cost: f64::INFINITY,
            slot: None,
            candidate: None,
        }
    }

    pub fn is_feasible(&self) -> bool {
        self.candidate.is_some()
    }

    /// Cost increase caused by the task; infinite when infeasible.
    pub fn marginal_cost(&self) -> f64 {
        self.cost - self.base_cost
    }
}

/// Finds the cheapest single-vehicle insertion of a new task.
///
/// # Algorithm
///
/// For each vehicle able to carry the task, for each pickup anchor `p`
/// and each delivery anchor `d > p`, clone that vehicle's chain, splice
/// the pickup after node `p` and the delivery after node `d`, validate,
/// and price the result. The running minimum wins; ties keep the first
/// placement found.
///
/// For a fixed pickup anchor, moving the delivery later only lengthens
/// the stretch that carries the new weight, so the delivery sweep stops
/// at the first capacity failure.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use u_pdp::cost::CostModel;
/// use u_pdp::insertion::InsertionEvaluator;
/// use u_pdp::model::{Task, Topology, Vehicle};
/// use u_pdp::schedule::Schedule;
///
/// let graph = Topology::from_edges(3, &[(0, 1, 1.0), (1, 2, 1.0)]).unwrap();
/// let vehicles = vec![Vehicle::new(0, 10, 0, 1.0)];
/// let evaluator = InsertionEvaluator::new(CostModel::new(&vehicles, &graph));
///
/// let committed = Schedule::new(1);
/// let outcome = evaluator.evaluate(&committed, &Arc::new(Task::new(0, 1, 2, 3))).unwrap();
/// assert!((outcome.marginal_cost() - 2.0).abs() < 1e-10);
/// assert!(committed.is_empty());
/// ```
#[derive(Debug)]
pub struct InsertionEvaluator<'a, G> {
    costs: CostModel<'a, G>,
    config: InsertionConfig,
}

impl<'a, G: CityGraph> InsertionEvaluator<'a, G> {
    pub fn new(costs: CostModel<'a, G>) -> Self {
        Self::with_config(costs, InsertionConfig::default())
    }

    pub fn with_config(costs: CostModel<'a, G>, config: InsertionConfig) -> Self {
        Self { costs, config }
    }

    pub fn config(&self) -> &InsertionConfig {
        &self.config
    }

    pub fn cost_model(&self) -> CostModel<'a, G> {
        self.costs
    }

    /// Probes every placement of `task` in `frozen`.
    ///
    /// `frozen` is only read. Fails with [`PlanError::DuplicateTask`] if
    /// the task is already scheduled.
    pub fn evaluate(&self, frozen: &Schedule, task: &Arc<Task>) -> Result<InsertionOutcome, PlanError> {
        if frozen.contains_task(task.id) {
            return Err(PlanError::DuplicateTask(task.id));
        }

        let vehicles = self.costs.vehicles();
        let base = self.costs.vehicle_costs(frozen);
        let base_cost: f64 = base.iter().sum();

        let mut best: Option<(f64, InsertionSlot, ActionChain)> = None;

        for (v, vehicle) in vehicles.iter().enumerate() {
            if task.weight > vehicle.capacity {
                continue;
            }
            let Some(chain) = frozen.chain(v) else {
                continue;
            };
            let others = base_cost - base[v];
            let n = chain.len();

            for p in 0..self.config.pickup_bound.end(n) {
                for d in (p + 1)..self.config.delivery_bound.end(n + 1) {
                    let mut trial = chain.clone();
                    if !place_pair(&mut trial, task, p, d, vehicle.capacity) {
                        break;
                    }
                    let cost = others + trial.total_cost(vehicle.home_city, vehicle.cost_per_distance, self.costs.graph());
                    if best.as_ref().is_none_or(|(c, _, _)| cost < *c) {
                        let slot = InsertionSlot {
                            vehicle: v,
                            pickup_position: p + 1,
                            delivery_position: d + 1,
                        };
                        best = Some((cost, slot, trial));
                    }
                }
            }
        }

        let Some((_, slot, chain)) = best else {
            log::trace!("task {} cannot be inserted into any vehicle", task.id);
            return Ok(InsertionOutcome::infeasible(task.id, base_cost));
        };

        let mut candidate = frozen.clone();
        candidate.replace_chain(slot.vehicle, chain);
        let cost = self.costs.total(&candidate);
        log::trace!(
            "task {} cheapest insertion on vehicle {} at ({}, {}), marginal cost {:.2}",
            task.id,
            slot.vehicle,
            slot.pickup_position,
            slot.delivery_position,
            cost - base_cost
        );

        Ok(InsertionOutcome {
            task_id: task.id,
            base_cost,
            cost,
            slot: Some(slot),
            candidate: Some(candidate),
        })
    }
}

/// Splices the task's pickup after the node at anchor `p` and its delivery
/// after the node at anchor `d`, counted once the pickup is in place.
/// Returns the validity of the resulting chain.
fn place_pair(chain: &mut ActionChain, task: &Arc<Task>, p: usize, d: usize, capacity: u32) -> bool {
    let Some(anchor) = chain.node_at(p) else {
        return false;
    };
    let mut anchor = chain.insert_after(anchor, Action::pickup(Arc::clone(task)));
    for _ in (p + 1)..d {
        match chain.next(anchor) {
            Some(next) => anchor = next,
            None => return false,
        }
    }
    chain.insert_after(anchor, Action::delivery(Arc::clone(task)));
    chain.recompute_and_validate(capacity)
}
