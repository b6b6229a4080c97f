//! Committed schedule and per-task quotes for bidding.

use std::sync::Arc;

use crate::cost::CostModel;
use crate::error::PlanError;
use crate::insertion::{InsertionConfig, InsertionEvaluator, InsertionOutcome};
use crate::model::{CityGraph, Task, TaskId};
use crate::schedule::Schedule;

/// A priced insertion of one task, tied to the ledger revision it was
/// computed on.
#[derive(Debug, Clone)]
pub struct Quote {
    outcome: InsertionOutcome,
    revision: u64,
}

impl Quote {
    pub fn task_id(&self) -> TaskId {
        self.outcome.task_id
    }

    /// Cost increase of carrying the task; infinite when it cannot be carried.
    pub fn marginal_cost(&self) -> f64 {
        self.outcome.marginal_cost()
    }

    pub fn is_feasible(&self) -> bool {
        self.outcome.is_feasible()
    }

    /// Ledger revision the quote was computed on.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn outcome(&self) -> &InsertionOutcome {
        &self.outcome
    }
}

/// Holds the schedule of tasks already won.
///
/// Quoting never changes the ledger. Committing a quote adopts its
/// candidate schedule and bumps the revision, which invalidates every
/// other outstanding quote.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use u_pdp::cost::CostModel;
/// use u_pdp::model::{Task, Topology, Vehicle};
/// use u_pdp::planner::TaskLedger;
///
/// let graph = Topology::from_edges(3, &[(0, 1, 1.0), (1, 2, 1.0)]).unwrap();
/// let vehicles = vec![Vehicle::new(0, 10, 0, 1.0)];
/// let mut ledger = TaskLedger::new(CostModel::new(&vehicles, &graph));
///
/// let quote = ledger.quote(&Arc::new(Task::new(0, 1, 2, 3))).unwrap();
/// assert!((quote.marginal_cost() - 2.0).abs() < 1e-10);
/// ledger.commit(quote).unwrap();
/// assert_eq!(ledger.committed().task_count(), 1);
/// ```
#[derive(Debug)]
pub struct TaskLedger<'a, G> {
    evaluator: InsertionEvaluator<'a, G>,
    committed: Schedule,
    committed_cost: f64,
    revision: u64,
}

impl<'a, G: CityGraph> TaskLedger<'a, G> {
    /// Creates a ledger with nothing committed.
    pub fn new(costs: CostModel<'a, G>) -> Self {
        Self::with_config(costs, InsertionConfig::default())
    }

    pub fn with_config(costs: CostModel<'a, G>, config: InsertionConfig) -> Self {
        Self {
            evaluator: InsertionEvaluator::with_config(costs, config),
            committed: Schedule::new(costs.vehicles().len()),
            committed_cost: 0.0,
            revision: 0,
        }
    }

    /// Starts from an existing committed schedule.
    ///
    /// The schedule is admitted through [`Schedule::validated`].
    pub fn from_schedule(costs: CostModel<'a, G>, committed: Schedule) -> Result<Self, PlanError> {
        Self::from_schedule_with_config(costs, committed, InsertionConfig::default())
    }

    pub fn from_schedule_with_config(
        costs: CostModel<'a, G>,
        committed: Schedule,
        config: InsertionConfig,
    ) -> Result<Self, PlanError> {
        let committed = committed.validated(costs.vehicles())?;
        Ok(Self {
            evaluator: InsertionEvaluator::with_config(costs, config),
            committed_cost: costs.total(&committed),
            committed,
            revision: 0,
        })
    }

    pub fn insertion_config(&self) -> &InsertionConfig {
        self.evaluator.config()
    }

    pub fn committed(&self) -> &Schedule {
        &self.committed
    }

    pub fn committed_cost(&self) -> f64 {
        self.committed_cost
    }

    /// Incremented on every change of the committed schedule.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn tasks(&self) -> Vec<Arc<Task>> {
        self.committed.tasks()
    }

    /// Prices the cheapest insertion of `task` into the committed schedule.
    pub fn quote(&self, task: &Arc<Task>) -> Result<Quote, PlanError> {
        let outcome = self.evaluator.evaluate(&self.committed, task)?;
        Ok(Quote {
            outcome,
            revision: self.revision,
        })
    }

    /// Adopts the quoted schedule. Returns the new committed cost.
    ///
    /// Fails with [`PlanError::StaleQuote`] if the ledger changed since
    /// the quote was made and with [`PlanError::InfeasibleQuote`] if the
    /// quote has no candidate.
    pub fn commit(&mut self, quote: Quote) -> Result<f64, PlanError> {
        if quote.revision != self.revision {
            log::warn!(
                "rejecting quote for task {}: computed on revision {}, ledger at {}",
                quote.task_id(),
                quote.revision,
                self.revision
            );
            return Err(PlanError::StaleQuote {
                quoted: quote.revision,
                current: self.revision,
            });
        }
        let task_id = quote.task_id();
        let cost = quote.outcome.cost;
        let Some(candidate) = quote.outcome.candidate else {
            log::warn!("rejecting quote for task {task_id}: no vehicle can carry it");
            return Err(PlanError::InfeasibleQuote(task_id));
        };

        self.committed = candidate;
        self.committed_cost = cost;
        self.revision += 1;
        log::debug!(
            "committed task {task_id}, {} tasks at cost {:.2} (revision {})",
            self.committed.task_count(),
            cost,
            self.revision
        );
        Ok(cost)
    }

    /// Replaces the committed schedule with `schedule` if it is feasible
    /// and carries the same tasks at a strictly lower cost. Returns whether
    /// it was adopted.
    pub fn adopt_if_better(&mut self, schedule: Schedule) -> bool {
        let costs = self.evaluator.cost_model();
        if schedule.num_vehicles() != self.committed.num_vehicles()
            || schedule.task_count() != self.committed.task_count()
            || !self.committed.tasks().iter().all(|t| schedule.contains_task(t.id))
        {
            return false;
        }
        let schedule = match schedule.validated(costs.vehicles()) {
            Ok(schedule) => schedule,
            Err(err) => {
                log::debug!("not adopting schedule: {err}");
                return false;
            }
        };
        let cost = costs.total(&schedule);
        if cost >= self.committed_cost {
            return false;
        }
        log::debug!("adopting schedule at cost {:.2} over {:.2}", cost, self.committed_cost);
        self.committed = schedule;
        self.committed_cost = cost;
        self.revision += 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Vehicle;
    use crate::error::ScheduleViolation;
    use crate::insertion::SlotBound;
    use crate::neighborhood::{reorder_task, MoveOutcome};
    use crate::schedule::{Action, ActionChain};
    use crate::test_support::{line_topology, task};

    #[test]
    fn test_quote_does_not_change_ledger() {
        let graph = line_topology(6);
        let vehicles = vec![Vehicle::new(0, 10, 0, 1.0)];
        let ledger = TaskLedger::new(CostModel::new(&vehicles, &graph));
        let quote = ledger.quote(&task(0, 2, 4, 1)).expect("new task");
        assert!((quote.marginal_cost() - 4.0).abs() < 1e-10);
        assert_eq!(quote.revision(), 0);
        assert!(ledger.committed().is_empty());
        assert_eq!(ledger.revision(), 0);
    }

    #[test]
    fn test_commit_then_stale_quote() {
        let graph = line_topology(6);
        let vehicles = vec![Vehicle::new(0, 10, 0, 1.0)];
        let mut ledger = TaskLedger::new(CostModel::new(&vehicles, &graph));

        let first = ledger.quote(&task(0, 2, 4, 1)).expect("new task");
        let second = ledger.quote(&task(1, 1, 5, 1)).expect("new task");
        let cost = ledger.commit(first).expect("fresh quote");
        assert!((cost - 4.0).abs() < 1e-10);
        assert_eq!(ledger.revision(), 1);

        assert_eq!(
            ledger.commit(second).unwrap_err(),
            PlanError::StaleQuote { quoted: 0, current: 1 }
        );
        assert_eq!(ledger.committed().task_count(), 1);

        let again = ledger.quote(&task(1, 1, 5, 1)).expect("new task");
        // 0 -> 1 -> 2 -> 4 -> 5
        assert!((again.marginal_cost() - 1.0).abs() < 1e-10);
        ledger.commit(again).expect("fresh quote");
        assert!((ledger.committed_cost() - 5.0).abs() < 1e-10);
        assert!(ledger.committed().audit(&vehicles).is_ok());
    }

    #[test]
    fn test_infeasible_quote_cannot_commit() {
        let graph = line_topology(3);
        let vehicles = vec![Vehicle::new(0, 3, 0, 1.0)];
        let mut ledger = TaskLedger::new(CostModel::new(&vehicles, &graph));
        let quote = ledger.quote(&task(0, 1, 2, 4)).expect("new task");
        assert!(!quote.is_feasible());
        assert!(quote.marginal_cost().is_infinite());
        assert_eq!(ledger.commit(quote).unwrap_err(), PlanError::InfeasibleQuote(0));
        assert_eq!(ledger.revision(), 0);
    }

    #[test]
    fn test_quote_rejects_committed_task() {
        let graph = line_topology(3);
        let vehicles = vec![Vehicle::new(0, 3, 0, 1.0)];
        let mut ledger = TaskLedger::new(CostModel::new(&vehicles, &graph));
        let t = task(0, 1, 2, 1);
        let quote = ledger.quote(&t).expect("new task");
        ledger.commit(quote).expect("fresh quote");
        assert_eq!(ledger.quote(&t).unwrap_err(), PlanError::DuplicateTask(0));
    }

    #[test]
    fn test_adopt_if_better() {
        let graph = line_topology(10);
        let vehicles = vec![Vehicle::new(0, 10, 0, 1.0)];
        let costs = CostModel::new(&vehicles, &graph);
        let tasks = vec![task(0, 9, 1, 1), task(1, 2, 3, 1)];
        // 0 -> 9 -> 1 -> 2 -> 3
        let initial = Schedule::largest_vehicle_first(&vehicles, &tasks).expect("feasible");
        let mut ledger = TaskLedger::from_schedule(costs, initial).expect("fleet matches");
        assert!((ledger.committed_cost() - 19.0).abs() < 1e-10);

        // 0 -> 2 -> 3 -> 9 -> 1
        let mut better = ledger.committed().clone();
        let chain = better.chain_mut(0).expect("vehicle 0");
        assert_eq!(reorder_task(chain, 1, 1, 2, 10), MoveOutcome::Applied);

        assert!(!ledger.adopt_if_better(ledger.committed().clone()));
        assert!(!ledger.adopt_if_better(Schedule::new(1)));
        assert!(ledger.adopt_if_better(better));
        assert!((ledger.committed_cost() - 17.0).abs() < 1e-10);
        assert_eq!(ledger.revision(), 1);
    }

    #[test]
    fn test_from_schedule_checks_fleet() {
        let graph = line_topology(3);
        let vehicles = vec![Vehicle::new(0, 3, 0, 1.0)];
        let err = TaskLedger::from_schedule(CostModel::new(&vehicles, &graph), Schedule::new(2)).unwrap_err();
        assert!(matches!(err, PlanError::InvalidConfig(_)));
    }

    #[test]
    fn test_adopt_rejects_overloaded_order() {
        let graph = line_topology(4);
        let vehicles = vec![Vehicle::new(0, 10, 0, 1.0)];
        let costs = CostModel::new(&vehicles, &graph);
        let (a, b) = (task(0, 1, 3, 6), task(1, 1, 3, 6));
        // 0 -> 1 -> 3 -> 1 -> 3
        let initial = Schedule::largest_vehicle_first(&vehicles, &[a.clone(), b.clone()]).expect("feasible");
        let mut ledger = TaskLedger::from_schedule(costs, initial).expect("valid schedule");
        assert!((ledger.committed_cost() - 7.0).abs() < 1e-10);

        // Both on board at once: cheaper but load 12 on capacity 10.
        let mut chain = ActionChain::new(0);
        chain.push_back(Action::pickup(a.clone()));
        chain.push_back(Action::pickup(b.clone()));
        chain.push_back(Action::delivery(a));
        chain.push_back(Action::delivery(b));
        let mut overloaded = Schedule::new(1);
        overloaded.replace_chain(0, chain);
        assert!(costs.total(&overloaded) < ledger.committed_cost());

        assert!(!ledger.adopt_if_better(overloaded));
        assert!((ledger.committed_cost() - 7.0).abs() < 1e-10);
        assert_eq!(ledger.revision(), 0);
        assert!(ledger.committed().audit(&vehicles).is_ok());
    }

    #[test]
    fn test_from_schedule_rejects_split_task() {
        let graph = line_topology(4);
        let vehicles = vec![Vehicle::new(0, 10, 0, 1.0), Vehicle::new(1, 10, 3, 1.0)];
        let t = task(0, 1, 2, 1);
        let mut split = Schedule::new(2);
        for v in 0..2 {
            let chain = split.chain_mut(v).expect("vehicle exists");
            chain.push_back(Action::pickup(t.clone()));
            chain.push_back(Action::delivery(t.clone()));
        }
        let err = TaskLedger::from_schedule(CostModel::new(&vehicles, &graph), split).unwrap_err();
        assert_eq!(err, PlanError::InvalidSchedule(ScheduleViolation::SharedTask { task_id: 0 }));
    }

    #[test]
    fn test_from_schedule_with_config() {
        let graph = line_topology(6);
        let vehicles = vec![Vehicle::new(0, 10, 0, 1.0)];
        let costs = CostModel::new(&vehicles, &graph);
        let initial = Schedule::largest_vehicle_first(&vehicles, &[task(0, 2, 4, 1)]).expect("feasible");
        let config = InsertionConfig::default().with_pickup_bound(SlotBound::Exclusive);
        let ledger = TaskLedger::from_schedule_with_config(costs, initial, config).expect("valid schedule");
        assert_eq!(ledger.insertion_config().pickup_bound, SlotBound::Exclusive);
        assert_eq!(ledger.insertion_config().delivery_bound, SlotBound::Inclusive);
        assert_eq!(ledger.committed().task_count(), 1);
        assert!((ledger.committed_cost() - 4.0).abs() < 1e-10);
    }
}
