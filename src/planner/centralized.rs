//! Full re-planning of a task set over the whole fleet.

use std::collections::HashSet;
use std::sync::Arc;

use super::report::PlanReport;
use super::route::{build_routes, VehicleRoute};
use super::search::ScheduleSearch;
use crate::anneal::{AnnealConfig, AnnealResult, Annealer, Clock, WallClock};
use crate::cost::CostModel;
use crate::error::PlanError;
use crate::insertion::{InsertionConfig, InsertionEvaluator};
use crate::model::{largest_vehicle, CityGraph, Task, Vehicle};
use crate::neighborhood::{NeighborhoodConfig, NeighborhoodGenerator};
use crate::schedule::Schedule;

/// Result of a planning call.
#[derive(Debug, Clone)]
pub struct PlanOutcome {
    /// One route per vehicle, in fleet order.
    pub routes: Vec<VehicleRoute>,
    /// Search statistics; `search.best` is the planned schedule.
    pub search: AnnealResult<Schedule>,
}

impl PlanOutcome {
    pub fn schedule(&self) -> &Schedule {
        &self.search.best
    }

    pub fn cost(&self) -> f64 {
        self.search.best_cost
    }

    pub fn report(&self) -> PlanReport {
        PlanReport::new(&self.search.best, &self.routes)
    }
}

/// Plans all tasks over the fleet with time-boxed annealing.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use std::time::Duration;
/// use u_pdp::anneal::{AnnealConfig, StepClock};
/// use u_pdp::model::{Task, Topology, Vehicle};
/// use u_pdp::planner::CentralizedPlanner;
///
/// let graph = Topology::from_edges(4, &[(0, 1, 1.0), (1, 2, 1.0), (2, 3, 1.0)]).unwrap();
/// let vehicles = vec![Vehicle::new(0, 10, 0, 1.0), Vehicle::new(1, 10, 3, 1.0)];
/// let tasks = vec![Arc::new(Task::new(0, 1, 0, 2)), Arc::new(Task::new(1, 2, 3, 2))];
///
/// let config = AnnealConfig::default().with_seed(7);
/// let planner = CentralizedPlanner::new(&vehicles, &graph)
///     .unwrap()
///     .with_anneal_config(config.clone());
/// let mut clock = StepClock::new(config.budget() / 500);
/// let outcome = planner.plan_with_clock(&tasks, &mut clock).unwrap();
///
/// assert_eq!(outcome.routes.len(), 2);
/// assert!(outcome.cost() <= outcome.search.initial_cost);
/// ```
#[derive(Debug, Clone)]
pub struct CentralizedPlanner<'a, G> {
    vehicles: &'a [Vehicle],
    graph: &'a G,
    anneal: AnnealConfig,
    neighborhood: NeighborhoodConfig,
    insertion: InsertionConfig,
}

impl<'a, G: CityGraph> CentralizedPlanner<'a, G> {
    /// Fails with [`PlanError::NoVehicles`] if the fleet is empty.
    pub fn new(vehicles: &'a [Vehicle], graph: &'a G) -> Result<Self, PlanError> {
        if vehicles.is_empty() {
            return Err(PlanError::NoVehicles);
        }
        Ok(Self {
            vehicles,
            graph,
            anneal: AnnealConfig::default(),
            neighborhood: NeighborhoodConfig::default(),
            insertion: InsertionConfig::default(),
        })
    }

    pub fn with_anneal_config(mut self, config: AnnealConfig) -> Self {
        self.anneal = config;
        self
    }

    pub fn with_neighborhood_config(mut self, config: NeighborhoodConfig) -> Self {
        self.neighborhood = config;
        self
    }

    pub fn with_insertion_config(mut self, config: InsertionConfig) -> Self {
        self.insertion = config;
        self
    }

    pub fn cost_model(&self) -> CostModel<'a, G> {
        CostModel::new(self.vehicles, self.graph)
    }

    /// Every task on the first largest-capacity vehicle, in input order.
    pub fn initial_schedule(&self, tasks: &[Arc<Task>]) -> Result<Schedule, PlanError> {
        Schedule::largest_vehicle_first(self.vehicles, tasks)
    }

    /// Plans `tasks` from scratch within the configured deadline.
    pub fn plan(&self, tasks: &[Arc<Task>]) -> Result<PlanOutcome, PlanError> {
        self.plan_with_clock(tasks, &mut WallClock::start())
    }

    pub fn plan_with_clock<C: Clock>(&self, tasks: &[Arc<Task>], clock: &mut C) -> Result<PlanOutcome, PlanError> {
        log::debug!("planning {} tasks on {} vehicles", tasks.len(), self.vehicles.len());
        let initial = self.initial_schedule(tasks)?;
        self.search(initial, clock)
    }

    /// Continues the search from an existing schedule instead of the
    /// largest-vehicle start.
    ///
    /// The seed must hold one chain per vehicle and pass
    /// [`Schedule::validated`].
    pub fn improve(&self, seed: &Schedule) -> Result<PlanOutcome, PlanError> {
        self.improve_with_clock(seed, &mut WallClock::start())
    }

    pub fn improve_with_clock<C: Clock>(&self, seed: &Schedule, clock: &mut C) -> Result<PlanOutcome, PlanError> {
        let initial = seed.validated(self.vehicles)?;
        self.search(initial, clock)
    }

    /// Plans the final task set starting from a schedule built earlier,
    /// typically the one committed while bidding.
    ///
    /// Scheduled tasks are rebound by id to the entries of `tasks`, so
    /// updated data such as rewards is picked up. Tasks missing from the
    /// seed are inserted at their cheapest slot before the search starts.
    /// Fails with [`PlanError::UnknownTask`] if the seed holds a task that
    /// is not in `tasks` and with [`PlanError::InvalidSchedule`] if the
    /// rebound seed breaks a structural invariant.
    pub fn plan_with_seed(&self, seed: &Schedule, tasks: &[Arc<Task>]) -> Result<PlanOutcome, PlanError> {
        self.plan_with_seed_and_clock(seed, tasks, &mut WallClock::start())
    }

    pub fn plan_with_seed_and_clock<C: Clock>(
        &self,
        seed: &Schedule,
        tasks: &[Arc<Task>],
        clock: &mut C,
    ) -> Result<PlanOutcome, PlanError> {
        let mut ids = HashSet::with_capacity(tasks.len());
        if let Some(dup) = tasks.iter().find(|t| !ids.insert(t.id)) {
            return Err(PlanError::DuplicateTask(dup.id));
        }

        let mut rebound = seed.clone();
        rebound.rebind_tasks(tasks)?;
        let mut schedule = rebound.validated(self.vehicles)?;

        let evaluator = InsertionEvaluator::with_config(self.cost_model(), self.insertion.clone());
        for task in tasks.iter().filter(|t| !seed.contains_task(t.id)) {
            let outcome = evaluator.evaluate(&schedule, task)?;
            schedule = match outcome.candidate {
                Some(candidate) => candidate,
                None => {
                    let max_capacity = largest_vehicle(self.vehicles).map_or(0, |v| self.vehicles[v].capacity);
                    return Err(PlanError::InfeasibleInstance {
                        task_id: task.id,
                        weight: task.weight,
                        max_capacity,
                    });
                }
            };
            log::debug!("inserted unseeded task {} at marginal cost {:.2}", task.id, outcome.cost - outcome.base_cost);
        }

        self.search(schedule, clock)
    }

    fn search<C: Clock>(&self, initial: Schedule, clock: &mut C) -> Result<PlanOutcome, PlanError> {
        self.neighborhood.validate().map_err(PlanError::InvalidConfig)?;
        let costs = self.cost_model();

        let search = if initial.is_empty() {
            self.anneal.validate().map_err(PlanError::InvalidConfig)?;
            let cost = costs.total(&initial);
            AnnealResult::unsearched(initial, cost, self.anneal.start_temperature)
        } else {
            let generator = NeighborhoodGenerator::with_config(self.vehicles, self.neighborhood.clone());
            let problem = ScheduleSearch::new(costs, generator);
            Annealer::run_with_clock(&problem, initial, &self.anneal, clock)?
        };
        debug_assert!(search.best.audit(self.vehicles).is_ok());

        let routes = build_routes(&search.best, self.vehicles, self.graph);
        log::debug!(
            "plan ready: {} tasks, cost {:.2} after {} iterations",
            search.best.task_count(),
            search.best_cost,
            search.iterations
        );
        Ok(PlanOutcome { routes, search })
    }
}
