//! Schedule search as an annealing problem.

use rand::Rng;

use crate::anneal::AnnealingProblem;
use crate::cost::CostModel;
use crate::model::CityGraph;
use crate::neighborhood::NeighborhoodGenerator;
use crate::schedule::Schedule;

/// Binds the cost model and neighbor generator of one fleet and graph.
pub struct ScheduleSearch<'a, G> {
    costs: CostModel<'a, G>,
    generator: NeighborhoodGenerator<'a>,
}

impl<'a, G: CityGraph> ScheduleSearch<'a, G> {
    pub fn new(costs: CostModel<'a, G>, generator: NeighborhoodGenerator<'a>) -> Self {
        Self { costs, generator }
    }
}

impl<G: CityGraph> AnnealingProblem for ScheduleSearch<'_, G> {
    type Solution = Schedule;

    fn cost(&self, schedule: &Schedule) -> f64 {
        self.costs.total(schedule)
    }

    fn random_neighbor<R: Rng>(&self, schedule: &Schedule, rng: &mut R) -> Schedule {
        self.generator.random_neighbor(schedule, rng)
    }

    fn neighborhood<R: Rng>(&self, schedule: &Schedule, rng: &mut R) -> Vec<Schedule> {
        self.generator.exhaustive(schedule, rng)
    }
}
