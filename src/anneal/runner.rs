//! Annealing execution loop.

use std::time::Duration;

use rand::Rng;
use u_numflow::random::create_rng;

use super::clock::{Clock, WallClock};
use super::config::AnnealConfig;
use super::types::AnnealingProblem;
use crate::error::PlanError;

/// Result of an annealing run.
#[derive(Debug, Clone)]
pub struct AnnealResult<S: Clone> {
    /// The best solution found.
    pub best: S,

    /// Cost of the best solution.
    pub best_cost: f64,

    /// Cost of the starting solution.
    pub initial_cost: f64,

    /// Total number of iterations, skipped ones included.
    pub iterations: usize,

    /// Number of accepted moves (including improvements).
    pub accepted_moves: usize,

    /// Number of moves strictly cheaper than the current solution.
    pub improving_moves: usize,

    /// Number of resets of the current solution to the best one.
    pub restarts: usize,

    /// Iterations whose neighborhood scan came back empty.
    pub skipped_iterations: usize,

    /// Temperature when the loop stopped.
    pub final_temperature: f64,

    /// Time reported by the clock when the loop stopped.
    pub elapsed: Duration,

    /// Best cost sampled at regular intervals. Non-increasing.
    pub cost_history: Vec<f64>,
}

impl<S: Clone> AnnealResult<S> {
    /// A result for a solution that was returned without searching.
    pub(crate) fn unsearched(best: S, cost: f64, temperature: f64) -> Self {
        Self {
            best,
            best_cost: cost,
            initial_cost: cost,
            iterations: 0,
            accepted_moves: 0,
            improving_moves: 0,
            restarts: 0,
            skipped_iterations: 0,
            final_temperature: temperature,
            elapsed: Duration::ZERO,
            cost_history: vec![cost],
        }
    }

    /// Cost reduction relative to the starting solution.
    pub fn improvement(&self) -> f64 {
        self.initial_cost - self.best_cost
    }
}

/// Time-boxed simulated annealing with restart-to-incumbent.
///
/// Each iteration draws a candidate in one of two ways. With the explore
/// probability (1 at the start, 0 when the budget is spent) it takes one
/// random neighbor; otherwise it scans a full neighborhood and keeps its
/// cheapest member, skipping the iteration if the neighborhood is empty.
///
/// A cheaper candidate is always accepted; a costlier one with probability
/// `exp((current - candidate) / T)`. Whenever the temperature has dropped
/// by `restart_factor` since the last restart, the current solution is
/// reset to the best one.
///
/// The loop stops once the clock reports `secure_factor * deadline` or
/// the iteration cap is reached. The deadline is only checked between
/// iterations.
pub struct Annealer;

impl Annealer {
    /// Runs the search against the wall clock.
    pub fn run<P: AnnealingProblem>(
        problem: &P,
        initial: P::Solution,
        config: &AnnealConfig,
    ) -> Result<AnnealResult<P::Solution>, PlanError> {
        Self::run_with_clock(problem, initial, config, &mut WallClock::start())
    }

    /// Runs the search against the supplied clock.
    pub fn run_with_clock<P: AnnealingProblem, C: Clock>(
        problem: &P,
        initial: P::Solution,
        config: &AnnealConfig,
        clock: &mut C,
    ) -> Result<AnnealResult<P::Solution>, PlanError> {
        config.validate().map_err(PlanError::InvalidConfig)?;

        let mut rng = match config.seed {
            Some(seed) => create_rng(seed),
            None => create_rng(rand::random()),
        };

        let budget = config.budget();
        let initial_cost = problem.cost(&initial);
        let mut current = initial;
        let mut current_cost = initial_cost;
        let mut best = current.clone();
        let mut best_cost = current_cost;

        let mut temperature = config.start_temperature;
        let mut checkpoint = temperature;
        let mut elapsed = Duration::ZERO;

        let mut iterations = 0usize;
        let mut accepted_moves = 0usize;
        let mut improving_moves = 0usize;
        let mut restarts = 0usize;
        let mut skipped_iterations = 0usize;

        let mut cost_history = vec![best_cost];

        log::debug!(
            "annealing from cost {:.2}, budget {:?}, seed {:?}",
            initial_cost,
            budget,
            config.seed
        );

        while elapsed < budget {
            if config.max_iterations > 0 && iterations >= config.max_iterations {
                break;
            }

            let progress = config.progress(elapsed);
            let candidate = if rng.random_range(0.0..1.0) < config.explore_probability(progress) {
                let neighbor = problem.random_neighbor(&current, &mut rng);
                let cost = problem.cost(&neighbor);
                Some((neighbor, cost))
            } else {
                cheapest(problem, problem.neighborhood(&current, &mut rng))
            };
            iterations += 1;

            match candidate {
                None => skipped_iterations += 1,
                Some((candidate, candidate_cost)) => {
                    let accept = if candidate_cost < current_cost {
                        improving_moves += 1;
                        true
                    } else {
                        let probability = ((current_cost - candidate_cost) / temperature).exp();
                        probability > rng.random_range(0.0..1.0)
                    };

                    if accept {
                        current = candidate;
                        current_cost = candidate_cost;
                        accepted_moves += 1;

                        if current_cost < best_cost {
                            best = current.clone();
                            best_cost = current_cost;
                            log::trace!("iteration {iterations}: new best {best_cost:.2}");
                        }
                    }
                }
            }

            elapsed = clock.elapsed();
            temperature = config.temperature(config.progress(elapsed));

            if checkpoint / config.restart_factor > temperature {
                current = best.clone();
                current_cost = best_cost;
                checkpoint = temperature;
                restarts += 1;
                log::trace!("iteration {iterations}: restart from best {best_cost:.2} at temperature {temperature:.2}");
            }

            if iterations.is_multiple_of(config.history_interval) {
                cost_history.push(best_cost);
                log::trace!(
                    "iteration {iterations}: current {current_cost:.2}, best {best_cost:.2}, temperature {temperature:.2}"
                );
            }
        }

        if cost_history
            .last()
            .is_none_or(|&last| (last - best_cost).abs() > 1e-15)
        {
            cost_history.push(best_cost);
        }

        log::debug!(
            "annealing finished after {iterations} iterations in {elapsed:?}: cost {initial_cost:.2} -> {best_cost:.2}, {restarts} restarts"
        );

        Ok(AnnealResult {
            best,
            best_cost,
            initial_cost,
            iterations,
            accepted_moves,
            improving_moves,
            restarts,
            skipped_iterations,
            final_temperature: temperature,
            elapsed,
            cost_history,
        })
    }
}

/// Cheapest member of a neighborhood; the first one wins ties.
fn cheapest<P: AnnealingProblem>(problem: &P, neighbors: Vec<P::Solution>) -> Option<(P::Solution, f64)> {
    let mut best: Option<(P::Solution, f64)> = None;
    for neighbor in neighbors {
        let cost = problem.cost(&neighbor);
        if best.as_ref().is_none_or(|(_, c)| cost < *c) {
            best = Some((neighbor, cost));
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anneal::StepClock;

    // ---- Integer line: f(x) = |x|, minimum at 0 ----

    struct LineProblem;

    impl AnnealingProblem for LineProblem {
        type Solution = i64;

        fn cost(&self, x: &i64) -> f64 {
            x.unsigned_abs() as f64
        }

        fn random_neighbor<R: Rng>(&self, x: &i64, rng: &mut R) -> i64 {
            x + rng.random_range(-3..=3)
        }

        fn neighborhood<R: Rng>(&self, x: &i64, _rng: &mut R) -> Vec<i64> {
            vec![x - 1, x + 1]
        }
    }

    // ---- A problem with no moves at all ----

    struct Frozen;

    impl AnnealingProblem for Frozen {
        type Solution = u8;

        fn cost(&self, _: &u8) -> f64 {
            1.0
        }

        fn random_neighbor<R: Rng>(&self, x: &u8, _rng: &mut R) -> u8 {
            *x
        }

        fn neighborhood<R: Rng>(&self, _: &u8, _rng: &mut R) -> Vec<u8> {
            Vec::new()
        }
    }

    fn stepped(config: &AnnealConfig, steps: u32) -> StepClock {
        StepClock::new(config.budget() / steps)
    }

    fn small_config() -> AnnealConfig {
        AnnealConfig::default()
            .with_start_temperature(50.0)
            .with_final_temperature(0.01)
            .with_deadline(Duration::from_secs(1))
            .with_history_interval(10)
            .with_seed(42)
    }

    #[test]
    fn test_line_reaches_minimum() {
        let config = small_config();
        let mut clock = stepped(&config, 5_000);
        let result = Annealer::run_with_clock(&LineProblem, 200, &config, &mut clock).expect("valid config");

        assert!(
            result.best_cost < 1e-10,
            "expected zero cost, got {}",
            result.best_cost
        );
        assert!((result.initial_cost - 200.0).abs() < 1e-10);
        assert!(result.improving_moves > 0);
        assert!(result.improvement() > 199.0);
    }

    #[test]
    fn test_stops_at_budget() {
        let config = small_config();
        let mut clock = stepped(&config, 300);
        let result = Annealer::run_with_clock(&LineProblem, 10, &config, &mut clock).expect("valid config");
        assert!(
            (299..=301).contains(&result.iterations),
            "expected about 300 iterations, got {}",
            result.iterations
        );
        assert!(result.elapsed >= config.budget());
    }

    #[test]
    fn test_max_iterations_limit() {
        let config = small_config().with_max_iterations(40);
        let mut clock = stepped(&config, 10_000);
        let result = Annealer::run_with_clock(&LineProblem, 10, &config, &mut clock).expect("valid config");
        assert_eq!(result.iterations, 40);
    }

    #[test]
    fn test_restarts_follow_temperature_drops() {
        // 50 -> 0.01 spans a factor of 5000; restart every 4x drop gives 6 restarts.
        let config = small_config();
        let mut clock = stepped(&config, 1_000);
        let result = Annealer::run_with_clock(&LineProblem, 30, &config, &mut clock).expect("valid config");
        assert_eq!(result.restarts, 6);
        assert!((result.final_temperature - 0.01).abs() < 1e-6);
    }

    #[test]
    fn test_empty_neighborhood_is_skipped() {
        let config = small_config();
        let mut clock = stepped(&config, 200);
        let result = Annealer::run_with_clock(&Frozen, 0, &config, &mut clock).expect("valid config");
        assert!(result.skipped_iterations > 0);
        assert!(result.skipped_iterations < result.iterations);
        assert_eq!(result.improving_moves, 0);
        assert!((result.best_cost - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_cost_history_non_increasing() {
        let config = small_config();
        let mut clock = stepped(&config, 2_000);
        let result = Annealer::run_with_clock(&LineProblem, 500, &config, &mut clock).expect("valid config");

        assert!(result.cost_history.len() > 2);
        assert!((result.cost_history[0] - 500.0).abs() < 1e-10);
        for window in result.cost_history.windows(2) {
            assert!(
                window[1] <= window[0] + 1e-10,
                "best cost history should be non-increasing: {} > {}",
                window[1],
                window[0]
            );
        }
        assert!((result.cost_history.last().copied().unwrap_or(f64::NAN) - result.best_cost).abs() < 1e-10);
    }

    #[test]
    fn test_same_seed_same_result() {
        let config = small_config();
        let a = Annealer::run_with_clock(&LineProblem, 77, &config, &mut stepped(&config, 500)).expect("valid config");
        let b = Annealer::run_with_clock(&LineProblem, 77, &config, &mut stepped(&config, 500)).expect("valid config");
        assert_eq!(a.best, b.best);
        assert_eq!(a.iterations, b.iterations);
        assert_eq!(a.accepted_moves, b.accepted_moves);
        assert_eq!(a.cost_history, b.cost_history);
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let config = small_config().with_secure_factor(1.5);
        let err = Annealer::run_with_clock(&LineProblem, 0, &config, &mut StepClock::new(Duration::from_millis(1))).unwrap_err();
        assert!(matches!(err, PlanError::InvalidConfig(_)));
    }

    #[test]
    fn test_high_temperature_accepts_uphill() {
        let config = AnnealConfig::default()
            .with_start_temperature(1e8)
            .with_final_temperature(1e7)
            .with_deadline(Duration::from_secs(1))
            .with_seed(42);
        let mut clock = stepped(&config, 1_000);
        let result = Annealer::run_with_clock(&LineProblem, 0, &config, &mut clock).expect("valid config");

        let acceptance_ratio = result.accepted_moves as f64 / result.iterations as f64;
        assert!(
            acceptance_ratio > 0.8,
            "expected high acceptance at high temp, got {acceptance_ratio}"
        );
    }
}
