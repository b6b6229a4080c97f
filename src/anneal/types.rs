//! Core trait for the annealing search.

use rand::Rng;

/// A minimization problem searched by the [`Annealer`](super::Annealer).
///
/// Besides single random moves, the problem offers a full local
/// neighborhood; the annealer alternates between the two, favoring random
/// moves early in the run and neighborhood scans late.
///
/// # Examples
///
/// ```ignore
/// struct Line;
///
/// impl AnnealingProblem for Line {
///     type Solution = i64;
///
///     fn cost(&self, x: &i64) -> f64 {
///         (*x as f64).abs()
///     }
///
///     fn random_neighbor<R: Rng>(&self, x: &i64, rng: &mut R) -> i64 {
///         x + rng.random_range(-3..=3)
///     }
///
///     fn neighborhood<R: Rng>(&self, x: &i64, _rng: &mut R) -> Vec<i64> {
///         vec![x - 1, x + 1]
///     }
/// }
/// ```
pub trait AnnealingProblem {
    /// The solution representation type.
    type Solution: Clone;

    /// Computes the cost of a solution. Lower is better.
    fn cost(&self, solution: &Self::Solution) -> f64;

    /// One random neighbor. May return a copy of `solution` when no move
    /// applies.
    fn random_neighbor<R: Rng>(&self, solution: &Self::Solution, rng: &mut R) -> Self::Solution;

    /// All neighbors around a randomly chosen focus. May be empty.
    fn neighborhood<R: Rng>(&self, solution: &Self::Solution, rng: &mut R) -> Vec<Self::Solution>;
}
