//! Shortest-path oracle over a static city graph.

use super::CityId;
use crate::error::PlanError;

/// Pairwise distances and concrete shortest paths between cities.
///
/// The planner never searches the graph itself; it only asks this oracle.
/// Implementations are expected to be precomputed and cheap to query.
pub trait CityGraph {
    /// Shortest-path distance from `from` to `to`.
    ///
    /// Unreachable pairs return `f64::INFINITY`.
    fn distance(&self, from: CityId, to: CityId) -> f64;

    /// Cities visited on a shortest path, excluding `from` and including
    /// `to`. Empty when `from == to` or `to` is unreachable.
    fn path(&self, from: CityId, to: CityId) -> Vec<CityId>;
}

/// Dense all-pairs shortest-path table built with Floyd-Warshall.
///
/// # Examples
///
/// ```
/// use u_pdp::model::{CityGraph, Topology};
///
/// // 0 --3-- 1 --4-- 2
/// let topology = Topology::from_edges(3, &[(0, 1, 3.0), (1, 2, 4.0)]).unwrap();
/// assert!((topology.distance(0, 2) - 7.0).abs() < 1e-10);
/// assert_eq!(topology.path(0, 2), vec![1, 2]);
/// ```
#[derive(Debug, Clone)]
pub struct Topology {
    n: usize,
    dist: Vec<f64>,
    next_hop: Vec<Option<CityId>>,
}

impl Topology {
    /// Builds the table from undirected weighted edges.
    ///
    /// Parallel edges keep the shortest length. Fails with
    /// [`PlanError::UnknownCity`] if an edge endpoint is `>= num_cities`.
    pub fn from_edges(num_cities: usize, edges: &[(CityId, CityId, f64)]) -> Result<Self, PlanError> {
        let n = num_cities;
        let mut dist = vec![f64::INFINITY; n * n];
        let mut next_hop = vec![None; n * n];

        for c in 0..n {
            dist[c * n + c] = 0.0;
            next_hop[c * n + c] = Some(c);
        }

        for &(a, b, length) in edges {
            if a >= n {
                return Err(PlanError::UnknownCity(a));
            }
            if b >= n {
                return Err(PlanError::UnknownCity(b));
            }
            if length < dist[a * n + b] {
                dist[a * n + b] = length;
                dist[b * n + a] = length;
                next_hop[a * n + b] = Some(b);
                next_hop[b * n + a] = Some(a);
            }
        }

        for k in 0..n {
            for i in 0..n {
                let ik = dist[i * n + k];
                if ik.is_infinite() {
                    continue;
                }
                for j in 0..n {
                    let through = ik + dist[k * n + j];
                    if through < dist[i * n + j] {
                        dist[i * n + j] = through;
                        next_hop[i * n + j] = next_hop[i * n + k];
                    }
                }
            }
        }

        Ok(Self { n, dist, next_hop })
    }

    /// Number of cities.
    pub fn num_cities(&self) -> usize {
        self.n
    }
}

impl CityGraph for Topology {
    fn distance(&self, from: CityId, to: CityId) -> f64 {
        if from >= self.n || to >= self.n {
            return f64::INFINITY;
        }
        self.dist[from * self.n + to]
    }

    fn path(&self, from: CityId, to: CityId) -> Vec<CityId> {
        let mut path = Vec::new();
        if from >= self.n || to >= self.n || from == to {
            return path;
        }
        let mut at = from;
        while at != to {
            match self.next_hop[at * self.n + to] {
                Some(hop) => {
                    path.push(hop);
                    at = hop;
                }
                None => return Vec::new(),
            }
        }
        path
    }
}
