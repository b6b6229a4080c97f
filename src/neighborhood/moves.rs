//! The two move families, applied in place to action chains.
//!
//! Callers pass clones; a move that reports infeasibility leaves its
//! chains in an arbitrary (but structurally sound) state and the clones
//! are expected to be dropped.

use crate::model::TaskId;
use crate::schedule::ActionChain;

/// Result of a reorder move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The chain changed and is feasible.
    Applied,
    /// The requested placement is the current one; nothing was touched.
    Unchanged,
    /// The move broke a capacity constraint or did not apply to the chain.
    Infeasible,
}

/// Moves the first task of `from` to the head of `to`.
///
/// The task's pickup and delivery are removed from `from` and inserted,
/// pickup then delivery, as the first two actions of `to`. Both chains
/// are recomputed. Returns `false` if `from` is empty or either chain is
/// infeasible afterwards.
pub fn relocate_first_task(from: &mut ActionChain, to: &mut ActionChain, from_capacity: u32, to_capacity: u32) -> bool {
    let Some(task_id) = from.first_task().map(|t| t.id) else {
        return false;
    };
    let Some((p, d)) = from.find_task(task_id) else {
        return false;
    };
    let (Some(delivery), Some(pickup)) = (from.remove(d), from.remove(p)) else {
        return false;
    };

    let head = to.head();
    let pickup = to.insert_after(head, pickup);
    to.insert_after(pickup, delivery);

    let source_ok = from.recompute_and_validate(from_capacity);
    let target_ok = to.recompute_and_validate(to_capacity);
    source_ok && target_ok
}

/// Places a task's pickup at `pickup_position` and its delivery at
/// `delivery_position` (1-based, in the resulting chain).
///
/// Requires `1 <= pickup_position < delivery_position <= chain.len()` and
/// up-to-date positions. Out-of-range positions or an unknown task yield
/// [`MoveOutcome::Infeasible`] without touching the chain.
pub fn reorder_task(
    chain: &mut ActionChain,
    task_id: TaskId,
    pickup_position: usize,
    delivery_position: usize,
    capacity: u32,
) -> MoveOutcome {
    if pickup_position == 0 || pickup_position >= delivery_position || delivery_position > chain.len() {
        return MoveOutcome::Infeasible;
    }
    let Some((p, d)) = chain.find_task(task_id) else {
        return MoveOutcome::Infeasible;
    };
    let current = (
        chain.node(p).map(|n| n.position()),
        chain.node(d).map(|n| n.position()),
    );
    if current == (Some(pickup_position), Some(delivery_position)) {
        return MoveOutcome::Unchanged;
    }

    let (Some(delivery), Some(pickup)) = (chain.remove(d), chain.remove(p)) else {
        return MoveOutcome::Infeasible;
    };
    let Some(anchor) = chain.node_at(pickup_position - 1) else {
        return MoveOutcome::Infeasible;
    };
    let mut anchor = chain.insert_after(anchor, pickup);
    for _ in pickup_position..(delivery_position - 1) {
        match chain.next(anchor) {
            Some(next) => anchor = next,
            None => return MoveOutcome::Infeasible,
        }
    }
    chain.insert_after(anchor, delivery);

    if chain.recompute_and_validate(capacity) {
        MoveOutcome::Applied
    } else {
        MoveOutcome::Infeasible
    }
}
