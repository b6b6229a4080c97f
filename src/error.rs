//! Error types.

use thiserror::Error;

use crate::model::{CityId, TaskId};

/// Errors raised by planning entry points.
///
/// Infeasible candidate moves are not errors: neighborhood moves and
/// insertion probes report them through return values and are dropped.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanError {
    /// The fleet is empty.
    #[error("at least one vehicle is required")]
    NoVehicles,

    /// A task is heavier than every vehicle can carry. No feasible
    /// schedule exists for the instance.
    #[error("infeasible instance: task {task_id} weighs {weight} but the largest capacity is {max_capacity}")]
    InfeasibleInstance {
        task_id: TaskId,
        weight: u32,
        max_capacity: u32,
    },

    /// A configuration struct failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A schedule supplied by the caller breaks a structural invariant.
    #[error("invalid schedule: {0}")]
    InvalidSchedule(#[from] ScheduleViolation),

    /// The task is already scheduled.
    #[error("task {0} is already part of the schedule")]
    DuplicateTask(TaskId),

    /// The schedule references a task that is not in the supplied task set.
    #[error("task {0} is not part of the task set")]
    UnknownTask(TaskId),

    /// A city index is outside the topology.
    #[error("city {0} is outside the topology")]
    UnknownCity(CityId),

    /// The quote was computed against an older committed schedule.
    #[error("quote was computed on revision {quoted}, ledger is at revision {current}")]
    StaleQuote { quoted: u64, current: u64 },

    /// The quote carries no candidate schedule; the task cannot be carried.
    #[error("task {0} cannot be inserted into the committed schedule")]
    InfeasibleQuote(TaskId),
}

/// A broken structural invariant found by [`crate::schedule::ActionChain::audit`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleViolation {
    /// A task has a pickup without a delivery, or the reverse.
    #[error("vehicle {vehicle}: task {task_id} is missing its pickup or delivery")]
    UnpairedTask { vehicle: usize, task_id: TaskId },

    /// A task has two pickups or two deliveries.
    #[error("vehicle {vehicle}: task {task_id} appears more than once")]
    DuplicateAction { vehicle: usize, task_id: TaskId },

    /// The delivery of a task precedes its pickup.
    #[error("vehicle {vehicle}: task {task_id} is delivered before it is picked up")]
    DeliveryBeforePickup { vehicle: usize, task_id: TaskId },

    /// The load exceeds the vehicle capacity.
    #[error("vehicle {vehicle}: load {load} exceeds capacity {capacity} at position {position}")]
    CapacityExceeded {
        vehicle: usize,
        position: usize,
        load: u32,
        capacity: u32,
    },

    /// More weight is delivered than has been picked up.
    #[error("vehicle {vehicle}: load drops below zero at position {position}")]
    NegativeLoad { vehicle: usize, position: usize },

    /// The chain ends with cargo still on board.
    #[error("vehicle {vehicle}: chain ends with load {load}")]
    NonZeroTrailingLoad { vehicle: usize, load: u32 },

    /// A stored position or load disagrees with a fresh recomputation.
    #[error("vehicle {vehicle}: stale bookkeeping at position {expected}")]
    PositionGap { vehicle: usize, expected: usize },

    /// A task appears in more than one vehicle chain.
    #[error("task {task_id} is scheduled on more than one vehicle")]
    SharedTask { task_id: TaskId },
}
