//! Transport tasks.

/// Index of a city in the topology.
pub type CityId = usize;

/// Identifier of a task.
pub type TaskId = usize;

/// A pickup-and-delivery request.
///
/// Tasks are immutable once created and shared by reference (`Arc<Task>`)
/// between schedules; cloning a schedule never copies a task.
///
/// # Examples
///
/// ```
/// use u_pdp::model::Task;
///
/// let task = Task::new(7, 0, 3, 4).with_reward(1200.0);
/// assert_eq!(task.id, 7);
/// assert_eq!(task.weight, 4);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Task {
    /// Task identifier, unique within one planning instance.
    pub id: TaskId,
    /// City where the cargo is collected.
    pub pickup_city: CityId,
    /// City where the cargo is dropped off.
    pub delivery_city: CityId,
    /// Cargo weight, in the same unit as vehicle capacity.
    pub weight: u32,
    /// Payment for completing the task.
    pub reward: f64,
}

impl Task {
    /// Creates a task with zero reward.
    pub fn new(id: TaskId, pickup_city: CityId, delivery_city: CityId, weight: u32) -> Self {
        Self {
            id,
            pickup_city,
            delivery_city,
            weight,
            reward: 0.0,
        }
    }

    pub fn with_reward(mut self, reward: f64) -> Self {
        self.reward = reward;
        self
    }
}
