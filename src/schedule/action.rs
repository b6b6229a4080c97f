//! Pickup and delivery actions.

use std::sync::Arc;

use crate::model::{CityId, Task, TaskId};

/// Whether an action loads or unloads its task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionKind {
    Pickup,
    Delivery,
}

/// One pickup or delivery event for a task.
///
/// Holds a shared reference to the task; cloning an action bumps the
/// reference count and never copies the task itself.
#[derive(Debug, Clone)]
pub struct Action {
    task: Arc<Task>,
    kind: ActionKind,
}

impl Action {
    pub fn pickup(task: Arc<Task>) -> Self {
        Self {
            task,
            kind: ActionKind::Pickup,
        }
    }

    pub fn delivery(task: Arc<Task>) -> Self {
        Self {
            task,
            kind: ActionKind::Delivery,
        }
    }

    pub fn task(&self) -> &Arc<Task> {
        &self.task
    }

    pub fn task_id(&self) -> TaskId {
        self.task.id
    }

    pub fn kind(&self) -> ActionKind {
        self.kind
    }

    pub fn is_pickup(&self) -> bool {
        self.kind == ActionKind::Pickup
    }

    /// City where the action takes place.
    pub fn city(&self) -> CityId {
        match self.kind {
            ActionKind::Pickup => self.task.pickup_city,
            ActionKind::Delivery => self.task.delivery_city,
        }
    }

    /// Replaces the task reference with another task carrying the same id.
    pub(crate) fn rebind(&mut self, task: Arc<Task>) {
        debug_assert_eq!(task.id, self.task.id);
        self.task = task;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_city_follows_kind() {
        let task = Arc::new(Task::new(3, 1, 4, 2));
        assert_eq!(Action::pickup(task.clone()).city(), 1);
        assert_eq!(Action::delivery(task.clone()).city(), 4);
    }

    #[test]
    fn test_clone_shares_task() {
        let task = Arc::new(Task::new(3, 1, 4, 2));
        let a = Action::pickup(task.clone());
        let b = a.clone();
        assert!(Arc::ptr_eq(a.task(), b.task()));
        assert_eq!(Arc::strong_count(&task), 3);
    }
}
