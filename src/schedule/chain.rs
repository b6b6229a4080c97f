//! Per-vehicle action chain.
//!
//! The chain is a doubly linked list stored in an arena: nodes live in a
//! `Vec` and link to each other by index. Slot 0 is the sentinel head
//! (position 0, load 0, no action) and is never removed. Cloning a chain
//! copies the arena in one allocation; actions keep sharing their tasks.
//!
//! Structural mutations (`insert_after`, `remove`) are O(1) and leave
//! positions and loads stale. Every mutator must be followed by
//! [`ActionChain::recompute_and_validate`], which is the single
//! feasibility check of the crate.

use std::collections::HashMap;
use std::sync::Arc;

use super::action::{Action, ActionKind};
use crate::error::ScheduleViolation;
use crate::model::{CityGraph, CityId, Task, TaskId};

/// Index of a node inside one chain's arena.
///
/// Only meaningful for the chain (or a clone of the chain) that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// A node of the chain: the sentinel or one action.
#[derive(Debug, Clone)]
pub struct ActionNode {
    action: Option<Action>,
    position: usize,
    load: u32,
    prev: Option<NodeId>,
    next: Option<NodeId>,
    live: bool,
}

impl ActionNode {
    fn sentinel() -> Self {
        Self {
            action: None,
            position: 0,
            load: 0,
            prev: None,
            next: None,
            live: true,
        }
    }

    /// The action, or `None` for the sentinel.
    pub fn action(&self) -> Option<&Action> {
        self.action.as_ref()
    }

    /// 1-based position in the chain as of the last recomputation.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Load on board after this action as of the last recomputation.
    pub fn load(&self) -> u32 {
        self.load
    }
}

/// Ordered pickup/delivery actions of one vehicle.
#[derive(Debug, Clone)]
pub struct ActionChain {
    vehicle: usize,
    nodes: Vec<ActionNode>,
    free: Vec<usize>,
    len: usize,
}

impl ActionChain {
    /// Creates an empty chain holding only the sentinel.
    pub fn new(vehicle: usize) -> Self {
        Self {
            vehicle,
            nodes: vec![ActionNode::sentinel()],
            free: Vec::new(),
            len: 0,
        }
    }

    /// Schedule index of the owning vehicle.
    pub fn vehicle(&self) -> usize {
        self.vehicle
    }

    /// Number of actions (the sentinel is not counted).
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of tasks carried by this chain.
    pub fn task_count(&self) -> usize {
        self.len / 2
    }

    /// The sentinel node.
    pub fn head(&self) -> NodeId {
        NodeId(0)
    }

    /// Returns the node if it is live in this chain.
    pub fn node(&self, id: NodeId) -> Option<&ActionNode> {
        self.nodes.get(id.0).filter(|n| n.live)
    }

    /// Splices a new action immediately after `anchor`.
    ///
    /// # Panics
    ///
    /// Panics if `anchor` is not a live node of this chain.
    pub fn insert_after(&mut self, anchor: NodeId, action: Action) -> NodeId {
        assert!(
            self.node(anchor).is_some(),
            "anchor {anchor:?} is not a live node of chain {}",
            self.vehicle
        );
        let next = self.nodes[anchor.0].next;
        let position = self.nodes[anchor.0].position + 1;
        let node = ActionNode {
            action: Some(action),
            position,
            load: 0,
            prev: Some(anchor),
            next,
            live: true,
        };

        let id = match self.free.pop() {
            Some(slot) => {
                self.nodes[slot] = node;
                NodeId(slot)
            }
            None => {
                self.nodes.push(node);
                NodeId(self.nodes.len() - 1)
            }
        };

        self.nodes[anchor.0].next = Some(id);
        if let Some(n) = next {
            self.nodes[n.0].prev = Some(id);
        }
        self.len += 1;
        id
    }

    /// Appends an action after the last node.
    pub fn push_back(&mut self, action: Action) -> NodeId {
        let tail = self.tail();
        self.insert_after(tail, action)
    }

    /// Unlinks a node and returns its action.
    ///
    /// Returns `None` for the sentinel or for a node that is not live.
    pub fn remove(&mut self, id: NodeId) -> Option<Action> {
        if id == self.head() || self.node(id).is_none() {
            return None;
        }
        let prev = self.nodes[id.0].prev;
        let next = self.nodes[id.0].next;
        if let Some(p) = prev {
            self.nodes[p.0].next = next;
        }
        if let Some(n) = next {
            self.nodes[n.0].prev = prev;
        }

        let node = &mut self.nodes[id.0];
        node.live = false;
        node.prev = None;
        node.next = None;
        self.free.push(id.0);
        self.len -= 1;
        node.action.take()
    }

    /// Walks the chain from the sentinel, renumbering positions and
    /// recomputing loads.
    ///
    /// Returns `false` if the load exceeds `capacity` at any node, drops
    /// below zero, or is non-zero after the last action. The walk always
    /// completes, so positions are valid even when the result is `false`.
    pub fn recompute_and_validate(&mut self, capacity: u32) -> bool {
        let mut valid = true;
        let mut position = 0usize;
        let mut load = 0u32;
        let mut cursor = self.nodes[0].next;

        while let Some(id) = cursor {
            position += 1;
            let node = &mut self.nodes[id.0];
            if let Some(action) = &node.action {
                let weight = action.task().weight;
                load = match action.kind() {
                    ActionKind::Pickup => load.saturating_add(weight),
                    ActionKind::Delivery => match load.checked_sub(weight) {
                        Some(l) => l,
                        None => {
                            valid = false;
                            0
                        }
                    },
                };
            }
            if load > capacity {
                valid = false;
            }
            node.position = position;
            node.load = load;
            cursor = node.next;
        }

        valid && load == 0
    }

    /// Iterates over the action nodes in chain order, skipping the sentinel.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            chain: self,
            cursor: self.nodes[0].next,
        }
    }

    /// Iterates over the actions in chain order.
    pub fn actions(&self) -> impl Iterator<Item = &Action> + '_ {
        self.iter().filter_map(|(_, node)| node.action())
    }

    /// Successor of a live node.
    pub fn next(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.next)
    }

    /// Last node of the chain (the sentinel if empty).
    pub fn tail(&self) -> NodeId {
        let mut id = self.head();
        while let Some(next) = self.nodes[id.0].next {
            id = next;
        }
        id
    }

    /// Node at the given position; position 0 is the sentinel.
    pub fn node_at(&self, position: usize) -> Option<NodeId> {
        let mut id = self.head();
        for _ in 0..position {
            id = self.nodes[id.0].next?;
        }
        Some(id)
    }

    /// Pickup and delivery nodes of a task, if both are present.
    pub fn find_task(&self, task_id: TaskId) -> Option<(NodeId, NodeId)> {
        let mut pickup = None;
        for (id, node) in self.iter() {
            let Some(action) = node.action() else {
                continue;
            };
            if action.task_id() != task_id {
                continue;
            }
            match action.kind() {
                ActionKind::Pickup => pickup = Some(id),
                ActionKind::Delivery => return pickup.map(|p| (p, id)),
            }
        }
        None
    }

    /// Task of the first action in the chain.
    pub fn first_task(&self) -> Option<&Arc<Task>> {
        self.actions().next().map(|a| a.task())
    }

    /// Whether any action of the chain belongs to the task.
    pub fn contains_task(&self, task_id: TaskId) -> bool {
        self.actions().any(|a| a.task_id() == task_id)
    }

    /// Load after the last action as of the last recomputation.
    pub fn trailing_load(&self) -> u32 {
        self.nodes[self.tail().0].load
    }

    /// Distance travelled from `home` through every action city in order.
    pub fn total_distance<G: CityGraph>(&self, home: CityId, graph: &G) -> f64 {
        let mut at = home;
        let mut distance = 0.0;
        for action in self.actions() {
            let city = action.city();
            distance += graph.distance(at, city);
            at = city;
        }
        distance
    }

    /// Travel cost of the chain: distance times cost per distance.
    pub fn total_cost<G: CityGraph>(&self, home: CityId, cost_per_distance: f64, graph: &G) -> f64 {
        self.total_distance(home, graph) * cost_per_distance
    }

    /// Sequence of `(task id, kind)` in chain order.
    pub fn signature(&self) -> Vec<(TaskId, ActionKind)> {
        self.actions().map(|a| (a.task_id(), a.kind())).collect()
    }

    /// Re-checks every structural invariant from scratch.
    ///
    /// Unlike [`recompute_and_validate`](Self::recompute_and_validate), this
    /// does not trust or update stored bookkeeping: it also verifies that
    /// every task is paired, pickups precede deliveries, and the stored
    /// positions and loads match a fresh walk.
    pub fn audit(&self, capacity: u32) -> Result<(), ScheduleViolation> {
        let vehicle = self.vehicle;
        let mut seen: HashMap<TaskId, (bool, bool)> = HashMap::new();
        let mut load: i64 = 0;
        let mut expected = 0usize;

        for (_, node) in self.iter() {
            expected += 1;
            let Some(action) = node.action() else {
                return Err(ScheduleViolation::PositionGap { vehicle, expected });
            };
            let task_id = action.task_id();
            let entry = seen.entry(task_id).or_insert((false, false));
            match action.kind() {
                ActionKind::Pickup => {
                    if entry.0 {
                        return Err(ScheduleViolation::DuplicateAction { vehicle, task_id });
                    }
                    entry.0 = true;
                    load += i64::from(action.task().weight);
                }
                ActionKind::Delivery => {
                    if entry.1 {
                        return Err(ScheduleViolation::DuplicateAction { vehicle, task_id });
                    }
                    if !entry.0 {
                        return Err(ScheduleViolation::DeliveryBeforePickup { vehicle, task_id });
                    }
                    entry.1 = true;
                    load -= i64::from(action.task().weight);
                }
            }

            if load < 0 {
                return Err(ScheduleViolation::NegativeLoad {
                    vehicle,
                    position: expected,
                });
            }
            if load > i64::from(capacity) {
                return Err(ScheduleViolation::CapacityExceeded {
                    vehicle,
                    position: expected,
                    load: u32::try_from(load).unwrap_or(u32::MAX),
                    capacity,
                });
            }
            if node.position() != expected || i64::from(node.load()) != load {
                return Err(ScheduleViolation::PositionGap { vehicle, expected });
            }
        }

        if expected != self.len {
            return Err(ScheduleViolation::PositionGap { vehicle, expected });
        }
        if let Some((&task_id, _)) = seen.iter().find(|(_, &(p, d))| !(p && d)) {
            return Err(ScheduleViolation::UnpairedTask { vehicle, task_id });
        }
        if load != 0 {
            return Err(ScheduleViolation::NonZeroTrailingLoad {
                vehicle,
                load: u32::try_from(load).unwrap_or(u32::MAX),
            });
        }
        Ok(())
    }

    /// Swaps every task reference for the task with the same id in `lookup`.
    pub(crate) fn rebind_tasks(&mut self, lookup: &HashMap<TaskId, Arc<Task>>) -> Result<(), TaskId> {
        for node in self.nodes.iter_mut().filter(|n| n.live) {
            if let Some(action) = node.action.as_mut() {
                match lookup.get(&action.task_id()) {
                    Some(task) => action.rebind(Arc::clone(task)),
                    None => return Err(action.task_id()),
                }
            }
        }
        Ok(())
    }
}

/// Iterator over the nodes of an [`ActionChain`] in chain order.
pub struct Iter<'a> {
    chain: &'a ActionChain,
    cursor: Option<NodeId>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (NodeId, &'a ActionNode);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.cursor?;
        let node = &self.chain.nodes[id.0];
        self.cursor = node.next;
        Some((id, node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{line_topology, task};
    use proptest::prelude::*;

    fn two_task_chain() -> (ActionChain, Arc<Task>, Arc<Task>) {
        let a = task(0, 1, 3, 4);
        let b = task(1, 2, 4, 5);
        let mut chain = ActionChain::new(0);
        chain.push_back(Action::pickup(a.clone()));
        chain.push_back(Action::pickup(b.clone()));
        chain.push_back(Action::delivery(a.clone()));
        chain.push_back(Action::delivery(b.clone()));
        (chain, a, b)
    }

    #[test]
    fn test_empty_chain() {
        let mut chain = ActionChain::new(3);
        assert!(chain.is_empty());
        assert_eq!(chain.vehicle(), 3);
        assert_eq!(chain.tail(), chain.head());
        assert!(chain.recompute_and_validate(0));
        assert!(chain.audit(0).is_ok());
    }

    #[test]
    fn test_recompute_positions_and_loads() {
        let (mut chain, _, _) = two_task_chain();
        assert!(chain.recompute_and_validate(10));
        let loads: Vec<u32> = chain.iter().map(|(_, n)| n.load()).collect();
        let positions: Vec<usize> = chain.iter().map(|(_, n)| n.position()).collect();
        assert_eq!(loads, vec![4, 9, 5, 0]);
        assert_eq!(positions, vec![1, 2, 3, 4]);
        assert!(chain.audit(10).is_ok());
    }

    #[test]
    fn test_capacity_violation_detected() {
        let (mut chain, _, _) = two_task_chain();
        assert!(!chain.recompute_and_validate(8));
        assert!(matches!(
            chain.audit(8),
            Err(ScheduleViolation::CapacityExceeded { position: 2, load: 9, .. })
        ));
    }

    #[test]
    fn test_trailing_load_must_be_zero() {
        let mut chain = ActionChain::new(0);
        chain.push_back(Action::pickup(task(0, 1, 2, 3)));
        assert!(!chain.recompute_and_validate(10));
        assert_eq!(chain.trailing_load(), 3);
    }

    #[test]
    fn test_delivery_before_pickup_rejected() {
        let t = task(0, 1, 2, 3);
        let mut chain = ActionChain::new(0);
        chain.push_back(Action::delivery(t.clone()));
        chain.push_back(Action::pickup(t));
        assert!(!chain.recompute_and_validate(10));
        assert!(matches!(
            chain.audit(10),
            Err(ScheduleViolation::DeliveryBeforePickup { task_id: 0, .. })
        ));
    }

    #[test]
    fn test_sentinel_is_not_removable() {
        let (mut chain, _, _) = two_task_chain();
        let head = chain.head();
        assert!(chain.remove(head).is_none());
        assert_eq!(chain.len(), 4);
    }

    #[test]
    fn test_remove_and_reinsert() {
        let (mut chain, a, _) = two_task_chain();
        let (p, d) = chain.find_task(a.id).expect("task present");
        let delivery = chain.remove(d).expect("live node");
        let pickup = chain.remove(p).expect("live node");
        assert!(chain.remove(p).is_none());
        assert_eq!(chain.len(), 2);

        let head = chain.head();
        let p = chain.insert_after(head, pickup);
        chain.insert_after(p, delivery);
        assert!(chain.recompute_and_validate(10));
        assert_eq!(
            chain.signature(),
            vec![
                (0, ActionKind::Pickup),
                (0, ActionKind::Delivery),
                (1, ActionKind::Pickup),
                (1, ActionKind::Delivery),
            ]
        );
        // Freed slots are reused.
        assert_eq!(chain.nodes.len(), 5);
    }

    #[test]
    fn test_node_at_walks_positions() {
        let (chain, _, b) = two_task_chain();
        assert_eq!(chain.node_at(0), Some(chain.head()));
        let id = chain.node_at(2).expect("in range");
        assert_eq!(chain.node(id).and_then(|n| n.action()).map(|a| a.task_id()), Some(b.id));
        assert_eq!(chain.node_at(5), None);
    }

    #[test]
    fn test_total_cost_walks_from_home() {
        let graph = line_topology(6);
        let (chain, _, _) = two_task_chain();
        // 0 -> 1 -> 2 -> 3 -> 4
        assert!((chain.total_distance(0, &graph) - 4.0).abs() < 1e-10);
        assert!((chain.total_cost(0, 2.5, &graph) - 10.0).abs() < 1e-10);
        assert_eq!(ActionChain::new(0).total_distance(5, &graph), 0.0);
    }

    #[test]
    fn test_clone_is_independent() {
        let (mut chain, a, _) = two_task_chain();
        chain.recompute_and_validate(10);
        let graph = line_topology(6);
        let copy = chain.clone();
        assert!((copy.total_cost(0, 1.0, &graph) - chain.total_cost(0, 1.0, &graph)).abs() < 1e-10);

        let (p, d) = chain.find_task(a.id).expect("task present");
        chain.remove(d);
        chain.remove(p);
        assert_eq!(copy.len(), 4);
        assert!(copy.audit(10).is_ok());
    }

    #[test]
    fn test_rebind_tasks() {
        let (mut chain, a, b) = two_task_chain();
        let lookup: HashMap<TaskId, Arc<Task>> = [
            (a.id, Arc::new(Task::new(a.id, 1, 3, 4).with_reward(50.0))),
            (b.id, Arc::new(Task::new(b.id, 2, 4, 5).with_reward(70.0))),
        ]
        .into_iter()
        .collect();
        assert!(chain.rebind_tasks(&lookup).is_ok());
        let reward: f64 = chain
            .actions()
            .filter(|a| a.is_pickup())
            .map(|a| a.task().reward)
            .sum();
        assert!((reward - 120.0).abs() < 1e-10);

        let partial: HashMap<TaskId, Arc<Task>> = [(a.id, a.clone())].into_iter().collect();
        assert_eq!(chain.rebind_tasks(&partial), Err(b.id));
    }

    proptest! {
        #[test]
        fn prop_chain_matches_vec_model(ops in proptest::collection::vec((any::<bool>(), 0usize..16), 1..60)) {
            let t = task(0, 0, 1, 0);
            let mut chain = ActionChain::new(0);
            let mut model: Vec<NodeId> = Vec::new();

            for (insert, index) in ops {
                if insert || model.is_empty() {
                    let at = index % (model.len() + 1);
                    let anchor = if at == 0 { chain.head() } else { model[at - 1] };
                    let id = chain.insert_after(anchor, Action::pickup(t.clone()));
                    model.insert(at, id);
                } else {
                    let at = index % model.len();
                    let id = model.remove(at);
                    prop_assert!(chain.remove(id).is_some());
                }
                chain.recompute_and_validate(u32::MAX);
            }

            let walked: Vec<NodeId> = chain.iter().map(|(id, _)| id).collect();
            prop_assert_eq!(&walked, &model);
            prop_assert_eq!(chain.len(), model.len());
            for (i, (_, node)) in chain.iter().enumerate() {
                prop_assert_eq!(node.position(), i + 1);
            }
        }
    }
}
