use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::types::EntityId;

/// Turn order. The entity at the front acts next.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    queue: VecDeque<EntityId>,
}

impl Schedule {
    pub fn new(order: impl IntoIterator<Item = EntityId>) -> Self {
        Self { queue: order.into_iter().collect() }
    }

    pub fn current(&self) -> Option<EntityId> {
        self.queue.front().copied()
    }

    /// Lets `entity` act before the current actor.
    pub fn push_front(&mut self, entity: EntityId) {
        self.queue.push_front(entity);
    }

    /// Ends the current actor's turn and queues its next one.
    pub fn reschedule(&mut self) {
        if let Some(entity) = self.queue.pop_front() {
            self.queue.push_back(entity);
        }
    }

    /// Ends the current actor's turn for good.
    pub fn unschedule(&mut self) -> Option<EntityId> {
        self.queue.pop_front()
    }

    pub fn contains(&self, entity: EntityId) -> bool {
        self.queue.contains(&entity)
    }

    pub fn iter(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.queue.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
