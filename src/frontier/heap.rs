use super::index::PositionIndex;
use crate::error::SearchError;

const INITIAL_CAPACITY: usize = 100;

#[derive(Debug, Clone)]
struct HeapNode<K, T> {
    priority: f64,
    key: K,
    item: T,
}

/// What `push_or_improve` did with the offered item.
///
/// Any item handed back is owned by the caller again.
#[derive(Debug, PartialEq)]
pub enum PushOutcome<T> {
    /// The key was new and the item is now queued.
    Accepted,
    /// The key was queued with a worse priority; the old item was evicted.
    Displaced(T),
    /// The key was queued with an equal or better priority; nothing changed.
    Rejected(T),
}

impl<T> PushOutcome<T> {
    /// The item the caller must dispose of, if any.
    pub fn into_returned(self) -> Option<T> {
        match self {
            PushOutcome::Accepted => None,
            PushOutcome::Displaced(item) | PushOutcome::Rejected(item) => Some(item),
        }
    }
}

/// Binary min-heap with a position index for decrease-key by key identity.
///
/// Between public calls every queued key has exactly one index entry, and that
/// entry holds the key's current slot. Order among equal priorities depends on
/// array layout and is not specified.
#[derive(Debug)]
pub struct IndexedPriorityQueue<K, T> {
    nodes: Vec<HeapNode<K, T>>,
    /// Slot budget, doubled whenever a push finds it full.
    capacity: usize,
    index: PositionIndex<K, usize>,
}

impl<K: Clone, T> IndexedPriorityQueue<K, T> {
    /// Takes an empty index; the queue owns it from here on.
    pub fn new(index: PositionIndex<K, usize>) -> Self {
        debug_assert!(index.is_empty());
        IndexedPriorityQueue {
            nodes: Vec::with_capacity(INITIAL_CAPACITY),
            capacity: INITIAL_CAPACITY,
            index,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Slots available before the next doubling. Tracked here rather than
    /// read from the `Vec`, whose own capacity may round up.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn contains(&self, key: &K) -> bool {
        self.index.contains(key)
    }

    /// Current priority queued under `key`.
    pub fn priority_of(&self, key: &K) -> Option<f64> {
        self.index.get(key).map(|&slot| self.nodes[slot].priority)
    }

    pub fn peek_min_priority(&self) -> Result<f64, SearchError> {
        self.nodes
            .first()
            .map(|node| node.priority)
            .ok_or(SearchError::EmptyQueue)
    }

    /// Queues `item` under `key`, or lowers the priority of the entry already
    /// queued under an equal key. Priorities must be finite.
    pub fn push_or_improve(&mut self, key: K, item: T, priority: f64) -> PushOutcome<T> {
        debug_assert!(priority.is_finite(), "non-finite priority {priority}");
        if let Some(&slot) = self.index.get(&key) {
            if priority >= self.nodes[slot].priority {
                return PushOutcome::Rejected(item);
            }

            let old = std::mem::replace(
                &mut self.nodes[slot],
                HeapNode {
                    priority,
                    key: key.clone(),
                    item,
                },
            );
            self.index.pop(&old.key);
            self.index.set(key, slot);
            self.sift_up(slot);
            return PushOutcome::Displaced(old.item);
        }

        if self.nodes.len() >= self.capacity {
            self.capacity *= 2;
            self.nodes.reserve_exact(self.capacity - self.nodes.len());
        }

        let slot = self.nodes.len();
        self.index.set(key.clone(), slot);
        self.nodes.push(HeapNode {
            priority,
            key,
            item,
        });
        self.sift_up(slot);
        PushOutcome::Accepted
    }

    pub fn pop_min(&mut self) -> Result<T, SearchError> {
        if self.nodes.is_empty() {
            return Err(SearchError::EmptyQueue);
        }

        let root = self.nodes.swap_remove(0);
        self.index.pop(&root.key);

        if let Some(moved) = self.nodes.first() {
            self.index.set(moved.key.clone(), 0);
            self.sift_down(0);
        }
        Ok(root.item)
    }

    /// Empties the queue, handing back every item still queued.
    pub fn drain(&mut self) -> Vec<T> {
        for node in &self.nodes {
            self.index.pop(&node.key);
        }
        self.nodes.drain(..).map(|node| node.item).collect()
    }

    fn sift_up(&mut self, mut pos: usize) {
        while pos > 0 {
            let parent = (pos - 1) / 2;
            if self.nodes[pos].priority >= self.nodes[parent].priority {
                break;
            }
            self.swap_nodes(pos, parent);
            pos = parent;
        }
    }

    fn sift_down(&mut self, mut pos: usize) {
        let len = self.nodes.len();
        loop {
            let left = 2 * pos + 1;
            let right = left + 1;
            if left >= len {
                break;
            }

            let child = if right < len && self.nodes[right].priority < self.nodes[left].priority {
                right
            } else {
                left
            };
            if self.nodes[pos].priority <= self.nodes[child].priority {
                break;
            }
            self.swap_nodes(pos, child);
            pos = child;
        }
    }

    fn swap_nodes(&mut self, a: usize, b: usize) {
        self.nodes.swap(a, b);
        self.index.set(self.nodes[a].key.clone(), a);
        self.index.set(self.nodes[b].key.clone(), b);
    }
}
