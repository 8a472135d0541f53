//! Fixed-capacity experience replay.
//!
//! Transitions are written into a ring of `capacity` slots: while the ring
//! is filling they are appended, afterwards slot `inserted % capacity` is
//! overwritten in place, so the memory always holds the most recent
//! `capacity` transitions.

use ndarray::Array1;
use rand::Rng;
use serde::{Serialize, Deserialize};

/// One recorded step of interaction with the environment.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub state: Array1<f32>,
    pub action: usize,
    pub reward: f32,
    pub next_state: Array1<f32>,
    pub is_terminal: bool,
}

impl Transition {
    pub fn new(state: Array1<f32>, action: usize, reward: f32, next_state: Array1<f32>, is_terminal: bool) -> Self {
        Transition { state, action, reward, next_state, is_terminal }
    }
}

#[derive(Clone, Debug)]
pub struct ReplayMemory {
    slots: Vec<Transition>,
    capacity: usize,
    inserted: usize,
}

impl ReplayMemory {
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "replay memory capacity must be greater than 0");
        ReplayMemory {
            // Large memories fill slowly; only reserve what a short run needs.
            slots: Vec::with_capacity(capacity.min(1 << 16)),
            capacity,
            inserted: 0,
        }
    }

    pub fn store(&mut self, transition: Transition) {
        if self.slots.len() < self.capacity {
            self.slots.push(transition);
        } else {
            let write_index = self.inserted % self.capacity;
            self.slots[write_index] = transition;
        }
        self.inserted += 1;
    }

    /// Draw `batch_size` transitions uniformly at random, with replacement.
    ///
    /// Panics if `batch_size` exceeds the number of stored transitions;
    /// callers only sample once the warm-up threshold has been passed.
    pub fn sample<R: Rng + ?Sized>(&self, batch_size: usize, rng: &mut R) -> Vec<&Transition> {
        assert!(
            batch_size <= self.size(),
            "cannot sample {} transitions from a memory holding {}",
            batch_size,
            self.size()
        );
        (0..batch_size)
            .map(|_| &self.slots[rng.gen_range(0..self.slots.len())])
            .collect()
    }

    /// Number of stored transitions, `min(inserted, capacity)`.
    pub fn size(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Total number of transitions ever stored, evicted ones included.
    pub fn inserted_count(&self) -> usize {
        self.inserted
    }

    /// Transition held in ring slot `index`.
    pub fn get(&self, index: usize) -> Option<&Transition> {
        self.slots.get(index)
    }

    /// The most recently stored transition.
    pub fn last(&self) -> Option<&Transition> {
        if self.inserted == 0 {
            return None;
        }
        self.slots.get((self.inserted - 1) % self.capacity)
    }

    /// Stored transitions from oldest to newest.
    pub fn iter_chronological(&self) -> impl Iterator<Item = &Transition> {
        let split = if self.slots.len() < self.capacity { 0 } else { self.inserted % self.capacity };
        self.slots[split..].iter().chain(self.slots[..split].iter())
    }
}
