// src/core/indexing/kdtree/queue.rs

//! Bounded ascending priority queue holding the K best neighbour candidates.

use std::cmp::Ordering;
use std::collections::VecDeque;

use super::error::KdTreeError;

/// A candidate neighbour: the owning image index and its squared distance to the query.
///
/// Ordered by distance first, then by owner index, so equal distances still
/// produce a single deterministic order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub owner: usize,
    pub distance: f64,
}

impl Neighbor {
    pub fn new(owner: usize, distance: f64) -> Self {
        debug_assert!(distance >= 0.0, "negative neighbour distance {distance}");
        Self { owner, distance }
    }
}

impl Eq for Neighbor {}

impl PartialOrd for Neighbor {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Neighbor {
    fn cmp(&self, other: &Self) -> Ordering {
        self.distance
            .partial_cmp(&other.distance)
            .unwrap_or(Ordering::Equal)
            .then_with(|| self.owner.cmp(&other.owner))
    }
}

/// Fixed-capacity queue that keeps its elements sorted ascending and retains
/// only the `capacity` smallest ones seen.
///
/// Not meant to be shared between concurrent searches; give each search its own.
#[derive(Debug, Clone)]
pub struct BoundedQueue {
    capacity: usize,
    elements: VecDeque<Neighbor>,
}

impl BoundedQueue {
    /// Creates an empty queue. A capacity of zero is accepted; such a queue
    /// rejects every element.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            // One slot of slack for the insert-then-evict step.
            elements: VecDeque::with_capacity(capacity.saturating_add(1)),
        }
    }

    /// Inserts `neighbor` in sorted position.
    ///
    /// # Errors
    /// `KdTreeError::InvalidArgument` if the distance is negative or not finite.
    /// `KdTreeError::QueueFull` when the capacity is zero, or when the queue is
    /// full and `neighbor` is not smaller than the current maximum. The queue is
    /// left unchanged in both cases.
    pub fn enqueue(&mut self, neighbor: Neighbor) -> Result<(), KdTreeError> {
        if !neighbor.distance.is_finite() || neighbor.distance < 0.0 {
            return Err(KdTreeError::InvalidArgument(format!(
                "Neighbor distance must be finite and non-negative, got {}.",
                neighbor.distance
            )));
        }
        if self.capacity == 0 {
            return Err(KdTreeError::QueueFull);
        }
        if self.elements.is_empty() {
            self.elements.push_back(neighbor);
            return Ok(());
        }
        if self.is_full() {
            if let Some(max) = self.elements.back() {
                if neighbor >= *max {
                    return Err(KdTreeError::QueueFull);
                }
            }
        }

        let position = self
            .elements
            .iter()
            .position(|existing| neighbor < *existing)
            .unwrap_or(self.elements.len());
        self.elements.insert(position, neighbor);

        if self.elements.len() > self.capacity {
            self.elements.pop_back();
        }
        Ok(())
    }

    /// Removes and returns the minimum element.
    ///
    /// # Errors
    /// `KdTreeError::QueueEmpty` if there is nothing to remove.
    pub fn dequeue(&mut self) -> Result<Neighbor, KdTreeError> {
        self.elements.pop_front().ok_or(KdTreeError::QueueEmpty)
    }

    pub fn peek_min(&self) -> Option<Neighbor> {
        self.elements.front().copied()
    }

    pub fn peek_max(&self) -> Option<Neighbor> {
        self.elements.back().copied()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.elements.len() == self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.elements.clear();
    }

    /// Iterates from the minimum to the maximum element.
    pub fn iter(&self) -> impl Iterator<Item = &Neighbor> + '_ {
        self.elements.iter()
    }

    /// Consumes the queue, returning its elements in ascending order.
    pub fn into_sorted_vec(self) -> Vec<Neighbor> {
        self.elements.into()
    }
}
