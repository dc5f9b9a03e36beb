// src/core/indexing/kdtree/search.rs

//! Logic for performing K-Nearest Neighbor (KNN) search in a KD-Tree.

use super::error::KdTreeError;
use super::queue::{BoundedQueue, Neighbor};
use super::tree::{KdNode, KdTree};
use crate::core::types::Point;
use crate::core::vector::similarity::{neighbor_distance, snap_to_zero};

/// Fills `queue` with the nearest points of `tree` to `query`.
///
/// The queue's capacity is the K of the search. Candidates are ranked by
/// squared Euclidean distance (ties by owner index), so the resulting set is
/// the same as a linear scan would produce. Existing queue contents take part
/// in the ranking; clear the queue first for an independent search.
///
/// # Errors
/// `DimensionMismatch` if the query does not match the tree. Any other error
/// aborts the search, and the queue contents are then meaningless.
pub fn find_knn(tree: &KdTree, query: &Point, queue: &mut BoundedQueue) -> Result<(), KdTreeError> {
    if query.dimension() != tree.dimension() {
        return Err(KdTreeError::DimensionMismatch(format!(
            "Query vector dimension {} does not match tree dimension {}.",
            query.dimension(),
            tree.dimension()
        )));
    }
    search_recursive(tree.root(), query.coords(), queue)
}

/// Runs `find_knn` with a fresh queue of capacity `k` and returns the
/// neighbours sorted by ascending distance.
pub fn knn(tree: &KdTree, query: &Point, k: usize) -> Result<Vec<Neighbor>, KdTreeError> {
    if k == 0 {
        return Ok(Vec::new());
    }
    let mut queue = BoundedQueue::new(k);
    find_knn(tree, query, &mut queue)?;
    Ok(queue.into_sorted_vec())
}

/// Linear-scan reference: the `k` nearest of `points` to `query`.
pub fn brute_force_knn(points: &[Point], query: &Point, k: usize) -> Result<Vec<Neighbor>, KdTreeError> {
    let mut queue = BoundedQueue::new(k);
    for point in points {
        if point.dimension() != query.dimension() {
            return Err(KdTreeError::DimensionMismatch(format!(
                "Point dimension {} does not match query dimension {}.",
                point.dimension(),
                query.dimension()
            )));
        }
        offer(&mut queue, Neighbor::new(point.owner(), neighbor_distance(point.coords(), query.coords())))?;
    }
    Ok(queue.into_sorted_vec())
}

fn search_recursive(node: &KdNode, query: &[f64], queue: &mut BoundedQueue) -> Result<(), KdTreeError> {
    match node {
        KdNode::Leaf { point } => {
            let distance = neighbor_distance(point.coords(), query);
            offer(queue, Neighbor::new(point.owner(), distance))
        }
        KdNode::Internal { axis, split_value, left_child, right_child } => {
            let query_coord = query[*axis];

            let (near_child, far_child) = if query_coord <= *split_value {
                (left_child, right_child)
            } else {
                (right_child, left_child)
            };

            search_recursive(near_child, query, queue)?;

            // The far side can only hold points at least this far away. Snapped
            // like leaf distances, or sub-epsilon ties across the plane get lost.
            let distance_to_split_plane_sq = snap_to_zero((query_coord - *split_value).powi(2));
            let pruned = queue.is_full()
                && queue
                    .peek_max()
                    .is_some_and(|worst| distance_to_split_plane_sq > worst.distance);

            if !pruned {
                search_recursive(far_child, query, queue)?;
            }
            Ok(())
        }
    }
}

/// Enqueues a candidate, treating a full-queue rejection as a normal outcome.
fn offer(queue: &mut BoundedQueue, neighbor: Neighbor) -> Result<(), KdTreeError> {
    match queue.enqueue(neighbor) {
        Ok(()) | Err(KdTreeError::QueueFull) => Ok(()),
        Err(e) => Err(e),
    }
}
