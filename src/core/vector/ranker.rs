// src/core/vector/ranker.rs
//! Vote aggregation: turns per-feature nearest neighbour results into a ranked
//! list of database images.
//!
//! Every query feature votes once for the owning image of each of its K
//! nearest database features. Images are then ranked by vote count, with ties
//! going to the lower image index.

use tracing::{debug, trace, warn};

use crate::core::common::CbirError;
use crate::core::indexing::kdtree::{find_knn, BoundedQueue, KdTree};
use crate::core::types::Point;

/// Parameters of one ranking run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankParams {
    /// Neighbours retrieved per query feature (K).
    pub knn: usize,
    /// Images to report (N).
    pub num_similar_images: usize,
    /// Number of database images; owner indices must be below this.
    pub image_count: usize,
}

impl RankParams {
    pub fn validate(&self) -> Result<(), CbirError> {
        if self.knn == 0 {
            return Err(CbirError::invalid_input("knn must be greater than 0"));
        }
        if self.image_count == 0 {
            return Err(CbirError::invalid_input("image_count must be greater than 0"));
        }
        Ok(())
    }
}

/// A ranked database image and the votes it received.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankedImage {
    pub index: usize,
    pub votes: usize,
}

/// Counts, per database image, how many of the query features' `k` nearest
/// neighbours it owns.
///
/// One queue is reused (cleared) across features. The first failing search
/// aborts the whole count.
pub fn count_votes(
    tree: &KdTree,
    query_features: &[Point],
    k: usize,
    image_count: usize,
) -> Result<Vec<usize>, CbirError> {
    if k == 0 {
        return Err(CbirError::invalid_input("knn must be greater than 0"));
    }

    let mut votes = vec![0usize; image_count];
    let mut queue = BoundedQueue::new(k);

    for (feature_idx, feature) in query_features.iter().enumerate() {
        queue.clear();
        find_knn(tree, feature, &mut queue)?;
        trace!(feature = feature_idx, found = queue.len(), "Searched query feature");

        while !queue.is_empty() {
            let neighbor = queue.dequeue()?;
            let slot = votes.get_mut(neighbor.owner).ok_or_else(|| {
                CbirError::invalid_input(format!(
                    "Feature owner {} is out of range for {} database images",
                    neighbor.owner, image_count
                ))
            })?;
            *slot += 1;
        }
    }

    Ok(votes)
}

/// Picks the `n` indices with the most votes, most-voted first.
///
/// Each round takes the first index holding the current maximum, so ties go
/// to the lower index. `n` is capped at `votes.len()`.
pub fn select_top(votes: &[usize], n: usize) -> Vec<RankedImage> {
    let n = n.min(votes.len());
    // `None` marks an index already taken.
    let mut remaining: Vec<Option<usize>> = votes.iter().copied().map(Some).collect();
    let mut ranked = Vec::with_capacity(n);

    for _ in 0..n {
        let mut best: Option<(usize, usize)> = None;
        for (index, count) in remaining.iter().enumerate() {
            if let Some(count) = *count {
                if best.map_or(true, |(_, best_count)| count > best_count) {
                    best = Some((index, count));
                }
            }
        }
        let Some((index, count)) = best else { break };
        remaining[index] = None;
        ranked.push(RankedImage { index, votes: count });
    }

    ranked
}

/// Ranks database images by similarity to the image described by
/// `query_features`, returning the top `params.num_similar_images` with their
/// vote counts.
pub fn rank_with_votes(
    tree: &KdTree,
    query_features: &[Point],
    params: &RankParams,
) -> Result<Vec<RankedImage>, CbirError> {
    params.validate()?;
    if params.num_similar_images > params.image_count {
        warn!(
            requested = params.num_similar_images,
            available = params.image_count,
            "Capping number of similar images to the database size"
        );
    }

    let votes = count_votes(tree, query_features, params.knn, params.image_count)?;
    let ranked = select_top(&votes, params.num_similar_images);
    debug!(
        features = query_features.len(),
        knn = params.knn,
        top = ?ranked.first(),
        "Ranked similar images"
    );
    Ok(ranked)
}

/// Same as [`rank_with_votes`], returning only the image indices.
pub fn rank_similar_images(
    tree: &KdTree,
    query_features: &[Point],
    params: &RankParams,
) -> Result<Vec<usize>, CbirError> {
    Ok(rank_with_votes(tree, query_features, params)?.into_iter().map(|r| r.index).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::indexing::kdtree::{build_kdtree, SplitMethod};

    fn pt(owner: usize, coords: &[f64]) -> Point {
        Point::new(owner, coords.to_vec()).unwrap()
    }

    fn query(coords: &[f64]) -> Point {
        Point::query(coords.to_vec()).unwrap()
    }

    /// Three images: 0 clusters near the origin, 1 near (10, 10), 2 near (-10, 5).
    fn database() -> Vec<Point> {
        vec![
            pt(0, &[0.0, 0.0]),
            pt(0, &[1.0, 0.0]),
            pt(0, &[0.0, 1.0]),
            pt(1, &[10.0, 10.0]),
            pt(1, &[11.0, 10.0]),
            pt(2, &[-10.0, 5.0]),
        ]
    }

    #[test]
    fn test_select_top_orders_by_votes() {
        let ranked = select_top(&[3, 7, 1, 5], 3);
        let indices: Vec<usize> = ranked.iter().map(|r| r.index).collect();
        assert_eq!(indices, vec![1, 3, 0]);
        assert_eq!(ranked[0].votes, 7);
    }

    #[test]
    fn test_select_top_ties_go_to_lower_index() {
        let ranked = select_top(&[2, 5, 5, 2, 0], 5);
        let indices: Vec<usize> = ranked.iter().map(|r| r.index).collect();
        assert_eq!(indices, vec![1, 2, 0, 3, 4]);
    }

    #[test]
    fn test_select_top_caps_n() {
        assert_eq!(select_top(&[1, 2], 10).len(), 2);
        assert!(select_top(&[], 3).is_empty());
        assert!(select_top(&[4, 4], 0).is_empty());
    }

    #[test]
    fn test_count_votes() {
        let tree = build_kdtree(&database(), SplitMethod::MaxSpread).unwrap();
        let features = vec![query(&[0.2, 0.2]), query(&[10.5, 10.0]), query(&[0.1, 0.0])];
        let votes = count_votes(&tree, &features, 2, 3).unwrap();
        // Two near-origin features vote twice for image 0; the third votes twice for image 1.
        assert_eq!(votes, vec![4, 2, 0]);
    }

    #[test]
    fn test_count_votes_rejects_out_of_range_owner() {
        let tree = build_kdtree(&database(), SplitMethod::MaxSpread).unwrap();
        let result = count_votes(&tree, &[query(&[-10.0, 5.0])], 1, 2);
        assert!(matches!(result, Err(CbirError::InvalidInput { .. })));
    }

    #[test]
    fn test_count_votes_propagates_search_failure() {
        let tree = build_kdtree(&database(), SplitMethod::MaxSpread).unwrap();
        let features = vec![query(&[0.0, 0.0]), query(&[1.0, 2.0, 3.0])];
        assert!(matches!(count_votes(&tree, &features, 1, 3), Err(CbirError::Index(_))));
    }

    #[test]
    fn test_rank_similar_images() {
        let tree = build_kdtree(&database(), SplitMethod::Incremental).unwrap();
        let params = RankParams { knn: 1, num_similar_images: 2, image_count: 3 };
        let features = vec![query(&[-9.0, 5.0]), query(&[-10.0, 4.0]), query(&[0.5, 0.5])];
        assert_eq!(rank_similar_images(&tree, &features, &params).unwrap(), vec![2, 0]);
    }

    #[test]
    fn test_rank_with_votes_caps_to_database_size() {
        let tree = build_kdtree(&database(), SplitMethod::MaxSpread).unwrap();
        let params = RankParams { knn: 3, num_similar_images: 10, image_count: 3 };
        let ranked = rank_with_votes(&tree, &[query(&[10.0, 10.0])], &params).unwrap();
        assert_eq!(
            ranked,
            vec![
                RankedImage { index: 1, votes: 2 },
                RankedImage { index: 0, votes: 1 },
                RankedImage { index: 2, votes: 0 },
            ]
        );
    }

    #[test]
    fn test_rank_params_validation() {
        let tree = build_kdtree(&database(), SplitMethod::MaxSpread).unwrap();
        let bad_knn = RankParams { knn: 0, num_similar_images: 1, image_count: 3 };
        assert!(rank_similar_images(&tree, &[], &bad_knn).is_err());
        let bad_count = RankParams { knn: 1, num_similar_images: 1, image_count: 0 };
        assert!(rank_similar_images(&tree, &[], &bad_count).is_err());
    }
}
