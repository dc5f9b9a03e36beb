// src/core/indexing/kdtree/builder.rs

//! Logic for building a KD-Tree from a `KdArray`.

use std::fmt;
use std::str::FromStr;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::array::KdArray;
use super::error::KdTreeError;
use super::tree::{KdNode, KdTree};
use crate::core::types::Point;

/// How the split axis is chosen at each internal node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitMethod {
    /// Axis with the largest coordinate spread; lowest axis wins ties.
    #[default]
    MaxSpread,
    /// Uniformly random axis.
    Random,
    /// Round robin: `depth mod dimension`.
    Incremental,
}

impl SplitMethod {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::MaxSpread => "max_spread",
            Self::Random => "random",
            Self::Incremental => "incremental",
        }
    }
}

impl fmt::Display for SplitMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SplitMethod {
    type Err = KdTreeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "max_spread" | "maxspread" => Ok(Self::MaxSpread),
            "random" => Ok(Self::Random),
            "incremental" => Ok(Self::Incremental),
            other => Err(KdTreeError::InvalidArgument(format!("Unknown split method '{other}'"))),
        }
    }
}

/// Builds KD-Trees with a fixed split method.
///
/// The random generator is seeded once per builder: `new` draws the seed from
/// OS entropy, `with_seed` makes random builds reproducible.
#[derive(Debug)]
pub struct KdTreeBuilder {
    method: SplitMethod,
    rng: StdRng,
}

impl KdTreeBuilder {
    pub fn new(method: SplitMethod) -> Self {
        Self { method, rng: StdRng::from_entropy() }
    }

    pub fn with_seed(method: SplitMethod, seed: u64) -> Self {
        Self { method, rng: StdRng::seed_from_u64(seed) }
    }

    pub fn method(&self) -> SplitMethod {
        self.method
    }

    /// Builds a tree whose leaves are exactly the points of `array`.
    ///
    /// The array is consumed so each level can release its parent's storage
    /// once the two halves exist.
    ///
    /// # Errors
    /// `EmptyInput` for an empty array; any split failure is propagated and
    /// the partial tree is dropped.
    pub fn build(&mut self, array: KdArray) -> Result<KdTree, KdTreeError> {
        if array.is_empty() {
            return Err(KdTreeError::EmptyInput("Cannot build a KD-Tree from zero points.".to_string()));
        }
        let dimension = array.dimension();
        let points = array.len();

        let root = self.build_recursive(array, 0)?;
        let tree = KdTree::new(root, dimension);

        debug!(
            points,
            dimension,
            depth = tree.depth(),
            method = %self.method,
            "Built KD-Tree"
        );
        Ok(tree)
    }

    fn build_recursive(&mut self, array: KdArray, depth: usize) -> Result<KdNode, KdTreeError> {
        if array.len() == 1 {
            let point = array.points()[0].clone();
            return Ok(KdNode::Leaf { point });
        }

        let axis = self.choose_axis(&array, depth)?;
        let median_rank = (array.len() - 1) / 2;
        let split_value = array.point_at(axis, median_rank)?.coords()[axis];

        let (left, right) = array.split(axis)?;
        drop(array);

        let left_child = self.build_recursive(left, depth + 1)?;
        let right_child = self.build_recursive(right, depth + 1)?;

        Ok(KdNode::Internal {
            axis,
            split_value,
            left_child: Box::new(left_child),
            right_child: Box::new(right_child),
        })
    }

    fn choose_axis(&mut self, array: &KdArray, depth: usize) -> Result<usize, KdTreeError> {
        let dimension = array.dimension();
        match self.method {
            SplitMethod::MaxSpread => {
                let mut best_axis = 0;
                let mut best_spread = array.spread(0)?;
                for axis in 1..dimension {
                    let spread = array.spread(axis)?;
                    if best_spread < spread {
                        best_axis = axis;
                        best_spread = spread;
                    }
                }
                Ok(best_axis)
            }
            SplitMethod::Random => Ok(self.rng.gen_range(0..dimension)),
            SplitMethod::Incremental => Ok(depth % dimension),
        }
    }
}

/// Builds a `KdArray` from `points` and a tree from it in one call, seeding a
/// fresh random generator for `SplitMethod::Random`.
///
/// # Returns
/// A `Result` containing the built `KdTree` or a `KdTreeError`.
pub fn build_kdtree(points: &[Point], method: SplitMethod) -> Result<KdTree, KdTreeError> {
    let array = KdArray::build(points)?;
    KdTreeBuilder::new(method).build(array)
}
