// src/core/indexing/kdtree/tree.rs

//! Defines the core KD-Tree structures: `KdNode` and `KdTree`.

use crate::core::types::Point;

/// Represents a node in the KD-Tree.
///
/// Internal nodes split on one axis and always have two children; leaves hold
/// exactly one point. Children are uniquely owned, so dropping the root frees
/// the whole tree.
#[derive(Debug)]
pub enum KdNode {
    Internal {
        axis: usize,
        split_value: f64,
        left_child: Box<KdNode>,
        right_child: Box<KdNode>,
    },
    Leaf {
        point: Point,
    },
}

impl KdNode {
    pub fn is_leaf(&self) -> bool {
        matches!(self, KdNode::Leaf { .. })
    }

    /// Number of leaves (points) below and including this node.
    pub fn leaf_count(&self) -> usize {
        match self {
            KdNode::Leaf { .. } => 1,
            KdNode::Internal { left_child, right_child, .. } => {
                left_child.leaf_count() + right_child.leaf_count()
            }
        }
    }

    /// Height of the subtree; a leaf has depth 0.
    pub fn depth(&self) -> usize {
        match self {
            KdNode::Leaf { .. } => 0,
            KdNode::Internal { left_child, right_child, .. } => {
                1 + left_child.depth().max(right_child.depth())
            }
        }
    }
}

/// A built, read-only KD-Tree over a set of points.
#[derive(Debug)]
pub struct KdTree {
    root: KdNode,
    dimension: usize,
    len: usize,
}

impl KdTree {
    pub(super) fn new(root: KdNode, dimension: usize) -> Self {
        let len = root.leaf_count();
        KdTree { root, dimension, len }
    }

    pub fn root(&self) -> &KdNode {
        &self.root
    }

    /// Returns the dimensionality of the points this tree indexes.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Number of indexed points.
    pub fn len(&self) -> usize {
        self.len
    }

    /// A built tree always holds at least one point.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn depth(&self) -> usize {
        self.root.depth()
    }

    /// Leaf points in left-to-right order.
    pub fn leaves(&self) -> Leaves<'_> {
        Leaves { stack: vec![&self.root] }
    }
}

/// Depth-first, left-first iterator over the points stored in leaves.
pub struct Leaves<'a> {
    stack: Vec<&'a KdNode>,
}

impl<'a> Iterator for Leaves<'a> {
    type Item = &'a Point;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(node) = self.stack.pop() {
            match node {
                KdNode::Leaf { point } => return Some(point),
                KdNode::Internal { left_child, right_child, .. } => {
                    self.stack.push(right_child);
                    self.stack.push(left_child);
                }
            }
        }
        None
    }
}
