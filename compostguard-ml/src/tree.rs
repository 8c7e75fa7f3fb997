//! Single decision tree with validated structure
//!
//! Trees arrive from the bundle as a flat node array in preorder: every
//! child index is strictly greater than its parent's. `new` validates that
//! property once, so `predict` can walk without cycle checks and is
//! guaranteed to terminate in at most `nodes.len()` steps.

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use crate::node::Node;
use crate::{MlError, MlResult};

/// An immutable, validated decision tree
#[derive(Debug, Clone)]
pub struct DecisionTree {
    nodes: Vec<Node>,
}

impl DecisionTree {
    /// Validate a flat node array into a tree
    ///
    /// Requirements: at least one node, and every split's children in
    /// bounds and strictly forward-pointing.
    pub fn new(nodes: Vec<Node>) -> MlResult<Self> {
        if nodes.is_empty() {
            return Err(MlError::EmptyModel);
        }
        for (i, node) in nodes.iter().enumerate() {
            if let Node::Split { left, right, .. } = *node {
                for child in [left, right] {
                    if child as usize >= nodes.len() || child as usize <= i {
                        return Err(MlError::BadNodeIndex { index: child });
                    }
                }
            }
        }
        Ok(Self { nodes })
    }

    /// Number of nodes in the tree
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True for the degenerate case of a freshly validated empty tree
    /// (cannot actually occur; kept for the conventional pair with `len`)
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Walk from the root to a leaf and return the leaf value
    pub fn predict(&self, features: &[f32]) -> MlResult<f32> {
        let mut index = 0usize;
        loop {
            match self.nodes[index] {
                Node::Leaf { value } => return Ok(value),
                node @ Node::Split { feature, .. } => {
                    let next = node
                        .descend(features)
                        .ok_or(MlError::InvalidFeature { feature })?;
                    // Forward-pointing children were validated in new()
                    index = next as usize;
                }
            }
        }
    }
}
