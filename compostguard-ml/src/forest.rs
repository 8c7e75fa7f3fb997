//! Ensemble evaluation over validated trees
//!
//! Both shipped models are ensembles: the regressor averages raw leaf
//! values, the classifier averages per-tree class fractions (its leaves
//! hold values in [0, 1]). Either way the forest's output is the mean over
//! all trees, so one entry point serves both.

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use crate::tree::DecisionTree;
use crate::{MlError, MlResult};

/// An immutable ensemble of decision trees
#[derive(Debug, Clone)]
pub struct Forest {
    trees: Vec<DecisionTree>,
}

impl Forest {
    /// Build a forest from validated trees; must be non-empty
    pub fn new(trees: Vec<DecisionTree>) -> MlResult<Self> {
        if trees.is_empty() {
            return Err(MlError::EmptyModel);
        }
        Ok(Self { trees })
    }

    /// Number of trees in the ensemble
    pub fn len(&self) -> usize {
        self.trees.len()
    }

    /// Always false; forests are validated non-empty
    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }

    /// Mean leaf value across all trees
    pub fn predict_mean(&self, features: &[f32]) -> MlResult<f32> {
        let mut sum = 0.0f32;
        for tree in &self.trees {
            sum += tree.predict(features)?;
        }
        Ok(sum / self.trees.len() as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Node;

    fn leaf_tree(value: f32) -> DecisionTree {
        DecisionTree::new(vec![Node::Leaf { value }]).unwrap()
    }

    #[test]
    fn mean_over_trees() {
        let forest = Forest::new(vec![leaf_tree(10.0), leaf_tree(20.0), leaf_tree(30.0)]).unwrap();
        assert_eq!(forest.predict_mean(&[]).unwrap(), 20.0);
    }

    #[test]
    fn empty_forest_rejected() {
        assert!(matches!(Forest::new(vec![]), Err(MlError::EmptyModel)));
    }

    #[test]
    fn feature_errors_propagate() {
        let tree = DecisionTree::new(vec![
            Node::Split {
                feature: 2,
                threshold: 1.0,
                left: 1,
                right: 2,
            },
            Node::Leaf { value: 0.0 },
            Node::Leaf { value: 1.0 },
        ])
        .unwrap();
        let forest = Forest::new(vec![tree]).unwrap();
        assert!(forest.predict_mean(&[1.0]).is_err());
    }
}
