//! Compact tree node representation
//!
//! Nodes are designed to stay small and `Copy`: a split holds a feature
//! index, a threshold, and two forward-pointing `u16` child indices; a leaf
//! holds only its output value. The wire format tags each node with `kind`
//! so bundles stay readable when exported from the training pipeline.

use serde::{Deserialize, Serialize};

/// One node of a decision tree
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node {
    /// Internal node: go left when `features[feature] <= threshold`
    Split {
        /// Index into the input feature vector
        feature: u8,
        /// Split threshold in the feature's unit
        threshold: f32,
        /// Child index for `<= threshold`
        left: u16,
        /// Child index for `> threshold`
        right: u16,
    },
    /// Terminal node carrying the tree's output
    Leaf {
        /// Regression value, or class fraction for classifiers
        value: f32,
    },
}

impl Node {
    /// The child index this node selects for the given features
    ///
    /// Returns `None` for leaves and for splits referencing a feature the
    /// input vector does not carry.
    pub fn descend(&self, features: &[f32]) -> Option<u16> {
        match *self {
            Node::Split {
                feature,
                threshold,
                left,
                right,
            } => {
                let x = features.get(feature as usize)?;
                Some(if *x <= threshold { left } else { right })
            }
            Node::Leaf { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_descends_by_threshold() {
        let node = Node::Split {
            feature: 1,
            threshold: 50.0,
            left: 1,
            right: 2,
        };
        assert_eq!(node.descend(&[0.0, 40.0]), Some(1));
        assert_eq!(node.descend(&[0.0, 50.0]), Some(1)); // <= goes left
        assert_eq!(node.descend(&[0.0, 60.0]), Some(2));
    }

    #[test]
    fn missing_feature_is_none() {
        let node = Node::Split {
            feature: 3,
            threshold: 0.0,
            left: 1,
            right: 2,
        };
        assert_eq!(node.descend(&[1.0, 2.0]), None);
    }

    #[test]
    fn leaf_never_descends() {
        let node = Node::Leaf { value: 12.5 };
        assert_eq!(node.descend(&[1.0]), None);
    }
}
