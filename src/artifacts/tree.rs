//! Additive regression tree ensemble (gradient boosted trees)
//!
//! Each tree is a flat node list rooted at index 0. A split node sends a row
//! left when `x[feature] < threshold`, right otherwise; the prediction is
//! `base_score` plus the sum of the leaf values reached in every tree.

use serde::{Deserialize, Serialize};

use crate::error::PredictError;
use crate::predictor::Regressor;

/// Tree node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    Leaf {
        leaf: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

/// Single regression tree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tree {
    pub nodes: Vec<TreeNode>,
}

impl Tree {
    /// Leaf value reached by `features`
    fn evaluate(&self, features: &[f64]) -> f64 {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                TreeNode::Leaf { leaf } => return *leaf,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if features[*feature] < *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }

    /// Children must point forward so traversal always terminates
    fn validate(&self, n_features: usize) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".to_string());
        }
        for (i, node) in self.nodes.iter().enumerate() {
            if let TreeNode::Split {
                feature,
                left,
                right,
                ..
            } = node
            {
                if *feature >= n_features {
                    return Err(format!(
                        "node {} splits on feature {} of {}",
                        i, feature, n_features
                    ));
                }
                for child in [*left, *right] {
                    if child <= i || child >= self.nodes.len() {
                        return Err(format!("node {} has invalid child {}", i, child));
                    }
                }
            }
        }
        Ok(())
    }
}

/// Tree ensemble model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeEnsemble {
    pub columns: Vec<String>,
    #[serde(default)]
    pub base_score: f64,
    pub trees: Vec<Tree>,
}

impl TreeEnsemble {
    pub fn validate(&self) -> Result<(), String> {
        if self.columns.is_empty() {
            return Err("artifact declares no columns".to_string());
        }
        if self.trees.is_empty() {
            return Err("ensemble has no trees".to_string());
        }
        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate(self.columns.len())
                .map_err(|e| format!("tree {}: {}", i, e))?;
        }
        Ok(())
    }
}

impl Regressor for TreeEnsemble {
    fn columns(&self) -> &[String] {
        &self.columns
    }

    fn predict(&self, features: &[f64]) -> Result<f64, PredictError> {
        if features.len() != self.columns.len() {
            return Err(PredictError::SchemaMismatch(format!(
                "tree ensemble expects {} features, got {}",
                self.columns.len(),
                features.len()
            )));
        }

        let sum: f64 = self.trees.iter().map(|t| t.evaluate(features)).sum();
        Ok(self.base_score + sum)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stump(feature: usize, threshold: f64, left: f64, right: f64) -> Tree {
        Tree {
            nodes: vec![
                TreeNode::Split {
                    feature,
                    threshold,
                    left: 1,
                    right: 2,
                },
                TreeNode::Leaf { leaf: left },
                TreeNode::Leaf { leaf: right },
            ],
        }
    }

    fn ensemble() -> TreeEnsemble {
        TreeEnsemble {
            columns: vec!["age".to_string(), "insurance_plan".to_string()],
            base_score: 5_000.0,
            trees: vec![stump(0, 0.5, 100.0, 900.0), stump(1, 2.5, 0.0, 3_000.0)],
        }
    }

    #[test]
    fn test_predict() {
        let model = ensemble();
        assert_eq!(model.predict(&[0.0, 1.0]).unwrap(), 5_100.0);
        assert_eq!(model.predict(&[0.5, 1.0]).unwrap(), 5_900.0);
        assert_eq!(model.predict(&[1.0, 3.0]).unwrap(), 8_900.0);
    }

    #[test]
    fn test_predict_wrong_length() {
        assert!(ensemble().predict(&[1.0]).is_err());
    }

    #[test]
    fn test_validate() {
        assert!(ensemble().validate().is_ok());

        let mut bad_feature = ensemble();
        bad_feature.trees[0] = stump(7, 0.5, 0.0, 0.0);
        assert!(bad_feature.validate().is_err());

        let mut cycle = ensemble();
        cycle.trees[0].nodes[0] = TreeNode::Split {
            feature: 0,
            threshold: 0.0,
            left: 0,
            right: 1,
        };
        assert!(cycle.validate().is_err());
    }

    #[test]
    fn test_deserialize_nodes() {
        let model: TreeEnsemble = serde_json::from_str(
            r#"{
                "columns": ["age"],
                "base_score": 10.0,
                "trees": [{"nodes": [
                    {"feature": 0, "threshold": 30.0, "left": 1, "right": 2},
                    {"leaf": -1.5},
                    {"leaf": 2.5}
                ]}]
            }"#,
        )
        .unwrap();

        assert!(model.validate().is_ok());
        assert_eq!(model.predict(&[25.0]).unwrap(), 8.5);
        assert_eq!(model.predict(&[30.0]).unwrap(), 12.5);
    }
}
