use serde::{Deserialize, Serialize};

use super::{ModelError, FEATURE_COUNT};

/// Binary classifier returning `[P(success), P(failure)]` for one feature row.
pub trait Classifier: Send + Sync {
    fn predict_proba(&self, features: &[f64; FEATURE_COUNT]) -> Result<[f64; 2], PredictionError>;

    /// Short label used in diagnostics.
    fn describe(&self) -> String;
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PredictionError {
    #[error("tree {tree} has no path to a leaf")]
    UnterminatedTree { tree: usize },
    #[error("leaf {node} of tree {tree} has no samples")]
    EmptyLeaf { tree: usize, node: usize },
    #[error("probability {0} is outside [0, 1]")]
    OutOfRange(f64),
}

/// Serialized classifier artifact, tagged by `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassifierArtifact {
    Logistic(LogisticModel),
    Forest(ForestModel),
}

impl ClassifierArtifact {
    pub(crate) fn validate(&self) -> Result<(), ModelError> {
        match self {
            ClassifierArtifact::Logistic(model) => model.validate(),
            ClassifierArtifact::Forest(model) => model.validate(),
        }
    }
}

impl Classifier for ClassifierArtifact {
    fn predict_proba(&self, features: &[f64; FEATURE_COUNT]) -> Result<[f64; 2], PredictionError> {
        match self {
            ClassifierArtifact::Logistic(model) => model.predict_proba(features),
            ClassifierArtifact::Forest(model) => model.predict_proba(features),
        }
    }

    fn describe(&self) -> String {
        match self {
            ClassifierArtifact::Logistic(model) => model.describe(),
            ClassifierArtifact::Forest(model) => model.describe(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticModel {
    pub intercept: f64,
    pub coefficients: Vec<f64>,
}

impl LogisticModel {
    fn validate(&self) -> Result<(), ModelError> {
        if self.coefficients.len() != FEATURE_COUNT {
            return Err(ModelError::Invalid(format!(
                "logistic model expects {FEATURE_COUNT} coefficients, found {}",
                self.coefficients.len()
            )));
        }
        Ok(())
    }
}

impl Classifier for LogisticModel {
    fn predict_proba(&self, features: &[f64; FEATURE_COUNT]) -> Result<[f64; 2], PredictionError> {
        let logit = self.intercept
            + self
                .coefficients
                .iter()
                .zip(features)
                .map(|(weight, value)| weight * value)
                .sum::<f64>();
        let failure = 1.0 / (1.0 + (-logit).exp());
        checked_pair(failure)
    }

    fn describe(&self) -> String {
        "logistic regression".to_string()
    }
}

/// Averaging ensemble of decision trees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestModel {
    pub trees: Vec<DecisionTree>,
}

impl ForestModel {
    fn validate(&self) -> Result<(), ModelError> {
        if self.trees.is_empty() {
            return Err(ModelError::Invalid("forest has no trees".to_string()));
        }
        self.trees
            .iter()
            .enumerate()
            .try_for_each(|(index, tree)| tree.validate(index))
    }
}

impl Classifier for ForestModel {
    fn predict_proba(&self, features: &[f64; FEATURE_COUNT]) -> Result<[f64; 2], PredictionError> {
        let mut failure = 0.0;
        for (index, tree) in self.trees.iter().enumerate() {
            failure += tree.failure_probability(index, features)?;
        }
        checked_pair(failure / self.trees.len() as f64)
    }

    fn describe(&self) -> String {
        format!("random forest ({} trees)", self.trees.len())
    }
}

/// Tree in flattened array form. A node is a leaf when its left child is `-1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    /// Per-node class counts `[success, failure]`.
    pub value: Vec<[f64; 2]>,
}

impl DecisionTree {
    fn node_count(&self) -> usize {
        self.children_left.len()
    }

    fn validate(&self, index: usize) -> Result<(), ModelError> {
        let nodes = self.node_count();
        let invalid = |detail: String| ModelError::Invalid(format!("tree {index}: {detail}"));

        if nodes == 0 {
            return Err(invalid("tree has no nodes".to_string()));
        }
        if [
            self.children_right.len(),
            self.feature.len(),
            self.threshold.len(),
            self.value.len(),
        ]
        .iter()
        .any(|len| *len != nodes)
        {
            return Err(invalid("node arrays differ in length".to_string()));
        }

        for node in 0..nodes {
            let counts = self.value[node];
            if counts.iter().any(|count| !count.is_finite() || *count < 0.0) {
                return Err(invalid(format!("node {node} has invalid class counts {counts:?}")));
            }
            let (left, right) = (self.children_left[node], self.children_right[node]);
            if left == -1 {
                continue;
            }
            for child in [left, right] {
                if child <= node as i64 || child >= nodes as i64 {
                    return Err(invalid(format!("node {node} points to invalid child {child}")));
                }
            }
            let feature = self.feature[node];
            if feature < 0 || feature >= FEATURE_COUNT as i64 {
                return Err(invalid(format!("node {node} splits on unknown feature {feature}")));
            }
        }
        Ok(())
    }

    fn failure_probability(
        &self,
        tree: usize,
        features: &[f64; FEATURE_COUNT],
    ) -> Result<f64, PredictionError> {
        let mut node = 0usize;
        // Children always have a higher index than their parent, so a walk
        // visits at most `node_count` nodes.
        for _ in 0..self.node_count() {
            let left = self.children_left[node];
            if left == -1 {
                let [success, failure] = self.value[node];
                let total = success + failure;
                if total <= 0.0 {
                    return Err(PredictionError::EmptyLeaf { tree, node });
                }
                return Ok(failure / total);
            }
            let feature = self.feature[node] as usize;
            node = if features[feature] <= self.threshold[node] {
                left as usize
            } else {
                self.children_right[node] as usize
            };
        }
        Err(PredictionError::UnterminatedTree { tree })
    }
}

fn checked_pair(failure: f64) -> Result<[f64; 2], PredictionError> {
    if !(0.0..=1.0).contains(&failure) {
        return Err(PredictionError::OutOfRange(failure));
    }
    Ok([1.0 - failure, failure])
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Single split on weight: light loads rarely fail, heavy loads often do.
    fn weight_stump() -> DecisionTree {
        DecisionTree {
            children_left: vec![1, -1, -1],
            children_right: vec![2, -1, -1],
            feature: vec![3, -2, -2],
            threshold: vec![500.0, -2.0, -2.0],
            value: vec![[60.0, 40.0], [45.0, 5.0], [15.0, 35.0]],
        }
    }

    fn row(weight: f64) -> [f64; FEATURE_COUNT] {
        [0.0, 0.0, 0.0, weight, 2.0, 1250.0]
    }

    #[test]
    fn stump_routes_on_threshold_inclusively() {
        let forest = ForestModel {
            trees: vec![weight_stump()],
        };
        let [_, light] = forest.predict_proba(&row(500.0)).expect("prediction");
        let [_, heavy] = forest.predict_proba(&row(500.5)).expect("prediction");
        assert!((light - 0.1).abs() < 1e-12);
        assert!((heavy - 0.7).abs() < 1e-12);
    }

    #[test]
    fn forest_averages_tree_probabilities() {
        let mut flat = weight_stump();
        flat.children_left = vec![-1, -1, -1];
        flat.children_right = vec![-1, -1, -1];
        let forest = ForestModel {
            trees: vec![weight_stump(), flat],
        };
        forest.validate().expect("valid forest");
        let [success, failure] = forest.predict_proba(&row(100.0)).expect("prediction");
        assert!((failure - 0.25).abs() < 1e-12);
        assert!((success + failure - 1.0).abs() < 1e-12);
    }

    #[test]
    fn empty_leaf_is_a_prediction_error() {
        let mut tree = weight_stump();
        tree.value[1] = [0.0, 0.0];
        let forest = ForestModel { trees: vec![tree] };
        let err = forest.predict_proba(&row(10.0)).expect_err("empty leaf");
        assert_eq!(err, PredictionError::EmptyLeaf { tree: 0, node: 1 });
    }

    #[test]
    fn validation_rejects_backward_children() {
        let mut tree = weight_stump();
        tree.children_right[0] = 0;
        let forest = ForestModel { trees: vec![tree] };
        assert!(forest.validate().is_err());
    }

    #[test]
    fn validation_rejects_unknown_feature() {
        let mut tree = weight_stump();
        tree.feature[0] = 6;
        let err = ForestModel { trees: vec![tree] }
            .validate()
            .expect_err("feature out of range");
        assert!(err.to_string().contains("unknown feature 6"));
    }

    #[test]
    fn validation_rejects_negative_or_non_finite_counts() {
        let mut negative = weight_stump();
        negative.value[2] = [-5.0, 10.0];
        let err = ForestModel {
            trees: vec![weight_stump(), negative],
        }
        .validate()
        .expect_err("negative count");
        assert!(matches!(
            err,
            ModelError::Invalid(ref detail) if detail.starts_with("tree 1: node 2")
        ));

        let mut infinite = weight_stump();
        infinite.value[1] = [f64::INFINITY, 1.0];
        assert!(ForestModel {
            trees: vec![infinite]
        }
        .validate()
        .is_err());
    }

    #[test]
    fn logistic_applies_sigmoid_to_linear_term() {
        let model = LogisticModel {
            intercept: 0.0,
            coefficients: vec![0.0; FEATURE_COUNT],
        };
        let [success, failure] = model.predict_proba(&row(250.0)).expect("prediction");
        assert_eq!(success, 0.5);
        assert_eq!(failure, 0.5);
    }

    #[test]
    fn logistic_validation_checks_coefficient_count() {
        let artifact = ClassifierArtifact::Logistic(LogisticModel {
            intercept: 0.1,
            coefficients: vec![0.2, 0.3],
        });
        assert!(artifact.validate().is_err());
    }

    #[test]
    fn artifact_json_is_tagged_by_kind() {
        let raw = r#"{"kind":"logistic","intercept":-1.0,"coefficients":[0,0,0,0.001,0.2,0]}"#;
        let artifact: ClassifierArtifact = serde_json::from_str(raw).expect("parses");
        artifact.validate().expect("valid");
        assert_eq!(artifact.describe(), "logistic regression");
    }

    #[test]
    fn non_finite_inputs_are_rejected() {
        let model = LogisticModel {
            intercept: 0.0,
            coefficients: vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0],
        };
        let err = model
            .predict_proba(&row(f64::NAN))
            .expect_err("nan propagates");
        assert!(matches!(err, PredictionError::OutOfRange(value) if value.is_nan()));
    }
}
