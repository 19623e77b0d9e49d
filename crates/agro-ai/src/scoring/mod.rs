//! Reliability scoring: encode a trip, ask the classifier for its failure
//! probability, and report `(1 - p) * 100`.
//!
//! Scoring never fails. When the bundle is missing or the classifier cannot
//! produce a probability the outcome is [`ScoreOutcome::Fallback`] and its
//! value is [`FALLBACK_SCORE`].

mod features;

use std::fmt;

use tracing::{debug, warn};

use crate::model::{BundleSummary, ModelBundle, PredictionError};

pub use features::{encode, CategoricalField, EncodedFeatures, TripProfile, UNSEEN_CATEGORY_CODE};

pub const FALLBACK_SCORE: f64 = 75.0;

#[derive(Debug, Clone, PartialEq)]
pub enum FallbackReason {
    ModelUnavailable,
    PredictionFailed(PredictionError),
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackReason::ModelUnavailable => write!(f, "model bundle not loaded"),
            FallbackReason::PredictionFailed(err) => write!(f, "prediction failed: {err}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ScoreOutcome {
    Scored {
        score: f64,
        unseen: Vec<CategoricalField>,
    },
    Fallback {
        reason: FallbackReason,
    },
}

impl ScoreOutcome {
    pub fn value(&self) -> f64 {
        match self {
            ScoreOutcome::Scored { score, .. } => *score,
            ScoreOutcome::Fallback { .. } => FALLBACK_SCORE,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, ScoreOutcome::Fallback { .. })
    }
}

/// Shared, read-only scorer handed to every request.
#[derive(Debug, Default)]
pub struct ReliabilityScorer {
    bundle: Option<ModelBundle>,
}

impl ReliabilityScorer {
    pub fn new(bundle: Option<ModelBundle>) -> Self {
        Self { bundle }
    }

    pub fn with_bundle(bundle: ModelBundle) -> Self {
        Self::new(Some(bundle))
    }

    pub fn unavailable() -> Self {
        Self::new(None)
    }

    pub fn model_loaded(&self) -> bool {
        self.bundle.is_some()
    }

    pub fn summary(&self) -> Option<BundleSummary> {
        self.bundle.as_ref().map(ModelBundle::summary)
    }

    pub fn score(&self, trip: &TripProfile<'_>) -> ScoreOutcome {
        let Some(bundle) = &self.bundle else {
            return ScoreOutcome::Fallback {
                reason: FallbackReason::ModelUnavailable,
            };
        };

        let EncodedFeatures { values, unseen } = encode(trip, bundle);
        if !unseen.is_empty() {
            debug!(
                fields = ?unseen.iter().map(CategoricalField::label).collect::<Vec<_>>(),
                "unseen categories encoded as {UNSEEN_CATEGORY_CODE}"
            );
        }

        match bundle.classifier().predict_proba(&values) {
            Ok([_, failure]) => ScoreOutcome::Scored {
                score: round_places((1.0 - failure) * 100.0, 1),
                unseen,
            },
            Err(err) => {
                warn!(error = %err, "prediction failed; using fallback score");
                ScoreOutcome::Fallback {
                    reason: FallbackReason::PredictionFailed(err),
                }
            }
        }
    }

    /// Convenience for callers that only need the number.
    pub fn score_value(&self, trip: &TripProfile<'_>) -> f64 {
        self.score(trip).value()
    }
}

/// Round to `places` decimals, sending exact ties to the even digit.
pub fn round_places(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round_ties_even() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        Classifier, ClassifierArtifact, DecisionTree, ForestModel, LabelEncoder, LogisticModel,
        FEATURE_COUNT,
    };

    struct FixedFailure(f64);

    impl Classifier for FixedFailure {
        fn predict_proba(
            &self,
            _features: &[f64; FEATURE_COUNT],
        ) -> Result<[f64; 2], PredictionError> {
            if !(0.0..=1.0).contains(&self.0) {
                return Err(PredictionError::OutOfRange(self.0));
            }
            Ok([1.0 - self.0, self.0])
        }

        fn describe(&self) -> String {
            "fixed".to_string()
        }
    }

    fn encoder(classes: &[&str]) -> LabelEncoder {
        LabelEncoder::new(classes.iter().map(|c| c.to_string()).collect()).expect("sorted")
    }

    fn bundle(classifier: Box<dyn Classifier>) -> ModelBundle {
        ModelBundle::new(
            classifier,
            encoder(&["Camion", "Camionnette"]),
            encoder(&["Fruits", "Legumes"]),
            encoder(&["Alger", "Blida", "Oran"]),
        )
    }

    fn trip<'a>(vehicle: &'a str, city: &'a str) -> TripProfile<'a> {
        TripProfile {
            vehicle,
            product: "Legumes",
            city,
            weight_kg: 800.0,
            duration_hours: 3.0,
            price: 2500.0,
        }
    }

    #[test]
    fn missing_bundle_falls_back_to_fixed_score() {
        let scorer = ReliabilityScorer::unavailable();
        let outcome = scorer.score(&trip("Camion", "Oran"));
        assert_eq!(outcome.value(), 75.0);
        assert_eq!(
            outcome,
            ScoreOutcome::Fallback {
                reason: FallbackReason::ModelUnavailable
            }
        );
        assert!(!scorer.model_loaded());
    }

    #[test]
    fn score_inverts_failure_probability() {
        let scorer = ReliabilityScorer::with_bundle(bundle(Box::new(FixedFailure(0.123))));
        let outcome = scorer.score(&trip("Camion", "Oran"));
        assert_eq!(
            outcome,
            ScoreOutcome::Scored {
                score: 87.7,
                unseen: Vec::new()
            }
        );
    }

    #[test]
    fn unseen_categories_are_reported_but_still_scored() {
        let scorer = ReliabilityScorer::with_bundle(bundle(Box::new(FixedFailure(0.4))));
        let outcome = scorer.score(&trip("Tracteur", "Tlemcen"));
        match outcome {
            ScoreOutcome::Scored { score, unseen } => {
                assert_eq!(score, 60.0);
                assert_eq!(unseen, vec![CategoricalField::Vehicle, CategoricalField::City]);
            }
            other => panic!("expected a model score, got {other:?}"),
        }
    }

    #[test]
    fn prediction_errors_fall_back_with_reason() {
        let scorer = ReliabilityScorer::with_bundle(bundle(Box::new(FixedFailure(1.5))));
        let outcome = scorer.score(&trip("Camion", "Blida"));
        assert!(outcome.is_fallback());
        assert_eq!(outcome.value(), FALLBACK_SCORE);
        assert!(matches!(
            outcome,
            ScoreOutcome::Fallback {
                reason: FallbackReason::PredictionFailed(PredictionError::OutOfRange(_))
            }
        ));
    }

    #[test]
    fn scores_stay_within_percentage_bounds() {
        let model = ClassifierArtifact::Logistic(LogisticModel {
            intercept: -2.0,
            coefficients: vec![0.4, -0.3, 0.2, 0.002, 0.15, -0.0004],
        });
        let scorer = ReliabilityScorer::with_bundle(bundle(Box::new(model)));
        for weight in [0.0, 10.0, 500.0, 5_000.0, 1e6] {
            for duration in [0.0, 1.5, 12.0, 96.0] {
                for price in [0.0, 1000.0, 1e5] {
                    let profile = TripProfile {
                        weight_kg: weight,
                        duration_hours: duration,
                        price,
                        ..trip("Camionnette", "Alger")
                    };
                    let score = scorer.score_value(&profile);
                    assert!((0.0..=100.0).contains(&score), "score {score} out of range");
                }
            }
        }
    }

    #[test]
    fn encoding_follows_training_column_order() {
        let bundle = bundle(Box::new(FixedFailure(0.0)));
        let encoded = encode(&trip("Camionnette", "Oran"), &bundle);
        assert_eq!(encoded.values, [1.0, 1.0, 2.0, 800.0, 3.0, 2500.0]);
        assert!(encoded.unseen.is_empty());
    }

    #[test]
    fn rounding_keeps_requested_places() {
        assert_eq!(round_places(87.6543, 1), 87.7);
        assert_eq!(round_places(1381.254, 2), 1381.25);
        assert_eq!(round_places(60.0, 1), 60.0);
    }

    #[test]
    fn exact_ties_round_to_even() {
        assert_eq!(round_places(81.25, 1), 81.2);
        assert_eq!(round_places(1388.625, 2), 1388.62);
        assert_eq!(round_places(1381.375, 2), 1381.38);
    }

    #[test]
    fn sixteen_sample_leaf_score_ties_to_even() {
        let leaf = DecisionTree {
            children_left: vec![-1],
            children_right: vec![-1],
            feature: vec![-2],
            threshold: vec![-2.0],
            value: vec![[13.0, 3.0]],
        };
        let forest = ClassifierArtifact::Forest(ForestModel { trees: vec![leaf] });
        let scorer = ReliabilityScorer::with_bundle(bundle(Box::new(forest)));
        assert_eq!(scorer.score_value(&trip("Camion", "Alger")), 81.2);
    }
}
