use serde::Serialize;

use super::domain::TripData;
use crate::scoring::ReliabilityScorer;

/// Minimum score for a trip to pass without manual review.
pub const REVIEW_THRESHOLD: f64 = 70.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RiskLevel {
    #[serde(rename = "Faible")]
    Low,
    #[serde(rename = "Moyen")]
    Medium,
    #[serde(rename = "Moyen-Élevé")]
    MediumHigh,
    #[serde(rename = "Élevé")]
    High,
}

impl RiskLevel {
    pub fn from_score(score: f64) -> Self {
        match score {
            s if s >= 85.0 => RiskLevel::Low,
            s if s >= 70.0 => RiskLevel::Medium,
            s if s >= 50.0 => RiskLevel::MediumHigh,
            _ => RiskLevel::High,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Faible",
            RiskLevel::Medium => "Moyen",
            RiskLevel::MediumHigh => "Moyen-Élevé",
            RiskLevel::High => "Élevé",
        }
    }

    pub fn insight(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Excellent! Cette livraison a de très bonnes chances de réussir.",
            RiskLevel::Medium => "Bien. Livraison fiable avec quelques précautions standards.",
            RiskLevel::MediumHigh => {
                "Attention. Vérifiez les conditions et prévoyez du temps supplémentaire."
            }
            RiskLevel::High => {
                "Risque élevé. Recommandez une assurance ou un véhicule plus adapté."
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Recommendation {
    Ok,
    ReviewNeeded,
}

impl Recommendation {
    pub fn from_score(score: f64) -> Self {
        if score >= REVIEW_THRESHOLD {
            Recommendation::Ok
        } else {
            Recommendation::ReviewNeeded
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripAnalysis {
    pub score: f64,
    pub insight: &'static str,
    pub risk_level: RiskLevel,
    pub recommendation: Recommendation,
}

impl TripAnalysis {
    pub fn from_score(score: f64) -> Self {
        let risk_level = RiskLevel::from_score(score);
        Self {
            score,
            insight: risk_level.insight(),
            risk_level,
            recommendation: Recommendation::from_score(score),
        }
    }
}

pub fn analyze_trip(scorer: &ReliabilityScorer, trip: &TripData) -> TripAnalysis {
    TripAnalysis::from_score(scorer.score_value(&trip.profile()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn high_scores_are_low_risk() {
        let analysis = TripAnalysis::from_score(85.0);
        assert_eq!(analysis.risk_level, RiskLevel::Low);
        assert_eq!(analysis.recommendation, Recommendation::Ok);
    }

    #[test]
    fn scores_just_below_review_threshold_need_review() {
        let analysis = TripAnalysis::from_score(69.0);
        assert_eq!(analysis.risk_level, RiskLevel::MediumHigh);
        assert_eq!(analysis.recommendation, Recommendation::ReviewNeeded);
    }

    #[test]
    fn tier_boundaries_are_inclusive() {
        assert_eq!(RiskLevel::from_score(84.9), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(70.0), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(50.0), RiskLevel::MediumHigh);
        assert_eq!(RiskLevel::from_score(49.9), RiskLevel::High);
        assert_eq!(Recommendation::from_score(70.0), Recommendation::Ok);
    }

    #[test]
    fn serializes_labels_used_by_the_backend() {
        let value = serde_json::to_value(TripAnalysis::from_score(42.0)).expect("serializes");
        assert_eq!(
            value,
            json!({
                "score": 42.0,
                "insight": "Risque élevé. Recommandez une assurance ou un véhicule plus adapté.",
                "risk_level": "Élevé",
                "recommendation": "REVIEW_NEEDED",
            })
        );
        assert_eq!(RiskLevel::MediumHigh.label(), "Moyen-Élevé");
    }

    #[test]
    fn missing_model_yields_medium_risk() {
        let trip = TripData {
            vehicle: "Camion".to_string(),
            product: "Dattes".to_string(),
            city: "Biskra".to_string(),
            weight_kg: 1200.0,
            duration_hours: 5.0,
            price: 4000.0,
        };
        let analysis = analyze_trip(&ReliabilityScorer::unavailable(), &trip);
        assert_eq!(analysis.score, 75.0);
        assert_eq!(analysis.risk_level, RiskLevel::Medium);
        assert_eq!(analysis.recommendation, Recommendation::Ok);
    }
}
