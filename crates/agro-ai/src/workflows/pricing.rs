use serde::Serialize;

use super::domain::PriceEstimationRequest;
use crate::scoring::{round_places, ReliabilityScorer};

pub const CURRENCY: &str = "DZD";

const PRICE_PER_KG: f64 = 0.5;
const PRICE_PER_HOUR: f64 = 100.0;
const BASE_FEE: f64 = 1000.0;
const BAND_LOW: f64 = 0.85;
const BAND_HIGH: f64 = 1.15;

/// Linear price before any risk surcharge.
pub fn base_price(weight_kg: f64, duration_hours: f64) -> f64 {
    PRICE_PER_KG * weight_kg + PRICE_PER_HOUR * duration_hours + BASE_FEE
}

/// Surcharge tier chosen from the reliability score at the base price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskSurcharge {
    High,
    Moderate,
    None,
}

impl RiskSurcharge {
    pub fn from_score(score: f64) -> Self {
        if score < 60.0 {
            RiskSurcharge::High
        } else if score < 75.0 {
            RiskSurcharge::Moderate
        } else {
            RiskSurcharge::None
        }
    }

    pub fn multiplier(&self) -> f64 {
        match self {
            RiskSurcharge::High => 1.3,
            RiskSurcharge::Moderate => 1.15,
            RiskSurcharge::None => 1.0,
        }
    }

    pub fn note(&self) -> &'static str {
        match self {
            RiskSurcharge::High => "Prix majoré pour compenser le risque",
            RiskSurcharge::Moderate => "Prix légèrement majoré",
            RiskSurcharge::None => "Prix optimal standard",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceEstimate {
    pub suggested_price: f64,
    pub min_price: f64,
    pub max_price: f64,
    pub reliability_score: f64,
    pub note: &'static str,
    pub currency: &'static str,
}

impl PriceEstimate {
    pub fn from_base(base: f64, reliability_score: f64) -> Self {
        let surcharge = RiskSurcharge::from_score(reliability_score);
        let suggested = base * surcharge.multiplier();
        Self {
            suggested_price: round_places(suggested, 2),
            min_price: round_places(suggested * BAND_LOW, 2),
            max_price: round_places(suggested * BAND_HIGH, 2),
            reliability_score,
            note: surcharge.note(),
            currency: CURRENCY,
        }
    }
}

pub fn estimate_price(
    scorer: &ReliabilityScorer,
    request: &PriceEstimationRequest,
) -> PriceEstimate {
    let base = base_price(request.weight_kg, request.duration_hours);
    let score = scorer.score_value(&request.profile_at(base));
    PriceEstimate::from_base(base, score)
}
