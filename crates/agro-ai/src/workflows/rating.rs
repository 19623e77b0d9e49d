use serde::Serialize;

use super::domain::{DriverRatingRequest, TripData};
use crate::scoring::{round_places, ReliabilityScorer};

/// Trips echoed back in `trip_details`, taken from the front of the history.
pub const TRIP_DETAIL_LIMIT: usize = 5;

pub const NO_HISTORY_MESSAGE: &str = "No trip history available";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PerformanceCategory {
    #[serde(rename = "⭐ Excellence")]
    Excellence,
    #[serde(rename = "✅ Très Bien")]
    VeryGood,
    #[serde(rename = "👍 Bien")]
    Good,
    #[serde(rename = "⚠️ Amélioration Nécessaire")]
    NeedsImprovement,
}

impl PerformanceCategory {
    pub fn from_rating(rating: f64) -> Self {
        match rating {
            r if r >= 85.0 => PerformanceCategory::Excellence,
            r if r >= 75.0 => PerformanceCategory::VeryGood,
            r if r >= 65.0 => PerformanceCategory::Good,
            _ => PerformanceCategory::NeedsImprovement,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripDetail {
    pub destination: String,
    pub score: f64,
    pub weight: f64,
    pub duration: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DriverRating {
    #[serde(rename = "driverId")]
    pub driver_id: String,
    pub overall_rating: f64,
    pub category: PerformanceCategory,
    pub total_trips: usize,
    pub best_score: f64,
    pub worst_score: f64,
    pub consistency: f64,
    pub trip_details: Vec<TripDetail>,
}

impl DriverRating {
    /// Aggregate per-trip scores. `scores[i]` belongs to `trips[i]`; returns
    /// `None` for an empty history.
    pub fn from_scores(driver_id: &str, trips: &[TripData], scores: &[f64]) -> Option<Self> {
        if scores.is_empty() {
            return None;
        }

        let total = scores.iter().sum::<f64>();
        let best = scores.iter().copied().fold(f64::MIN, f64::max);
        let worst = scores.iter().copied().fold(f64::MAX, f64::min);
        let overall_rating = round_places(total / scores.len() as f64, 1);

        let trip_details = trips
            .iter()
            .zip(scores)
            .take(TRIP_DETAIL_LIMIT)
            .map(|(trip, score)| TripDetail {
                destination: trip.city.clone(),
                score: *score,
                weight: trip.weight_kg,
                duration: trip.duration_hours,
            })
            .collect();

        Some(Self {
            driver_id: driver_id.to_string(),
            overall_rating,
            category: PerformanceCategory::from_rating(overall_rating),
            total_trips: scores.len(),
            best_score: best,
            worst_score: worst,
            consistency: round_places(100.0 - (best - worst), 1),
            trip_details,
        })
    }
}

/// Response for a driver without any recorded trips.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmptyDriverRating {
    #[serde(rename = "driverId")]
    pub driver_id: String,
    pub overall_rating: f64,
    pub total_trips: usize,
    pub message: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DriverRatingResponse {
    Rated(DriverRating),
    NoHistory(EmptyDriverRating),
}

impl DriverRatingResponse {
    pub fn overall_rating(&self) -> f64 {
        match self {
            DriverRatingResponse::Rated(rating) => rating.overall_rating,
            DriverRatingResponse::NoHistory(empty) => empty.overall_rating,
        }
    }

    pub fn total_trips(&self) -> usize {
        match self {
            DriverRatingResponse::Rated(rating) => rating.total_trips,
            DriverRatingResponse::NoHistory(empty) => empty.total_trips,
        }
    }
}

pub fn rate_driver(
    scorer: &ReliabilityScorer,
    request: &DriverRatingRequest,
) -> DriverRatingResponse {
    let scores: Vec<f64> = request
        .trips
        .iter()
        .map(|trip| scorer.score_value(&trip.profile()))
        .collect();

    match DriverRating::from_scores(&request.driver_id, &request.trips, &scores) {
        Some(rating) => DriverRatingResponse::Rated(rating),
        None => DriverRatingResponse::NoHistory(EmptyDriverRating {
            driver_id: request.driver_id.clone(),
            overall_rating: 0.0,
            total_trips: 0,
            message: NO_HISTORY_MESSAGE,
        }),
    }
}
