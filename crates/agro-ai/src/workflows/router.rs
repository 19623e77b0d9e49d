use std::sync::Arc;

use axum::{extract::State, routing::post, Json, Router};
use tracing::debug;

use super::analysis::{analyze_trip, TripAnalysis};
use super::domain::{DriverRatingRequest, PriceEstimationRequest, TripData};
use super::pricing::{estimate_price, PriceEstimate};
use super::rating::{rate_driver, DriverRatingResponse};
use crate::scoring::ReliabilityScorer;

/// Router exposing the scoring endpoints. Handlers never fail: scoring
/// problems surface as the fallback score inside a 200 response.
pub fn scoring_router(scorer: Arc<ReliabilityScorer>) -> Router {
    Router::new()
        .route("/analyze", post(analyze_handler))
        .route("/rate-driver", post(rate_driver_handler))
        .route("/estimate-price", post(estimate_price_handler))
        .with_state(scorer)
}

pub(crate) async fn analyze_handler(
    State(scorer): State<Arc<ReliabilityScorer>>,
    Json(trip): Json<TripData>,
) -> Json<TripAnalysis> {
    let analysis = analyze_trip(&scorer, &trip);
    debug!(score = analysis.score, risk = analysis.risk_level.label(), "trip analyzed");
    Json(analysis)
}

pub(crate) async fn rate_driver_handler(
    State(scorer): State<Arc<ReliabilityScorer>>,
    Json(request): Json<DriverRatingRequest>,
) -> Json<DriverRatingResponse> {
    let response = rate_driver(&scorer, &request);
    debug!(
        driver = %request.driver_id,
        trips = response.total_trips(),
        rating = response.overall_rating(),
        "driver rated"
    );
    Json(response)
}

pub(crate) async fn estimate_price_handler(
    State(scorer): State<Arc<ReliabilityScorer>>,
    Json(request): Json<PriceEstimationRequest>,
) -> Json<PriceEstimate> {
    let estimate = estimate_price(&scorer, &request);
    debug!(
        suggested = estimate.suggested_price,
        score = estimate.reliability_score,
        "price estimated"
    );
    Json(estimate)
}
