//! Request workflows layered on the reliability scorer: single-trip analysis,
//! driver rating over a trip history, and price estimation.

pub mod analysis;
pub mod domain;
pub mod pricing;
pub mod rating;
pub mod router;

#[cfg(test)]
mod tests;

pub use analysis::{analyze_trip, Recommendation, RiskLevel, TripAnalysis};
pub use domain::{DriverRatingRequest, PriceEstimationRequest, TripData};
pub use pricing::{base_price, estimate_price, PriceEstimate, RiskSurcharge};
pub use rating::{
    rate_driver, DriverRating, DriverRatingResponse, EmptyDriverRating, PerformanceCategory,
    TripDetail,
};
pub use router::scoring_router;
