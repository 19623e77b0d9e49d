use serde::{Deserialize, Serialize};

use crate::scoring::TripProfile;

/// One delivery as reported by the logistics backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripData {
    #[serde(rename = "vehicule")]
    pub vehicle: String,
    #[serde(rename = "produit")]
    pub product: String,
    #[serde(rename = "ville")]
    pub city: String,
    #[serde(rename = "poids")]
    pub weight_kg: f64,
    #[serde(rename = "duree")]
    pub duration_hours: f64,
    #[serde(rename = "prix")]
    pub price: f64,
}

impl TripData {
    pub fn profile(&self) -> TripProfile<'_> {
        TripProfile {
            vehicle: &self.vehicle,
            product: &self.product,
            city: &self.city,
            weight_kg: self.weight_kg,
            duration_hours: self.duration_hours,
            price: self.price,
        }
    }
}

/// Trip history submitted for a single driver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverRatingRequest {
    #[serde(rename = "driverId")]
    pub driver_id: String,
    pub trips: Vec<TripData>,
}

/// Trip attributes known before a price has been agreed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceEstimationRequest {
    #[serde(rename = "vehicule")]
    pub vehicle: String,
    #[serde(rename = "produit")]
    pub product: String,
    #[serde(rename = "ville")]
    pub city: String,
    #[serde(rename = "poids")]
    pub weight_kg: f64,
    #[serde(rename = "duree")]
    pub duration_hours: f64,
}

impl PriceEstimationRequest {
    pub fn profile_at(&self, price: f64) -> TripProfile<'_> {
        TripProfile {
            vehicle: &self.vehicle,
            product: &self.product,
            city: &self.city,
            weight_kg: self.weight_kg,
            duration_hours: self.duration_hours,
            price,
        }
    }
}
