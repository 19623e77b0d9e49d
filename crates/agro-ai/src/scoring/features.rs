use serde::Serialize;

use crate::model::{LabelEncoder, ModelBundle, FEATURE_COUNT};

/// Code substituted for categories the encoder has never seen.
pub const UNSEEN_CATEGORY_CODE: u32 = 0;

/// Raw trip attributes in the units the classifier was trained on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TripProfile<'a> {
    pub vehicle: &'a str,
    pub product: &'a str,
    pub city: &'a str,
    pub weight_kg: f64,
    pub duration_hours: f64,
    pub price: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoricalField {
    Vehicle,
    Category,
    City,
}

impl CategoricalField {
    pub fn label(&self) -> &'static str {
        match self {
            CategoricalField::Vehicle => "vehicle",
            CategoricalField::Category => "category",
            CategoricalField::City => "city",
        }
    }
}

/// Feature row in classifier column order, plus the fields that fell back to
/// [`UNSEEN_CATEGORY_CODE`].
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedFeatures {
    pub values: [f64; FEATURE_COUNT],
    pub unseen: Vec<CategoricalField>,
}

pub fn encode(trip: &TripProfile<'_>, bundle: &ModelBundle) -> EncodedFeatures {
    let mut unseen = Vec::new();
    let mut code = |encoder: &LabelEncoder, value: &str, field: CategoricalField| {
        encoder.transform(value).unwrap_or_else(|| {
            unseen.push(field);
            UNSEEN_CATEGORY_CODE
        }) as f64
    };

    let vehicle = code(&bundle.vehicle, trip.vehicle, CategoricalField::Vehicle);
    let category = code(&bundle.category, trip.product, CategoricalField::Category);
    let city = code(&bundle.city, trip.city, CategoricalField::City);

    EncodedFeatures {
        values: [
            vehicle,
            category,
            city,
            trip.weight_kg,
            trip.duration_hours,
            trip.price,
        ],
        unseen,
    }
}
