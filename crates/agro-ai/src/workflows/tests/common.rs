use std::sync::Arc;

use axum::response::Response;
use serde_json::Value;

use crate::model::{Classifier, LabelEncoder, ModelBundle, PredictionError, FEATURE_COUNT};
use crate::scoring::ReliabilityScorer;
use crate::workflows::scoring_router;

/// Failure probability per encoded city: Batna, Oran, Setif, Tebessa.
const CITY_FAILURE: [f64; 4] = [0.25, 0.1, 0.4, 0.45];

pub(super) struct CityRiskClassifier;

impl Classifier for CityRiskClassifier {
    fn predict_proba(&self, features: &[f64; FEATURE_COUNT]) -> Result<[f64; 2], PredictionError> {
        let failure = CITY_FAILURE[features[2] as usize];
        Ok([1.0 - failure, failure])
    }

    fn describe(&self) -> String {
        "city risk table".to_string()
    }
}

fn encoder(classes: &[&str]) -> LabelEncoder {
    LabelEncoder::new(classes.iter().map(|class| class.to_string()).collect())
        .expect("sorted classes")
}

pub(super) fn bundle() -> ModelBundle {
    ModelBundle::new(
        Box::new(CityRiskClassifier),
        encoder(&["Camion", "Camionnette", "Frigorifique"]),
        encoder(&["Cereales", "Fruits", "Legumes"]),
        encoder(&["Batna", "Oran", "Setif", "Tebessa"]),
    )
}

pub(super) fn loaded_router() -> axum::Router {
    scoring_router(Arc::new(ReliabilityScorer::with_bundle(bundle())))
}

pub(super) fn degraded_router() -> axum::Router {
    scoring_router(Arc::new(ReliabilityScorer::unavailable()))
}

pub(super) fn trip(city: &str) -> Value {
    serde_json::json!({
        "vehicule": "Camion",
        "produit": "Legumes",
        "ville": city,
        "poids": 420.0,
        "duree": 3.5,
        "prix": 2400.0,
    })
}

pub(super) fn json_request(uri: &str, body: &Value) -> axum::http::Request<axum::body::Body> {
    axum::http::Request::post(uri)
        .header(axum::http::header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from(
            serde_json::to_vec(body).expect("serializable body"),
        ))
        .expect("request builds")
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
