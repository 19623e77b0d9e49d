//! Serialized classifier and label encoders, loaded once at startup.
//!
//! Artifacts are JSON documents stored side by side in a model directory. A
//! bundle is only produced when all four load and validate; callers decide how
//! to degrade when it is missing.

mod classifier;
mod encoder;

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use tracing::{error, info};

pub use classifier::{
    Classifier, ClassifierArtifact, DecisionTree, ForestModel, LogisticModel, PredictionError,
};
pub use encoder::LabelEncoder;

pub const FEATURE_COUNT: usize = 6;

/// Column order the classifier was trained on.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "Type_Vehicule",
    "Category Name",
    "Order City",
    "Order Item Quantity (KG)",
    "Duree_Trajet_Heures",
    "Prix_Total_Course_DZD",
];

pub const CLASSIFIER_FILE: &str = "agri_vtc_model.json";
pub const VEHICLE_ENCODER_FILE: &str = "encoder_vehicule.json";
pub const CATEGORY_ENCODER_FILE: &str = "encoder_category.json";
pub const CITY_ENCODER_FILE: &str = "encoder_city.json";

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("failed to read model artifact {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse model artifact {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid model artifact: {0}")]
    Invalid(String),
}

/// File locations of the four artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub classifier: PathBuf,
    pub vehicle_encoder: PathBuf,
    pub category_encoder: PathBuf,
    pub city_encoder: PathBuf,
}

impl ArtifactPaths {
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            classifier: dir.join(CLASSIFIER_FILE),
            vehicle_encoder: dir.join(VEHICLE_ENCODER_FILE),
            category_encoder: dir.join(CATEGORY_ENCODER_FILE),
            city_encoder: dir.join(CITY_ENCODER_FILE),
        }
    }
}

/// Classifier plus the three encoders feeding it. Read-only after construction.
pub struct ModelBundle {
    classifier: Box<dyn Classifier>,
    pub vehicle: LabelEncoder,
    pub category: LabelEncoder,
    pub city: LabelEncoder,
}

impl std::fmt::Debug for ModelBundle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelBundle")
            .field("classifier", &self.classifier.describe())
            .field("vehicle", &self.vehicle.classes().len())
            .field("category", &self.category.classes().len())
            .field("city", &self.city.classes().len())
            .finish()
    }
}

impl ModelBundle {
    pub fn new(
        classifier: Box<dyn Classifier>,
        vehicle: LabelEncoder,
        category: LabelEncoder,
        city: LabelEncoder,
    ) -> Self {
        Self {
            classifier,
            vehicle,
            category,
            city,
        }
    }

    pub fn load(paths: &ArtifactPaths) -> Result<Self, ModelError> {
        let classifier: ClassifierArtifact = read_artifact(&paths.classifier)?;
        classifier.validate()?;

        let vehicle = read_encoder(&paths.vehicle_encoder)?;
        let category = read_encoder(&paths.category_encoder)?;
        let city = read_encoder(&paths.city_encoder)?;

        Ok(Self::new(Box::new(classifier), vehicle, category, city))
    }

    /// Load the bundle, logging the outcome. Failure yields `None` so the
    /// service can keep answering with fallback scores.
    pub fn load_or_degrade(paths: &ArtifactPaths) -> Option<Self> {
        match Self::load(paths) {
            Ok(bundle) => {
                info!(
                    classifier = %bundle.classifier.describe(),
                    vehicles = bundle.vehicle.classes().len(),
                    categories = bundle.category.classes().len(),
                    cities = bundle.city.classes().len(),
                    "model artifacts loaded"
                );
                Some(bundle)
            }
            Err(err) => {
                error!(error = %err, "model artifacts unavailable; scoring will use the fallback");
                None
            }
        }
    }

    pub fn classifier(&self) -> &dyn Classifier {
        self.classifier.as_ref()
    }

    pub fn summary(&self) -> BundleSummary {
        BundleSummary {
            classifier: self.classifier.describe(),
            vehicle_classes: self.vehicle.classes().len(),
            category_classes: self.category.classes().len(),
            city_classes: self.city.classes().len(),
        }
    }
}

/// Diagnostic view of a loaded bundle.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct BundleSummary {
    pub classifier: String,
    pub vehicle_classes: usize,
    pub category_classes: usize,
    pub city_classes: usize,
}

fn read_artifact<T: DeserializeOwned>(path: &Path) -> Result<T, ModelError> {
    let raw = fs::read_to_string(path).map_err(|source| ModelError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| ModelError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn read_encoder(path: &Path) -> Result<LabelEncoder, ModelError> {
    let encoder: LabelEncoder = read_artifact(path)?;
    encoder.validate().map_err(|err| match err {
        ModelError::Invalid(detail) => {
            ModelError::Invalid(format!("{}: {detail}", path.display()))
        }
        other => other,
    })?;
    Ok(encoder)
}
