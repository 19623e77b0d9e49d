use agro_ai::config::ModelConfig;
use agro_ai::error::AppError;
use agro_ai::model::{ArtifactPaths, ModelBundle};
use agro_ai::scoring::{CategoricalField, ReliabilityScorer, ScoreOutcome};
use agro_ai::workflows::{TripAnalysis, TripData};
use clap::Args;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub(crate) struct AnalyzeArgs {
    /// JSON file describing the trip (vehicule, produit, ville, poids, duree, prix)
    #[arg(long)]
    trip: PathBuf,
    /// Directory holding the model artifacts (defaults to AGRO_MODEL_DIR)
    #[arg(long)]
    model_dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct ModelArgs {
    /// Directory holding the model artifacts (defaults to AGRO_MODEL_DIR)
    #[arg(long)]
    model_dir: Option<PathBuf>,
}

fn artifact_paths(model_dir: Option<PathBuf>) -> ArtifactPaths {
    match model_dir {
        Some(dir) => ArtifactPaths::in_dir(dir),
        None => ModelConfig::from_env().artifact_paths(),
    }
}

/// Analysis of a trip file together with how the score was obtained.
#[derive(Debug)]
pub(crate) struct OfflineAnalysis {
    pub(crate) analysis: TripAnalysis,
    pub(crate) outcome: ScoreOutcome,
}

pub(crate) fn analyze_file(
    trip: &Path,
    paths: &ArtifactPaths,
) -> Result<OfflineAnalysis, AppError> {
    let raw = fs::read_to_string(trip)?;
    let trip: TripData = serde_json::from_str(&raw)?;

    let bundle = match ModelBundle::load(paths) {
        Ok(bundle) => Some(bundle),
        Err(err) => {
            eprintln!("warning: {err}");
            None
        }
    };
    let outcome = ReliabilityScorer::new(bundle).score(&trip.profile());

    Ok(OfflineAnalysis {
        analysis: TripAnalysis::from_score(outcome.value()),
        outcome,
    })
}

pub(crate) fn run_analyze(args: AnalyzeArgs) -> Result<(), AppError> {
    let paths = artifact_paths(args.model_dir);
    let OfflineAnalysis { analysis, outcome } = analyze_file(&args.trip, &paths)?;

    println!("{}", serde_json::to_string_pretty(&analysis)?);

    match outcome {
        ScoreOutcome::Scored { unseen, .. } if !unseen.is_empty() => {
            let fields: Vec<&str> = unseen.iter().map(CategoricalField::label).collect();
            println!("\nUnseen categories encoded as 0: {}", fields.join(", "));
        }
        ScoreOutcome::Fallback { reason } => {
            println!("\nFallback score used ({reason})");
        }
        ScoreOutcome::Scored { .. } => {}
    }
    Ok(())
}

pub(crate) fn run_model_check(args: ModelArgs) -> Result<(), AppError> {
    let paths = artifact_paths(args.model_dir);
    let bundle = ModelBundle::load(&paths)?;
    let summary = bundle.summary();

    println!("Model artifacts OK");
    println!("- classifier: {} ({})", summary.classifier, paths.classifier.display());
    println!(
        "- vehicle encoder: {} classes ({})",
        summary.vehicle_classes,
        paths.vehicle_encoder.display()
    );
    println!(
        "- category encoder: {} classes ({})",
        summary.category_classes,
        paths.category_encoder.display()
    );
    println!(
        "- city encoder: {} classes ({})",
        summary.city_classes,
        paths.city_encoder.display()
    );
    Ok(())
}
