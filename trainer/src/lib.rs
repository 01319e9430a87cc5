pub mod configs;
mod error;

use log::info;
use pipeline::{
    MlErr,
    artifact::{FsModelStore, MODEL_NAME, ModelArtifact, ModelStore, ModelTag, Version},
    dataset::Frame,
    features::FeatureBuilder,
    training::TrainerBuilder,
};
use schema::{TARGET, fields};

pub use error::{Result, TrainErr};

use crate::configs::TrainingConfig;

/// Trains a new energy model from the CSV in `config` and saves it.
///
/// # Returns
/// The tag the model was saved under.
///
/// # Errors
/// Returns a `TrainErr` if the data cannot be loaded or is unusable, or if
/// the model cannot be stored.
pub fn run(config: &TrainingConfig) -> Result<ModelTag> {
    let mut frame = Frame::from_csv_path(&config.data_path)?;
    let derived = FeatureBuilder::new(config.reference_year).build(&mut frame)?;
    info!(derived = derived.len(); "feature columns ready");

    let features: Vec<&str> = fields::wire_names().collect();
    let data = frame.select(&features, TARGET)?;
    if data.len() < 2 {
        return Err(MlErr::NotEnoughRows {
            got: data.len(),
            needed: 2,
        }
        .into());
    }
    info!(rows = data.len(), dropped = frame.len() - data.len(); "training set ready");

    let trained = TrainerBuilder::new()
        .seed(Some(config.seed))
        .test_size(config.test_size)
        .build()?
        .train(&data)?;

    let version = match &config.version {
        Some(v) => v.clone(),
        None => Version::generate(&mut rand::rng()),
    };
    let artifact = ModelArtifact::new(MODEL_NAME, version, trained.pipeline, trained.report);

    let store = FsModelStore::new(&config.store_root);
    let tag = store.save(&artifact)?;
    info!(
        train = trained.train_rows,
        test = trained.test_rows;
        "trained model {tag}"
    );

    Ok(tag)
}
