mod builder;
mod metrics;

pub use builder::{DEFAULT_SEED, DEFAULT_TEST_SIZE, TrainerBuilder};
pub use metrics::{EvalReport, evaluate};

use log::{info, warn};
use rand::Rng;

use crate::{
    dataset::TrainingSet,
    error::Result,
    pipeline::FittedPipeline,
    regressor::GbdtParams,
};

/// The outcome of a training run.
#[derive(Debug)]
pub struct TrainedModel {
    pub pipeline: FittedPipeline,
    /// Held-out metrics, absent when the test partition is empty.
    pub report: Option<EvalReport>,
    pub train_rows: usize,
    pub test_rows: usize,
}

/// Splits a dataset, fits a pipeline on one side and scores it on the other.
#[derive(Debug)]
pub struct Trainer<R: Rng> {
    params: GbdtParams,
    test_size: f64,
    rng: R,
}

impl<R: Rng> Trainer<R> {
    /// Returns a new `Trainer`.
    ///
    /// # Arguments
    /// * `params` - The boosting hyperparameters.
    /// * `test_size` - Share of the rows held out for evaluation.
    /// * `rng` - The random number generator driving the split.
    pub fn new(params: GbdtParams, test_size: f64, rng: R) -> Self {
        Self {
            params,
            test_size,
            rng,
        }
    }

    /// Runs split, fit and evaluation on `data`.
    pub fn train(&mut self, data: &TrainingSet) -> Result<TrainedModel> {
        let (train, test) = data.split(self.test_size, &mut self.rng)?;
        info!(train = train.len(), test = test.len(); "split dataset");

        let pipeline = FittedPipeline::fit(&train, &self.params)?;

        let report = if test.is_empty() {
            warn!("empty test partition, skipping evaluation");
            None
        } else {
            let preds = pipeline.predict(test.x())?;
            evaluate(test.y(), &preds)
        };

        if let Some(r) = &report {
            info!(rmse = r.rmse, mae = r.mae, r2 = r.r2; "evaluated on {} held-out rows", r.rows);
        }

        Ok(TrainedModel {
            pipeline,
            report,
            train_rows: train.len(),
            test_rows: test.len(),
        })
    }
}
