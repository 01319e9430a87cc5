//! Training-time data handling and the fitted regression pipeline shared by
//! the trainer and the prediction server.

pub mod artifact;
pub mod dataset;
mod error;
pub mod features;
mod matrix;
mod pipeline;
pub mod preprocessing;
mod regressor;
pub mod training;

pub use error::{MlErr, Result, StoreErr};
pub use matrix::{FeatureMatrix, FeatureVector};
pub use pipeline::FittedPipeline;
pub use regressor::{GbdtParams, Regressor};
