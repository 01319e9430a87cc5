use std::fmt;

use gbdt::{
    config::Config,
    decision_tree::{Data, DataVec, ValueType},
    gradient_boost::GBDT,
};
use log::debug;
use ndarray::ArrayView2;
use serde::{Deserialize, Serialize};

use crate::error::{MlErr, Result};

/// Hyperparameters of the gradient boosted regressor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GbdtParams {
    pub learning_rate: f32,
    pub max_depth: u32,
    pub n_estimators: usize,
    pub subsample: f64,
    pub min_leaf_size: usize,
}

impl Default for GbdtParams {
    fn default() -> Self {
        Self {
            learning_rate: 0.05,
            max_depth: 2,
            n_estimators: 300,
            subsample: 1.0,
            min_leaf_size: 1,
        }
    }
}

impl GbdtParams {
    fn validate(&self) -> Result<()> {
        if !(self.learning_rate > 0.0) {
            return Err(MlErr::InvalidParam(format!(
                "learning rate must be positive, got {}",
                self.learning_rate
            )));
        }
        if self.max_depth == 0 || self.n_estimators == 0 || self.min_leaf_size == 0 {
            return Err(MlErr::InvalidParam(
                "max depth, estimators and min leaf size must be at least 1".to_string(),
            ));
        }
        if !(self.subsample > 0.0 && self.subsample <= 1.0) {
            return Err(MlErr::InvalidParam(format!(
                "subsample must be in (0, 1], got {}",
                self.subsample
            )));
        }
        Ok(())
    }

    fn config(&self, n_features: usize) -> Config {
        let mut cfg = Config::new();
        cfg.set_feature_size(n_features);
        cfg.set_max_depth(self.max_depth);
        cfg.set_iterations(self.n_estimators);
        cfg.set_shrinkage(self.learning_rate);
        cfg.set_min_leaf_size(self.min_leaf_size);
        cfg.set_data_sample_ratio(self.subsample);
        cfg.set_feature_sample_ratio(1.0);
        cfg.set_loss("SquaredError");
        cfg.set_debug(false);
        cfg
    }
}

/// Squared error gradient boosting over encoded features.
///
/// Targets are centered on their training mean before boosting and the mean
/// is added back to every prediction.
#[derive(Serialize, Deserialize)]
pub struct Regressor {
    model: GBDT,
    base: f64,
    n_features: usize,
    params: GbdtParams,
}

impl fmt::Debug for Regressor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Regressor")
            .field("base", &self.base)
            .field("n_features", &self.n_features)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

impl Regressor {
    /// Fits a new regressor.
    ///
    /// # Arguments
    /// * `x` - The encoded features, one row per sample.
    /// * `y` - The targets.
    /// * `params` - The boosting hyperparameters.
    pub fn fit(x: ArrayView2<f32>, y: &[f64], params: &GbdtParams) -> Result<Self> {
        params.validate()?;

        if x.nrows() != y.len() {
            return Err(MlErr::SizeMismatch {
                a: "features",
                b: "targets",
                got: x.nrows(),
                expected: y.len(),
            });
        }
        if y.len() < 2 {
            return Err(MlErr::NotEnoughRows {
                got: y.len(),
                needed: 2,
            });
        }

        let base = y.iter().sum::<f64>() / y.len() as f64;
        let mut data: DataVec = x
            .rows()
            .into_iter()
            .zip(y)
            .map(|(row, &label)| {
                Data::new_training_data(row.to_vec(), 1.0, (label - base) as ValueType, None)
            })
            .collect();

        let n_features = x.ncols();
        let mut model = GBDT::new(&params.config(n_features));
        model.fit(&mut data);

        debug!(
            rows = y.len(),
            features = n_features,
            base = base;
            "fitted {} boosting rounds", params.n_estimators
        );

        Ok(Self {
            model,
            base,
            n_features,
            params: *params,
        })
    }

    #[inline]
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    #[inline]
    pub fn params(&self) -> &GbdtParams {
        &self.params
    }

    /// Predicts one target per row of `x`.
    pub fn predict(&self, x: ArrayView2<f32>) -> Result<Vec<f64>> {
        if x.ncols() != self.n_features {
            return Err(MlErr::SizeMismatch {
                a: "encoded features",
                b: "regressor",
                got: x.ncols(),
                expected: self.n_features,
            });
        }
        if x.nrows() == 0 {
            return Ok(Vec::new());
        }

        let data: DataVec = x
            .rows()
            .into_iter()
            .map(|row| Data::new_test_data(row.to_vec(), None))
            .collect();

        let preds = self.model.predict(&data);
        Ok(preds.into_iter().map(|p| f64::from(p) + self.base).collect())
    }
}

#[cfg(test)]
mod tests {
    use ndarray::{Array2, array};

    use super::*;

    fn small() -> GbdtParams {
        GbdtParams {
            learning_rate: 0.3,
            max_depth: 3,
            n_estimators: 50,
            ..GbdtParams::default()
        }
    }

    #[test]
    fn default_params() {
        let p = GbdtParams::default();
        assert_eq!(p.learning_rate, 0.05);
        assert_eq!(p.max_depth, 2);
        assert_eq!(p.n_estimators, 300);
        assert_eq!(p.subsample, 1.0);
    }

    #[test]
    fn learns_a_step() {
        let x: Array2<f32> = Array2::from_shape_fn((40, 1), |(i, _)| i as f32);
        let y: Vec<f64> = (0..40).map(|i| if i < 20 { 10.0 } else { 50.0 }).collect();

        let model = Regressor::fit(x.view(), &y, &small()).unwrap();
        let preds = model.predict(array![[2.0_f32], [35.0]].view()).unwrap();

        assert!((preds[0] - 10.0).abs() < 2.0, "got {}", preds[0]);
        assert!((preds[1] - 50.0).abs() < 2.0, "got {}", preds[1]);
    }

    #[test]
    fn constant_target_predicts_the_constant() {
        let x = array![[0.0_f32], [1.0], [2.0]];
        let model = Regressor::fit(x.view(), &[7.0, 7.0, 7.0], &small()).unwrap();
        let preds = model.predict(x.view()).unwrap();
        assert!(preds.iter().all(|p| (p - 7.0).abs() < 1e-6));
    }

    #[test]
    fn rejects_wrong_width() {
        let x = array![[0.0_f32], [1.0]];
        let model = Regressor::fit(x.view(), &[1.0, 2.0], &small()).unwrap();
        let err = model.predict(array![[0.0_f32, 1.0]].view()).unwrap_err();
        assert!(matches!(err, MlErr::SizeMismatch { .. }));
    }

    #[test]
    fn needs_two_rows() {
        let x = array![[0.0_f32]];
        let err = Regressor::fit(x.view(), &[1.0], &small()).unwrap_err();
        assert!(matches!(err, MlErr::NotEnoughRows { got: 1, needed: 2 }));
    }

    #[test]
    fn rejects_bad_params() {
        let x = array![[0.0_f32], [1.0]];
        let params = GbdtParams {
            subsample: 0.0,
            ..GbdtParams::default()
        };
        assert!(matches!(
            Regressor::fit(x.view(), &[1.0, 2.0], &params),
            Err(MlErr::InvalidParam(_))
        ));
    }
}
