use log::debug;
use ndarray::Array2;
use schema::{Role, fields};
use serde::{Deserialize, Serialize};

use crate::{
    dataset::TrainingSet,
    error::{MlErr, Result},
    matrix::{FeatureMatrix, FeatureVector},
    preprocessing::ColumnTransformer,
    regressor::{GbdtParams, Regressor},
};

/// Preprocessing and regressor fitted together on one feature order.
#[derive(Debug, Serialize, Deserialize)]
pub struct FittedPipeline {
    feature_names: Vec<String>,
    preprocessor: ColumnTransformer,
    regressor: Regressor,
}

impl FittedPipeline {
    /// Fits the pipeline on `data`.
    ///
    /// Every feature column must be a catalog field; its role decides whether
    /// it is scaled or one-hot encoded.
    pub fn fit(data: &TrainingSet, params: &GbdtParams) -> Result<Self> {
        let x = data.x();
        let (numeric, categorical) = split_roles(x.names())?;

        let preprocessor = ColumnTransformer::fit(x, &numeric, &categorical)?;
        let encoded = preprocessor.transform(x)?;
        let regressor = Regressor::fit(encoded.view(), data.y(), params)?;

        debug!(
            numeric = numeric.len(),
            categorical = categorical.len(),
            encoded = preprocessor.width();
            "pipeline fitted"
        );

        Ok(Self {
            feature_names: x.names().to_vec(),
            preprocessor,
            regressor,
        })
    }

    /// The column order the pipeline was fit on.
    #[inline]
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    #[inline]
    pub fn preprocessor(&self) -> &ColumnTransformer {
        &self.preprocessor
    }

    #[inline]
    pub fn regressor(&self) -> &Regressor {
        &self.regressor
    }

    /// Encodes `x`, refusing any column order other than the fitted one.
    pub fn transform(&self, x: &FeatureMatrix) -> Result<Array2<f32>> {
        if x.names() != self.feature_names.as_slice() {
            return Err(MlErr::FeatureOrderMismatch {
                expected: self.feature_names.clone(),
                got: x.names().to_vec(),
            });
        }
        self.preprocessor.transform(x)
    }

    /// Predicts one raw target per row of `x`.
    pub fn predict(&self, x: &FeatureMatrix) -> Result<Vec<f64>> {
        let encoded = self.transform(x)?;
        self.regressor.predict(encoded.view())
    }

    /// Predicts the raw target of a single building.
    pub fn predict_one(&self, v: &FeatureVector) -> Result<f64> {
        let preds = self.predict(&FeatureMatrix::from(v.clone()))?;
        preds.first().copied().ok_or(MlErr::NotEnoughRows {
            got: 0,
            needed: 1,
        })
    }
}

/// Splits catalog feature names by role, keeping their relative order.
fn split_roles(names: &[String]) -> Result<(Vec<&str>, Vec<&str>)> {
    let mut numeric = Vec::new();
    let mut categorical = Vec::new();

    for name in names {
        let def = fields::by_wire(name).ok_or_else(|| MlErr::MissingFeature(name.clone()))?;
        match def.role {
            Role::Numeric => numeric.push(name.as_str()),
            Role::Categorical => categorical.push(name.as_str()),
        }
    }

    Ok((numeric, categorical))
}

#[cfg(test)]
mod tests {
    use schema::Value;

    use super::*;

    const AREA: &str = "PropertyGFATotal";
    const KIND: &str = "PrimaryPropertyType";

    fn training_set(names: &[&str]) -> TrainingSet {
        let rows = (0..30)
            .map(|i| {
                let kind = if i % 2 == 0 { "Hotel" } else { "Office" };
                names
                    .iter()
                    .map(|&n| match n {
                        AREA => Some(Value::Float(1000.0 + i as f64 * 100.0)),
                        _ => Some(Value::from(kind)),
                    })
                    .collect()
            })
            .collect();
        let y = (0..30).map(|i| 10.0 * i as f64).collect();
        let names = names.iter().map(|s| s.to_string()).collect();
        TrainingSet::new(FeatureMatrix::new(names, rows).unwrap(), y).unwrap()
    }

    fn params() -> GbdtParams {
        GbdtParams {
            n_estimators: 20,
            ..GbdtParams::default()
        }
    }

    #[test]
    fn fits_and_predicts_on_the_fitted_order() {
        let data = training_set(&[AREA, KIND]);
        let pipeline = FittedPipeline::fit(&data, &params()).unwrap();
        assert_eq!(pipeline.feature_names(), &[AREA.to_string(), KIND.to_string()]);
        assert_eq!(pipeline.preprocessor().width(), 3);

        let preds = pipeline.predict(data.x()).unwrap();
        assert_eq!(preds.len(), 30);
        assert!(preds.iter().all(|p| p.is_finite()));
    }

    #[test]
    fn refuses_a_reordered_matrix() {
        let pipeline = FittedPipeline::fit(&training_set(&[AREA, KIND]), &params()).unwrap();
        let reordered = training_set(&[KIND, AREA]);

        let err = pipeline.predict(reordered.x()).unwrap_err();
        assert!(matches!(err, MlErr::FeatureOrderMismatch { .. }));
    }

    #[test]
    fn predicts_a_single_vector() {
        let pipeline = FittedPipeline::fit(&training_set(&[AREA, KIND]), &params()).unwrap();
        let order = pipeline.feature_names().to_vec();
        let v = FeatureVector::project(
            &[(KIND, Value::from("Hotel")), (AREA, Value::Float(1500.0))],
            &order,
        )
        .unwrap();

        assert!(pipeline.predict_one(&v).unwrap().is_finite());
    }

    #[test]
    fn unknown_features_are_rejected() {
        let data = training_set(&[AREA, "Color"]);
        let err = FittedPipeline::fit(&data, &params()).unwrap_err();
        assert!(matches!(err, MlErr::MissingFeature(name) if name == "Color"));
    }
}
