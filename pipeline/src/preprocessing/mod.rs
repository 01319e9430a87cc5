//! Feature preprocessing: numeric columns are median-imputed then scaled,
//! categorical columns are mode-imputed then one-hot encoded.

mod imputer;
mod onehot;
mod scaler;

pub use imputer::{ImputeStrategy, SimpleImputer};
pub use onehot::OneHotEncoder;
pub use scaler::StandardScaler;

use ndarray::{Array2, s};
use serde::{Deserialize, Serialize};

use crate::{
    error::{MlErr, Result},
    matrix::FeatureMatrix,
};

/// A fitted numeric block followed by a fitted categorical block.
///
/// Output columns are the scaled numeric columns in the order they were given,
/// then the one-hot blocks of the categorical columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnTransformer {
    numeric: Vec<usize>,
    numeric_imputers: Vec<SimpleImputer>,
    scaler: StandardScaler,
    categorical: Vec<usize>,
    categorical_imputers: Vec<SimpleImputer>,
    one_hot: OneHotEncoder,
}

impl ColumnTransformer {
    /// Fits both blocks on `x`.
    ///
    /// # Arguments
    /// * `x` - The training features.
    /// * `numeric` - Names of the columns to impute with the median and scale.
    /// * `categorical` - Names of the columns to impute with the mode and one-hot encode.
    pub fn fit(x: &FeatureMatrix, numeric: &[&str], categorical: &[&str]) -> Result<Self> {
        let resolve = |names: &[&str]| {
            names
                .iter()
                .map(|name| {
                    x.position(name)
                        .ok_or_else(|| MlErr::MissingFeature(name.to_string()))
                })
                .collect::<Result<Vec<_>>>()
        };
        let numeric_idx = resolve(numeric)?;
        let categorical_idx = resolve(categorical)?;

        let numeric_imputers = numeric_idx
            .iter()
            .zip(numeric)
            .map(|(&i, name)| SimpleImputer::fit(ImputeStrategy::Median, name, x.column(i)))
            .collect::<Result<Vec<_>>>()?;
        let categorical_imputers = categorical_idx
            .iter()
            .zip(categorical)
            .map(|(&i, name)| SimpleImputer::fit(ImputeStrategy::MostFrequent, name, x.column(i)))
            .collect::<Result<Vec<_>>>()?;

        let numeric_block = numeric_block(x, &numeric_idx, &numeric_imputers, numeric)?;
        let scaler = StandardScaler::fit(numeric_block.view())?;

        let keys = (0..x.len()).map(|r| category_keys(x, r, &categorical_idx, &categorical_imputers));
        let one_hot = OneHotEncoder::fit(categorical_idx.len(), keys);

        Ok(Self {
            numeric: numeric_idx,
            numeric_imputers,
            scaler,
            categorical: categorical_idx,
            categorical_imputers,
            one_hot,
        })
    }

    /// Number of encoded columns.
    pub fn width(&self) -> usize {
        self.scaler.width() + self.one_hot.width()
    }

    /// Number of input columns the transformer reads.
    pub fn n_inputs(&self) -> usize {
        self.numeric.len() + self.categorical.len()
    }

    pub fn one_hot(&self) -> &OneHotEncoder {
        &self.one_hot
    }

    /// Encodes `x` into a dense matrix ready for the regressor.
    ///
    /// Column positions are the ones resolved at fit time, so `x` must follow
    /// the fit order.
    pub fn transform(&self, x: &FeatureMatrix) -> Result<Array2<f32>> {
        let needed = self
            .numeric
            .iter()
            .chain(&self.categorical)
            .max()
            .map_or(0, |m| m + 1);
        if x.names().len() < needed {
            return Err(MlErr::SizeMismatch {
                a: "input columns",
                b: "transformer",
                got: x.names().len(),
                expected: needed,
            });
        }

        let names = x.names().iter().map(String::as_str).collect::<Vec<_>>();
        let numeric_names: Vec<&str> = self.numeric.iter().map(|&i| names[i]).collect();

        let mut numeric = numeric_block(x, &self.numeric, &self.numeric_imputers, &numeric_names)?;
        self.scaler.transform(numeric.view_mut())?;

        let n_num = self.scaler.width();
        let mut out = Array2::<f32>::zeros((x.len(), self.width()));
        out.slice_mut(s![.., ..n_num])
            .assign(&numeric.mapv(|v| v as f32));

        for (r, mut row) in out.rows_mut().into_iter().enumerate() {
            let keys = category_keys(x, r, &self.categorical, &self.categorical_imputers);
            self.one_hot.encode(&keys, row.slice_mut(s![n_num..]))?;
        }

        Ok(out)
    }
}

/// Imputed numeric columns of `x` as a dense `f64` block.
fn numeric_block(
    x: &FeatureMatrix,
    idx: &[usize],
    imputers: &[SimpleImputer],
    names: &[&str],
) -> Result<Array2<f64>> {
    let mut block = Array2::zeros((x.len(), idx.len()));

    for (r, row) in x.rows().iter().enumerate() {
        for (c, ((&i, imputer), name)) in idx.iter().zip(imputers).zip(names).enumerate() {
            let v = imputer.apply(row[i].as_ref());
            block[[r, c]] = v.as_f64().ok_or_else(|| MlErr::NonNumeric {
                column: name.to_string(),
                got: v.to_string(),
            })?;
        }
    }

    Ok(block)
}

/// Imputed category keys of row `r`.
fn category_keys(
    x: &FeatureMatrix,
    r: usize,
    idx: &[usize],
    imputers: &[SimpleImputer],
) -> Vec<String> {
    let row = &x.rows()[r];
    idx.iter()
        .zip(imputers)
        .map(|(&i, imputer)| imputer.apply(row[i].as_ref()).category_key())
        .collect()
}

#[cfg(test)]
mod tests {
    use schema::Value;

    use super::*;

    fn matrix(rows: Vec<Vec<Option<Value>>>) -> FeatureMatrix {
        let names = vec!["area".to_string(), "kind".to_string(), "floors".to_string()];
        FeatureMatrix::new(names, rows).unwrap()
    }

    fn training() -> FeatureMatrix {
        matrix(vec![
            vec![Some(Value::Float(100.0)), Some(Value::from("Hotel")), Some(Value::Int(1))],
            vec![Some(Value::Float(300.0)), Some(Value::from("Office")), Some(Value::Int(3))],
            vec![None, Some(Value::from("Hotel")), Some(Value::Int(2))],
        ])
    }

    #[test]
    fn output_is_numeric_then_one_hot() {
        let x = training();
        let ct = ColumnTransformer::fit(&x, &["area", "floors"], &["kind"]).unwrap();
        assert_eq!(ct.width(), 4);
        assert_eq!(ct.n_inputs(), 3);

        let out = ct.transform(&x).unwrap();
        assert_eq!(out.dim(), (3, 4));
        // row 2 area is imputed with the median (200), which is the mean too
        assert_eq!(out[[2, 0]], 0.0);
        assert_eq!(out.row(0).slice(s![2..]).to_vec(), vec![1.0, 0.0]);
        assert_eq!(out.row(1).slice(s![2..]).to_vec(), vec![0.0, 1.0]);
    }

    #[test]
    fn unseen_category_is_ignored() {
        let ct = ColumnTransformer::fit(&training(), &["area", "floors"], &["kind"]).unwrap();
        let x = matrix(vec![vec![
            Some(Value::Float(100.0)),
            Some(Value::from("Museum")),
            Some(Value::Int(1)),
        ]]);
        let out = ct.transform(&x).unwrap();
        assert_eq!(out.row(0).slice(s![2..]).to_vec(), vec![0.0, 0.0]);
    }

    #[test]
    fn missing_category_takes_the_mode() {
        let ct = ColumnTransformer::fit(&training(), &["area", "floors"], &["kind"]).unwrap();
        let x = matrix(vec![vec![Some(Value::Float(100.0)), None, Some(Value::Int(1))]]);
        let out = ct.transform(&x).unwrap();
        assert_eq!(out.row(0).slice(s![2..]).to_vec(), vec![1.0, 0.0]);
    }

    #[test]
    fn unknown_column_fails_to_fit() {
        let err = ColumnTransformer::fit(&training(), &["area", "height"], &["kind"]).unwrap_err();
        assert!(matches!(err, MlErr::MissingFeature(name) if name == "height"));
    }
}
