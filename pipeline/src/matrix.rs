use schema::Value;
use serde_json::{Map, Value as Json};

use crate::error::{MlErr, Result};

/// Named rows of optional feature cells, the input of the fitted pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    names: Vec<String>,
    rows: Vec<Vec<Option<Value>>>,
}

impl FeatureMatrix {
    /// Creates a new matrix, checking every row is as wide as `names`.
    pub fn new(names: Vec<String>, rows: Vec<Vec<Option<Value>>>) -> Result<Self> {
        if let Some(row) = rows.iter().find(|row| row.len() != names.len()) {
            return Err(MlErr::SizeMismatch {
                a: "row",
                b: "feature names",
                got: row.len(),
                expected: names.len(),
            });
        }

        Ok(Self { names, rows })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[inline]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    #[inline]
    pub fn rows(&self) -> &[Vec<Option<Value>>] {
        &self.rows
    }

    /// Position of the column called `name`.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Iterates over the cells of the column at `idx`.
    pub fn column(&self, idx: usize) -> impl Iterator<Item = Option<&Value>> {
        self.rows.iter().map(move |row| row[idx].as_ref())
    }

    /// Keeps the rows at `indices`, in that order.
    pub(crate) fn take(&self, indices: &[usize]) -> Self {
        Self {
            names: self.names.clone(),
            rows: indices.iter().map(|&i| self.rows[i].clone()).collect(),
        }
    }
}

impl From<FeatureVector> for FeatureMatrix {
    fn from(v: FeatureVector) -> Self {
        Self {
            names: v.names,
            rows: vec![v.values.into_iter().map(Some).collect()],
        }
    }
}

/// A single building projected onto a fixed feature order.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    names: Vec<String>,
    values: Vec<Value>,
}

impl FeatureVector {
    /// Reorders `(name, value)` pairs to follow `order`.
    ///
    /// Every name in `order` must be present in `values`; pairs not named by
    /// `order` are dropped.
    pub fn project(values: &[(&str, Value)], order: &[String]) -> Result<Self> {
        let values = order
            .iter()
            .map(|name| {
                values
                    .iter()
                    .find(|(n, _)| *n == name.as_str())
                    .map(|(_, v)| v.clone())
                    .ok_or_else(|| MlErr::MissingFeature(name.clone()))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            names: order.to_vec(),
            values,
        })
    }

    #[inline]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    #[inline]
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// The vector as a JSON object, in feature order.
    pub fn to_json_map(&self) -> Map<String, Json> {
        self.names
            .iter()
            .cloned()
            .zip(self.values.iter().cloned().map(Json::from))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn projection_follows_the_given_order() {
        let pairs = [("a", Value::Int(1)), ("b", Value::from("x")), ("c", Value::Float(0.5))];
        let v = FeatureVector::project(&pairs, &order(&["c", "a"])).unwrap();
        assert_eq!(v.names(), order(&["c", "a"]).as_slice());
        assert_eq!(v.values(), &[Value::Float(0.5), Value::Int(1)]);
    }

    #[test]
    fn projection_fails_on_an_unknown_name() {
        let pairs = [("a", Value::Int(1))];
        let err = FeatureVector::project(&pairs, &order(&["a", "z"])).unwrap_err();
        assert!(matches!(err, MlErr::MissingFeature(name) if name == "z"));
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let err = FeatureMatrix::new(order(&["a", "b"]), vec![vec![None]]).unwrap_err();
        assert!(matches!(err, MlErr::SizeMismatch { got: 1, expected: 2, .. }));
    }
}
