use std::collections::BTreeSet;

use ndarray::ArrayViewMut1;
use serde::{Deserialize, Serialize};

use crate::error::{MlErr, Result};

/// One-hot encodes several categorical columns side by side.
///
/// Categories are sorted per column. A category unseen at fit time encodes as
/// all zeros for its column instead of failing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OneHotEncoder {
    categories: Vec<Vec<String>>,
}

impl OneHotEncoder {
    /// Learns the categories of each column from `rows` of category keys.
    pub fn fit<R>(n_columns: usize, rows: R) -> Self
    where
        R: IntoIterator<Item = Vec<String>>,
    {
        let mut seen = vec![BTreeSet::new(); n_columns];
        for row in rows {
            for (set, key) in seen.iter_mut().zip(row) {
                set.insert(key);
            }
        }

        Self {
            categories: seen.into_iter().map(|s| s.into_iter().collect()).collect(),
        }
    }

    pub fn categories(&self) -> &[Vec<String>] {
        &self.categories
    }

    /// Number of output columns.
    pub fn width(&self) -> usize {
        self.categories.iter().map(Vec::len).sum()
    }

    /// Writes the encoding of one row of keys into `out`.
    pub fn encode(&self, keys: &[String], mut out: ArrayViewMut1<f32>) -> Result<()> {
        if keys.len() != self.categories.len() {
            return Err(MlErr::SizeMismatch {
                a: "categorical row",
                b: "encoder",
                got: keys.len(),
                expected: self.categories.len(),
            });
        }
        if out.len() != self.width() {
            return Err(MlErr::SizeMismatch {
                a: "output row",
                b: "encoder",
                got: out.len(),
                expected: self.width(),
            });
        }

        out.fill(0.0);
        let mut offset = 0;
        for (categories, key) in self.categories.iter().zip(keys) {
            if let Ok(idx) = categories.binary_search(key) {
                out[offset + idx] = 1.0;
            }
            offset += categories.len();
        }

        Ok(())
    }
}
