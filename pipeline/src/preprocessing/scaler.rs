use ndarray::{ArrayView2, ArrayViewMut2, Axis};
use serde::{Deserialize, Serialize};

use crate::error::{MlErr, Result};

/// Centers each column on its mean and divides by its population standard
/// deviation. Constant columns are only centered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    mean: Vec<f64>,
    scale: Vec<f64>,
}

impl StandardScaler {
    /// Computes per-column mean and scale.
    pub fn fit(x: ArrayView2<f64>) -> Result<Self> {
        let mean = x
            .mean_axis(Axis(0))
            .ok_or(MlErr::NotEnoughRows { got: 0, needed: 1 })?;
        let std = x.std_axis(Axis(0), 0.0);

        let scale = std
            .iter()
            .map(|&s| if s == 0.0 || !s.is_finite() { 1.0 } else { s })
            .collect();

        Ok(Self {
            mean: mean.to_vec(),
            scale,
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.mean.len()
    }

    pub fn mean(&self) -> &[f64] {
        &self.mean
    }

    pub fn scale(&self) -> &[f64] {
        &self.scale
    }

    /// Standardizes `x` in place.
    pub fn transform(&self, mut x: ArrayViewMut2<f64>) -> Result<()> {
        if x.ncols() != self.width() {
            return Err(MlErr::SizeMismatch {
                a: "input columns",
                b: "scaler",
                got: x.ncols(),
                expected: self.width(),
            });
        }

        for mut row in x.rows_mut() {
            for ((v, m), s) in row.iter_mut().zip(&self.mean).zip(&self.scale) {
                *v = (*v - m) / s;
            }
        }

        Ok(())
    }
}
