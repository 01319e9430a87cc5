use std::{fs::File, io::Read, path::Path};

use log::{debug, info};
use rand::{Rng, seq::SliceRandom};
use schema::Value;

use crate::{
    error::{MlErr, Result},
    matrix::FeatureMatrix,
};

/// A raw table loaded from CSV, stored column by column.
///
/// Cells are optional: empty cells and the usual missing-value markers load
/// as `None`.
#[derive(Debug, Clone, Default)]
pub struct Frame {
    names: Vec<String>,
    columns: Vec<Vec<Option<Value>>>,
    len: usize,
}

impl Frame {
    /// Loads a CSV file with a header row.
    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let frame = Self::from_csv_reader(File::open(path)?)?;
        info!(
            rows = frame.len(),
            columns = frame.width();
            "loaded {}", path.display()
        );
        Ok(frame)
    }

    /// Loads CSV data with a header row from any reader.
    pub fn from_csv_reader<R: Read>(rdr: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new().has_headers(true).from_reader(rdr);
        let names: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        let mut columns = vec![Vec::new(); names.len()];

        let mut len = 0;
        for record in reader.records() {
            let record = record?;
            for (column, raw) in columns.iter_mut().zip(record.iter()) {
                column.push(Value::parse_cell(raw));
            }
            len += 1;
        }

        Ok(Self {
            names,
            columns,
            len,
        })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.names.len()
    }

    #[inline]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn column(&self, name: &str) -> Option<&[Option<Value>]> {
        let idx = self.names.iter().position(|n| n == name)?;
        Some(&self.columns[idx])
    }

    /// Appends a column, replacing nothing: a column with the same name is an error.
    pub fn push_column(&mut self, name: &str, cells: Vec<Option<Value>>) -> Result<()> {
        if self.has_column(name) {
            return Err(MlErr::InvalidParam(format!("column {name:?} already exists")));
        }
        if self.width() > 0 && cells.len() != self.len {
            return Err(MlErr::SizeMismatch {
                a: "new column",
                b: "frame",
                got: cells.len(),
                expected: self.len,
            });
        }

        self.len = cells.len();
        self.names.push(name.to_string());
        self.columns.push(cells);
        Ok(())
    }

    /// Projects the frame onto `features` and a numeric `target`, dropping
    /// every row where any of them is missing.
    pub fn select(&self, features: &[&str], target: &str) -> Result<TrainingSet> {
        let lookup = |name: &str| {
            self.column(name)
                .ok_or_else(|| MlErr::MissingColumn(name.to_string()))
        };

        let feature_columns = features
            .iter()
            .map(|name| lookup(name))
            .collect::<Result<Vec<_>>>()?;
        let target_column = lookup(target)?;

        let mut rows = Vec::with_capacity(self.len);
        let mut targets = Vec::with_capacity(self.len);

        for i in 0..self.len {
            let Some(y) = &target_column[i] else {
                continue;
            };
            let y = y.as_f64().ok_or_else(|| MlErr::NonNumeric {
                column: target.to_string(),
                got: y.to_string(),
            })?;

            let row: Option<Vec<_>> = feature_columns.iter().map(|c| c[i].clone()).collect();
            if let Some(row) = row {
                rows.push(row.into_iter().map(Some).collect());
                targets.push(y);
            }
        }

        debug!(
            kept = rows.len(),
            dropped = self.len - rows.len();
            "completeness filter applied"
        );

        let names = features.iter().map(|s| s.to_string()).collect();
        TrainingSet::new(FeatureMatrix::new(names, rows)?, targets)
    }
}

/// Complete feature rows paired with their targets.
#[derive(Debug, Clone)]
pub struct TrainingSet {
    x: FeatureMatrix,
    y: Vec<f64>,
}

impl TrainingSet {
    pub fn new(x: FeatureMatrix, y: Vec<f64>) -> Result<Self> {
        if x.len() != y.len() {
            return Err(MlErr::SizeMismatch {
                a: "features",
                b: "targets",
                got: x.len(),
                expected: y.len(),
            });
        }
        Ok(Self { x, y })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.y.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.y.is_empty()
    }

    #[inline]
    pub fn x(&self) -> &FeatureMatrix {
        &self.x
    }

    #[inline]
    pub fn y(&self) -> &[f64] {
        &self.y
    }

    /// Shuffles the rows and splits them into `(train, test)`.
    ///
    /// The test partition holds `ceil(len * test_size)` rows.
    pub fn split<R: Rng>(&self, test_size: f64, rng: &mut R) -> Result<(Self, Self)> {
        if !(0.0..1.0).contains(&test_size) {
            return Err(MlErr::InvalidParam(format!(
                "test size must be in [0, 1), got {test_size}"
            )));
        }

        let mut indices: Vec<usize> = (0..self.len()).collect();
        indices.shuffle(rng);

        let n_test = (self.len() as f64 * test_size).ceil() as usize;
        let (test, train) = indices.split_at(n_test);

        Ok((self.take(train), self.take(test)))
    }

    fn take(&self, indices: &[usize]) -> Self {
        Self {
            x: self.x.take(indices),
            y: indices.iter().map(|&i| self.y[i]).collect(),
        }
    }
}
