//! Derived building features, reconstructed from raw columns at training time.

use log::debug;
use schema::{Value, fields};

use crate::{dataset::Frame, error::Result};

/// Raw column holding the construction year.
pub const YEAR_BUILT: &str = "YearBuilt";

/// Year the benchmark data was collected, used to turn construction years into ages.
pub const DEFAULT_REFERENCE_YEAR: i64 = 2016;

/// Fills in the derived feature columns a dataset is missing.
#[derive(Debug, Clone, Copy)]
pub struct FeatureBuilder {
    reference_year: i64,
}

impl Default for FeatureBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_REFERENCE_YEAR)
    }
}

impl FeatureBuilder {
    pub fn new(reference_year: i64) -> Self {
        Self { reference_year }
    }

    /// Adds every derived column that is absent from `frame` and whose source
    /// columns are present. Existing columns are left untouched.
    ///
    /// # Returns
    /// The names of the columns that were added.
    pub fn build(&self, frame: &mut Frame) -> Result<Vec<&'static str>> {
        let total = fields::PROPERTY_GFA_TOTAL.wire;
        let parking = fields::PROPERTY_GFA_PARKING.wire;

        let derivations: [(&'static str, &[&str], Derivation); 5] = [
            (fields::BUILDING_AGE.wire, &[YEAR_BUILT], |year, s| {
                Some(whole(year as f64 - s[0]))
            }),
            (fields::HAS_PARKING.wire, &[parking], |_, s| {
                Some(Value::Int(i64::from(s[0] > 0.0)))
            }),
            (fields::PARKING_RATIO.wire, &[parking, total], |_, s| {
                ratio(s[0], s[1])
            }),
            (
                fields::AREA_PER_FLOOR.wire,
                &[fields::PROPERTY_GFA_BUILDINGS.wire, fields::NUMBER_OF_FLOORS.wire],
                |_, s| ratio(s[0], s[1]),
            ),
            (
                fields::BUILDING_DENSITY.wire,
                &[fields::NUMBER_OF_BUILDINGS.wire, total],
                |_, s| ratio(s[0], s[1]),
            ),
        ];

        let mut added = Vec::new();
        for (name, sources, f) in derivations {
            if derive_column(frame, name, sources, |s| f(self.reference_year, s))? {
                added.push(name);
            }
        }

        debug!("derived columns: {added:?}");
        Ok(added)
    }
}

/// Computes a derived cell from the reference year and the source values.
type Derivation = fn(i64, &[f64]) -> Option<Value>;

/// Computes `name` row by row from `sources`.
///
/// A row with a missing or non-numeric source cell gets a missing cell.
/// Returns whether the column was added.
fn derive_column<F>(frame: &mut Frame, name: &str, sources: &[&str], f: F) -> Result<bool>
where
    F: Fn(&[f64]) -> Option<Value>,
{
    if frame.has_column(name) {
        return Ok(false);
    }

    let Some(columns) = sources
        .iter()
        .map(|s| frame.column(s))
        .collect::<Option<Vec<_>>>()
    else {
        debug!("cannot derive {name}, a source column is absent");
        return Ok(false);
    };

    let cells = (0..frame.len())
        .map(|i| {
            let inputs: Option<Vec<f64>> = columns
                .iter()
                .map(|c| c[i].as_ref().and_then(Value::as_f64))
                .collect();
            inputs.and_then(|inputs| f(&inputs))
        })
        .collect();

    frame.push_column(name, cells)?;
    Ok(true)
}

/// `num / den`, missing when the denominator is zero.
fn ratio(num: f64, den: f64) -> Option<Value> {
    (den != 0.0).then(|| Value::Float(num / den))
}

fn whole(v: f64) -> Value {
    if v.fract() == 0.0 {
        Value::Int(v as i64)
    } else {
        Value::Float(v)
    }
}
