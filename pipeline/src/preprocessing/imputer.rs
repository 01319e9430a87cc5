use std::collections::BTreeMap;

use schema::Value;
use serde::{Deserialize, Serialize};

use crate::error::{MlErr, Result};

/// How a missing cell gets replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImputeStrategy {
    Median,
    MostFrequent,
}

/// Replaces missing cells of one column with a statistic learnt at fit time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimpleImputer {
    strategy: ImputeStrategy,
    fill: Value,
}

impl SimpleImputer {
    /// Learns the fill value of the column `name` from its present cells.
    pub fn fit<'a, I>(strategy: ImputeStrategy, name: &str, cells: I) -> Result<Self>
    where
        I: IntoIterator<Item = Option<&'a Value>>,
    {
        let present = cells.into_iter().flatten();
        let fill = match strategy {
            ImputeStrategy::Median => median(name, present)?,
            ImputeStrategy::MostFrequent => most_frequent(present),
        };

        let fill = fill.ok_or_else(|| MlErr::EmptyColumn(name.to_string()))?;
        Ok(Self { strategy, fill })
    }

    pub fn strategy(&self) -> ImputeStrategy {
        self.strategy
    }

    pub fn fill(&self) -> &Value {
        &self.fill
    }

    /// Returns the cell itself, or the fill value when it is missing.
    #[inline]
    pub fn apply<'a>(&'a self, cell: Option<&'a Value>) -> &'a Value {
        cell.unwrap_or(&self.fill)
    }
}

fn median<'a>(name: &str, cells: impl Iterator<Item = &'a Value>) -> Result<Option<Value>> {
    let mut values = cells
        .map(|v| {
            v.as_f64().ok_or_else(|| MlErr::NonNumeric {
                column: name.to_string(),
                got: v.to_string(),
            })
        })
        .collect::<Result<Vec<f64>>>()?;

    if values.is_empty() {
        return Ok(None);
    }

    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    let median = if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    };

    Ok(Some(Value::Float(median)))
}

/// The most common category; ties go to the smallest key.
fn most_frequent<'a>(cells: impl Iterator<Item = &'a Value>) -> Option<Value> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for v in cells {
        *counts.entry(v.category_key()).or_default() += 1;
    }

    let mut best: Option<(String, usize)> = None;
    for (key, count) in counts {
        if best.as_ref().is_none_or(|(_, c)| count > *c) {
            best = Some((key, count));
        }
    }

    best.map(|(key, _)| Value::Text(key))
}
