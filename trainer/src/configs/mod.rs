mod training;

pub use training::{DEFAULT_STORE, TrainingConfig};

use std::{env, str::FromStr};

use crate::error::{Result, TrainErr};

/// Reads `var` through `lookup`, falling back to `default` when unset.
pub(crate) fn parse_var<T, F>(lookup: &F, var: &'static str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: ToString,
    F: Fn(&str) -> Option<String>,
{
    let Some(value) = lookup(var) else {
        return Ok(default);
    };

    let parsed = value.trim().parse::<T>();
    parsed.map_err(|e| TrainErr::InvalidConfig {
        var,
        reason: e.to_string(),
        value,
    })
}

/// Looks variables up in the process environment.
pub(crate) fn from_process(var: &str) -> Option<String> {
    env::var(var).ok()
}
