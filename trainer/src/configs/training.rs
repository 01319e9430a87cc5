use std::path::PathBuf;

use pipeline::{
    artifact::{MODEL_NAME, ModelTag},
    features::DEFAULT_REFERENCE_YEAR,
    training::{DEFAULT_SEED, DEFAULT_TEST_SIZE},
};

use super::{from_process, parse_var};
use crate::error::{Result, TrainErr};

/// Store root used when `MODEL_STORE` is unset.
pub const DEFAULT_STORE: &str = "./models";

/// Everything a training run needs.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingConfig {
    pub data_path: PathBuf,
    pub store_root: PathBuf,
    /// Pinned version to save under, generated when `None`.
    pub version: Option<String>,
    pub seed: u64,
    pub test_size: f64,
    pub reference_year: i64,
}

impl TrainingConfig {
    /// A config with every default, reading data from `data_path`.
    pub fn new<P: Into<PathBuf>>(data_path: P) -> Self {
        Self {
            data_path: data_path.into(),
            store_root: PathBuf::from(DEFAULT_STORE),
            version: None,
            seed: DEFAULT_SEED,
            test_size: DEFAULT_TEST_SIZE,
            reference_year: DEFAULT_REFERENCE_YEAR,
        }
    }

    /// Reads `MODEL_STORE`, `MODEL_VERSION`, `TRAIN_SEED`, `TRAIN_TEST_SIZE`
    /// and `REFERENCE_YEAR` from the environment.
    pub fn from_env<P: Into<PathBuf>>(data_path: P) -> Result<Self> {
        Self::from_lookup(data_path, from_process)
    }

    /// Like `from_env`, reading variables through `lookup`.
    pub fn from_lookup<P, F>(data_path: P, lookup: F) -> Result<Self>
    where
        P: Into<PathBuf>,
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::new(data_path);

        let store_root = lookup("MODEL_STORE")
            .map(PathBuf::from)
            .unwrap_or(defaults.store_root);

        let version = match lookup("MODEL_VERSION") {
            Some(v) if !v.trim().is_empty() => {
                let v = v.trim().to_string();
                ModelTag::pinned(MODEL_NAME, &v).map_err(|e| TrainErr::InvalidConfig {
                    var: "MODEL_VERSION",
                    value: v.clone(),
                    reason: e.to_string(),
                })?;
                Some(v)
            }
            _ => None,
        };

        let seed = parse_var(&lookup, "TRAIN_SEED", defaults.seed)?;
        let test_size: f64 = parse_var(&lookup, "TRAIN_TEST_SIZE", defaults.test_size)?;
        if !(0.0..1.0).contains(&test_size) {
            return Err(TrainErr::InvalidConfig {
                var: "TRAIN_TEST_SIZE",
                value: test_size.to_string(),
                reason: "must be in [0, 1)".to_string(),
            });
        }
        let reference_year = parse_var(&lookup, "REFERENCE_YEAR", defaults.reference_year)?;

        Ok(Self {
            data_path: defaults.data_path,
            store_root,
            version,
            seed,
            test_size,
            reference_year,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| vars.get(k).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = TrainingConfig::from_lookup("data.csv", lookup(&[])).unwrap();
        assert_eq!(config, TrainingConfig::new("data.csv"));
        assert_eq!(config.seed, 42);
        assert_eq!(config.test_size, 0.2);
        assert_eq!(config.reference_year, 2016);
        assert_eq!(config.store_root, PathBuf::from("./models"));
    }

    #[test]
    fn reads_overrides() {
        let config = TrainingConfig::from_lookup(
            "data.csv",
            lookup(&[
                ("MODEL_STORE", "/tmp/store"),
                ("MODEL_VERSION", "v2"),
                ("TRAIN_SEED", "7"),
                ("TRAIN_TEST_SIZE", "0.25"),
                ("REFERENCE_YEAR", "2020"),
            ]),
        )
        .unwrap();

        assert_eq!(config.store_root, PathBuf::from("/tmp/store"));
        assert_eq!(config.version.as_deref(), Some("v2"));
        assert_eq!(config.seed, 7);
        assert_eq!(config.test_size, 0.25);
        assert_eq!(config.reference_year, 2020);
    }

    #[test]
    fn rejects_bad_values() {
        for (var, value) in [
            ("TRAIN_SEED", "-1"),
            ("TRAIN_TEST_SIZE", "1.5"),
            ("TRAIN_TEST_SIZE", "abc"),
            ("REFERENCE_YEAR", "soon"),
            ("MODEL_VERSION", "../v1"),
        ] {
            let err = TrainingConfig::from_lookup("data.csv", lookup(&[(var, value)])).unwrap_err();
            assert!(
                matches!(&err, TrainErr::InvalidConfig { var: v, .. } if *v == var),
                "{var}={value} gave {err}"
            );
        }
    }
}
