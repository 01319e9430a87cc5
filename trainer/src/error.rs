use std::fmt;

use pipeline::{MlErr, StoreErr};

pub type Result<T> = std::result::Result<T, TrainErr>;

/// All errors that can occur during a training run.
#[derive(Debug)]
pub enum TrainErr {
    /// An environment variable holds an unusable value, caught before any work starts.
    InvalidConfig {
        var: &'static str,
        value: String,
        reason: String,
    },
    /// Loading, fitting or evaluating failed.
    Ml(MlErr),
    /// The trained model could not be stored.
    Store(StoreErr),
}

impl fmt::Display for TrainErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfig { var, value, reason } => {
                write!(f, "invalid config: {var}={value:?}: {reason}")
            }
            Self::Ml(e) => write!(f, "training failed: {e}"),
            Self::Store(e) => write!(f, "saving the model failed: {e}"),
        }
    }
}

impl std::error::Error for TrainErr {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Ml(e) => Some(e),
            Self::Store(e) => Some(e),
            _ => None,
        }
    }
}

impl From<MlErr> for TrainErr {
    fn from(e: MlErr) -> Self {
        Self::Ml(e)
    }
}

impl From<StoreErr> for TrainErr {
    fn from(e: StoreErr) -> Self {
        Self::Store(e)
    }
}
