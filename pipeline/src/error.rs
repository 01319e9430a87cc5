use std::{
    error::Error,
    fmt::{self, Display},
    io,
    path::PathBuf,
};

/// The result type used in the entire pipeline crate.
pub type Result<T> = std::result::Result<T, MlErr>;

/// Failures while loading data, fitting or applying the pipeline.
#[derive(Debug)]
pub enum MlErr {
    Io(io::Error),
    Csv(csv::Error),
    SizeMismatch {
        a: &'static str,
        b: &'static str,
        got: usize,
        expected: usize,
    },
    MissingColumn(String),
    MissingFeature(String),
    NonNumeric {
        column: String,
        got: String,
    },
    EmptyColumn(String),
    NotEnoughRows {
        got: usize,
        needed: usize,
    },
    FeatureOrderMismatch {
        expected: Vec<String>,
        got: Vec<String>,
    },
    InvalidParam(String),
}

impl Display for MlErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MlErr::Io(e) => write!(f, "io error: {e}"),
            MlErr::Csv(e) => write!(f, "csv error: {e}"),
            MlErr::SizeMismatch {
                a,
                b,
                got,
                expected,
            } => write!(
                f,
                "There's a size mismatch between {a} and {b}, got {got} and expected {expected}"
            ),
            MlErr::MissingColumn(name) => write!(f, "column {name:?} is not in the dataset"),
            MlErr::MissingFeature(name) => {
                write!(f, "feature {name:?} cannot be mapped from the input")
            }
            MlErr::NonNumeric { column, got } => {
                write!(f, "numeric column {column:?} holds a non-numeric value {got:?}")
            }
            MlErr::EmptyColumn(name) => {
                write!(f, "column {name:?} has no values to fit on")
            }
            MlErr::NotEnoughRows { got, needed } => {
                write!(f, "not enough complete rows, got {got} and need at least {needed}")
            }
            MlErr::FeatureOrderMismatch { expected, got } => write!(
                f,
                "feature order mismatch, the pipeline was fit on {expected:?} but got {got:?}"
            ),
            MlErr::InvalidParam(msg) => write!(f, "invalid parameter: {msg}"),
        }
    }
}

impl Error for MlErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            MlErr::Io(e) => Some(e),
            MlErr::Csv(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for MlErr {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<csv::Error> for MlErr {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value)
    }
}

/// Failures of the model artifact store.
#[derive(Debug)]
pub enum StoreErr {
    Io {
        path: PathBuf,
        source: io::Error,
    },
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    InvalidTag(String),
    NotFound(String),
    VersionExists(String),
    IncompatibleFormat {
        found: u32,
        expected: u32,
    },
    Corrupt(String),
}

impl Display for StoreErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreErr::Io { path, source } => write!(f, "io error at {}: {source}", path.display()),
            StoreErr::Json { path, source } => {
                write!(f, "malformed artifact at {}: {source}", path.display())
            }
            StoreErr::InvalidTag(msg) => write!(f, "invalid model tag: {msg}"),
            StoreErr::NotFound(tag) => write!(f, "model {tag} was not found in the store"),
            StoreErr::VersionExists(tag) => write!(f, "model {tag} already exists"),
            StoreErr::IncompatibleFormat { found, expected } => write!(
                f,
                "artifact format {found} is not supported, expected format {expected}"
            ),
            StoreErr::Corrupt(msg) => write!(f, "corrupt artifact: {msg}"),
        }
    }
}

impl Error for StoreErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            StoreErr::Io { source, .. } => Some(source),
            StoreErr::Json { source, .. } => Some(source),
            _ => None,
        }
    }
}
