use std::{fmt, io};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use log::{error, warn};
use pipeline::{MlErr, StoreErr};
use schema::{ValidationErr, msg::ErrorBody};

pub type Result<T> = std::result::Result<T, ServeErr>;

/// All errors that can occur while starting or running the service.
#[derive(Debug)]
pub enum ServeErr {
    /// An environment variable holds an unusable value.
    InvalidConfig {
        var: &'static str,
        value: String,
        reason: String,
    },
    /// The model could not be loaded at startup.
    Store(StoreErr),
    /// Binding or serving failed.
    Io(io::Error),
    /// The request body is not valid JSON.
    MalformedJson(String),
    /// The request body is valid JSON but not a valid building.
    Validation(ValidationErr),
    /// The validated input cannot be laid out in the model's feature order.
    FeatureMismatch(MlErr),
    /// The model failed on a well-formed input.
    Prediction(MlErr),
}

impl ServeErr {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MalformedJson(_) | Self::Validation(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for ServeErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfig { var, value, reason } => {
                write!(f, "invalid config: {var}={value:?}: {reason}")
            }
            Self::Store(e) => write!(f, "cannot load the model: {e}"),
            Self::Io(e) => write!(f, "io error: {e}"),
            Self::MalformedJson(msg) => write!(f, "malformed json: {msg}"),
            Self::Validation(e) => write!(f, "{e}"),
            Self::FeatureMismatch(e) => write!(f, "feature mismatch: {e}"),
            Self::Prediction(e) => write!(f, "prediction failed: {e}"),
        }
    }
}

impl std::error::Error for ServeErr {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Store(e) => Some(e),
            Self::Io(e) => Some(e),
            Self::Validation(e) => Some(e),
            Self::FeatureMismatch(e) | Self::Prediction(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StoreErr> for ServeErr {
    fn from(e: StoreErr) -> Self {
        Self::Store(e)
    }
}

impl From<io::Error> for ServeErr {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<ValidationErr> for ServeErr {
    fn from(e: ValidationErr) -> Self {
        Self::Validation(e)
    }
}

impl IntoResponse for ServeErr {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            Self::Validation(e) => {
                warn!(violations = e.violations().len(); "rejected request: {e}");
                ErrorBody::from(e)
            }
            Self::MalformedJson(msg) => {
                warn!("rejected request: {msg}");
                ErrorBody::new(format!("malformed json: {msg}"))
            }
            Self::FeatureMismatch(e) => {
                error!("{e}");
                ErrorBody::new("feature mismatch between the request and the model")
            }
            other => {
                error!("{other}");
                ErrorBody::new("internal error")
            }
        };

        (status, Json(body)).into_response()
    }
}
