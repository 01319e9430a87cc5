use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as Json};

use crate::{
    building::BuildingRecord,
    error::{ValidationErr, Violation},
};

/// Key of the building object inside a request body.
pub const PAYLOAD_KEY: &str = "payload";

/// Optional outer wrapper some clients send around the payload object.
pub const WRAPPER_KEY: &str = "input_data";

/// Extracts and validates the building carried by a `/predict` body.
///
/// Both `{"payload": {..}}` and `{"input_data": {"payload": {..}}}` are
/// accepted.
pub fn parse_request(body: &Json) -> Result<BuildingRecord, ValidationErr> {
    let object = body
        .as_object()
        .ok_or_else(|| ValidationErr::single("body", Violation::WrongType { expected: "an object" }))?;

    let object = match object.get(WRAPPER_KEY) {
        Some(Json::Object(inner)) if !object.contains_key(PAYLOAD_KEY) => inner,
        _ => object,
    };

    let payload = match object.get(PAYLOAD_KEY) {
        Some(Json::Object(payload)) => payload,
        Some(_) => {
            return Err(ValidationErr::single(
                PAYLOAD_KEY,
                Violation::WrongType { expected: "an object" },
            ));
        }
        None => return Err(ValidationErr::single(PAYLOAD_KEY, Violation::Missing)),
    };

    BuildingRecord::from_payload(payload)
}

/// A successful prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictResponse {
    #[serde(rename = "prediction_SiteEnergyUse_kBtu")]
    pub prediction: f64,
    /// The feature values handed to the model, keyed by wire name.
    pub input_used: Map<String, Json>,
}

/// A single violated constraint, as reported to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViolationBody {
    pub field: String,
    pub message: String,
}

/// Body of every non-2xx response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub violations: Vec<ViolationBody>,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            violations: Vec::new(),
        }
    }
}

impl From<&ValidationErr> for ErrorBody {
    fn from(err: &ValidationErr) -> Self {
        let violations = err
            .violations()
            .iter()
            .map(|v| ViolationBody {
                field: v.field.clone(),
                message: v.violation.to_string(),
            })
            .collect();

        Self {
            error: "validation failed".to_string(),
            violations,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn missing_payload_is_a_violation() {
        let err = parse_request(&json!({ "building": {} })).unwrap_err();
        assert_eq!(err.get(PAYLOAD_KEY), Some(&Violation::Missing));
    }

    #[test]
    fn non_object_body_is_rejected() {
        let err = parse_request(&json!([1, 2])).unwrap_err();
        assert!(err.get("body").is_some());
    }

    #[test]
    fn wrapped_payload_is_unwrapped() {
        let err = parse_request(&json!({ "input_data": { "payload": {} } })).unwrap_err();
        assert_eq!(err.violations().len(), 17);
    }

    #[test]
    fn error_body_lists_violations() {
        let err = parse_request(&json!({ "payload": 3 })).unwrap_err();
        let body = ErrorBody::from(&err);
        assert_eq!(body.error, "validation failed");
        assert_eq!(body.violations[0].field, "payload");
        assert_eq!(body.violations[0].message, "expected an object");
    }

    #[test]
    fn response_uses_the_documented_key() {
        let resp = PredictResponse {
            prediction: 1.5,
            input_used: Map::new(),
        };
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["prediction_SiteEnergyUse_kBtu"], json!(1.5));
    }
}
