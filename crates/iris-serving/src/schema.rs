//! Request and response payloads, and request validation.
//!
//! Validation is a pure function from raw request bytes (or a parsed JSON
//! value) to either an [`IrisInput`] or a [`ValidationErrors`] listing every
//! failing field. Error entries follow the shape clients of the service
//! already parse:
//!
//! ```json
//! {"detail": [{"type": "missing", "loc": ["body", "petal_width"],
//!              "msg": "Field required", "input": {...}}]}
//! ```

use iris_data::{FeatureVector, FEATURE_NAMES, N_FEATURES};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Greeting returned by the welcome endpoint.
pub const WELCOME_MESSAGE: &str = "Welcome to the ML Model API";

/// One set of flower measurements, in centimetres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IrisInput {
    pub sepal_length: f64,
    pub sepal_width: f64,
    pub petal_length: f64,
    pub petal_width: f64,
}

impl IrisInput {
    /// Build an input from a feature vector in training column order.
    pub fn from_features(features: FeatureVector) -> Self {
        let [sepal_length, sepal_width, petal_length, petal_width] = features;
        Self {
            sepal_length,
            sepal_width,
            petal_length,
            petal_width,
        }
    }

    /// The feature vector in training column order.
    pub fn features(&self) -> FeatureVector {
        [
            self.sepal_length,
            self.sepal_width,
            self.petal_length,
            self.petal_width,
        ]
    }

    /// Validate a raw request body.
    pub fn from_body(body: &[u8]) -> Result<Self, ValidationErrors> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Err(FieldError::body_missing().into());
        }
        let value: Value = serde_json::from_slice(body)
            .map_err(|e| ValidationErrors::from(FieldError::json_invalid(&e)))?;
        Self::from_json(&value)
    }

    /// Validate a parsed JSON value.
    ///
    /// Every feature field must be present and coercible to a finite float.
    /// Unknown fields are ignored.
    pub fn from_json(value: &Value) -> Result<Self, ValidationErrors> {
        let object = value
            .as_object()
            .ok_or_else(|| ValidationErrors::from(FieldError::not_an_object(value.clone())))?;

        let mut features = [0.0; N_FEATURES];
        let mut errors = Vec::new();
        for (slot, name) in features.iter_mut().zip(FEATURE_NAMES) {
            match object.get(name) {
                None => errors.push(FieldError::missing(name, value.clone())),
                Some(raw) => match coerce_float(name, raw) {
                    Ok(v) => *slot = v,
                    Err(e) => errors.push(e),
                },
            }
        }

        if errors.is_empty() {
            Ok(Self::from_features(features))
        } else {
            Err(ValidationErrors::from(errors))
        }
    }
}

fn coerce_float(field: &str, raw: &Value) -> Result<f64, FieldError> {
    let parsed = match raw {
        Value::Number(n) => n.as_f64(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::String(s) => match s.trim().parse::<f64>() {
            Ok(v) => Some(v),
            Err(_) => return Err(FieldError::float_parsing(field, raw.clone())),
        },
        _ => return Err(FieldError::float_type(field, raw.clone())),
    };
    match parsed {
        Some(v) if v.is_finite() => Ok(v),
        _ => Err(FieldError::finite_number(field, raw.clone())),
    }
}

/// A single validation failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldError {
    /// Machine-readable error kind.
    #[serde(rename = "type")]
    pub kind: String,

    /// Location of the failure: `["body"]` or `["body", <field>]`.
    pub loc: Vec<String>,

    /// Human-readable message.
    pub msg: String,

    /// The offending input.
    pub input: Value,

    /// Extra context, such as the decoder message for malformed JSON.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ctx: Option<Value>,
}

impl FieldError {
    fn new(kind: &str, loc: Vec<String>, msg: &str, input: Value) -> Self {
        Self {
            kind: kind.to_string(),
            loc,
            msg: msg.to_string(),
            input,
            ctx: None,
        }
    }

    fn field_loc(field: &str) -> Vec<String> {
        vec!["body".to_string(), field.to_string()]
    }

    fn body_loc() -> Vec<String> {
        vec!["body".to_string()]
    }

    /// A required field is absent. `input` is the whole object.
    pub fn missing(field: &str, input: Value) -> Self {
        Self::new("missing", Self::field_loc(field), "Field required", input)
    }

    /// A field holds `null`, an array or an object.
    pub fn float_type(field: &str, input: Value) -> Self {
        Self::new(
            "float_type",
            Self::field_loc(field),
            "Input should be a valid number",
            input,
        )
    }

    /// A string field does not parse as a number.
    pub fn float_parsing(field: &str, input: Value) -> Self {
        Self::new(
            "float_parsing",
            Self::field_loc(field),
            "Input should be a valid number, unable to parse string as a number",
            input,
        )
    }

    /// A field parses to NaN or infinity.
    pub fn finite_number(field: &str, input: Value) -> Self {
        Self::new(
            "finite_number",
            Self::field_loc(field),
            "Input should be a finite number",
            input,
        )
    }

    /// The request carried no body.
    pub fn body_missing() -> Self {
        Self::new("missing", Self::body_loc(), "Field required", Value::Null)
    }

    /// The body is not well-formed JSON.
    pub fn json_invalid(err: &serde_json::Error) -> Self {
        let mut e = Self::new("json_invalid", Self::body_loc(), "JSON decode error", Value::Null);
        e.ctx = Some(serde_json::json!({ "error": err.to_string() }));
        e
    }

    /// The body is JSON but not an object.
    pub fn not_an_object(input: Value) -> Self {
        Self::new(
            "model_attributes_type",
            Self::body_loc(),
            "Input should be a valid dictionary or object to extract fields from",
            input,
        )
    }

    /// The field this error refers to, if any.
    pub fn field(&self) -> Option<&str> {
        match self.loc.as_slice() {
            [_, field] => Some(field.as_str()),
            _ => None,
        }
    }
}

/// All validation failures for one request, serialized as `{"detail": [...]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationErrors {
    pub detail: Vec<FieldError>,
}

impl ValidationErrors {
    /// The individual failures.
    pub fn errors(&self) -> &[FieldError] {
        &self.detail
    }

    pub fn len(&self) -> usize {
        self.detail.len()
    }

    pub fn is_empty(&self) -> bool {
        self.detail.is_empty()
    }
}

impl From<Vec<FieldError>> for ValidationErrors {
    fn from(detail: Vec<FieldError>) -> Self {
        Self { detail }
    }
}

impl From<FieldError> for ValidationErrors {
    fn from(error: FieldError) -> Self {
        Self {
            detail: vec![error],
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} validation error(s)", self.detail.len())?;
        for (i, e) in self.detail.iter().enumerate() {
            let sep = if i == 0 { ": " } else { "; " };
            write!(f, "{}{}: {}", sep, e.loc.join("."), e.msg)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Response of the predict endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictResponse {
    /// Class label: 0 setosa, 1 versicolor, 2 virginica.
    pub prediction: usize,
}

/// Response of the welcome endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WelcomeResponse {
    pub message: String,
}

impl Default for WelcomeResponse {
    fn default() -> Self {
        Self {
            message: WELCOME_MESSAGE.to_string(),
        }
    }
}
