//! Input validation contract consumed by the dispatcher.
//!
//! The validation engine itself is a collaborator, not part of this
//! crate: anything upholding the [`Validator::parse`] contract plugs in.
//! Two standard adapters are provided so the workspace is usable without
//! an external engine.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::marker::PhantomData;
use thiserror::Error;

/// Rejection produced by a validator.
///
/// The message is surfaced verbatim in the failure response, so it
/// should be human-readable on its own.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    /// Creates a rejection with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Validates and coerces raw call parameters.
pub trait Validator: Send + Sync {
    /// Validates `value`, returning the validated/coerced value.
    fn parse(&self, value: &Value) -> Result<Value, ValidationError>;
}

/// Serde-backed structural validator.
///
/// Accepts any value that deserializes into `T` and re-serializes the
/// typed value, so fields `T` does not declare are dropped and defaults
/// are filled in. Rejection messages come from the deserializer.
pub struct Schema<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> Schema<T> {
    /// Creates a schema validator for `T`.
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for Schema<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Validator for Schema<T>
where
    T: DeserializeOwned + Serialize,
{
    fn parse(&self, value: &Value) -> Result<Value, ValidationError> {
        let typed: T = serde_json::from_value(value.clone())
            .map_err(|err| ValidationError::new(err.to_string()))?;
        serde_json::to_value(&typed).map_err(|err| ValidationError::new(err.to_string()))
    }
}

/// Shorthand for [`Schema::new`].
pub fn schema<T>() -> Schema<T> {
    Schema::new()
}

/// Validator for procedures that take no parameters.
///
/// Accepts only absent params (the dispatcher passes `null` for a
/// request whose params field is missing).
pub struct NoParams;

impl Validator for NoParams {
    fn parse(&self, value: &Value) -> Result<Value, ValidationError> {
        if value.is_null() {
            Ok(Value::Null)
        } else {
            Err(ValidationError::new("Expected no parameters"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Serialize, Deserialize)]
    struct EchoParams {
        text: String,
    }

    #[test]
    fn test_schema_accepts_matching_value() {
        let validator = schema::<EchoParams>();
        let parsed = validator.parse(&json!({"text": "hello"})).unwrap();
        assert_eq!(parsed, json!({"text": "hello"}));
    }

    #[test]
    fn test_schema_drops_undeclared_fields() {
        let validator = schema::<EchoParams>();
        let parsed = validator
            .parse(&json!({"text": "hello", "extra": 1}))
            .unwrap();
        assert_eq!(parsed, json!({"text": "hello"}));
    }

    #[test]
    fn test_schema_rejects_wrong_shape() {
        let validator = schema::<EchoParams>();
        let result = validator.parse(&json!({"text": 5}));
        assert!(result.is_err());
    }

    #[test]
    fn test_rejection_message_is_verbatim() {
        let rejection = ValidationError::new("text must be a string");
        assert_eq!(rejection.to_string(), "text must be a string");
    }

    #[test]
    fn test_no_params_accepts_null() {
        assert_eq!(NoParams.parse(&Value::Null).unwrap(), Value::Null);
    }

    #[test]
    fn test_no_params_rejects_values() {
        let result = NoParams.parse(&json!({"unexpected": true}));
        assert_eq!(
            result.unwrap_err().to_string(),
            "Expected no parameters"
        );
    }
}
