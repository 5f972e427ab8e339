//! Procedure descriptors and their two-step builder.

use crate::validator::{ValidationError, Validator};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Failure produced by a resolver.
///
/// A resolver may fail without a message of its own; such failures
/// surface as "Internal error" in the response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverError {
    message: Option<String>,
}

impl ResolverError {
    /// Creates a failure with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
        }
    }

    /// Creates a failure with no message of its own.
    pub fn internal() -> Self {
        Self { message: None }
    }

    /// Returns the failure message, defaulting to "Internal error".
    pub fn message(&self) -> &str {
        match &self.message {
            Some(message) if !message.is_empty() => message,
            _ => "Internal error",
        }
    }
}

impl fmt::Display for ResolverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ResolverError {}

impl From<String> for ResolverError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<&str> for ResolverError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

type ResolverFuture = Pin<Box<dyn Future<Output = Result<Value, ResolverError>> + Send>>;
type ResolverFn = Arc<dyn Fn(Value) -> ResolverFuture + Send + Sync>;

/// A named operation pairing an input validator with a resolver.
///
/// Immutable once built; clones share the same validator and resolver.
#[derive(Clone)]
pub struct Procedure {
    validator: Arc<dyn Validator>,
    resolver: ResolverFn,
}

impl Procedure {
    /// Starts the builder chain. A validator must be attached before a
    /// resolver can complete the procedure.
    pub fn builder() -> ProcedureBuilder {
        ProcedureBuilder
    }

    /// Runs the attached validator over raw params.
    pub fn validate(&self, params: &Value) -> Result<Value, ValidationError> {
        self.validator.parse(params)
    }

    /// Invokes the resolver with validated input.
    ///
    /// The resolver may complete immediately or suspend; callers await
    /// either uniformly.
    pub async fn resolve(&self, input: Value) -> Result<Value, ResolverError> {
        (self.resolver)(input).await
    }
}

impl fmt::Debug for Procedure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Procedure")
    }
}

/// Entry point of the builder chain.
pub struct ProcedureBuilder;

impl ProcedureBuilder {
    /// Attaches the input validator.
    pub fn input<V: Validator + 'static>(self, validator: V) -> ProcedureWithInput {
        ProcedureWithInput {
            validator: Arc::new(validator),
        }
    }
}

/// Builder state with a validator attached.
///
/// The only way out is [`ProcedureWithInput::resolve`], so a router can
/// never see a procedure without both halves.
pub struct ProcedureWithInput {
    validator: Arc<dyn Validator>,
}

impl ProcedureWithInput {
    /// Attaches the resolver and finishes the procedure.
    ///
    /// The resolver receives the validated input deserialized as `I`
    /// and produces a serializable output or a [`ResolverError`].
    pub fn resolve<I, O, F, Fut>(self, resolver: F) -> Procedure
    where
        I: DeserializeOwned + Send,
        O: Serialize,
        F: Fn(I) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<O, ResolverError>> + Send + 'static,
    {
        let resolver = Arc::new(resolver);
        let erased: ResolverFn = Arc::new(move |input: Value| {
            let resolver = resolver.clone();
            Box::pin(async move {
                let typed: I = serde_json::from_value(input)
                    .map_err(|err| ResolverError::new(err.to_string()))?;
                let output = resolver(typed).await?;
                serde_json::to_value(&output).map_err(|err| ResolverError::new(err.to_string()))
            })
        });
        Procedure {
            validator: self.validator,
            resolver: erased,
        }
    }
}
