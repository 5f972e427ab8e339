//! Request handling: path resolution, validation, resolver invocation.

use router::{PathIndex, Router};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;
use wire::{Request, Response};

/// Tracing target for dispatch events.
pub(crate) const DISPATCH_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::handle");

/// Dispatches inbound requests against a composed router.
///
/// The router is flattened into a path index once at construction;
/// handling a request never walks the tree. Clones share the index, so
/// concurrently in-flight dispatches consult the same read-only table.
#[derive(Clone)]
pub struct Dispatcher {
    index: Arc<PathIndex>,
}

impl Dispatcher {
    /// Creates a dispatcher for `router`.
    pub fn new(router: &Router) -> Self {
        Self {
            index: Arc::new(PathIndex::build(router)),
        }
    }

    /// Handles one request, producing exactly one response.
    ///
    /// An unresolvable path or a validation rejection produces a failure
    /// response without the resolver ever being consulted; a resolver
    /// failure is converted into a failure response, never propagated.
    pub async fn handle(&self, request: Request) -> Response {
        let Request { id, method, params } = request;

        let procedure = match self.index.lookup(&method) {
            Some(procedure) => procedure,
            None => {
                debug!(target: DISPATCH_TARGET, %id, method = %method, "unknown method");
                return Response::failure(id, format!("Unknown method: {}", method));
            }
        };

        let raw = params.unwrap_or(Value::Null);
        let input = match procedure.validate(&raw) {
            Ok(input) => input,
            Err(rejection) => {
                debug!(target: DISPATCH_TARGET, %id, method = %method, "validation rejected");
                return Response::failure(id, rejection.to_string());
            }
        };

        match procedure.resolve(input).await {
            Ok(result) => Response::success(id, result),
            Err(failure) => {
                debug!(target: DISPATCH_TARGET, %id, method = %method, "resolver failed");
                Response::failure(id, failure.message())
            }
        }
    }
}
