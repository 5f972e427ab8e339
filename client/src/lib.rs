//! # RPC Client
//!
//! Client side of the protocol: path-addressed calls with correlation-id
//! matching against a pending-call table.
//!
//! ## Philosophy
//!
//! - **One table, one owner**: the pending table belongs to the client
//!   instance that created it; nothing else settles its entries
//! - **Ids match, ordering doesn't**: responses may arrive in any order
//!   relative to requests
//! - **No invented liveness**: the protocol has no timeout; a deadline
//!   exists only when the caller supplies one
//!
//! A [`RpcClient`] owns its transport through a pump task started at
//! connect time and stopped with the client (the single registered
//! inbound handler). [`RpcClient::call`] is the primitive;
//! [`RpcClient::call_typed`] is the strongly typed façade applications
//! wrap in concrete per-router clients.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use wire::{CallId, Request, Response, Transport};

/// Tracing target for pump events.
const PUMP_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::pump");

/// Client-side call failure.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CallError {
    /// The dispatcher answered with a failure response; carries the
    /// error text exactly as it crossed the wire.
    #[error("{0}")]
    Remote(String),
    /// The transport was gone before the call could be sent.
    #[error("Transport disconnected")]
    Disconnected,
    /// A caller-supplied deadline expired before the response arrived.
    #[error("Call timed out")]
    TimedOut,
    /// Params or result failed (de)serialization at the client boundary.
    #[error("Codec error: {0}")]
    Codec(String),
}

type Settlement = Result<Value, CallError>;
type PendingTable = Arc<Mutex<HashMap<CallId, oneshot::Sender<Settlement>>>>;

/// Path-addressed RPC client over a message transport.
///
/// Correlation ids come from a monotonic counter starting at 1; each
/// call records a continuation in the pending table and is settled
/// exactly once by the matching response. A response for an id that is
/// not pending (already settled, unsolicited, duplicate) is discarded
/// silently. Closing the transport orphans outstanding calls without
/// waking them; [`RpcClient::call_with_timeout`] is the explicit escape.
pub struct RpcClient {
    requests: mpsc::UnboundedSender<Request>,
    pending: PendingTable,
    counter: AtomicU64,
    pump: JoinHandle<()>,
}

impl RpcClient {
    /// Connects over `transport`, spawning the pump task that owns it.
    pub fn connect<T: Transport + 'static>(transport: T) -> Self {
        let (req_tx, req_rx) = mpsc::unbounded_channel();
        let pending: PendingTable = Arc::new(Mutex::new(HashMap::new()));
        let pump = tokio::spawn(pump(transport, req_rx, pending.clone()));
        Self {
            requests: req_tx,
            pending,
            counter: AtomicU64::new(0),
            pump,
        }
    }

    /// Calls the procedure at `path` and awaits its result value.
    pub async fn call(&self, path: &str, params: Option<Value>) -> Result<Value, CallError> {
        let (id, settled) = self.begin_call(path, params).await?;
        match settled.await {
            Ok(outcome) => outcome,
            Err(_) => {
                // The table outlives the pump, so a dropped continuation
                // means the client itself went away mid-call.
                debug!(target: PUMP_TARGET, %id, "continuation dropped before settlement");
                Err(CallError::Disconnected)
            }
        }
    }

    /// Calls with a caller-supplied deadline.
    ///
    /// The protocol has no timeout of its own: a call whose response
    /// never arrives stays pending for the life of the process. On
    /// expiry the pending entry is removed and the call fails with
    /// [`CallError::TimedOut`]; a response arriving later is then
    /// discarded like any other unmatched response.
    pub async fn call_with_timeout(
        &self,
        path: &str,
        params: Option<Value>,
        limit: Duration,
    ) -> Result<Value, CallError> {
        let (id, settled) = self.begin_call(path, params).await?;
        match tokio::time::timeout(limit, settled).await {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(_)) => Err(CallError::Disconnected),
            Err(_) => {
                self.pending.lock().await.remove(&id);
                Err(CallError::TimedOut)
            }
        }
    }

    /// Strongly typed façade over [`RpcClient::call`].
    ///
    /// Serializes `params`, deserializes the result. Per-application
    /// clients wrap this with one concrete method per procedure,
    /// mirroring the router's declared shape.
    pub async fn call_typed<I, O>(&self, path: &str, params: &I) -> Result<O, CallError>
    where
        I: Serialize,
        O: DeserializeOwned,
    {
        let params =
            serde_json::to_value(params).map_err(|err| CallError::Codec(err.to_string()))?;
        let result = self.call(path, Some(params)).await?;
        serde_json::from_value(result).map_err(|err| CallError::Codec(err.to_string()))
    }

    /// Stops the pump task. Outstanding calls are orphaned, not failed.
    pub fn shutdown(self) {
        self.pump.abort();
    }

    async fn begin_call(
        &self,
        path: &str,
        params: Option<Value>,
    ) -> Result<(CallId, oneshot::Receiver<Settlement>), CallError> {
        let id = CallId::from_raw(self.counter.fetch_add(1, Ordering::Relaxed) + 1);
        let (settle_tx, settle_rx) = oneshot::channel();
        self.pending.lock().await.insert(id, settle_tx);

        let request = Request::new(id, path, params);
        if self.requests.send(request).is_err() {
            self.pending.lock().await.remove(&id);
            return Err(CallError::Disconnected);
        }
        Ok((id, settle_rx))
    }
}

impl Drop for RpcClient {
    fn drop(&mut self) {
        self.pump.abort();
    }
}

/// Reader/writer pump owned by one client for its lifetime.
///
/// Exits when the peer closes the channel or the client is dropped; on
/// teardown the pending table is left untouched, so outstanding calls
/// stay pending (the protocol carries no liveness signal to forward).
async fn pump<T: Transport>(
    mut transport: T,
    mut requests: mpsc::UnboundedReceiver<Request>,
    pending: PendingTable,
) {
    loop {
        tokio::select! {
            inbound = transport.recv() => {
                let value = match inbound {
                    Some(value) => value,
                    None => break,
                };
                let response = match Response::from_value(value) {
                    Ok(response) => response,
                    Err(err) => {
                        warn!(target: PUMP_TARGET, error = %err, "dropping undecodable inbound value");
                        continue;
                    }
                };
                settle(&pending, response).await;
            }
            request = requests.recv() => {
                let request = match request {
                    Some(request) => request,
                    None => break,
                };
                let id = request.id;
                let value = match request.to_value() {
                    Ok(value) => value,
                    Err(err) => {
                        fail_pending(&pending, id, CallError::Codec(err.to_string())).await;
                        continue;
                    }
                };
                if transport.send(value).await.is_err() {
                    break;
                }
            }
        }
    }
}

/// Settles the pending entry matching `response`, if any.
async fn settle(pending: &PendingTable, response: Response) {
    let id = response.id();
    let entry = pending.lock().await.remove(&id);
    let settle_tx = match entry {
        Some(settle_tx) => settle_tx,
        None => {
            // Already settled, unsolicited, or duplicate: no effect.
            debug!(target: PUMP_TARGET, %id, "discarding response for unknown id");
            return;
        }
    };
    let outcome = match response {
        Response::Success { result, .. } => Ok(result),
        Response::Failure { error, .. } => Err(CallError::Remote(error)),
    };
    // The caller may have abandoned its call future; nothing to do then.
    let _ = settle_tx.send(outcome);
}

/// Fails a pending entry locally (the request never reached the wire).
async fn fail_pending(pending: &PendingTable, id: CallId, error: CallError) {
    if let Some(settle_tx) = pending.lock().await.remove(&id) {
        let _ = settle_tx.send(Err(error));
    }
}
