//! Transport-facing serve loop with an explicit lifecycle.

use crate::dispatcher::Dispatcher;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::warn;
use wire::{Request, Response, Transport, TransportError};

/// Tracing target for serve-loop events.
pub(crate) const SERVE_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::serve");

impl Dispatcher {
    /// Serves requests from `transport` until the peer closes it.
    ///
    /// Each decoded request runs in its own task, so a slow resolver
    /// never delays later requests; responses leave in completion order.
    /// Exactly one response is sent per decoded request. A value that
    /// does not decode as a request cannot be correlated and is dropped.
    pub async fn serve<T: Transport>(&self, mut transport: T) -> Result<(), TransportError> {
        let (out_tx, mut out_rx) = mpsc::unbounded_channel::<Response>();

        loop {
            tokio::select! {
                inbound = transport.recv() => {
                    let value = match inbound {
                        Some(value) => value,
                        None => break,
                    };
                    let request = match Request::from_value(value) {
                        Ok(request) => request,
                        Err(err) => {
                            warn!(target: SERVE_TARGET, error = %err, "dropping undecodable inbound value");
                            continue;
                        }
                    };
                    let dispatcher = self.clone();
                    let out_tx = out_tx.clone();
                    tokio::spawn(async move {
                        let response = dispatcher.handle(request).await;
                        // The loop may have exited if the peer closed mid-flight.
                        let _ = out_tx.send(response);
                    });
                }
                outbound = out_rx.recv() => {
                    // The loop's own sender keeps the queue open, so
                    // this arm always yields a response.
                    let response = match outbound {
                        Some(response) => response,
                        None => break,
                    };
                    match response.to_value() {
                        Ok(value) => transport.send(value).await?,
                        Err(err) => {
                            warn!(target: SERVE_TARGET, error = %err, "dropping unencodable response");
                        }
                    }
                }
            }
        }

        Ok(())
    }

    /// Starts the serve loop in a background task.
    pub fn spawn<T: Transport + 'static>(&self, transport: T) -> ServerHandle {
        let dispatcher = self.clone();
        let task = tokio::spawn(async move { dispatcher.serve(transport).await });
        ServerHandle { task }
    }
}

/// Handle to a serve loop running in its own task.
pub struct ServerHandle {
    task: JoinHandle<Result<(), TransportError>>,
}

impl ServerHandle {
    /// Stops the serve loop without waiting for in-flight requests.
    pub fn shutdown(self) {
        self.task.abort();
    }

    /// Waits for the loop to exit on its own (peer closed the channel).
    pub async fn join(self) -> Result<(), TransportError> {
        match self.task.await {
            Ok(result) => result,
            Err(_) => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use router::{NoParams, Procedure, Router};
    use serde_json::json;
    use std::sync::Arc;
    use tokio::sync::Notify;
    use wire::{channel_pair, CallId};

    fn request_value(id: u64, method: &str) -> serde_json::Value {
        Request::new(CallId::from_raw(id), method, None)
            .to_value()
            .unwrap()
    }

    #[tokio::test]
    async fn test_serve_answers_requests() {
        let router = Router::new().procedure(
            "ping",
            Procedure::builder()
                .input(NoParams)
                .resolve(|_: Option<()>| async move { Ok("pong") }),
        );
        let (server_end, mut client_end) = channel_pair();
        let handle = Dispatcher::new(&router).spawn(server_end);

        client_end.send(request_value(1, "ping")).await.unwrap();

        let response = Response::from_value(client_end.recv().await.unwrap()).unwrap();
        assert_eq!(response, Response::success(CallId::from_raw(1), json!("pong")));

        handle.shutdown();
    }

    #[tokio::test]
    async fn test_slow_resolver_does_not_delay_later_requests() {
        let gate = Arc::new(Notify::new());
        let wait = gate.clone();
        let router = Router::new()
            .procedure(
                "slow",
                Procedure::builder().input(NoParams).resolve(
                    move |_: Option<()>| {
                        let wait = wait.clone();
                        async move {
                            wait.notified().await;
                            Ok("slow")
                        }
                    },
                ),
            )
            .procedure(
                "fast",
                Procedure::builder()
                    .input(NoParams)
                    .resolve(|_: Option<()>| async move { Ok("fast") }),
            );

        let (server_end, mut client_end) = channel_pair();
        let handle = Dispatcher::new(&router).spawn(server_end);

        client_end.send(request_value(1, "slow")).await.unwrap();
        client_end.send(request_value(2, "fast")).await.unwrap();

        // The fast response overtakes the gated one.
        let first = Response::from_value(client_end.recv().await.unwrap()).unwrap();
        assert_eq!(first, Response::success(CallId::from_raw(2), json!("fast")));

        gate.notify_one();
        let second = Response::from_value(client_end.recv().await.unwrap()).unwrap();
        assert_eq!(second, Response::success(CallId::from_raw(1), json!("slow")));

        handle.shutdown();
    }

    #[tokio::test]
    async fn test_undecodable_value_is_dropped() {
        let router = Router::new().procedure(
            "ping",
            Procedure::builder()
                .input(NoParams)
                .resolve(|_: Option<()>| async move { Ok("pong") }),
        );
        let (server_end, mut client_end) = channel_pair();
        let handle = Dispatcher::new(&router).spawn(server_end);

        client_end.send(json!("not a request")).await.unwrap();
        client_end.send(request_value(1, "ping")).await.unwrap();

        // Only the decodable request is answered.
        let response = Response::from_value(client_end.recv().await.unwrap()).unwrap();
        assert_eq!(response.id(), CallId::from_raw(1));

        handle.shutdown();
    }

    #[tokio::test]
    async fn test_serve_exits_when_peer_closes() {
        let router = Router::new();
        let (server_end, client_end) = channel_pair();
        let handle = Dispatcher::new(&router).spawn(server_end);

        drop(client_end);
        assert_eq!(handle.join().await, Ok(()));
    }
}
