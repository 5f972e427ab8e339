//! Transport abstraction over the external message channel.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::mpsc;

/// Errors surfaced by a transport endpoint.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransportError {
    /// The peer endpoint is gone.
    #[error("Transport closed")]
    Closed,
}

/// One endpoint of a bidirectional message channel between two processes.
///
/// The channel delivers values in send order per direction and carries
/// structural values only. Exactly one task owns an endpoint's receive
/// side for its lifetime; the core registers a single inbound handler
/// and never re-registers.
#[async_trait]
pub trait Transport: Send {
    /// Sends one value to the peer.
    async fn send(&mut self, value: Value) -> Result<(), TransportError>;

    /// Receives the next peer value, or `None` once the peer is gone.
    async fn recv(&mut self) -> Option<Value>;
}

/// In-process duplex endpoint backed by unbounded channels.
///
/// This is the loopback transport used by the test suites and by
/// same-process wiring; cross-process deployments supply their own
/// [`Transport`] implementation.
pub struct ChannelTransport {
    tx: mpsc::UnboundedSender<Value>,
    rx: mpsc::UnboundedReceiver<Value>,
}

/// Creates a connected pair of duplex endpoints.
///
/// Values sent on one endpoint arrive at the other in send order.
pub fn channel_pair() -> (ChannelTransport, ChannelTransport) {
    let (left_tx, left_rx) = mpsc::unbounded_channel();
    let (right_tx, right_rx) = mpsc::unbounded_channel();
    (
        ChannelTransport {
            tx: left_tx,
            rx: right_rx,
        },
        ChannelTransport {
            tx: right_tx,
            rx: left_rx,
        },
    )
}

#[async_trait]
impl Transport for ChannelTransport {
    async fn send(&mut self, value: Value) -> Result<(), TransportError> {
        self.tx.send(value).map_err(|_| TransportError::Closed)
    }

    async fn recv(&mut self) -> Option<Value> {
        self.rx.recv().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_channel_pair_round_trip() {
        let (mut left, mut right) = channel_pair();

        left.send(json!({"n": 1})).await.unwrap();
        right.send(json!({"n": 2})).await.unwrap();

        assert_eq!(right.recv().await, Some(json!({"n": 1})));
        assert_eq!(left.recv().await, Some(json!({"n": 2})));
    }

    #[tokio::test]
    async fn test_channel_pair_preserves_send_order() {
        let (mut left, mut right) = channel_pair();

        for n in 0..5 {
            left.send(json!(n)).await.unwrap();
        }
        for n in 0..5 {
            assert_eq!(right.recv().await, Some(json!(n)));
        }
    }

    #[tokio::test]
    async fn test_send_to_dropped_peer_fails() {
        let (mut left, right) = channel_pair();
        drop(right);

        let result = left.send(json!(1)).await;
        assert_eq!(result, Err(TransportError::Closed));
    }

    #[tokio::test]
    async fn test_recv_after_peer_dropped_returns_none() {
        let (left, mut right) = channel_pair();
        drop(left);

        assert_eq!(right.recv().await, None);
    }
}
