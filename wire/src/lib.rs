//! # Wire Protocol
//!
//! This crate defines Crosstalk's wire messages and the transport seam
//! between exactly two processes.
//!
//! ## Philosophy
//!
//! - **Correlation over ordering**: a response is matched to its call by
//!   id alone, never by arrival order
//! - **Structural values only**: everything that crosses the channel
//!   survives plain serialization (no identity, no functions)
//! - **The transport is a collaborator**: the channel itself is consumed
//!   through a small trait, not reimplemented
//!
//! ## Architecture
//!
//! A [`Request`] carries a correlation id, a dot-delimited method path
//! and unvalidated params. Exactly one [`Response`] answers it, as
//! either a result or an error string. The [`Transport`] trait is the
//! boundary to the external channel; [`channel_pair`] provides the
//! in-process loopback used throughout the test suites.

pub mod message;
pub mod transport;

pub use message::{CallId, CodecError, Request, Response};
pub use transport::{channel_pair, ChannelTransport, Transport, TransportError};
