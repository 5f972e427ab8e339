//! # Dispatcher
//!
//! Server side of the protocol: resolves inbound requests against a
//! composed router and emits exactly one response per decoded request.
//!
//! ## Philosophy
//!
//! - **Per-request isolation**: a bad request produces a failure
//!   response, never a dead server
//! - **Nothing serializes requests**: each one runs in its own task, so
//!   responses leave in completion order, not arrival order
//! - **Explicit lifecycle**: the serve loop owns its transport from
//!   start to close; there is no ambient process-wide hook

pub mod dispatcher;
pub mod serve;

pub use dispatcher::Dispatcher;
pub use serve::ServerHandle;
