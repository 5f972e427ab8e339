//! Wire message contract tests.
//!
//! These tests define the stable request/response shapes. A change that
//! breaks one of them breaks every deployed peer.
