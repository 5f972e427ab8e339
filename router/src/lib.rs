//! # Procedure Router
//!
//! This crate defines procedures and their composition into an
//! addressable tree.
//!
//! ## Philosophy
//!
//! - **Validation before resolution**: a resolver never sees unvalidated
//!   input
//! - **Composition without transformation**: a router stores what it is
//!   given; no merging, no flattening, no collision detection
//! - **Flatten once, look up forever**: the tree is walked a single time
//!   at composition; dispatch is a map probe
//!
//! A [`Procedure`] pairs an input [`Validator`] with a resolver and is
//! built through a two-step builder that cannot expose a half-built
//! procedure. A [`Router`] aggregates procedures and nested routers
//! under names; [`PathIndex`] flattens the finished tree into a
//! dotted-path lookup table for the dispatcher.

pub mod index;
pub mod procedure;
pub mod tree;
pub mod validator;

pub use index::PathIndex;
pub use procedure::{Procedure, ProcedureBuilder, ProcedureWithInput, ResolverError};
pub use tree::{Route, Router};
pub use validator::{schema, NoParams, Schema, ValidationError, Validator};
