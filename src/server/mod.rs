//! Server module for building the HTTP application
//!
//! `ServerBuilder` wires a store into the route table, adds the tracing and
//! optional CORS layers, and serves with graceful shutdown.

pub mod builder;
pub mod router;

pub use builder::ServerBuilder;
