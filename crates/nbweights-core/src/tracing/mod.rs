//! Observability for nbweights.
//! `tracing` crate with `EnvFilter`, per-crate log levels.

pub mod setup;

pub use setup::{default_filter, init_tracing};
