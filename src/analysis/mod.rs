//! Read-only walks over the node store.
pub mod telemetry;
pub mod topology;
