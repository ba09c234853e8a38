//! Agent hub deployment reconciliation.
//!
//! Keeps an agent's model deployments aligned with its completed
//! fine-tuning jobs. The crate talks to the hub's REST backend through a
//! gateway port, creates missing deployments with their default methods,
//! and projects the result into display rows.
//!
//! - [`deployment`] holds the domain, gateway port, adapters, services, and
//!   view projection.
//! - [`config`] loads runtime settings from the environment.
//! - [`telemetry`] installs the tracing subscriber used by the binary.

pub mod config;
pub mod deployment;
pub mod telemetry;
