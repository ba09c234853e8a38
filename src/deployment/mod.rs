//! Deployment reconciliation for agent fine-tuning jobs.
//!
//! Brings the set of deployments of one agent into line with its completed
//! fine-tuning jobs: jobs that finished without a deployment get one, each
//! new deployment gets its default inference methods, and the merged result
//! is projected into display rows. The module follows hexagonal
//! architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]
//! - Pure display projection in [`view`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
pub mod view;

#[cfg(test)]
mod tests;
