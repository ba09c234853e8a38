//! Port contracts for deployment reconciliation.
//!
//! Ports define infrastructure-agnostic interfaces used by the services.

mod gateway;

pub use gateway::{BackendGateway, GatewayError, GatewayResult};

#[cfg(test)]
pub(crate) use gateway::MockBackendGateway;
