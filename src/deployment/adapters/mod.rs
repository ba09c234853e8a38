//! Adapter implementations for the backend gateway port.

pub mod http;
pub mod memory;

pub use http::HttpBackendGateway;
pub use memory::{GatewayCall, GatewayOperation, InMemoryBackendGateway};
