//! REST adapter for the backend gateway port.

mod client;
mod dto;
mod status;

pub use client::HttpBackendGateway;
