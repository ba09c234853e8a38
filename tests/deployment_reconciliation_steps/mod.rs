//! Step definitions for deployment reconciliation scenarios.

mod given;
mod then;
mod when;
pub mod world;
