//! Unit tests for the deployment reconciliation module.

mod gateway_sequence_tests;
mod support;
