//! Runtime integration tests for the Artery network.

#[cfg(test)]
pub mod common;
