//! Command implementations
//!
//! Each command module provides a clap-derived struct and an `execute`
//! method taking the resolved [`DevConfig`](crate::config::DevConfig) and the
//! runner that reaches Bazel.

pub mod bench;
pub mod build;
pub mod generate;
pub mod lint;
