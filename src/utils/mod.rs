//! Shared helpers

pub mod duration;
pub mod paths;
pub mod terminal;
pub mod tools;
