//! CLI command implementations.

pub mod resolve;
pub mod check;
pub mod emit;
pub mod version;
