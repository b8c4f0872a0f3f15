//! Shared building blocks for the workspace binaries: logging setup,
//! runtime environment checks and small transport types.

pub mod types;
pub mod utils;
pub mod env;
