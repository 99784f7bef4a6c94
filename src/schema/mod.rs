//! Schema module - Configuration and data types for genetic codes.

mod code;
mod config;

pub use code::*;
pub use config::*;
